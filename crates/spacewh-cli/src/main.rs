//! spacewh CLI - engine router front end
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`SPACEWH_*`)
//! 3. Project config (`.spacewh/config.toml` in the project root)
//! 4. Global config (`~/.spacewh/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `SPACEWH_DEBUG`: Enable debug mode (`true`/`false`)
//! - `SPACEWH_MODE`: Initial operational mode
//! - `SPACEWH_MAX_IN_FLIGHT`: In-flight request bound (0 = unbounded)
//! - `SPACEWH_RETENTION_SECS`: Retention of settled requests
//! - `SPACEWH_CONTEXT_THRESHOLD`: Context length routed to the highest tier
//!
//! # Output
//!
//! Command results go to stdout; tracing output and errors go to stderr.

mod overrides;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use overrides::CliOverrides;
use serde_json::Value;
use spacewh_event::EventChannel;
use spacewh_runtime::config::{save_global_config, ConfigLoader, ConfigResolver, SpacewhConfig};
use spacewh_runtime::engine::{RequestPayload, RouteRequest};
use spacewh_runtime::tier::{Complexity, TierHints, Urgency};
use spacewh_runtime::tools::ToolProvider;
use spacewh_runtime::tracker::RequestStatus;
use spacewh_runtime::SpacewhSystem;
use spacewh_types::{ErrorCode, TierId};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// spacewh CLI - engine router front end
#[derive(Parser, Debug)]
#[command(name = "spacewh")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    project: Option<PathBuf>,

    /// Initial operational mode (also: SPACEWH_MODE)
    #[arg(long, global = true)]
    mode: Option<String>,

    /// In-flight request bound, 0 = unbounded (also: SPACEWH_MAX_IN_FLIGHT)
    #[arg(long, global = true)]
    max_in_flight: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the mode table
    Modes,

    /// Print the tools usable in the active mode
    Tools,

    /// Run a tool through the mode-gated executor
    Invoke {
        /// Tool id
        tool: String,

        /// Parameters as a JSON object
        #[arg(long, value_name = "JSON")]
        params: Option<String>,
    },

    /// Route one request to the simulated engine and print its record
    Route(RouteArgs),

    /// Print the router status
    Status,

    /// Print the merged configuration as TOML
    Config {
        /// Also write it to the global config file
        #[arg(long)]
        save: bool,
    },
}

#[derive(clap::Args, Debug)]
struct RouteArgs {
    /// The prompt or query
    message: String,

    /// Requesting source
    #[arg(long, default_value = "cli")]
    source: String,

    /// Declared complexity: low, medium or high
    #[arg(long, value_parser = parse_complexity)]
    complexity: Option<Complexity>,

    /// Declared urgency: low or high
    #[arg(long, value_parser = parse_urgency)]
    urgency: Option<Urgency>,

    /// Explicit tier (engine_1 .. engine_4)
    #[arg(long, value_parser = parse_tier)]
    tier: Option<TierId>,

    /// Context passage; repeatable
    #[arg(long = "context", value_name = "TEXT")]
    context: Vec<String>,
}

fn parse_complexity(s: &str) -> Result<Complexity, String> {
    Complexity::parse(s).ok_or_else(|| format!("expected low, medium or high, got '{s}'"))
}

fn parse_urgency(s: &str) -> Result<Urgency, String> {
    Urgency::parse(s).ok_or_else(|| format!("expected low or high, got '{s}'"))
}

fn parse_tier(s: &str) -> Result<TierId, String> {
    TierId::parse(s).ok_or_else(|| format!("expected engine_1 .. engine_4, got '{s}'"))
}

/// Formats a coded error as `[CODE] message`.
fn coded<E: ErrorCode + std::fmt::Display>(err: E) -> anyhow::Error {
    anyhow::anyhow!("[{}] {err}", err.code())
}

fn project_root(args: &Args) -> PathBuf {
    args.project.clone().unwrap_or_else(|| {
        std::env::current_dir().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to get current directory, using '.'");
            PathBuf::from(".")
        })
    })
}

fn resolve_config(args: &Args) -> Result<SpacewhConfig> {
    let mut config = ConfigLoader::new()
        .with_project_root(project_root(args))
        .load()
        .context("Config error")?;

    CliOverrides::new()
        .debug(args.debug)
        .mode_opt(args.mode.clone())
        .max_in_flight_opt(args.max_in_flight)
        .apply(&mut config);
    Ok(config)
}

/// Terminal filter: --debug > --verbose > RUST_LOG env > default "warn"
fn init_tracing(debug: bool, verbose: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;
    init_tracing(config.debug, args.verbose);

    info!(
        project = %project_root(&args).display(),
        mode = %config.router.default_mode,
        "configuration resolved"
    );

    let system = SpacewhSystem::builder(config).build().await.map_err(coded)?;
    let result = run(&system, args.command).await;
    system.shutdown().await;
    result
}

async fn run(system: &SpacewhSystem, command: Command) -> Result<()> {
    match command {
        Command::Modes => print_modes(system),
        Command::Tools => print_tools(system),
        Command::Invoke { tool, params } => invoke(system, &tool, params.as_deref()).await?,
        Command::Route(args) => route(system, args).await?,
        Command::Status => {
            println!(
                "{}",
                serde_json::to_string_pretty(&system.router().system_status())?
            );
        }
        Command::Config { save } => {
            let config = system.config();
            print!("{}", config.to_toml()?);
            if save {
                let path = save_global_config(config).context("Failed to save config")?;
                println!("# saved to {}", path.display());
            }
        }
    }
    Ok(())
}

fn print_modes(system: &SpacewhSystem) {
    let current = system.controller().current();
    println!(
        "  {:<14}{:>5}  {:<10}{:>10}{:>9}  CATEGORIES",
        "MODE", "LEVEL", "ENGINE", "MAX_TOK", "TIMEOUT"
    );
    for profile in system.controller().registry().list_modes() {
        let marker = if profile.mode == current { '*' } else { ' ' };
        println!(
            "{marker} {:<14}{:>5}  {:<10}{:>10}{:>8}s  {}",
            profile.mode.name(),
            profile.level(),
            profile.tier.engine.name(),
            profile.tier.max_tokens,
            profile.tier.timeout_secs,
            profile.categories.names().join(",")
        );
    }
}

fn print_tools(system: &SpacewhSystem) {
    let tools = system.tools().discover();
    if tools.is_empty() {
        println!("No tools available in mode {}", system.controller().current());
        return;
    }
    for tool in tools {
        println!(
            "{:<14}{:<24}{}",
            tool.id,
            tool.categories().names().join(","),
            tool.description
        );
    }
}

async fn invoke(system: &SpacewhSystem, tool: &str, params: Option<&str>) -> Result<()> {
    let params: Value = match params {
        Some(raw) => serde_json::from_str(raw).context("--params is not valid JSON")?,
        None => Value::Null,
    };
    let response = system.tools().invoke(tool, params).await.map_err(coded)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn route(system: &SpacewhSystem, args: RouteArgs) -> Result<()> {
    // Subscribe before admission so a fast settlement is not missed.
    let (tx, mut rx) = mpsc::unbounded_channel();
    let subscriptions: Vec<_> = [
        EventChannel::EngineRequestComplete,
        EventChannel::EngineRequestError,
    ]
    .into_iter()
    .map(|channel| {
        let tx = tx.clone();
        system.bus().subscribe(channel, move |event| {
            if let Some(id) = event.request_id() {
                // receiver gone means the command already finished
                let _ = tx.send(id);
            }
            Ok(())
        })
    })
    .collect();
    drop(tx);

    let payload = args
        .context
        .into_iter()
        .fold(RequestPayload::new(args.message), |payload, passage| {
            payload.with_context(passage)
        });
    let hints = TierHints {
        tier: args.tier,
        complexity: args.complexity,
        urgency: args.urgency,
        context_len: None,
    };

    let response = system
        .router()
        .route(RouteRequest::process(args.source, payload, hints))
        .await
        .map_err(coded)?;
    let Some(request_id) = response.accepted_id() else {
        bail!("router did not admit the request: {response:?}");
    };
    info!(request_id = %request_id, "waiting for the engine");

    while let Some(id) = rx.recv().await {
        if id == request_id {
            break;
        }
    }
    for id in subscriptions {
        system.bus().unsubscribe(id);
    }

    let snapshot = system.tracker().snapshot(request_id).map_err(coded)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    if snapshot.status == RequestStatus::Error {
        let code = snapshot
            .error
            .as_ref()
            .map_or("ENGINE_FAILED", |e| e.code.as_str());
        bail!("[{code}] request {request_id} failed");
    }
    Ok(())
}
