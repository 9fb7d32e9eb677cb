//! Wired runtime.
//!
//! [`SpacewhSystem`] builds every subsystem from a [`SpacewhConfig`] and
//! keeps them alive together:
//!
//! ```text
//! SpacewhConfig ─► ModeRegistry ─► ModeController ◄─ hooks ─┬─ EngineRouter
//!                                        │                  └─ ToolExecutor
//!                                        └─ EventBus ◄─ events ── Engine
//! RequestTracker ◄── sweeper task (until shutdown)
//! ```

use crate::auth::ModeGate;
use crate::config::{ConfigError, SpacewhConfig};
use crate::engine::{Engine, EngineRouter, EventBus, SimulatedEngine};
use crate::mode::{ModeChange, ModeController, ModeError};
use crate::tier::TierSelector;
use crate::tools::{register_builtins, ToolError, ToolExecutor, ToolRegistry};
use crate::tracker::RequestTracker;
use spacewh_types::ErrorCode;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Failure while wiring the runtime.
///
/// | Variant | Code |
/// |---------|------|
/// | [`SystemError::Config`] | `SYSTEM_CONFIG_ERROR` |
/// | [`SystemError::Tool`] | `TOOL_*` (delegated) |
#[derive(Debug, Error)]
pub enum SystemError {
    /// The configuration could not be turned into runtime settings.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Built-in tool registration failed.
    #[error(transparent)]
    Tool(#[from] ToolError),
}

impl ErrorCode for SystemError {
    fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "SYSTEM_CONFIG_ERROR",
            Self::Tool(e) => e.code(),
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// Builder for [`SpacewhSystem`].
#[derive(Default)]
pub struct SystemBuilder {
    config: SpacewhConfig,
    engine: Option<Arc<dyn Engine>>,
}

impl SystemBuilder {
    /// Starts from `config`.
    #[must_use]
    pub fn new(config: SpacewhConfig) -> Self {
        Self {
            config,
            engine: None,
        }
    }

    /// Uses `engine` instead of a [`SimulatedEngine`].
    #[must_use]
    pub fn engine(mut self, engine: Arc<dyn Engine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Wires the subsystems and starts the eviction sweeper.
    ///
    /// Must be called inside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// [`SystemError::Config`] for an unknown default mode, bad mode
    /// overrides, or misordered tiers.
    pub async fn build(self) -> Result<SpacewhSystem, SystemError> {
        let config = self.config;
        let initial = config.default_mode()?;
        let registry = Arc::new(config.mode_registry()?);
        let selector = TierSelector::new(config.tier_policy()?);

        let bus = Arc::new(EventBus::new());
        let controller = Arc::new(ModeController::new(
            Arc::clone(&registry),
            Arc::clone(&bus),
            initial,
        ));
        let gate = ModeGate::new(Arc::clone(&registry));

        let tool_registry = Arc::new(ToolRegistry::new());
        register_builtins(&tool_registry)?;
        let tools = Arc::new(ToolExecutor::new(
            Arc::clone(&tool_registry),
            gate.clone(),
            Arc::clone(&controller),
        ));
        controller.register_hook(&tools);

        let tracker = Arc::new(RequestTracker::new(config.tracker.retention()));
        let (engine, simulated) = match self.engine {
            Some(engine) => (engine, None),
            None => {
                let simulated = Arc::new(SimulatedEngine::new());
                (Arc::clone(&simulated) as Arc<dyn Engine>, Some(simulated))
            }
        };

        let router = EngineRouter::builder(Arc::clone(&controller), Arc::clone(&bus), engine)
            .gate(gate)
            .selector(selector)
            .tracker(Arc::clone(&tracker))
            .tools(Arc::clone(&tools) as Arc<dyn crate::tools::ToolProvider>)
            .max_in_flight(config.router.max_in_flight)
            .build();

        if let Some(simulated) = simulated {
            simulated.announce(&bus);
        }

        let shutdown = CancellationToken::new();
        let sweeper = tracker.spawn_sweeper(config.tracker.sweep_interval(), shutdown.clone());

        tracing::info!(
            mode = %initial,
            max_in_flight = config.router.max_in_flight,
            retention_secs = config.tracker.retention_secs,
            "spacewh runtime started"
        );

        Ok(SpacewhSystem {
            config,
            bus,
            controller,
            tracker,
            router,
            tools,
            shutdown,
            sweeper: Some(sweeper),
        })
    }
}

/// Every runtime subsystem, wired together.
///
/// # Example
///
/// ```
/// use spacewh_runtime::config::SpacewhConfig;
/// use spacewh_runtime::SpacewhSystem;
/// use spacewh_auth::Mode;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let system = SpacewhSystem::builder(SpacewhConfig::default()).build().await.unwrap();
/// assert_eq!(system.controller().current(), Mode::Archivist);
///
/// system.set_mode("godfather").unwrap();
/// assert_eq!(system.router().system_status().mode.version, 1);
/// system.shutdown().await;
/// # });
/// ```
pub struct SpacewhSystem {
    config: SpacewhConfig,
    bus: Arc<EventBus>,
    controller: Arc<ModeController>,
    tracker: Arc<RequestTracker>,
    router: Arc<EngineRouter>,
    tools: Arc<ToolExecutor>,
    shutdown: CancellationToken,
    sweeper: Option<JoinHandle<()>>,
}

impl SpacewhSystem {
    /// Starts a builder.
    #[must_use]
    pub fn builder(config: SpacewhConfig) -> SystemBuilder {
        SystemBuilder::new(config)
    }

    /// Configuration the system was built from.
    #[must_use]
    pub fn config(&self) -> &SpacewhConfig {
        &self.config
    }

    /// Event bus.
    #[must_use]
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Mode controller.
    #[must_use]
    pub fn controller(&self) -> &Arc<ModeController> {
        &self.controller
    }

    /// Request tracker.
    #[must_use]
    pub fn tracker(&self) -> &Arc<RequestTracker> {
        &self.tracker
    }

    /// Engine router.
    #[must_use]
    pub fn router(&self) -> &Arc<EngineRouter> {
        &self.router
    }

    /// Tool executor.
    #[must_use]
    pub fn tools(&self) -> &Arc<ToolExecutor> {
        &self.tools
    }

    /// Switches the operational mode.
    ///
    /// # Errors
    ///
    /// [`ModeError::UnknownMode`] for an unknown name.
    pub fn set_mode(&self, name: &str) -> Result<ModeChange, ModeError> {
        self.controller.set_operational_mode(name)
    }

    /// Stops the eviction sweeper and waits for it to exit.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(sweeper) = self.sweeper.take() {
            if let Err(e) = sweeper.await {
                tracing::warn!(error = %e, "request sweeper ended abnormally");
            }
        }
        tracing::debug!("spacewh runtime stopped");
    }
}

impl Drop for SpacewhSystem {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl std::fmt::Debug for SpacewhSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpacewhSystem")
            .field("mode", &self.controller.snapshot())
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}
