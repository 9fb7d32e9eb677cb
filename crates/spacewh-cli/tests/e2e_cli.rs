//! E2E integration tests for the `spacewh` binary.
//!
//! Spawns the real binary against a temp HOME and project root.
//! Command output goes to stdout; tracing output and errors go to stderr.

mod common;

use common::Sandbox;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

// ─── Modes ─────────────────────────────────────────────────────────

#[test]
fn modes_lists_all_modes_with_default_marked() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("modes")
        .assert()
        .success()
        .stdout(contains("* archivist"))
        .stdout(contains("orchestrator"))
        .stdout(contains("godfather"))
        .stdout(contains("entity"))
        .stdout(contains("engine_4"));
}

#[test]
fn mode_flag_selects_initial_mode() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["--mode", "godfather", "modes"])
        .assert()
        .success()
        .stdout(contains("* godfather"))
        .stdout(contains("* archivist").not());
}

#[test]
fn unknown_mode_fails_with_code() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["--mode", "warlord", "modes"])
        .assert()
        .failure()
        .stderr(contains("SYSTEM_CONFIG_ERROR"))
        .stderr(contains("warlord"));
}

#[test]
fn env_mode_is_applied() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .env("SPACEWH_MODE", "entity")
        .arg("modes")
        .assert()
        .success()
        .stdout(contains("* entity"));
}

// ─── Tools ─────────────────────────────────────────────────────────

#[test]
fn tools_lists_builtins() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("tools")
        .assert()
        .success()
        .stdout(contains("system_info"))
        .stdout(contains("echo"))
        .stdout(contains("basic_tools"));
}

#[test]
fn invoke_echo_returns_message() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["invoke", "echo", "--params", r#"{"message": "hello there"}"#])
        .assert()
        .success()
        .stdout(contains(r#""tool_id": "echo""#))
        .stdout(contains("hello there"));
}

#[test]
fn invoke_without_required_param_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["invoke", "echo"])
        .assert()
        .failure()
        .stderr(contains("TOOL_INVALID_PARAMETERS"));
}

#[test]
fn invoke_unknown_tool_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["invoke", "warp_drive"])
        .assert()
        .failure()
        .stderr(contains("TOOL_NOT_FOUND"));
}

// ─── Routing ───────────────────────────────────────────────────────

#[test]
fn route_completes_on_baseline_tier() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["route", "hello"])
        .assert()
        .success()
        .stdout(contains(r#""status": "completed""#))
        .stdout(contains("[Engine 1] Response to: hello"))
        .stdout(contains(r#""mode": "archivist""#));
}

#[test]
fn route_high_complexity_under_godfather_uses_engine3() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["--mode", "godfather", "route", "deep question", "--complexity", "high"])
        .assert()
        .success()
        .stdout(contains(r#""tier": "engine_3""#))
        .stdout(contains("[Engine 3] Response to: deep question"));
}

#[test]
fn route_high_complexity_is_clamped_under_archivist() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["route", "deep question", "--complexity", "high"])
        .assert()
        .success()
        .stdout(contains(r#""tier": "engine_1""#));
}

#[test]
fn route_tier_override_above_mode_is_denied() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["route", "x", "--tier", "engine_4"])
        .assert()
        .failure()
        .stderr(contains("AUTH_LEVEL_DENIED"));
}

#[test]
fn route_rejects_unknown_complexity() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["route", "x", "--complexity", "extreme"])
        .assert()
        .failure()
        .stderr(contains("expected low, medium or high"));
}

#[test]
fn route_with_large_context_uses_highest_tier() {
    let sandbox = Sandbox::new();
    sandbox.write_project_config("[tiers]\ncontext_threshold = 10\n");
    sandbox
        .cmd()
        .args([
            "--mode",
            "entity",
            "route",
            "summarize",
            "--context",
            "a passage longer than ten characters",
        ])
        .assert()
        .success()
        .stdout(contains(r#""tier": "engine_3""#));
}

// ─── Status / Config ───────────────────────────────────────────────

#[test]
fn status_reports_mode_and_engines() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(contains(r#""mode": "archivist""#))
        .stdout(contains("in_development"))
        .stdout(contains(r#""tools_attached": true"#));
}

#[test]
fn config_prints_merged_layers() {
    let sandbox = Sandbox::new();
    sandbox.write_project_config("[router]\nmax_in_flight = 7\n");
    sandbox
        .cmd()
        .env("SPACEWH_RETENTION_SECS", "90")
        .args(["--mode", "orchestrator", "config"])
        .assert()
        .success()
        .stdout(contains(r#"default_mode = "orchestrator""#))
        .stdout(contains("max_in_flight = 7"))
        .stdout(contains("retention_secs = 90"));
}

#[test]
fn invalid_env_value_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .env("SPACEWH_MAX_IN_FLIGHT", "many")
        .arg("config")
        .assert()
        .failure()
        .stderr(contains("SPACEWH_MAX_IN_FLIGHT"));
}

#[test]
fn config_save_writes_global_file() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["--mode", "entity", "config", "--save"])
        .assert()
        .success()
        .stdout(contains("# saved to"));

    let saved = std::fs::read_to_string(sandbox.global_config()).expect("global config written");
    assert!(saved.contains(r#"default_mode = "entity""#));

    // Global config now supplies the default mode
    sandbox
        .cmd()
        .arg("modes")
        .assert()
        .success()
        .stdout(contains("* entity"));
}
