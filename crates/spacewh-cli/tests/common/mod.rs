//! Shared E2E test helpers for `spacewh` binary tests.

use assert_cmd::cargo::cargo_bin_cmd;
use std::path::Path;
use std::time::Duration;

/// Default timeout for CLI tests.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

/// Environment variables read by the config loader.
const SPACEWH_VARS: &[&str] = &[
    "SPACEWH_DEBUG",
    "SPACEWH_MODE",
    "SPACEWH_MAX_IN_FLIGHT",
    "SPACEWH_RETENTION_SECS",
    "SPACEWH_CONTEXT_THRESHOLD",
];

/// Isolated home and project directories for one test.
pub struct Sandbox {
    pub home: tempfile::TempDir,
    pub project: tempfile::TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temp home"),
            project: tempfile::tempdir().expect("create temp project"),
        }
    }

    /// Writes `<project>/.spacewh/config.toml`.
    pub fn write_project_config(&self, contents: &str) {
        let dir = self.project.path().join(".spacewh");
        std::fs::create_dir_all(&dir).expect("create project config dir");
        std::fs::write(dir.join("config.toml"), contents).expect("write project config");
    }

    /// Path of the global config file under the temp home.
    pub fn global_config(&self) -> std::path::PathBuf {
        self.home.path().join(".spacewh").join("config.toml")
    }

    /// Command for the `spacewh` binary with HOME and the project root
    /// pointed at the sandbox and every `SPACEWH_*` variable cleared.
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd: assert_cmd::Command = cargo_bin_cmd!("spacewh");
        cmd.timeout(TIMEOUT_BASIC);
        for var in SPACEWH_VARS {
            cmd.env_remove(var);
        }
        cmd.env_remove("RUST_LOG");
        cmd.env("HOME", self.home.path());
        cmd.args(["-C", path_str(self.project.path())]);
        cmd
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("valid utf8")
}
