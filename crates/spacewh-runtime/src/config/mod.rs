//! Configuration management with hierarchical layering.
//!
//! # Architecture
//!
//! Configuration is loaded from multiple sources with priority-based merging:
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌────────────────────────────────────────────┐
//! │  1. Environment Variables (SPACEWH_*)      │  Runtime override
//! ├────────────────────────────────────────────┤
//! │  2. Project Config (.spacewh/config.toml)  │  Project-specific
//! ├────────────────────────────────────────────┤
//! │  3. Global Config (~/.spacewh/config.toml) │  User defaults
//! ├────────────────────────────────────────────┤
//! │  4. Default Values (compile-time)          │  Fallback
//! └────────────────────────────────────────────┘
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `SPACEWH_DEBUG` | `debug` | bool |
//! | `SPACEWH_MODE` | `router.default_mode` | mode name |
//! | `SPACEWH_MAX_IN_FLIGHT` | `router.max_in_flight` | usize |
//! | `SPACEWH_RETENTION_SECS` | `tracker.retention_secs` | u64 |
//! | `SPACEWH_CONTEXT_THRESHOLD` | `tiers.context_threshold` | usize |
//!
//! # Example Configuration
//!
//! ```toml
//! # ~/.spacewh/config.toml
//!
//! debug = false
//!
//! [router]
//! default_mode = "archivist"
//! max_in_flight = 32
//!
//! [tracker]
//! retention_secs = 1800
//! sweep_interval_secs = 60
//!
//! [tiers]
//! context_threshold = 10000
//! baseline = "engine_1"
//! middle = "engine_2"
//! highest = "engine_3"
//!
//! [modes.godfather]
//! timeout_secs = 90
//! ```

mod error;
mod loader;
mod resolver;
mod types;

pub use error::ConfigError;
pub use loader::{save_config_to, save_global_config, ConfigLoader};
pub use resolver::{ConfigResolver, NoOpResolver};
pub use types::{ModeOverride, RouterConfig, SpacewhConfig, TiersConfig, TrackerConfig};

/// Default global config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".spacewh")
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".spacewh";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";
