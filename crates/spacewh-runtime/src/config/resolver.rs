//! Configuration resolver trait for layered overrides.
//!
//! # Architecture
//!
//! ```text
//! ConfigLoader.load()  →  SpacewhConfig (base)
//!                              │
//!                              ▼
//!                     ConfigResolver.apply()
//!                              │
//!                              ▼
//!                     SpacewhConfig (final)
//! ```
//!
//! # Example
//!
//! ```
//! use spacewh_runtime::config::{ConfigResolver, SpacewhConfig};
//!
//! struct CliOverrides {
//!     mode: Option<String>,
//! }
//!
//! impl ConfigResolver for CliOverrides {
//!     fn apply(&self, config: &mut SpacewhConfig) {
//!         if let Some(mode) = &self.mode {
//!             config.router.default_mode = mode.clone();
//!         }
//!     }
//! }
//!
//! let mut config = SpacewhConfig::default();
//! CliOverrides { mode: Some("godfather".into()) }.apply(&mut config);
//! assert_eq!(config.router.default_mode, "godfather");
//! ```

use super::SpacewhConfig;

/// Trait for applying configuration overrides.
///
/// Separates config loading (file/env) from runtime overrides
/// (CLI flags, programmatic settings).
pub trait ConfigResolver {
    /// Applies overrides to the given configuration.
    ///
    /// Only non-None values should be applied, preserving existing values
    /// for unspecified options.
    fn apply(&self, config: &mut SpacewhConfig);
}

/// No-op resolver that makes no changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpResolver;

impl ConfigResolver for NoOpResolver {
    fn apply(&self, _config: &mut SpacewhConfig) {}
}
