//! CLI configuration overrides.
//!
//! Implements [`ConfigResolver`] for command-line flags, applied as the
//! highest priority layer after file/env config loading.

use spacewh_runtime::config::{ConfigResolver, SpacewhConfig};

/// Flag values that override the loaded configuration.
///
/// # Example
///
/// ```ignore
/// let mut config = ConfigLoader::new().load()?;
/// CliOverrides::new().debug(true).mode_opt(Some("godfather".into())).apply(&mut config);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    debug: Option<bool>,
    mode: Option<String>,
    max_in_flight: Option<usize>,
}

impl CliOverrides {
    /// Creates empty overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets debug mode override.
    #[must_use]
    pub fn debug(mut self, value: bool) -> Self {
        self.debug = Some(value);
        self
    }

    /// Sets the initial mode if Some.
    #[must_use]
    pub fn mode_opt(mut self, mode: Option<String>) -> Self {
        if let Some(m) = mode {
            self.mode = Some(m);
        }
        self
    }

    /// Sets the in-flight bound if Some.
    #[must_use]
    pub fn max_in_flight_opt(mut self, limit: Option<usize>) -> Self {
        if let Some(l) = limit {
            self.max_in_flight = Some(l);
        }
        self
    }
}

impl ConfigResolver for CliOverrides {
    fn apply(&self, config: &mut SpacewhConfig) {
        // A false --debug flag means "not given"; keep the loaded value.
        if self.debug == Some(true) {
            config.debug = true;
        }
        if let Some(ref mode) = self.mode {
            config.router.default_mode.clone_from(mode);
        }
        if let Some(limit) = self.max_in_flight {
            config.router.max_in_flight = limit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_overrides_change_nothing() {
        let mut config = SpacewhConfig::default();
        let original = config.clone();

        CliOverrides::new().apply(&mut config);

        assert_eq!(config, original);
    }

    #[test]
    fn debug_override() {
        let mut config = SpacewhConfig::default();
        CliOverrides::new().debug(true).apply(&mut config);
        assert!(config.debug);
    }

    #[test]
    fn false_debug_preserves_loaded_value() {
        let mut config = SpacewhConfig::default();
        config.debug = true;
        CliOverrides::new().debug(false).apply(&mut config);
        assert!(config.debug);
    }

    #[test]
    fn mode_and_limit_overrides() {
        let mut config = SpacewhConfig::default();
        CliOverrides::new()
            .mode_opt(Some("godfather".into()))
            .max_in_flight_opt(Some(4))
            .apply(&mut config);

        assert_eq!(config.router.default_mode, "godfather");
        assert_eq!(config.router.max_in_flight, 4);
    }

    #[test]
    fn none_options_are_ignored() {
        let mut config = SpacewhConfig::default();
        config.router.default_mode = "entity".into();
        CliOverrides::new()
            .mode_opt(None)
            .max_in_flight_opt(None)
            .apply(&mut config);

        assert_eq!(config.router.default_mode, "entity");
        assert_eq!(config.router.max_in_flight, 0);
    }
}
