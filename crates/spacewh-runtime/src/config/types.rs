//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use super::ConfigError;
use crate::tier::TierPolicy;
use serde::{Deserialize, Serialize};
use spacewh_auth::{Mode, ModeRegistry};
use spacewh_types::TierId;
use std::collections::BTreeMap;
use std::time::Duration;

/// Main configuration structure.
///
/// This is the unified configuration after merging all layers.
///
/// # Example
///
/// ```
/// use spacewh_runtime::config::SpacewhConfig;
/// use spacewh_auth::Mode;
///
/// let config = SpacewhConfig::from_toml(r#"
/// [router]
/// default_mode = "orchestrator"
///
/// [modes.archivist]
/// max_tokens = 512
/// "#).unwrap();
///
/// assert_eq!(config.default_mode().unwrap(), Mode::Orchestrator);
/// let registry = config.mode_registry().unwrap();
/// assert_eq!(registry.profile(Mode::Archivist).tier.max_tokens, 512);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpacewhConfig {
    /// Enable debug logging.
    pub debug: bool,

    /// Router admission settings.
    pub router: RouterConfig,

    /// Request retention settings.
    pub tracker: TrackerConfig,

    /// Tier selection thresholds.
    pub tiers: TiersConfig,

    /// Per-mode tier limit overrides, keyed by mode name.
    pub modes: BTreeMap<String, ModeOverride>,
}

impl SpacewhConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Merges another config into this one.
    ///
    /// Values from `other` override values in `self` only if they
    /// differ from the default. This enables layered configuration.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.debug != default.debug {
            self.debug = other.debug;
        }

        self.router.merge(&other.router);
        self.tracker.merge(&other.tracker);
        self.tiers.merge(&other.tiers);

        for (name, overrides) in &other.modes {
            self.modes.entry(name.clone()).or_default().merge(overrides);
        }
    }

    /// Parses `router.default_mode`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] for an unknown mode name.
    pub fn default_mode(&self) -> Result<Mode, ConfigError> {
        Mode::parse(&self.router.default_mode).ok_or_else(|| {
            ConfigError::invalid_value(
                "router.default_mode",
                format!("unknown mode '{}'", self.router.default_mode),
            )
        })
    }

    /// Builds the mode registry with the `[modes.*]` overrides applied.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] for an unknown mode name or a zero limit.
    pub fn mode_registry(&self) -> Result<ModeRegistry, ConfigError> {
        let mut registry = ModeRegistry::builtin();
        for (name, overrides) in &self.modes {
            let field = format!("modes.{name}");
            let mode = Mode::parse(name)
                .ok_or_else(|| ConfigError::invalid_value(&field, "unknown mode"))?;
            if overrides.max_tokens == Some(0) || overrides.timeout_secs == Some(0) {
                return Err(ConfigError::invalid_value(&field, "limits must be positive"));
            }
            registry = registry.with_tier_limits(mode, overrides.max_tokens, overrides.timeout_secs);
        }
        Ok(registry)
    }

    /// Tier policy from `[tiers]`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] if the tiers are not ordered
    /// `baseline <= middle <= highest`.
    pub fn tier_policy(&self) -> Result<TierPolicy, ConfigError> {
        let tiers = &self.tiers;
        if !(tiers.baseline <= tiers.middle && tiers.middle <= tiers.highest) {
            return Err(ConfigError::invalid_value(
                "tiers",
                format!(
                    "expected baseline <= middle <= highest, got {} / {} / {}",
                    tiers.baseline, tiers.middle, tiers.highest
                ),
            ));
        }
        Ok(TierPolicy {
            context_threshold: tiers.context_threshold,
            baseline: tiers.baseline,
            middle: tiers.middle,
            highest: tiers.highest,
        })
    }
}

/// Router admission configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Mode in force at startup.
    pub default_mode: String,

    /// Maximum concurrently processing requests; 0 is unbounded.
    pub max_in_flight: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_mode: Mode::Archivist.name().into(),
            max_in_flight: 0,
        }
    }
}

impl RouterConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.default_mode != default.default_mode {
            self.default_mode = other.default_mode.clone();
        }
        if other.max_in_flight != default.max_in_flight {
            self.max_in_flight = other.max_in_flight;
        }
    }
}

/// Request retention configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Seconds a settled record stays queryable.
    pub retention_secs: u64,

    /// Seconds between eviction sweeps.
    pub sweep_interval_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            retention_secs: 1800,
            sweep_interval_secs: 60,
        }
    }
}

impl TrackerConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.retention_secs != default.retention_secs {
            self.retention_secs = other.retention_secs;
        }
        if other.sweep_interval_secs != default.sweep_interval_secs {
            self.sweep_interval_secs = other.sweep_interval_secs;
        }
    }

    /// Retention as a [`Duration`].
    #[must_use]
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    /// Sweep interval as a [`Duration`], at least one second.
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Tier selection configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TiersConfig {
    /// Context length above which the highest tier is selected.
    pub context_threshold: usize,

    /// Tier for ordinary requests.
    pub baseline: TierId,

    /// Tier for medium complexity or high urgency.
    pub middle: TierId,

    /// Tier for high complexity or large context.
    pub highest: TierId,
}

impl Default for TiersConfig {
    fn default() -> Self {
        let policy = TierPolicy::default();
        Self {
            context_threshold: policy.context_threshold,
            baseline: policy.baseline,
            middle: policy.middle,
            highest: policy.highest,
        }
    }
}

impl TiersConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.context_threshold != default.context_threshold {
            self.context_threshold = other.context_threshold;
        }
        if other.baseline != default.baseline {
            self.baseline = other.baseline;
        }
        if other.middle != default.middle {
            self.middle = other.middle;
        }
        if other.highest != default.highest {
            self.highest = other.highest;
        }
    }
}

/// Tier limit overrides for one mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ModeOverride {
    /// Replaces the mode's `max_tokens`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Replaces the mode's `timeout_secs`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ModeOverride {
    fn merge(&mut self, other: &Self) {
        if other.max_tokens.is_some() {
            self.max_tokens = other.max_tokens;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
    }
}
