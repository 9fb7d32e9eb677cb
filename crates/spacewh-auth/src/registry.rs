//! Mode registry.
//!
//! The registry is an immutable table from [`Mode`] to [`ModeProfile`].
//! It is built once, optionally with per-mode tier overrides from
//! configuration, then shared read-only.
//!
//! All lookups take `Option<Mode>` so that an unknown or empty mode name
//! (`Mode::parse` returning `None`) fails closed: level 0, no categories.
//!
//! # Example
//!
//! ```
//! use spacewh_auth::{Category, Mode, ModeRegistry};
//!
//! let registry = ModeRegistry::builtin();
//!
//! assert!(registry.has_access(Some(Mode::Godfather), 3));
//! assert!(!registry.has_access(Some(Mode::Archivist), 3));
//!
//! // Unknown mode fails closed
//! assert_eq!(registry.level(Mode::parse("intruder")), 0);
//! assert!(registry.allowed_categories(None).is_empty());
//! ```

use crate::{Category, Mode, ModeProfile};

/// Immutable mode table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeRegistry {
    /// Indexed by `Mode::level() - 1`.
    profiles: [ModeProfile; 4],
}

impl ModeRegistry {
    /// Registry with the built-in profiles.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            profiles: Mode::ALL.map(ModeProfile::builtin),
        }
    }

    /// Overrides the tier limits of one mode.
    ///
    /// `None` keeps the current value. The tier ceiling and categories
    /// are not configurable.
    ///
    /// # Example
    ///
    /// ```
    /// use spacewh_auth::{Mode, ModeRegistry};
    ///
    /// let registry = ModeRegistry::builtin()
    ///     .with_tier_limits(Mode::Archivist, Some(512), None);
    ///
    /// assert_eq!(registry.profile(Mode::Archivist).tier.max_tokens, 512);
    /// assert_eq!(registry.profile(Mode::Archivist).tier.timeout_secs, 30);
    /// ```
    #[must_use]
    pub fn with_tier_limits(
        mut self,
        mode: Mode,
        max_tokens: Option<u32>,
        timeout_secs: Option<u64>,
    ) -> Self {
        let profile = &mut self.profiles[Self::index(mode)];
        if let Some(tokens) = max_tokens {
            profile.tier.max_tokens = tokens;
        }
        if let Some(secs) = timeout_secs {
            profile.tier.timeout_secs = secs;
        }
        self
    }

    fn index(mode: Mode) -> usize {
        usize::from(mode.level() - 1)
    }

    /// Returns the profile of a mode.
    #[must_use]
    pub fn profile(&self, mode: Mode) -> &ModeProfile {
        &self.profiles[Self::index(mode)]
    }

    /// Resolves a mode name to its profile.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&ModeProfile> {
        Mode::parse(name).map(|mode| self.profile(mode))
    }

    /// Returns all profiles in ascending level order.
    pub fn list_modes(&self) -> impl Iterator<Item = &ModeProfile> {
        self.profiles.iter()
    }

    /// Returns the level of a mode; `0` when unresolved.
    #[must_use]
    pub fn level(&self, mode: Option<Mode>) -> u8 {
        mode.map_or(0, Mode::level)
    }

    /// Returns the categories a mode allows; empty when unresolved.
    #[must_use]
    pub fn allowed_categories(&self, mode: Option<Mode>) -> Category {
        mode.map_or_else(Category::empty, |m| self.profile(m).categories)
    }

    /// Returns `true` if the mode's level is at least `required_level`.
    #[must_use]
    pub fn has_access(&self, mode: Option<Mode>, required_level: u8) -> bool {
        self.level(mode) >= required_level
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
