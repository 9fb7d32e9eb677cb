//! Audit-logging permission gate.
//!
//! [`ModeGate`] makes the same decisions as the registry it wraps, and
//! records every decision through `tracing`:
//!
//! - Allowed checks: debug level
//! - Denied checks: warn level
//!
//! # Example
//!
//! ```
//! use spacewh_runtime::auth::{Mode, ModeGate, PermissionPolicy, Requirement};
//!
//! let gate = ModeGate::builtin();
//! let req = Requirement::new("council_review").with_level(3);
//!
//! let denied = gate
//!     .check_capability(Some(Mode::Archivist), &req)
//!     .into_result()
//!     .unwrap_err();
//! assert_eq!(denied.current_level(), 1);
//! assert_eq!(denied.required_level(), Some(3));
//! ```

use spacewh_auth::{evaluate, Access, Category, Mode, ModeRegistry, PermissionPolicy, Requirement};
use std::sync::Arc;

/// Runtime permission gate backed by a shared [`ModeRegistry`].
#[derive(Debug, Clone)]
pub struct ModeGate {
    registry: Arc<ModeRegistry>,
}

impl ModeGate {
    /// Creates a gate over `registry`.
    #[must_use]
    pub fn new(registry: Arc<ModeRegistry>) -> Self {
        Self { registry }
    }

    /// Gate over the built-in mode table.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(Arc::new(ModeRegistry::builtin()))
    }

    /// Returns the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ModeRegistry> {
        &self.registry
    }
}

impl Default for ModeGate {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PermissionPolicy for ModeGate {
    fn level(&self, mode: Option<Mode>) -> u8 {
        self.registry.level(mode)
    }

    fn allowed_categories(&self, mode: Option<Mode>) -> Category {
        self.registry.allowed_categories(mode)
    }

    fn check_capability(&self, mode: Option<Mode>, requirement: &Requirement) -> Access {
        let access = evaluate(
            mode,
            self.level(mode),
            self.allowed_categories(mode),
            requirement,
        );

        // Audit logging
        match &access {
            Access::Allow => {
                tracing::debug!(
                    mode = Mode::display_name(mode),
                    capability = %requirement.capability,
                    "capability allowed"
                );
            }
            Access::Deny(denied) => {
                tracing::warn!(
                    mode = Mode::display_name(mode),
                    capability = %requirement.capability,
                    check = denied.check(),
                    current_level = denied.current_level(),
                    required_level = ?denied.required_level(),
                    "capability denied"
                );
            }
        }

        access
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacewh_auth::AccessDenied;

    #[test]
    fn archivist_cannot_reach_level_three() {
        let gate = ModeGate::builtin();
        let req = Requirement::new("council_review").with_level(3);

        let denied = gate
            .check_capability(Some(Mode::Archivist), &req)
            .into_result()
            .expect_err("archivist must be denied");
        assert!(matches!(
            denied,
            AccessDenied::InsufficientLevel {
                current_level: 1,
                required_level: 3,
                ..
            }
        ));
    }

    #[test]
    fn godfather_can_reach_level_three() {
        let gate = ModeGate::builtin();
        let req = Requirement::new("council_review").with_level(3);
        assert!(gate.check_capability(Some(Mode::Godfather), &req).is_allowed());
    }

    #[test]
    fn decisions_match_registry() {
        let gate = ModeGate::builtin();
        let registry = ModeRegistry::builtin();
        let reqs = [
            Requirement::new("a").with_level(2),
            Requirement::new("b").with_categories(Category::ADMIN_TOOLS),
            Requirement::new("c")
                .with_level(1)
                .with_categories(Category::READ_KNOWLEDGE),
        ];

        for mode in Mode::ALL.into_iter().map(Some).chain([None]) {
            for req in &reqs {
                assert_eq!(
                    gate.check_capability(mode, req),
                    registry.check_capability(mode, req),
                    "mode {mode:?} req {req:?}"
                );
            }
        }
    }

    #[test]
    fn shared_registry_overrides_visible() {
        let registry = Arc::new(
            ModeRegistry::builtin().with_tier_limits(Mode::Archivist, Some(10), None),
        );
        let gate = ModeGate::new(Arc::clone(&registry));
        assert_eq!(
            gate.registry().profile(Mode::Archivist).tier.max_tokens,
            10
        );
    }
}
