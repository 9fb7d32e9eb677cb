//! Permission policy trait.
//!
//! Defines [`PermissionPolicy`], the permission gate abstraction. It
//! lives here so that both the tool layer and the router in
//! `spacewh-runtime` can depend on it without knowing which policy is
//! wired in.
//!
//! # Architecture
//!
//! ```text
//! PermissionPolicy trait (spacewh-auth)   <- pure lookups, no side effects
//!          │
//!          ├── ModeRegistry (spacewh-auth)  <- table lookups, silent
//!          │
//!          └── ModeGate (spacewh-runtime)   <- same decisions, audit-logged
//! ```
//!
//! # Decision Order
//!
//! 1. Level: `level(mode) >= requirement.min_level`
//! 2. Categories: `requirement.categories ⊆ allowed_categories(mode)`
//!
//! The first failing check produces the [`AccessDenied`] detail.

use crate::{Access, AccessDenied, Category, Mode, ModeRegistry, Requirement};

/// The permission gate.
///
/// Implementors supply the two lookups; capability checks are derived
/// from them. Implementations must not cache decisions across mode
/// changes: callers pass the mode they want evaluated on every call.
///
/// # Example
///
/// ```
/// use spacewh_auth::{Category, Mode, ModeRegistry, PermissionPolicy, Requirement};
///
/// let gate = ModeRegistry::builtin();
/// let req = Requirement::new("admin_console").with_level(3);
///
/// let access = gate.check_capability(Some(Mode::Archivist), &req);
/// assert!(access.is_denied());
///
/// let access = gate.check_capability(Some(Mode::Godfather), &req);
/// assert!(access.is_allowed());
/// ```
pub trait PermissionPolicy: Send + Sync {
    /// Level of `mode`; `0` when unresolved.
    fn level(&self, mode: Option<Mode>) -> u8;

    /// Categories allowed for `mode`; empty when unresolved.
    fn allowed_categories(&self, mode: Option<Mode>) -> Category;

    /// Returns `true` if `mode` reaches `required_level`.
    fn has_access(&self, mode: Option<Mode>, required_level: u8) -> bool {
        self.level(mode) >= required_level
    }

    /// Checks a capability requirement against `mode`.
    fn check_capability(&self, mode: Option<Mode>, requirement: &Requirement) -> Access {
        evaluate(
            mode,
            self.level(mode),
            self.allowed_categories(mode),
            requirement,
        )
    }
}

/// Evaluates a requirement against already-resolved mode facts.
///
/// Shared by every [`PermissionPolicy`] so decisions stay identical
/// whether or not the implementation logs.
#[must_use]
pub fn evaluate(
    mode: Option<Mode>,
    current_level: u8,
    allowed: Category,
    requirement: &Requirement,
) -> Access {
    let mode_name = Mode::display_name(mode);

    // Unresolved modes never pass, even for empty requirements.
    if mode.is_none() {
        return Access::Deny(AccessDenied::InsufficientLevel {
            capability: requirement.capability.clone(),
            mode: mode_name.to_string(),
            current_level,
            required_level: requirement.min_level.unwrap_or(1).max(1),
        });
    }

    if let Some(required_level) = requirement.min_level {
        if current_level < required_level {
            return Access::Deny(AccessDenied::InsufficientLevel {
                capability: requirement.capability.clone(),
                mode: mode_name.to_string(),
                current_level,
                required_level,
            });
        }
    }

    let missing = requirement.categories - allowed;
    if !missing.is_empty() {
        return Access::Deny(AccessDenied::CategoryDenied {
            capability: requirement.capability.clone(),
            mode: mode_name.to_string(),
            current_level,
            required: missing,
            allowed,
        });
    }

    Access::Allow
}

impl PermissionPolicy for ModeRegistry {
    fn level(&self, mode: Option<Mode>) -> u8 {
        ModeRegistry::level(self, mode)
    }

    fn allowed_categories(&self, mode: Option<Mode>) -> Category {
        ModeRegistry::allowed_categories(self, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> ModeRegistry {
        ModeRegistry::builtin()
    }

    #[test]
    fn archivist_denied_level_three() {
        let req = Requirement::new("council_review").with_level(3);
        let access = gate().check_capability(Some(Mode::Archivist), &req);

        match access {
            Access::Deny(AccessDenied::InsufficientLevel {
                current_level,
                required_level,
                ref mode,
                ..
            }) => {
                assert_eq!(current_level, 1);
                assert_eq!(required_level, 3);
                assert_eq!(mode, "archivist");
            }
            other => panic!("expected level denial, got {other:?}"),
        }
    }

    #[test]
    fn category_denial_reports_missing_only() {
        let req = Requirement::new("ingest")
            .with_categories(Category::READ_KNOWLEDGE | Category::WRITE_KNOWLEDGE);
        let access = gate().check_capability(Some(Mode::Archivist), &req);

        match access {
            Access::Deny(AccessDenied::CategoryDenied {
                required, allowed, ..
            }) => {
                assert_eq!(required, Category::WRITE_KNOWLEDGE);
                assert_eq!(allowed, Category::BASIC_TOOLS | Category::READ_KNOWLEDGE);
            }
            other => panic!("expected category denial, got {other:?}"),
        }
    }

    #[test]
    fn level_checked_before_categories() {
        let req = Requirement::new("x")
            .with_level(4)
            .with_categories(Category::UNRESTRICTED);
        let access = gate().check_capability(Some(Mode::Godfather), &req);
        let denied = access.into_result().expect_err("denied");
        assert_eq!(denied.check(), "level");
    }

    #[test]
    fn unknown_mode_fails_closed() {
        let gate = gate();
        assert!(gate
            .check_capability(None, &Requirement::new("anything"))
            .is_denied());
        assert!(gate
            .check_capability(Mode::parse(""), &Requirement::new("echo"))
            .is_denied());
        assert!(!gate.has_access(None, 1));
        assert!(gate.allowed_categories(None).is_empty());

        let denied = gate
            .check_capability(None, &Requirement::new("x").with_level(3))
            .into_result()
            .expect_err("denied");
        assert_eq!(denied.current_level(), 0);
        assert_eq!(denied.required_level(), Some(3));
    }

    #[test]
    fn empty_requirement_allowed_for_any_mode() {
        for mode in Mode::ALL {
            assert!(gate()
                .check_capability(Some(mode), &Requirement::new("ping"))
                .is_allowed());
        }
    }

    #[test]
    fn tier_requirement_follows_ceiling() {
        use spacewh_types::TierId;

        let gate = gate();
        let req = Requirement::for_tier(TierId::Engine4);
        assert!(gate.check_capability(Some(Mode::Godfather), &req).is_denied());
        assert!(gate.check_capability(Some(Mode::Entity), &req).is_allowed());
    }
}
