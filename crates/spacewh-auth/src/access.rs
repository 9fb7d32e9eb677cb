//! Capability requirements and access decisions.
//!
//! A [`Requirement`] states what an operation needs; checking it
//! against a mode yields an [`Access`].
//!
//! ```text
//! Requirement ──► PermissionPolicy::check_capability(mode, req) ──► Access
//!                                                                 ├─ Allow
//!                                                                 └─ Deny(AccessDenied)
//! ```

use crate::{AccessDenied, Category};
use serde::{Deserialize, Serialize};
use spacewh_types::TierId;

/// What a capability needs from the active mode.
///
/// Both constraints are optional; an empty requirement is always
/// satisfied by a resolved mode.
///
/// # Example
///
/// ```
/// use spacewh_auth::{Category, Requirement};
///
/// let req = Requirement::new("ingest_document")
///     .with_level(2)
///     .with_categories(Category::WRITE_KNOWLEDGE);
///
/// assert_eq!(req.min_level, Some(2));
/// assert!(req.categories.contains(Category::WRITE_KNOWLEDGE));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Capability name, used in denials and audit logs.
    pub capability: String,
    /// Minimum mode level.
    #[serde(default)]
    pub min_level: Option<u8>,
    /// Categories that must all be allowed.
    #[serde(default = "Category::empty")]
    pub categories: Category,
}

impl Requirement {
    /// Creates a requirement with no constraints.
    #[must_use]
    pub fn new(capability: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
            min_level: None,
            categories: Category::empty(),
        }
    }

    /// Requires at least `level`.
    #[must_use]
    pub fn with_level(mut self, level: u8) -> Self {
        self.min_level = Some(level);
        self
    }

    /// Requires every category in `categories`.
    #[must_use]
    pub fn with_categories(mut self, categories: Category) -> Self {
        self.categories |= categories;
        self
    }

    /// Requirement for dispatching to an explicit tier.
    ///
    /// A tier is usable by modes whose level reaches the tier rank.
    ///
    /// # Example
    ///
    /// ```
    /// use spacewh_auth::Requirement;
    /// use spacewh_types::TierId;
    ///
    /// let req = Requirement::for_tier(TierId::Engine3);
    /// assert_eq!(req.capability, "tier:engine_3");
    /// assert_eq!(req.min_level, Some(3));
    /// ```
    #[must_use]
    pub fn for_tier(tier: TierId) -> Self {
        Self::new(format!("tier:{tier}")).with_level(tier.rank())
    }
}

/// Outcome of a capability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// The capability may be used.
    Allow,
    /// The capability is denied, with structured detail.
    Deny(AccessDenied),
}

impl Access {
    /// Returns `true` if access is allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Returns `true` if access is denied.
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Deny(_))
    }

    /// Converts into a `Result` for `?` propagation.
    ///
    /// # Errors
    ///
    /// Returns the [`AccessDenied`] detail when denied.
    pub fn into_result(self) -> Result<(), AccessDenied> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(denied) => Err(denied),
        }
    }

    /// Returns a short status string for logs and status output.
    #[must_use]
    pub fn status_str(&self) -> &'static str {
        match self {
            Self::Allow => "allowed",
            Self::Deny(_) => "denied",
        }
    }
}
