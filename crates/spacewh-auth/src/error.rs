//! Access denied error type.
//!
//! [`AccessDenied`] carries enough structured detail for a caller to
//! build an actionable message: the mode in force, its level, and the
//! level or categories that were required.
//!
//! ```text
//! Requirement { min_level, categories }
//!        │               │
//!  InsufficientLevel  CategoryDenied
//! ```
//!
//! # Error Codes
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`AccessDenied::InsufficientLevel`] | `AUTH_LEVEL_DENIED` | No |
//! | [`AccessDenied::CategoryDenied`] | `AUTH_CATEGORY_DENIED` | No |

use crate::Category;
use spacewh_types::ErrorCode;
use thiserror::Error;

/// Capability denied for the active mode.
///
/// # Example
///
/// ```
/// use spacewh_auth::AccessDenied;
/// use spacewh_types::ErrorCode;
///
/// let err = AccessDenied::InsufficientLevel {
///     capability: "admin_console".into(),
///     mode: "archivist".into(),
///     current_level: 1,
///     required_level: 3,
/// };
///
/// assert_eq!(err.code(), "AUTH_LEVEL_DENIED");
/// assert_eq!(err.current_level(), 1);
/// assert!(err.to_string().contains("level 3"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// The mode's level is below the required minimum.
    #[error("'{capability}' requires level {required_level}, mode '{mode}' has level {current_level}")]
    InsufficientLevel {
        /// The capability that was attempted.
        capability: String,
        /// Name of the mode in force (`"none"` if unresolved).
        mode: String,
        /// Level of the mode in force.
        current_level: u8,
        /// Minimum level required.
        required_level: u8,
    },

    /// The mode does not allow one or more required categories.
    #[error("'{capability}' requires {required}, mode '{mode}' allows {allowed}")]
    CategoryDenied {
        /// The capability that was attempted.
        capability: String,
        /// Name of the mode in force (`"none"` if unresolved).
        mode: String,
        /// Level of the mode in force.
        current_level: u8,
        /// Required categories that are missing.
        required: Category,
        /// Categories the mode allows.
        allowed: Category,
    },
}

impl AccessDenied {
    /// Returns which check denied access: `"level"` or `"category"`.
    #[must_use]
    pub fn check(&self) -> &'static str {
        match self {
            Self::InsufficientLevel { .. } => "level",
            Self::CategoryDenied { .. } => "category",
        }
    }

    /// Returns the level of the mode that was in force.
    #[must_use]
    pub fn current_level(&self) -> u8 {
        match self {
            Self::InsufficientLevel { current_level, .. }
            | Self::CategoryDenied { current_level, .. } => *current_level,
        }
    }

    /// Returns the required level, for level denials.
    #[must_use]
    pub fn required_level(&self) -> Option<u8> {
        match self {
            Self::InsufficientLevel { required_level, .. } => Some(*required_level),
            Self::CategoryDenied { .. } => None,
        }
    }

    /// Returns the denied capability name.
    #[must_use]
    pub fn capability(&self) -> &str {
        match self {
            Self::InsufficientLevel { capability, .. } | Self::CategoryDenied { capability, .. } => {
                capability
            }
        }
    }
}

impl ErrorCode for AccessDenied {
    fn code(&self) -> &'static str {
        match self {
            Self::InsufficientLevel { .. } => "AUTH_LEVEL_DENIED",
            Self::CategoryDenied { .. } => "AUTH_CATEGORY_DENIED",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacewh_types::assert_error_codes;

    fn all_variants() -> Vec<AccessDenied> {
        vec![
            AccessDenied::InsufficientLevel {
                capability: "x".into(),
                mode: "archivist".into(),
                current_level: 1,
                required_level: 2,
            },
            AccessDenied::CategoryDenied {
                capability: "x".into(),
                mode: "archivist".into(),
                current_level: 1,
                required: Category::ADMIN_TOOLS,
                allowed: Category::BASIC_TOOLS,
            },
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "AUTH_");
    }

    #[test]
    fn category_denied_display() {
        let err = AccessDenied::CategoryDenied {
            capability: "ingest_document".into(),
            mode: "archivist".into(),
            current_level: 1,
            required: Category::WRITE_KNOWLEDGE,
            allowed: Category::BASIC_TOOLS | Category::READ_KNOWLEDGE,
        };

        let msg = err.to_string();
        assert!(msg.contains("ingest_document"), "got: {msg}");
        assert!(msg.contains("write_knowledge"), "got: {msg}");
        assert!(msg.contains("basic_tools | read_knowledge"), "got: {msg}");
        assert_eq!(err.check(), "category");
        assert_eq!(err.required_level(), None);
    }

    #[test]
    fn level_denied_accessors() {
        let err = &all_variants()[0];
        assert_eq!(err.check(), "level");
        assert_eq!(err.current_level(), 1);
        assert_eq!(err.required_level(), Some(2));
        assert_eq!(err.capability(), "x");
        assert!(!err.is_recoverable());
    }
}
