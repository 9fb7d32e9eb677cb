//! Mode controller errors.
//!
//! # Error Codes
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`ModeError::UnknownMode`] | `MODE_UNKNOWN` | No |

use spacewh_types::ErrorCode;
use thiserror::Error;

/// Mode switch failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModeError {
    /// The name is not one of the known modes.
    #[error("unknown mode '{0}' (expected archivist, orchestrator, godfather or entity)")]
    UnknownMode(String),
}

impl ErrorCode for ModeError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownMode(_) => "MODE_UNKNOWN",
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

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&[ModeError::UnknownMode("root".into())], "MODE_");
    }
}
