//! Event layer errors.
//!
//! Subscriber failures never propagate to the emitter. The bus catches
//! them, converts them into a [`HandlerError`] and logs it.
//!
//! # Error Codes
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`HandlerError::Failed`] | `EVENT_HANDLER_FAILED` | No |
//! | [`HandlerError::Panicked`] | `EVENT_HANDLER_PANICKED` | No |
//!
//! # Usage
//!
//! ```
//! use spacewh_event::HandlerError;
//! use spacewh_types::ErrorCode;
//!
//! let err = HandlerError::failed("index not loaded");
//! assert_eq!(err.code(), "EVENT_HANDLER_FAILED");
//! assert!(err.to_string().contains("index not loaded"));
//! ```

use spacewh_types::ErrorCode;
use thiserror::Error;

/// Failure raised by (or caught around) an event subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The handler returned an error.
    #[error("handler failed: {0}")]
    Failed(String),

    /// The handler panicked; the message is the panic payload if it was a string.
    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    /// Creates a [`HandlerError::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl ErrorCode for HandlerError {
    fn code(&self) -> &'static str {
        match self {
            Self::Failed(_) => "EVENT_HANDLER_FAILED",
            Self::Panicked(_) => "EVENT_HANDLER_PANICKED",
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

    fn all_variants() -> Vec<HandlerError> {
        vec![
            HandlerError::Failed("x".into()),
            HandlerError::Panicked("x".into()),
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "EVENT_");
    }

    #[test]
    fn handler_errors_not_recoverable() {
        for err in all_variants() {
            assert!(!err.is_recoverable());
        }
    }

    #[test]
    fn panicked_display() {
        let err = HandlerError::Panicked("boom".into());
        assert_eq!(err.to_string(), "handler panicked: boom");
    }
}
