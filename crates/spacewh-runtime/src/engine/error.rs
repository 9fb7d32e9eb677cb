//! Engine Layer Errors.
//!
//! This module defines errors for the engine collaborator and the
//! router in front of it. All errors implement [`ErrorCode`] for
//! standardized handling.
//!
//! # Error Codes
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`EngineFailure::Failed`] | `ENGINE_FAILED` | No |
//! | [`EngineFailure::Timeout`] | `ENGINE_TIMEOUT` | Yes |
//! | [`EngineFailure::Unavailable`] | `ENGINE_UNAVAILABLE` | Yes |
//! | [`RouterError::PermissionDenied`] | `AUTH_*` (delegated) | No |
//! | [`RouterError::InvalidRequest`] | `ROUTER_INVALID_REQUEST` | No |
//! | [`RouterError::Overloaded`] | `ROUTER_OVERLOADED` | Yes |
//! | [`RouterError::Tracker`] | `TRACKER_*` (delegated) | No |
//!
//! # Propagation
//!
//! [`RouterError`] is only ever returned synchronously from admission.
//! [`EngineFailure`] happens after admission and is recorded on the
//! request record as an [`ErrorDetail`](spacewh_types::ErrorDetail).

use crate::tracker::TrackerError;
use spacewh_auth::AccessDenied;
use spacewh_types::{ErrorCode, TierId};
use thiserror::Error;

/// Failure raised by (or on behalf of) an engine invocation.
///
/// # Example
///
/// ```
/// use spacewh_runtime::engine::EngineFailure;
/// use spacewh_types::ErrorCode;
///
/// let err = EngineFailure::Timeout { timeout_secs: 30 };
/// assert_eq!(err.code(), "ENGINE_TIMEOUT");
/// assert!(err.is_recoverable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineFailure {
    /// The engine returned an error.
    #[error("engine error: {0}")]
    Failed(String),

    /// The engine did not settle within the mode's timeout.
    #[error("engine timed out after {timeout_secs}s")]
    Timeout {
        /// Timeout that elapsed.
        timeout_secs: u64,
    },

    /// The tier has no engine able to take the request.
    #[error("engine unavailable for tier {0}")]
    Unavailable(TierId),
}

impl ErrorCode for EngineFailure {
    fn code(&self) -> &'static str {
        match self {
            Self::Failed(_) => "ENGINE_FAILED",
            Self::Timeout { .. } => "ENGINE_TIMEOUT",
            Self::Unavailable(_) => "ENGINE_UNAVAILABLE",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Unavailable(_))
    }
}

/// Admission-time router error.
///
/// None of these create a request record.
#[derive(Debug, Clone, Error)]
pub enum RouterError {
    /// The active mode lacks a required level or category.
    #[error("permission denied: {0}")]
    PermissionDenied(#[from] AccessDenied),

    /// Malformed or unsupported input.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Too many requests are processing.
    #[error("router overloaded: {limit} requests already in flight")]
    Overloaded {
        /// Configured in-flight bound.
        limit: usize,
    },

    /// Cancel or status lookup failed.
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

impl RouterError {
    /// Shorthand for [`RouterError::InvalidRequest`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

impl ErrorCode for RouterError {
    fn code(&self) -> &'static str {
        match self {
            Self::PermissionDenied(denied) => denied.code(),
            Self::InvalidRequest(_) => "ROUTER_INVALID_REQUEST",
            Self::Overloaded { .. } => "ROUTER_OVERLOADED",
            Self::Tracker(err) => err.code(),
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::PermissionDenied(_) | Self::InvalidRequest(_) => false,
            Self::Overloaded { .. } => true,
            Self::Tracker(err) => err.is_recoverable(),
        }
    }
}
