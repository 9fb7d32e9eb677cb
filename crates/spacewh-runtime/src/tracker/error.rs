//! Request tracker errors.
//!
//! # Error Codes
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`TrackerError::NotFound`] | `TRACKER_NOT_FOUND` | No |
//! | [`TrackerError::Unauthorized`] | `TRACKER_UNAUTHORIZED` | No |
//! | [`TrackerError::Conflict`] | `TRACKER_CONFLICT` | No |

use super::RequestStatus;
use spacewh_types::{ErrorCode, RequestId, SourceId};
use thiserror::Error;

/// Tracker operation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// No record with this id (never admitted, or already evicted).
    #[error("request not found: {0}")]
    NotFound(RequestId),

    /// The requester does not own the record and is not an admin.
    #[error("'{requester}' is not allowed to cancel {request_id}")]
    Unauthorized {
        /// Target record.
        request_id: RequestId,
        /// Who asked.
        requester: SourceId,
    },

    /// The operation needs a processing record, but it is terminal
    /// (or the reverse, for eviction).
    #[error("request {request_id} is {status}")]
    Conflict {
        /// Target record.
        request_id: RequestId,
        /// Status the record was found in.
        status: RequestStatus,
    },
}

impl ErrorCode for TrackerError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "TRACKER_NOT_FOUND",
            Self::Unauthorized { .. } => "TRACKER_UNAUTHORIZED",
            Self::Conflict { .. } => "TRACKER_CONFLICT",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
