//! Request records and their read-only snapshots.

use crate::engine::RequestPayload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use spacewh_auth::Mode;
use spacewh_types::{ErrorDetail, RequestId, SourceId, TierId};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Lifecycle status of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Dispatched, not yet settled.
    Processing,
    /// Settled with a result.
    Completed,
    /// Settled with an error.
    Error,
    /// Cancelled before settling.
    Cancelled,
}

impl RequestStatus {
    /// Returns true if this is a terminal status.
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Processing)
    }

    /// Returns the status name for logging.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable lifecycle record, owned by the tracker.
///
/// Only reachable through the tracker's per-record lock.
#[derive(Debug)]
pub struct RequestRecord {
    /// Unique id.
    pub id: RequestId,
    /// Who submitted the request.
    pub source: SourceId,
    /// Admission time.
    pub submitted_at: DateTime<Utc>,
    /// Current status.
    pub status: RequestStatus,
    /// Time of the terminal transition.
    pub completed_at: Option<DateTime<Utc>>,
    /// Present only when `Completed`.
    pub result: Option<Value>,
    /// Present only when `Error`.
    pub error: Option<ErrorDetail>,
    /// Who cancelled it, when `Cancelled`.
    pub cancelled_by: Option<SourceId>,
    /// Resolved tier.
    pub tier: TierId,
    /// Mode in force at admission.
    pub mode: Mode,
    /// Original payload.
    pub payload: RequestPayload,
    pub(crate) started: Instant,
    pub(crate) settled_at: Option<Instant>,
    pub(crate) token: CancellationToken,
}

impl RequestRecord {
    pub(crate) fn new(
        id: RequestId,
        source: SourceId,
        payload: RequestPayload,
        tier: TierId,
        mode: Mode,
    ) -> Self {
        Self {
            id,
            source,
            submitted_at: Utc::now(),
            status: RequestStatus::Processing,
            completed_at: None,
            result: None,
            error: None,
            cancelled_by: None,
            tier,
            mode,
            payload,
            started: Instant::now(),
            settled_at: None,
            token: CancellationToken::new(),
        }
    }

    /// Moves to a terminal status and stamps the settlement time.
    pub(crate) fn settle(&mut self, status: RequestStatus) {
        debug_assert!(status.is_terminal());
        self.status = status;
        self.completed_at = Some(Utc::now());
        self.settled_at = Some(Instant::now());
    }

    /// Milliseconds from admission to settlement, or to now if processing.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        let end = self.settled_at.unwrap_or_else(Instant::now);
        u64::try_from(end.duration_since(self.started).as_millis()).unwrap_or(u64::MAX)
    }

    /// Copies the externally visible fields.
    #[must_use]
    pub fn snapshot(&self) -> RequestSnapshot {
        RequestSnapshot {
            id: self.id,
            source: self.source.clone(),
            status: self.status,
            submitted_at: self.submitted_at,
            completed_at: self.completed_at,
            result: self.result.clone(),
            error: self.error.clone(),
            cancelled_by: self.cancelled_by.clone(),
            tier: self.tier,
            mode: self.mode,
            message: self.payload.message.clone(),
            duration_ms: self.duration_ms(),
        }
    }
}

/// Read-only copy of a [`RequestRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestSnapshot {
    /// Unique id.
    pub id: RequestId,
    /// Who submitted the request.
    pub source: SourceId,
    /// Status when the snapshot was taken.
    pub status: RequestStatus,
    /// Admission time.
    pub submitted_at: DateTime<Utc>,
    /// Time of the terminal transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Result, when completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error, when failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
    /// Who cancelled it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_by: Option<SourceId>,
    /// Resolved tier.
    pub tier: TierId,
    /// Mode in force at admission.
    pub mode: Mode,
    /// Original message.
    pub message: String,
    /// Elapsed processing time.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> RequestRecord {
        RequestRecord::new(
            RequestId::new(),
            SourceId::new("alice"),
            RequestPayload::new("hello"),
            TierId::Engine1,
            Mode::Archivist,
        )
    }

    #[test]
    fn new_record_is_processing() {
        let record = record();
        assert_eq!(record.status, RequestStatus::Processing);
        assert!(record.completed_at.is_none());
        assert!(record.settled_at.is_none());
        assert!(!record.token.is_cancelled());
    }

    #[test]
    fn settle_stamps_times() {
        let mut record = record();
        record.settle(RequestStatus::Completed);
        assert!(record.status.is_terminal());
        assert!(record.completed_at.is_some());
        assert!(record.settled_at.is_some());
    }

    #[test]
    fn snapshot_serializes_without_empty_fields() {
        let snapshot = record().snapshot();
        let value = serde_json::to_value(&snapshot).expect("serialize");
        assert_eq!(value["status"], "processing");
        assert_eq!(value["mode"], "archivist");
        assert_eq!(value["tier"], "engine_1");
        assert_eq!(value["message"], "hello");
        assert!(value.get("result").is_none());
        assert!(value.get("error").is_none());
    }

    #[test]
    fn only_processing_is_non_terminal() {
        assert!(!RequestStatus::Processing.is_terminal());
        assert!(RequestStatus::Completed.is_terminal());
        assert!(RequestStatus::Error.is_terminal());
        assert!(RequestStatus::Cancelled.is_terminal());
    }
}
