//! Event values delivered through the bus.
//!
//! An [`Event`] is a channel plus an arbitrary JSON payload. It has no
//! persisted identity: delivery is fire-and-forget to whichever
//! subscribers are registered at emit time.
//!
//! # Router Payloads
//!
//! Keys are camelCase so payloads can be forwarded to clients as-is.
//!
//! | Channel | Payload |
//! |---------|---------|
//! | `engine-request-complete` | `{requestId, sourceId, tier, result}` |
//! | `engine-request-error` | `{requestId, sourceId, tier, error: {code, message}}` |
//! | `engine-request-cancelled` | `{requestId, sourceId, cancelledBy, engineAborted}` |
//! | `mode-change` | `{previous, current, version}` |
//! | `engine-status-change` | `{tier, status}` |

use crate::EventChannel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use spacewh_types::{ErrorDetail, RequestId, SourceId, TierId};

/// A named channel plus structured payload.
///
/// # Example
///
/// ```
/// use spacewh_event::{Event, EventChannel};
/// use serde_json::json;
///
/// let event = Event::new("rag-index-ready", json!({"documents": 12}));
/// assert_eq!(event.channel, EventChannel::Custom("rag-index-ready".into()));
/// assert_eq!(event.payload["documents"], 12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Channel the event was emitted on.
    pub channel: EventChannel,
    /// Event body.
    pub payload: Value,
    /// Emission time.
    pub emitted_at: DateTime<Utc>,
}

impl Event {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(channel: impl Into<EventChannel>, payload: Value) -> Self {
        Self {
            channel: channel.into(),
            payload,
            emitted_at: Utc::now(),
        }
    }

    /// `engine-request-complete` for a request that settled successfully.
    #[must_use]
    pub fn request_completed(
        request_id: RequestId,
        source: &SourceId,
        tier: TierId,
        result: Value,
    ) -> Self {
        Self::new(
            EventChannel::EngineRequestComplete,
            json!({
                "requestId": request_id,
                "sourceId": source,
                "tier": tier,
                "result": result,
            }),
        )
    }

    /// `engine-request-error` for a request that failed or timed out.
    #[must_use]
    pub fn request_failed(
        request_id: RequestId,
        source: &SourceId,
        tier: TierId,
        error: &ErrorDetail,
    ) -> Self {
        Self::new(
            EventChannel::EngineRequestError,
            json!({
                "requestId": request_id,
                "sourceId": source,
                "tier": tier,
                "error": error,
            }),
        )
    }

    /// `engine-request-cancelled` after a successful cancel.
    ///
    /// `engine_aborted` is `false` when the engine could not stop the
    /// in-flight work and the record was cancelled for bookkeeping only;
    /// `reason` then carries the engine's explanation.
    #[must_use]
    pub fn request_cancelled(
        request_id: RequestId,
        source: &SourceId,
        cancelled_by: &SourceId,
        engine_aborted: bool,
        reason: Option<&str>,
    ) -> Self {
        Self::new(
            EventChannel::EngineRequestCancelled,
            json!({
                "requestId": request_id,
                "sourceId": source,
                "cancelledBy": cancelled_by,
                "engineAborted": engine_aborted,
                "reason": reason,
            }),
        )
    }

    /// `mode-change` with the previous and current mode names.
    #[must_use]
    pub fn mode_changed(previous: &str, current: &str, version: u64) -> Self {
        Self::new(
            EventChannel::ModeChange,
            json!({
                "previous": previous,
                "current": current,
                "version": version,
            }),
        )
    }

    /// `engine-status-change` reporting the health of one tier.
    #[must_use]
    pub fn engine_status(tier: TierId, status: &str) -> Self {
        Self::new(
            EventChannel::EngineStatusChange,
            json!({
                "tier": tier,
                "status": status,
            }),
        )
    }

    /// Reads `payload.requestId` as a [`RequestId`], if present and valid.
    #[must_use]
    pub fn request_id(&self) -> Option<RequestId> {
        self.payload
            .get("requestId")
            .and_then(Value::as_str)
            .and_then(RequestId::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_completed_payload_shape() {
        let id = RequestId::new();
        let event = Event::request_completed(
            id,
            &SourceId::new("alice"),
            TierId::Engine2,
            json!("done"),
        );

        assert_eq!(event.channel, EventChannel::EngineRequestComplete);
        assert_eq!(event.payload["sourceId"], "alice");
        assert_eq!(event.payload["tier"], "engine_2");
        assert_eq!(event.payload["result"], "done");
        assert_eq!(event.request_id(), Some(id));
    }

    #[test]
    fn request_failed_carries_error_detail() {
        let detail = ErrorDetail::new("ENGINE_TIMEOUT", "timed out after 30s");
        let event = Event::request_failed(
            RequestId::new(),
            &SourceId::new("bob"),
            TierId::Engine1,
            &detail,
        );

        assert_eq!(event.channel, EventChannel::EngineRequestError);
        assert_eq!(event.payload["error"]["code"], "ENGINE_TIMEOUT");
        assert_eq!(event.payload["error"]["message"], "timed out after 30s");
    }

    #[test]
    fn request_cancelled_payload_shape() {
        let event = Event::request_cancelled(
            RequestId::new(),
            &SourceId::new("alice"),
            &SourceId::new("admin"),
            false,
            Some("mid-stream"),
        );

        assert_eq!(event.payload["cancelledBy"], "admin");
        assert_eq!(event.payload["engineAborted"], false);
        assert_eq!(event.payload["reason"], "mid-stream");
    }

    #[test]
    fn request_cancelled_without_reason_is_null() {
        let event = Event::request_cancelled(
            RequestId::new(),
            &SourceId::new("alice"),
            &SourceId::new("alice"),
            true,
            None,
        );

        assert!(event.payload["reason"].is_null());
    }

    #[test]
    fn mode_changed_payload_shape() {
        let event = Event::mode_changed("archivist", "godfather", 3);
        assert_eq!(event.channel, EventChannel::ModeChange);
        assert_eq!(event.payload["previous"], "archivist");
        assert_eq!(event.payload["current"], "godfather");
        assert_eq!(event.payload["version"], 3);
    }

    #[test]
    fn engine_status_payload_shape() {
        let event = Event::engine_status(TierId::Engine4, "in_development");
        assert_eq!(event.channel, EventChannel::EngineStatusChange);
        assert_eq!(event.payload["tier"], "engine_4");
        assert_eq!(event.payload["status"], "in_development");
    }

    #[test]
    fn request_id_missing_or_invalid() {
        let event = Event::new(EventChannel::RequestComplete, json!({"requestId": 7}));
        assert_eq!(event.request_id(), None);

        let event = Event::new(EventChannel::RequestComplete, json!({}));
        assert_eq!(event.request_id(), None);
    }
}
