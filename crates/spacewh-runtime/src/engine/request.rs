//! Inbound router requests and their acknowledgments.
//!
//! # Wire Shape
//!
//! ```json
//! {"source": "alice", "action": "process",
//!  "payload": {"message": "...", "context": ["..."]},
//!  "hints": {"complexity": "high"}}
//!
//! {"source": "alice", "action": "cancel", "request_id": "req:..."}
//!
//! {"source": "alice", "action": "status"}
//! ```

use super::error::RouterError;
use crate::tier::TierHints;
use crate::tracker::{CancelOutcome, StatusReport};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use spacewh_auth::Requirement;
use spacewh_types::{RequestId, SourceId, TierId};

/// Work handed to an engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestPayload {
    /// The prompt or query.
    pub message: String,
    /// Attached context passages.
    #[serde(default)]
    pub context: Vec<String>,
    /// Opaque caller metadata.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl RequestPayload {
    /// Payload with only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Appends a context passage.
    #[must_use]
    pub fn with_context(mut self, passage: impl Into<String>) -> Self {
        self.context.push(passage.into());
        self
    }

    /// Total characters across the context passages.
    #[must_use]
    pub fn context_len(&self) -> usize {
        self.context.iter().map(|c| c.chars().count()).sum()
    }
}

/// What the caller wants the router to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum RouteAction {
    /// Admit new work.
    Process {
        /// The work.
        payload: RequestPayload,
        /// Tier selection hints.
        #[serde(default)]
        hints: TierHints,
        /// Capability requirement checked against the active mode.
        #[serde(default)]
        requirement: Option<Requirement>,
    },
    /// Cancel a processing request.
    Cancel {
        /// Target request.
        #[serde(deserialize_with = "de_request_id", serialize_with = "ser_request_id")]
        request_id: RequestId,
        /// Bypass the ownership check.
        #[serde(default)]
        admin: bool,
    },
    /// Query one request, or the aggregate when absent.
    Status {
        /// Target request.
        #[serde(
            default,
            deserialize_with = "de_opt_request_id",
            serialize_with = "ser_opt_request_id"
        )]
        request_id: Option<RequestId>,
    },
}

/// An inbound request: who is asking and what for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Requesting source.
    pub source: SourceId,
    /// The action.
    #[serde(flatten)]
    pub action: RouteAction,
}

impl RouteRequest {
    /// `process` request.
    #[must_use]
    pub fn process(source: impl Into<SourceId>, payload: RequestPayload, hints: TierHints) -> Self {
        Self {
            source: source.into(),
            action: RouteAction::Process {
                payload,
                hints,
                requirement: None,
            },
        }
    }

    /// `process` request gated by `requirement`.
    #[must_use]
    pub fn process_requiring(
        source: impl Into<SourceId>,
        payload: RequestPayload,
        hints: TierHints,
        requirement: Requirement,
    ) -> Self {
        Self {
            source: source.into(),
            action: RouteAction::Process {
                payload,
                hints,
                requirement: Some(requirement),
            },
        }
    }

    /// `cancel` request.
    #[must_use]
    pub fn cancel(source: impl Into<SourceId>, request_id: RequestId, admin: bool) -> Self {
        Self {
            source: source.into(),
            action: RouteAction::Cancel { request_id, admin },
        }
    }

    /// `status` request.
    #[must_use]
    pub fn status(source: impl Into<SourceId>, request_id: Option<RequestId>) -> Self {
        Self {
            source: source.into(),
            action: RouteAction::Status { request_id },
        }
    }

    /// Parses and validates a JSON request.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidRequest`] for an unknown action, a
    /// malformed body, or an empty message.
    pub fn from_json(value: &Value) -> Result<Self, RouterError> {
        let request: Self = serde_json::from_value(value.clone())
            .map_err(|e| RouterError::invalid(e.to_string()))?;
        request.validate()?;
        Ok(request)
    }

    /// Checks invariants serde cannot express.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidRequest`] for an empty source or message.
    pub fn validate(&self) -> Result<(), RouterError> {
        if self.source.as_str().trim().is_empty() {
            return Err(RouterError::invalid("source must not be empty"));
        }
        if let RouteAction::Process { payload, .. } = &self.action {
            if payload.message.trim().is_empty() {
                return Err(RouterError::invalid("message must not be empty"));
            }
        }
        Ok(())
    }
}

/// Immediate answer to [`RouteRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum RouteResponse {
    /// Admitted; the work continues asynchronously.
    Accepted {
        /// Tracker id of the new record.
        request_id: RequestId,
        /// Tier the request was dispatched to.
        tier: TierId,
    },
    /// The request was cancelled.
    Cancelled(CancelOutcome),
    /// Status lookup result.
    Status(StatusReport),
}

impl RouteResponse {
    /// Request id for `Accepted`.
    #[must_use]
    pub fn accepted_id(&self) -> Option<RequestId> {
        match self {
            Self::Accepted { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }
}

fn de_request_id<'de, D>(deserializer: D) -> Result<RequestId, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    RequestId::parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid request id: {raw}")))
}

fn de_opt_request_id<'de, D>(deserializer: D) -> Result<Option<RequestId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => RequestId::parse(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid request id: {raw}"))),
        None => Ok(None),
    }
}

fn ser_request_id<S>(id: &RequestId, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(id)
}

fn ser_opt_request_id<S>(id: &Option<RequestId>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match id {
        Some(id) => serializer.collect_str(id),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::Complexity;
    use serde_json::json;
    use spacewh_types::ErrorCode;

    #[test]
    fn parse_process_request() {
        let req = RouteRequest::from_json(&json!({
            "source": "alice",
            "action": "process",
            "payload": {"message": "summarize", "context": ["abc", "de"]},
            "hints": {"complexity": "high"}
        }))
        .expect("valid request");

        assert_eq!(req.source.as_str(), "alice");
        match req.action {
            RouteAction::Process { payload, hints, requirement } => {
                assert_eq!(payload.context_len(), 5);
                assert_eq!(hints.complexity, Some(Complexity::High));
                assert!(requirement.is_none());
            }
            other => panic!("expected process, got {other:?}"),
        }
    }

    #[test]
    fn parse_cancel_accepts_prefixed_id() {
        let id = RequestId::new();
        let req = RouteRequest::from_json(&json!({
            "source": "alice",
            "action": "cancel",
            "request_id": id.to_string(),
            "admin": true
        }))
        .expect("valid cancel");
        assert_eq!(req.action, RouteAction::Cancel { request_id: id, admin: true });
    }

    #[test]
    fn parse_status_without_id() {
        let req = RouteRequest::from_json(&json!({"source": "ops", "action": "status"}))
            .expect("valid status");
        assert_eq!(req.action, RouteAction::Status { request_id: None });
    }

    #[test]
    fn unknown_action_is_invalid() {
        let err = RouteRequest::from_json(&json!({"source": "a", "action": "explode"}))
            .expect_err("unknown action");
        assert_eq!(err.code(), "ROUTER_INVALID_REQUEST");
    }

    #[test]
    fn empty_message_is_invalid() {
        let err = RouteRequest::from_json(&json!({
            "source": "a",
            "action": "process",
            "payload": {"message": "   "}
        }))
        .expect_err("empty message");
        assert!(err.to_string().contains("message"));
    }

    #[test]
    fn bad_request_id_is_invalid() {
        let err = RouteRequest::from_json(&json!({
            "source": "a",
            "action": "cancel",
            "request_id": "not-a-uuid"
        }))
        .expect_err("bad id");
        assert_eq!(err.code(), "ROUTER_INVALID_REQUEST");
    }

    #[test]
    fn context_len_counts_chars() {
        let payload = RequestPayload::new("q").with_context("héllo").with_context("");
        assert_eq!(payload.context_len(), 5);
    }

    #[test]
    fn request_serializes_back_to_wire_shape() {
        let id = RequestId::new();
        let value = serde_json::to_value(RouteRequest::cancel("bob", id, false)).expect("serialize");
        assert_eq!(value["action"], "cancel");
        assert_eq!(value["source"], "bob");
        assert_eq!(value["request_id"], id.to_string());
    }
}
