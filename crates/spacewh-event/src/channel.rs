//! Named event channels.
//!
//! Subscribers register against a channel; emitters publish to a
//! channel. Channel identity is its wire name.
//!
//! # Well-known Channels
//!
//! | Channel | Name | Emitted by |
//! |---------|------|------------|
//! | [`ModeChange`](EventChannel::ModeChange) | `mode-change` | `ModeController` |
//! | [`EngineRequestComplete`](EventChannel::EngineRequestComplete) | `engine-request-complete` | `EngineRouter` |
//! | [`EngineRequestError`](EventChannel::EngineRequestError) | `engine-request-error` | `EngineRouter` |
//! | [`EngineRequestCancelled`](EventChannel::EngineRequestCancelled) | `engine-request-cancelled` | `EngineRouter` |
//! | [`RequestComplete`](EventChannel::RequestComplete) | `request-complete` | engine collaborator |
//! | [`EngineStatusChange`](EventChannel::EngineStatusChange) | `engine-status-change` | engine collaborator |
//!
//! Any other name maps to [`Custom`](EventChannel::Custom):
//!
//! ```
//! use spacewh_event::EventChannel;
//!
//! assert_eq!(EventChannel::from("mode-change"), EventChannel::ModeChange);
//! assert_eq!(
//!     EventChannel::from("rag-index-ready"),
//!     EventChannel::Custom("rag-index-ready".into())
//! );
//! ```

use serde::{Deserialize, Serialize};

/// Event channel identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum EventChannel {
    /// Operational mode switched.
    ModeChange,
    /// A routed request settled successfully.
    EngineRequestComplete,
    /// A routed request failed or timed out.
    EngineRequestError,
    /// A routed request was cancelled.
    EngineRequestCancelled,
    /// An engine reports an out-of-band completion.
    RequestComplete,
    /// An engine reports a health change for a tier.
    EngineStatusChange,
    /// Any other channel, by name.
    Custom(String),
}

impl EventChannel {
    /// Returns the wire name of the channel.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::ModeChange => "mode-change",
            Self::EngineRequestComplete => "engine-request-complete",
            Self::EngineRequestError => "engine-request-error",
            Self::EngineRequestCancelled => "engine-request-cancelled",
            Self::RequestComplete => "request-complete",
            Self::EngineStatusChange => "engine-status-change",
            Self::Custom(name) => name,
        }
    }

    /// Returns `true` for channels published by the router itself.
    #[must_use]
    pub fn is_router_outcome(&self) -> bool {
        matches!(
            self,
            Self::EngineRequestComplete | Self::EngineRequestError | Self::EngineRequestCancelled
        )
    }
}

impl From<&str> for EventChannel {
    fn from(name: &str) -> Self {
        match name {
            "mode-change" => Self::ModeChange,
            "engine-request-complete" => Self::EngineRequestComplete,
            "engine-request-error" => Self::EngineRequestError,
            "engine-request-cancelled" => Self::EngineRequestCancelled,
            "request-complete" => Self::RequestComplete,
            "engine-status-change" => Self::EngineStatusChange,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for EventChannel {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<EventChannel> for String {
    fn from(channel: EventChannel) -> Self {
        match channel {
            EventChannel::Custom(name) => name,
            other => other.name().to_string(),
        }
    }
}

impl std::fmt::Display for EventChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
