//! Engine collaborator contract.
//!
//! The router never produces responses itself. It hands each admitted
//! request to an [`Engine`] together with the tier it selected and the
//! limits of the mode the request was admitted under.
//!
//! ```text
//! EngineRouter ── invoke(id, tier, payload, options) ──► Engine
//!              ◄─ Result<Value, EngineFailure> ─────────
//!              ── cancel(id) ───────────────────────────►
//!              ◄─ CancelAck { success, reason } ────────
//! ```

use super::error::EngineFailure;
use super::request::RequestPayload;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use spacewh_auth::{CouncilProfile, ModeProfile};
use spacewh_types::{RequestId, TierId};

/// Per-invocation limits taken from the admitting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeOptions {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Invocation timeout; the router enforces it as well.
    pub timeout_secs: u64,
    /// Council sizing hint.
    pub council: CouncilProfile,
}

impl InvokeOptions {
    /// Options for requests admitted under `profile`.
    #[must_use]
    pub fn from_profile(profile: &ModeProfile) -> Self {
        Self {
            max_tokens: profile.tier.max_tokens,
            timeout_secs: profile.tier.timeout_secs,
            council: profile.council,
        }
    }
}

/// Engine answer to a cancel call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelAck {
    /// Whether the in-flight work was stopped.
    pub success: bool,
    /// Why it could not be stopped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CancelAck {
    /// Work was stopped.
    #[must_use]
    pub fn aborted() -> Self {
        Self {
            success: true,
            reason: None,
        }
    }

    /// Work could not be stopped.
    #[must_use]
    pub fn refused(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            reason: Some(reason.into()),
        }
    }
}

/// A tiered processing backend.
///
/// Implementations must tolerate `cancel` for ids they never saw or
/// that already settled, and may settle an invocation after it was
/// cancelled; the router ignores such late results.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Processes `payload` on `tier`.
    async fn invoke(
        &self,
        request_id: RequestId,
        tier: TierId,
        payload: &RequestPayload,
        options: InvokeOptions,
    ) -> Result<Value, EngineFailure>;

    /// Asks the engine to abort the work for `request_id`.
    async fn cancel(&self, request_id: RequestId) -> CancelAck;
}
