//! In-process engine used by the CLI and tests.
//!
//! Answers every request with `"[Engine N] Response to: {message}"`.
//! Latency and failures can be injected per tier.

use super::backend::{CancelAck, Engine, InvokeOptions};
use super::error::EngineFailure;
use super::eventbus::EventBus;
use super::request::RequestPayload;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use spacewh_event::Event;
use spacewh_types::{RequestId, TierId};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// Calls kept in each call log; older entries are dropped first.
pub const CALL_LOG_CAPACITY: usize = 256;

fn push_bounded<T>(log: &Mutex<VecDeque<T>>, item: T) {
    let mut log = log.lock();
    if log.len() == CALL_LOG_CAPACITY {
        log.pop_front();
    }
    log.push_back(item);
}

/// One recorded call to [`SimulatedEngine::invoke`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Request id.
    pub request_id: RequestId,
    /// Tier the router chose.
    pub tier: TierId,
    /// Limits the router passed.
    pub options: InvokeOptions,
}

/// Canned engine with optional latency and failure injection.
///
/// # Example
///
/// ```
/// use spacewh_runtime::engine::{Engine, InvokeOptions, RequestPayload, SimulatedEngine};
/// use spacewh_auth::{Mode, ModeProfile};
/// use spacewh_types::{RequestId, TierId};
///
/// # tokio_test_block(async {
/// let engine = SimulatedEngine::new();
/// let options = InvokeOptions::from_profile(&ModeProfile::builtin(Mode::Archivist));
/// let result = engine
///     .invoke(RequestId::new(), TierId::Engine2, &RequestPayload::new("hi"), options)
///     .await
///     .unwrap();
/// assert_eq!(result["response"], "[Engine 2] Response to: hi");
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) {
/// #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SimulatedEngine {
    latency: HashMap<TierId, Duration>,
    failures: HashMap<TierId, String>,
    refuse_abort: Option<String>,
    invocations: Mutex<VecDeque<Invocation>>,
    cancels: Mutex<VecDeque<RequestId>>,
}

impl SimulatedEngine {
    /// Engine that answers immediately on every tier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every invocation on `tier` by `latency`.
    #[must_use]
    pub fn with_latency(mut self, tier: TierId, latency: Duration) -> Self {
        self.latency.insert(tier, latency);
        self
    }

    /// Delays every invocation on every tier by `latency`.
    #[must_use]
    pub fn with_uniform_latency(mut self, latency: Duration) -> Self {
        for tier in TierId::ALL {
            self.latency.insert(tier, latency);
        }
        self
    }

    /// Makes every invocation on `tier` fail with `message`.
    #[must_use]
    pub fn with_failure(mut self, tier: TierId, message: impl Into<String>) -> Self {
        self.failures.insert(tier, message.into());
        self
    }

    /// Makes `cancel` report that the work could not be stopped.
    #[must_use]
    pub fn refusing_abort(mut self, reason: impl Into<String>) -> Self {
        self.refuse_abort = Some(reason.into());
        self
    }

    /// Health of a tier as reported on `engine-status-change`.
    #[must_use]
    pub fn health(tier: TierId) -> &'static str {
        match tier {
            TierId::Engine1 | TierId::Engine2 | TierId::Engine3 => "operational",
            TierId::Engine4 => "in_development",
        }
    }

    /// Emits one `engine-status-change` per tier.
    pub fn announce(&self, bus: &EventBus) {
        for tier in TierId::ALL {
            bus.emit(&Event::engine_status(tier, Self::health(tier)));
        }
    }

    /// Most recent calls, in arrival order, up to [`CALL_LOG_CAPACITY`].
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().iter().cloned().collect()
    }

    /// Most recent ids passed to `cancel`, up to [`CALL_LOG_CAPACITY`].
    #[must_use]
    pub fn cancelled(&self) -> Vec<RequestId> {
        self.cancels.lock().iter().copied().collect()
    }
}

#[async_trait]
impl Engine for SimulatedEngine {
    async fn invoke(
        &self,
        request_id: RequestId,
        tier: TierId,
        payload: &RequestPayload,
        options: InvokeOptions,
    ) -> Result<Value, EngineFailure> {
        push_bounded(
            &self.invocations,
            Invocation {
                request_id,
                tier,
                options,
            },
        );
        tracing::debug!(request_id = %request_id, tier = %tier, "simulated invoke");

        if let Some(latency) = self.latency.get(&tier) {
            tokio::time::sleep(*latency).await;
        }

        if let Some(message) = self.failures.get(&tier) {
            return Err(EngineFailure::Failed(message.clone()));
        }

        Ok(json!({
            "response": format!("[Engine {}] Response to: {}", tier.rank(), payload.message),
            "engine": tier,
            "council": options.council,
            "maxTokens": options.max_tokens,
        }))
    }

    async fn cancel(&self, request_id: RequestId) -> CancelAck {
        push_bounded(&self.cancels, request_id);
        match &self.refuse_abort {
            Some(reason) => CancelAck::refused(reason.clone()),
            None => CancelAck::aborted(),
        }
    }
}
