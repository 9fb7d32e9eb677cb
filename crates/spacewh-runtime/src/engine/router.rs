//! Engine router.
//!
//! Admits requests synchronously and processes them asynchronously.
//!
//! ```text
//! route(process)
//!     │ validate                     ── ROUTER_INVALID_REQUEST
//!     │ snapshot mode (once)
//!     │ gate requirement / override  ── AUTH_*
//!     │ select tier, clamp to ceiling
//!     │ acquire in-flight permit     ── ROUTER_OVERLOADED
//!     │ tracker.create               ── record: processing
//!     └ spawn dispatch ─────────────────────────────┐
//!   ◄── Accepted { request_id, tier }               │
//!                                                   ▼
//!              select! { cancelled, timeout(invoke) }
//!                   │ complete / fail (first terminal wins)
//!                   └ emit engine-request-complete / -error
//! ```
//!
//! Nothing after `tracker.create` is returned to the caller: engine
//! failures and timeouts are recorded on the record and emitted on the
//! bus.

use super::backend::{Engine, InvokeOptions};
use super::error::{EngineFailure, RouterError};
use super::eventbus::EventBus;
use super::request::{RequestPayload, RouteAction, RouteRequest, RouteResponse};
use crate::auth::ModeGate;
use crate::mode::{ModeChange, ModeChangeHook, ModeController, ModeSnapshot};
use crate::tier::{TierHints, TierReason, TierSelector};
use crate::tools::ToolProvider;
use crate::tracker::{AggregateStatus, RequestSnapshot, RequestTracker, Settlement};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::Value;
use spacewh_auth::{Category, PermissionPolicy, Requirement};
use spacewh_event::{Event, EventChannel, HandlerError};
use spacewh_types::{ErrorDetail, RequestId, SourceId, SubscriptionId, TierId};
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

/// Read-only view of the router for status surfaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemStatus {
    /// Mode in force and its version.
    pub mode: ModeSnapshot,
    /// Categories the mode allows.
    pub allowed_categories: Vec<&'static str>,
    /// Processing and tracked counts.
    #[serde(flatten)]
    pub aggregate: AggregateStatus,
    /// Processing requests, oldest first.
    pub in_flight: Vec<RequestSnapshot>,
    /// Last reported health per tier.
    pub engines: BTreeMap<TierId, String>,
    /// Whether a tool provider is attached.
    pub tools_attached: bool,
    /// Tools usable in the current mode.
    pub tools: usize,
    /// In-flight bound, 0 when unbounded.
    pub max_in_flight: usize,
}

/// Builder for [`EngineRouter`].
pub struct RouterBuilder {
    controller: Arc<ModeController>,
    bus: Arc<EventBus>,
    engine: Arc<dyn Engine>,
    gate: Option<ModeGate>,
    selector: TierSelector,
    tracker: Option<Arc<RequestTracker>>,
    tools: Option<Arc<dyn ToolProvider>>,
    max_in_flight: usize,
}

impl RouterBuilder {
    /// Uses `gate` instead of one over the controller's registry.
    #[must_use]
    pub fn gate(mut self, gate: ModeGate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Sets the tier selector.
    #[must_use]
    pub fn selector(mut self, selector: TierSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Shares an existing tracker.
    #[must_use]
    pub fn tracker(mut self, tracker: Arc<RequestTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Attaches the tool collaborator.
    #[must_use]
    pub fn tools(mut self, tools: Arc<dyn ToolProvider>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Bounds concurrently processing requests. 0 means unbounded.
    #[must_use]
    pub fn max_in_flight(mut self, limit: usize) -> Self {
        self.max_in_flight = limit;
        self
    }

    /// Builds the router, subscribes it to engine events and registers
    /// it as a mode change hook.
    #[must_use]
    pub fn build(self) -> Arc<EngineRouter> {
        let gate = self
            .gate
            .unwrap_or_else(|| ModeGate::new(Arc::clone(self.controller.registry())));
        let limiter = (self.max_in_flight > 0).then(|| Arc::new(Semaphore::new(self.max_in_flight)));

        let router = Arc::new(EngineRouter {
            controller: self.controller,
            bus: self.bus,
            engine: self.engine,
            gate,
            selector: self.selector,
            tracker: self.tracker.unwrap_or_default(),
            tools: self.tools,
            limiter,
            max_in_flight: self.max_in_flight,
            health: RwLock::new(BTreeMap::new()),
            last_change: RwLock::new(None),
            subscriptions: Mutex::new(Vec::new()),
        });

        let weak = Arc::downgrade(&router);
        let settle = router
            .bus
            .subscribe(EventChannel::RequestComplete, move |event| {
                match Weak::upgrade(&weak) {
                    Some(router) => router.on_engine_settlement(event),
                    None => Ok(()),
                }
            });

        let weak = Arc::downgrade(&router);
        let health = router
            .bus
            .subscribe(EventChannel::EngineStatusChange, move |event| {
                match Weak::upgrade(&weak) {
                    Some(router) => router.on_engine_status(event),
                    None => Ok(()),
                }
            });

        router.subscriptions.lock().extend([settle, health]);
        router.controller.register_hook(&router);
        tracing::debug!(max_in_flight = router.max_in_flight, "engine router ready");
        router
    }
}

/// Admits, dispatches, cancels and reports on engine requests.
///
/// # Example
///
/// ```
/// use spacewh_runtime::engine::{
///     EngineRouter, EventBus, RequestPayload, RouteRequest, SimulatedEngine,
/// };
/// use spacewh_runtime::mode::ModeController;
/// use spacewh_runtime::tier::TierHints;
/// use spacewh_auth::{Mode, ModeRegistry};
/// use spacewh_types::TierId;
/// use std::sync::Arc;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let bus = Arc::new(EventBus::new());
/// let controller = Arc::new(ModeController::new(
///     Arc::new(ModeRegistry::builtin()),
///     Arc::clone(&bus),
///     Mode::Orchestrator,
/// ));
/// let router = EngineRouter::builder(controller, bus, Arc::new(SimulatedEngine::new())).build();
///
/// let response = router
///     .route(RouteRequest::process("alice", RequestPayload::new("hi"), TierHints::default()))
///     .await
///     .unwrap();
/// assert!(response.accepted_id().is_some());
/// # });
/// ```
pub struct EngineRouter {
    controller: Arc<ModeController>,
    bus: Arc<EventBus>,
    engine: Arc<dyn Engine>,
    gate: ModeGate,
    selector: TierSelector,
    tracker: Arc<RequestTracker>,
    tools: Option<Arc<dyn ToolProvider>>,
    limiter: Option<Arc<Semaphore>>,
    max_in_flight: usize,
    health: RwLock<BTreeMap<TierId, String>>,
    last_change: RwLock<Option<ModeChange>>,
    subscriptions: Mutex<Vec<SubscriptionId>>,
}

impl EngineRouter {
    /// Starts a builder.
    #[must_use]
    pub fn builder(
        controller: Arc<ModeController>,
        bus: Arc<EventBus>,
        engine: Arc<dyn Engine>,
    ) -> RouterBuilder {
        RouterBuilder {
            controller,
            bus,
            engine,
            gate: None,
            selector: TierSelector::default(),
            tracker: None,
            tools: None,
            max_in_flight: 0,
        }
    }

    /// Returns the request tracker.
    #[must_use]
    pub fn tracker(&self) -> &Arc<RequestTracker> {
        &self.tracker
    }

    /// Returns the event bus.
    #[must_use]
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Returns the mode controller.
    #[must_use]
    pub fn controller(&self) -> &Arc<ModeController> {
        &self.controller
    }

    /// Returns the tier selector.
    #[must_use]
    pub fn selector(&self) -> &TierSelector {
        &self.selector
    }

    /// Categories allowed in the current mode.
    #[must_use]
    pub fn allowed_categories(&self) -> Category {
        self.controller.allowed_categories()
    }

    /// Last reported health of `tier`.
    #[must_use]
    pub fn engine_health(&self, tier: TierId) -> Option<String> {
        self.health.read().get(&tier).cloned()
    }

    /// Last mode switch observed by the router.
    #[must_use]
    pub fn last_mode_change(&self) -> Option<ModeChange> {
        *self.last_change.read()
    }

    /// Routes one request.
    ///
    /// `process` returns as soon as the request is admitted; the engine
    /// work continues in the background.
    ///
    /// # Errors
    ///
    /// - [`RouterError::InvalidRequest`] for an empty source or message
    /// - [`RouterError::PermissionDenied`] when the mode denies the
    ///   requirement or the tier override
    /// - [`RouterError::Overloaded`] when the in-flight bound is reached
    /// - [`RouterError::Tracker`] for a failed cancel or status lookup
    pub async fn route(&self, request: RouteRequest) -> Result<RouteResponse, RouterError> {
        request.validate()?;
        let RouteRequest { source, action } = request;

        match action {
            RouteAction::Process {
                payload,
                hints,
                requirement,
            } => self.admit(source, payload, &hints, requirement.as_ref()),
            RouteAction::Cancel { request_id, admin } => {
                self.cancel(&source, request_id, admin).await
            }
            RouteAction::Status { request_id } => {
                Ok(RouteResponse::Status(self.tracker.status(request_id)?))
            }
        }
    }

    /// Parses a JSON request and routes it.
    ///
    /// # Errors
    ///
    /// Same as [`route`](Self::route), plus
    /// [`RouterError::InvalidRequest`] for malformed JSON.
    pub async fn route_json(&self, value: &Value) -> Result<RouteResponse, RouterError> {
        let request = RouteRequest::from_json(value)?;
        self.route(request).await
    }

    fn admit(
        &self,
        source: SourceId,
        payload: RequestPayload,
        hints: &TierHints,
        requirement: Option<&Requirement>,
    ) -> Result<RouteResponse, RouterError> {
        let snapshot = self.controller.snapshot();
        let mode = snapshot.mode;
        let profile = self.controller.registry().profile(mode);

        if let Some(requirement) = requirement {
            self.gate
                .check_capability(Some(mode), requirement)
                .into_result()?;
        }
        if let Some(tier) = hints.tier {
            self.gate
                .check_capability(Some(mode), &Requirement::for_tier(tier))
                .into_result()?;
        }

        let decision = self.selector.decide(hints, payload.context_len());
        let ceiling = profile.tier.engine;
        let tier = match decision.reason {
            TierReason::Override => decision.tier,
            _ => decision.tier.min(ceiling),
        };

        let permit = self.acquire_permit()?;
        let options = InvokeOptions::from_profile(profile);
        let request_id = self
            .tracker
            .create(source.clone(), payload.clone(), tier, mode);
        let token = self
            .tracker
            .cancellation_token(request_id)
            .unwrap_or_default();

        tracing::info!(
            request_id = %request_id,
            source = %source,
            mode = %mode,
            mode_version = snapshot.version,
            tier = %tier,
            reason = decision.reason.as_str(),
            "request admitted"
        );

        let dispatch = Dispatch {
            request_id,
            source,
            tier,
            payload,
            options,
            engine: Arc::clone(&self.engine),
            tracker: Arc::clone(&self.tracker),
            bus: Arc::clone(&self.bus),
            token,
            _permit: permit,
        };
        tokio::spawn(dispatch.run());

        Ok(RouteResponse::Accepted { request_id, tier })
    }

    fn acquire_permit(&self) -> Result<Option<OwnedSemaphorePermit>, RouterError> {
        let Some(limiter) = &self.limiter else {
            return Ok(None);
        };
        match Arc::clone(limiter).try_acquire_owned() {
            Ok(permit) => Ok(Some(permit)),
            Err(_) => {
                tracing::warn!(limit = self.max_in_flight, "request rejected: router overloaded");
                Err(RouterError::Overloaded {
                    limit: self.max_in_flight,
                })
            }
        }
    }

    async fn cancel(
        &self,
        requester: &SourceId,
        request_id: RequestId,
        admin: bool,
    ) -> Result<RouteResponse, RouterError> {
        let outcome = self
            .tracker
            .cancel(request_id, requester, admin, self.engine.as_ref())
            .await?;

        self.bus.emit(&Event::request_cancelled(
            outcome.request_id,
            &outcome.source,
            &outcome.cancelled_by,
            outcome.engine_aborted,
            outcome.reason.as_deref(),
        ));
        Ok(RouteResponse::Cancelled(outcome))
    }

    /// Current mode, counts, engine health and tool availability.
    #[must_use]
    pub fn system_status(&self) -> SystemStatus {
        let mode = self.controller.snapshot();
        SystemStatus {
            mode,
            allowed_categories: self
                .controller
                .registry()
                .allowed_categories(Some(mode.mode))
                .names(),
            aggregate: self.tracker.aggregate(),
            in_flight: self.tracker.in_flight(),
            engines: self.health.read().clone(),
            tools_attached: self.tools.is_some(),
            tools: self.tools.as_ref().map_or(0, |t| t.discover().len()),
            max_in_flight: self.max_in_flight,
        }
    }

    /// Handles an engine-originated `request-complete`.
    ///
    /// The payload is `{requestId, result}` or `{requestId, error: {code, message}}`.
    fn on_engine_settlement(&self, event: &Event) -> Result<(), HandlerError> {
        let request_id = event
            .request_id()
            .ok_or_else(|| HandlerError::failed("request-complete without a valid requestId"))?;

        let snapshot = match self.tracker.snapshot(request_id) {
            Ok(snapshot) => snapshot,
            Err(_) => {
                tracing::warn!(request_id = %request_id, "engine settlement for unknown request ignored");
                return Ok(());
            }
        };

        let outcome = match event.payload.get("error") {
            Some(error) => Err(serde_json::from_value::<ErrorDetail>(error.clone())
                .map_err(|e| HandlerError::failed(format!("malformed error detail: {e}")))?),
            None => Ok(event.payload.get("result").cloned().unwrap_or(Value::Null)),
        };

        let settlement = settle(
            &self.tracker,
            &self.bus,
            request_id,
            &snapshot.source,
            snapshot.tier,
            outcome,
        );
        if settlement.is_applied() {
            // stop the dispatch task still awaiting the engine
            if let Some(token) = self.tracker.cancellation_token(request_id) {
                token.cancel();
            }
        }
        Ok(())
    }

    fn on_engine_status(&self, event: &Event) -> Result<(), HandlerError> {
        let tier = event
            .payload
            .get("tier")
            .and_then(Value::as_str)
            .and_then(TierId::parse)
            .ok_or_else(|| HandlerError::failed("engine-status-change without a valid tier"))?;
        let status = event
            .payload
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| HandlerError::failed("engine-status-change without a status"))?;

        let previous = self.health.write().insert(tier, status.to_string());
        if previous.as_deref() != Some(status) {
            tracing::info!(tier = %tier, status, "engine status changed");
        }
        Ok(())
    }
}

impl ModeChangeHook for EngineRouter {
    fn hook_name(&self) -> &str {
        "router"
    }

    fn on_mode_change(&self, change: &ModeChange) {
        *self.last_change.write() = Some(*change);
        tracing::info!(
            previous = %change.previous,
            current = %change.current,
            version = change.version,
            in_flight = self.tracker.aggregate().processing,
            "router applies new mode to subsequent requests"
        );
    }
}

impl Drop for EngineRouter {
    fn drop(&mut self) {
        for id in self.subscriptions.get_mut().drain(..) {
            self.bus.unsubscribe(id);
        }
    }
}

impl std::fmt::Debug for EngineRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineRouter")
            .field("mode", &self.controller.snapshot())
            .field("tracked", &self.tracker.len())
            .field("max_in_flight", &self.max_in_flight)
            .finish_non_exhaustive()
    }
}

/// Records a settlement and emits the matching event if it applied.
fn settle(
    tracker: &RequestTracker,
    bus: &EventBus,
    request_id: RequestId,
    source: &SourceId,
    tier: TierId,
    outcome: Result<Value, ErrorDetail>,
) -> Settlement {
    match outcome {
        Ok(result) => {
            let settlement = tracker.complete(request_id, result.clone());
            if settlement.is_applied() {
                bus.emit(&Event::request_completed(request_id, source, tier, result));
            }
            settlement
        }
        Err(detail) => {
            tracing::warn!(
                request_id = %request_id,
                tier = %tier,
                code = %detail.code,
                error = %detail.message,
                "engine request failed"
            );
            let settlement = tracker.fail(request_id, detail.clone());
            if settlement.is_applied() {
                bus.emit(&Event::request_failed(request_id, source, tier, &detail));
            }
            settlement
        }
    }
}

/// One admitted request on its way to the engine.
struct Dispatch {
    request_id: RequestId,
    source: SourceId,
    tier: TierId,
    payload: RequestPayload,
    options: InvokeOptions,
    engine: Arc<dyn Engine>,
    tracker: Arc<RequestTracker>,
    bus: Arc<EventBus>,
    token: CancellationToken,
    /// Held until the request settles.
    _permit: Option<OwnedSemaphorePermit>,
}

impl Dispatch {
    async fn run(self) {
        let timeout = Duration::from_secs(self.options.timeout_secs);
        let invoke = self
            .engine
            .invoke(self.request_id, self.tier, &self.payload, self.options);

        let outcome = tokio::select! {
            biased;
            () = self.token.cancelled() => {
                tracing::debug!(request_id = %self.request_id, "dispatch stopped: request already settled");
                return;
            }
            result = tokio::time::timeout(timeout, invoke) => match result {
                Ok(result) => result,
                Err(_) => Err(EngineFailure::Timeout {
                    timeout_secs: self.options.timeout_secs,
                }),
            },
        };

        settle(
            &self.tracker,
            &self.bus,
            self.request_id,
            &self.source,
            self.tier,
            outcome.map_err(|failure| ErrorDetail::from_error(&failure)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SimulatedEngine;
    use crate::tier::Complexity;
    use crate::tracker::RequestStatus;
    use serde_json::json;
    use spacewh_auth::{Mode, ModeRegistry};
    use spacewh_types::ErrorCode;

    fn setup(mode: Mode, engine: SimulatedEngine) -> Arc<EngineRouter> {
        let bus = Arc::new(EventBus::new());
        let controller = Arc::new(ModeController::new(
            Arc::new(ModeRegistry::builtin()),
            Arc::clone(&bus),
            mode,
        ));
        EngineRouter::builder(controller, bus, Arc::new(engine)).build()
    }

    async fn wait_terminal(router: &EngineRouter, id: RequestId) -> RequestSnapshot {
        for _ in 0..1000 {
            let snapshot = router.tracker().snapshot(id).expect("tracked");
            if snapshot.status.is_terminal() {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("request {id} never settled");
    }

    fn process(message: &str, hints: TierHints) -> RouteRequest {
        RouteRequest::process("alice", RequestPayload::new(message), hints)
    }

    #[tokio::test]
    async fn process_completes_and_emits() {
        let router = setup(Mode::Godfather, SimulatedEngine::new());
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        router
            .bus()
            .subscribe(EventChannel::EngineRequestComplete, move |event| {
                sink.lock().push(event.payload.clone());
                Ok(())
            });

        let response = router
            .route(process("summarize", TierHints::default().complexity(Complexity::High)))
            .await
            .expect("admitted");
        let RouteResponse::Accepted { request_id, tier } = response else {
            panic!("expected Accepted, got {response:?}");
        };
        assert_eq!(tier, TierId::Engine3);

        let snapshot = wait_terminal(&router, request_id).await;
        assert_eq!(snapshot.status, RequestStatus::Completed);
        assert_eq!(
            snapshot.result.as_ref().map(|r| r["response"].clone()),
            Some(json!("[Engine 3] Response to: summarize"))
        );

        let events = events.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["sourceId"], "alice");
        assert_eq!(events[0]["tier"], "engine_3");
    }

    #[tokio::test]
    async fn automatic_tier_is_clamped_to_mode_ceiling() {
        let router = setup(Mode::Archivist, SimulatedEngine::new());
        let response = router
            .route(process("deep question", TierHints::default().complexity(Complexity::High)))
            .await
            .expect("admitted");
        assert!(matches!(
            response,
            RouteResponse::Accepted { tier: TierId::Engine1, .. }
        ));
    }

    #[tokio::test]
    async fn override_above_ceiling_is_denied_without_record() {
        let router = setup(Mode::Archivist, SimulatedEngine::new());
        let err = router
            .route(process("x", TierHints::with_tier(TierId::Engine3)))
            .await
            .expect_err("denied");
        assert_eq!(err.code(), "AUTH_LEVEL_DENIED");
        assert!(router.tracker().is_empty());
    }

    #[tokio::test]
    async fn engine_failure_is_recorded_not_returned() {
        let engine = SimulatedEngine::new().with_failure(TierId::Engine1, "model crashed");
        let router = setup(Mode::Archivist, engine);
        let id = router
            .route(process("x", TierHints::default()))
            .await
            .expect("admission succeeds")
            .accepted_id()
            .expect("accepted");

        let snapshot = wait_terminal(&router, id).await;
        assert_eq!(snapshot.status, RequestStatus::Error);
        assert_eq!(snapshot.error.map(|e| e.code), Some("ENGINE_FAILED".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn external_settlement_wins_and_late_engine_result_is_ignored() {
        let engine = SimulatedEngine::new().with_uniform_latency(Duration::from_secs(10));
        let router = setup(Mode::Archivist, engine);
        let id = router
            .route(process("x", TierHints::default()))
            .await
            .expect("admitted")
            .accepted_id()
            .expect("accepted");

        router.bus().emit(&Event::new(
            EventChannel::RequestComplete,
            json!({"requestId": id, "result": "from engine callback"}),
        ));
        let snapshot = router.tracker().snapshot(id).expect("tracked");
        assert_eq!(snapshot.status, RequestStatus::Completed);
        assert_eq!(snapshot.result, Some(json!("from engine callback")));

        tokio::time::sleep(Duration::from_secs(20)).await;
        let snapshot = router.tracker().snapshot(id).expect("tracked");
        assert_eq!(snapshot.result, Some(json!("from engine callback")));
    }

    #[test]
    fn engine_status_updates_health() {
        let router = setup(Mode::Archivist, SimulatedEngine::new());
        SimulatedEngine::new().announce(router.bus());
        assert_eq!(router.engine_health(TierId::Engine1).as_deref(), Some("operational"));
        assert_eq!(router.engine_health(TierId::Engine4).as_deref(), Some("in_development"));

        let report = router.bus().publish(EventChannel::EngineStatusChange, json!({"tier": "warp"}));
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn mode_change_is_observed() {
        let router = setup(Mode::Archivist, SimulatedEngine::new());
        router.controller().set_mode(Mode::Entity);
        let change = router.last_mode_change().expect("hook ran");
        assert_eq!(change.current, Mode::Entity);
        assert_eq!(router.system_status().mode.version, 1);
        assert!(router.allowed_categories().contains(Category::UNRESTRICTED));
    }

    #[test]
    fn drop_unsubscribes() {
        let router = setup(Mode::Archivist, SimulatedEngine::new());
        let bus = Arc::clone(router.bus());
        assert_eq!(bus.subscriber_count(&EventChannel::RequestComplete), 1);
        drop(router);
        assert_eq!(bus.subscriber_count(&EventChannel::RequestComplete), 0);
        assert_eq!(bus.subscriber_count(&EventChannel::EngineStatusChange), 0);
    }

    #[tokio::test]
    async fn status_without_id_reports_aggregate() {
        let router = setup(Mode::Archivist, SimulatedEngine::new());
        let response = router
            .route_json(&json!({"source": "ops", "action": "status"}))
            .await
            .expect("status");
        let RouteResponse::Status(report) = response else {
            panic!("expected Status");
        };
        assert!(report.request.is_none());
        assert_eq!(report.aggregate.processing, 0);
    }
}
