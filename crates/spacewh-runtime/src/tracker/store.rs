//! Concurrent request store.
//!
//! Records live in a [`DashMap`] of `Arc<Mutex<RequestRecord>>`:
//!
//! - Different ids never contend beyond a DashMap shard.
//! - Every mutation of one id holds that record's mutex, so transitions
//!   on the same record are linearized.
//! - Map guards are dropped before a record mutex is taken. The only
//!   place both are held is [`RequestTracker::sweep_expired`], which
//!   always takes the map first, so lock order is consistent.

use super::error::TrackerError;
use super::record::{RequestRecord, RequestSnapshot, RequestStatus};
use crate::engine::{Engine, RequestPayload};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use spacewh_auth::Mode;
use spacewh_types::{ErrorDetail, RequestId, SourceId, TierId};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Default time a terminal record stays queryable.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(30 * 60);

/// Outcome of [`RequestTracker::complete`] / [`RequestTracker::fail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The record moved to the terminal status.
    Applied,
    /// No record with this id.
    Missing,
    /// The record was already terminal; nothing changed.
    AlreadyTerminal(RequestStatus),
}

impl Settlement {
    /// Returns `true` if the record changed.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Successful cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancelOutcome {
    /// Cancelled record.
    pub request_id: RequestId,
    /// Owner of the record.
    pub source: SourceId,
    /// Who cancelled it.
    pub cancelled_by: SourceId,
    /// Whether the engine stopped the in-flight work.
    pub engine_aborted: bool,
    /// Engine's reason when it could not abort.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Live counts across all tracked records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateStatus {
    /// Records currently processing.
    pub processing: usize,
    /// All records currently tracked, terminal included.
    pub tracked: usize,
}

/// Answer to a status query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    /// The requested record, when an id was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestSnapshot>,
    /// Aggregate counts at query time.
    #[serde(flatten)]
    pub aggregate: AggregateStatus,
}

/// Concurrent-safe store of request lifecycle records.
///
/// # Example
///
/// ```
/// use spacewh_runtime::engine::RequestPayload;
/// use spacewh_runtime::tracker::{RequestStatus, RequestTracker, Settlement};
/// use spacewh_auth::Mode;
/// use spacewh_types::{SourceId, TierId};
/// use serde_json::json;
///
/// let tracker = RequestTracker::default();
/// let id = tracker.create(
///     SourceId::new("alice"),
///     RequestPayload::new("hi"),
///     TierId::Engine1,
///     Mode::Archivist,
/// );
///
/// assert_eq!(tracker.complete(id, json!("done")), Settlement::Applied);
/// // First terminal transition wins
/// assert_eq!(
///     tracker.complete(id, json!("again")),
///     Settlement::AlreadyTerminal(RequestStatus::Completed)
/// );
/// ```
#[derive(Debug)]
pub struct RequestTracker {
    records: DashMap<RequestId, Arc<Mutex<RequestRecord>>>,
    retention: Duration,
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}

impl RequestTracker {
    /// Creates a tracker that keeps terminal records for `retention`.
    #[must_use]
    pub fn new(retention: Duration) -> Self {
        Self {
            records: DashMap::new(),
            retention,
        }
    }

    /// Returns the retention window.
    #[must_use]
    pub fn retention(&self) -> Duration {
        self.retention
    }

    fn entry(&self, id: RequestId) -> Option<Arc<Mutex<RequestRecord>>> {
        self.records.get(&id).map(|r| Arc::clone(r.value()))
    }

    /// Stores a new `processing` record under a fresh id.
    pub fn create(
        &self,
        source: SourceId,
        payload: RequestPayload,
        tier: TierId,
        mode: Mode,
    ) -> RequestId {
        let mut record = RequestRecord::new(RequestId::new(), source, payload, tier, mode);
        loop {
            match self.records.entry(record.id) {
                dashmap::mapref::entry::Entry::Vacant(slot) => {
                    let id = record.id;
                    tracing::debug!(
                        request_id = %id,
                        source = %record.source,
                        tier = %tier,
                        mode = %mode,
                        "request record created"
                    );
                    slot.insert(Arc::new(Mutex::new(record)));
                    return id;
                }
                dashmap::mapref::entry::Entry::Occupied(_) => {
                    record.id = RequestId::new();
                }
            }
        }
    }

    /// Cancellation token tripped when the record is cancelled.
    #[must_use]
    pub fn cancellation_token(&self, id: RequestId) -> Option<CancellationToken> {
        self.entry(id).map(|record| record.lock().token.clone())
    }

    fn settle_with(
        &self,
        id: RequestId,
        status: RequestStatus,
        apply: impl FnOnce(&mut RequestRecord),
    ) -> Settlement {
        let Some(record) = self.entry(id) else {
            tracing::warn!(request_id = %id, to = %status, "settlement for unknown request ignored");
            return Settlement::Missing;
        };

        let mut record = record.lock();
        if record.status.is_terminal() {
            tracing::warn!(
                request_id = %id,
                current = %record.status,
                to = %status,
                "settlement for terminal request ignored"
            );
            return Settlement::AlreadyTerminal(record.status);
        }

        apply(&mut record);
        record.settle(status);
        tracing::debug!(
            request_id = %id,
            status = %status,
            duration_ms = record.duration_ms(),
            "request settled"
        );
        Settlement::Applied
    }

    /// Marks a processing record `completed` with `result`.
    pub fn complete(&self, id: RequestId, result: Value) -> Settlement {
        self.settle_with(id, RequestStatus::Completed, |record| {
            record.result = Some(result);
        })
    }

    /// Marks a processing record `error` with `error`.
    pub fn fail(&self, id: RequestId, error: ErrorDetail) -> Settlement {
        self.settle_with(id, RequestStatus::Error, |record| {
            record.error = Some(error);
        })
    }

    /// Cancels a processing record on behalf of `requester`.
    ///
    /// The record is claimed (moved to `cancelled`, token tripped) under
    /// its lock before the engine is asked to abort, so of two
    /// concurrent cancels exactly one succeeds. If the engine cannot
    /// abort, the record stays `cancelled` and the outcome says so.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::NotFound`] for an unknown id
    /// - [`TrackerError::Unauthorized`] if `requester` is not the owner
    ///   and `is_admin` is false; the record is left unchanged
    /// - [`TrackerError::Conflict`] if the record is already terminal
    pub async fn cancel(
        &self,
        id: RequestId,
        requester: &SourceId,
        is_admin: bool,
        engine: &dyn Engine,
    ) -> Result<CancelOutcome, TrackerError> {
        let record = self.entry(id).ok_or(TrackerError::NotFound(id))?;

        let source = {
            let mut record = record.lock();
            if record.source != *requester && !is_admin {
                tracing::warn!(
                    request_id = %id,
                    owner = %record.source,
                    requester = %requester,
                    "cancel denied: not the owner"
                );
                return Err(TrackerError::Unauthorized {
                    request_id: id,
                    requester: requester.clone(),
                });
            }
            if record.status.is_terminal() {
                return Err(TrackerError::Conflict {
                    request_id: id,
                    status: record.status,
                });
            }

            record.cancelled_by = Some(requester.clone());
            record.settle(RequestStatus::Cancelled);
            record.token.cancel();
            record.source.clone()
        };

        let ack = engine.cancel(id).await;
        if ack.success {
            tracing::info!(request_id = %id, cancelled_by = %requester, "request cancelled");
        } else {
            tracing::warn!(
                request_id = %id,
                cancelled_by = %requester,
                reason = ack.reason.as_deref().unwrap_or("unspecified"),
                "engine could not abort; request cancelled for bookkeeping only"
            );
        }

        Ok(CancelOutcome {
            request_id: id,
            source,
            cancelled_by: requester.clone(),
            engine_aborted: ack.success,
            reason: ack.reason,
        })
    }

    /// Snapshot of one record.
    ///
    /// # Errors
    ///
    /// [`TrackerError::NotFound`] for an unknown or evicted id.
    pub fn snapshot(&self, id: RequestId) -> Result<RequestSnapshot, TrackerError> {
        self.entry(id)
            .map(|record| record.lock().snapshot())
            .ok_or(TrackerError::NotFound(id))
    }

    /// Counts processing and tracked records.
    #[must_use]
    pub fn aggregate(&self) -> AggregateStatus {
        let records: Vec<_> = self.records.iter().map(|r| Arc::clone(r.value())).collect();
        let processing = records
            .iter()
            .filter(|record| !record.lock().status.is_terminal())
            .count();
        AggregateStatus {
            processing,
            tracked: records.len(),
        }
    }

    /// Status of one record plus aggregate counts, or aggregate counts only.
    ///
    /// # Errors
    ///
    /// [`TrackerError::NotFound`] when `id` is given but unknown.
    pub fn status(&self, id: Option<RequestId>) -> Result<StatusReport, TrackerError> {
        let request = id.map(|id| self.snapshot(id)).transpose()?;
        Ok(StatusReport {
            request,
            aggregate: self.aggregate(),
        })
    }

    /// Snapshots of every processing record, oldest first.
    #[must_use]
    pub fn in_flight(&self) -> Vec<RequestSnapshot> {
        let records: Vec<_> = self.records.iter().map(|r| Arc::clone(r.value())).collect();
        let mut snapshots: Vec<RequestSnapshot> = records
            .iter()
            .map(|record| record.lock().snapshot())
            .filter(|snapshot| !snapshot.status.is_terminal())
            .collect();
        snapshots.sort_by_key(|s| s.submitted_at);
        snapshots
    }

    /// Number of tracked records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Removes a terminal record now, regardless of retention.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::NotFound`] for an unknown id
    /// - [`TrackerError::Conflict`] if the record is still processing
    pub fn evict(&self, id: RequestId) -> Result<RequestSnapshot, TrackerError> {
        if let Some((_, record)) = self
            .records
            .remove_if(&id, |_, record| record.lock().status.is_terminal())
        {
            let snapshot = record.lock().snapshot();
            tracing::debug!(request_id = %id, status = %snapshot.status, "request evicted");
            return Ok(snapshot);
        }

        match self.entry(id) {
            Some(record) => Err(TrackerError::Conflict {
                request_id: id,
                status: record.lock().status,
            }),
            None => Err(TrackerError::NotFound(id)),
        }
    }

    /// Evicts every terminal record whose retention window has elapsed.
    ///
    /// Returns the number of evicted records.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let retention = self.retention;
        let before = self.records.len();

        self.records.retain(|_, record| {
            let record = record.lock();
            !record
                .settled_at
                .is_some_and(|settled| now.duration_since(settled) >= retention)
        });

        let evicted = before.saturating_sub(self.records.len());
        if evicted > 0 {
            tracing::debug!(evicted, remaining = self.records.len(), "expired requests swept");
        }
        evicted
    }

    /// Spawns a task that calls [`sweep_expired`](Self::sweep_expired)
    /// every `interval` until `shutdown` is cancelled.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        let tracker = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    () = shutdown.cancelled() => {
                        tracing::debug!("request sweeper stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        tracker.sweep_expired();
                    }
                }
            }
        })
    }
}
