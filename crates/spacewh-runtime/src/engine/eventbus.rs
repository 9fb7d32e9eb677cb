//! EventBus - in-process notification between subsystems.
//!
//! The [`EventBus`] carries cross-component notifications: routed
//! request outcomes, mode changes, and engine-originated status reports.
//!
//! # Delivery
//!
//! ```text
//! ┌─────────────┐  emit(event)  ┌──────────────────────────────┐
//! │   Emitter   │ ────────────► │ channel ─► [h1, h2, h3, ...] │
//! │ (router,    │               │   (registration order)       │
//! │  controller)│               └──────────────────────────────┘
//! └─────────────┘                  each call isolated: Err/panic
//!                                  is logged, delivery continues
//! ```
//!
//! - Synchronous: `emit` returns after every handler has run.
//! - Ordered: handlers run in registration order.
//! - Isolated: a handler returning [`HandlerError`] or panicking is logged
//!   and skipped; the emitter and the other handlers are unaffected.
//! - Volatile: no replay, no queueing, no persistence. Handlers
//!   registered after an emit never see that event.
//! - Unknown channel: emitting with no subscribers is a silent no-op.
//!
//! # Reentrancy
//!
//! The handler list is snapshotted before delivery and the lock is
//! released, so handlers may subscribe, unsubscribe, or emit.

use parking_lot::RwLock;
use spacewh_event::{Event, EventChannel, HandlerError};
use spacewh_types::{ErrorCode, SubscriptionId};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Subscriber callback.
pub type Handler = Arc<dyn Fn(&Event) -> Result<(), HandlerError> + Send + Sync>;

struct Subscriber {
    id: SubscriptionId,
    handler: Handler,
}

/// Result of one [`EventBus::emit`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitReport {
    /// Handlers that returned `Ok`.
    pub delivered: usize,
    /// Handlers that returned an error or panicked.
    pub failed: usize,
}

impl EmitReport {
    /// Total handlers invoked.
    #[must_use]
    pub fn total(&self) -> usize {
        self.delivered + self.failed
    }
}

/// EventBus - routes events from emitters to channel subscribers.
///
/// # Thread Safety
///
/// `EventBus` is `Send + Sync`; share it behind an `Arc`.
///
/// # Example
///
/// ```
/// use spacewh_runtime::engine::EventBus;
/// use spacewh_event::{Event, EventChannel};
/// use serde_json::json;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let bus = EventBus::new();
/// let seen = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&seen);
///
/// bus.subscribe(EventChannel::ModeChange, move |_event| {
///     counter.fetch_add(1, Ordering::SeqCst);
///     Ok(())
/// });
///
/// bus.emit(&Event::new(EventChannel::ModeChange, json!({})));
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// ```
#[derive(Default)]
pub struct EventBus {
    channels: RwLock<HashMap<EventChannel, Vec<Subscriber>>>,
}

impl EventBus {
    /// Create new EventBus
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` to the channel's handler list.
    pub fn subscribe<F>(&self, channel: impl Into<EventChannel>, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        let channel = channel.into();
        let id = SubscriptionId::new();
        tracing::debug!(channel = %channel, subscription = %id, "subscribed");

        self.channels
            .write()
            .entry(channel)
            .or_default()
            .push(Subscriber {
                id,
                handler: Arc::new(handler),
            });
        id
    }

    /// Removes a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut channels = self.channels.write();
        let mut removed = false;
        for subscribers in channels.values_mut() {
            let before = subscribers.len();
            subscribers.retain(|s| s.id != id);
            removed |= subscribers.len() != before;
        }
        channels.retain(|_, subscribers| !subscribers.is_empty());
        removed
    }

    /// Returns the number of handlers on `channel`.
    #[must_use]
    pub fn subscriber_count(&self, channel: &EventChannel) -> usize {
        self.channels.read().get(channel).map_or(0, Vec::len)
    }

    /// Returns the channels that currently have subscribers.
    #[must_use]
    pub fn channels(&self) -> Vec<EventChannel> {
        self.channels.read().keys().cloned().collect()
    }

    /// Delivers `event` to every handler registered on its channel.
    ///
    /// Never fails; see [`EmitReport`] for what happened.
    pub fn emit(&self, event: &Event) -> EmitReport {
        let handlers: Vec<(SubscriptionId, Handler)> = {
            let channels = self.channels.read();
            match channels.get(&event.channel) {
                Some(subscribers) => subscribers
                    .iter()
                    .map(|s| (s.id, Arc::clone(&s.handler)))
                    .collect(),
                None => return EmitReport::default(),
            }
        };

        let mut report = EmitReport::default();
        for (id, handler) in handlers {
            let outcome = catch_unwind(AssertUnwindSafe(|| handler(event)))
                .unwrap_or_else(|panic| Err(HandlerError::Panicked(panic_message(&*panic))));

            match outcome {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    report.failed += 1;
                    match &err {
                        HandlerError::Failed(_) => tracing::warn!(
                            channel = %event.channel,
                            subscription = %id,
                            code = err.code(),
                            error = %err,
                            "event handler failed"
                        ),
                        HandlerError::Panicked(_) => tracing::error!(
                            channel = %event.channel,
                            subscription = %id,
                            code = err.code(),
                            error = %err,
                            "event handler panicked"
                        ),
                    }
                }
            }
        }

        tracing::trace!(
            channel = %event.channel,
            delivered = report.delivered,
            failed = report.failed,
            "event emitted"
        );
        report
    }

    /// Builds an [`Event`] and emits it.
    pub fn publish(&self, channel: impl Into<EventChannel>, payload: serde_json::Value) -> EmitReport {
        self.emit(&Event::new(channel, payload))
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let channels = self.channels.read();
        let counts: HashMap<&str, usize> = channels
            .iter()
            .map(|(channel, subscribers)| (channel.name(), subscribers.len()))
            .collect();
        f.debug_struct("EventBus").field("channels", &counts).finish()
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
