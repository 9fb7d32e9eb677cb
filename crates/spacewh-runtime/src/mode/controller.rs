//! Mode controller.

use super::error::ModeError;
use crate::engine::EventBus;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use spacewh_auth::{Category, Mode, ModeProfile, ModeRegistry};
use spacewh_event::Event;
use std::sync::{Arc, Weak};

/// The mode in force and how many switches preceded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeSnapshot {
    /// Current mode.
    pub mode: Mode,
    /// Incremented on every switch; starts at 0.
    pub version: u64,
}

/// Describes one applied switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeChange {
    /// Mode before the switch.
    pub previous: Mode,
    /// Mode after the switch.
    pub current: Mode,
    /// Version of the new snapshot.
    pub version: u64,
}

impl ModeChange {
    /// Snapshot after the switch.
    #[must_use]
    pub fn snapshot(&self) -> ModeSnapshot {
        ModeSnapshot {
            mode: self.current,
            version: self.version,
        }
    }
}

/// Subsystem callback run synchronously on every mode switch.
///
/// Hooks run while the switch is still in progress, so they must not
/// call [`ModeController::set_mode`] themselves.
pub trait ModeChangeHook: Send + Sync {
    /// Hook name for logs.
    fn hook_name(&self) -> &str;

    /// Called after the new snapshot is visible and `mode-change` was emitted.
    fn on_mode_change(&self, change: &ModeChange);
}

/// Owner of the process-wide operational mode.
///
/// # Example
///
/// ```
/// use spacewh_runtime::engine::EventBus;
/// use spacewh_runtime::mode::ModeController;
/// use spacewh_auth::{Mode, ModeRegistry};
/// use std::sync::Arc;
///
/// let controller = ModeController::new(
///     Arc::new(ModeRegistry::builtin()),
///     Arc::new(EventBus::new()),
///     Mode::Archivist,
/// );
///
/// let change = controller.set_operational_mode("Godfather").unwrap();
/// assert_eq!(change.previous, Mode::Archivist);
/// assert_eq!(controller.snapshot().version, 1);
///
/// assert!(controller.set_operational_mode("root").is_err());
/// assert_eq!(controller.current(), Mode::Godfather);
/// ```
pub struct ModeController {
    registry: Arc<ModeRegistry>,
    bus: Arc<EventBus>,
    current: RwLock<ModeSnapshot>,
    /// Serializes switches so versions, events and hooks stay in order.
    switching: Mutex<()>,
    hooks: RwLock<Vec<Weak<dyn ModeChangeHook>>>,
}

impl ModeController {
    /// Creates a controller starting in `initial` at version 0.
    #[must_use]
    pub fn new(registry: Arc<ModeRegistry>, bus: Arc<EventBus>, initial: Mode) -> Self {
        Self {
            registry,
            bus,
            current: RwLock::new(ModeSnapshot {
                mode: initial,
                version: 0,
            }),
            switching: Mutex::new(()),
            hooks: RwLock::new(Vec::new()),
        }
    }

    /// Returns the mode registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ModeRegistry> {
        &self.registry
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ModeSnapshot {
        *self.current.read()
    }

    /// Returns the current mode.
    #[must_use]
    pub fn current(&self) -> Mode {
        self.snapshot().mode
    }

    /// Returns the profile of the current mode.
    #[must_use]
    pub fn profile(&self) -> &ModeProfile {
        self.registry.profile(self.current())
    }

    /// Categories allowed in the current mode.
    #[must_use]
    pub fn allowed_categories(&self) -> Category {
        self.registry.allowed_categories(Some(self.current()))
    }

    /// Registers a hook. The controller holds it weakly; a dropped hook
    /// is skipped and pruned.
    pub fn register_hook<H: ModeChangeHook + 'static>(&self, hook: &Arc<H>) {
        let weak = Arc::downgrade(hook);
        let weak: Weak<dyn ModeChangeHook> = weak;
        tracing::debug!(hook = hook.hook_name(), "mode change hook registered");
        self.hooks.write().push(weak);
    }

    /// Number of live hooks.
    #[must_use]
    pub fn hook_count(&self) -> usize {
        self.hooks
            .read()
            .iter()
            .filter(|h| h.strong_count() > 0)
            .count()
    }

    /// Validates `name` and switches to it.
    ///
    /// # Errors
    ///
    /// [`ModeError::UnknownMode`] if `name` is not a known mode; the
    /// current mode is left unchanged.
    pub fn set_operational_mode(&self, name: &str) -> Result<ModeChange, ModeError> {
        let Some(mode) = Mode::parse(name) else {
            tracing::warn!(requested = name, "unknown mode rejected");
            return Err(ModeError::UnknownMode(name.to_string()));
        };
        Ok(self.set_mode(mode))
    }

    /// Switches to `mode`, emits `mode-change`, then runs every hook.
    ///
    /// Returns after all hooks have run.
    pub fn set_mode(&self, mode: Mode) -> ModeChange {
        let _switching = self.switching.lock();

        let change = {
            let mut current = self.current.write();
            let change = ModeChange {
                previous: current.mode,
                current: mode,
                version: current.version + 1,
            };
            *current = change.snapshot();
            change
        };

        tracing::info!(
            previous = %change.previous,
            current = %change.current,
            version = change.version,
            "operational mode changed"
        );

        self.bus.emit(&Event::mode_changed(
            change.previous.name(),
            change.current.name(),
            change.version,
        ));

        let hooks: Vec<Arc<dyn ModeChangeHook>> = {
            let mut hooks = self.hooks.write();
            hooks.retain(|h| h.strong_count() > 0);
            hooks.iter().filter_map(Weak::upgrade).collect()
        };
        for hook in hooks {
            tracing::debug!(hook = hook.hook_name(), version = change.version, "running mode hook");
            hook.on_mode_change(&change);
        }

        change
    }
}

impl std::fmt::Debug for ModeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeController")
            .field("current", &self.snapshot())
            .field("hooks", &self.hook_count())
            .finish_non_exhaustive()
    }
}
