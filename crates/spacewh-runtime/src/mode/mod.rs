//! Operational mode input.
//!
//! [`ModeController`] holds the process-wide current mode as a versioned
//! [`ModeSnapshot`]. Readers take one snapshot per operation, so a
//! request evaluated mid-switch stays consistent with a single mode.
//!
//! ```text
//! set_operational_mode("godfather")
//!     │ validate name            ── ModeError::UnknownMode
//!     │ swap snapshot (version+1)
//!     │ emit mode-change          ── EventBus
//!     └ on_mode_change(&change)   ── every ModeChangeHook, in order
//! ```

mod controller;
mod error;

pub use controller::{ModeChange, ModeChangeHook, ModeController, ModeSnapshot};
pub use error::ModeError;
