//! Request lifecycle tracking.
//!
//! One [`RequestRecord`] per admitted request, keyed by [`RequestId`].
//!
//! # State Machine
//!
//! ```text
//!               ┌──► Completed
//!               │
//! Processing ───┼──► Error
//!               │
//!               └──► Cancelled
//! ```
//!
//! Terminal states are absorbing: the first terminal transition wins and
//! every later settlement is a logged no-op. Terminal records are evicted
//! once their retention window has elapsed.
//!
//! [`RequestId`]: spacewh_types::RequestId

mod error;
mod record;
mod store;

pub use error::TrackerError;
pub use record::{RequestRecord, RequestSnapshot, RequestStatus};
pub use store::{
    AggregateStatus, CancelOutcome, RequestTracker, Settlement, StatusReport,
    DEFAULT_RETENTION,
};
