//! Tier selection.
//!
//! Maps a request's declared attributes to one of the ordered tiers.
//! See [`TierSelector`] for the decision order.

mod selector;

pub use selector::{Complexity, TierDecision, TierHints, TierPolicy, TierReason, TierSelector, Urgency};
