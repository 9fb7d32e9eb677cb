//! Identifier types for spacewh.
//!
//! Request identifiers are UUID-based so they stay unique across
//! tracker instances and can be handed to external engines verbatim.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a tracked request.
///
/// Allocated exactly once at admission by the request tracker and
/// never reused for the lifetime of that tracker.
///
/// # Lifecycle
///
/// ```text
/// route(process) ──► RequestId::new() ──► tracker record (processing)
///                                              │
///                        engine settles / cancel / timeout
///                                              ▼
///                                     terminal record ──► evicted
/// ```
///
/// # Example
///
/// ```
/// use spacewh_types::RequestId;
///
/// let id = RequestId::new();
/// assert!(id.to_string().starts_with("req:"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

#[allow(clippy::new_without_default)] // Default intentionally not implemented - ids are allocated by the tracker
impl RequestId {
    /// Creates a new [`RequestId`] with a random UUID v4.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Parses either the bare UUID form or the `req:`-prefixed display form.
    ///
    /// # Example
    ///
    /// ```
    /// use spacewh_types::RequestId;
    ///
    /// let id = RequestId::new();
    /// assert_eq!(RequestId::parse(&id.to_string()), Some(id));
    /// assert_eq!(RequestId::parse(&id.uuid().to_string()), Some(id));
    /// assert_eq!(RequestId::parse("req:not-a-uuid"), None);
    /// ```
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let raw = s.strip_prefix("req:").unwrap_or(s);
        Uuid::parse_str(raw).ok().map(Self)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req:{}", self.0)
    }
}

/// Identifier of whoever submitted a request.
///
/// Opaque to the router: a user id, a client connection, a component
/// name. Ownership checks on cancel compare source ids for equality.
///
/// # Example
///
/// ```
/// use spacewh_types::SourceId;
///
/// let alice = SourceId::new("alice");
/// assert_eq!(alice.as_str(), "alice");
/// assert_eq!(alice, SourceId::from("alice"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    /// Creates a source id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for an event bus subscription.
///
/// Returned by `EventBus::subscribe` and accepted by
/// `EventBus::unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    /// Creates a new [`SubscriptionId`] with a random UUID v4.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub:{}", self.0)
    }
}

// Tests are in lib.rs as integration tests for public API
