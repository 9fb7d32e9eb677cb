//! Core types for spacewh.
//!
//! This crate provides the identifiers and the error-code interface
//! shared by every other crate in the workspace.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Foundation Layer                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  spacewh-types   : RequestId, SourceId, TierId, ErrorCode ◄─ │
//! │  spacewh-event   : EventChannel, Event, HandlerError        │
//! │  spacewh-auth    : Mode, Category, ModeRegistry, Access     │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Runtime Layer                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  spacewh-runtime : EventBus, RequestTracker, TierSelector,  │
//! │                    EngineRouter, tools, config              │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Frontend Layer                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  spacewh-cli     : `spacewh` binary                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Identifier Design
//!
//! | Type | Backing | Display |
//! |------|---------|---------|
//! | [`RequestId`] | UUID v4 | `req:<uuid>` |
//! | [`SubscriptionId`] | UUID v4 | `sub:<uuid>` |
//! | [`SourceId`] | String | verbatim |
//! | [`TierId`] | enum | `engine_N` |
//!
//! # Example
//!
//! ```
//! use spacewh_types::{RequestId, SourceId, TierId};
//!
//! let req = RequestId::new();
//! let source = SourceId::new("user-42");
//! let tier = TierId::Engine2;
//!
//! println!("{req} from {source} on {tier}");
//! ```

mod error;
mod id;
mod tier;

pub use error::{assert_error_code, assert_error_codes, ErrorCode, ErrorDetail};
pub use id::{RequestId, SourceId, SubscriptionId};
pub use tier::TierId;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn request_id_display() {
        let id = RequestId::new();
        let display = format!("{id}");
        assert!(display.starts_with("req:"));
        assert!(display.contains(&id.uuid().to_string()));
    }

    // NOTE: RequestId does not implement Default intentionally.
    // See id.rs for rationale.

    #[test]
    fn request_id_uniqueness() {
        let ids: HashSet<RequestId> = (0..1_000).map(|_| RequestId::new()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn request_id_parse_rejects_garbage() {
        assert_eq!(RequestId::parse(""), None);
        assert_eq!(RequestId::parse("req:"), None);
        assert_eq!(RequestId::parse("evt:123"), None);
    }

    #[test]
    fn request_id_serde_is_bare_uuid() {
        let id = RequestId::new();
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, format!("\"{}\"", id.uuid()));
    }

    #[test]
    fn source_id_serde_transparent() {
        let source = SourceId::new("alice");
        let json = serde_json::to_string(&source).expect("serialize");
        assert_eq!(json, "\"alice\"");
        let parsed: SourceId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, source);
    }

    #[test]
    fn subscription_id_display() {
        let id = SubscriptionId::new();
        assert!(id.to_string().starts_with("sub:"));
        assert_ne!(id, SubscriptionId::default());
    }

    #[test]
    fn tier_ordering_follows_rank() {
        let mut tiers = vec![
            TierId::Engine3,
            TierId::Engine1,
            TierId::Engine4,
            TierId::Engine2,
        ];
        tiers.sort();
        assert_eq!(tiers, TierId::ALL.to_vec());
        for tier in TierId::ALL {
            assert_eq!(TierId::from_rank(tier.rank()), Some(tier));
        }
    }

    #[test]
    fn tier_parse_forms() {
        assert_eq!(TierId::parse("engine_1"), Some(TierId::Engine1));
        assert_eq!(TierId::parse("Engine2"), Some(TierId::Engine2));
        assert_eq!(TierId::parse(" 3 "), Some(TierId::Engine3));
        assert_eq!(TierId::parse("engine_5"), None);
        assert_eq!(TierId::parse("turbo"), None);
    }

    #[test]
    fn tier_serde_uses_wire_name() {
        let json = serde_json::to_string(&TierId::Engine3).expect("serialize");
        assert_eq!(json, "\"engine_3\"");
        let parsed: TierId = serde_json::from_str("\"engine_4\"").expect("deserialize");
        assert_eq!(parsed, TierId::Engine4);
    }
}
