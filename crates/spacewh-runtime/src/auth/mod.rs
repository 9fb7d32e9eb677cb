//! Mode-based permission gating for the runtime.
//!
//! Core types ([`Mode`], [`Category`], [`Requirement`]) are defined in
//! `spacewh-auth`. This module provides the runtime implementation:
//!
//! - [`ModeGate`]: Concrete [`PermissionPolicy`] with audit logging
//!
//! # Architecture
//!
//! ```text
//! spacewh-auth (traits + data types)
//!     Mode, ModeRegistry, Requirement, Access, PermissionPolicy
//!         ↓
//! spacewh-runtime/auth (implementation)
//!     ModeGate
//! ```

mod gate;

pub use gate::ModeGate;

// Re-export from spacewh-auth for convenience
pub use spacewh_auth::{
    Access, AccessDenied, Category, Mode, ModeRegistry, PermissionPolicy, Requirement,
};
