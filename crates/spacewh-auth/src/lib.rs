//! Operational modes and permission gating for spacewh.
//!
//! This crate owns the access model: which [`Mode`] is in force, what it
//! is allowed to do, and how a [`Requirement`] is checked against it.
//! It sits at the same level as `spacewh-event` in the dependency graph.
//!
//! # Two-Part Access Model
//!
//! ```text
//! Access(mode, req) = Level(mode) >= req.min_level  ∧  req.categories ⊆ Allowed(mode)
//! ```
//!
//! | Part | Type | Controls |
//! |------|------|----------|
//! | Level | [`Mode::level`] | Ordered ceiling (archivist 1 .. entity 4) |
//! | Categories | [`Category`] | Which kinds of capability are allowed |
//!
//! # Crate Architecture
//!
//! ```text
//! spacewh-types  (IDs, TierId, ErrorCode)
//!     ↑              ↑
//! spacewh-event   spacewh-auth  ◄── THIS CRATE
//! (Event, bus     (Mode, ModeRegistry, Category, PermissionPolicy)
//!  payloads)          ↑
//!     ↑               │
//!     spacewh-runtime (ModeGate, ModeController, router, tools)
//! ```
//!
//! # Design Principles
//!
//! - **Fail closed**: an unresolved mode has level 0 and no categories
//! - **Monotonic**: each mode allows a superset of the mode below it
//! - **Stateless checks**: the caller supplies the mode on every check

pub mod access;
pub mod category;
pub mod error;
pub mod mode;
pub mod policy;
pub mod registry;

pub use access::{Access, Requirement};
pub use category::Category;
pub use error::AccessDenied;
pub use mode::{CouncilProfile, Mode, ModeProfile, TierParams, Workflow};
pub use policy::{evaluate, PermissionPolicy};
pub use registry::ModeRegistry;
