//! spacewh runtime: request routing, lifecycle tracking and mode gating.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Foundation Layer                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  spacewh-types  : RequestId, SourceId, TierId, ErrorCode    │
//! │  spacewh-event  : EventChannel, Event                       │
//! │  spacewh-auth   : Mode, Category, ModeRegistry, Access      │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Runtime Layer (THIS CRATE)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  auth/    : ModeGate (audit-logging PermissionPolicy)       │
//! │  mode/    : ModeController, ModeChangeHook                  │
//! │  tier/    : TierSelector, TierPolicy                        │
//! │  tracker/ : RequestTracker, RequestRecord                   │
//! │  engine/  : EngineRouter, EventBus, Engine                  │
//! │  tools/   : ToolRegistry, ToolExecutor                      │
//! │  config/  : SpacewhConfig, ConfigLoader                     │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Frontend Layer                          │
//! │  (spacewh-cli)                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! ## [`engine`] - Routing
//!
//! - [`EngineRouter`](engine::EngineRouter): admission, async dispatch, cancel, status
//! - [`EventBus`](engine::EventBus): in-process publish/subscribe with isolated handlers
//! - [`Engine`](engine::Engine): tiered backend contract
//!
//! ## [`tracker`] - Request Lifecycle
//!
//! - [`RequestTracker`](tracker::RequestTracker): per-record locked store with retention sweeps
//!
//! ## [`mode`] - Operational Mode
//!
//! - [`ModeController`](mode::ModeController): versioned current mode and change hooks
//!
//! ## [`config`] - Configuration Management
//!
//! Configuration priority: Environment > Project > Global > Default
//!
//! # Error Handling
//!
//! Every error enum implements [`spacewh_types::ErrorCode`]. Admission
//! errors are returned synchronously; engine failures after admission
//! are recorded on the request and emitted as events.

pub mod auth;
pub mod config;
pub mod engine;
pub mod mode;
pub mod system;
pub mod tier;
pub mod tools;
pub mod tracker;

// Re-exports for convenience
pub use auth::ModeGate;
pub use config::{
    default_config_dir, default_config_path, save_global_config, ConfigError, ConfigLoader,
    ConfigResolver, NoOpResolver, SpacewhConfig,
};
pub use engine::{
    Engine, EngineFailure, EngineRouter, EventBus, RequestPayload, RouteRequest, RouteResponse,
    RouterError, SimulatedEngine, SystemStatus,
};
pub use mode::{ModeChange, ModeChangeHook, ModeController, ModeError, ModeSnapshot};
pub use system::{SpacewhSystem, SystemBuilder, SystemError};
pub use tier::{Complexity, TierHints, TierPolicy, TierSelector, Urgency};
pub use tools::{ToolDescriptor, ToolError, ToolExecutor, ToolProvider, ToolRegistry};
pub use tracker::{RequestSnapshot, RequestStatus, RequestTracker, TrackerError};
