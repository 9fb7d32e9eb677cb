//! Engine routing and the in-process event bus.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 Caller (CLI, API surface)                    │
//! │            route(process | cancel | status)                  │
//! └──────────────────────────────────────────────────────────────┘
//!                              │ RouteRequest
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       EngineRouter                           │
//! │   ModeController ─ snapshot ─► ModeGate ─► TierSelector      │
//! │                              │                               │
//! │                      RequestTracker                          │
//! └──────────────────────────────────────────────────────────────┘
//!        │ invoke / cancel               │ emit
//!        ▼                               ▼
//!  ┌──────────┐                   ┌──────────────┐
//!  │  Engine  │ ── request-complete ─►│   EventBus   │
//!  └──────────┘                   └──────────────┘
//! ```
//!
//! # Main Types
//!
//! - [`EngineRouter`]: admission, dispatch, cancellation and status
//! - [`EventBus`]: synchronous, isolated publish/subscribe
//! - [`Engine`]: the tiered backend contract; [`SimulatedEngine`] implements it in-process
//! - [`RouterError`] / [`EngineFailure`]: both implement [`ErrorCode`]
//!
//! [`ErrorCode`]: spacewh_types::ErrorCode

mod backend;
mod error;
mod eventbus;
mod request;
mod router;
mod simulated;

pub use backend::{CancelAck, Engine, InvokeOptions};
pub use error::{EngineFailure, RouterError};
pub use eventbus::{EmitReport, EventBus, Handler};
pub use request::{RequestPayload, RouteAction, RouteRequest, RouteResponse};
pub use router::{EngineRouter, RouterBuilder, SystemStatus};
pub use simulated::{Invocation, SimulatedEngine, CALL_LOG_CAPACITY};
