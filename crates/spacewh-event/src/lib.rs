//! Event types for spacewh.
//!
//! This crate defines what travels over the in-process event bus:
//! named [`EventChannel`]s, [`Event`] values and the [`HandlerError`]
//! raised by failing subscribers. The bus itself lives in
//! `spacewh-runtime`.
//!
//! # Event Flow
//!
//! ```text
//! ┌──────────────┐ mode-change          ┌──────────────────────────┐
//! │ModeController│ ───────────────────► │                          │
//! └──────────────┘                      │         EventBus         │
//! ┌──────────────┐ engine-request-*     │  channel → [handler...]  │
//! │ EngineRouter │ ───────────────────► │  (registration order)    │
//! └──────────────┘                      │                          │
//! ┌──────────────┐ request-complete     │                          │
//! │    Engine    │ ───────────────────► │                          │
//! └──────────────┘ engine-status-change └────────────┬─────────────┘
//!                                                    │ sync, isolated
//!                                   ┌────────────────┼────────────────┐
//!                                   ▼                ▼                ▼
//!                              subscriber       subscriber       subscriber
//! ```
//!
//! # Delivery Semantics
//!
//! - At-most-once per subscriber registered at emit time
//! - No replay for late subscribers
//! - No persistence or backpressure
//! - A failing subscriber never affects the emitter or its peers

mod channel;
mod error;
mod event;

pub use channel::EventChannel;
pub use error::HandlerError;
pub use event::Event;
