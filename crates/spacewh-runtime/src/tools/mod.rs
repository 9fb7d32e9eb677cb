//! Mode-gated tools.
//!
//! ```text
//! ToolProvider::invoke(id, params)
//!     │
//!     ├─ ToolRegistry lookup        ── TOOL_NOT_FOUND
//!     ├─ enabled?                   ── TOOL_DISABLED
//!     ├─ ModeGate, current mode     ── TOOL_PERMISSION_DENIED
//!     ├─ parameter validation       ── TOOL_INVALID_PARAMETERS
//!     └─ ToolHandler::call          ── TOOL_EXECUTION_FAILED
//! ```
//!
//! The gate is consulted on every call against the mode snapshot taken
//! at that call; nothing is cached across mode changes.

mod builtin;
mod descriptor;
mod error;
mod executor;
mod registry;

pub use builtin::{register_builtins, EchoTool, SystemInfoTool};
pub use descriptor::{ParamKind, ToolDescriptor, ToolParameter};
pub use error::ToolError;
pub use executor::{ToolExecutor, ToolProvider, ToolResponse};
pub use registry::{tool_fn, ToolHandler, ToolRegistry};
