//! Tool errors.
//!
//! # Error Codes
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`ToolError::NotFound`] | `TOOL_NOT_FOUND` | No |
//! | [`ToolError::Disabled`] | `TOOL_DISABLED` | No |
//! | [`ToolError::PermissionDenied`] | `TOOL_PERMISSION_DENIED` | No |
//! | [`ToolError::InvalidParameters`] | `TOOL_INVALID_PARAMETERS` | No |
//! | [`ToolError::Duplicate`] | `TOOL_DUPLICATE` | No |
//! | [`ToolError::ExecutionFailed`] | `TOOL_EXECUTION_FAILED` | Yes |

use spacewh_auth::AccessDenied;
use spacewh_types::ErrorCode;
use thiserror::Error;

/// Tool lookup, gating or execution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// No tool with this id.
    #[error("tool not found: {0}")]
    NotFound(String),

    /// The tool exists but is disabled.
    #[error("tool disabled: {0}")]
    Disabled(String),

    /// The current mode may not use the tool.
    #[error("access denied to tool '{tool_id}': {denied}")]
    PermissionDenied {
        /// Tool id.
        tool_id: String,
        /// Gate detail.
        #[source]
        denied: AccessDenied,
    },

    /// Missing or mistyped parameters.
    #[error("invalid parameters for '{tool_id}': {reason}")]
    InvalidParameters {
        /// Tool id.
        tool_id: String,
        /// What is wrong.
        reason: String,
    },

    /// A tool with this id is already registered.
    #[error("tool already registered: {0}")]
    Duplicate(String),

    /// The tool ran and failed.
    #[error("tool '{tool_id}' failed: {message}")]
    ExecutionFailed {
        /// Tool id.
        tool_id: String,
        /// Failure message.
        message: String,
    },
}

impl ToolError {
    /// Shorthand for [`ToolError::InvalidParameters`].
    pub fn invalid(tool_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            tool_id: tool_id.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ToolError::ExecutionFailed`].
    pub fn failed(tool_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            tool_id: tool_id.into(),
            message: message.into(),
        }
    }
}

impl ErrorCode for ToolError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "TOOL_NOT_FOUND",
            Self::Disabled(_) => "TOOL_DISABLED",
            Self::PermissionDenied { .. } => "TOOL_PERMISSION_DENIED",
            Self::InvalidParameters { .. } => "TOOL_INVALID_PARAMETERS",
            Self::Duplicate(_) => "TOOL_DUPLICATE",
            Self::ExecutionFailed { .. } => "TOOL_EXECUTION_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::ExecutionFailed { .. })
    }
}
