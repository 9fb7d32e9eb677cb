//! Mode-gated tool execution.

use super::descriptor::ToolDescriptor;
use super::error::ToolError;
use super::registry::ToolRegistry;
use crate::auth::ModeGate;
use crate::mode::{ModeChange, ModeChangeHook, ModeController};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use spacewh_auth::PermissionPolicy;
use std::sync::Arc;
use tokio::time::Instant;

/// Result of one successful tool call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResponse {
    /// Tool that ran.
    pub tool_id: String,
    /// Tool output.
    pub result: Value,
    /// Wall time spent in the handler.
    pub duration_ms: u64,
}

/// Something that can list and run tools.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Tools usable right now.
    fn discover(&self) -> Vec<ToolDescriptor>;

    /// Runs `tool_id` with `params` (a JSON object or `null`).
    async fn invoke(&self, tool_id: &str, params: Value) -> Result<ToolResponse, ToolError>;
}

/// Runs registered tools under the current operational mode.
///
/// Each call checks, in order: the tool exists, it is enabled, the mode
/// allows its categories, and the parameters match its declaration.
#[derive(Debug)]
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    gate: ModeGate,
    controller: Arc<ModeController>,
}

impl ToolExecutor {
    /// Creates an executor.
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>, gate: ModeGate, controller: Arc<ModeController>) -> Self {
        Self {
            registry,
            gate,
            controller,
        }
    }

    /// Returns the tool registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    fn authorize(&self, descriptor: &ToolDescriptor) -> Result<(), ToolError> {
        let mode = self.controller.snapshot().mode;
        self.gate
            .check_capability(Some(mode), &descriptor.requirement())
            .into_result()
            .map_err(|denied| ToolError::PermissionDenied {
                tool_id: descriptor.id.clone(),
                denied,
            })
    }
}

#[async_trait]
impl ToolProvider for ToolExecutor {
    fn discover(&self) -> Vec<ToolDescriptor> {
        self.registry
            .visible_for(self.controller.allowed_categories())
    }

    async fn invoke(&self, tool_id: &str, params: Value) -> Result<ToolResponse, ToolError> {
        let (descriptor, handler, enabled) = self
            .registry
            .lookup(tool_id)
            .ok_or_else(|| ToolError::NotFound(tool_id.to_string()))?;
        if !enabled {
            return Err(ToolError::Disabled(tool_id.to_string()));
        }

        self.authorize(&descriptor)?;

        let params = match params {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(ToolError::invalid(
                    tool_id,
                    format!("parameters must be an object, got {other}"),
                ))
            }
        };
        descriptor
            .validate(&params)
            .map_err(|reason| ToolError::invalid(tool_id, reason))?;

        let started = Instant::now();
        let result = handler.call(&params).await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(result) => {
                tracing::debug!(tool = tool_id, duration_ms, "tool completed");
                Ok(ToolResponse {
                    tool_id: tool_id.to_string(),
                    result,
                    duration_ms,
                })
            }
            Err(e) => {
                tracing::warn!(tool = tool_id, error = %e, "tool failed");
                Err(e)
            }
        }
    }
}

impl ModeChangeHook for ToolExecutor {
    fn hook_name(&self) -> &str {
        "tools"
    }

    fn on_mode_change(&self, change: &ModeChange) {
        let allowed = self.controller.registry().allowed_categories(Some(change.current));
        tracing::info!(
            mode = %change.current,
            visible = self.registry.visible_for(allowed).len(),
            "tool visibility updated"
        );
    }
}
