//! Built-in tools available in every mode.

use super::descriptor::{ParamKind, ToolDescriptor, ToolParameter};
use super::error::ToolError;
use super::registry::{ToolHandler, ToolRegistry};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use spacewh_auth::{Category, Mode};
use std::sync::{Arc, Weak};

/// Reports registered tools and known modes.
#[derive(Debug)]
pub struct SystemInfoTool {
    registry: Weak<ToolRegistry>,
}

impl SystemInfoTool {
    /// Tool id.
    pub const ID: &'static str = "system_info";

    /// Creates the tool for `registry`.
    #[must_use]
    pub fn new(registry: &Arc<ToolRegistry>) -> Self {
        Self {
            registry: Arc::downgrade(registry),
        }
    }

    /// Descriptor registered for this tool.
    #[must_use]
    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::ID, "System Info", Category::BASIC_TOOLS)
            .describe("Lists available tools and operational modes")
            .tag("builtin")
    }
}

#[async_trait]
impl ToolHandler for SystemInfoTool {
    async fn call(&self, _params: &Map<String, Value>) -> Result<Value, ToolError> {
        let registry = self
            .registry
            .upgrade()
            .ok_or_else(|| ToolError::failed(Self::ID, "tool registry dropped"))?;
        let tools: Vec<String> = registry.discover().into_iter().map(|d| d.id).collect();
        let modes: Vec<&str> = Mode::ALL.iter().map(|m| m.name()).collect();
        Ok(json!({
            "available_tools": tools,
            "available_modes": modes,
            "status": "operational",
        }))
    }
}

/// Returns its `message` parameter.
#[derive(Debug, Default)]
pub struct EchoTool;

impl EchoTool {
    /// Tool id.
    pub const ID: &'static str = "echo";

    /// Descriptor registered for this tool.
    #[must_use]
    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::ID, "Echo", Category::BASIC_TOOLS)
            .describe("Returns the message it was given")
            .param(ToolParameter::required(
                "message",
                ParamKind::String,
                "Text to echo back",
            ))
            .tag("builtin")
    }
}

#[async_trait]
impl ToolHandler for EchoTool {
    async fn call(&self, params: &Map<String, Value>) -> Result<Value, ToolError> {
        let message = params
            .get("message")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::invalid(Self::ID, "missing required parameter 'message'"))?;
        Ok(json!({ "message": message }))
    }
}

/// Registers [`SystemInfoTool`] and [`EchoTool`].
///
/// # Errors
///
/// [`ToolError::Duplicate`] if either id is already taken.
pub fn register_builtins(registry: &Arc<ToolRegistry>) -> Result<(), ToolError> {
    registry.register(
        SystemInfoTool::descriptor(),
        Arc::new(SystemInfoTool::new(registry)),
    )?;
    registry.register(EchoTool::descriptor(), Arc::new(EchoTool))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn system_info_lists_tools_and_modes() {
        let registry = Arc::new(ToolRegistry::new());
        register_builtins(&registry).expect("register");

        let info = SystemInfoTool::new(&registry)
            .call(&Map::new())
            .await
            .expect("call");
        assert_eq!(info["available_tools"], json!(["echo", "system_info"]));
        assert_eq!(
            info["available_modes"],
            json!(["archivist", "orchestrator", "godfather", "entity"])
        );
        assert_eq!(info["status"], "operational");
    }

    #[tokio::test]
    async fn echo_returns_message() {
        let mut params = Map::new();
        params.insert("message".into(), json!("ping"));
        let out = EchoTool.call(&params).await.expect("call");
        assert_eq!(out["message"], "ping");
    }

    #[test]
    fn registering_twice_is_duplicate() {
        let registry = Arc::new(ToolRegistry::new());
        register_builtins(&registry).expect("first");
        let err = register_builtins(&registry).expect_err("second");
        assert_eq!(err, ToolError::Duplicate(SystemInfoTool::ID.into()));
    }

    #[tokio::test]
    async fn system_info_after_registry_dropped() {
        let registry = Arc::new(ToolRegistry::new());
        let tool = SystemInfoTool::new(&registry);
        drop(registry);
        assert!(tool.call(&Map::new()).await.is_err());
    }
}
