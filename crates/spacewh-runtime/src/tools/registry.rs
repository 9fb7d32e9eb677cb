//! Tool registry.
//!
//! Holds every registered tool with its handler and enabled flag. The
//! registry knows nothing about modes; gating happens in
//! [`ToolExecutor`](super::ToolExecutor).

use super::descriptor::ToolDescriptor;
use super::error::ToolError;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use spacewh_auth::Category;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

/// Executes one tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Runs the tool with already-validated parameters.
    async fn call(&self, params: &Map<String, Value>) -> Result<Value, ToolError>;
}

struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(Map<String, Value>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ToolError>> + Send,
{
    async fn call(&self, params: &Map<String, Value>) -> Result<Value, ToolError> {
        (self.0)(params.clone()).await
    }
}

/// Wraps an async closure as a [`ToolHandler`].
///
/// # Example
///
/// ```
/// use spacewh_runtime::tools::{tool_fn, ToolDescriptor, ToolRegistry};
/// use spacewh_auth::Category;
/// use serde_json::json;
///
/// let registry = ToolRegistry::new();
/// registry
///     .register(
///         ToolDescriptor::new("ping", "Ping", Category::BASIC_TOOLS),
///         tool_fn(|_params| async { Ok(json!("pong")) }),
///     )
///     .unwrap();
/// assert!(registry.contains("ping"));
/// ```
pub fn tool_fn<F, Fut>(f: F) -> Arc<dyn ToolHandler>
where
    F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

struct ToolEntry {
    descriptor: ToolDescriptor,
    handler: Arc<dyn ToolHandler>,
    enabled: bool,
}

/// Registered tools keyed by id, iterated in id order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<BTreeMap<String, ToolEntry>>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool, enabled.
    ///
    /// # Errors
    ///
    /// [`ToolError::Duplicate`] if the id is taken; the existing tool is kept.
    pub fn register(
        &self,
        descriptor: ToolDescriptor,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), ToolError> {
        let mut tools = self.tools.write();
        if tools.contains_key(&descriptor.id) {
            return Err(ToolError::Duplicate(descriptor.id));
        }
        tracing::debug!(
            tool = %descriptor.id,
            category = %descriptor.category,
            "tool registered"
        );
        tools.insert(
            descriptor.id.clone(),
            ToolEntry {
                descriptor,
                handler,
                enabled: true,
            },
        );
        Ok(())
    }

    /// Removes a tool, returning its descriptor.
    pub fn remove(&self, id: &str) -> Option<ToolDescriptor> {
        let removed = self.tools.write().remove(id).map(|e| e.descriptor);
        if removed.is_some() {
            tracing::debug!(tool = id, "tool removed");
        }
        removed
    }

    /// Returns the descriptor of `id`, enabled or not.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<ToolDescriptor> {
        self.tools.read().get(id).map(|e| e.descriptor.clone())
    }

    /// Returns `true` if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.tools.read().contains_key(id)
    }

    /// Returns `Some(enabled)` for a registered tool.
    #[must_use]
    pub fn is_enabled(&self, id: &str) -> Option<bool> {
        self.tools.read().get(id).map(|e| e.enabled)
    }

    /// Sets the enabled flag.
    ///
    /// # Errors
    ///
    /// [`ToolError::NotFound`] if `id` is not registered.
    pub fn set_enabled(&self, id: &str, enabled: bool) -> Result<(), ToolError> {
        let mut tools = self.tools.write();
        let entry = tools
            .get_mut(id)
            .ok_or_else(|| ToolError::NotFound(id.to_string()))?;
        if entry.enabled != enabled {
            entry.enabled = enabled;
            tracing::info!(tool = id, enabled, "tool availability changed");
        }
        Ok(())
    }

    /// Enables a tool.
    ///
    /// # Errors
    ///
    /// [`ToolError::NotFound`] if `id` is not registered.
    pub fn enable(&self, id: &str) -> Result<(), ToolError> {
        self.set_enabled(id, true)
    }

    /// Disables a tool.
    ///
    /// # Errors
    ///
    /// [`ToolError::NotFound`] if `id` is not registered.
    pub fn disable(&self, id: &str) -> Result<(), ToolError> {
        self.set_enabled(id, false)
    }

    /// Descriptors of every enabled tool.
    #[must_use]
    pub fn discover(&self) -> Vec<ToolDescriptor> {
        self.tools
            .read()
            .values()
            .filter(|e| e.enabled)
            .map(|e| e.descriptor.clone())
            .collect()
    }

    /// Enabled tools whose categories are all within `allowed`.
    #[must_use]
    pub fn visible_for(&self, allowed: Category) -> Vec<ToolDescriptor> {
        self.tools
            .read()
            .values()
            .filter(|e| e.enabled && allowed.contains(e.descriptor.categories()))
            .map(|e| e.descriptor.clone())
            .collect()
    }

    /// Descriptor and handler of `id`, regardless of the enabled flag.
    pub(crate) fn lookup(&self, id: &str) -> Option<(ToolDescriptor, Arc<dyn ToolHandler>, bool)> {
        self.tools
            .read()
            .get(id)
            .map(|e| (e.descriptor.clone(), Arc::clone(&e.handler), e.enabled))
    }

    /// Number of registered tools, enabled or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.read().len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.read().is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tools = self.tools.read();
        f.debug_struct("ToolRegistry")
            .field("tools", &tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn noop() -> Arc<dyn ToolHandler> {
        tool_fn(|_| async { Ok(Value::Null) })
    }

    fn registry() -> ToolRegistry {
        let registry = ToolRegistry::new();
        registry
            .register(ToolDescriptor::new("echo", "Echo", Category::BASIC_TOOLS), noop())
            .expect("echo");
        registry
            .register(
                ToolDescriptor::new("search", "Search", Category::READ_KNOWLEDGE),
                noop(),
            )
            .expect("search");
        registry
            .register(
                ToolDescriptor::new("purge", "Purge", Category::ADMIN_TOOLS)
                    .requires(Category::WRITE_KNOWLEDGE),
                noop(),
            )
            .expect("purge");
        registry
    }

    #[test]
    fn duplicate_registration_keeps_original() {
        let registry = registry();
        let err = registry
            .register(
                ToolDescriptor::new("echo", "Other echo", Category::ADMIN_TOOLS),
                noop(),
            )
            .expect_err("duplicate");
        assert_eq!(err, ToolError::Duplicate("echo".into()));
        assert_eq!(registry.get("echo").map(|d| d.name), Some("Echo".to_string()));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn discover_skips_disabled() {
        let registry = registry();
        registry.disable("search").expect("known");
        let ids: Vec<String> = registry.discover().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["echo", "purge"]);
        assert_eq!(registry.is_enabled("search"), Some(false));

        registry.enable("search").expect("known");
        assert_eq!(registry.discover().len(), 3);
    }

    #[test]
    fn set_enabled_unknown_tool() {
        let err = registry().disable("ghost").expect_err("unknown");
        assert_eq!(err, ToolError::NotFound("ghost".into()));
    }

    #[test]
    fn visibility_requires_every_category() {
        let registry = registry();
        let archivist = Category::BASIC_TOOLS | Category::READ_KNOWLEDGE;
        let ids: Vec<String> = registry
            .visible_for(archivist)
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["echo", "search"]);

        // admin alone is not enough for purge
        let admin_only = archivist | Category::ADMIN_TOOLS;
        assert_eq!(registry.visible_for(admin_only).len(), 2);
        assert_eq!(registry.visible_for(Category::ALL).len(), 3);
    }

    #[test]
    fn remove_returns_descriptor() {
        let registry = registry();
        assert_eq!(registry.remove("echo").map(|d| d.id), Some("echo".to_string()));
        assert!(registry.remove("echo").is_none());
        assert!(!registry.contains("echo"));
    }

    #[tokio::test]
    async fn closure_handler_receives_params() {
        let handler = tool_fn(|params| async move { Ok(json!({ "got": params.len() })) });
        let mut params = Map::new();
        params.insert("a".into(), json!(1));
        let result = handler.call(&params).await.expect("call");
        assert_eq!(result["got"], 1);
    }
}
