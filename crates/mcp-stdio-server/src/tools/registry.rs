//! Tool registration and dispatch.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::protocol::RequestHistory;
use crate::types::{Implementation, McpError, McpResult, ServerInfo, ToolDefinition};

/// Failure raised by a tool handler. The message reaches the client verbatim.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ToolError {
    message: String,
}

impl ToolError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type ToolResult<T> = Result<T, ToolError>;

/// Read-only view of engine state handed to every tool invocation.
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    pub server: &'a ServerInfo,
    pub tool_count: usize,
    pub history: &'a RequestHistory,
    pub client: Option<&'a Implementation>,
}

/// Invocation callback: arguments object in, JSON value or failure out.
pub type ToolHandler = Box<dyn Fn(&Value, &ToolContext<'_>) -> ToolResult<Value> + Send + Sync>;

struct RegisteredTool {
    definition: ToolDefinition,
    handler: ToolHandler,
}

/// Name-keyed set of invocable tools. Listing is in name order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tool, replacing any earlier registration under the same name.
    pub fn register<F>(&mut self, definition: ToolDefinition, handler: F)
    where
        F: Fn(&Value, &ToolContext<'_>) -> ToolResult<Value> + Send + Sync + 'static,
    {
        let name = definition.name.clone();
        let replaced = self
            .tools
            .insert(
                name.clone(),
                RegisteredTool {
                    definition,
                    handler: Box::new(handler),
                },
            )
            .is_some();
        if replaced {
            tracing::debug!("Tool '{name}' re-registered, previous handler replaced");
        } else {
            tracing::debug!("Registered tool '{name}'");
        }
    }

    pub fn list(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name).map(|t| &t.definition)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run the named tool. `None` arguments are treated as `{}`.
    pub fn invoke(
        &self,
        name: &str,
        arguments: Option<Value>,
        ctx: &ToolContext<'_>,
    ) -> McpResult<Value> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| McpError::ToolNotFound(name.to_string()))?;

        let args = match arguments {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(args) => args,
        };

        (tool.handler)(&args, ctx).map_err(|e| McpError::ToolExecution(e.message))
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn def(name: &str, description: &str) -> ToolDefinition {
        ToolDefinition {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        }
    }

    fn with_ctx<T>(registry: &ToolRegistry, f: impl FnOnce(&ToolContext<'_>) -> T) -> T {
        let server = ServerInfo::default();
        let history = RequestHistory::new();
        let ctx = ToolContext {
            server: &server,
            tool_count: registry.len(),
            history: &history,
            client: None,
        };
        f(&ctx)
    }

    #[test]
    fn test_list_is_name_ordered() {
        let mut registry = ToolRegistry::new();
        registry.register(def("zeta", "z"), |_, _| Ok(json!(null)));
        registry.register(def("alpha", "a"), |_, _| Ok(json!(null)));
        registry.register(def("mid", "m"), |_, _| Ok(json!(null)));

        let names: Vec<String> = registry.list().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = ToolRegistry::new();
        registry.register(def("dup", "first"), |_, _| Ok(json!(1)));
        registry.register(def("dup", "second"), |_, _| Ok(json!(2)));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("dup").unwrap().description, "second");
        let out = with_ctx(&registry, |ctx| registry.invoke("dup", None, ctx)).unwrap();
        assert_eq!(out, json!(2));
    }

    #[test]
    fn test_invoke_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = with_ctx(&registry, |ctx| registry.invoke("ghost", None, ctx)).unwrap_err();
        assert!(matches!(err, McpError::ToolNotFound(ref n) if n == "ghost"));
        assert_eq!(err.code(), -32601);
    }

    #[test]
    fn test_invoke_handler_failure() {
        let mut registry = ToolRegistry::new();
        registry.register(def("bad", "fails"), |_, _| Err(ToolError::new("boom")));
        let err = with_ctx(&registry, |ctx| registry.invoke("bad", None, ctx)).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.code(), -32603);
    }

    #[test]
    fn test_invoke_passes_arguments_and_defaults() {
        let mut registry = ToolRegistry::new();
        registry.register(def("args", "returns args"), |args, _| Ok(args.clone()));

        let given = with_ctx(&registry, |ctx| {
            registry.invoke("args", Some(json!({"k": "v"})), ctx)
        })
        .unwrap();
        assert_eq!(given, json!({"k": "v"}));

        let defaulted = with_ctx(&registry, |ctx| registry.invoke("args", None, ctx)).unwrap();
        assert_eq!(defaulted, json!({}));
    }
}
