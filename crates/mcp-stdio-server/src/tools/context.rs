//! `context` tool. Return the most recent raw requests.

use serde_json::{json, Value};

use super::registry::{ToolContext, ToolResult};
use crate::types::ToolDefinition;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "context".to_string(),
        description:
            "Returns the most recent MCP requests processed by the server (for debugging)."
                .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}

pub fn execute(_args: &Value, ctx: &ToolContext<'_>) -> ToolResult<Value> {
    Ok(json!({ "recent_requests": ctx.history.snapshot() }))
}
