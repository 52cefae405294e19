//! `system_info` tool. Describe this server.

use serde_json::{json, Value};

use super::registry::{ToolContext, ToolResult};
use crate::types::ToolDefinition;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "system_info".to_string(),
        description: "Returns basic system information".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}

pub fn execute(_args: &Value, ctx: &ToolContext<'_>) -> ToolResult<Value> {
    let caps = ctx.server.capabilities;
    let mut info = json!({
        "server_name": ctx.server.name,
        "server_version": ctx.server.version,
        "tools_available": ctx.tool_count,
        "capabilities": {
            "tools": caps.tools,
            "resources": caps.resources,
            "prompts": caps.prompts,
            "logging": caps.logging,
        }
    });

    if let Some(client) = ctx.client {
        info["client"] = json!({ "name": client.name, "version": client.version });
    }

    Ok(info)
}
