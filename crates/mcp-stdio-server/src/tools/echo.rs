//! `echo` tool. Echo a message back to the caller.

use serde_json::{json, Value};

use super::registry::{ToolContext, ToolError, ToolResult};
use crate::types::ToolDefinition;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "echo".to_string(),
        description: "Echoes back the input message".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "message": { "type": "string", "description": "The message to echo back" }
            },
            "required": ["message"]
        }),
    }
}

pub fn execute(args: &Value, _ctx: &ToolContext<'_>) -> ToolResult<Value> {
    let message = match args.get("message") {
        None | Some(Value::Null) => "",
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            return Err(ToolError::new(format!(
                "'message' must be a string, got {other}"
            )));
        }
    };

    if message.is_empty() {
        Ok(json!("Echo: (no message provided)"))
    } else {
        Ok(json!(format!("Echo: {message}")))
    }
}
