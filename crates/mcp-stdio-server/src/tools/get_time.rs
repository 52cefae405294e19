//! `get_time` tool. Report the current local time.

use serde_json::{json, Value};

use super::registry::{ToolContext, ToolResult};
use crate::types::ToolDefinition;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_time".to_string(),
        description: "Returns the current system time".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}

pub fn execute(_args: &Value, _ctx: &ToolContext<'_>) -> ToolResult<Value> {
    let now = chrono::Local::now();
    Ok(json!(format!("Current time: {}", now.format(TIME_FORMAT))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::RequestHistory;
    use crate::types::ServerInfo;

    #[test]
    fn test_time_format() {
        let server = ServerInfo::default();
        let history = RequestHistory::new();
        let ctx = ToolContext {
            server: &server,
            tool_count: 1,
            history: &history,
            client: None,
        };
        let out = execute(&json!({}), &ctx).unwrap();
        let text = out.as_str().unwrap();
        let stamp = text.strip_prefix("Current time: ").unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(stamp, TIME_FORMAT).is_ok());
    }
}
