//! MCP result types for the tools surface.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
}

impl ToolCallResult {
    pub fn text(text: String) -> Self {
        Self {
            content: vec![ToolContent::Text { text }],
        }
    }

    /// Wrap a handler's value: strings pass through verbatim, anything else
    /// is rendered as compact JSON.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(s) => Self::text(s),
            other => Self::text(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolListResult {
    pub tools: Vec<ToolDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_result_is_verbatim() {
        let result = ToolCallResult::from_value(json!("Echo: hi"));
        assert_eq!(
            result.content,
            vec![ToolContent::Text {
                text: "Echo: hi".to_string()
            }]
        );
    }

    #[test]
    fn test_structured_result_is_compact_json() {
        let result = ToolCallResult::from_value(json!({"a": [1, 2]}));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][0]["text"], r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_definition_uses_camel_case_schema_key() {
        let def = ToolDefinition {
            name: "t".into(),
            description: "d".into(),
            input_schema: json!({"type": "object"}),
        };
        let value = serde_json::to_value(&def).unwrap();
        assert!(value.get("inputSchema").is_some());
        assert!(value.get("input_schema").is_none());
    }
}
