//! Envelope codec: raw request lines in, compact response lines out.
//!
//! The codec knows nothing about methods or tools. Parsing never panics;
//! failures are reported as [`ParseFailure`] so the caller can still answer
//! with a well-formed `-32700` envelope.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::{
    JsonRpcError, JsonRpcNotification, JsonRpcResponse, McpError, Request, RequestId,
    JSONRPC_VERSION,
};

/// Last-resort line emitted if an envelope cannot be serialized.
const FALLBACK_ERROR: &str =
    r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error: failed to encode response"}}"#;

/// A request line that could not be turned into a routable [`Request`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParseFailure {
    /// The request id, when the line was valid JSON carrying a usable one.
    pub id: RequestId,
    pub reason: String,
}

impl ParseFailure {
    fn new(id: RequestId, reason: impl Into<String>) -> Self {
        Self {
            id,
            reason: reason.into(),
        }
    }
}

impl From<ParseFailure> for McpError {
    fn from(failure: ParseFailure) -> Self {
        McpError::ParseError(failure.reason)
    }
}

/// Parse one raw line into a request.
///
/// Succeeds only for a JSON object with a non-empty string `method`. Absent or
/// null `params` become `{}`; `id` keeps its original JSON type.
pub fn parse_request(raw: &str) -> Result<Request, ParseFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseFailure::new(RequestId::Null, "Empty message"));
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| ParseFailure::new(RequestId::Null, e.to_string()))?;

    let Value::Object(mut obj) = value else {
        return Err(ParseFailure::new(
            RequestId::Null,
            "Request must be a JSON object",
        ));
    };

    let id = match obj.remove("id") {
        None | Some(Value::Null) => RequestId::Null,
        Some(Value::Number(n)) => RequestId::Number(n),
        Some(Value::String(s)) => RequestId::String(s),
        Some(other) => {
            return Err(ParseFailure::new(
                RequestId::Null,
                format!("Request id must be a string or number, got {other}"),
            ));
        }
    };

    if let Some(version) = obj.get("jsonrpc") {
        if version.as_str() != Some(JSONRPC_VERSION) {
            tracing::warn!("Request {id} declares jsonrpc {version}, expected \"{JSONRPC_VERSION}\"");
        }
    }

    let method = match obj.remove("method") {
        Some(Value::String(m)) if !m.is_empty() => m,
        Some(Value::String(_)) => {
            return Err(ParseFailure::new(id, "Method name must not be empty"));
        }
        Some(_) => return Err(ParseFailure::new(id, "Method must be a string")),
        None => return Err(ParseFailure::new(id, "Missing method")),
    };

    let params = match obj.remove("params") {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(params) => params,
    };

    Ok(Request { method, id, params })
}

/// Build `{"jsonrpc":"2.0","id":<id>,"result":<result>}` as a single line.
pub fn create_response(id: &RequestId, result: Value) -> String {
    encode(&JsonRpcResponse::new(id.clone(), result))
}

/// Build `{"jsonrpc":"2.0","id":<id>,"error":{"code":..,"message":..}}` as a single line.
pub fn create_error_response(id: &RequestId, code: i32, message: &str) -> String {
    encode(&JsonRpcError::new(id.clone(), code, message.to_string()))
}

/// Build an error envelope straight from an [`McpError`].
pub fn error_from(id: &RequestId, err: &McpError) -> String {
    encode(&err.to_json_rpc_error(id.clone()))
}

/// Build a one-way `{"jsonrpc":"2.0","method":..,"params":..}` notification.
pub fn create_notification(method: &str, params: Value) -> String {
    encode(&JsonRpcNotification::new(method.to_string(), params))
}

/// Append the line terminator for the transport.
pub fn frame(line: &str) -> String {
    let mut framed = String::with_capacity(line.len() + 1);
    framed.push_str(line);
    framed.push('\n');
    framed
}

fn encode(envelope: &impl Serialize) -> String {
    // Compact output: string values escape their newlines, so the line stays whole.
    serde_json::to_string(envelope).unwrap_or_else(|e| {
        tracing::error!("Failed to encode envelope: {e}");
        FALLBACK_ERROR.to_string()
    })
}
