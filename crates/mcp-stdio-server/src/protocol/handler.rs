//! Main request dispatcher: receives raw JSON-RPC lines, routes to handlers.

use serde_json::{json, Value};

use crate::tools::{builtin_registry, ToolContext, ToolRegistry};
use crate::types::*;

use super::codec;
use super::history::RequestHistory;
use super::negotiation::NegotiatedCapabilities;

/// Longest request prefix written to the debug log.
const LOG_PREVIEW_CHARS: usize = 100;

/// The dispatch engine. Owns the tool registry and the request history;
/// each line is handled to completion before the next is accepted.
pub struct ProtocolHandler {
    server: ServerInfo,
    registry: ToolRegistry,
    history: RequestHistory,
    negotiated: NegotiatedCapabilities,
}

impl ProtocolHandler {
    pub fn new(server: ServerInfo, registry: ToolRegistry) -> Self {
        tracing::info!(
            "Initializing MCP server: {} v{} ({} tools registered)",
            server.name,
            server.version,
            registry.len()
        );
        Self {
            server,
            registry,
            history: RequestHistory::new(),
            negotiated: NegotiatedCapabilities::default(),
        }
    }

    /// Server with `echo`, `get_time`, `system_info` and `context` registered.
    pub fn with_builtin_tools(server: ServerInfo) -> Self {
        Self::new(server, builtin_registry())
    }

    pub fn server_info(&self) -> &ServerInfo {
        &self.server
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn history(&self) -> &RequestHistory {
        &self.history
    }

    pub fn negotiated(&self) -> &NegotiatedCapabilities {
        &self.negotiated
    }

    /// Process one raw request line and return exactly one response line
    /// (without the trailing newline).
    pub fn handle_line(&mut self, raw: &str) -> String {
        self.history.record(raw);
        tracing::debug!("Processing request: {}", preview(raw));

        match codec::parse_request(raw) {
            Ok(request) => self.handle_request(request),
            Err(failure) => {
                tracing::error!("Failed to parse JSON-RPC request: {}", failure.reason);
                let id = failure.id.clone();
                codec::error_from(&id, &McpError::from(failure))
            }
        }
    }

    /// Process one raw line as it came off the wire. Bytes that are not UTF-8
    /// are recorded lossily and answered with a parse error and a null id.
    pub fn handle_bytes(&mut self, raw: &[u8]) -> String {
        match std::str::from_utf8(raw) {
            Ok(line) => self.handle_line(line),
            Err(e) => {
                let lossy = String::from_utf8_lossy(raw);
                self.history.record(&lossy);
                tracing::error!("Request is not valid UTF-8: {e}");
                let err = McpError::ParseError(format!("Request is not valid UTF-8: {e}"));
                codec::error_from(&RequestId::Null, &err)
            }
        }
    }

    /// Route an already-parsed request. Does not touch the history.
    pub fn handle_request(&mut self, request: Request) -> String {
        tracing::info!("Parsed request - method: {}, id: {}", request.method, request.id);

        match self.dispatch_request(&request) {
            Ok(result) => codec::create_response(&request.id, result),
            Err(e) => codec::error_from(&request.id, &e),
        }
    }

    fn dispatch_request(&mut self, request: &Request) -> McpResult<Value> {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(&request.params),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(&request.params),
            "ping" => Ok(json!({ "status": "pong" })),
            _ => {
                tracing::warn!("Unknown method: {}", request.method);
                Err(McpError::MethodNotFound(request.method.clone()))
            }
        }
    }

    fn handle_initialize(&mut self, params: &Value) -> McpResult<Value> {
        let result = self.negotiated.negotiate(params, &self.server);
        Ok(serde_json::to_value(result)?)
    }

    fn handle_tools_list(&self) -> McpResult<Value> {
        let result = ToolListResult {
            tools: self.registry.list(),
        };
        Ok(serde_json::to_value(result)?)
    }

    fn handle_tools_call(&self, params: &Value) -> McpResult<Value> {
        let call_params: ToolCallParams = serde_json::from_value(params.clone())
            .map_err(|e| McpError::InvalidParams(e.to_string()))?;

        let arguments = call_params.arguments.unwrap_or_else(|| json!({}));
        tracing::info!(
            "Tool call request - name: {}, arguments: {}",
            call_params.name,
            arguments
        );

        let ctx = ToolContext {
            server: &self.server,
            tool_count: self.registry.len(),
            history: &self.history,
            client: self.negotiated.client.as_ref(),
        };

        match self.registry.invoke(&call_params.name, Some(arguments), &ctx) {
            Ok(value) => {
                tracing::info!("Tool call completed successfully: {}", call_params.name);
                Ok(serde_json::to_value(ToolCallResult::from_value(value))?)
            }
            Err(e) => {
                tracing::error!("Tool call failed: {} - {e}", call_params.name);
                Err(e)
            }
        }
    }
}

fn preview(raw: &str) -> String {
    let mut chars = raw.chars();
    let head: String = chars.by_ref().take(LOG_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
