//! `initialize` handshake: record what the client announced, answer with
//! the server's fixed identity.

use serde_json::Value;

use crate::types::{
    Implementation, InitializeParams, InitializeResult, ServerInfo, MCP_VERSION,
};

/// What the client told us during `initialize`.
#[derive(Debug, Clone, Default)]
pub struct NegotiatedCapabilities {
    pub client: Option<Implementation>,
    pub client_capabilities: Option<Value>,
    pub requested_version: Option<String>,
}

impl NegotiatedCapabilities {
    /// Never fails. Malformed client params are logged and ignored.
    pub fn negotiate(&mut self, params: &Value, server: &ServerInfo) -> InitializeResult {
        let params: InitializeParams = match serde_json::from_value(params.clone()) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Ignoring malformed initialize params: {e}");
                InitializeParams::default()
            }
        };

        if let Some(requested) = params.protocol_version.as_deref() {
            if requested != MCP_VERSION {
                tracing::warn!(
                    "Client requested protocol version {requested}, server supports {MCP_VERSION}. Proceeding with server version."
                );
            }
        }

        match &params.client_info {
            Some(client) => {
                tracing::info!("Initialized with client: {} v{}", client.name, client.version)
            }
            None => tracing::info!("Initialized with anonymous client"),
        }

        self.client = params.client_info;
        self.client_capabilities = params.capabilities;
        self.requested_version = params.protocol_version;

        InitializeResult::for_server(server)
    }
}
