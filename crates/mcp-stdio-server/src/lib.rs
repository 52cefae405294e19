//! MCP stdio server: line-delimited JSON-RPC tool invocation.

pub mod config;
pub mod logging;
pub mod protocol;
pub mod repl;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::ServerConfig;
pub use protocol::ProtocolHandler;
pub use tools::ToolRegistry;
pub use transport::StdioTransport;
