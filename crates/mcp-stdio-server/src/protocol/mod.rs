//! MCP protocol handling: envelope codec and JSON-RPC dispatch.

pub mod codec;
pub mod handler;
pub mod history;
pub mod negotiation;

pub use handler::ProtocolHandler;
pub use history::RequestHistory;
