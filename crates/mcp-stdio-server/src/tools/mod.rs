//! Tool registry and the built-in tools.

pub mod context;
pub mod echo;
pub mod get_time;
pub mod registry;
pub mod system_info;

pub use registry::{ToolContext, ToolError, ToolHandler, ToolRegistry, ToolResult};

/// Register `echo`, `get_time`, `system_info` and `context`.
pub fn register_builtin_tools(registry: &mut ToolRegistry) {
    registry.register(echo::definition(), echo::execute);
    registry.register(get_time::definition(), get_time::execute);
    registry.register(system_info::definition(), system_info::execute);
    registry.register(context::definition(), context::execute);
}

/// A registry holding only the built-in tools.
pub fn builtin_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    register_builtin_tools(&mut registry);
    registry
}
