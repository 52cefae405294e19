//! Configuration loading and resolution.
//!
//! Every setting resolves as: explicit CLI value, then environment, then
//! default.

use std::path::PathBuf;

use crate::types::{ServerInfo, SERVER_NAME, SERVER_VERSION};

pub const ENV_SERVER_NAME: &str = "MCP_SERVER_NAME";
pub const ENV_LOG_LEVEL: &str = "MCP_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "MCP_LOG_FILE";

const DEFAULT_LOG_LEVEL: &str = "info";

/// Values given on the command line, if any.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub name: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub no_console_log: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub console_log: bool,
}

impl ServerConfig {
    /// Resolve against the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Self {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary environment lookup.
    pub fn resolve_with<F>(overrides: ConfigOverrides, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_nonempty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let name = overrides
            .name
            .or_else(|| env_nonempty(ENV_SERVER_NAME))
            .unwrap_or_else(|| SERVER_NAME.to_string());

        let log_level = overrides
            .log_level
            .or_else(|| env_nonempty(ENV_LOG_LEVEL))
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let log_file = overrides
            .log_file
            .or_else(|| env_nonempty(ENV_LOG_FILE).map(PathBuf::from));

        Self {
            name,
            version: SERVER_VERSION.to_string(),
            log_level,
            log_file,
            console_log: !overrides.no_console_log,
        }
    }

    pub fn server_info(&self) -> ServerInfo {
        ServerInfo::new(self.name.clone(), self.version.clone())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::resolve_with(ConfigOverrides::default(), |_| None)
    }
}

/// Location of the REPL's line history.
pub fn repl_history_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());

    PathBuf::from(home).join(".mcp_stdio_server_history")
}
