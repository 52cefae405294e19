//! MCP stdio server: entry point.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use mcp_stdio_server::config::{ConfigOverrides, ServerConfig};
use mcp_stdio_server::logging;
use mcp_stdio_server::protocol::ProtocolHandler;
use mcp_stdio_server::transport::StdioTransport;
use mcp_stdio_server::types::{InitializeResult, MCP_VERSION};

#[derive(Parser)]
#[command(
    name = "mcp-stdio-server",
    about = "Line-delimited JSON-RPC tool server speaking MCP over stdio",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error, critical, off). Also reads MCP_LOG_LEVEL.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append logs to this file. Also reads MCP_LOG_FILE.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Do not log to stderr.
    #[arg(long, global = true)]
    no_console_log: bool,

    /// Server name reported to clients. Also reads MCP_SERVER_NAME.
    #[arg(long, global = true)]
    name: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve,

    /// Print server capabilities and tools as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   mcp-stdio-server completions bash > ~/.local/share/bash-completion/completions/mcp-stdio-server
    ///   mcp-stdio-server completions zsh > ~/.zfunc/_mcp-stdio-server
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch interactive REPL mode.
    Repl,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ServerConfig::resolve(ConfigOverrides {
        name: cli.name.clone(),
        log_level: cli.log_level.clone(),
        log_file: cli.log_file.clone(),
        no_console_log: cli.no_console_log,
    });

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let _guard = logging::init(&config)?;
            tracing::info!("=== MCP Server Starting ===");

            let handler = ProtocolHandler::with_builtin_tools(config.server_info());
            let mut transport = StdioTransport::new(handler);
            if let Err(e) = transport.run().await {
                tracing::error!("Transport failed: {e}");
                return Err(e.into());
            }
            tracing::info!("Main loop ended - stdin closed");
        }

        Commands::Info => {
            let handler = ProtocolHandler::with_builtin_tools(config.server_info());
            let init = InitializeResult::for_server(handler.server_info());
            let tools = handler.registry().list();
            let info = serde_json::json!({
                "server": init.server_info,
                "protocol_version": MCP_VERSION,
                "capabilities": init.capabilities,
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(
                shell,
                &mut cmd,
                "mcp-stdio-server",
                &mut std::io::stdout(),
            );
        }

        Commands::Repl => {
            mcp_stdio_server::repl::run(&config)?;
        }
    }

    Ok(())
}
