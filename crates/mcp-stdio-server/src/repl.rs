//! Interactive REPL for the MCP stdio server.
//!
//! Launch with `mcp-stdio-server repl` to drive an in-process server by hand.
//! Type `/help` for available commands, Tab for completion. A line starting
//! with `{` is sent as a raw JSON-RPC request.

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};
use serde_json::{json, Value};

use crate::config::{repl_history_path, ServerConfig};
use crate::protocol::ProtocolHandler;
use crate::types::MCP_VERSION;

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/info", "Show server identity and capabilities"),
    ("/tools", "List registered tools"),
    ("/call", "Call a tool: /call <name> [json-arguments]"),
    ("/ping", "Send a ping request"),
    ("/send", "Send a raw JSON-RPC request line"),
    ("/history", "Show the server's recent request history"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// REPL helper for tab completion.
struct ReplHelper {
    tool_names: Vec<String>,
}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<16} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        // Tool name completion for /call
        let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
        if cmd == "/call" && !args.contains(' ') {
            let prefix_start = input.len() - args.len();
            let matches: Vec<Pair> = self
                .tool_names
                .iter()
                .filter(|name| name.starts_with(args))
                .map(|name| Pair {
                    display: name.clone(),
                    replacement: format!("{name} "),
                })
                .collect();
            return Ok((prefix_start, matches));
        }

        Ok((pos, Vec::new()))
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in COMMANDS {
                if cmd.starts_with(line) && *cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for ReplHelper {}
impl Validator for ReplHelper {}
impl Helper for ReplHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// Session state.
struct ReplState {
    handler: ProtocolHandler,
    next_id: i64,
}

impl ReplState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Send a line through the server and print the pretty-printed response.
    fn exchange(&mut self, raw: &str) {
        let response = self.handler.handle_line(raw);
        let pretty = serde_json::from_str::<Value>(&response)
            .ok()
            .and_then(|v| serde_json::to_string_pretty(&v).ok())
            .unwrap_or(response);
        eprintln!();
        for line in pretty.lines() {
            eprintln!("  {line}");
        }
        eprintln!();
    }
}

/// Build the raw request line for a `/call` command.
fn call_request(args: &str, id: i64) -> Result<String, String> {
    let (name, raw_arguments) = match args.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (args, ""),
    };
    if name.is_empty() {
        return Err("Usage: /call <name> [json-arguments]".to_string());
    }

    let arguments: Value = if raw_arguments.is_empty() {
        json!({})
    } else {
        serde_json::from_str(raw_arguments).map_err(|e| format!("Invalid JSON arguments: {e}"))?
    };

    Ok(json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
    .to_string())
}

/// Build a parameterless request line.
fn simple_request(method: &str, id: i64) -> String {
    json!({ "jsonrpc": "2.0", "id": id, "method": method }).to_string()
}

/// Run the interactive REPL.
pub fn run(config: &ServerConfig) -> anyhow::Result<()> {
    let handler = ProtocolHandler::with_builtin_tools(config.server_info());
    let tool_names: Vec<String> = handler.registry().list().into_iter().map(|t| t.name).collect();

    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1m{} v{}\x1b[0m \x1b[90m(MCP {MCP_VERSION}, in-process)\x1b[0m",
        config.name, config.version
    );
    eprintln!();
    eprintln!(
        "    Press \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let rl_config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut rl: Editor<ReplHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(rl_config)?;
    rl.set_helper(Some(ReplHelper { tool_names }));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let hist_path = repl_history_path();
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let mut state = ReplState {
        handler,
        next_id: 0,
    };
    let prompt = " \x1b[36mmcp>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                if line.starts_with('{') {
                    state.exchange(line);
                    continue;
                }

                let input = line.strip_prefix('/').unwrap_or(line);
                if input.is_empty() {
                    cmd_help();
                    continue;
                }

                let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
                let args = args.trim();

                match cmd {
                    "exit" | "quit" => {
                        eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                        break;
                    }
                    "help" | "h" | "?" => cmd_help(),
                    "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
                    "info" => cmd_info(&state.handler),
                    "tools" => cmd_tools(&state.handler),
                    "history" => cmd_history(&state.handler),
                    "ping" => {
                        let id = state.next_id();
                        state.exchange(&simple_request("ping", id));
                    }
                    "call" => {
                        let id = state.next_id();
                        match call_request(args, id) {
                            Ok(raw) => state.exchange(&raw),
                            Err(msg) => eprintln!("  {msg}"),
                        }
                    }
                    "send" => {
                        if args.is_empty() {
                            eprintln!("  Usage: /send <raw json-rpc line>");
                        } else {
                            state.exchange(args);
                        }
                    }
                    _ => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(&hist_path);

    Ok(())
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
    eprintln!("  Tip: Tab completes commands and tool names after /call.");
    eprintln!();
}

fn cmd_info(handler: &ProtocolHandler) {
    let server = handler.server_info();
    let caps = server.capabilities;
    eprintln!();
    eprintln!("  Server:   {} v{}", server.name, server.version);
    eprintln!("  Protocol: {MCP_VERSION}");
    eprintln!("  Tools:    {}", handler.registry().len());
    eprintln!(
        "  Caps:     tools={} resources={} prompts={} logging={}",
        caps.tools, caps.resources, caps.prompts, caps.logging
    );
    eprintln!();
}

fn cmd_tools(handler: &ProtocolHandler) {
    let tools = handler.registry().list();
    eprintln!();
    eprintln!("  {} MCP tools available:", tools.len());
    eprintln!();
    for tool in &tools {
        eprintln!("    {:<16} {}", tool.name, tool.description);
    }
    eprintln!();
}

fn cmd_history(handler: &ProtocolHandler) {
    let history = handler.history();
    eprintln!();
    if history.is_empty() {
        eprintln!("  No requests yet.");
    } else {
        eprintln!("  Last {} of {} requests:", history.len(), history.capacity());
        for (i, raw) in history.iter().enumerate() {
            eprintln!("    {:>2}. {raw}", i + 1);
        }
    }
    eprintln!();
}
