//! Transport loop tests over in-memory streams.

use std::io;

use serde_json::Value;
use tokio::io::BufReader;

use mcp_stdio_server::protocol::ProtocolHandler;
use mcp_stdio_server::transport::StdioTransport;
use mcp_stdio_server::types::{McpError, ServerInfo};

fn handler() -> ProtocolHandler {
    ProtocolHandler::with_builtin_tools(ServerInfo::default())
}

/// Feed `input` through a transport and return every output line.
async fn run_lines(input: &str) -> Vec<String> {
    let reader = BufReader::new(input.as_bytes());
    let mut transport = StdioTransport::with_io(handler(), reader, Vec::new());
    transport.run().await.expect("transport should finish cleanly");

    let (_, _, output) = transport.into_parts();
    let output = String::from_utf8(output).expect("output is UTF-8");
    assert!(
        output.is_empty() || output.ends_with('\n'),
        "every response must be newline-terminated: {output:?}"
    );
    output.lines().map(str::to_string).collect()
}

fn parse(line: &str) -> Value {
    serde_json::from_str(line).unwrap_or_else(|e| panic!("bad response line {line:?}: {e}"))
}

#[tokio::test]
async fn test_one_response_per_request_in_order() {
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":"two","method":"tools/list"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"echo","arguments":{"message":"hi"}}}"#,
        "\n",
    );
    let lines = run_lines(input).await;
    assert_eq!(lines.len(), 3);

    assert_eq!(lines[0], r#"{"jsonrpc":"2.0","id":1,"result":{"status":"pong"}}"#);
    assert_eq!(parse(&lines[1])["id"], "two");
    let echo = parse(&lines[2]);
    assert_eq!(echo["id"], 3);
    assert_eq!(echo["result"]["content"][0]["text"], "Echo: hi");
}

#[tokio::test]
async fn test_blank_lines_are_skipped() {
    let input = "\n   \n{\"method\":\"ping\",\"id\":1}\n\t\n\n";
    let lines = run_lines(input).await;
    assert_eq!(lines.len(), 1);
    assert_eq!(parse(&lines[0])["result"]["status"], "pong");
}

#[tokio::test]
async fn test_crlf_terminated_lines() {
    let lines = run_lines("{\"method\":\"ping\",\"id\":7}\r\n").await;
    assert_eq!(lines, vec![r#"{"jsonrpc":"2.0","id":7,"result":{"status":"pong"}}"#]);
}

#[tokio::test]
async fn test_final_line_without_newline() {
    let lines = run_lines(r#"{"method":"ping","id":8}"#).await;
    assert_eq!(lines.len(), 1);
    assert_eq!(parse(&lines[0])["id"], 8);
}

#[tokio::test]
async fn test_empty_input_exits_cleanly() {
    assert!(run_lines("").await.is_empty());
}

#[tokio::test]
async fn test_malformed_line_does_not_stop_the_loop() {
    let input = "this is not json\n{\"method\":\"ping\",\"id\":2}\n";
    let lines = run_lines(input).await;
    assert_eq!(lines.len(), 2);

    let first = parse(&lines[0]);
    assert_eq!(first["error"]["code"], -32700);
    assert!(first["id"].is_null());
    assert_eq!(parse(&lines[1])["result"]["status"], "pong");
}

#[tokio::test]
async fn test_invalid_utf8_line_is_answered_and_loop_continues() {
    let input: &[u8] = b"{\"method\":\"ping\",\"id\":\"\xff\xfe\"}\n{\"method\":\"ping\",\"id\":2}\n";
    let mut transport = StdioTransport::with_io(handler(), BufReader::new(input), Vec::new());
    transport.run().await.expect("a bad line must not end the loop");

    let (handler, _, output) = transport.into_parts();
    let output = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2, "one response per line: {output:?}");

    let first = parse(lines[0]);
    assert_eq!(first["error"]["code"], -32700);
    assert!(first["id"].is_null());
    assert_eq!(
        lines[1],
        r#"{"jsonrpc":"2.0","id":2,"result":{"status":"pong"}}"#
    );

    let history = handler.history().snapshot();
    assert_eq!(history.len(), 2);
    assert!(history[0].contains('\u{FFFD}'));
}

#[tokio::test]
async fn test_notification_still_gets_a_response() {
    let input = "{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n";
    let lines = run_lines(input).await;
    assert_eq!(lines.len(), 1);
    let resp = parse(&lines[0]);
    assert!(resp["id"].is_null());
    assert_eq!(resp["error"]["code"], -32601);
}

#[tokio::test]
async fn test_history_survives_the_loop() {
    let input: String = (1..=12)
        .map(|i| format!("{{\"method\":\"ping\",\"id\":{i}}}\n"))
        .collect();
    let reader = BufReader::new(input.as_bytes());
    let mut transport = StdioTransport::with_io(handler(), reader, Vec::new());
    transport.run().await.unwrap();

    let history = transport.handler().history().snapshot();
    assert_eq!(history.len(), 10);
    assert_eq!(history[0], r#"{"method":"ping","id":3}"#);
    assert_eq!(history[9], r#"{"method":"ping","id":12}"#);
}

#[tokio::test]
async fn test_write_failure_is_reported() {
    let reader = BufReader::new(&b"{\"method\":\"ping\",\"id\":1}\n"[..]);
    let writer = tokio_test::io::Builder::new()
        .write_error(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
        .build();
    let mut transport = StdioTransport::with_io(handler(), reader, writer);

    let err = transport.run().await.unwrap_err();
    assert!(matches!(err, McpError::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
}
