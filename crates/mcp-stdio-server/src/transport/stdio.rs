//! Stdio transport: reads JSON-RPC lines from stdin, writes to stdout.
//!
//! Generic over the reader and writer so the same loop can be driven from
//! in-memory buffers.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};

use crate::protocol::{codec, ProtocolHandler};
use crate::types::{McpError, McpResult};

/// Line-delimited duplex channel in front of a [`ProtocolHandler`].
pub struct StdioTransport<R = BufReader<Stdin>, W = Stdout> {
    handler: ProtocolHandler,
    reader: R,
    writer: W,
    buf: Vec<u8>,
}

impl StdioTransport {
    /// Bind to the process's stdin and stdout.
    pub fn new(handler: ProtocolHandler) -> Self {
        Self::with_io(handler, BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn with_io(handler: ProtocolHandler, reader: R, writer: W) -> Self {
        Self {
            handler,
            reader,
            writer,
            buf: Vec::new(),
        }
    }

    pub fn handler(&self) -> &ProtocolHandler {
        &self.handler
    }

    pub fn into_parts(self) -> (ProtocolHandler, R, W) {
        (self.handler, self.reader, self.writer)
    }

    /// Next line's raw bytes without the terminator, or `None` at end of
    /// stream. Decoding is left to the handler so a bad line cannot end the
    /// loop.
    pub async fn read_line(&mut self) -> McpResult<Option<Vec<u8>>> {
        self.buf.clear();
        let bytes_read = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .await
            .map_err(McpError::Io)?;

        if bytes_read == 0 {
            return Ok(None);
        }

        let mut end = self.buf.len();
        while end > 0 && matches!(self.buf[end - 1], b'\n' | b'\r') {
            end -= 1;
        }
        Ok(Some(self.buf[..end].to_vec()))
    }

    /// Write one framed line and flush it.
    pub async fn write_line(&mut self, line: &str) -> McpResult<()> {
        let framed = codec::frame(line);
        self.writer
            .write_all(framed.as_bytes())
            .await
            .map_err(McpError::Io)?;
        self.writer.flush().await.map_err(McpError::Io)?;
        Ok(())
    }

    /// Run the transport loop until the reader hits end of stream.
    pub async fn run(&mut self) -> McpResult<()> {
        tracing::info!("Stdio transport started");
        let mut request_count: u64 = 0;

        while let Some(line) = self.read_line().await? {
            if line.iter().all(u8::is_ascii_whitespace) {
                tracing::debug!("Received empty line, ignoring");
                continue;
            }

            request_count += 1;
            tracing::debug!(
                target: "wire",
                "[IN #{request_count}] {}",
                String::from_utf8_lossy(&line)
            );

            let response = self.handler.handle_bytes(&line);

            tracing::debug!(target: "wire", "[OUT #{request_count}] {response}");
            self.write_line(&response).await.map_err(|e| {
                tracing::error!("Failed to write response #{request_count}: {e}");
                e
            })?;
        }

        tracing::info!("EOF on stdin after {request_count} requests, shutting down");
        Ok(())
    }
}
