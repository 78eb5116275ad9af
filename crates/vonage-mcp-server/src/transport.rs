//! Newline-delimited stdio transport.
//!
//! Each line on the input is one JSON-RPC message (or batch).  Responses are
//! written one per line.  A request is answered before the next line is
//! read, so at most one tool call is in flight.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::Result;
use crate::mcp::McpServer;

/// Serve `server` over arbitrary line-oriented streams until `reader` hits
/// EOF.
pub async fn serve<R, W>(server: &McpServer, mut reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut handled: u64 = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        // Invalid UTF-8 is left for the JSON parser to reject.
        let decoded = String::from_utf8_lossy(&buf);
        let line = decoded.trim();
        if line.is_empty() {
            continue;
        }
        handled += 1;

        if let Some(response) = server.handle_message(line).await {
            let mut encoded = serde_json::to_vec(&response)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
        }
    }

    tracing::info!(messages = handled, "input closed, stopping MCP server");
    Ok(())
}

/// Serve `server` on the process's stdin and stdout.
pub async fn serve_stdio(server: &McpServer) -> Result<()> {
    tracing::info!(
        tools = server.list_tools().len(),
        "MCP server listening on stdio"
    );
    serve(server, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}
