//! Line-delimited JSON-RPC transport over stdin/stdout
//!
//! One implicit session for the lifetime of the process; the token gate does
//! not apply here. Logging is pinned to stderr so stdout stays a clean
//! protocol channel.

use serde_json::Value;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use crate::mcp::rpc::json_rpc_error;
use crate::mcp::server::handle_json_rpc_value;
use crate::AppState;

pub async fn serve(state: AppState) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = BufReader::new(stdin).lines();
    let mut stdout = io::stdout();

    info!("stdio transport ready");

    while let Some(line) = lines.next_line().await? {
        let Some(response) = route_line(&state, &line).await else {
            continue;
        };

        let serialized = serde_json::to_string(&response).expect("jsonrpc response serialization");
        stdout.write_all(serialized.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    info!("stdio transport closed");
    Ok(())
}

/// Routes one input line. `None` means nothing to write back (blank line or
/// notification).
pub async fn route_line(state: &AppState, line: &str) -> Option<Value> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let payload: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(_) => return Some(json_rpc_error(None, -32700, "Parse error")),
    };

    handle_json_rpc_value(state, payload).await
}
