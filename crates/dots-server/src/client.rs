//! Per-connection I/O.
//!
//! Each connection gets a reader loop (this task) and a writer task
//! draining the outbound channel, so a slow peer only ever stalls its
//! own writer. Frames are newline-delimited JSON lines.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tracing::{debug, warn};

use dots_protocol::json_codec;

use crate::rooms::RoomRegistry;
use crate::session::Session;
use crate::types::{ClientId, ClientRegistry, OutboundRx, OutboundTx};

/// Run the client I/O loop for a single connection.
pub async fn run_client(
    client_id: ClientId,
    stream: TcpStream,
    registry: Arc<RoomRegistry>,
    clients: ClientRegistry,
    out_tx: OutboundTx,
    out_rx: OutboundRx,
) -> std::io::Result<()> {
    let (mut read_stream, write_stream) = stream.into_split();

    // Writer task: drains the outbound channel until every sender
    // (session + client registry entry) is gone.
    tokio::spawn(write_loop(client_id, write_stream, out_rx));

    let mut session = Session::new(client_id, registry, clients.clone(), out_tx);

    let mut buffer = Vec::new();
    let mut temp_buf = [0u8; 1024];
    let result = loop {
        match read_stream.read(&mut temp_buf).await {
            Ok(0) => {
                // EOF - client disconnected
                break Ok(());
            }
            Ok(n) => {
                buffer.extend_from_slice(&temp_buf[..n]);

                // Process complete lines
                while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                    let line = buffer.drain(..=newline_pos).collect::<Vec<u8>>();
                    let line_str = String::from_utf8_lossy(&line);
                    let line_str = line_str.trim();

                    if line_str.is_empty() {
                        continue;
                    }

                    match json_codec::decode_line(line_str) {
                        Ok(msg) => session.handle(msg).await,
                        Err(e) => {
                            debug!(client = client_id.0, error = %e, line = %line_str, "bad frame");
                            session.reply_error(e.to_string());
                        }
                    }
                }
            }
            Err(e) => break Err(e),
        }
    };

    // Cleanup runs exactly once, for orderly close and read failure
    // alike: free the seat, then drop the outbound channel.
    session.close().await;
    {
        let mut guard = clients.write().await;
        guard.remove(&client_id);
    }

    result
}

async fn write_loop(client_id: ClientId, mut write_stream: OwnedWriteHalf, mut out_rx: OutboundRx) {
    while let Some(msg) = out_rx.recv().await {
        let line = match json_codec::encode_line(&msg) {
            Ok(line) => line,
            Err(e) => {
                warn!(client = client_id.0, error = %e, "dropping unencodable message");
                continue;
            }
        };
        if let Err(e) = write_stream.write_all(line.as_bytes()).await {
            debug!(client = client_id.0, error = %e, "write failed");
            break;
        }
    }
}
