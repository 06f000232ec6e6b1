//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Accepts new TCP connections, bounded by `max_clients`.
//! - Assigns each connection a `ClientId`.
//! - Spawns one client task per connection; every task shares the
//!   room registry and the client outbound-channel registry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::client;
use crate::config::Config;
use crate::rooms::RoomRegistry;
use crate::types::{ClientId, ClientRegistry, OutboundRx, OutboundTx};

/// Global-ish counter for assigning unique `ClientId`s.
///
/// In a more elaborate setup you might encapsulate this in a struct,
/// but this is sufficient and threadsafe for our server.
static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_client_id() -> ClientId {
    let id = NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed);
    ClientId(id)
}

/// Run the TCP server with the given configuration.
///
/// A failure to bind is the one startup-fatal error; everything after
/// that is handled per connection.
pub async fn run(config: Config) -> Result<()> {
    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot listen on {addr}"))?;
    info!(%addr, "listening");

    serve(listener, config).await
}

/// Accept loop over an already-bound listener.
///
/// Split out from [`run`] so tests can bind an ephemeral port first.
pub async fn serve(listener: TcpListener, config: Config) -> Result<()> {
    // Shared registry of clients → outbound channels.
    let clients: ClientRegistry = Arc::new(tokio::sync::RwLock::new(Default::default()));

    // Shared room pool.
    let registry = Arc::new(RoomRegistry::new(config.max_rooms, config.enforce_turns));

    loop {
        let (stream, peer_addr) = listener.accept().await?;

        let current_clients = {
            let guard = clients.read().await;
            guard.len()
        };
        if current_clients >= config.max_clients {
            warn!(
                %peer_addr,
                max_clients = config.max_clients,
                "rejecting connection: max_clients reached"
            );
            // Just drop the stream; client will see connection closed.
            continue;
        }

        let client_id = next_client_id();
        info!(client = client_id.0, %peer_addr, "accepted connection");

        // Create outbound channel for this client.
        let (out_tx, out_rx): (OutboundTx, OutboundRx) = mpsc::unbounded_channel();

        // Register client.
        {
            let mut guard = clients.write().await;
            guard.insert(client_id, out_tx.clone());
        }

        // Clone handles to move into the client task.
        let clients_clone = clients.clone();
        let registry_clone = registry.clone();

        tokio::spawn(async move {
            match client::run_client(
                client_id,
                stream,
                registry_clone,
                clients_clone,
                out_tx,
                out_rx,
            )
            .await
            {
                Ok(()) => info!(client = client_id.0, "client disconnected"),
                Err(e) => warn!(client = client_id.0, error = %e, "client error"),
            }
        });
    }
}
