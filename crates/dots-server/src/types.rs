//! Shared types for the dots TCP server.
//!
//! This module defines:
//! - `ClientId`: a lightweight handle for connected clients
//! - outbound channel aliases between the session layer and each
//!   connection's writer task

use std::collections::HashMap;
use std::sync::Arc;

use dots_protocol::ServerMessage;
use tokio::sync::mpsc;
use tokio::sync::RwLock;

/// Identifier for a connected client.
///
/// This is intentionally opaque; we just guarantee uniqueness over
/// the lifetime of the process. It is also the `player_id` handed
/// back on login, never a raw socket handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub u64);

/// Outbound messages to a given client.
pub type OutboundTx = mpsc::UnboundedSender<ServerMessage>;
pub type OutboundRx = mpsc::UnboundedReceiver<ServerMessage>;

/// Registry of connected clients and their outbound channels.
///
/// - Key: `ClientId`
/// - Value: `OutboundTx` to send `ServerMessage`s to that client.
pub type ClientRegistry = Arc<RwLock<HashMap<ClientId, OutboundTx>>>;
