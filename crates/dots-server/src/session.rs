//! Per-connection session coordinator.
//!
//! Tracks one connection's display name and room binding, translates
//! decoded client messages into registry/engine calls, and pushes the
//! resulting replies and broadcasts onto the affected connections'
//! outbound channels.
//!
//! State machine: anonymous until `LOGIN`, logged in until a room is
//! entered, then in-room until the connection closes. `LOGIN` again
//! just rebinds the name; there is no way out of a room other than
//! disconnecting.

use std::sync::Arc;

use tracing::{debug, info, warn};

use dots_core::{Orientation, DEFAULT_GRID_SIZE};
use dots_protocol::json_codec;
use dots_protocol::{ClientMessage, RoomStatus, RoomSummaryWire, ServerMessage};

use crate::rooms::{LeaveOutcome, RoomRegistry, RoomSummary};
use crate::types::{ClientId, ClientRegistry, OutboundTx};

const NOT_LOGGED_IN: &str = "Not logged in";
const NOT_IN_A_ROOM: &str = "Not in a room";
const ALREADY_IN_A_ROOM: &str = "Already in a room";
const OPPONENT_LEFT: &str = "Opponent disconnected. Room closed.";

/// Session state for one connection.
pub struct Session {
    client_id: ClientId,
    registry: Arc<RoomRegistry>,
    clients: ClientRegistry,
    out: OutboundTx,

    /// Display name, set by `LOGIN`.
    name: Option<String>,

    /// Id of the room this connection is seated in.
    room_id: Option<String>,
}

impl Session {
    pub fn new(
        client_id: ClientId,
        registry: Arc<RoomRegistry>,
        clients: ClientRegistry,
        out: OutboundTx,
    ) -> Self {
        Session {
            client_id,
            registry,
            clients,
            out,
            name: None,
            room_id: None,
        }
    }

    /// Handle one decoded client message.
    pub async fn handle(&mut self, msg: ClientMessage) {
        match msg {
            ClientMessage::Login { user } => self.handle_login(user),
            ClientMessage::CreateRoom { room_id, grid_size } => {
                self.handle_create(room_id, grid_size).await
            }
            ClientMessage::JoinRoom { room_id } => self.handle_join(room_id).await,
            ClientMessage::ListRooms => self.handle_list().await,
            ClientMessage::PlaceLine { x, y, orientation } => {
                self.handle_place(x, y, orientation.into()).await
            }
            ClientMessage::Ping => self.reply(ServerMessage::Pong),
        }
    }

    /// Send a protocol-level error back to this connection.
    pub fn reply_error(&self, msg: impl Into<String>) {
        self.reply(ServerMessage::Error { msg: msg.into() });
    }

    /// Release this connection's seat, notifying an abandoned
    /// opponent. Called exactly once, when the connection ends.
    pub async fn close(&mut self) {
        let Some(outcome) = self.registry.leave(self.client_id).await else {
            return;
        };

        match outcome {
            LeaveOutcome::RoomFreed { room_id } => {
                info!(client = self.client_id.0, room = %room_id, "room freed");
            }
            LeaveOutcome::SeatVacated { room_id } => {
                info!(client = self.client_id.0, room = %room_id, "seat vacated");
            }
            LeaveOutcome::RoomDissolved { room_id, notify } => {
                info!(
                    client = self.client_id.0,
                    room = %room_id,
                    survivor = notify.client.0,
                    "room dissolved mid-game"
                );
                self.send_to(
                    notify.client,
                    ServerMessage::Error {
                        msg: OPPONENT_LEFT.to_string(),
                    },
                )
                .await;
            }
        }
        self.room_id = None;
    }

    fn handle_login(&mut self, user: String) {
        // Rebinding is allowed and idempotent.
        info!(client = self.client_id.0, user = %user, "login");
        self.name = Some(user);
        self.reply(ServerMessage::LoginOk {
            player_id: self.client_id.0,
        });
    }

    async fn handle_create(&mut self, room_id: String, grid_size: Option<usize>) {
        let Some(name) = self.name.clone() else {
            return self.reply_error(NOT_LOGGED_IN);
        };
        if self.room_id.is_some() {
            return self.reply_error(ALREADY_IN_A_ROOM);
        }
        let grid_size = grid_size.unwrap_or(DEFAULT_GRID_SIZE);

        match self
            .registry
            .create(&room_id, self.client_id, &name, grid_size)
            .await
        {
            Ok(()) => {
                info!(client = self.client_id.0, room = %room_id, grid_size, "room created");
                self.room_id = Some(room_id.clone());
                self.reply(ServerMessage::RoomJoined {
                    room_id,
                    player_num: 0,
                });
            }
            Err(e) => {
                debug!(client = self.client_id.0, room = %room_id, error = %e, "create rejected");
                self.reply_error(e.to_string());
            }
        }
    }

    async fn handle_join(&mut self, room_id: String) {
        let Some(name) = self.name.clone() else {
            return self.reply_error(NOT_LOGGED_IN);
        };
        if self.room_id.is_some() {
            return self.reply_error(ALREADY_IN_A_ROOM);
        }

        match self.registry.join(&room_id, self.client_id, &name).await {
            Ok(joined) => {
                info!(client = self.client_id.0, room = %room_id, "game starting");
                self.room_id = Some(room_id.clone());
                self.reply(ServerMessage::RoomJoined {
                    room_id: room_id.clone(),
                    player_num: joined.seat.index() as u8,
                });

                let [player1, player2] = joined.players;
                self.broadcast(
                    &joined.recipients,
                    ServerMessage::GameStart { player1, player2 },
                    None,
                )
                .await;
                self.broadcast(
                    &joined.recipients,
                    json_codec::game_state_message(&joined.snapshot, &room_id),
                    None,
                )
                .await;
            }
            Err(e) => {
                debug!(client = self.client_id.0, room = %room_id, error = %e, "join rejected");
                self.reply_error(e.to_string());
            }
        }
    }

    async fn handle_list(&self) {
        let rooms = self
            .registry
            .list()
            .await
            .into_iter()
            .map(summary_to_wire)
            .collect();
        self.reply(ServerMessage::RoomList { rooms });
    }

    async fn handle_place(&mut self, x: i32, y: i32, orientation: Orientation) {
        let Some(room_id) = self.room_id.clone() else {
            return self.reply_error(NOT_IN_A_ROOM);
        };

        match self
            .registry
            .place_line(&room_id, self.client_id, x, y, orientation)
            .await
        {
            Ok(outcome) => {
                debug!(
                    client = self.client_id.0,
                    room = %room_id,
                    seat = outcome.seat.index(),
                    x,
                    y,
                    boxes = outcome.placed.boxes_completed,
                    "line placed"
                );
                self.broadcast(
                    &outcome.recipients,
                    json_codec::game_state_message(&outcome.snapshot, &room_id),
                    None,
                )
                .await;
            }
            Err(e) => {
                debug!(client = self.client_id.0, room = %room_id, error = %e, "move rejected");
                self.reply_error(e.to_string());
            }
        }
    }

    fn reply(&self, msg: ServerMessage) {
        // The writer task owning the other end may already be gone
        // during shutdown; nothing to do then.
        let _ = self.out.send(msg);
    }

    async fn send_to(&self, target: ClientId, msg: ServerMessage) {
        let tx = {
            let guard = self.clients.read().await;
            guard.get(&target).cloned()
        };
        if let Some(tx) = tx {
            let _ = tx.send(msg);
        } else {
            warn!(target = target.0, "dropping message for departed client");
        }
    }

    /// Deliver `msg` to every recipient except `exclude`.
    ///
    /// Channel snapshot first, sends after, so no registry lock is
    /// held while delivering.
    async fn broadcast(&self, recipients: &[ClientId], msg: ServerMessage, exclude: Option<ClientId>) {
        let targets: Vec<OutboundTx> = {
            let guard = self.clients.read().await;
            recipients
                .iter()
                .filter(|id| Some(**id) != exclude)
                .filter_map(|id| guard.get(id).cloned())
                .collect()
        };
        for tx in targets {
            let _ = tx.send(msg.clone());
        }
    }
}

fn summary_to_wire(summary: RoomSummary) -> RoomSummaryWire {
    RoomSummaryWire {
        room_id: summary.room_id,
        player_count: summary.player_count,
        grid_size: summary.grid_size,
        status: if summary.started {
            RoomStatus::Playing
        } else {
            RoomStatus::Waiting
        },
        players: summary.players,
    }
}
