//! Typed wire messages.
//!
//! One JSON object per line, newline-terminated, UTF-8, tagged by the
//! `"op"` field:
//!
//! Client → server:
//!
//! - `{"op":"LOGIN","user":"alice"}`
//! - `{"op":"CREATE_ROOM","room_id":"R1","grid_size":3}` (`grid_size`
//!   is requested boxes per side, optional)
//! - `{"op":"JOIN_ROOM","room_id":"R1"}`
//! - `{"op":"LIST_ROOMS"}`
//! - `{"op":"PLACE_LINE","x":0,"y":0,"orientation":"H"}`
//! - `{"op":"PING"}`
//!
//! Server → client: `LOGIN_OK`, `ROOM_JOINED`, `GAME_START`,
//! `GAME_STATE`, `ROOM_LIST`, `ERROR`, `PONG`.
//!
//! Board matrices are integers: `horizontal`/`vertical` hold `0`/`1`
//! for edge presence, `boxes` and `winner` hold `-1` (unowned / draw)
//! or a seat index.

use serde::{Deserialize, Serialize};

use dots_core::Orientation;

/// Edge orientation as it appears on the wire (`"H"` / `"V"`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireOrientation {
    #[serde(rename = "H")]
    Horizontal,
    #[serde(rename = "V")]
    Vertical,
}

impl From<WireOrientation> for Orientation {
    fn from(o: WireOrientation) -> Self {
        match o {
            WireOrientation::Horizontal => Orientation::Horizontal,
            WireOrientation::Vertical => Orientation::Vertical,
        }
    }
}

/// A request from a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Bind (or rebind) the connection's display name.
    Login { user: String },

    /// Create a room and take seat 0. `grid_size` is the requested
    /// box count per side; the server default applies when absent.
    CreateRoom {
        room_id: String,
        #[serde(default)]
        grid_size: Option<usize>,
    },

    /// Take seat 1 of an existing room.
    JoinRoom { room_id: String },

    /// Snapshot of active rooms.
    ListRooms,

    /// Place one edge.
    PlaceLine {
        x: i32,
        y: i32,
        orientation: WireOrientation,
    },

    /// Keep-alive; answered with `PONG`.
    Ping,
}

/// A reply or broadcast from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// Login acknowledgement carrying the opaque per-connection id.
    LoginOk { player_id: u64 },

    /// Sent to a player on entering a room; `player_num` is their
    /// seat index.
    RoomJoined { room_id: String, player_num: u8 },

    /// Broadcast to both seats the moment the second one fills.
    GameStart { player1: String, player2: String },

    /// Authoritative state snapshot, broadcast after every accepted
    /// move (and once at game start).
    GameState {
        room_id: String,
        turn: u8,
        scores: [u32; 2],
        board: BoardWire,
        game_over: bool,
        winner: i8,
    },

    /// Reply to `LIST_ROOMS`.
    RoomList { rooms: Vec<RoomSummaryWire> },

    /// Protocol or domain error; the connection stays open.
    Error { msg: String },

    /// Reply to `PING`.
    Pong,
}

/// Rendered board matrices inside `GAME_STATE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardWire {
    /// `dot_dim` rows of `dot_dim - 1` entries, `0`/`1`.
    pub horizontal: Vec<Vec<u8>>,

    /// `dot_dim - 1` rows of `dot_dim` entries, `0`/`1`.
    pub vertical: Vec<Vec<u8>>,

    /// Box owners: `-1` unowned, else the owning seat index.
    pub boxes: Vec<Vec<i8>>,
}

/// One room entry inside `ROOM_LIST`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryWire {
    pub room_id: String,
    pub player_count: u8,
    pub grid_size: usize,
    pub status: RoomStatus,
    pub players: Vec<String>,
}

/// Whether a listed room is still waiting for its second seat.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Playing,
}
