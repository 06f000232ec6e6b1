//! dots-protocol
//!
//! Wire-level encoding/decoding for the dots-and-boxes server.
//!
//! This crate turns newline-framed JSON lines into typed messages and
//! back again; the server core depends only on the typed
//! representation, never on the JSON shapes.
//!
//! - [`messages`]   : typed client/server message enums
//! - [`json_codec`] : line framing, decode/encode, snapshot rendering

pub mod messages;
pub mod json_codec;

pub use messages::{
    BoardWire,
    ClientMessage,
    RoomStatus,
    RoomSummaryWire,
    ServerMessage,
    WireOrientation,
};

pub use json_codec::{decode_line, encode_line, game_state_message, CodecError};
