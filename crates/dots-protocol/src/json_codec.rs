//! JSON line codec.
//!
//! Decoding is two-stage, mirroring the error split the server
//! reports to clients: bytes that are not JSON at all are a
//! [`CodecError::Syntax`], well-formed JSON that does not match the
//! message schema (missing `op`, unknown op, missing field) is a
//! [`CodecError::Schema`]. Both keep the connection open.

use serde_json::Value;
use thiserror::Error;

use dots_core::GameState;

use crate::messages::{BoardWire, ClientMessage, ServerMessage};

/// Decode or encode failure for one line.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The line is not valid JSON.
    #[error("Invalid JSON")]
    Syntax(#[source] serde_json::Error),

    /// The JSON does not match any known message shape.
    #[error("Invalid message: {0}")]
    Schema(serde_json::Error),

    /// An outbound message failed to serialize.
    #[error("Encode failure: {0}")]
    Encode(serde_json::Error),
}

/// Parse one (newline-stripped) line into a [`ClientMessage`].
pub fn decode_line(line: &str) -> Result<ClientMessage, CodecError> {
    let value: Value = serde_json::from_str(line).map_err(CodecError::Syntax)?;
    serde_json::from_value(value).map_err(CodecError::Schema)
}

/// Render a [`ServerMessage`] as a newline-terminated JSON line.
pub fn encode_line(msg: &ServerMessage) -> Result<String, CodecError> {
    let mut line = serde_json::to_string(msg).map_err(CodecError::Encode)?;
    line.push('\n');
    Ok(line)
}

/// Build the `GAME_STATE` snapshot message for a game.
pub fn game_state_message(game: &GameState, room_id: &str) -> ServerMessage {
    let grid = game.grid();

    let board = BoardWire {
        horizontal: grid
            .horizontal()
            .iter()
            .map(|row| row.iter().map(|&set| u8::from(set)).collect())
            .collect(),
        vertical: grid
            .vertical()
            .iter()
            .map(|row| row.iter().map(|&set| u8::from(set)).collect())
            .collect(),
        boxes: grid
            .boxes()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|owner| owner.map_or(-1, |seat| seat.index() as i8))
                    .collect()
            })
            .collect(),
    };

    ServerMessage::GameState {
        room_id: room_id.to_string(),
        turn: game.current_turn().index() as u8,
        scores: game.scores(),
        board,
        game_over: game.is_over(),
        winner: game.winner().map_or(-1, |seat| seat.index() as i8),
    }
}
