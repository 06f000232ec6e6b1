//! Error types for the rules core.

use thiserror::Error;

/// Reasons a line placement is rejected.
///
/// Rejected placements leave the game state untouched; the caller is
/// expected to report the error to the offending player only.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum PlaceError {
    /// The game has already ended; no further moves are accepted.
    #[error("Game is already over")]
    GameOver,

    /// Turn enforcement is enabled and the acting seat is not the
    /// seat whose turn it is.
    #[error("Not your turn")]
    NotYourTurn,

    /// `(x, y)` is outside the valid index range for the requested
    /// orientation.
    #[error("Line out of bounds")]
    OutOfBounds,

    /// That exact edge has already been placed.
    #[error("Line already placed")]
    AlreadyPlaced,
}
