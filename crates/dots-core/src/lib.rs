//! dots-core
//!
//! Pure dots-and-boxes game logic:
//! - seats and edge orientations
//! - the edge/box grid
//! - the per-room game state machine (placement, scoring, turn order)

pub mod seat;
pub mod orientation;
pub mod error;
pub mod grid;
pub mod game;

pub use seat::Seat;
pub use orientation::Orientation;
pub use error::PlaceError;
pub use grid::Grid;
pub use game::{GameState, Placement, DEFAULT_GRID_SIZE, MAX_GRID_DOTS, MIN_GRID_DOTS};
