//! Per-room game state machine.
//!
//! [`GameState`] owns one grid's line/box/score state and applies a
//! single line placement at a time:
//! - validates bounds and duplicate edges,
//! - completes the at-most-two boxes adjacent to the new edge,
//! - keeps the turn with the acting seat when a box was completed
//!   (extra-turn rule), flips it otherwise,
//! - detects game end and the winner.
//!
//! The acting seat is taken at face value unless turn enforcement is
//! enabled; see [`GameState::new`].

use std::cmp::Ordering;

use crate::error::PlaceError;
use crate::grid::Grid;
use crate::orientation::Orientation;
use crate::seat::Seat;

/// Upper bound on the dot dimension of a grid.
pub const MAX_GRID_DOTS: usize = 6;

/// Lower bound on the dot dimension of a grid.
pub const MIN_GRID_DOTS: usize = 3;

/// Requested boxes per side when the client does not specify one.
pub const DEFAULT_GRID_SIZE: usize = 4;

/// Authoritative state of one dots-and-boxes game.
#[derive(Debug, Clone)]
pub struct GameState {
    grid: Grid,
    scores: [u32; 2],
    current_turn: Seat,
    game_over: bool,
    winner: Option<Seat>,
    enforce_turns: bool,
}

/// Result of a successful line placement.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Boxes completed by this move (0, 1, or 2).
    pub boxes_completed: u8,

    /// Whether the turn passed to the other seat (it does exactly
    /// when no box was completed).
    pub turn_passed: bool,
}

impl GameState {
    /// Fresh game for a requested box count per side.
    ///
    /// The dot dimension is `clamp(requested_size + 1, MIN_GRID_DOTS,
    /// MAX_GRID_DOTS)` and is fixed for the game's lifetime. Seat One
    /// moves first.
    ///
    /// `enforce_turns` rejects out-of-turn placements with
    /// [`PlaceError::NotYourTurn`]; when disabled, any seated player
    /// may move at any time.
    pub fn new(requested_size: usize, enforce_turns: bool) -> Self {
        let dot_dim = (requested_size + 1).clamp(MIN_GRID_DOTS, MAX_GRID_DOTS);
        GameState {
            grid: Grid::new(dot_dim),
            scores: [0, 0],
            current_turn: Seat::One,
            game_over: false,
            winner: None,
            enforce_turns,
        }
    }

    /// Validate and apply a single line placement by `seat`.
    ///
    /// On success the edge is marked, adjacent boxes are completed
    /// and scored for `seat`, the turn is advanced, and game end is
    /// recomputed. On failure nothing changes.
    pub fn place_line(
        &mut self,
        x: i32,
        y: i32,
        orientation: Orientation,
        seat: Seat,
    ) -> Result<Placement, PlaceError> {
        if self.game_over {
            return Err(PlaceError::GameOver);
        }
        if self.enforce_turns && seat != self.current_turn {
            return Err(PlaceError::NotYourTurn);
        }

        self.grid.set_edge(x, y, orientation)?;

        // Bounds were just checked, so x/y are non-negative here.
        let (x, y) = (x as usize, y as usize);
        let box_dim = self.grid.box_dim();

        let mut completed = 0u8;
        match orientation {
            Orientation::Horizontal => {
                // Boxes above and below the edge.
                if y > 0 && self.grid.try_complete(y - 1, x, seat) {
                    completed += 1;
                }
                if y < box_dim && self.grid.try_complete(y, x, seat) {
                    completed += 1;
                }
            }
            Orientation::Vertical => {
                // Boxes left and right of the edge.
                if x > 0 && self.grid.try_complete(y, x - 1, seat) {
                    completed += 1;
                }
                if x < box_dim && self.grid.try_complete(y, x, seat) {
                    completed += 1;
                }
            }
        }

        self.scores[seat.index()] += u32::from(completed);

        let turn_passed = completed == 0;
        if turn_passed {
            self.current_turn = self.current_turn.opponent();
        }

        let filled = (self.scores[0] + self.scores[1]) as usize;
        if filled >= self.grid.total_boxes() {
            self.game_over = true;
            self.winner = match self.scores[0].cmp(&self.scores[1]) {
                Ordering::Greater => Some(Seat::One),
                Ordering::Less => Some(Seat::Two),
                Ordering::Equal => None,
            };
        }

        Ok(Placement {
            boxes_completed: completed,
            turn_passed,
        })
    }

    /// Whether the game has ended.
    pub fn is_over(&self) -> bool {
        self.game_over
    }

    /// Winning seat; `None` means draw, or undecided while the game
    /// is still running.
    pub fn winner(&self) -> Option<Seat> {
        self.winner
    }

    /// Seat that moves next.
    pub fn current_turn(&self) -> Seat {
        self.current_turn
    }

    /// Current scores, indexed by seat.
    pub fn scores(&self) -> [u32; 2] {
        self.scores
    }

    /// Number of dots per axis.
    pub fn dot_dim(&self) -> usize {
        self.grid.dot_dim()
    }

    /// The underlying grid, for snapshot rendering.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}
