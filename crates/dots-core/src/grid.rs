//! Edge and box storage for one game.
//!
//! Index conventions (dot grid of `dot_dim × dot_dim` points):
//! - `horizontal[row][col]`: edge from dot `(col, row)` to `(col+1, row)`;
//!   `row ∈ [0, dot_dim)`, `col ∈ [0, dot_dim-1)`.
//! - `vertical[row][col]`: edge from dot `(col, row)` to `(col, row+1)`;
//!   `row ∈ [0, dot_dim-1)`, `col ∈ [0, dot_dim)`.
//! - `boxes[row][col]`: owner of the unit box whose top-left dot is
//!   `(col, row)`; `(dot_dim-1) × (dot_dim-1)` cells.

use crate::error::PlaceError;
use crate::orientation::Orientation;
use crate::seat::Seat;

/// Edge-presence matrices and box ownership for one game.
#[derive(Debug, Clone)]
pub struct Grid {
    dot_dim: usize,
    horizontal: Vec<Vec<bool>>,
    vertical: Vec<Vec<bool>>,
    boxes: Vec<Vec<Option<Seat>>>,
}

impl Grid {
    /// Create an empty grid with the given dot dimension.
    pub fn new(dot_dim: usize) -> Self {
        let box_dim = dot_dim - 1;
        Grid {
            dot_dim,
            horizontal: vec![vec![false; box_dim]; dot_dim],
            vertical: vec![vec![false; dot_dim]; box_dim],
            boxes: vec![vec![None; box_dim]; box_dim],
        }
    }

    /// Number of dots per axis.
    pub fn dot_dim(&self) -> usize {
        self.dot_dim
    }

    /// Number of boxes per axis (one less than the dot dimension).
    pub fn box_dim(&self) -> usize {
        self.dot_dim - 1
    }

    /// Total number of boxes on the grid.
    pub fn total_boxes(&self) -> usize {
        self.box_dim() * self.box_dim()
    }

    /// Mark the edge at `(x, y)` with the given orientation.
    ///
    /// Fails `OutOfBounds` if `(x, y)` is outside the valid range for
    /// that orientation, `AlreadyPlaced` if the edge is already set.
    pub fn set_edge(&mut self, x: i32, y: i32, orientation: Orientation) -> Result<(), PlaceError> {
        let dot_dim = self.dot_dim as i32;
        let box_dim = dot_dim - 1;

        match orientation {
            Orientation::Horizontal => {
                if y < 0 || y >= dot_dim || x < 0 || x >= box_dim {
                    return Err(PlaceError::OutOfBounds);
                }
                let cell = &mut self.horizontal[y as usize][x as usize];
                if *cell {
                    return Err(PlaceError::AlreadyPlaced);
                }
                *cell = true;
            }
            Orientation::Vertical => {
                if y < 0 || y >= box_dim || x < 0 || x >= dot_dim {
                    return Err(PlaceError::OutOfBounds);
                }
                let cell = &mut self.vertical[y as usize][x as usize];
                if *cell {
                    return Err(PlaceError::AlreadyPlaced);
                }
                *cell = true;
            }
        }

        Ok(())
    }

    /// Try to complete the box at `(row, col)` for `seat`.
    ///
    /// Returns `true` only when the box is in range, unowned, and all
    /// four bounding edges are set; the owner is assigned at that
    /// moment and never reassigned.
    pub(crate) fn try_complete(&mut self, row: usize, col: usize, seat: Seat) -> bool {
        let box_dim = self.box_dim();
        if row >= box_dim || col >= box_dim {
            return false;
        }
        if self.boxes[row][col].is_some() {
            return false;
        }

        let top = self.horizontal[row][col];
        let bottom = self.horizontal[row + 1][col];
        let left = self.vertical[row][col];
        let right = self.vertical[row][col + 1];

        if top && bottom && left && right {
            self.boxes[row][col] = Some(seat);
            return true;
        }
        false
    }

    /// Count of boxes that have an owner.
    pub fn owned_boxes(&self) -> usize {
        self.boxes
            .iter()
            .map(|row| row.iter().filter(|b| b.is_some()).count())
            .sum()
    }

    /// Horizontal edge matrix, row-major (`dot_dim` rows).
    pub fn horizontal(&self) -> &[Vec<bool>] {
        &self.horizontal
    }

    /// Vertical edge matrix, row-major (`dot_dim - 1` rows).
    pub fn vertical(&self) -> &[Vec<bool>] {
        &self.vertical
    }

    /// Box ownership matrix, row-major.
    pub fn boxes(&self) -> &[Vec<Option<Seat>>] {
        &self.boxes
    }
}
