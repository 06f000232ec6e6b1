//! Seat (player slot) identifiers.

/// One of the two player slots in a room.
///
/// Seat `One` is always the room creator and always moves first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    /// Numeric index of this seat (`0` / `1`), as used on the wire
    /// and for score/seat array indexing.
    pub fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }

    /// The other seat.
    pub fn opponent(self) -> Self {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }
}
