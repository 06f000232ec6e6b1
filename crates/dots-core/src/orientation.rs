//! Edge orientation (horizontal / vertical).

/// Orientation of a single edge between two adjacent dots.
///
/// A horizontal edge at `(x, y)` connects dot `(x, y)` to `(x+1, y)`;
/// a vertical edge at `(x, y)` connects dot `(x, y)` to `(x, y+1)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}
