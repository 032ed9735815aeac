//! Integer grid coordinates and cardinal headings.

use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A (row, col) coordinate. Used for tile positions inside a layer and for
/// chunk positions on the world map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IntPoint {
    pub row: i32,
    pub col: i32,
}

impl IntPoint {
    pub const ZERO: IntPoint = IntPoint { row: 0, col: 0 };

    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// World-absolute tile coordinate of `local` inside `chunk`.
    pub fn absolute(chunk: IntPoint, local: IntPoint, extent: IntPoint) -> IntPoint {
        IntPoint::new(
            chunk.row * extent.row + local.row,
            chunk.col * extent.col + local.col,
        )
    }

    /// Inverse of [`IntPoint::absolute`]: split an absolute tile coordinate into
    /// its chunk and local parts. Works for negative coordinates.
    pub fn split_absolute(absolute: IntPoint, extent: IntPoint) -> (IntPoint, IntPoint) {
        let chunk = IntPoint::new(
            absolute.row.div_euclid(extent.row),
            absolute.col.div_euclid(extent.col),
        );
        let local = IntPoint::new(
            absolute.row.rem_euclid(extent.row),
            absolute.col.rem_euclid(extent.col),
        );
        (chunk, local)
    }

    /// Chebyshev distance.
    pub fn chebyshev(self, other: IntPoint) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }
}

impl Add for IntPoint {
    type Output = IntPoint;

    fn add(self, rhs: IntPoint) -> IntPoint {
        IntPoint::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl Sub for IntPoint {
    type Output = IntPoint;

    fn sub(self, rhs: IntPoint) -> IntPoint {
        IntPoint::new(self.row - rhs.row, self.col - rhs.col)
    }
}

impl Neg for IntPoint {
    type Output = IntPoint;

    fn neg(self) -> IntPoint {
        IntPoint::new(-self.row, -self.col)
    }
}

impl std::fmt::Display for IntPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Cardinal heading used by corridor carving and player movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Clockwise order starting from `Up`.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    pub fn rotate_clockwise(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    pub fn rotate_counterclockwise(self) -> Direction {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    pub fn opposite(self) -> Direction {
        self.rotate_clockwise().rotate_clockwise()
    }

    /// Unit step in (row, col) space.
    pub fn offset(self) -> IntPoint {
        match self {
            Direction::Up => IntPoint::new(-1, 0),
            Direction::Right => IntPoint::new(0, 1),
            Direction::Down => IntPoint::new(1, 0),
            Direction::Left => IntPoint::new(0, -1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = IntPoint::new(3, -2);
        let b = IntPoint::new(1, 5);
        assert_eq!(a + b, IntPoint::new(4, 3));
        assert_eq!(a - b, IntPoint::new(2, -7));
        assert_eq!(-a, IntPoint::new(-3, 2));
    }

    #[test]
    fn test_absolute_round_trip() {
        let extent = IntPoint::new(20, 30);
        let abs = IntPoint::absolute(IntPoint::new(2, 3), IntPoint::new(5, 7), extent);
        assert_eq!(abs, IntPoint::new(45, 97));
        assert_eq!(
            IntPoint::split_absolute(abs, extent),
            (IntPoint::new(2, 3), IntPoint::new(5, 7))
        );

        // One step left of chunk 0 lands in chunk -1
        let (chunk, local) = IntPoint::split_absolute(IntPoint::new(0, -1), extent);
        assert_eq!(chunk, IntPoint::new(0, -1));
        assert_eq!(local, IntPoint::new(0, 29));
    }

    #[test]
    fn test_rotation_wraps_both_ways() {
        let mut dir = Direction::Up;
        for _ in 0..4 {
            dir = dir.rotate_counterclockwise();
        }
        assert_eq!(dir, Direction::Up);

        assert_eq!(Direction::Up.rotate_counterclockwise(), Direction::Left);
        assert_eq!(Direction::Left.rotate_clockwise(), Direction::Up);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn test_offsets_cancel() {
        for dir in Direction::ALL {
            assert_eq!(dir.offset() + dir.opposite().offset(), IntPoint::ZERO);
        }
    }
}
