//! Grid positions and cardinal directions.
//!
//! The dungeon is 4-connected: a step moves one cell north, east, south
//! or west, and the grid metric is Manhattan distance. Diagonal moves do
//! not exist anywhere in the simulation.

use std::fmt;

/// A cell position. `x` grows eastwards, `y` grows southwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Pos {
    /// Construct a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, the geodesic of the 4-connected grid.
    pub fn distance(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The adjacent position in direction `dir`. No bounds check.
    pub fn step(self, dir: Dir) -> Pos {
        let (dx, dy) = dir.delta();
        Pos::new(self.x + dx, self.y + dy)
    }

    /// The four cardinal neighbours in [`Dir::ALL`] order. No bounds check.
    pub fn cardinal(self) -> [Pos; 4] {
        Dir::ALL.map(|d| self.step(d))
    }

    /// Whether `other` shares a row or a column with `self`.
    pub fn is_aligned(self, other: Pos) -> bool {
        self.x == other.x || self.y == other.y
    }

    /// Whether `other` is one cardinal step away.
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.distance(other) == 1
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    /// Towards decreasing `y`.
    North,
    /// Towards increasing `x`.
    East,
    /// Towards increasing `y`.
    South,
    /// Towards decreasing `x`.
    West,
}

impl Dir {
    /// All directions in a fixed order. Neighbour enumeration everywhere
    /// follows this order, which keeps tie-breaking deterministic.
    pub const ALL: [Dir; 4] = [Dir::North, Dir::East, Dir::South, Dir::West];

    /// `(dx, dy)` offset of one step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::North => (0, -1),
            Dir::East => (1, 0),
            Dir::South => (0, 1),
            Dir::West => (-1, 0),
        }
    }

    /// The opposite direction.
    pub fn reverse(self) -> Dir {
        match self {
            Dir::North => Dir::South,
            Dir::East => Dir::West,
            Dir::South => Dir::North,
            Dir::West => Dir::East,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn step_and_reverse_cancel() {
        let p = Pos::new(3, 4);
        for d in Dir::ALL {
            assert_eq!(p.step(d).step(d.reverse()), p);
            assert!(p.is_adjacent(p.step(d)));
        }
    }

    #[test]
    fn cardinal_order_is_fixed() {
        let p = Pos::new(0, 0);
        assert_eq!(
            p.cardinal(),
            [Pos::new(0, -1), Pos::new(1, 0), Pos::new(0, 1), Pos::new(-1, 0)]
        );
    }

    #[test]
    fn alignment() {
        let p = Pos::new(2, 2);
        assert!(p.is_aligned(Pos::new(2, 9)));
        assert!(p.is_aligned(Pos::new(-4, 2)));
        assert!(!p.is_aligned(Pos::new(3, 3)));
    }

    proptest! {
        #[test]
        fn distance_is_metric(
            ax in -50i32..50, ay in -50i32..50,
            bx in -50i32..50, by in -50i32..50,
            cx in -50i32..50, cy in -50i32..50,
        ) {
            let a = Pos::new(ax, ay);
            let b = Pos::new(bx, by);
            let c = Pos::new(cx, cy);
            prop_assert_eq!(a.distance(a), 0);
            prop_assert_eq!(a.distance(b), b.distance(a));
            prop_assert!(a.distance(c) <= a.distance(b) + b.distance(c));
        }
    }
}
