//! Error types for grid construction and dungeon parsing.

use gloam_core::Pos;
use std::fmt;

/// Errors arising from grid construction or dungeon queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceError {
    /// Attempted to construct a grid with zero cells.
    EmptySpace,
    /// A dimension exceeds the representable range.
    DimensionTooLarge {
        /// Which dimension ("width" or "height").
        name: &'static str,
        /// The requested size.
        value: u32,
        /// The largest accepted size.
        max: u32,
    },
    /// A position lies outside the grid.
    OutOfBounds {
        /// The offending position.
        pos: Pos,
        /// Grid width.
        width: i32,
        /// Grid height.
        height: i32,
    },
    /// A text map had rows of different lengths.
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of this row.
        found: usize,
    },
    /// A text map contained a character with no terrain meaning.
    UnknownGlyph {
        /// The character.
        glyph: char,
        /// Where it was found.
        pos: Pos,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySpace => write!(f, "grid must have at least one cell"),
            Self::DimensionTooLarge { name, value, max } => {
                write!(f, "{name} {value} exceeds maximum {max}")
            }
            Self::OutOfBounds { pos, width, height } => {
                write!(f, "position {pos} out of bounds: [0, {width}) x [0, {height})")
            }
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} cells, expected {expected}"),
            Self::UnknownGlyph { glyph, pos } => {
                write!(f, "unknown terrain glyph {glyph:?} at {pos}")
            }
        }
    }
}

impl std::error::Error for SpaceError {}
