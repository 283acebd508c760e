//! Reusable level fixtures.
//!
//! - [`open_level`]: an all-ground rectangle.
//! - [`level`]: parse a text map, panicking on malformed input.
//! - [`TWO_ROOMS`], [`GARDEN`], [`PILLARS`]: small hand-drawn levels.

use gloam_core::{GridOracle, Pos, TerrainKind};
use gloam_space::Dungeon;

/// Two 3×3 rooms joined by a door at `(4, 2)`.
pub const TWO_ROOMS: &str = "
    #########
    #...#...#
    #...+...#
    #...#...#
    #########
";

/// A room with a foliage patch east of `(2, 2)` and a door south.
pub const GARDEN: &str = "
    #######
    #.....#
    #..\"\"\"#
    #.....#
    ###+###
";

/// An open 7×7 hall with four pillars.
pub const PILLARS: &str = "
    .......
    .#...#.
    .......
    .......
    .......
    .#...#.
    .......
";

/// An all-ground `width * height` level.
pub fn open_level(width: u32, height: u32) -> Dungeon {
    Dungeon::filled(width, height, TerrainKind::Ground)
        .unwrap_or_else(|e| panic!("bad fixture size {width}x{height}: {e}"))
}

/// Parse a text map.
pub fn level(text: &str) -> Dungeon {
    Dungeon::parse(text).unwrap_or_else(|e| panic!("bad fixture map: {e}"))
}

/// `text` with every cell lit.
pub fn lit_level(text: &str) -> Dungeon {
    let mut d = level(text);
    for p in d.grid().canonical_ordering() {
        d.set_lit(p, true);
    }
    d
}

/// Every in-bounds cell whose terrain is `kind`, row-major.
pub fn cells_of(d: &Dungeon, kind: TerrainKind) -> Vec<Pos> {
    d.grid()
        .canonical_ordering()
        .into_iter()
        .filter(|&p| d.terrain(p) == Some(kind))
        .collect()
}
