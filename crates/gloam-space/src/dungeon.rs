//! The dungeon level: a terrain store over a [`Grid`].
//!
//! [`Dungeon`] is the concrete [`GridOracle`] used by the engine. Besides
//! the terrain kind, each cell carries two flags the simulation reads but
//! never derives from terrain: whether the cell is lit, and whether the
//! player has explored it.

use std::fmt;

use crate::error::SpaceError;
use crate::grid::Grid;
use gloam_core::{GridOracle, Pos, TerrainKind};
use smallvec::SmallVec;

/// One dungeon cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    /// Current terrain, possibly an overlay kind.
    pub kind: TerrainKind,
    /// Whether a light source illuminates the cell.
    pub lit: bool,
    /// Whether the player knows the cell.
    pub explored: bool,
}

/// A rectangular dungeon level.
#[derive(Clone, Debug)]
pub struct Dungeon {
    grid: Grid,
    cells: Vec<Cell>,
    revision: u64,
}

impl Dungeon {
    /// A level of the given grid filled with `fill`, unlit and unexplored.
    pub fn new(grid: Grid, fill: TerrainKind) -> Self {
        let cell = Cell {
            kind: fill,
            ..Cell::default()
        };
        Self {
            grid,
            cells: vec![cell; grid.cell_count()],
            revision: 0,
        }
    }

    /// A `width * height` level filled with `fill`.
    pub fn filled(width: u32, height: u32, fill: TerrainKind) -> Result<Self, SpaceError> {
        Ok(Self::new(Grid::new(width, height)?, fill))
    }

    /// Parse a text map, one line per row.
    ///
    /// Glyphs: `#` wall, `.` ground, `+` door, `"` foliage, `:` rubble,
    /// `~` chasm. Blank lines are skipped and every row must have the
    /// same length.
    ///
    /// ```
    /// use gloam_core::{GridOracle, Pos, TerrainKind};
    /// use gloam_space::Dungeon;
    ///
    /// let d = Dungeon::parse("###\n#.#\n###").unwrap();
    /// assert_eq!(d.terrain(Pos::new(1, 1)), Some(TerrainKind::Ground));
    /// ```
    pub fn parse(text: &str) -> Result<Self, SpaceError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let expected = rows.first().map_or(0, |r| r.chars().count());
        let mut cells = Vec::with_capacity(rows.len() * expected);
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != expected {
                return Err(SpaceError::RaggedRow {
                    row: y,
                    expected,
                    found,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let kind = kind_of_glyph(glyph).ok_or(SpaceError::UnknownGlyph {
                    glyph,
                    pos: Pos::new(x as i32, y as i32),
                })?;
                cells.push(Cell {
                    kind,
                    ..Cell::default()
                });
            }
        }
        let width = u32::try_from(expected).unwrap_or(u32::MAX);
        let height = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        let grid = Grid::new(width, height)?;
        Ok(Self {
            grid,
            cells,
            revision: 0,
        })
    }

    /// The underlying geometry.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The cell at `pos`, or `None` outside the level.
    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        self.grid.index(pos).map(|i| &self.cells[i])
    }

    /// Whether the player knows `pos`.
    pub fn is_explored(&self, pos: Pos) -> bool {
        self.cell(pos).is_some_and(|c| c.explored)
    }

    /// Mark `pos` explored. Returns `true` if it was not explored before.
    pub fn set_explored(&mut self, pos: Pos) -> bool {
        match self.grid.index(pos) {
            Some(i) if !self.cells[i].explored => {
                self.cells[i].explored = true;
                true
            }
            _ => false,
        }
    }

    /// Light or darken `pos`. Out-of-bounds positions are ignored.
    pub fn set_lit(&mut self, pos: Pos, lit: bool) {
        if let Some(i) = self.grid.index(pos) {
            self.cells[i].lit = lit;
        }
    }

    /// Every passable cell, row-major.
    pub fn passable_cells(&self) -> Vec<Pos> {
        self.grid
            .canonical_ordering()
            .into_iter()
            .filter(|&p| self.is_passable(p))
            .collect()
    }

    /// Whether at least one cardinal neighbour of `pos` is passable.
    pub fn has_passable_neighbour(&self, pos: Pos) -> bool {
        self.grid
            .neighbours(pos)
            .into_iter()
            .any(|p| self.is_passable(p))
    }

    /// Cardinal neighbours of `pos` whose terrain is flammable.
    pub fn flammable_neighbours(&self, pos: Pos) -> SmallVec<[Pos; 4]> {
        self.grid
            .neighbours(pos)
            .into_iter()
            .filter(|&p| self.is_flammable(p))
            .collect()
    }
}

impl GridOracle for Dungeon {
    fn width(&self) -> i32 {
        self.grid.width()
    }

    fn height(&self) -> i32 {
        self.grid.height()
    }

    fn terrain(&self, pos: Pos) -> Option<TerrainKind> {
        self.cell(pos).map(|c| c.kind)
    }

    fn set_terrain(&mut self, pos: Pos, kind: TerrainKind) -> Option<TerrainKind> {
        let i = self.grid.index(pos)?;
        let prev = self.cells[i].kind;
        if prev != kind {
            self.cells[i].kind = kind;
            self.revision += 1;
        }
        Some(prev)
    }

    fn is_lit(&self, pos: Pos) -> bool {
        self.cell(pos).is_some_and(|c| c.lit)
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn in_bounds(&self, pos: Pos) -> bool {
        self.grid.contains(pos)
    }
}

fn kind_of_glyph(glyph: char) -> Option<TerrainKind> {
    Some(match glyph {
        '#' => TerrainKind::Wall,
        '.' => TerrainKind::Ground,
        '+' => TerrainKind::Door,
        '"' => TerrainKind::Foliage,
        ':' => TerrainKind::Rubble,
        '~' => TerrainKind::Chasm,
        _ => return None,
    })
}

fn glyph_of_kind(kind: TerrainKind) -> char {
    match kind {
        TerrainKind::Wall => '#',
        TerrainKind::Ground => '.',
        TerrainKind::Door => '+',
        TerrainKind::Foliage => '"',
        TerrainKind::Rubble => ':',
        TerrainKind::Chasm => '~',
        TerrainKind::Fog => '%',
        TerrainKind::Barrier => '=',
        TerrainKind::Fire => '^',
        TerrainKind::NightCloud => '&',
    }
}

impl fmt::Display for Dungeon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                let kind = self.terrain(Pos::new(x, y)).unwrap_or_default();
                write!(f, "{}", glyph_of_kind(kind))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
