//! Default line of sight.
//!
//! A cell is visible from another when it lies within Manhattan range
//! and no cell strictly between them on the Bresenham line blocks sight.
//! The endpoints themselves never block, so a monster standing in fog
//! still sees out of it. Sight is symmetric only up to the line's
//! rasterisation; the simulation does not rely on symmetry.

use gloam_core::{GridOracle, MonsterId, Pos, VisibilityOracle};
use gloam_space::Grid;

/// Range-limited line of sight over the level's sight-blocking terrain.
#[derive(Clone, Copy, Debug)]
pub struct LineOfSight {
    range: u32,
}

impl LineOfSight {
    /// Sight out to `range` cells.
    pub fn new(range: u32) -> Self {
        Self { range }
    }

    /// The configured range.
    pub fn range(&self) -> u32 {
        self.range
    }

    fn clear(&self, grid: &dyn GridOracle, from: Pos, to: Pos) -> bool {
        if !grid.in_bounds(from) || !grid.in_bounds(to) || from.distance(to) > self.range {
            return false;
        }
        let ray = Grid::ray(from, to);
        let inner = ray.len().saturating_sub(1);
        ray.iter()
            .take(inner)
            .skip(1)
            .all(|&p| !grid.blocks_sight(p))
    }
}

impl VisibilityOracle for LineOfSight {
    fn player_sees(&self, grid: &dyn GridOracle, player: Pos, pos: Pos) -> bool {
        self.clear(grid, player, pos)
    }

    fn monster_sees_player(
        &self,
        grid: &dyn GridOracle,
        _monster: MonsterId,
        at: Pos,
        player: Pos,
    ) -> bool {
        self.clear(grid, at, player)
    }
}
