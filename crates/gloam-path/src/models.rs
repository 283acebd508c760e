//! Stock cost models over a [`GridOracle`].
//!
//! | Model | Neighbours | Step cost |
//! |-------|-----------|-----------|
//! | [`NormalPath`] | passable cardinal cells | 1 |
//! | [`NoisePath`] | every in-bounds cardinal cell | 1, or a fixed penalty into solid cells |
//! | [`ExplorePath`] | every in-bounds cardinal cell | 1 |
//!
//! Per-monster movement rules depend on occupancy and are provided by
//! the engine.

use gloam_core::{GridOracle, Pos, TerrainKind};
use smallvec::SmallVec;

use crate::provider::PathProvider;

/// Walking over passable terrain.
pub struct NormalPath<'a> {
    grid: &'a dyn GridOracle,
}

impl<'a> NormalPath<'a> {
    /// Walk the given level.
    pub fn new(grid: &'a dyn GridOracle) -> Self {
        Self { grid }
    }
}

impl PathProvider for NormalPath<'_> {
    fn name(&self) -> &str {
        "normal"
    }

    fn neighbours(&self, pos: Pos) -> SmallVec<[Pos; 4]> {
        self.grid
            .neighbours(pos)
            .into_iter()
            .filter(|&p| self.grid.is_passable(p))
            .collect()
    }

    fn cost(&self, _from: Pos, _to: Pos) -> u32 {
        1
    }
}

/// Sound propagation. Sound leaks through walls and barriers, muffled.
pub struct NoisePath<'a> {
    grid: &'a dyn GridOracle,
    wall_cost: u32,
}

impl<'a> NoisePath<'a> {
    /// Propagate over `grid`, charging `wall_cost` for entering a solid
    /// cell.
    pub fn new(grid: &'a dyn GridOracle, wall_cost: u32) -> Self {
        Self { grid, wall_cost }
    }
}

impl PathProvider for NoisePath<'_> {
    fn name(&self) -> &str {
        "noise"
    }

    fn neighbours(&self, pos: Pos) -> SmallVec<[Pos; 4]> {
        self.grid.neighbours(pos)
    }

    fn cost(&self, _from: Pos, to: Pos) -> u32 {
        match self.grid.terrain(to) {
            Some(TerrainKind::Wall | TerrainKind::Barrier) => self.wall_cost,
            _ => 1,
        }
    }
}

/// Unobstructed exploration ordering: every cell is one step from its
/// neighbours, whatever its terrain.
pub struct ExplorePath<'a> {
    grid: &'a dyn GridOracle,
}

impl<'a> ExplorePath<'a> {
    /// Explore the given level.
    pub fn new(grid: &'a dyn GridOracle) -> Self {
        Self { grid }
    }
}

impl PathProvider for ExplorePath<'_> {
    fn name(&self) -> &str {
        "explore"
    }

    fn neighbours(&self, pos: Pos) -> SmallVec<[Pos; 4]> {
        self.grid.neighbours(pos)
    }

    fn cost(&self, _from: Pos, _to: Pos) -> u32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dijkstra::DistanceMap;
    use gloam_space::Dungeon;

    const SPLIT: &str = "
        .....
        .....
        #####
        .....
    ";

    #[test]
    fn normal_path_stops_at_walls() {
        let d = Dungeon::parse(SPLIT).unwrap();
        let map = DistanceMap::compute(&NormalPath::new(&d), &[Pos::new(0, 0)], 100);
        assert_eq!(map.len(), 10);
        assert!(!map.contains(Pos::new(0, 3)));
    }

    #[test]
    fn noise_leaks_through_walls_at_a_penalty() {
        let d = Dungeon::parse(SPLIT).unwrap();
        let map = DistanceMap::compute(&NoisePath::new(&d, 4), &[Pos::new(0, 1)], 100);
        assert_eq!(map.cost(Pos::new(0, 2)), Some(4));
        assert_eq!(map.cost(Pos::new(0, 3)), Some(5));
    }

    #[test]
    fn explore_ignores_terrain() {
        let d = Dungeon::parse(SPLIT).unwrap();
        let map = DistanceMap::compute(&ExplorePath::new(&d), &[Pos::new(0, 0)], 100);
        assert_eq!(map.len(), 20);
        assert_eq!(map.cost(Pos::new(0, 3)), Some(3));
    }

    #[test]
    fn barrier_blocks_walkers_but_not_sound() {
        let mut d = Dungeon::parse(".....").unwrap();
        d.set_terrain(Pos::new(2, 0), TerrainKind::Barrier);
        let walk = DistanceMap::compute(&NormalPath::new(&d), &[Pos::new(0, 0)], 100);
        assert!(!walk.contains(Pos::new(4, 0)));
        let sound = DistanceMap::compute(&NoisePath::new(&d, 4), &[Pos::new(0, 0)], 100);
        assert_eq!(sound.cost(Pos::new(4, 0)), Some(7));
    }
}
