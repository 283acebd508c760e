//! Benchmark profiles and utilities for Gloam simulations.
//!
//! Provides pre-built levels and simulations for benchmarks and examples:
//!
//! - [`pillar_hall`]: a lit hall with a regular grid of wall pillars
//! - [`reference_profile`]: 64x64 hall with 16 monsters
//! - [`stress_profile`]: 200x200 hall with 256 monsters
//! - [`init_monster_positions`]: deterministic monster placement via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use gloam_core::{GridOracle, Pos, TerrainKind};
use gloam_engine::{MonsterKind, SimConfig, Simulation};
use gloam_space::Dungeon;

const KINDS: [MonsterKind; 4] = [
    MonsterKind::Guard,
    MonsterKind::Dog,
    MonsterKind::HighGuard,
    MonsterKind::Butterfly,
];

/// A lit `size * size` hall with a wall pillar every fourth cell on both
/// axes and a door in every eighth pillar.
pub fn pillar_hall(size: u32) -> Dungeon {
    let mut d = Dungeon::filled(size, size, TerrainKind::Ground)
        .expect("pillar hall size must be non-zero");
    let side = size as i32;
    for y in 0..side {
        for x in 0..side {
            let pos = Pos::new(x, y);
            d.set_lit(pos, true);
            if x % 4 == 3 && y % 4 == 3 {
                let kind = if (x + y) % 8 == 6 {
                    TerrainKind::Door
                } else {
                    TerrainKind::Wall
                };
                d.set_terrain(pos, kind);
            }
        }
    }
    d
}

/// A 64x64 [`pillar_hall`] with the player in the middle and 16 monsters.
pub fn reference_profile(seed: u64) -> Simulation {
    populated(pillar_hall(64), 16, seed)
}

/// A 200x200 [`pillar_hall`] with 256 monsters.
///
/// Same layout as [`reference_profile`] at roughly ten times the cells.
pub fn stress_profile(seed: u64) -> Simulation {
    populated(pillar_hall(200), 256, seed)
}

fn populated(dungeon: Dungeon, n: usize, seed: u64) -> Simulation {
    let centre = Pos::new(dungeon.width() / 2, dungeon.height() / 2);
    let positions = init_monster_positions(&dungeon, n, seed);
    let mut sim = Simulation::new(SimConfig::seeded(seed), dungeon, centre)
        .expect("pillar hall centre is never a pillar");
    for (i, pos) in positions.into_iter().enumerate() {
        if pos == centre {
            continue;
        }
        sim.spawn_monster(KINDS[i % KINDS.len()], pos)
            .expect("positions are distinct passable cells");
    }
    sim
}

/// Generate deterministic monster positions on passable cells.
///
/// Starts from a simple hash of the seed per monster and probes forward
/// in row-major order past impassable or taken cells. Returns at most
/// as many positions as there are passable cells.
pub fn init_monster_positions(dungeon: &Dungeon, n: usize, seed: u64) -> Vec<Pos> {
    let cells = dungeon.passable_cells();
    let count = cells.len();
    let mut taken = vec![false; count];
    let mut positions = Vec::with_capacity(n.min(count));

    for i in 0..n.min(count) {
        let mut idx = (seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add((i as u64).wrapping_mul(1442695040888963407))
            % count as u64) as usize;

        // Linear probe to avoid collisions.
        while taken[idx] {
            idx = (idx + 1) % count;
        }
        taken[idx] = true;
        positions.push(cells[idx]);
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn reference_profile_is_populated() {
        let sim = reference_profile(42);
        assert!(sim.monsters().len() >= 15);
        assert_eq!(sim.player().pos, Pos::new(32, 32));
    }

    #[test]
    fn pillar_hall_layout() {
        let d = pillar_hall(8);
        assert_eq!(d.terrain(Pos::new(3, 3)), Some(TerrainKind::Door));
        assert_eq!(d.terrain(Pos::new(7, 3)), Some(TerrainKind::Wall));
        assert_eq!(d.terrain(Pos::new(2, 3)), Some(TerrainKind::Ground));
        assert!(d.is_lit(Pos::new(0, 0)));
    }

    #[test]
    fn init_monster_positions_no_collisions() {
        let d = pillar_hall(16);
        let positions = init_monster_positions(&d, 40, 42);
        assert_eq!(positions.len(), 40);

        let unique: HashSet<Pos> = positions.iter().copied().collect();
        assert_eq!(unique.len(), 40, "all positions should be unique");
        assert!(positions.iter().all(|&p| d.is_passable(p)));
    }

    #[test]
    fn init_monster_positions_deterministic() {
        let d = pillar_hall(32);
        assert_eq!(
            init_monster_positions(&d, 5, 42),
            init_monster_positions(&d, 5, 42)
        );
    }

    #[test]
    fn large_seeds_and_indices_wrap_instead_of_overflowing() {
        let d = pillar_hall(32);
        let positions = init_monster_positions(&d, 300, u64::MAX);
        assert_eq!(positions.len(), 300);
        let unique: HashSet<Pos> = positions.iter().copied().collect();
        assert_eq!(unique.len(), 300);
    }

    #[test]
    fn more_monsters_than_cells_is_capped() {
        let d = Dungeon::filled(2, 2, TerrainKind::Ground).unwrap();
        assert_eq!(init_monster_positions(&d, 10, 1).len(), 4);
    }
}
