//! Collaborator traits consumed by the scheduler and the pathfinder.
//!
//! The core never generates terrain, computes field of view, owns an
//! entropy source or renders anything. It reaches those concerns only
//! through the traits below, all of which are object safe so the engine
//! can hold them as `Box<dyn _>`.

use smallvec::SmallVec;

use crate::id::MonsterId;
use crate::notice::Notice;
use crate::pos::Pos;
use crate::terrain::TerrainKind;

/// Read/write terrain queries over a rectangular dungeon level.
pub trait GridOracle {
    /// Number of columns.
    fn width(&self) -> i32;

    /// Number of rows.
    fn height(&self) -> i32;

    /// Terrain at `pos`, or `None` outside the level.
    fn terrain(&self, pos: Pos) -> Option<TerrainKind>;

    /// Replace the terrain at `pos`, returning the previous kind.
    ///
    /// Returns `None` and changes nothing when `pos` is out of bounds.
    /// Implementations must advance [`revision`](Self::revision) whenever
    /// the stored kind actually changes.
    fn set_terrain(&mut self, pos: Pos, kind: TerrainKind) -> Option<TerrainKind>;

    /// Whether the cell is lighted.
    fn is_lit(&self, pos: Pos) -> bool;

    /// Counter advanced by every terrain mutation. Caches derived from
    /// terrain compare revisions to detect staleness.
    fn revision(&self) -> u64;

    /// Whether `pos` lies inside the level.
    fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width() && pos.y < self.height()
    }

    /// In-bounds cardinal neighbours of `pos`, in [`Dir::ALL`](crate::Dir::ALL) order.
    fn neighbours(&self, pos: Pos) -> SmallVec<[Pos; 4]> {
        pos.cardinal()
            .into_iter()
            .filter(|&p| self.in_bounds(p))
            .collect()
    }

    /// Whether a walking actor may enter `pos`.
    fn is_passable(&self, pos: Pos) -> bool {
        self.terrain(pos).is_some_and(TerrainKind::is_passable)
    }

    /// Whether fire can take hold at `pos`.
    fn is_flammable(&self, pos: Pos) -> bool {
        self.terrain(pos).is_some_and(TerrainKind::is_flammable)
    }

    /// Whether `pos` stops line of sight. Out-of-bounds cells do.
    fn blocks_sight(&self, pos: Pos) -> bool {
        self.terrain(pos).is_none_or(TerrainKind::blocks_sight)
    }
}

/// Line-of-sight queries.
pub trait VisibilityOracle {
    /// Whether the player standing at `player` sees the cell `pos`.
    fn player_sees(&self, grid: &dyn GridOracle, player: Pos, pos: Pos) -> bool;

    /// Whether monster `monster` standing at `at` sees the player's cell.
    ///
    /// Stealth statuses are applied by the engine on top of this answer;
    /// the oracle only answers the geometric question.
    fn monster_sees_player(
        &self,
        grid: &dyn GridOracle,
        monster: MonsterId,
        at: Pos,
        player: Pos,
    ) -> bool;

    /// Every cell the player sees, in row-major order.
    fn visible_set(&self, grid: &dyn GridOracle, player: Pos) -> Vec<Pos> {
        let mut out = Vec::new();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let pos = Pos::new(x, y);
                if self.player_sees(grid, player, pos) {
                    out.push(pos);
                }
            }
        }
        out
    }
}

/// Seedable integer entropy.
pub trait RandomSource {
    /// Uniform integer in `[0, n)`. Returns 0 when `n == 0`.
    fn rand_int(&mut self, n: u32) -> u32;
}

/// Fisher-Yates shuffle driven by a [`RandomSource`].
///
/// Given the same random sequence the permutation is the same, which
/// keeps "up to N targets" selection fair but replayable.
pub fn shuffle<T>(rng: &mut dyn RandomSource, items: &mut [T]) {
    let len = items.len();
    for i in 0..len {
        let remaining = u32::try_from(len - i).unwrap_or(u32::MAX);
        let j = i + rng.rand_int(remaining) as usize;
        items.swap(i, j);
    }
}

/// Receiver of user-facing notifications.
pub trait NotificationSink {
    /// Deliver one notice.
    fn notify(&mut self, notice: Notice);
}

/// A sink that discards every notice.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&mut self, _notice: Notice) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(u32);

    impl RandomSource for Counter {
        fn rand_int(&mut self, n: u32) -> u32 {
            if n == 0 {
                return 0;
            }
            self.0 = self.0.wrapping_add(1);
            self.0 % n
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut items: Vec<u32> = (0..10).collect();
        shuffle(&mut Counter(0), &mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_replays_with_same_sequence() {
        let mut a: Vec<u32> = (0..8).collect();
        let mut b = a.clone();
        shuffle(&mut Counter(3), &mut a);
        shuffle(&mut Counter(3), &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_empty_is_noop() {
        let mut items: Vec<u32> = Vec::new();
        shuffle(&mut Counter(0), &mut items);
        assert!(items.is_empty());
    }
}
