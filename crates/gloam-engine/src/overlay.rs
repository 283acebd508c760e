//! Temporary terrain overlays: fog, barriers, fire and night clouds.
//!
//! An overlay writes its own terrain kind into the level and remembers
//! the kind it shadows. A cell carries at most one overlay. Each overlay
//! is stamped with a [`Generation`] and paired with one queued
//! [`Action::OverlayEnd`]; removal restores the shadowed kind verbatim,
//! except fire, which consumes the cell and leaves bare ground.
//!
//! Removal is guarded twice. A mismatched stamp means the overlay was
//! replaced or reverted earlier and the event is stale. A matching stamp
//! whose cell no longer shows the overlay's kind means something else
//! rewrote the terrain; the record is dropped and the terrain left alone.

use std::fmt;

use indexmap::IndexMap;
use tracing::debug;

use gloam_core::{Generation, GridOracle, Pos, TerrainKind};

use crate::event::Action;
use crate::queue::EventQueue;

/// Overlay kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    /// Harmonic fog: blocks sight.
    Fog,
    /// Oric barrier: blocks movement.
    Barrier,
    /// Magical fire burning flammable terrain.
    Fire,
    /// Smoke left by fire; monsters inside fall asleep.
    NightCloud,
}

impl OverlayKind {
    /// The terrain kind the overlay writes into the level.
    pub fn terrain(self) -> TerrainKind {
        match self {
            Self::Fog => TerrainKind::Fog,
            Self::Barrier => TerrainKind::Barrier,
            Self::Fire => TerrainKind::Fire,
            Self::NightCloud => TerrainKind::NightCloud,
        }
    }

    /// Whether a barrier may displace this overlay.
    fn is_cloud(self) -> bool {
        !matches!(self, Self::Barrier)
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.terrain().fmt(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Overlay {
    kind: OverlayKind,
    shadowed: TerrainKind,
    generation: Generation,
}

/// Outcome of [`OverlayTable::place`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// The overlay now covers the cell.
    Placed,
    /// The overlay displaced an existing one, which was reverted first.
    Replaced(OverlayKind),
    /// The cell does not accept the overlay; nothing changed.
    Rejected,
}

impl Placement {
    /// Whether the overlay now covers the cell.
    pub fn took(self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// Outcome of a fired [`Action::OverlayEnd`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removal {
    /// The overlay was removed and the cell restored.
    Removed(OverlayKind),
    /// The record was dropped but the cell had been rewritten by other
    /// means and was left alone.
    Superseded(OverlayKind),
    /// The event no longer owns an overlay; nothing changed.
    Stale,
}

/// Active overlays, by cell.
#[derive(Debug, Default)]
pub struct OverlayTable {
    cells: IndexMap<Pos, Overlay>,
    generations: Generation,
}

impl OverlayTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cover `pos` with `kind` for `duration` ticks.
    ///
    /// Acceptance rules:
    /// - fog needs a cell with no overlay whose terrain allows fog;
    /// - a barrier is refused on walls and barriers and displaces any
    ///   cloud overlay;
    /// - fire needs flammable terrain, which overlaid cells never are;
    /// - a night cloud needs a passable cell with no overlay.
    pub fn place(
        &mut self,
        grid: &mut dyn GridOracle,
        queue: &mut EventQueue,
        pos: Pos,
        kind: OverlayKind,
        duration: u64,
    ) -> Placement {
        let Some(terrain) = grid.terrain(pos) else {
            return Placement::Rejected;
        };
        let existing = self.cells.get(&pos).map(|o| o.kind);
        let accepted = match kind {
            OverlayKind::Fog => existing.is_none() && terrain.allows_fog(),
            OverlayKind::Barrier => {
                !matches!(terrain, TerrainKind::Wall | TerrainKind::Barrier)
                    && existing.is_none_or(OverlayKind::is_cloud)
            }
            OverlayKind::Fire => existing.is_none() && terrain.is_flammable(),
            OverlayKind::NightCloud => existing.is_none() && terrain.is_passable(),
        };
        if !accepted {
            return Placement::Rejected;
        }
        let displaced = existing.and_then(|_| self.revert(grid, pos));
        let shadowed = grid.set_terrain(pos, kind.terrain()).unwrap_or(terrain);
        let generation = self.generations.bump();
        self.cells.insert(
            pos,
            Overlay {
                kind,
                shadowed,
                generation,
            },
        );
        queue.schedule(duration, Action::OverlayEnd { pos, generation });
        debug!(%pos, %kind, %shadowed, duration, "overlay placed");
        match displaced {
            Some(prev) => Placement::Replaced(prev),
            None => Placement::Placed,
        }
    }

    /// Handle a fired [`Action::OverlayEnd`].
    pub fn expire(
        &mut self,
        grid: &mut dyn GridOracle,
        pos: Pos,
        generation: Generation,
    ) -> Removal {
        let overlay = match self.cells.get(&pos) {
            Some(o) if o.generation == generation => *o,
            _ => return Removal::Stale,
        };
        self.cells.shift_remove(&pos);
        if grid.terrain(pos) != Some(overlay.kind.terrain()) {
            return Removal::Superseded(overlay.kind);
        }
        let restored = match overlay.kind {
            OverlayKind::Fire => TerrainKind::Ground,
            _ => overlay.shadowed,
        };
        grid.set_terrain(pos, restored);
        Removal::Removed(overlay.kind)
    }

    /// Remove the overlay at `pos` now, restoring the shadowed terrain.
    /// Its pending event becomes stale.
    pub fn revert(&mut self, grid: &mut dyn GridOracle, pos: Pos) -> Option<OverlayKind> {
        let overlay = self.cells.shift_remove(&pos)?;
        if grid.terrain(pos) == Some(overlay.kind.terrain()) {
            grid.set_terrain(pos, overlay.shadowed);
        }
        Some(overlay.kind)
    }

    /// Forget every overlay without touching terrain. Used when the
    /// level they were placed on is discarded.
    pub fn forget_all(&mut self) {
        self.cells.clear();
    }

    /// The overlay covering `pos`, if any.
    pub fn kind_at(&self, pos: Pos) -> Option<OverlayKind> {
        self.cells.get(&pos).map(|o| o.kind)
    }

    /// The terrain hidden under the overlay at `pos`, if any.
    pub fn shadowed_at(&self, pos: Pos) -> Option<TerrainKind> {
        self.cells.get(&pos).map(|o| o.shadowed)
    }

    /// Overlaid cells in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, OverlayKind)> + '_ {
        self.cells.iter().map(|(&p, o)| (p, o.kind))
    }

    /// Number of overlaid cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is overlaid.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloam_core::Tick;
    use gloam_space::Dungeon;
    use gloam_test_utils::fixtures;
    use proptest::prelude::*;

    fn drain(
        table: &mut OverlayTable,
        grid: &mut Dungeon,
        queue: &mut EventQueue,
        limit: Tick,
    ) -> Vec<Removal> {
        let mut out = Vec::new();
        while let Some(ev) = queue.pop_due(limit) {
            if let Action::OverlayEnd { pos, generation } = ev.action {
                out.push(table.expire(grid, pos, generation));
            }
        }
        out
    }

    // ── Placement rules ─────────────────────────────────────────

    #[test]
    fn fog_covers_and_restores_ground() {
        let mut d = fixtures::open_level(3, 3);
        let mut q = EventQueue::new();
        let mut t = OverlayTable::new();
        let p = Pos::new(1, 1);
        assert_eq!(t.place(&mut d, &mut q, p, OverlayKind::Fog, 5), Placement::Placed);
        assert_eq!(d.terrain(p), Some(TerrainKind::Fog));
        assert_eq!(t.shadowed_at(p), Some(TerrainKind::Ground));
        let fired = drain(&mut t, &mut d, &mut q, Tick(5));
        assert_eq!(fired, vec![Removal::Removed(OverlayKind::Fog)]);
        assert_eq!(d.terrain(p), Some(TerrainKind::Ground));
        assert!(t.is_empty());
    }

    #[test]
    fn fog_on_fog_is_a_noop() {
        let mut d = fixtures::open_level(3, 3);
        let mut q = EventQueue::new();
        let mut t = OverlayTable::new();
        let p = Pos::new(0, 0);
        t.place(&mut d, &mut q, p, OverlayKind::Fog, 5);
        assert_eq!(
            t.place(&mut d, &mut q, p, OverlayKind::Fog, 9),
            Placement::Rejected
        );
        assert_eq!(q.len(), 1);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn fog_refused_on_walls_and_doors() {
        let mut d = fixtures::level(fixtures::TWO_ROOMS);
        let mut q = EventQueue::new();
        let mut t = OverlayTable::new();
        for p in [Pos::new(0, 0), Pos::new(4, 2)] {
            assert_eq!(
                t.place(&mut d, &mut q, p, OverlayKind::Fog, 5),
                Placement::Rejected
            );
        }
        assert!(q.is_empty());
    }

    #[test]
    fn barrier_replaces_fog_and_restores_original_terrain() {
        let mut d = fixtures::open_level(3, 3);
        let mut q = EventQueue::new();
        let mut t = OverlayTable::new();
        let p = Pos::new(1, 1);
        t.place(&mut d, &mut q, p, OverlayKind::Fog, 3);
        assert_eq!(
            t.place(&mut d, &mut q, p, OverlayKind::Barrier, 10),
            Placement::Replaced(OverlayKind::Fog)
        );
        assert_eq!(t.shadowed_at(p), Some(TerrainKind::Ground));
        // The fog's event fires first and must not lift the barrier.
        let fired = drain(&mut t, &mut d, &mut q, Tick(3));
        assert_eq!(fired, vec![Removal::Stale]);
        assert_eq!(d.terrain(p), Some(TerrainKind::Barrier));
        let fired = drain(&mut t, &mut d, &mut q, Tick(10));
        assert_eq!(fired, vec![Removal::Removed(OverlayKind::Barrier)]);
        assert_eq!(d.terrain(p), Some(TerrainKind::Ground));
    }

    #[test]
    fn barrier_refused_on_wall_and_on_barrier() {
        let mut d = fixtures::level(fixtures::TWO_ROOMS);
        let mut q = EventQueue::new();
        let mut t = OverlayTable::new();
        assert!(!t
            .place(&mut d, &mut q, Pos::new(0, 0), OverlayKind::Barrier, 5)
            .took());
        let p = Pos::new(2, 2);
        assert!(t.place(&mut d, &mut q, p, OverlayKind::Barrier, 5).took());
        assert!(!t.place(&mut d, &mut q, p, OverlayKind::Barrier, 5).took());
    }

    #[test]
    fn barrier_on_door_restores_the_door() {
        let mut d = fixtures::level(fixtures::TWO_ROOMS);
        let mut q = EventQueue::new();
        let mut t = OverlayTable::new();
        let door = Pos::new(4, 2);
        t.place(&mut d, &mut q, door, OverlayKind::Barrier, 2);
        drain(&mut t, &mut d, &mut q, Tick(2));
        assert_eq!(d.terrain(door), Some(TerrainKind::Door));
    }

    #[test]
    fn fire_consumes_its_cell() {
        let mut d = fixtures::level(fixtures::GARDEN);
        let mut q = EventQueue::new();
        let mut t = OverlayTable::new();
        let bush = Pos::new(3, 2);
        assert_eq!(d.terrain(bush), Some(TerrainKind::Foliage));
        assert!(t.place(&mut d, &mut q, bush, OverlayKind::Fire, 4).took());
        assert!(!t.place(&mut d, &mut q, bush, OverlayKind::Fire, 4).took());
        drain(&mut t, &mut d, &mut q, Tick(4));
        assert_eq!(d.terrain(bush), Some(TerrainKind::Ground));
    }

    #[test]
    fn fire_refused_on_ground() {
        let mut d = fixtures::open_level(2, 2);
        let mut q = EventQueue::new();
        let mut t = OverlayTable::new();
        assert_eq!(
            t.place(&mut d, &mut q, Pos::new(0, 0), OverlayKind::Fire, 4),
            Placement::Rejected
        );
    }

    // ── Guards ──────────────────────────────────────────────────

    #[test]
    fn externally_rewritten_cell_is_left_alone() {
        let mut d = fixtures::open_level(3, 3);
        let mut q = EventQueue::new();
        let mut t = OverlayTable::new();
        let p = Pos::new(2, 2);
        t.place(&mut d, &mut q, p, OverlayKind::Barrier, 4);
        d.set_terrain(p, TerrainKind::Rubble);
        let fired = drain(&mut t, &mut d, &mut q, Tick(4));
        assert_eq!(fired, vec![Removal::Superseded(OverlayKind::Barrier)]);
        assert_eq!(d.terrain(p), Some(TerrainKind::Rubble));
    }

    #[test]
    fn reverted_overlay_event_is_stale() {
        let mut d = fixtures::open_level(3, 3);
        let mut q = EventQueue::new();
        let mut t = OverlayTable::new();
        let p = Pos::new(0, 1);
        t.place(&mut d, &mut q, p, OverlayKind::NightCloud, 4);
        assert_eq!(t.revert(&mut d, p), Some(OverlayKind::NightCloud));
        assert_eq!(d.terrain(p), Some(TerrainKind::Ground));
        assert_eq!(drain(&mut t, &mut d, &mut q, Tick(4)), vec![Removal::Stale]);
    }

    // ── Properties ──────────────────────────────────────────────

    fn kind() -> impl Strategy<Value = OverlayKind> {
        prop_oneof![
            Just(OverlayKind::Fog),
            Just(OverlayKind::Barrier),
            Just(OverlayKind::Fire),
            Just(OverlayKind::NightCloud),
        ]
    }

    proptest! {
        #[test]
        fn never_stacks_and_always_restores(
            ops in prop::collection::vec((0i32..7, 0i32..5, kind(), 1u64..6), 0..40),
        ) {
            let mut d = fixtures::level(fixtures::GARDEN);
            let original = d.to_string();
            let mut q = EventQueue::new();
            let mut t = OverlayTable::new();
            for (x, y, k, dur) in ops {
                t.place(&mut d, &mut q, Pos::new(x, y), k, dur);
                // At most one record per cell, and every record is visible.
                for (p, kind) in t.iter() {
                    prop_assert_eq!(d.terrain(p), Some(kind.terrain()));
                }
            }
            drain(&mut t, &mut d, &mut q, Tick(100));
            prop_assert!(t.is_empty());
            // Only burnt foliage and doors may differ from the original.
            let now = d.to_string();
            for (a, b) in original.chars().zip(now.chars()) {
                prop_assert!(a == b || (matches!(a, '"' | '+') && b == '.'));
            }
        }
    }
}
