//! Strongly-typed identifiers and the [`Tick`] time unit.

use std::fmt;
use std::ops::Add;

/// Simulation time.
///
/// Events are ranked by the tick at which they fire. The clock owned by
/// the event queue never moves backwards: popping an overdue event fires
/// it at the current time instead of rewinding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tick(pub u64);

impl Tick {
    /// The first tick of a fresh simulation.
    pub const ZERO: Tick = Tick(0);

    /// The last tick. Delays that would run past it saturate here.
    pub const MAX: Tick = Tick(u64::MAX);

    /// Tick `delay` ticks after `self`, saturating at `u64::MAX`.
    pub fn after(self, delay: u64) -> Tick {
        Tick(self.0.saturating_add(delay))
    }
}

impl Add<u64> for Tick {
    type Output = Tick;

    fn add(self, rhs: u64) -> Tick {
        self.after(rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Tick {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Stable identifier of a monster.
///
/// Allocated from a per-simulation monotonic counter and never reused,
/// so an event that outlives its monster can only miss, never hit a
/// different monster that happens to occupy the same roster slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonsterId(pub u32);

impl fmt::Display for MonsterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

impl From<u32> for MonsterId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Epoch stamp for un-cancellable scheduled work.
///
/// Every status activation, forced rest and overlay is stamped with a
/// fresh generation. The event scheduled alongside it carries the same
/// stamp; when the event fires, the handler compares stamps and treats a
/// mismatch as stale. Generations are never reused within a simulation,
/// so two activations that happen to share an expiry tick still differ.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

impl Generation {
    /// Return the current value and advance `self` to the next one.
    pub fn bump(&mut self) -> Generation {
        let current = *self;
        self.0 += 1;
        current
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_after_saturates() {
        assert_eq!(Tick(5).after(3), Tick(8));
        assert_eq!(Tick::MAX.after(1), Tick::MAX);
        assert_eq!(Tick(2) + 2, Tick(4));
    }

    #[test]
    fn generation_bump_is_monotonic() {
        let mut g = Generation::default();
        let a = g.bump();
        let b = g.bump();
        assert_eq!(a, Generation(0));
        assert_eq!(b, Generation(1));
        assert_eq!(g, Generation(2));
    }

    #[test]
    fn display_formats() {
        assert_eq!(Tick(7).to_string(), "7");
        assert_eq!(MonsterId(3).to_string(), "m3");
        assert_eq!(Generation(9).to_string(), "g9");
    }
}
