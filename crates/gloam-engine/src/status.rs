//! Per-actor expiring statuses with a stale-event guard.
//!
//! The [`StatusTable`] is the authority on which statuses are active.
//! Every activation is stamped with a fresh [`Generation`] and paired
//! with exactly one queued [`Action::StatusEnd`] carrying that stamp.
//! Refreshing or clearing a status does not touch the queue: the old
//! event stays pending and is recognised as stale when it fires because
//! its stamp no longer matches the table.

use std::fmt;

use indexmap::IndexMap;

use gloam_core::{Generation, MonsterId, Tick};

use crate::event::Action;
use crate::queue::EventQueue;

/// Who carries a status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Actor {
    /// The player.
    Player,
    /// A monster, by stable id.
    Monster(MonsterId),
}

impl Actor {
    /// Stable integer form used by the trace digest.
    pub(crate) fn key(self) -> u64 {
        match self {
            Self::Player => u64::MAX,
            Self::Monster(id) => u64::from(id.0),
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => f.write_str("player"),
            Self::Monster(id) => write!(f, "{id}"),
        }
    }
}

/// Status kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    /// Player walks through walls, turning them to ground.
    Dig,
    /// Player crosses chasms.
    Levitation,
    /// Player is hidden from non-adjacent monsters on unlit cells.
    Shadows,
    /// Player is hidden from non-adjacent monsters on lit cells.
    Transparent,
    /// Player is ignored by monsters that are not already hunting.
    Disguised,
    /// Player blinks away when a hunter closes in.
    Dispersal,
    /// Player moves take no time.
    Swift,
    /// Gate allowing one delayed ability at a time; no visible effect.
    Delay,
    /// Player cannot evoke.
    Confusion,
    /// Player cannot evoke.
    Nausea,
    /// Player cannot move, blink, teleport or swap.
    Lignification,
    /// Player cannot wrap in shadows.
    Illuminated,
    /// Monster stumbles at random.
    Confused,
    /// Monster cannot act.
    Paralysed,
    /// Monster cannot move.
    Lignified,
    /// Monster acts at half speed.
    Slow,
}

impl Status {
    /// Sentence shown when the status ends on the player.
    pub(crate) fn player_end_message(self) -> Option<&'static str> {
        Some(match self {
            Self::Dig => "You no longer feel like an earth dragon.",
            Self::Levitation => "You no longer levitate.",
            Self::Shadows => "You are no longer surrounded by shadows.",
            Self::Transparent => "You are no longer transparent.",
            Self::Disguised => "You are no longer disguised.",
            Self::Dispersal => "You are no longer unstable.",
            Self::Swift => "You no longer feel speedy.",
            Self::Confusion => "You no longer feel confused.",
            Self::Nausea => "You no longer feel sick.",
            Self::Lignification => "You no longer feel attached to the ground.",
            Self::Illuminated => "You are no longer illuminated.",
            Self::Delay | Self::Confused | Self::Paralysed | Self::Lignified | Self::Slow => {
                return None
            }
        })
    }

    /// Predicate shown after "The <monster>" when the status ends on a
    /// visible monster.
    pub(crate) fn monster_end_predicate(self) -> Option<&'static str> {
        Some(match self {
            Self::Confused => "is no longer confused",
            Self::Paralysed => "can move again",
            Self::Lignified => "is no longer lignified",
            Self::Slow => "is no longer slow",
            _ => return None,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Active {
    expiry: Tick,
    generation: Generation,
    fake: bool,
}

/// Result of firing a [`Action::StatusEnd`] event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expiry {
    /// The status was cleared.
    Expired {
        /// Whether the status was a fake gate with no visible effect.
        fake: bool,
    },
    /// The event no longer owns the status; nothing changed.
    Stale,
}

/// Which statuses are active on which actors, and until when.
#[derive(Debug, Default)]
pub struct StatusTable {
    active: IndexMap<(Actor, Status), Active>,
    generations: Generation,
}

impl StatusTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `status` on `actor` for `duration` ticks.
    ///
    /// Returns `false` and changes nothing if the status is already
    /// active. Otherwise records `expiry = now + duration` and schedules
    /// the paired expiry event.
    pub fn put(
        &mut self,
        queue: &mut EventQueue,
        actor: Actor,
        status: Status,
        duration: u64,
    ) -> bool {
        if self.has(actor, status) {
            return false;
        }
        self.activate(queue, actor, status, duration, false);
        true
    }

    /// Like [`put`](Self::put), for a gate status with no visible effect.
    pub fn put_fake(
        &mut self,
        queue: &mut EventQueue,
        actor: Actor,
        status: Status,
        duration: u64,
    ) -> bool {
        if self.has(actor, status) {
            return false;
        }
        self.activate(queue, actor, status, duration, true);
        true
    }

    /// Activate or overwrite `status` with a new expiry. Any pending
    /// expiry event of the previous activation becomes stale.
    ///
    /// Returns the previous expiry, if the status was active.
    pub fn refresh(
        &mut self,
        queue: &mut EventQueue,
        actor: Actor,
        status: Status,
        duration: u64,
    ) -> Option<Tick> {
        let previous = self.expiry(actor, status);
        let fake = self
            .active
            .get(&(actor, status))
            .is_some_and(|a| a.fake);
        self.activate(queue, actor, status, duration, fake);
        previous
    }

    fn activate(
        &mut self,
        queue: &mut EventQueue,
        actor: Actor,
        status: Status,
        duration: u64,
        fake: bool,
    ) {
        let generation = self.generations.bump();
        let expiry = queue.now().after(duration);
        self.active.insert(
            (actor, status),
            Active {
                expiry,
                generation,
                fake,
            },
        );
        queue.push(
            expiry,
            Action::StatusEnd {
                actor,
                status,
                generation,
            },
        );
    }

    /// Cancel `status` now. Returns whether it was active.
    pub fn clear(&mut self, actor: Actor, status: Status) -> bool {
        self.active.shift_remove(&(actor, status)).is_some()
    }

    /// Handle a fired [`Action::StatusEnd`].
    pub fn expire(&mut self, actor: Actor, status: Status, generation: Generation) -> Expiry {
        match self.active.get(&(actor, status)) {
            Some(a) if a.generation == generation => {
                let fake = a.fake;
                self.active.shift_remove(&(actor, status));
                Expiry::Expired { fake }
            }
            _ => Expiry::Stale,
        }
    }

    /// Whether `status` is active on `actor`.
    pub fn has(&self, actor: Actor, status: Status) -> bool {
        self.active.contains_key(&(actor, status))
    }

    /// Scheduled expiry of `status` on `actor`, if active.
    pub fn expiry(&self, actor: Actor, status: Status) -> Option<Tick> {
        self.active.get(&(actor, status)).map(|a| a.expiry)
    }

    /// Drop every status of `actor`. Their pending events become stale.
    pub fn forget_actor(&mut self, actor: Actor) {
        self.active.retain(|(a, _), _| *a != actor);
    }

    /// Visible statuses of `actor` with their expiries, in activation
    /// order. Fake gates are omitted.
    pub fn active(&self, actor: Actor) -> Vec<(Status, Tick)> {
        self.active
            .iter()
            .filter(|((a, _), v)| *a == actor && !v.fake)
            .map(|((_, s), v)| (*s, v.expiry))
            .collect()
    }

    /// Number of active statuses across all actors, fakes included.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no status is active.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Pop every event due by `limit` and feed status expiries back.
    fn drain(table: &mut StatusTable, queue: &mut EventQueue, limit: Tick) -> Vec<Expiry> {
        let mut out = Vec::new();
        while let Some(ev) = queue.pop_due(limit) {
            if let Action::StatusEnd {
                actor,
                status,
                generation,
            } = ev.action
            {
                out.push(table.expire(actor, status, generation));
            }
        }
        queue.advance_to(limit);
        out
    }

    // ── Guard ───────────────────────────────────────────────────

    #[test]
    fn put_twice_fails_and_keeps_expiry() {
        let mut q = EventQueue::new();
        let mut t = StatusTable::new();
        assert!(t.put(&mut q, Actor::Player, Status::Dig, 8));
        assert!(t.has(Actor::Player, Status::Dig));
        assert!(!t.put(&mut q, Actor::Player, Status::Dig, 20));
        assert_eq!(t.expiry(Actor::Player, Status::Dig), Some(Tick(8)));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn status_expires_after_exactly_its_duration() {
        let mut q = EventQueue::new();
        let mut t = StatusTable::new();
        t.put(&mut q, Actor::Player, Status::Shadows, 5);
        drain(&mut t, &mut q, Tick(4));
        assert!(t.has(Actor::Player, Status::Shadows));
        drain(&mut t, &mut q, Tick(5));
        assert!(!t.has(Actor::Player, Status::Shadows));
    }

    // ── Stale events ────────────────────────────────────────────

    #[test]
    fn refreshed_status_survives_its_first_timer() {
        let mut q = EventQueue::new();
        let mut t = StatusTable::new();
        t.put(&mut q, Actor::Player, Status::Levitation, 3);
        q.advance_to(Tick(1));
        assert_eq!(
            t.refresh(&mut q, Actor::Player, Status::Levitation, 6),
            Some(Tick(3))
        );
        let fired = drain(&mut t, &mut q, Tick(3));
        assert_eq!(fired, vec![Expiry::Stale]);
        assert!(t.has(Actor::Player, Status::Levitation));
        let fired = drain(&mut t, &mut q, Tick(7));
        assert_eq!(fired, vec![Expiry::Expired { fake: false }]);
        assert!(!t.has(Actor::Player, Status::Levitation));
    }

    #[test]
    fn refresh_to_the_same_expiry_still_stales_the_old_event() {
        let mut q = EventQueue::new();
        let mut t = StatusTable::new();
        t.put(&mut q, Actor::Player, Status::Swift, 4);
        t.refresh(&mut q, Actor::Player, Status::Swift, 4);
        let fired = drain(&mut t, &mut q, Tick(4));
        assert_eq!(fired, vec![Expiry::Stale, Expiry::Expired { fake: false }]);
    }

    #[test]
    fn cleared_then_reapplied_status_ignores_old_event() {
        let mut q = EventQueue::new();
        let mut t = StatusTable::new();
        let m = Actor::Monster(MonsterId(3));
        t.put(&mut q, m, Status::Confused, 2);
        assert!(t.clear(m, Status::Confused));
        assert!(t.put(&mut q, m, Status::Confused, 5));
        drain(&mut t, &mut q, Tick(2));
        assert!(t.has(m, Status::Confused));
        drain(&mut t, &mut q, Tick(5));
        assert!(!t.has(m, Status::Confused));
    }

    #[test]
    fn forgotten_actor_events_are_stale() {
        let mut q = EventQueue::new();
        let mut t = StatusTable::new();
        let m = Actor::Monster(MonsterId(1));
        t.put(&mut q, m, Status::Paralysed, 3);
        t.put(&mut q, Actor::Player, Status::Dig, 3);
        t.forget_actor(m);
        let fired = drain(&mut t, &mut q, Tick(3));
        assert_eq!(fired, vec![Expiry::Stale, Expiry::Expired { fake: false }]);
    }

    #[test]
    fn fake_status_is_hidden_but_gates() {
        let mut q = EventQueue::new();
        let mut t = StatusTable::new();
        assert!(t.put_fake(&mut q, Actor::Player, Status::Delay, 7));
        assert!(!t.put_fake(&mut q, Actor::Player, Status::Delay, 7));
        assert!(t.has(Actor::Player, Status::Delay));
        assert!(t.active(Actor::Player).is_empty());
        let fired = drain(&mut t, &mut q, Tick(7));
        assert_eq!(fired, vec![Expiry::Expired { fake: true }]);
    }

    #[test]
    fn actors_are_independent() {
        let mut q = EventQueue::new();
        let mut t = StatusTable::new();
        let a = Actor::Monster(MonsterId(0));
        let b = Actor::Monster(MonsterId(1));
        assert!(t.put(&mut q, a, Status::Slow, 3));
        assert!(t.put(&mut q, b, Status::Slow, 3));
        assert_eq!(t.len(), 2);
        assert_eq!(t.active(a), vec![(Status::Slow, Tick(3))]);
    }

    // ── Properties ──────────────────────────────────────────────

    proptest! {
        #[test]
        fn last_write_wins(durations in prop::collection::vec(1u64..30, 1..8)) {
            let mut q = EventQueue::new();
            let mut t = StatusTable::new();
            for d in &durations {
                t.refresh(&mut q, Actor::Player, Status::Dispersal, *d);
            }
            let last = *durations.last().unwrap();
            drain(&mut t, &mut q, Tick(last - 1));
            prop_assert!(t.has(Actor::Player, Status::Dispersal));
            let fired = drain(&mut t, &mut q, Tick(100));
            prop_assert!(!t.has(Actor::Player, Status::Dispersal));
            let expired = fired.iter().filter(|e| matches!(e, Expiry::Expired { .. })).count();
            prop_assert_eq!(expired, 1);
        }
    }
}
