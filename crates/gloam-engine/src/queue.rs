//! The event queue: the single authority for when anything changes.
//!
//! A min-heap keyed by `(rank, seq)`. Ranks order events in time; the
//! insertion sequence makes equal ranks fire in push order, which gives
//! a total order and deterministic replay. The queue also owns the
//! simulation clock: popping an event advances `now` to its rank, and
//! the clock never moves backwards. An overdue event (rank below `now`)
//! fires at `now`.
//!
//! There is no removal other than popping. Work that becomes obsolete
//! stays queued and is recognised as stale by its handler when it fires.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use gloam_core::Tick;

use crate::event::{Action, Event};

#[derive(Debug)]
struct Entry(Event);

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.0.rank == other.0.rank && self.0.seq == other.0.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .rank
            .cmp(&other.0.rank)
            .then_with(|| self.0.seq.cmp(&other.0.seq))
    }
}

/// Time-ordered priority queue of pending events.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
    now: Tick,
    peak_len: usize,
}

impl EventQueue {
    /// An empty queue with the clock at [`Tick::ZERO`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time.
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Insert `action` to fire at `rank`. Returns the assigned sequence
    /// number.
    ///
    /// Ranks in the past are legal; such events fire at the next pop.
    pub fn push(&mut self, rank: Tick, action: Action) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry(Event { rank, seq, action })));
        self.peak_len = self.peak_len.max(self.heap.len());
        seq
    }

    /// Insert `action` to fire `delay` ticks from now.
    pub fn schedule(&mut self, delay: u64, action: Action) -> u64 {
        self.push(self.now.after(delay), action)
    }

    /// Re-insert a popped event at `now + delay` with a fresh sequence
    /// number, keeping its action.
    pub fn renew(&mut self, event: Event, delay: u64) -> u64 {
        self.schedule(delay, event.action)
    }

    /// Remove and return the event with the smallest `(rank, seq)`,
    /// advancing the clock to its rank if that is later than `now`.
    pub fn pop_next(&mut self) -> Option<Event> {
        let Reverse(Entry(event)) = self.heap.pop()?;
        self.now = self.now.max(event.rank);
        Some(event)
    }

    /// Like [`pop_next`](Self::pop_next), but only if the next event's
    /// rank is at most `limit`.
    pub fn pop_due(&mut self, limit: Tick) -> Option<Event> {
        if self.peek_rank()? <= limit {
            self.pop_next()
        } else {
            None
        }
    }

    /// Rank of the next event without removing it.
    pub fn peek_rank(&self) -> Option<Tick> {
        self.heap.peek().map(|Reverse(Entry(e))| e.rank)
    }

    /// Move the clock forward to `tick`. Never moves it backwards.
    pub fn advance_to(&mut self, tick: Tick) {
        self.now = self.now.max(tick);
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no events are pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Largest number of events ever pending at once.
    pub fn peak_len(&self) -> usize {
        self.peak_len
    }

    /// Pending events in firing order, without disturbing the queue.
    pub fn pending(&self) -> Vec<Event> {
        let mut out: Vec<Event> = self.heap.iter().map(|Reverse(Entry(e))| *e).collect();
        out.sort_by_key(|e| (e.rank, e.seq));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloam_core::MonsterId;
    use proptest::prelude::*;

    fn turn(i: u32) -> Action {
        Action::MonsterTurn {
            monster: MonsterId(i),
        }
    }

    fn id_of(e: &Event) -> u32 {
        match e.action {
            Action::MonsterTurn { monster } => monster.0,
            _ => u32::MAX,
        }
    }

    // ── Ordering ────────────────────────────────────────────────

    #[test]
    fn ranks_five_three_three_eight() {
        let mut q = EventQueue::new();
        for (i, r) in [5u64, 3, 3, 8].into_iter().enumerate() {
            q.push(Tick(r), turn(i as u32));
        }
        let order: Vec<u32> = std::iter::from_fn(|| q.pop_next())
            .map(|e| id_of(&e))
            .collect();
        assert_eq!(order, vec![1, 2, 0, 3]);
    }

    #[test]
    fn empty_queue_pops_nothing() {
        let mut q = EventQueue::new();
        assert!(q.pop_next().is_none());
        assert!(q.is_empty());
        assert_eq!(q.peek_rank(), None);
    }

    // ── Clock ───────────────────────────────────────────────────

    #[test]
    fn clock_follows_pops_and_never_decreases() {
        let mut q = EventQueue::new();
        q.push(Tick(10), turn(0));
        q.pop_next();
        assert_eq!(q.now(), Tick(10));
        q.push(Tick(4), turn(1));
        let e = q.pop_next().unwrap();
        assert_eq!(e.rank, Tick(4));
        assert_eq!(q.now(), Tick(10));
    }

    #[test]
    fn renew_reschedules_from_now() {
        let mut q = EventQueue::new();
        q.push(Tick(3), turn(0));
        let e = q.pop_next().unwrap();
        q.renew(e, 5);
        assert_eq!(q.peek_rank(), Some(Tick(8)));
        let again = q.pop_next().unwrap();
        assert_eq!(again.action, e.action);
        assert!(again.seq > e.seq);
    }

    #[test]
    fn renew_with_zero_delay_goes_behind_same_rank_events() {
        let mut q = EventQueue::new();
        q.push(Tick(0), turn(0));
        q.push(Tick(0), turn(1));
        let first = q.pop_next().unwrap();
        q.renew(first, 0);
        assert_eq!(id_of(&q.pop_next().unwrap()), 1);
        assert_eq!(id_of(&q.pop_next().unwrap()), 0);
    }

    #[test]
    fn pop_due_respects_limit() {
        let mut q = EventQueue::new();
        q.push(Tick(2), turn(0));
        q.push(Tick(6), turn(1));
        assert!(q.pop_due(Tick(1)).is_none());
        assert_eq!(q.pop_due(Tick(5)).map(|e| id_of(&e)), Some(0));
        assert!(q.pop_due(Tick(5)).is_none());
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn advance_to_is_monotonic() {
        let mut q = EventQueue::new();
        q.advance_to(Tick(7));
        q.advance_to(Tick(3));
        assert_eq!(q.now(), Tick(7));
        q.schedule(2, turn(0));
        assert_eq!(q.peek_rank(), Some(Tick(9)));
    }

    #[test]
    fn peak_len_tracks_high_water_mark() {
        let mut q = EventQueue::new();
        for i in 0..4 {
            q.push(Tick(i), turn(i as u32));
        }
        while q.pop_next().is_some() {}
        q.push(Tick(9), turn(9));
        assert_eq!(q.peak_len(), 4);
        assert_eq!(q.pending().len(), 1);
    }

    // ── Properties ──────────────────────────────────────────────

    proptest! {
        #[test]
        fn pops_are_sorted_and_stable(ranks in prop::collection::vec(0u64..20, 0..64)) {
            let mut q = EventQueue::new();
            for (i, r) in ranks.iter().enumerate() {
                q.push(Tick(*r), turn(i as u32));
            }
            let popped: Vec<(u64, u32)> = std::iter::from_fn(|| q.pop_next())
                .map(|e| (e.rank.0, id_of(&e)))
                .collect();
            prop_assert_eq!(popped.len(), ranks.len());
            for w in popped.windows(2) {
                prop_assert!(w[0].0 <= w[1].0);
                if w[0].0 == w[1].0 {
                    prop_assert!(w[0].1 < w[1].1);
                }
            }
        }

        #[test]
        fn identical_pushes_replay_identically(ranks in prop::collection::vec(0u64..10, 0..32)) {
            let run = |rs: &[u64]| {
                let mut q = EventQueue::new();
                for (i, r) in rs.iter().enumerate() {
                    q.push(Tick(*r), turn(i as u32));
                }
                std::iter::from_fn(|| q.pop_next()).map(|e| id_of(&e)).collect::<Vec<_>>()
            };
            prop_assert_eq!(run(&ranks), run(&ranks));
        }
    }
}
