//! Fired-event trace and its digest.
//!
//! The simulation appends every event it pops, stale ones included, in
//! firing order. Two runs with the same seed, level and command sequence
//! produce identical traces; [`EventTrace::digest`] condenses a trace to
//! one FNV-1a hash for cheap comparison.

use crate::event::{Action, Event};

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

#[inline]
fn fnv1a_u32(mut hash: u64, v: u32) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

#[inline]
fn fnv1a_u64(mut hash: u64, v: u64) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

#[inline]
fn fnv1a_i32(hash: u64, v: i32) -> u64 {
    fnv1a_u32(hash, v as u32)
}

fn fold_event(mut hash: u64, event: &Event) -> u64 {
    hash = fnv1a_u64(hash, event.rank.0);
    hash = fnv1a_u64(hash, event.seq);
    hash = fnv1a_byte(hash, event.action.tag());
    match event.action {
        Action::PlayerTurn => hash,
        Action::MonsterTurn { monster } => fnv1a_u32(hash, monster.0),
        Action::StatusEnd {
            actor,
            status,
            generation,
        } => {
            hash = fnv1a_u64(hash, actor.key());
            hash = fnv1a_byte(hash, status as u8);
            fnv1a_u64(hash, generation.0)
        }
        Action::MonsterWake {
            monster,
            generation,
        } => fnv1a_u64(fnv1a_u32(hash, monster.0), generation.0),
        Action::OverlayEnd { pos, generation } => {
            hash = fnv1a_i32(fnv1a_i32(hash, pos.x), pos.y);
            fnv1a_u64(hash, generation.0)
        }
        Action::Delayed {
            pos,
            effect,
            timer,
            generation,
        } => {
            hash = fnv1a_i32(fnv1a_i32(hash, pos.x), pos.y);
            hash = fnv1a_byte(hash, effect as u8);
            hash = fnv1a_u32(hash, timer);
            fnv1a_u64(hash, generation.0)
        }
    }
}

/// Record of fired events.
#[derive(Clone, Debug, Default)]
pub struct EventTrace {
    events: Vec<Event>,
    enabled: bool,
    digest: u64,
    count: u64,
}

impl EventTrace {
    /// A trace that keeps the full event list as well as the digest.
    pub fn recording() -> Self {
        Self {
            events: Vec::new(),
            enabled: true,
            digest: FNV_OFFSET,
            count: 0,
        }
    }

    /// A trace that only maintains the running digest.
    pub fn digest_only() -> Self {
        Self {
            enabled: false,
            ..Self::recording()
        }
    }

    /// Append a fired event.
    pub fn record(&mut self, event: &Event) {
        self.digest = fold_event(self.digest, event);
        self.count += 1;
        if self.enabled {
            self.events.push(*event);
        }
    }

    /// Recorded events in firing order. Empty unless built with
    /// [`recording`](Self::recording).
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events folded into the digest.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// FNV-1a digest over every recorded `(rank, seq, action)`.
    ///
    /// Returns the FNV offset basis when nothing has fired.
    pub fn digest(&self) -> u64 {
        self.digest
    }
}
