//! Test utilities and mock collaborators for Gloam development.
//!
//! Provides scripted implementations of the collaborator traits
//! ([`VisibilityOracle`], [`NotificationSink`], [`RandomSource`]) and
//! level fixtures in [`fixtures`]. The mocks that tests need to steer or
//! inspect after handing them to a simulation share their state through
//! `Rc<RefCell<_>>`: keep a clone, give the other away.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use gloam_core::{
    GridOracle, MonsterId, Notice, NotificationSink, Pos, RandomSource, VisibilityOracle,
};

#[derive(Debug, Default)]
struct Script {
    sees_everything: bool,
    player_sees: HashSet<Pos>,
    monsters_see_player: bool,
    watchers: HashSet<MonsterId>,
}

/// A [`VisibilityOracle`] answering from a script instead of geometry.
///
/// Starts blind: the player sees nothing and no monster sees the player.
#[derive(Clone, Debug, Default)]
pub struct ScriptedVisibility {
    script: Rc<RefCell<Script>>,
}

impl ScriptedVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// The player sees every cell of the level.
    pub fn see_everything(&self) -> &Self {
        self.script.borrow_mut().sees_everything = true;
        self
    }

    /// The player sees `pos` in addition to anything already scripted.
    pub fn see(&self, pos: Pos) -> &Self {
        self.script.borrow_mut().player_sees.insert(pos);
        self
    }

    /// Forget everything the player was scripted to see.
    pub fn blind(&self) -> &Self {
        let mut s = self.script.borrow_mut();
        s.sees_everything = false;
        s.player_sees.clear();
        self
    }

    /// Every monster sees the player.
    pub fn all_monsters_watch(&self, watch: bool) -> &Self {
        self.script.borrow_mut().monsters_see_player = watch;
        self
    }

    /// Monster `id` sees the player.
    pub fn monster_watches(&self, id: MonsterId) -> &Self {
        self.script.borrow_mut().watchers.insert(id);
        self
    }

    /// Monster `id` no longer sees the player.
    pub fn monster_looks_away(&self, id: MonsterId) -> &Self {
        self.script.borrow_mut().watchers.remove(&id);
        self
    }
}

impl VisibilityOracle for ScriptedVisibility {
    fn player_sees(&self, grid: &dyn GridOracle, _player: Pos, pos: Pos) -> bool {
        let s = self.script.borrow();
        grid.in_bounds(pos) && (s.sees_everything || s.player_sees.contains(&pos))
    }

    fn monster_sees_player(
        &self,
        _grid: &dyn GridOracle,
        monster: MonsterId,
        _at: Pos,
        _player: Pos,
    ) -> bool {
        let s = self.script.borrow();
        s.monsters_see_player || s.watchers.contains(&monster)
    }
}

/// A [`NotificationSink`] that records every notice.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    notices: Rc<RefCell<Vec<Notice>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notice received so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    /// The text of every [`Notice::Message`] received so far.
    pub fn messages(&self) -> Vec<String> {
        self.notices
            .borrow()
            .iter()
            .filter_map(|n| n.as_message().map(str::to_owned))
            .collect()
    }

    /// Whether any message contains `needle`.
    pub fn saw_message(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }

    pub fn clear(&self) {
        self.notices.borrow_mut().clear();
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

/// A [`RandomSource`] that replays a fixed sequence, cycling.
///
/// Each draw returns the next value reduced modulo `n`. An empty
/// sequence always yields 0.
#[derive(Clone, Debug, Default)]
pub struct SequenceRng {
    values: Vec<u32>,
    next: usize,
}

impl SequenceRng {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            next: 0,
        }
    }

    /// Always 0: every shuffle is the identity, every jitter is zero.
    pub fn zeros() -> Self {
        Self::default()
    }

    /// Number of draws made.
    pub fn draws(&self) -> usize {
        self.next
    }
}

impl RandomSource for SequenceRng {
    fn rand_int(&mut self, n: u32) -> u32 {
        let v = if self.values.is_empty() {
            0
        } else {
            self.values[self.next % self.values.len()]
        };
        self.next += 1;
        if n == 0 {
            0
        } else {
            v % n
        }
    }
}
