//! Monsters and the roster that owns them.
//!
//! Monsters are addressed by [`MonsterId`], never by position in a list.
//! Ids are handed out in increasing order and never reused, so an event
//! naming a removed monster simply finds nothing in the [`Roster`].

use std::fmt;

use indexmap::IndexMap;

use gloam_core::{Generation, MonsterId, Pos};

/// Monster species.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MonsterKind {
    /// Patrolling guard.
    Guard,
    /// Fast tracker; cannot open doors.
    Dog,
    /// Veteran guard.
    HighGuard,
    /// Reflects teleportation back at the caster.
    MirrorSpecter,
    /// Slow fungus immune to lignification.
    TreeMushroom,
    /// Rooted plant that lashes out at any noise.
    SatowalgaPlant,
    /// Harmless fluttering insect.
    Butterfly,
}

impl MonsterKind {
    /// Whether the monster can path through doors.
    pub fn can_open_doors(self) -> bool {
        matches!(self, Self::Guard | Self::HighGuard | Self::MirrorSpecter)
    }

    /// Whether the monster never moves.
    pub fn is_immobile(self) -> bool {
        matches!(self, Self::SatowalgaPlant)
    }

    /// Whether teleporting the monster also teleports the caster.
    pub fn reflects_teleport(self) -> bool {
        matches!(self, Self::MirrorSpecter)
    }

    /// Whether lignification has no effect.
    pub fn resists_lignification(self) -> bool {
        matches!(self, Self::TreeMushroom)
    }

    /// Turns between two moves.
    pub fn move_delay(self) -> u64 {
        match self {
            Self::TreeMushroom => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for MonsterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Guard => "guard",
            Self::Dog => "dog",
            Self::HighGuard => "high guard",
            Self::MirrorSpecter => "mirror specter",
            Self::TreeMushroom => "tree mushroom",
            Self::SatowalgaPlant => "satowalga plant",
            Self::Butterfly => "butterfly",
        })
    }
}

/// Behavioural state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MonsterState {
    /// Idle patrol.
    #[default]
    Wandering,
    /// Moving towards a known or inferred player position.
    Hunting,
    /// Asleep or exhausted until a wake event fires.
    Resting,
}

impl fmt::Display for MonsterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Wandering => "wandering",
            Self::Hunting => "hunting",
            Self::Resting => "resting",
        })
    }
}

/// A live monster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Monster {
    /// Stable identity.
    pub id: MonsterId,
    /// Species.
    pub kind: MonsterKind,
    /// Current cell.
    pub pos: Pos,
    /// Behavioural state.
    pub state: MonsterState,
    /// Movement goal.
    pub target: Option<Pos>,
    /// Last known or suspected player position.
    pub search: Option<Pos>,
    /// Stamp of the current forced rest; `None` unless resting.
    pub(crate) rest: Option<Generation>,
}

impl Monster {
    fn new(id: MonsterId, kind: MonsterKind, pos: Pos) -> Self {
        Self {
            id,
            kind,
            pos,
            state: MonsterState::Wandering,
            target: None,
            search: None,
            rest: None,
        }
    }

    /// `kind` with the definite article, capitalised: "The dog".
    pub fn definite(&self) -> String {
        format!("The {}", self.kind)
    }

    /// Remember where the monster was when something was done to it,
    /// unless it already has a lead.
    pub(crate) fn mark_search(&mut self) {
        if self.search.is_none() {
            self.search = Some(self.pos);
        }
    }
}

/// Every monster on the current level, in spawn order.
#[derive(Debug, Default)]
pub struct Roster {
    monsters: IndexMap<MonsterId, Monster>,
    next_id: u32,
}

impl Roster {
    /// An empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a monster and return its fresh id. Placement rules are the
    /// caller's concern.
    pub fn spawn(&mut self, kind: MonsterKind, pos: Pos) -> MonsterId {
        let id = MonsterId(self.next_id);
        self.next_id += 1;
        self.monsters.insert(id, Monster::new(id, kind, pos));
        id
    }

    /// Remove a monster. Its id is never handed out again.
    pub fn remove(&mut self, id: MonsterId) -> Option<Monster> {
        self.monsters.shift_remove(&id)
    }

    /// Look up a monster.
    pub fn get(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.get(&id)
    }

    /// Look up a monster mutably.
    pub fn get_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.get_mut(&id)
    }

    /// The monster standing on `pos`, if any.
    pub fn at(&self, pos: Pos) -> Option<&Monster> {
        self.monsters.values().find(|m| m.pos == pos)
    }

    /// Whether a monster stands on `pos`.
    pub fn occupied(&self, pos: Pos) -> bool {
        self.at(pos).is_some()
    }

    /// Monsters in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Monster> + '_ {
        self.monsters.values()
    }

    /// Ids in spawn order.
    pub fn ids(&self) -> Vec<MonsterId> {
        self.monsters.keys().copied().collect()
    }

    /// Number of live monsters.
    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    /// Whether the level is empty.
    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    /// Destroy every monster. Ids keep counting up.
    pub fn clear(&mut self) {
        self.monsters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_never_reused() {
        let mut r = Roster::new();
        let a = r.spawn(MonsterKind::Guard, Pos::new(1, 1));
        let b = r.spawn(MonsterKind::Dog, Pos::new(2, 1));
        assert_ne!(a, b);
        r.remove(a);
        r.clear();
        let c = r.spawn(MonsterKind::Guard, Pos::new(1, 1));
        assert!(c.0 > b.0);
        assert!(r.get(a).is_none());
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn lookup_by_position() {
        let mut r = Roster::new();
        let id = r.spawn(MonsterKind::Butterfly, Pos::new(3, 4));
        assert_eq!(r.at(Pos::new(3, 4)).map(|m| m.id), Some(id));
        assert!(!r.occupied(Pos::new(4, 4)));
    }

    #[test]
    fn kind_properties() {
        assert!(MonsterKind::Guard.can_open_doors());
        assert!(!MonsterKind::Dog.can_open_doors());
        assert!(MonsterKind::SatowalgaPlant.is_immobile());
        assert!(MonsterKind::MirrorSpecter.reflects_teleport());
        assert!(MonsterKind::TreeMushroom.resists_lignification());
        assert_eq!(MonsterKind::TreeMushroom.move_delay(), 2);
        assert_eq!(MonsterKind::HighGuard.to_string(), "high guard");
    }

    #[test]
    fn mark_search_keeps_existing_lead() {
        let mut r = Roster::new();
        let id = r.spawn(MonsterKind::Guard, Pos::new(0, 0));
        let m = r.get_mut(id).unwrap();
        m.mark_search();
        assert_eq!(m.search, Some(Pos::new(0, 0)));
        m.pos = Pos::new(5, 5);
        m.mark_search();
        assert_eq!(m.search, Some(Pos::new(0, 0)));
        assert_eq!(m.definite(), "The guard");
    }
}
