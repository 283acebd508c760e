//! Monster decision-making.
//!
//! Monsters move along distance maps computed with their own cost model
//! ([`MonsterPath`]) and hear sounds along maps computed with the stock
//! [`NoisePath`]. State changes happen either during a monster's own
//! turn or in response to noise, abilities and wake events.
//!
//! | From      | To        | Trigger                                       |
//! |-----------|-----------|-----------------------------------------------|
//! | any       | Hunting   | notices the player, or hears a loud noise     |
//! | Hunting   | Wandering | reaches its target without seeing the player  |
//! | any       | Resting   | sleep ability, night cloud                    |
//! | Resting   | Wandering | its current wake event fires                  |
//! | Resting   | Hunting   | its wake event fires while it sees the player |

use smallvec::SmallVec;
use tracing::debug;

use gloam_core::{Dir, Generation, GridOracle, MonsterId, Notice, Pos, TerrainKind};
use gloam_path::{DistanceMap, NoisePath, PathProvider};

use crate::event::Action;
use crate::monster::{Monster, MonsterKind, MonsterState, Roster};
use crate::sim::{Outcome, Simulation};
use crate::status::Status;

/// Movement rules of one monster.
///
/// Passable terrain only, doors only for monsters that open them, and
/// never into a cell held by another monster or the player.
pub(crate) struct MonsterPath<'a> {
    grid: &'a dyn GridOracle,
    roster: &'a Roster,
    mover: MonsterId,
    opens_doors: bool,
    player: Pos,
}

impl<'a> MonsterPath<'a> {
    pub(crate) fn new(grid: &'a dyn GridOracle, roster: &'a Roster, mover: &Monster, player: Pos) -> Self {
        Self {
            grid,
            roster,
            mover: mover.id,
            opens_doors: mover.kind.can_open_doors(),
            player,
        }
    }

    fn enterable(&self, pos: Pos) -> bool {
        match self.grid.terrain(pos) {
            None => false,
            Some(TerrainKind::Door) if !self.opens_doors => false,
            Some(t) if !t.is_passable() => false,
            Some(_) => {
                pos != self.player && self.roster.at(pos).is_none_or(|m| m.id == self.mover)
            }
        }
    }
}

impl PathProvider for MonsterPath<'_> {
    fn name(&self) -> &str {
        "monster"
    }

    fn neighbours(&self, pos: Pos) -> SmallVec<[Pos; 4]> {
        self.grid
            .neighbours(pos)
            .into_iter()
            .filter(|&p| self.enterable(p))
            .collect()
    }

    fn cost(&self, _from: Pos, _to: Pos) -> u32 {
        1
    }
}

impl Simulation {
    /// Whether monster `m` notices the player this instant.
    ///
    /// Resting monsters notice nothing. The oracle decides line of sight.
    /// Adjacent monsters always notice. Otherwise shadows hide the player
    /// on dark cells, transparency on lit cells, and a disguise fools
    /// monsters not already hunting.
    pub(crate) fn notices_player(&self, m: &Monster) -> bool {
        if m.state == MonsterState::Resting {
            return false;
        }
        let player = self.player.pos;
        if !self
            .vision
            .monster_sees_player(&self.dungeon, m.id, m.pos, player)
        {
            return false;
        }
        if m.pos.is_adjacent(player) {
            return true;
        }
        let lit = self.dungeon.is_lit(player);
        let hidden = (lit && self.player_has(Status::Transparent))
            || (!lit && self.player_has(Status::Shadows))
            || (m.state != MonsterState::Hunting && self.player_has(Status::Disguised));
        !hidden
    }

    /// One AI step. Returns the delay before the monster's next turn, or
    /// `None` when the monster no longer exists.
    pub(crate) fn monster_turn(&mut self, id: MonsterId) -> Option<u64> {
        let m = self.roster.get(id)?.clone();
        let mut delay = self.config.turn.saturating_mul(m.kind.move_delay());
        if self.monster_has(id, Status::Slow) {
            delay = delay.saturating_mul(2);
        }
        if m.state == MonsterState::Resting || self.monster_has(id, Status::Paralysed) {
            return Some(delay);
        }
        if self.dungeon.terrain(m.pos) == Some(TerrainKind::NightCloud) {
            let rest = self.exhaustion();
            self.force_rest(id, rest);
            return Some(delay);
        }

        let player = self.player.pos;
        let sees = self.notices_player(&m);
        let Some(mon) = self.roster.get_mut(id) else {
            return Some(delay);
        };
        if sees {
            mon.state = MonsterState::Hunting;
            mon.target = Some(player);
            mon.search = Some(player);
        } else if mon.target == Some(mon.pos) {
            if mon.state == MonsterState::Hunting {
                mon.state = MonsterState::Wandering;
            }
            mon.target = None;
        }
        let lead = if mon.target.is_none() {
            Some(mon.search.take().filter(|&s| s != mon.pos))
        } else {
            None
        };
        if let Some(lead) = lead {
            let cell = lead.or_else(|| self.patrol_cell());
            if let Some(mon) = self.roster.get_mut(id) {
                mon.target = cell;
            }
        }

        if m.kind.is_immobile() || self.monster_has(id, Status::Lignified) {
            return Some(delay);
        }
        if self.monster_has(id, Status::Confused) {
            self.stumble(id);
        } else {
            self.advance(id);
        }
        self.disperse_on_contact(id);
        Some(delay)
    }

    /// A random passable cell to patrol towards.
    fn patrol_cell(&mut self) -> Option<Pos> {
        let cells = self.dungeon.passable_cells();
        self.pick(&cells)
    }

    /// Step to the neighbour closest to the monster's target.
    fn advance(&mut self, id: MonsterId) {
        let Some(m) = self.roster.get(id) else {
            return;
        };
        let Some(target) = m.target else {
            return;
        };
        let from = m.pos;
        let path = MonsterPath::new(&self.dungeon, &self.roster, m, self.player.pos);
        let map = DistanceMap::compute(&path, &[target], self.config.monster_path_radius);
        let here = map.cost(from).unwrap_or(u32::MAX);
        let mut best: Option<(u32, Pos)> = None;
        for nb in path.neighbours(from) {
            if let Some(c) = map.cost(nb) {
                if c < here && best.is_none_or(|(b, _)| c < b) {
                    best = Some((c, nb));
                }
            }
        }
        let unreachable = map.len() <= 1 || (here == u32::MAX && best.is_none());
        self.metrics.distance_maps += 1;
        let Some(mon) = self.roster.get_mut(id) else {
            return;
        };
        match best {
            Some((_, to)) => mon.pos = to,
            None if unreachable => {
                debug!(monster = %id, %target, "target unreachable");
                mon.target = None;
                if mon.state == MonsterState::Hunting {
                    mon.state = MonsterState::Wandering;
                }
            }
            None => {}
        }
    }

    /// Confused monsters step in a random direction when they can.
    fn stumble(&mut self, id: MonsterId) {
        let dir = Dir::ALL[self.rng.rand_int(4) as usize % 4];
        let Some(m) = self.roster.get(id) else {
            return;
        };
        let to = m.pos.step(dir);
        let path = MonsterPath::new(&self.dungeon, &self.roster, m, self.player.pos);
        if path.enterable(to) {
            if let Some(mon) = self.roster.get_mut(id) {
                mon.pos = to;
            }
        }
    }

    /// A hunter arriving next to a dispersing player blinks the player away.
    fn disperse_on_contact(&mut self, id: MonsterId) {
        let Some(m) = self.roster.get(id) else {
            return;
        };
        if m.state != MonsterState::Hunting
            || !m.pos.is_adjacent(self.player.pos)
            || !self.player_has(Status::Dispersal)
        {
            return;
        }
        let text = format!("{} gets close and you disperse.", m.definite());
        self.notify(Notice::Message(text));
        self.blink();
    }

    /// Base exhaustion plus jitter, in ticks.
    pub(crate) fn exhaustion(&mut self) -> u64 {
        let extra = u64::from(self.rng.rand_int(self.config.sleep_exhaustion_jitter));
        self.config
            .sleep_exhaustion
            .saturating_add(extra)
            .saturating_mul(self.config.turn)
    }

    /// Put a monster to rest for `duration` ticks. Any earlier wake event
    /// becomes stale.
    pub(crate) fn force_rest(&mut self, id: MonsterId, duration: u64) {
        let generation = self.rests.bump();
        let visible = match self.roster.get(id) {
            Some(m) => self.player_sees(m.pos).then(|| m.definite()),
            None => return,
        };
        if let Some(mon) = self.roster.get_mut(id) {
            mon.state = MonsterState::Resting;
            mon.rest = Some(generation);
        }
        if let Some(name) = visible {
            self.notify(Notice::Message(format!("{name} falls asleep.")));
        }
        self.queue.schedule(
            duration,
            Action::MonsterWake {
                monster: id,
                generation,
            },
        );
    }

    /// Handle a fired [`Action::MonsterWake`].
    pub(crate) fn monster_wake(&mut self, id: MonsterId, generation: Generation) -> Outcome {
        let Some(m) = self.roster.get(id) else {
            return Outcome::Orphaned;
        };
        if m.state != MonsterState::Resting || m.rest != Some(generation) {
            return Outcome::Stale;
        }
        let mut m = m.clone();
        m.state = MonsterState::Wandering;
        let sees = self.notices_player(&m);
        let player = self.player.pos;
        if let Some(mon) = self.roster.get_mut(id) {
            mon.rest = None;
            if sees {
                mon.state = MonsterState::Hunting;
                mon.target = Some(player);
                mon.search = Some(player);
            } else {
                mon.state = MonsterState::Wandering;
            }
        }
        Outcome::Live
    }

    /// A sound of `loudness` at `at`.
    ///
    /// Monsters within sound cost `min(loudness, los_range)` that do not
    /// already notice the player start hunting towards `at`. Resting
    /// monsters wake only within `loudness / 2`. Returns the monsters
    /// that were alerted.
    pub fn make_noise(&mut self, at: Pos, loudness: u32) -> Vec<MonsterId> {
        let map = DistanceMap::compute(
            &NoisePath::new(&self.dungeon, self.config.noise_wall_cost),
            &[at],
            loudness,
        );
        self.metrics.distance_maps += 1;
        let threshold = loudness.min(self.config.los_range);
        let mut alerted = Vec::new();
        for id in self.roster.ids() {
            let Some(m) = self.roster.get(id).cloned() else {
                continue;
            };
            let Some(cost) = map.cost(m.pos) else {
                continue;
            };
            if m.state == MonsterState::Resting && cost > loudness / 2 {
                continue;
            }
            if cost > threshold || self.notices_player(&m) {
                if m.state == MonsterState::Resting {
                    self.wake(id);
                }
                continue;
            }
            if let Some(mon) = self.roster.get_mut(id) {
                mon.rest = None;
                mon.state = MonsterState::Hunting;
                mon.target = Some(at);
            }
            alerted.push(id);
        }
        debug!(%at, loudness, alerted = alerted.len(), "noise");
        alerted
    }

    fn wake(&mut self, id: MonsterId) {
        if let Some(mon) = self.roster.get_mut(id) {
            mon.rest = None;
            mon.state = MonsterState::Wandering;
        }
    }

    /// Send every monster that hears the player but does not see them
    /// towards the loudest-looking spot nearby, climbing the sound
    /// gradient away from the player. Returns the marked destinations.
    pub(crate) fn noise_illusion(&mut self) -> Vec<Pos> {
        let player = self.player.pos;
        let map = DistanceMap::compute(
            &NoisePath::new(&self.dungeon, self.config.noise_wall_cost),
            &[player],
            self.config.noise_illusion_radius,
        );
        self.metrics.distance_maps += 1;
        let mut marks = Vec::new();
        for id in self.roster.ids() {
            let Some(m) = self.roster.get(id).cloned() else {
                continue;
            };
            let Some(start) = map.cost(m.pos) else {
                continue;
            };
            if start > self.config.los_range || self.notices_player(&m) {
                continue;
            }
            let path = MonsterPath::new(&self.dungeon, &self.roster, &m, player);
            let mut target = m.pos;
            let mut best = start;
            loop {
                let mut climbed = false;
                for nb in path.neighbours(target) {
                    if let Some(c) = map.cost(nb) {
                        if c > best {
                            best = c;
                            target = nb;
                            climbed = true;
                        }
                    }
                }
                if !climbed {
                    break;
                }
            }
            if let Some(mon) = self.roster.get_mut(id) {
                if mon.kind == MonsterKind::SatowalgaPlant {
                    mon.state = MonsterState::Hunting;
                } else if mon.state != MonsterState::Hunting {
                    mon.state = MonsterState::Wandering;
                }
                mon.rest = None;
                mon.target = Some(target);
            }
            marks.push(target);
        }
        self.noise_marks = marks.clone();
        marks
    }
}
