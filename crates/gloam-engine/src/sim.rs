//! The simulation context and its turn protocol.
//!
//! [`Simulation`] owns every piece of mutable state: the level, the
//! event queue, status and overlay tables, the monster roster, the
//! player, and the collaborators the core reaches through traits.
//! Time passes only by popping events from the queue.
//!
//! # Turn protocol
//!
//! The player's turn is itself an event. [`wait_for_player`] fires events
//! until the `PlayerTurn` pops and then parks it. [`act`] applies one
//! command against the parked turn, renews the turn by the command's
//! delay and waits again. A rejected command leaves the turn parked and
//! every piece of state untouched.
//!
//! [`wait_for_player`]: Simulation::wait_for_player
//! [`act`]: Simulation::act

use tracing::{debug, trace};

use gloam_core::{
    CommandError, Dir, Generation, GridOracle, MonsterId, Notice, NotificationSink, NullSink, Pos,
    RandomSource, TerrainKind, Tick, VisibilityOracle,
};
use gloam_path::ExploreCache;
use gloam_space::Dungeon;

use crate::abilities::Ability;
use crate::config::{ConfigError, PlacementError, SimConfig};
use crate::event::{Action, DelayedEffect, Event};
use crate::metrics::DrainMetrics;
use crate::monster::{Monster, MonsterKind, Roster};
use crate::overlay::{OverlayKind, OverlayTable, Removal};
use crate::queue::EventQueue;
use crate::rng::SeededRng;
use crate::status::{Actor, Expiry, Status, StatusTable};
use crate::trace::EventTrace;
use crate::vision::LineOfSight;

/// The player character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    /// Current cell.
    pub pos: Pos,
    /// Hit points.
    pub hp: u32,
    /// Magic points.
    pub mp: u32,
    /// Hit point ceiling.
    pub hp_max: u32,
    /// Magic point ceiling.
    pub mp_max: u32,
}

/// A player command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Pass one turn.
    Wait,
    /// Step one cell.
    Move(Dir),
    /// Use an ability.
    Evoke(Ability),
}

/// What a fired event amounted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Live,
    Stale,
    Orphaned,
}

/// Check that `pos` can hold an actor.
fn check_cell(dungeon: &Dungeon, pos: Pos, occupied: bool) -> Result<(), PlacementError> {
    let terrain = dungeon
        .terrain(pos)
        .ok_or(PlacementError::OutOfBounds { pos })?;
    if !terrain.is_passable() {
        return Err(PlacementError::Impassable { pos, terrain });
    }
    if occupied {
        return Err(PlacementError::Occupied { pos });
    }
    Ok(())
}

/// The whole simulation state.
pub struct Simulation {
    pub(crate) config: SimConfig,
    pub(crate) dungeon: Dungeon,
    pub(crate) queue: EventQueue,
    pub(crate) statuses: StatusTable,
    pub(crate) overlays: OverlayTable,
    pub(crate) roster: Roster,
    pub(crate) player: Player,
    pub(crate) rng: Box<dyn RandomSource>,
    pub(crate) vision: Box<dyn VisibilityOracle>,
    pub(crate) sink: Box<dyn NotificationSink>,
    pub(crate) explore: ExploreCache,
    pub(crate) noise_marks: Vec<Pos>,
    pub(crate) metrics: DrainMetrics,
    pub(crate) trace: EventTrace,
    pub(crate) rests: Generation,
    parked: Option<Event>,
    level: Generation,
    levels: Generation,
}

impl Simulation {
    /// Build a simulation on `dungeon` with the player at `start`.
    ///
    /// Uses a [`SeededRng`] from `config.seed`, [`LineOfSight`] with
    /// `config.los_range` and a [`NullSink`]; replace them with the
    /// `with_*` builders. The first `PlayerTurn` is queued at tick 0.
    pub fn new(config: SimConfig, dungeon: Dungeon, start: Pos) -> Result<Self, ConfigError> {
        config.validate()?;
        check_cell(&dungeon, start, false)?;
        let mut levels = Generation::default();
        let level = levels.bump();
        let mut queue = EventQueue::new();
        queue.push(Tick::ZERO, Action::PlayerTurn);
        let player = Player {
            pos: start,
            hp: config.player_hp,
            mp: config.player_mp,
            hp_max: config.player_hp,
            mp_max: config.player_mp,
        };
        Ok(Self {
            rng: Box::new(SeededRng::new(config.seed)),
            vision: Box::new(LineOfSight::new(config.los_range)),
            sink: Box::new(NullSink),
            config,
            dungeon,
            queue,
            statuses: StatusTable::new(),
            overlays: OverlayTable::new(),
            roster: Roster::new(),
            player,
            explore: ExploreCache::new(),
            noise_marks: Vec::new(),
            metrics: DrainMetrics::default(),
            trace: EventTrace::digest_only(),
            rests: Generation::default(),
            parked: None,
            level,
            levels,
        })
    }

    /// Replace the random source.
    pub fn with_rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Replace the visibility oracle.
    pub fn with_visibility(mut self, vision: impl VisibilityOracle + 'static) -> Self {
        self.vision = Box::new(vision);
        self
    }

    /// Replace the notification sink.
    pub fn with_sink(mut self, sink: impl NotificationSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Keep every fired event in the trace, not only the digest.
    pub fn with_event_log(mut self) -> Self {
        self.trace = EventTrace::recording();
        self
    }

    // ── Turn protocol ───────────────────────────────────────────

    /// Fire events until the player's turn comes up, then park it.
    /// Returns the current tick. A no-op when already parked.
    pub fn wait_for_player(&mut self) -> Tick {
        while self.parked.is_none() {
            let Some(event) = self.queue.pop_next() else {
                break;
            };
            self.step(event);
        }
        self.queue.now()
    }

    /// Apply a player command.
    ///
    /// Validation happens before any mutation: on error nothing changed
    /// and the turn stays parked. On success the turn is renewed by the
    /// command's delay and the simulation runs up to the next player
    /// turn, whose tick is returned.
    pub fn act(&mut self, command: Command) -> Result<Tick, CommandError> {
        self.wait_for_player();
        let delay = match self.apply(command) {
            Ok(delay) => delay,
            Err(e) => {
                self.metrics.commands_rejected += 1;
                debug!(?command, error = %e, "command rejected");
                return Err(e);
            }
        };
        self.metrics.commands_applied += 1;
        debug!(?command, delay, now = %self.queue.now(), "command applied");
        match self.parked.take() {
            Some(turn) => self.queue.renew(turn, delay),
            None => self.queue.schedule(delay, Action::PlayerTurn),
        };
        Ok(self.wait_for_player())
    }

    /// Fire every event ranked at or before `limit`, then move the clock
    /// to `limit`. Player turns met on the way, including a parked one,
    /// count as waits.
    ///
    /// Once the clock reaches [`Tick::MAX`] draining stops, since events
    /// renewed from there would land on the same tick forever.
    pub fn run_until(&mut self, limit: Tick) {
        if let Some(turn) = self.parked.take() {
            self.queue.renew(turn, self.config.turn);
        }
        while let Some(event) = self.queue.pop_due(limit) {
            if event.action == Action::PlayerTurn {
                self.record(&event);
                self.metrics.events_fired += 1;
                self.queue.renew(event, self.config.turn);
            } else {
                self.step(event);
            }
            if self.queue.now() == Tick::MAX {
                break;
            }
        }
        self.queue.advance_to(limit);
    }

    fn apply(&mut self, command: Command) -> Result<u64, CommandError> {
        match command {
            Command::Wait => Ok(self.config.turn),
            Command::Move(dir) => self.move_player(dir),
            Command::Evoke(ability) => {
                self.evoke(ability)?;
                Ok(self.config.turn)
            }
        }
    }

    fn move_player(&mut self, dir: Dir) -> Result<u64, CommandError> {
        if self.player_has(Status::Lignification) {
            return Err(CommandError::Incapacitated {
                reason: "move while lignified",
            });
        }
        let to = self.player.pos.step(dir);
        let terrain = self
            .dungeon
            .terrain(to)
            .ok_or(CommandError::Blocked { pos: to })?;
        if self.roster.occupied(to) {
            return Err(CommandError::Blocked { pos: to });
        }
        let levitating = self.player_has(Status::Levitation);
        match terrain {
            t if t.is_diggable() && self.player_has(Status::Dig) => {
                self.dungeon.set_terrain(to, TerrainKind::Rubble);
                self.notify(Notice::message("You dig through the wall."));
            }
            TerrainKind::Barrier | TerrainKind::Chasm if levitating => {}
            TerrainKind::Wall | TerrainKind::Barrier | TerrainKind::Chasm => {
                return Err(CommandError::Blocked { pos: to });
            }
            _ => {}
        }
        self.player.pos = to;
        if self.player_has(Status::Swift) {
            Ok(0)
        } else {
            Ok(self.config.turn)
        }
    }

    // ── Event dispatch ──────────────────────────────────────────

    fn record(&mut self, event: &Event) {
        self.trace.record(event);
        trace!(rank = %event.rank, seq = event.seq, action = %event.action, "event fired");
    }

    fn step(&mut self, event: Event) {
        self.record(&event);
        self.metrics.events_fired += 1;
        let outcome = match event.action {
            Action::PlayerTurn => {
                self.parked = Some(event);
                Outcome::Live
            }
            Action::MonsterTurn { monster } => match self.monster_turn(monster) {
                Some(delay) => {
                    self.queue.renew(event, delay);
                    Outcome::Live
                }
                None => Outcome::Orphaned,
            },
            Action::StatusEnd {
                actor,
                status,
                generation,
            } => self.status_end(actor, status, generation),
            Action::MonsterWake {
                monster,
                generation,
            } => self.monster_wake(monster, generation),
            Action::OverlayEnd { pos, generation } => self.overlay_end(pos, generation),
            Action::Delayed {
                pos,
                effect,
                timer,
                generation,
            } => self.delayed_step(pos, effect, timer, generation),
        };
        match outcome {
            Outcome::Live => {}
            Outcome::Stale => {
                self.metrics.stale_events += 1;
                trace!(rank = %event.rank, seq = event.seq, action = %event.action, "stale event absorbed");
            }
            Outcome::Orphaned => {
                self.metrics.orphaned_events += 1;
                trace!(rank = %event.rank, seq = event.seq, action = %event.action, "orphaned event absorbed");
            }
        }
    }

    fn status_end(&mut self, actor: Actor, status: Status, generation: Generation) -> Outcome {
        let Expiry::Expired { fake } = self.statuses.expire(actor, status, generation) else {
            return Outcome::Stale;
        };
        if fake {
            return Outcome::Live;
        }
        match actor {
            Actor::Player => {
                if let Some(text) = status.player_end_message() {
                    self.notify(Notice::message(text));
                }
            }
            Actor::Monster(id) => {
                let Some(m) = self.roster.get(id) else {
                    return Outcome::Orphaned;
                };
                if let Some(pred) = status.monster_end_predicate() {
                    if self.player_sees(m.pos) {
                        let text = format!("{} {pred}.", m.definite());
                        self.notify(Notice::Message(text));
                    }
                }
            }
        }
        Outcome::Live
    }

    fn overlay_end(&mut self, pos: Pos, generation: Generation) -> Outcome {
        match self.overlays.expire(&mut self.dungeon, pos, generation) {
            Removal::Stale => Outcome::Stale,
            Removal::Removed(OverlayKind::Fire) => {
                self.burn_out(pos);
                Outcome::Live
            }
            Removal::Removed(_) | Removal::Superseded(_) => Outcome::Live,
        }
    }

    /// Fire has consumed `pos`: leave smoke and maybe spread.
    fn burn_out(&mut self, pos: Pos) {
        let smoke = self.jittered(self.config.night_cloud_duration);
        self.overlays.place(
            &mut self.dungeon,
            &mut self.queue,
            pos,
            OverlayKind::NightCloud,
            smoke,
        );
        for nb in self.dungeon.flammable_neighbours(pos) {
            if self.rng.rand_int(self.config.fire_spread_odds) == 0 {
                self.ignite(nb);
            }
        }
    }

    pub(crate) fn ignite(&mut self, pos: Pos) -> bool {
        let duration = self.jittered(self.config.fire_duration);
        self.overlays
            .place(
                &mut self.dungeon,
                &mut self.queue,
                pos,
                OverlayKind::Fire,
                duration,
            )
            .took()
    }

    fn delayed_step(
        &mut self,
        pos: Pos,
        effect: DelayedEffect,
        timer: u32,
        generation: Generation,
    ) -> Outcome {
        if generation != self.level {
            return Outcome::Stale;
        }
        if timer > 0 {
            self.queue.schedule(
                self.config.turn,
                Action::Delayed {
                    pos,
                    effect,
                    timer: timer - 1,
                    generation,
                },
            );
            return Outcome::Live;
        }
        debug!(%pos, %effect, "delayed effect triggers");
        match effect {
            DelayedEffect::HarmonicNoise => {
                self.notify(Notice::message("You hear a thunderous harmonic noise."));
            }
            DelayedEffect::OricExplosion => {
                let blast = self
                    .dungeon
                    .grid()
                    .disk(pos, self.config.oric_explosion_radius);
                for p in blast {
                    if self.dungeon.terrain(p).is_some_and(TerrainKind::is_diggable) {
                        self.dungeon.set_terrain(p, TerrainKind::Rubble);
                    }
                }
                self.notify(Notice::message("A loud oric explosion shatters the walls."));
            }
        }
        self.make_noise(pos, self.config.los_range);
        Outcome::Live
    }

    /// Queue a delayed effect at the player's position, counting down
    /// from `timer` one turn at a time.
    pub(crate) fn start_countdown(&mut self, effect: DelayedEffect, timer: u32) {
        self.queue.schedule(
            self.config.turn,
            Action::Delayed {
                pos: self.player.pos,
                effect,
                timer,
                generation: self.level,
            },
        );
    }

    // ── Population and levels ───────────────────────────────────

    /// Place a new monster and queue its first turn one turn from now.
    pub fn spawn_monster(&mut self, kind: MonsterKind, pos: Pos) -> Result<MonsterId, PlacementError> {
        let occupied = self.roster.occupied(pos) || self.player.pos == pos;
        check_cell(&self.dungeon, pos, occupied)?;
        let id = self.roster.spawn(kind, pos);
        self.queue
            .schedule(self.config.turn, Action::MonsterTurn { monster: id });
        debug!(monster = %id, %kind, %pos, "monster spawned");
        Ok(id)
    }

    /// Remove a monster. Its pending events become no-ops.
    pub fn remove_monster(&mut self, id: MonsterId) -> Option<Monster> {
        let removed = self.roster.remove(id)?;
        self.statuses.forget_actor(Actor::Monster(id));
        debug!(monster = %id, "monster removed");
        Some(removed)
    }

    /// Move to a new level with the player at `start`.
    ///
    /// Every monster is destroyed and its statuses forgotten. Overlays
    /// and countdowns of the old level are discarded. Player statuses
    /// carry over. Events still queued for the old level no-op.
    pub fn clear_level(&mut self, next: Dungeon, start: Pos) -> Result<(), PlacementError> {
        check_cell(&next, start, false)?;
        for id in self.roster.ids() {
            self.statuses.forget_actor(Actor::Monster(id));
        }
        self.roster.clear();
        self.overlays.forget_all();
        self.explore.invalidate();
        self.noise_marks.clear();
        self.dungeon = next;
        self.player.pos = start;
        self.level = self.levels.bump();
        debug!(level = %self.level, %start, "level changed");
        Ok(())
    }

    // ── Statuses ────────────────────────────────────────────────

    fn knows(&self, actor: Actor) -> bool {
        match actor {
            Actor::Player => true,
            Actor::Monster(id) => self.roster.get(id).is_some(),
        }
    }

    /// Activate `status` on `actor` for `duration` ticks. Returns `false`
    /// when it is already active or the monster does not exist.
    pub fn put_status(&mut self, actor: Actor, status: Status, duration: u64) -> bool {
        self.knows(actor) && self.statuses.put(&mut self.queue, actor, status, duration)
    }

    /// Like [`put_status`](Self::put_status) for a status that only
    /// gates other commands and has no visible effect.
    pub fn put_fake_status(&mut self, actor: Actor, status: Status, duration: u64) -> bool {
        self.knows(actor) && self.statuses.put_fake(&mut self.queue, actor, status, duration)
    }

    /// Activate or overwrite `status`, expiring `duration` ticks from
    /// now. Returns the previous expiry, if any.
    pub fn refresh_status(&mut self, actor: Actor, status: Status, duration: u64) -> Option<Tick> {
        if !self.knows(actor) {
            return None;
        }
        self.statuses.refresh(&mut self.queue, actor, status, duration)
    }

    /// Cancel `status`. Returns whether it was active.
    pub fn clear_status(&mut self, actor: Actor, status: Status) -> bool {
        self.statuses.clear(actor, status)
    }

    /// Whether `status` is active on `actor`.
    pub fn has_status(&self, actor: Actor, status: Status) -> bool {
        self.statuses.has(actor, status)
    }

    /// Tick at which `status` expires on `actor`.
    pub fn expiry(&self, actor: Actor, status: Status) -> Option<Tick> {
        self.statuses.expiry(actor, status)
    }

    /// Visible statuses of `actor` with their expiries.
    pub fn active_statuses(&self, actor: Actor) -> Vec<(Status, Tick)> {
        self.statuses.active(actor)
    }

    pub(crate) fn player_has(&self, status: Status) -> bool {
        self.statuses.has(Actor::Player, status)
    }

    pub(crate) fn monster_has(&self, id: MonsterId, status: Status) -> bool {
        self.statuses.has(Actor::Monster(id), status)
    }

    // ── Helpers ─────────────────────────────────────────────────

    pub(crate) fn notify(&mut self, notice: Notice) {
        self.sink.notify(notice);
    }

    pub(crate) fn player_sees(&self, pos: Pos) -> bool {
        self.vision.player_sees(&self.dungeon, self.player.pos, pos)
    }

    /// `d + rand(d / 2)`.
    pub(crate) fn jittered(&mut self, d: u64) -> u64 {
        let spread = u32::try_from(d / 2).unwrap_or(u32::MAX);
        d.saturating_add(u64::from(self.rng.rand_int(spread)))
    }

    /// One of `cells` drawn uniformly, or `None` when empty.
    pub(crate) fn pick(&mut self, cells: &[Pos]) -> Option<Pos> {
        let n = u32::try_from(cells.len()).ok().filter(|&n| n > 0)?;
        cells.get(self.rng.rand_int(n) as usize).copied()
    }

    /// Whether an actor could stand on `pos` right now.
    pub(crate) fn is_free(&self, pos: Pos) -> bool {
        self.dungeon.is_passable(pos) && !self.roster.occupied(pos) && self.player.pos != pos
    }

    // ── Accessors ───────────────────────────────────────────────

    /// Current simulation time.
    pub fn now(&self) -> Tick {
        self.queue.now()
    }

    /// Whether the player's turn is parked awaiting a command.
    pub fn is_parked(&self) -> bool {
        self.parked.is_some()
    }

    /// The configuration in force.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The player.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The current level.
    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    /// Every live monster.
    pub fn monsters(&self) -> &Roster {
        &self.roster
    }

    /// One monster.
    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.roster.get(id)
    }

    /// Active overlays.
    pub fn overlays(&self) -> &OverlayTable {
        &self.overlays
    }

    /// Destinations marked by the last noise illusion.
    pub fn noise_marks(&self) -> &[Pos] {
        &self.noise_marks
    }

    /// Pending events in firing order.
    pub fn pending_events(&self) -> Vec<Event> {
        self.queue.pending()
    }

    /// Cumulative counters.
    pub fn metrics(&self) -> DrainMetrics {
        DrainMetrics {
            peak_queue_len: self.queue.peak_len(),
            explore_cache_hits: self.explore.hits(),
            distance_maps: self.metrics.distance_maps + self.explore.misses(),
            ..self.metrics.clone()
        }
    }

    /// The fired-event trace.
    pub fn trace(&self) -> &EventTrace {
        &self.trace
    }
}
