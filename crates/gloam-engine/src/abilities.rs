//! Player abilities.
//!
//! Every handler checks all of its preconditions before touching any
//! state, so a rejected evocation leaves the simulation exactly as it
//! was. Magic points are spent only after the handler succeeds.
//!
//! Abilities that affect "up to N" monsters filter the monsters in view
//! down to the eligible ones first and shuffle that list with the
//! simulation's random source, so the chosen N are fair but replayable.

use std::fmt;

use tracing::debug;

use gloam_core::traits::shuffle;
use gloam_core::{CommandError, GridOracle, MonsterId, Notice, Pos, TerrainKind};
use gloam_path::{DistanceMap, NoisePath};
use gloam_space::Grid;

use crate::event::DelayedEffect;
use crate::monster::MonsterState;
use crate::overlay::OverlayKind;
use crate::sim::Simulation;
use crate::status::{Actor, Status};

/// An ability the player can evoke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ability {
    /// Jump to a random visible cell, favouring distant ones.
    Blink,
    /// Jump to a random cell out of sight range.
    Teleport,
    /// Walk through walls for a while.
    Dig,
    /// Moves take no time for a while.
    Swiftness,
    /// Float over chasms and barriers for a while.
    Levitation,
    /// Set fire to adjacent flammable terrain.
    Fire,
    /// Surround the player with fog.
    Fog,
    /// Hide in darkness for a while.
    Shadows,
    /// Lure unaware monsters away with illusory sounds.
    Noise,
    /// Confuse every monster in view.
    Confusion,
    /// Put monsters in a cardinal line of sight to sleep.
    Sleeping,
    /// Teleport monsters in a cardinal line of sight away.
    TeleportOther,
    /// Exchange places with a distant monster in view.
    Swapping,
    /// Paralyse every monster in view.
    Paralysis,
    /// Raise barriers between the player and monsters in view.
    Obstruction,
    /// Root monsters in view to the ground.
    Lignification,
    /// Restore hit and magic points.
    Energy,
    /// Hide in light for a while.
    Transparency,
    /// Pass for a guard for a while.
    Disguise,
    /// A loud noise at the current cell, a few turns from now.
    DelayedNoise,
    /// Blink away whenever a hunter closes in, for a while.
    Dispersal,
    /// Shatter nearby walls, a few turns from now.
    OricExplosion,
    /// Reveal the layout of the level.
    MagicMapping,
}

impl Ability {
    /// Every ability.
    pub const ALL: [Ability; 23] = [
        Self::Blink,
        Self::Teleport,
        Self::Dig,
        Self::Swiftness,
        Self::Levitation,
        Self::Fire,
        Self::Fog,
        Self::Shadows,
        Self::Noise,
        Self::Confusion,
        Self::Sleeping,
        Self::TeleportOther,
        Self::Swapping,
        Self::Paralysis,
        Self::Obstruction,
        Self::Lignification,
        Self::Energy,
        Self::Transparency,
        Self::Disguise,
        Self::DelayedNoise,
        Self::Dispersal,
        Self::OricExplosion,
        Self::MagicMapping,
    ];

    /// Magic points spent on a successful evocation.
    pub fn mp_cost(self) -> u32 {
        match self {
            Self::Energy => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Blink => "blinking",
            Self::Teleport => "teleportation",
            Self::Dig => "digging",
            Self::Swiftness => "swiftness",
            Self::Levitation => "levitation",
            Self::Fire => "fire",
            Self::Fog => "fog",
            Self::Shadows => "shadows",
            Self::Noise => "noise",
            Self::Confusion => "confusion",
            Self::Sleeping => "sleeping",
            Self::TeleportOther => "teleport other",
            Self::Swapping => "swapping",
            Self::Paralysis => "paralysis",
            Self::Obstruction => "obstruction",
            Self::Lignification => "lignification",
            Self::Energy => "energy",
            Self::Transparency => "transparency",
            Self::Disguise => "disguise",
            Self::DelayedNoise => "delayed noise",
            Self::Dispersal => "dispersal",
            Self::OricExplosion => "delayed oric explosion",
            Self::MagicMapping => "magic mapping",
        };
        write!(f, "magara of {name}")
    }
}

fn no_targets(reason: &'static str) -> CommandError {
    CommandError::NoTargets { reason }
}

impl Simulation {
    /// Evoke `ability`, spending its cost on success.
    pub(crate) fn evoke(&mut self, ability: Ability) -> Result<(), CommandError> {
        if self.player_has(Status::Nausea) {
            return Err(CommandError::Incapacitated {
                reason: "use magic while sick",
            });
        }
        if self.player_has(Status::Confusion) {
            return Err(CommandError::Incapacitated {
                reason: "use magic while confused",
            });
        }
        let needed = ability.mp_cost();
        if needed > self.player.mp {
            return Err(CommandError::InsufficientMagic {
                needed,
                available: self.player.mp,
            });
        }
        let c = self.config.clone();
        match ability {
            Ability::Blink => self.evoke_blink(),
            Ability::Teleport => self.evoke_teleport(),
            Ability::Dig => self.gain(
                Status::Dig,
                c.digging_duration,
                "digging",
                "You feel like an earth dragon.",
            ),
            Ability::Swiftness => {
                self.gain(Status::Swift, c.swiftness_duration, "swift", "You feel swift.")
            }
            Ability::Levitation => self.gain(
                Status::Levitation,
                c.levitation_duration,
                "levitating",
                "You feel light.",
            ),
            Ability::Fire => self.evoke_fire(),
            Ability::Fog => self.evoke_fog(),
            Ability::Shadows => self.evoke_shadows(),
            Ability::Noise => self.evoke_noise(),
            Ability::Confusion => self.wave(
                Status::Confused,
                c.confusion_duration,
                "Whoosh! A confusing luminous wave emerges.",
            ),
            Ability::Paralysis => self.wave(
                Status::Paralysed,
                c.paralysis_duration,
                "Whoosh! A slowing luminous wave emerges.",
            ),
            Ability::Sleeping => self.evoke_sleeping(),
            Ability::TeleportOther => self.evoke_teleport_other(),
            Ability::Swapping => self.evoke_swapping(),
            Ability::Obstruction => self.evoke_obstruction(),
            Ability::Lignification => self.evoke_lignification(),
            Ability::Energy => self.evoke_energy(),
            Ability::Transparency => self.gain(
                Status::Transparent,
                c.transparency_duration,
                "transparent",
                "Light makes you diaphanous.",
            ),
            Ability::Disguise => self.gain(
                Status::Disguised,
                c.disguise_duration,
                "disguised",
                "You look now like a normal guard.",
            ),
            Ability::DelayedNoise => {
                self.evoke_delayed(DelayedEffect::HarmonicNoise, c.delayed_noise_timer)
            }
            Ability::Dispersal => self.gain(
                Status::Dispersal,
                c.dispersal_duration,
                "dispersing",
                "You feel unstable.",
            ),
            Ability::OricExplosion => {
                self.evoke_delayed(DelayedEffect::OricExplosion, c.oric_explosion_timer)
            }
            Ability::MagicMapping => self.evoke_magic_mapping(),
        }?;
        self.player.mp -= needed;
        debug!(%ability, mp = self.player.mp, "ability evoked");
        Ok(())
    }

    /// Start a player status, or fail if it is already running.
    fn gain(
        &mut self,
        status: Status,
        duration: u64,
        effect: &'static str,
        text: &'static str,
    ) -> Result<(), CommandError> {
        if !self
            .statuses
            .put(&mut self.queue, Actor::Player, status, duration)
        {
            return Err(CommandError::AlreadyActive { effect });
        }
        self.notify(Notice::message(text));
        Ok(())
    }

    /// Monsters the player sees, in spawn order. With `cardinal`, only
    /// those sharing a row or column with the player.
    fn monsters_in_view(&self, cardinal: bool) -> Vec<MonsterId> {
        let player = self.player.pos;
        self.roster
            .iter()
            .filter(|m| self.player_sees(m.pos) && (!cardinal || m.pos.is_aligned(player)))
            .map(|m| m.id)
            .collect()
    }

    // ── Movement ────────────────────────────────────────────────

    fn evoke_blink(&mut self) -> Result<(), CommandError> {
        if self.player_has(Status::Lignification) {
            return Err(CommandError::Incapacitated {
                reason: "blink while lignified",
            });
        }
        if self.blink() {
            Ok(())
        } else {
            Err(no_targets("You could not blink."))
        }
    }

    /// Move the player to a random visible cell, keeping the farthest of
    /// a few draws. Returns `false`, changing nothing, when lignified or
    /// when no visible cell is free.
    pub(crate) fn blink(&mut self) -> bool {
        if self.player_has(Status::Lignification) {
            return false;
        }
        let from = self.player.pos;
        let cells: Vec<Pos> = self
            .vision
            .visible_set(&self.dungeon, from)
            .into_iter()
            .filter(|&p| self.dungeon.is_passable(p) && !self.roster.occupied(p))
            .collect();
        let Some(mut to) = self.pick(&cells) else {
            return false;
        };
        for _ in 0..self.config.blink_samples {
            if let Some(p) = self.pick(&cells) {
                if p.distance(from) > to.distance(from) {
                    to = p;
                }
            }
        }
        self.player.pos = to;
        if to == from {
            self.notify(Notice::message("You blink in-place."));
        } else {
            self.notify(Notice::message("You blink away."));
        }
        self.notify(Notice::Teleport { from, to });
        true
    }

    fn evoke_teleport(&mut self) -> Result<(), CommandError> {
        if self.player_has(Status::Lignification) {
            return Err(CommandError::Incapacitated {
                reason: "teleport while lignified",
            });
        }
        if self.teleport_player() {
            Ok(())
        } else {
            Err(no_targets("You could not teleport."))
        }
    }

    fn has_free_cell(&self) -> bool {
        self.dungeon
            .passable_cells()
            .into_iter()
            .any(|p| self.is_free(p))
    }

    /// A free cell beyond sight range of `from`, or any free cell when
    /// the level is too small.
    fn teleport_target(&mut self, from: Pos) -> Option<Pos> {
        let range = self.config.los_range;
        let cells: Vec<Pos> = self
            .dungeon
            .passable_cells()
            .into_iter()
            .filter(|&p| self.is_free(p))
            .collect();
        let far: Vec<Pos> = cells
            .iter()
            .copied()
            .filter(|p| p.distance(from) > range)
            .collect();
        if far.is_empty() {
            self.pick(&cells)
        } else {
            self.pick(&far)
        }
    }

    fn teleport_player(&mut self) -> bool {
        let from = self.player.pos;
        let Some(to) = self.teleport_target(from) else {
            return false;
        };
        self.player.pos = to;
        self.notify(Notice::message("You teleport away."));
        self.notify(Notice::Teleport { from, to });
        true
    }

    fn teleport_monster(&mut self, id: MonsterId) {
        let player = self.player.pos;
        let Some(to) = self.teleport_target(player) else {
            return;
        };
        let Some(m) = self.roster.get_mut(id) else {
            return;
        };
        let from = m.pos;
        m.pos = to;
        let text = format!("{} teleports away.", m.definite());
        self.notify(Notice::Message(text));
        self.notify(Notice::Teleport { from, to });
    }

    fn evoke_teleport_other(&mut self) -> Result<(), CommandError> {
        let mut targets = self.monsters_in_view(true);
        if targets.is_empty() {
            return Err(no_targets("There are no targetable monsters."));
        }
        if !self.has_free_cell() {
            return Err(no_targets("There is nowhere to send them."));
        }
        shuffle(self.rng.as_mut(), &mut targets);
        targets.truncate(self.config.teleport_other_targets);
        for id in targets {
            let Some(m) = self.roster.get_mut(id) else {
                continue;
            };
            m.mark_search();
            let kind = m.kind;
            self.teleport_monster(id);
            if kind.reflects_teleport() {
                self.notify(Notice::Message(format!(
                    "The {kind} reflected back some energies."
                )));
                self.teleport_player();
                break;
            }
        }
        Ok(())
    }

    fn evoke_swapping(&mut self) -> Result<(), CommandError> {
        const NONE: &str = "No monsters suitable for swapping in view.";
        if self.player_has(Status::Lignification) {
            return Err(CommandError::Incapacitated {
                reason: "swap while lignified",
            });
        }
        let mut eligible: Vec<MonsterId> = self
            .monsters_in_view(false)
            .into_iter()
            .filter(|&id| !self.monster_has(id, Status::Lignified))
            .collect();
        if eligible.is_empty() {
            return Err(no_targets(NONE));
        }
        shuffle(self.rng.as_mut(), &mut eligible);

        // Farthest of a bounded sample, first found wins ties.
        let player = self.player.pos;
        let roster = &self.roster;
        let distance = |id| roster.get(id).map_or(0, |m| m.pos.distance(player));
        let n = u32::try_from(eligible.len()).unwrap_or(u32::MAX);
        let mut best = eligible[0];
        let mut best_distance = distance(best);
        for _ in 0..self.config.swap_samples {
            let Some(&id) = eligible.get(self.rng.rand_int(n) as usize) else {
                continue;
            };
            let d = distance(id);
            if d > best_distance {
                best = id;
                best_distance = d;
            }
        }

        let Some(m) = self.roster.get_mut(best) else {
            return Err(no_targets(NONE));
        };
        let from = m.pos;
        if m.kind.can_open_doors() {
            m.search = Some(from);
        }
        m.pos = player;
        m.rest = None;
        m.state = MonsterState::Hunting;
        m.target = Some(from);
        let text = format!("You swap positions with the {}.", m.kind);
        self.player.pos = from;
        self.notify(Notice::Swap {
            player,
            monster: from,
        });
        self.notify(Notice::Message(text));
        Ok(())
    }

    // ── Terrain ─────────────────────────────────────────────────

    fn evoke_fire(&mut self) -> Result<(), CommandError> {
        let cells = self.dungeon.flammable_neighbours(self.player.pos);
        if cells.is_empty() {
            return Err(no_targets(
                "You are not surrounded by any flammable terrain.",
            ));
        }
        self.notify(Notice::message("Sparks emanate from the magara."));
        for pos in cells {
            self.ignite(pos);
        }
        Ok(())
    }

    fn evoke_fog(&mut self) -> Result<(), CommandError> {
        let map = DistanceMap::compute(
            &NoisePath::new(&self.dungeon, self.config.noise_wall_cost),
            &[self.player.pos],
            self.config.fog_radius,
        );
        self.metrics.distance_maps += 1;
        for (pos, _) in map.iter() {
            let fits = self.overlays.kind_at(pos).is_none()
                && self.dungeon.terrain(pos).is_some_and(TerrainKind::allows_fog);
            if !fits {
                continue;
            }
            let duration = self.jittered(self.config.fog_duration);
            self.overlays.place(
                &mut self.dungeon,
                &mut self.queue,
                pos,
                OverlayKind::Fog,
                duration,
            );
        }
        self.notify(Notice::message("You are surrounded by a dense fog."));
        Ok(())
    }

    fn evoke_obstruction(&mut self) -> Result<(), CommandError> {
        let player = self.player.pos;
        let mut cells: Vec<Pos> = Vec::new();
        let mut beams = Vec::new();
        for m in self.roster.iter() {
            if !self.player_sees(m.pos) {
                continue;
            }
            let ray = Grid::ray(m.pos, player);
            for (i, &p) in ray.iter().enumerate().skip(1) {
                if p == player {
                    break;
                }
                if self.roster.occupied(p) {
                    continue;
                }
                let solid = matches!(
                    self.dungeon.terrain(p),
                    Some(TerrainKind::Wall | TerrainKind::Barrier)
                );
                if !solid && !cells.contains(&p) {
                    cells.push(p);
                }
                beams.extend_from_slice(&ray[i..]);
                break;
            }
        }
        if cells.is_empty() {
            return Err(no_targets("No targetable monsters in view."));
        }
        for pos in cells {
            let duration = self.jittered(self.config.barrier_duration);
            self.overlays.place(
                &mut self.dungeon,
                &mut self.queue,
                pos,
                OverlayKind::Barrier,
                duration,
            );
        }
        self.notify(Notice::Beams(beams));
        self.notify(Notice::message("Magical barriers emerged."));
        Ok(())
    }

    fn evoke_magic_mapping(&mut self) -> Result<(), CommandError> {
        let player = self.player.pos;
        let bands = self.explore.get_or_compute(&self.dungeon, &[player]).bands();
        for (_, cells) in bands {
            let mut revealed = Vec::new();
            for pos in cells {
                let known =
                    self.dungeon.is_passable(pos) || self.dungeon.has_passable_neighbour(pos);
                if known && self.dungeon.set_explored(pos) {
                    revealed.push(pos);
                }
            }
            if !revealed.is_empty() {
                self.notify(Notice::Reveal(revealed));
            }
        }
        self.notify(Notice::message("You feel aware of your surroundings."));
        Ok(())
    }

    // ── Stealth and sound ───────────────────────────────────────

    fn evoke_shadows(&mut self) -> Result<(), CommandError> {
        if self.player_has(Status::Illuminated) {
            return Err(CommandError::Incapacitated {
                reason: "surround yourself by shadows while illuminated",
            });
        }
        self.gain(
            Status::Shadows,
            self.config.shadows_duration,
            "surrounded by shadows",
            "You are surrounded by shadows.",
        )
    }

    fn evoke_noise(&mut self) -> Result<(), CommandError> {
        let marks = self.noise_illusion();
        self.notify(Notice::NoiseMarks(marks));
        self.notify(Notice::message("Monsters are tricked by magical sounds."));
        Ok(())
    }

    fn evoke_delayed(&mut self, effect: DelayedEffect, timer: u32) -> Result<(), CommandError> {
        let gate = (u64::from(timer) + 1).saturating_mul(self.config.turn);
        if !self
            .statuses
            .put_fake(&mut self.queue, Actor::Player, Status::Delay, gate)
        {
            return Err(CommandError::AlreadyActive {
                effect: "using delayed magic",
            });
        }
        self.start_countdown(effect, timer);
        self.notify(Notice::message("Timer activated."));
        Ok(())
    }

    // ── Monster statuses ────────────────────────────────────────

    /// Apply `status` to every monster in view that lacks it.
    fn wave(&mut self, status: Status, duration: u64, text: &'static str) -> Result<(), CommandError> {
        let targets: Vec<MonsterId> = self
            .monsters_in_view(false)
            .into_iter()
            .filter(|&id| !self.monster_has(id, status))
            .collect();
        if targets.is_empty() {
            return Err(no_targets("No suitable targets in view."));
        }
        for id in targets {
            self.statuses
                .put(&mut self.queue, Actor::Monster(id), status, duration);
            if let Some(m) = self.roster.get_mut(id) {
                m.mark_search();
            }
        }
        self.notify(Notice::message(text));
        Ok(())
    }

    fn evoke_sleeping(&mut self) -> Result<(), CommandError> {
        let in_line = self.monsters_in_view(true);
        if in_line.is_empty() {
            return Err(no_targets("There are no targetable monsters."));
        }
        let mut targets: Vec<MonsterId> = in_line
            .into_iter()
            .filter(|&id| {
                self.roster
                    .get(id)
                    .is_some_and(|m| m.state != MonsterState::Resting)
            })
            .collect();
        if targets.is_empty() {
            return Err(no_targets("There are no suitable targets."));
        }
        shuffle(self.rng.as_mut(), &mut targets);
        targets.truncate(self.config.sleep_targets);
        let mut beams = Vec::new();
        for &id in &targets {
            let Some(pos) = self.roster.get(id).map(|m| m.pos) else {
                continue;
            };
            let rest = self.exhaustion();
            self.force_rest(id, rest);
            beams.extend(Grid::ray(self.player.pos, pos));
        }
        self.notify(Notice::Beams(beams));
        self.notify(Notice::message(if targets.len() == 1 {
            "A beam of sleeping emerges."
        } else {
            "Beams of sleeping emerge."
        }));
        Ok(())
    }

    fn evoke_lignification(&mut self) -> Result<(), CommandError> {
        let in_view = self.monsters_in_view(false);
        if in_view.is_empty() {
            return Err(no_targets("There are no monsters in view."));
        }
        let mut targets: Vec<MonsterId> = in_view
            .into_iter()
            .filter(|&id| {
                !self.monster_has(id, Status::Lignified)
                    && self
                        .roster
                        .get(id)
                        .is_some_and(|m| !m.kind.resists_lignification())
            })
            .collect();
        if targets.is_empty() {
            return Err(no_targets("There are no suitable targets."));
        }
        shuffle(self.rng.as_mut(), &mut targets);
        targets.truncate(self.config.lignify_targets);
        let duration = self.config.lignification_duration;
        let mut beams = Vec::new();
        for &id in &targets {
            self.statuses
                .put(&mut self.queue, Actor::Monster(id), Status::Lignified, duration);
            if let Some(m) = self.roster.get_mut(id) {
                m.mark_search();
                beams.extend(Grid::ray(self.player.pos, m.pos));
            }
        }
        self.notify(Notice::Beams(beams));
        self.notify(Notice::message(if targets.len() == 1 {
            "A beam of lignification emerges."
        } else {
            "Beams of lignification emerge."
        }));
        Ok(())
    }

    fn evoke_energy(&mut self) -> Result<(), CommandError> {
        let p = &mut self.player;
        if p.mp == p.mp_max && p.hp == p.hp_max {
            return Err(CommandError::Redundant {
                reason: "You are already full of energy.",
            });
        }
        p.mp = p.mp_max;
        p.hp = p.hp_max;
        self.notify(Notice::message("The magara glows."));
        Ok(())
    }
}
