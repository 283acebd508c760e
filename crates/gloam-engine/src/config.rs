//! Simulation configuration, validation, and error types.
//!
//! [`SimConfig`] holds every duration, radius and limit the simulation
//! reads. [`validate()`](SimConfig::validate) checks structural
//! invariants; [`Simulation::new`](crate::Simulation::new) calls it and
//! refuses to build a simulation from a bad configuration.

use std::error::Error;
use std::fmt;

use gloam_core::{Pos, TerrainKind};

// ── PlacementError ─────────────────────────────────────────────────

/// An actor could not be put on the requested cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlacementError {
    /// The cell lies outside the level.
    OutOfBounds {
        /// The requested cell.
        pos: Pos,
    },
    /// The cell's terrain cannot be stood on.
    Impassable {
        /// The requested cell.
        pos: Pos,
        /// Its terrain.
        terrain: TerrainKind,
    },
    /// Another actor already stands there.
    Occupied {
        /// The requested cell.
        pos: Pos,
    },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { pos } => write!(f, "{pos} is outside the level"),
            Self::Impassable { pos, terrain } => write!(f, "{pos} is {terrain}"),
            Self::Occupied { pos } => write!(f, "{pos} is occupied"),
        }
    }
}

impl Error for PlacementError {}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building a simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A duration that schedules events was zero.
    ZeroDuration {
        /// Which setting.
        name: &'static str,
    },
    /// A count or radius that must be positive was zero.
    ZeroLimit {
        /// Which setting.
        name: &'static str,
    },
    /// `fire_spread_odds` was zero.
    InvalidSpreadOdds,
    /// The player start cell is illegal.
    PlayerStart(PlacementError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDuration { name } => write!(f, "{name} must be at least 1 tick"),
            Self::ZeroLimit { name } => write!(f, "{name} must be at least 1"),
            Self::InvalidSpreadOdds => write!(f, "fire_spread_odds must be at least 1"),
            Self::PlayerStart(e) => write!(f, "player start: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PlayerStart(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PlacementError> for ConfigError {
    fn from(e: PlacementError) -> Self {
        Self::PlayerStart(e)
    }
}

// ── SimConfig ──────────────────────────────────────────────────────

/// Every tunable of the simulation.
///
/// Durations are in ticks. Overlay durations are jittered at creation:
/// an overlay of nominal duration `d` lasts `d + rand(d / 2)` ticks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimConfig {
    /// Seed for the default ChaCha8 random source.
    pub seed: u64,
    /// Length of one player turn. Default: 1.
    pub turn: u64,
    /// Sight range, also the noise threshold for monster alerting. Default: 12.
    pub los_range: u32,
    /// Radius of the sound map used by the noise illusion. Default: 23.
    pub noise_illusion_radius: u32,
    /// Cost of sound passing into a wall or barrier cell. Default: 4.
    pub noise_wall_cost: u32,
    /// Radius of the fog cloud. Default: 3.
    pub fog_radius: u32,
    /// Nominal fog duration. Default: 15.
    pub fog_duration: u64,
    /// Nominal barrier duration. Default: 15.
    pub barrier_duration: u64,
    /// Nominal burn duration before fire consumes its cell. Default: 4.
    pub fire_duration: u64,
    /// Nominal duration of the smoke left by fire. Default: 10.
    pub night_cloud_duration: u64,
    /// Fire spreads to each flammable neighbour with probability
    /// `1 / fire_spread_odds`. Default: 2.
    pub fire_spread_odds: u32,
    /// Monster confusion. Default: 12.
    pub confusion_duration: u64,
    /// Monster paralysis. Default: 10.
    pub paralysis_duration: u64,
    /// Monster lignification. Default: 15.
    pub lignification_duration: u64,
    /// Player shadows. Default: 15.
    pub shadows_duration: u64,
    /// Player digging. Default: 8.
    pub digging_duration: u64,
    /// Player swiftness. Default: 5.
    pub swiftness_duration: u64,
    /// Player levitation. Default: 15.
    pub levitation_duration: u64,
    /// Player transparency. Default: 15.
    pub transparency_duration: u64,
    /// Player disguise. Default: 15.
    pub disguise_duration: u64,
    /// Player dispersal. Default: 12.
    pub dispersal_duration: u64,
    /// Turns before a delayed harmonic noise goes off. Default: 7.
    pub delayed_noise_timer: u32,
    /// Turns before an oric explosion goes off. Default: 7.
    pub oric_explosion_timer: u32,
    /// Radius of walls destroyed by an oric explosion. Default: 2.
    pub oric_explosion_radius: u32,
    /// Base length of forced sleep. Default: 4.
    pub sleep_exhaustion: u64,
    /// Extra sleep drawn from `[0, jitter)`. Default: 2.
    pub sleep_exhaustion_jitter: u32,
    /// Monsters put to sleep at most. Default: 3.
    pub sleep_targets: usize,
    /// Monsters teleported away at most. Default: 2.
    pub teleport_other_targets: usize,
    /// Monsters lignified at most. Default: 2.
    pub lignify_targets: usize,
    /// Extra samples drawn when choosing the swap target. Default: 5.
    pub swap_samples: usize,
    /// Extra samples drawn when choosing the blink destination. Default: 4.
    pub blink_samples: usize,
    /// Cost bound of a monster's movement map. Default: 60.
    pub monster_path_radius: u32,
    /// Player hit points. Default: 4.
    pub player_hp: u32,
    /// Player magic points. Default: 5.
    pub player_mp: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            turn: 1,
            los_range: 12,
            noise_illusion_radius: 23,
            noise_wall_cost: 4,
            fog_radius: 3,
            fog_duration: 15,
            barrier_duration: 15,
            fire_duration: 4,
            night_cloud_duration: 10,
            fire_spread_odds: 2,
            confusion_duration: 12,
            paralysis_duration: 10,
            lignification_duration: 15,
            shadows_duration: 15,
            digging_duration: 8,
            swiftness_duration: 5,
            levitation_duration: 15,
            transparency_duration: 15,
            disguise_duration: 15,
            dispersal_duration: 12,
            delayed_noise_timer: 7,
            oric_explosion_timer: 7,
            oric_explosion_radius: 2,
            sleep_exhaustion: 4,
            sleep_exhaustion_jitter: 2,
            sleep_targets: 3,
            teleport_other_targets: 2,
            lignify_targets: 2,
            swap_samples: 5,
            blink_samples: 4,
            monster_path_radius: 60,
            player_hp: 4,
            player_mp: 5,
        }
    }
}

impl SimConfig {
    /// Default configuration with the given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Check every invariant.
    ///
    /// Durations that schedule events must be positive: a zero-length
    /// turn would let the player heartbeat renew at the same rank
    /// forever.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("turn", self.turn),
            ("fog_duration", self.fog_duration),
            ("barrier_duration", self.barrier_duration),
            ("fire_duration", self.fire_duration),
            ("night_cloud_duration", self.night_cloud_duration),
            ("confusion_duration", self.confusion_duration),
            ("paralysis_duration", self.paralysis_duration),
            ("lignification_duration", self.lignification_duration),
            ("shadows_duration", self.shadows_duration),
            ("digging_duration", self.digging_duration),
            ("swiftness_duration", self.swiftness_duration),
            ("levitation_duration", self.levitation_duration),
            ("transparency_duration", self.transparency_duration),
            ("disguise_duration", self.disguise_duration),
            ("dispersal_duration", self.dispersal_duration),
            ("sleep_exhaustion", self.sleep_exhaustion),
        ];
        for (name, value) in durations {
            if value == 0 {
                return Err(ConfigError::ZeroDuration { name });
            }
        }
        let limits = [
            ("los_range", self.los_range as usize),
            ("noise_wall_cost", self.noise_wall_cost as usize),
            ("delayed_noise_timer", self.delayed_noise_timer as usize),
            ("oric_explosion_timer", self.oric_explosion_timer as usize),
            ("sleep_targets", self.sleep_targets),
            ("teleport_other_targets", self.teleport_other_targets),
            ("lignify_targets", self.lignify_targets),
            ("monster_path_radius", self.monster_path_radius as usize),
            ("player_hp", self.player_hp as usize),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(ConfigError::ZeroLimit { name });
            }
        }
        if self.fire_spread_odds == 0 {
            return Err(ConfigError::InvalidSpreadOdds);
        }
        Ok(())
    }
}
