//! Scheduled events.
//!
//! An [`Event`] pairs a rank (the tick at which it fires) with an
//! [`Action`]. Actions are a closed sum type matched exhaustively by the
//! simulation; each variant carries only the payload its handler needs.
//! Every variant that can outlive the state it refers to carries either
//! a stable [`MonsterId`] or a [`Generation`] stamp, so a late firing can
//! be recognised and absorbed.

use std::fmt;

use gloam_core::{Generation, MonsterId, Pos, Tick};

use crate::status::{Actor, Status};

/// A multi-stage effect counting down on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DelayedEffect {
    /// A loud noise that draws monsters to the spot.
    HarmonicNoise,
    /// An explosion that turns nearby walls to rubble.
    OricExplosion,
}

impl fmt::Display for DelayedEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::HarmonicNoise => "harmonic noise",
            Self::OricExplosion => "oric explosion",
        })
    }
}

/// What happens when an event fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// The player's self-renewing heartbeat. Popping it parks the
    /// simulation until the next command.
    PlayerTurn,
    /// One AI step of a monster. Renewed by the monster's move delay.
    MonsterTurn {
        /// The acting monster.
        monster: MonsterId,
    },
    /// A status reaches its scheduled expiry.
    StatusEnd {
        /// Who carries the status.
        actor: Actor,
        /// Which status.
        status: Status,
        /// Stamp of the activation this event was scheduled for.
        generation: Generation,
    },
    /// A forced rest ends.
    MonsterWake {
        /// The sleeping monster.
        monster: MonsterId,
        /// Stamp of the rest this event was scheduled for.
        generation: Generation,
    },
    /// A terrain overlay is due for removal.
    OverlayEnd {
        /// The overlaid cell.
        pos: Pos,
        /// Stamp of the overlay this event was scheduled for.
        generation: Generation,
    },
    /// One countdown step of a delayed effect.
    Delayed {
        /// Where the effect goes off.
        pos: Pos,
        /// Which effect.
        effect: DelayedEffect,
        /// Turns remaining; the effect triggers when a step finds 0.
        timer: u32,
        /// Level the countdown was started on.
        generation: Generation,
    },
}

impl Action {
    /// Short stable tag, used in logs and the event trace digest.
    pub fn tag(&self) -> u8 {
        match self {
            Self::PlayerTurn => 0,
            Self::MonsterTurn { .. } => 1,
            Self::StatusEnd { .. } => 2,
            Self::MonsterWake { .. } => 3,
            Self::OverlayEnd { .. } => 4,
            Self::Delayed { .. } => 5,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayerTurn => write!(f, "player-turn"),
            Self::MonsterTurn { monster } => write!(f, "monster-turn {monster}"),
            Self::StatusEnd {
                actor,
                status,
                generation,
            } => write!(f, "status-end {actor} {status:?} {generation}"),
            Self::MonsterWake {
                monster,
                generation,
            } => write!(f, "monster-wake {monster} {generation}"),
            Self::OverlayEnd { pos, generation } => {
                write!(f, "overlay-end {pos} {generation}")
            }
            Self::Delayed {
                pos, effect, timer, ..
            } => write!(f, "delayed {effect} at {pos} t-{timer}"),
        }
    }
}

/// A queued action with its firing rank.
///
/// Events are owned by the [`EventQueue`](crate::EventQueue) until popped;
/// popping transfers ownership to the caller, which either drops the
/// event or hands it back through [`renew`](crate::EventQueue::renew).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event {
    /// Tick at which the event fires.
    pub rank: Tick,
    /// Insertion sequence; breaks ties between equal ranks.
    pub seq: u64,
    /// What to do.
    pub action: Action,
}
