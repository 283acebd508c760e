//! Error types shared across the Gloam workspace.
//!
//! Only rejected player commands are errors. Stale events, events for
//! removed monsters and overlays reverted by other means are expected
//! outcomes of the validate-on-fire scheduling model and are absorbed by
//! the engine without ever surfacing here.

use std::error::Error;
use std::fmt;

use crate::pos::Pos;

/// A player command that was rejected before any state changed.
///
/// Every variant renders as a user-facing sentence; the front end may
/// show `to_string()` verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandError {
    /// The effect the command would start is already running.
    AlreadyActive {
        /// Present participle describing the running effect
        /// ("digging", "surrounded by shadows").
        effect: &'static str,
    },
    /// A status on the player forbids the command.
    Incapacitated {
        /// What the player cannot do, and why.
        reason: &'static str,
    },
    /// The player lacks the magic points the command costs.
    InsufficientMagic {
        /// Points the command costs.
        needed: u32,
        /// Points the player has.
        available: u32,
    },
    /// No legal target exists for a targeted ability.
    NoTargets {
        /// Sentence explaining which targets were missing.
        reason: &'static str,
    },
    /// The destination cell of a move cannot be entered.
    Blocked {
        /// The refused destination.
        pos: Pos,
    },
    /// The command would have no effect.
    Redundant {
        /// Sentence explaining why.
        reason: &'static str,
    },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyActive { effect } => write!(f, "You are already {effect}."),
            Self::Incapacitated { reason } => write!(f, "You cannot {reason}."),
            Self::InsufficientMagic { needed, available } => write!(
                f,
                "Not enough magic points ({available} available, {needed} needed)."
            ),
            Self::NoTargets { reason } | Self::Redundant { reason } => f.write_str(reason),
            Self::Blocked { pos } => write!(f, "You cannot move to {pos}."),
        }
    }
}

impl Error for CommandError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_sentences() {
        let e = CommandError::AlreadyActive { effect: "digging" };
        assert_eq!(e.to_string(), "You are already digging.");
        let e = CommandError::Incapacitated {
            reason: "blink while lignified",
        };
        assert_eq!(e.to_string(), "You cannot blink while lignified.");
        let e = CommandError::InsufficientMagic {
            needed: 1,
            available: 0,
        };
        assert_eq!(
            e.to_string(),
            "Not enough magic points (0 available, 1 needed)."
        );
        let e = CommandError::Blocked {
            pos: Pos::new(1, 2),
        };
        assert_eq!(e.to_string(), "You cannot move to (1, 2).");
    }
}
