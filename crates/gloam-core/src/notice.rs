//! User-facing notifications emitted by command and event handlers.

use crate::pos::Pos;

/// Something the front end may want to show.
///
/// The scheduler and the pathfinder never depend on a notice being
/// delivered; a sink that drops everything is a valid sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// A log line.
    Message(String),
    /// Beams drawn from the player towards the given cells.
    Beams(Vec<Pos>),
    /// Illusory noise sources placed by the noise ability.
    NoiseMarks(Vec<Pos>),
    /// One band of cells revealed together; bands arrive in increasing
    /// distance order.
    Reveal(Vec<Pos>),
    /// An actor moved instantly from one cell to another.
    Teleport {
        /// Origin cell.
        from: Pos,
        /// Destination cell.
        to: Pos,
    },
    /// The player and a monster exchanged cells.
    Swap {
        /// Player's cell before the swap.
        player: Pos,
        /// Monster's cell before the swap.
        monster: Pos,
    },
}

impl Notice {
    /// Convenience constructor for [`Notice::Message`].
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message(text.into())
    }

    /// The text of a [`Notice::Message`], if this is one.
    pub fn as_message(&self) -> Option<&str> {
        match self {
            Self::Message(text) => Some(text),
            _ => None,
        }
    }
}
