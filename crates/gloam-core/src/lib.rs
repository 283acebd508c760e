//! Core types and traits for the Gloam dungeon simulation.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Gloam workspace:
//! simulation time, stable identifiers, grid positions, terrain kinds,
//! error types, and the traits through which the scheduler and the
//! pathfinder talk to their external collaborators.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod notice;
pub mod pos;
pub mod terrain;
pub mod traits;

pub use error::CommandError;
pub use id::{Generation, MonsterId, Tick};
pub use notice::Notice;
pub use pos::{Dir, Pos};
pub use terrain::TerrainKind;
pub use traits::{GridOracle, NotificationSink, NullSink, RandomSource, VisibilityOracle};
