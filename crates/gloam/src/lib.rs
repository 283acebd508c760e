//! Gloam: a turn-based dungeon simulation core.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Gloam sub-crates. For most users, adding `gloam` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use gloam::prelude::*;
//!
//! let level = Dungeon::parse(concat!(
//!     "#######\n",
//!     "#.....#\n",
//!     "#.....#\n",
//!     "#######",
//! ))
//! .unwrap();
//! let mut sim = Simulation::new(SimConfig::seeded(7), level, Pos::new(1, 1)).unwrap();
//! let guard = sim.spawn_monster(MonsterKind::Guard, Pos::new(5, 2)).unwrap();
//!
//! assert_eq!(sim.act(Command::Evoke(Ability::Shadows)), Ok(Tick(1)));
//! assert!(sim.has_status(Actor::Player, Status::Shadows));
//! assert!(sim.monster(guard).is_some());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `gloam-core` | Positions, terrain, IDs, notices, collaborator traits |
//! | [`space`] | `gloam-space` | Grid geometry and the dungeon terrain store |
//! | [`path`] | `gloam-path` | Cost models, distance maps, the exploration cache |
//! | [`engine`] | `gloam-engine` | Scheduler, statuses, overlays, monsters, abilities |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and collaborator traits (`gloam-core`).
///
/// Contains [`types::Pos`], [`types::TerrainKind`], [`types::Notice`],
/// [`types::CommandError`] and the seams a host implements
/// ([`types::GridOracle`], [`types::VisibilityOracle`],
/// [`types::RandomSource`], [`types::NotificationSink`]).
pub use gloam_core as types;

/// Grid geometry and terrain storage (`gloam-space`).
pub use gloam_space as space;

/// Distance maps and cost models (`gloam-path`).
///
/// [`path::DistanceMap::compute`] runs a bounded multi-source Dijkstra over
/// any [`path::PathProvider`].
pub use gloam_path as path;

/// The simulation engine (`gloam-engine`).
///
/// [`engine::Simulation`] is the entry point; everything else hangs off it.
pub use gloam_engine as engine;

/// Common imports for typical Gloam usage.
///
/// ```rust
/// use gloam::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use gloam_core::{
        Dir, GridOracle, MonsterId, Notice, NotificationSink, Pos, RandomSource, TerrainKind,
        Tick, VisibilityOracle,
    };

    // Errors
    pub use gloam_core::CommandError;
    pub use gloam_engine::{ConfigError, PlacementError};
    pub use gloam_space::SpaceError;

    // Space
    pub use gloam_space::{Dungeon, Grid};

    // Paths
    pub use gloam_path::{DistanceMap, PathProvider};

    // Engine
    pub use gloam_engine::{
        Ability, Actor, Command, DrainMetrics, MonsterKind, MonsterState, SimConfig, Simulation,
        Status,
    };
}
