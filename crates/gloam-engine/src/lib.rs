//! Turn-based simulation engine for Gloam dungeons.
//!
//! [`Simulation`] owns a level, an event queue ranked by tick, per-actor
//! status tables, terrain overlays, a monster roster and the player.
//! Everything that happens later than "now" is an [`Event`] in the
//! [`EventQueue`]; events are never removed early. Instead each carries a
//! generation stamp and its handler re-validates against the owning
//! table when it fires, absorbing stale and orphaned events as no-ops.
//!
//! # Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`queue`], [`event`] | Ranked FIFO scheduler and the closed action set |
//! | [`status`] | Expiring statuses with a generation guard |
//! | [`overlay`] | Temporary terrain (fog, barriers, fire, night clouds) |
//! | [`monster`], [`ai`] | Roster and the Wandering/Hunting/Resting machine |
//! | [`abilities`] | Player command handlers |
//! | [`sim`] | The simulation context and its turn protocol |
//! | [`config`], [`metrics`], [`trace`] | Tunables, counters, replay digest |
//! | [`rng`], [`vision`] | Default random source and line of sight |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod abilities;
pub mod ai;
pub mod config;
pub mod event;
pub mod metrics;
pub mod monster;
pub mod overlay;
pub mod queue;
pub mod rng;
pub mod sim;
pub mod status;
pub mod trace;
pub mod vision;

pub use abilities::Ability;
pub use config::{ConfigError, PlacementError, SimConfig};
pub use event::{Action, DelayedEffect, Event};
pub use metrics::DrainMetrics;
pub use monster::{Monster, MonsterKind, MonsterState, Roster};
pub use overlay::{OverlayKind, OverlayTable, Placement, Removal};
pub use queue::EventQueue;
pub use rng::SeededRng;
pub use sim::{Command, Player, Simulation};
pub use status::{Actor, Expiry, Status, StatusTable};
pub use trace::EventTrace;
pub use vision::LineOfSight;
