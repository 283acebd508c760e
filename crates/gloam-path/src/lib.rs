//! Cost models and the distance-map engine for Gloam simulations.
//!
//! One search, many purposes: [`DistanceMap::compute`] is a bounded
//! multi-source Dijkstra whose only knowledge of the world comes from a
//! [`PathProvider`]. Swapping the provider turns the same search into
//! movement planning, fog spread, sound propagation or exploration
//! ordering.
//!
//! | Type | Role |
//! |------|------|
//! | [`PathProvider`] | Cost model trait |
//! | [`DistanceMap`] | Search result, cells in finalization order |
//! | [`NormalPath`], [`NoisePath`], [`ExplorePath`] | Stock models over a [`GridOracle`](gloam_core::GridOracle) |
//! | [`ExploreCache`] | Revision-checked cache for the exploration map |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod dijkstra;
pub mod models;
pub mod provider;

pub use cache::ExploreCache;
pub use dijkstra::{DistanceMap, Node};
pub use models::{ExplorePath, NoisePath, NormalPath};
pub use provider::PathProvider;
