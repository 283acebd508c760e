//! Grid geometry and terrain storage for Gloam simulations.
//!
//! This crate provides the [`Grid`] geometry (bounds, 4-connected
//! neighbours, Manhattan distance, Bresenham rays) and [`Dungeon`], the
//! concrete [`GridOracle`](gloam_core::GridOracle) the engine mutates
//! when overlays come and go, fires burn and walls are blasted.
//!
//! # Adjacency
//!
//! Cells are 4-connected. On an open 5×5 grid, the cells within
//! distance 2 of the centre form a diamond of exactly 13 cells.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dungeon;
pub mod error;
pub mod grid;

pub use dungeon::{Cell, Dungeon};
pub use error::SpaceError;
pub use grid::Grid;
