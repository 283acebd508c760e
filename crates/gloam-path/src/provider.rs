//! The [`PathProvider`] trait: a pluggable cost model.
//!
//! A provider answers two questions about the grid: which cells can be
//! stepped into from a given cell, and what that step costs. The
//! distance-map engine knows nothing else about terrain, so movement,
//! sound propagation and exploration ordering all share one search.

use gloam_core::Pos;
use smallvec::SmallVec;

/// Traversal rules for one purpose.
///
/// # Contract
///
/// - `neighbours()` MUST be deterministic and enumerate cells in a fixed
///   order; tie-breaking in the search follows that order.
/// - `cost()` is only called for `(from, to)` pairs where `to` was
///   returned by `neighbours(from)`.
/// - Costs are non-negative by construction. A cost of 0 is legal but
///   makes every cell reached that way as cheap as its predecessor.
///
/// # Object safety
///
/// This trait is object-safe; the engine passes providers as
/// `&dyn PathProvider`.
///
/// # Examples
///
/// A provider over an unbounded open plane:
///
/// ```
/// use gloam_core::Pos;
/// use gloam_path::{DistanceMap, PathProvider};
/// use smallvec::SmallVec;
///
/// struct Plane;
///
/// impl PathProvider for Plane {
///     fn name(&self) -> &str { "plane" }
///
///     fn neighbours(&self, pos: Pos) -> SmallVec<[Pos; 4]> {
///         pos.cardinal().into_iter().collect()
///     }
///
///     fn cost(&self, _from: Pos, _to: Pos) -> u32 { 1 }
/// }
///
/// let map = DistanceMap::compute(&Plane, &[Pos::new(0, 0)], 1);
/// assert_eq!(map.len(), 5);
/// ```
pub trait PathProvider {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Cells that may be entered from `pos`.
    fn neighbours(&self, pos: Pos) -> SmallVec<[Pos; 4]>;

    /// Incremental cost of stepping from `from` into `to`.
    fn cost(&self, from: Pos, to: Pos) -> u32;
}
