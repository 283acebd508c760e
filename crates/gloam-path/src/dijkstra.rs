//! Bounded multi-source Dijkstra over a [`PathProvider`].

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use indexmap::IndexMap;
use tracing::trace;

use crate::provider::PathProvider;
use gloam_core::Pos;

/// One finalized cell of a [`DistanceMap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    /// Minimum cost from any source.
    pub cost: u32,
    /// The source that reached this cell first at that cost.
    pub source: Pos,
}

/// Cost-to-reach for every cell within a cost bound of a source set.
///
/// Cells are stored in finalization order, which is non-decreasing in
/// cost. Unreachable cells and cells costing more than the bound are
/// absent rather than present with an infinite cost.
#[derive(Clone, Debug, Default)]
pub struct DistanceMap {
    nodes: IndexMap<Pos, Node>,
    max_radius: u32,
}

/// Frontier entry: `(cost, seq)` is the priority, `seq` breaks exact
/// cost ties in push order.
type Frontier = BinaryHeap<Reverse<(u32, u64, Pos, Pos)>>;

impl DistanceMap {
    /// Run the search.
    ///
    /// Every source is seeded at cost 0, duplicates included once.
    /// Expansion stops once the cheapest frontier entry exceeds
    /// `max_radius`, so no cell with a true minimum cost above the bound
    /// is ever finalized. Ties are broken by push order: sources in the
    /// order given, neighbours in the provider's enumeration order.
    ///
    /// ```
    /// use gloam_core::{Pos, TerrainKind};
    /// use gloam_path::{DistanceMap, NormalPath};
    /// use gloam_space::Dungeon;
    ///
    /// let d = Dungeon::filled(5, 5, TerrainKind::Ground).unwrap();
    /// let map = DistanceMap::compute(&NormalPath::new(&d), &[Pos::new(2, 2)], 2);
    /// assert_eq!(map.len(), 13);
    /// ```
    pub fn compute(model: &dyn PathProvider, sources: &[Pos], max_radius: u32) -> Self {
        let mut nodes: IndexMap<Pos, Node> = IndexMap::new();
        let mut tentative: HashMap<Pos, u32> = HashMap::new();
        let mut frontier: Frontier = BinaryHeap::new();
        let mut seq = 0u64;

        for &src in sources {
            if tentative.insert(src, 0).is_none() {
                frontier.push(Reverse((0, seq, src, src)));
                seq += 1;
            }
        }

        while let Some(Reverse((cost, _, pos, source))) = frontier.pop() {
            if cost > max_radius {
                break;
            }
            if nodes.contains_key(&pos) {
                continue;
            }
            nodes.insert(pos, Node { cost, source });
            for nb in model.neighbours(pos) {
                if nodes.contains_key(&nb) {
                    continue;
                }
                let ncost = cost.saturating_add(model.cost(pos, nb));
                if ncost > max_radius {
                    continue;
                }
                let better = tentative.get(&nb).is_none_or(|&c| ncost < c);
                if better {
                    tentative.insert(nb, ncost);
                    frontier.push(Reverse((ncost, seq, nb, source)));
                    seq += 1;
                }
            }
        }

        trace!(
            model = model.name(),
            sources = sources.len(),
            max_radius,
            cells = nodes.len(),
            "distance map computed"
        );
        Self { nodes, max_radius }
    }

    /// The node at `pos`, if reached.
    pub fn at(&self, pos: Pos) -> Option<Node> {
        self.nodes.get(&pos).copied()
    }

    /// The cost at `pos`, if reached.
    pub fn cost(&self, pos: Pos) -> Option<u32> {
        self.nodes.get(&pos).map(|n| n.cost)
    }

    /// Whether `pos` was reached.
    pub fn contains(&self, pos: Pos) -> bool {
        self.nodes.contains_key(&pos)
    }

    /// Number of reached cells.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing was reached (only possible with no sources).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The cost bound the map was computed with.
    pub fn max_radius(&self) -> u32 {
        self.max_radius
    }

    /// Reached cells in finalization order.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, Node)> + '_ {
        self.nodes.iter().map(|(&p, &n)| (p, n))
    }

    /// Reached cells grouped by cost, ascending.
    ///
    /// Within a band, cells keep finalization order.
    pub fn bands(&self) -> Vec<(u32, Vec<Pos>)> {
        let mut out: Vec<(u32, Vec<Pos>)> = Vec::new();
        for (pos, node) in self.iter() {
            match out.last_mut() {
                Some((cost, cells)) if *cost == node.cost => cells.push(pos),
                _ => out.push((node.cost, vec![pos])),
            }
        }
        out
    }
}
