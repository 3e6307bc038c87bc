// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adjacency view of confirmed mask overlaps.

use alloc::collections::{BTreeMap, BTreeSet};

use crate::index::{MaskId, MaskIndex};

/// An undirected graph with one vertex per live mask and one edge per
/// confirmed voxel overlap.
///
/// The graph is a snapshot: it does not observe later removals from the
/// index it was built from. Vertex and edge iteration order is ascending,
/// so two snapshots of the same index state compare equal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntersectionGraph {
    adjacency: BTreeMap<MaskId, BTreeSet<MaskId>>,
    num_edges: usize,
}

impl IntersectionGraph {
    /// Number of vertices, including isolated ones.
    pub fn num_vertices(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// All vertices, ascending.
    pub fn vertices(&self) -> impl Iterator<Item = MaskId> + '_ {
        self.adjacency.keys().copied()
    }

    /// All edges as (smaller, larger) pairs, ordered by first then second id.
    pub fn edges(&self) -> impl Iterator<Item = (MaskId, MaskId)> + '_ {
        self.adjacency.iter().flat_map(|(&a, nbrs)| {
            nbrs.iter()
                .copied()
                .filter(move |&b| b > a)
                .map(move |b| (a, b))
        })
    }

    /// Neighbors of `id`, ascending. Unknown vertices have no neighbors.
    pub fn neighbors(&self, id: MaskId) -> impl Iterator<Item = MaskId> + '_ {
        self.adjacency
            .get(&id)
            .into_iter()
            .flat_map(|nbrs| nbrs.iter().copied())
    }

    /// Number of edges incident to `id`.
    pub fn degree(&self, id: MaskId) -> usize {
        self.adjacency.get(&id).map_or(0, BTreeSet::len)
    }

    /// True iff the two masks overlap. Symmetric.
    pub fn contains_edge(&self, a: MaskId, b: MaskId) -> bool {
        self.adjacency.get(&a).is_some_and(|nbrs| nbrs.contains(&b))
    }
}

impl MaskIndex {
    /// Snapshot the current intersection structure as a graph.
    ///
    /// Isolated masks become isolated vertices; each confirmed overlapping
    /// pair becomes one undirected edge.
    pub fn intersection_graph(&self) -> IntersectionGraph {
        let mut adjacency: BTreeMap<MaskId, BTreeSet<MaskId>> = BTreeMap::new();
        for id in self.ids() {
            adjacency.insert(id, BTreeSet::new());
        }
        let pairs = self.confirmed_pairs();
        let num_edges = pairs.len();
        for (a, b) in pairs {
            adjacency.entry(a).or_default().insert(b);
            adjacency.entry(b).or_default().insert(a);
        }
        IntersectionGraph {
            adjacency,
            num_edges,
        }
    }
}
