// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connected-component clustering of intersecting masks.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::bounds::Bounds;
use crate::index::{MaskId, MaskIndex};

/// Union-find over mask slots.
///
/// Union keeps the smaller root, so the representative of every set is its
/// minimum member. That makes the cluster order below deterministic without
/// a separate canonicalization pass.
struct DisjointSet {
    parent: Vec<u32>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).map(MaskId::new).map(|id| id.0).collect(),
        }
    }

    fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        // Path compression.
        let mut cur = x;
        while self.parent[cur as usize] != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        let (keep, merge) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent[merge as usize] = keep;
    }
}

/// A maximal group of transitively intersecting masks.
#[derive(Clone, Debug)]
pub struct Cluster {
    members: Vec<MaskId>,
    bounds: Bounds,
}

impl Cluster {
    /// Members, ascending by id.
    pub fn members(&self) -> &[MaskId] {
        &self.members
    }

    /// Union of the members' bounding boxes.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

impl MaskIndex {
    /// Partition the live masks into clusters of transitive intersection.
    ///
    /// Two masks land in the same cluster iff they are connected through a
    /// chain of confirmed voxel overlaps; a mask touching nothing forms a
    /// singleton. Every live mask appears in exactly one cluster. Clusters
    /// are ordered by their smallest member id.
    pub fn spatially_separate(&self) -> Vec<Cluster> {
        let ids = self.ids();
        let Some(last) = ids.last() else {
            return Vec::new();
        };
        let mut sets = DisjointSet::new(last.slot() + 1);
        for (a, b) in self.confirmed_pairs() {
            sets.union(a.0, b.0);
        }

        let mut groups: BTreeMap<u32, (Vec<MaskId>, Bounds)> = BTreeMap::new();
        for id in ids {
            let Some(mask) = self.get(id) else {
                continue;
            };
            let b = mask.bounds();
            let (members, acc) = groups
                .entry(sets.find(id.0))
                .or_insert_with(|| (Vec::new(), b));
            members.push(id);
            *acc = acc.union(&b);
        }
        groups
            .into_values()
            .map(|(members, bounds)| Cluster { members, bounds })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::BinaryEncoding;
    use crate::extent::Extent;
    use crate::mask::VoxelMask;
    use glam::IVec3;

    fn filled(corner: (i32, i32, i32), extent: (u32, u32, u32)) -> VoxelMask {
        let b = Bounds::new(
            IVec3::new(corner.0, corner.1, corner.2),
            Extent::new(extent.0, extent.1, extent.2),
        )
        .unwrap();
        VoxelMask::filled(b, BinaryEncoding::default())
    }

    fn fixture() -> MaskIndex {
        MaskIndex::build(alloc::vec![
            filled((100, 100, 100), (3, 3, 3)),
            filled((0, 0, 0), (4, 4, 4)),
            filled((3, 3, 3), (4, 4, 4)),
            filled((6, 6, 6), (4, 4, 4)),
        ])
    }

    #[test]
    fn disjoint_set_roots_are_minima() {
        let mut sets = DisjointSet::new(6);
        sets.union(4, 2);
        sets.union(2, 5);
        sets.union(1, 3);
        assert_eq!(sets.find(5), 2);
        assert_eq!(sets.find(4), 2);
        assert_eq!(sets.find(3), 1);
        assert_eq!(sets.find(0), 0);
        // Merging the two groups keeps the overall minimum.
        sets.union(5, 3);
        assert_eq!(sets.find(4), 1);
    }

    #[test]
    fn fixture_splits_into_two_clusters() {
        let idx = fixture();
        let ids = idx.ids();
        let clusters = idx.spatially_separate();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members(), [ids[0]]);
        assert_eq!(clusters[1].members(), [ids[1], ids[2], ids[3]]);
        assert_eq!(clusters[1].bounds().corner(), IVec3::ZERO);
        assert_eq!(clusters[1].bounds().max_corner(), IVec3::new(9, 9, 9));
    }

    #[test]
    fn clusters_partition_the_live_ids() {
        let idx = fixture();
        let clusters = idx.spatially_separate();
        let mut seen: Vec<MaskId> = clusters
            .iter()
            .flat_map(|c| c.members().iter().copied())
            .collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen, idx.ids());
    }

    #[test]
    fn removing_a_bridge_splits_its_cluster() {
        let mut idx = fixture();
        let ids = idx.ids();
        idx.remove(ids[2]);
        let clusters = idx.spatially_separate();
        assert_eq!(clusters.len(), 3);
        assert!(clusters.iter().all(|c| c.members().len() == 1));
    }

    #[test]
    fn touching_bounds_without_shared_voxels_stay_separate() {
        // The boxes overlap at plane x = 3 but object voxels do not.
        let mut a = filled((0, 0, 0), (4, 4, 4));
        for y in 0..4 {
            for z in 0..4 {
                a.set_off(glam::UVec3::new(3, y, z));
            }
        }
        let b = filled((3, 0, 0), (4, 4, 4));
        let idx = MaskIndex::build(alloc::vec![a, b]);
        assert_eq!(idx.spatially_separate().len(), 2);
    }

    #[test]
    fn empty_index_has_no_clusters() {
        let idx = MaskIndex::build(Vec::new());
        assert!(idx.spatially_separate().is_empty());
    }
}
