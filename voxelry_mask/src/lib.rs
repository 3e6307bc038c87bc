// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=voxelry_mask --heading-base-level=0

//! Voxelry Mask: an exact intersection index over voxelized objects.
//!
//! Voxelry Mask answers "which objects touch this point / this box / each
//! other" for collections of axis-aligned voxel volumes, at voxel precision.
//!
//! - Represents each object as a [`VoxelMask`]: a dense byte buffer with
//!   integer placement ([`Bounds`]) and a per-mask on/off [`BinaryEncoding`].
//! - Indexes object bounding boxes in an R-tree and confirms candidates
//!   against the actual voxels, so results are exact rather than
//!   box-conservative.
//! - Derives structure from the pairwise overlaps: connected-component
//!   [`Cluster`]s and an [`IntersectionGraph`].
//!
//! ## Exactness model
//!
//! The spatial index stores bounding boxes only; every query that names a
//! mask then checks voxels inside the box intersection before reporting a
//! result. Two exceptions are deliberate:
//!
//! - [`MaskIndex::intersects_with_bounds`] takes a bare box, so there are no
//!   voxels to confirm against; it is a pure bounding-box query.
//! - Construction performs no intersection tests. You pay for overlap
//!   confirmation when you ask, not when you build.
//!
//! ## Integration with Voxelry Index
//!
//! Bounding boxes live in a [`voxelry_index`] R-tree (`i32` scalars, packed
//! bulk build). The mask layer never walks tree internals; it consumes the
//! index's candidate iterators and applies its own voxel tests on top.
//!
//! ## API overview
//!
//! - [`VoxelMask`]: placed voxel volume; edit with [`VoxelMask::set_on`] /
//!   [`VoxelMask::set_off`], derive with [`VoxelMask::shifted_by`],
//!   [`VoxelMask::flattened_z`], and [`VoxelMask::grown_by`].
//! - [`MaskIndex`]: owning index over masks, addressed by [`MaskId`].
//! - [`count_intersecting`] / [`has_intersecting`]: standalone pairwise
//!   overlap tests for masks outside any index.
//!
//! Key operations:
//! - [`MaskIndex::build`] → ids in input order.
//! - [`MaskIndex::contains_point`] / [`MaskIndex::intersects_with`] /
//!   [`MaskIndex::intersects_with_bounds`].
//! - [`MaskIndex::spatially_separate`] → [`Cluster`]s.
//! - [`MaskIndex::intersection_graph`] → [`IntersectionGraph`].
//! - [`MaskIndex::remove`] (idempotent; ids are never reused).
//!
//! ### Minimal usage
//!
//! ```
//! use glam::IVec3;
//! use voxelry_mask::{BinaryEncoding, Bounds, Extent, MaskIndex, VoxelMask};
//!
//! let enc = BinaryEncoding::default();
//! let a = VoxelMask::filled(
//!     Bounds::new(IVec3::new(0, 0, 0), Extent::new(4, 4, 4)).unwrap(),
//!     enc,
//! );
//! let b = VoxelMask::filled(
//!     Bounds::new(IVec3::new(3, 3, 3), Extent::new(4, 4, 4)).unwrap(),
//!     enc,
//! );
//! let c = VoxelMask::filled(
//!     Bounds::new(IVec3::new(50, 0, 0), Extent::new(2, 2, 2)).unwrap(),
//!     enc,
//! );
//!
//! let index = MaskIndex::build(vec![a, b, c]);
//! let ids = index.ids();
//!
//! // Point queries confirm actual voxels, not just boxes.
//! assert_eq!(index.contains_point(IVec3::new(3, 3, 3)), [ids[0], ids[1]]);
//!
//! // Pairwise queries are exact as well.
//! assert_eq!(index.intersects_with(ids[0]), [ids[1]]);
//! assert_eq!(index.intersects_with(ids[2]), []);
//! ```
//!
//! ### Clusters and the intersection graph
//!
//! ```
//! use glam::IVec3;
//! use voxelry_mask::{BinaryEncoding, Bounds, Extent, MaskIndex, VoxelMask};
//!
//! let mask = |x: i32| {
//!     VoxelMask::filled(
//!         Bounds::new(IVec3::new(x, 0, 0), Extent::new(4, 4, 4)).unwrap(),
//!         BinaryEncoding::default(),
//!     )
//! };
//!
//! // A chain at 0-3-6 plus one mask far away.
//! let index = MaskIndex::build(vec![mask(0), mask(3), mask(6), mask(100)]);
//!
//! let clusters = index.spatially_separate();
//! assert_eq!(clusters.len(), 2);
//! assert_eq!(clusters[0].members().len(), 3);
//!
//! let graph = index.intersection_graph();
//! assert_eq!(graph.num_vertices(), 4);
//! assert_eq!(graph.num_edges(), 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod bounds;
mod cluster;
mod encoding;
mod error;
mod extent;
mod graph;
mod index;
mod mask;
mod overlap;

pub use bounds::Bounds;
pub use cluster::Cluster;
pub use encoding::BinaryEncoding;
pub use error::{MaskError, MaskResult};
pub use extent::Extent;
pub use graph::IntersectionGraph;
pub use index::{MaskId, MaskIndex};
pub use mask::VoxelMask;
pub use overlap::{count_intersecting, has_intersecting};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use glam::IVec3;

    fn filled(corner: IVec3, side: u32) -> VoxelMask {
        let b = Bounds::new(corner, Extent::new(side, side, side)).unwrap();
        VoxelMask::filled(b, BinaryEncoding::default())
    }

    // End-to-end pass over the public surface: build, query, cluster,
    // snapshot, remove, re-query.
    #[test]
    fn full_pipeline() {
        let index = MaskIndex::build(alloc::vec![
            filled(IVec3::new(0, 0, 0), 4),
            filled(IVec3::new(3, 0, 0), 4),
            filled(IVec3::new(20, 20, 20), 2),
        ]);
        let ids = index.ids();

        assert_eq!(index.len(), 3);
        assert_eq!(index.contains_point(IVec3::new(3, 1, 1)), [ids[0], ids[1]]);

        let region = Bounds::new(IVec3::new(19, 19, 19), Extent::new(4, 4, 4)).unwrap();
        assert_eq!(index.intersects_with_bounds(&region), [ids[2]]);

        let clusters = index.spatially_separate();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members(), [ids[0], ids[1]]);
        assert_eq!(clusters[1].members(), [ids[2]]);

        let graph = index.intersection_graph();
        assert_eq!(graph.num_edges(), 1);
        assert!(graph.contains_edge(ids[0], ids[1]));

        let mut index = index;
        index.remove(ids[1]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.intersects_with(ids[0]), []);
        assert_eq!(index.spatially_separate().len(), 2);
    }

    // The standalone overlap tests agree with the indexed queries.
    #[test]
    fn standalone_overlap_matches_index() {
        let a = filled(IVec3::new(0, 0, 0), 4);
        let b = filled(IVec3::new(2, 2, 2), 4);
        assert!(has_intersecting(&a, &b));
        assert_eq!(count_intersecting(&a, &b), 8);

        let index = MaskIndex::build(alloc::vec![a, b]);
        let ids = index.ids();
        assert_eq!(index.intersects_with(ids[0]), [ids[1]]);
    }

    #[test]
    fn ids_sort_back_to_build_order() {
        let index = MaskIndex::build(alloc::vec![
            filled(IVec3::new(0, 0, 0), 1),
            filled(IVec3::new(5, 0, 0), 1),
        ]);
        let mut ids: Vec<MaskId> = index.ids();
        ids.reverse();
        ids.sort_unstable();
        assert_eq!(ids, index.ids());
    }
}
