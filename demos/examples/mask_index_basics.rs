// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mask index basics.
//!
//! Build a small index, query a point, list intersections, and remove an
//! object.
//!
//! Run:
//! - `cargo run -p voxelry_demos --example mask_index_basics`

use glam::IVec3;
use voxelry_mask::{BinaryEncoding, Bounds, Extent, MaskIndex, VoxelMask};

fn main() {
    // Three boxes: the first two overlap at a corner, the third floats alone.
    let masks = vec![
        VoxelMask::filled(
            Bounds::new(IVec3::new(0, 0, 0), Extent::new(4, 4, 4)).unwrap(),
            BinaryEncoding::default(),
        ),
        VoxelMask::filled(
            Bounds::new(IVec3::new(3, 3, 3), Extent::new(4, 4, 4)).unwrap(),
            BinaryEncoding::default(),
        ),
        VoxelMask::filled(
            Bounds::new(IVec3::new(50, 0, 0), Extent::new(2, 2, 2)).unwrap(),
            BinaryEncoding::default(),
        ),
    ];
    let mut index = MaskIndex::build(masks);
    let ids = index.ids();

    // The shared voxel belongs to both of the first two objects.
    let at_corner = index.contains_point(IVec3::new(3, 3, 3));
    println!("objects at (3,3,3): {at_corner:?}");
    assert_eq!(at_corner, vec![ids[0], ids[1]]);

    let partners = index.intersects_with(ids[0]);
    println!("intersecting {:?}: {partners:?}", ids[0]);
    assert_eq!(partners, vec![ids[1]]);

    // Removal is permanent; remaining ids stay stable.
    index.remove(ids[1]);
    assert!(index.intersects_with(ids[0]).is_empty());
    println!("live objects after removal: {}", index.len());
}
