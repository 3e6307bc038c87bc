// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Voxelry Index: insert, update, commit damage, and query.

use voxelry_index::{Aabb3D, Index};

fn main() {
    let mut idx: Index<i32, u32> = Index::new();
    let k1 = idx.insert(Aabb3D::new(0, 0, 0, 10, 10, 10), 1);
    let _k2 = idx.insert(Aabb3D::new(5, 5, 5, 15, 15, 15), 2);
    let _ = idx.commit();

    // Move box 1
    idx.update(k1, Aabb3D::new(20, 0, 0, 30, 10, 10));
    let dmg = idx.commit();
    println!(
        "damage: added={:?}, removed={:?}, moved={:?}",
        dmg.added, dmg.removed, dmg.moved
    );

    // Query a point
    let hits: Vec<_> = idx.query_point(6, 6, 6).collect();
    println!("hits at (6,6,6): {:?}", hits);
}
