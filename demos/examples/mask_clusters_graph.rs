// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clustering and intersection-graph example over a chain of boxes.
//!
//! Run:
//! - `cargo run -p voxelry_demos --example mask_clusters_graph`

use glam::IVec3;
use voxelry_mask::{BinaryEncoding, Bounds, Extent, MaskIndex, VoxelMask};

fn filled_cube(corner: IVec3, side: u32) -> VoxelMask {
    let bounds = Bounds::new(corner, Extent::new(side, side, side)).unwrap();
    VoxelMask::filled(bounds, BinaryEncoding::default())
}

fn main() {
    // Six cubes chained along x (each pair shares a voxel plane), plus two
    // isolated cubes far away.
    let mut masks = Vec::new();
    for k in 0..6 {
        masks.push(filled_cube(IVec3::new(3 * k, 0, 0), 4));
    }
    masks.push(filled_cube(IVec3::new(100, 0, 0), 3));
    masks.push(filled_cube(IVec3::new(200, 0, 0), 3));

    let mut index = MaskIndex::build(masks);
    let ids = index.ids();

    let graph = index.intersection_graph();
    println!(
        "graph: {} vertices, {} edges",
        graph.num_vertices(),
        graph.num_edges()
    );
    for id in graph.vertices() {
        println!("  degree of {:?}: {}", id, graph.degree(id));
    }

    let clusters = index.spatially_separate();
    println!("clusters before removal:");
    for c in &clusters {
        println!("  {:?} spanning {:?}", c.members(), c.bounds());
    }
    assert_eq!(clusters.len(), 3);

    // Breaking a link in the middle of the chain splits its cluster in two.
    index.remove(ids[2]);
    let clusters = index.spatially_separate();
    println!("clusters after removing {:?}:", ids[2]);
    for c in &clusters {
        println!("  {:?}", c.members());
    }
    assert_eq!(clusters.len(), 4);
}
