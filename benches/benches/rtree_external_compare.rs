// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use voxelry_index::{Aabb3D, Index};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

fn gen_lattice_boxes(n: usize, cell: i32) -> Vec<Aabb3D<i32>> {
    let mut out = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let x0 = x as i32 * cell;
                let y0 = y as i32 * cell;
                let z0 = z as i32 * cell;
                out.push(Aabb3D::<i32>::from_origin_size(x0, y0, z0, cell, cell, cell));
            }
        }
    }
    out
}

fn to_rstar_boxes(v: &[Aabb3D<i32>]) -> Vec<Rectangle<[i32; 3]>> {
    v.iter()
        .map(|r| Rectangle::from_corners([r.min_x, r.min_y, r.min_z], [r.max_x, r.max_y, r.max_z]))
        .collect()
}

fn bench_rtree_external_compare_i32(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_external_compare_i32");
    for &n in &[12usize, 16] {
        let boxes = gen_lattice_boxes(n, 10);
        let aabb_query = Aabb3D::<i32>::from_origin_size(40, 40, 40, 80, 80, 80);
        group.throughput(Throughput::Elements((n * n * n) as u64));

        group.bench_function(format!("voxelry_build_query_n{}", n), |b| {
            b.iter_batched(
                Index::<i32, u32>::with_rtree,
                |mut idx| {
                    for (i, r) in boxes.iter().copied().enumerate() {
                        let _ = idx.insert(r, i as u32);
                    }
                    let _ = idx.commit();
                    let hits: usize = idx.query_box(aabb_query).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("voxelry_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || {
                    let entries: Vec<_> = boxes
                        .iter()
                        .copied()
                        .enumerate()
                        .map(|(i, r)| (r, i as u32))
                        .collect();
                    entries
                },
                |entries| {
                    let idx = Index::<i32, u32>::with_rtree_bulk(&entries);
                    let hits: usize = idx.query_box(aabb_query).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_boxes(&boxes),
                |rectangles| {
                    let tree = RTree::bulk_load(rectangles);
                    let aabb = AABB::from_corners(
                        [aabb_query.min_x, aabb_query.min_y, aabb_query.min_z],
                        [aabb_query.max_x, aabb_query.max_y, aabb_query.max_z],
                    );
                    let hits: usize = tree.locate_in_envelope_intersecting(&aabb).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rtree_external_compare_i32);
criterion_main!(benches);
