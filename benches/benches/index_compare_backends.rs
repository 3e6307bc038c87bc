// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use voxelry_index::{Aabb3D, Index};

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

fn gen_lattice_boxes_i64(n: usize, cell: i64) -> Vec<Aabb3D<i64>> {
    let mut out = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let x0 = x as i64 * cell;
                let y0 = y as i64 * cell;
                let z0 = z as i64 * cell;
                out.push(Aabb3D::<i64>::from_origin_size(x0, y0, z0, cell, cell, cell));
            }
        }
    }
    out
}

fn gen_overlap_lattice_boxes(n: usize, cell: i32, scale: i32) -> Vec<Aabb3D<i32>> {
    let mut out = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let x0 = x as i32 * cell;
                let y0 = y as i32 * cell;
                let z0 = z as i32 * cell;
                out.push(Aabb3D::<i32>::from_origin_size(
                    x0,
                    y0,
                    z0,
                    cell * scale,
                    cell * scale,
                    cell * scale,
                ));
            }
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_i32_in(&mut self, bound: i32) -> i32 {
        (self.next_u64() % bound.max(1) as u64) as i32
    }
}

fn gen_random_boxes(count: usize, world: i32, side: i32) -> Vec<Aabb3D<i32>> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for _ in 0..count {
        let x0 = rng.next_i32_in(world - side);
        let y0 = rng.next_i32_in(world - side);
        let z0 = rng.next_i32_in(world - side);
        out.push(Aabb3D::<i32>::from_origin_size(x0, y0, z0, side, side, side));
    }
    out
}

fn gen_slab_boxes(n_slabs: usize, per_slab: usize, thickness: i32, width: i32) -> Vec<Aabb3D<i32>> {
    let mut out = Vec::with_capacity(n_slabs * per_slab);
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    for s in 0..n_slabs {
        let z0 = s as i32 * thickness * 2;
        for _ in 0..per_slab {
            let x0 = rng.next_i32_in(width);
            let y0 = rng.next_i32_in(width);
            out.push(Aabb3D::<i32>::from_origin_size(
                x0, y0, z0, thickness, thickness, thickness,
            ));
        }
    }
    out
}

fn gen_clustered_boxes(n_clusters: usize, per_cluster: usize, spread: i32) -> Vec<Aabb3D<i32>> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((
            rng.next_i32_in(2000),
            rng.next_i32_in(2000),
            rng.next_i32_in(2000),
        ));
    }
    for (cx, cy, cz) in centers {
        for _ in 0..per_cluster {
            let dx = rng.next_i32_in(spread) - spread / 2;
            let dy = rng.next_i32_in(spread) - spread / 2;
            let dz = rng.next_i32_in(spread) - spread / 2;
            out.push(Aabb3D::<i32>::from_origin_size(
                cx + dx,
                cy + dy,
                cz + dz,
                12,
                12,
                12,
            ));
        }
    }
    out
}

fn bench_flatvec(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatvec");
    for &n in &[8usize, 12, 16] {
        let boxes = gen_lattice_boxes(n, 10);
        group.throughput(Throughput::Elements((n * n * n) as u64));
        group.bench_function(format!("insert_commit_box_n{}", n), |b| {
            b.iter_batched(
                Index::<i32, u32>::new,
                |mut idx| {
                    for (i, r) in boxes.iter().copied().enumerate() {
                        let _ = idx.insert(r, i as u32);
                    }
                    let _ = idx.commit();
                    let hits: usize = idx
                        .query_box(Aabb3D::<i32>::from_origin_size(40, 40, 40, 80, 80, 80))
                        .count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    let boxes = gen_overlap_lattice_boxes(12, 10, 3);
    group.bench_function("insert_commit_box_overlap", |b| {
        b.iter_batched(
            Index::<i32, u32>::new,
            |mut idx| {
                for (i, r) in boxes.iter().copied().enumerate() {
                    let _ = idx.insert(r, i as u32);
                }
                let _ = idx.commit();
                let hits: usize = idx
                    .query_box(Aabb3D::<i32>::from_origin_size(40, 40, 40, 80, 80, 80))
                    .count();
                black_box(hits);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid");
    for &n in &[8usize, 12, 16] {
        let boxes = gen_lattice_boxes(n, 10);
        group.throughput(Throughput::Elements((n * n * n) as u64));
        group.bench_function(format!("insert_commit_box_n{}", n), |b| {
            b.iter_batched(
                || Index::<i32, u32>::with_uniform_grid(32, 32, 32),
                |mut idx| {
                    for (i, r) in boxes.iter().copied().enumerate() {
                        let _ = idx.insert(r, i as u32);
                    }
                    let _ = idx.commit();
                    let hits: usize = idx
                        .query_box(Aabb3D::<i32>::from_origin_size(40, 40, 40, 80, 80, 80))
                        .count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    let boxes = gen_random_boxes(4096, 2000, 12);
    group.bench_function("insert_commit_box_random", |b| {
        b.iter_batched(
            || Index::<i32, u32>::with_uniform_grid(32, 32, 32),
            |mut idx| {
                for (i, r) in boxes.iter().copied().enumerate() {
                    let _ = idx.insert(r, i as u32);
                }
                let _ = idx.commit();
                let hits: usize = idx
                    .query_box(Aabb3D::<i32>::from_origin_size(800, 800, 800, 400, 400, 400))
                    .count();
                black_box(hits);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_rtree_i32(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_i32");
    for &n in &[8usize, 12, 16] {
        let boxes = gen_lattice_boxes(n, 10);
        group.throughput(Throughput::Elements((n * n * n) as u64));
        group.bench_function(format!("insert_commit_box_n{}", n), |b| {
            b.iter_batched(
                Index::<i32, u32>::with_rtree,
                |mut idx| {
                    for (i, r) in boxes.iter().copied().enumerate() {
                        let _ = idx.insert(r, i as u32);
                    }
                    let _ = idx.commit();
                    let hits: usize = idx
                        .query_box(Aabb3D::<i32>::from_origin_size(40, 40, 40, 80, 80, 80))
                        .count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_rtree_i64(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_i64");
    for &n in &[8usize, 12, 16] {
        let boxes = gen_lattice_boxes_i64(n, 10);
        group.throughput(Throughput::Elements((n * n * n) as u64));
        group.bench_function(format!("insert_commit_box_n{}", n), |b| {
            b.iter_batched(
                Index::<i64, u32>::with_rtree,
                |mut idx| {
                    for (i, r) in boxes.iter().copied().enumerate() {
                        let _ = idx.insert(r, i as u32);
                    }
                    let _ = idx.commit();
                    let hits: usize = idx
                        .query_box(Aabb3D::<i64>::new(40, 40, 40, 120, 120, 120))
                        .count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_rtree_bulk_i32(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_i32_bulk");
    for &n in &[8usize, 12, 16] {
        let boxes = gen_lattice_boxes(n, 10);
        group.throughput(Throughput::Elements((n * n * n) as u64));
        group.bench_function(format!("bulk_build_box_n{}", n), |b| {
            b.iter_batched(
                || {
                    boxes
                        .iter()
                        .copied()
                        .enumerate()
                        .map(|(i, r)| (r, i as u32))
                        .collect::<Vec<_>>()
                },
                |entries| {
                    let idx = Index::<i32, u32>::with_rtree_bulk(&entries);
                    let hits: usize = idx
                        .query_box(Aabb3D::<i32>::from_origin_size(40, 40, 40, 80, 80, 80))
                        .count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_update_heavy_rtree_i64(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_i64_update_heavy");
    let boxes = gen_lattice_boxes_i64(12, 10);
    group.bench_function("update_move_then_commit", |b| {
        b.iter_batched(
            || {
                let mut idx = Index::<i64, u32>::with_rtree();
                let mut keys = Vec::new();
                for (i, r) in boxes.iter().copied().enumerate() {
                    keys.push(idx.insert(r, i as u32));
                }
                let _ = idx.commit();
                (idx, keys)
            },
            |(mut idx, keys)| {
                for (j, k) in keys.into_iter().enumerate() {
                    let dx = (j as i64 % 5) - 2;
                    let dy = ((j * 7) as i64 % 5) - 2;
                    let dz = ((j * 11) as i64 % 5) - 2;
                    let x0 = 10 * (j % 12) as i64 + dx;
                    let y0 = 10 * ((j / 12) % 12) as i64 + dy;
                    let z0 = 10 * (j / 144) as i64 + dz;
                    idx.update(k, Aabb3D::<i64>::from_origin_size(x0, y0, z0, 10, 10, 10));
                }
                let _ = idx.commit();
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_query_heavy_rtree_i32(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_i32_query_heavy");
    let boxes = gen_lattice_boxes(16, 8);
    group.bench_function("build_then_many_queries", |b| {
        b.iter_batched(
            || {
                let mut idx = Index::<i32, u32>::with_rtree();
                for (i, r) in boxes.iter().copied().enumerate() {
                    let _ = idx.insert(r, i as u32);
                }
                let _ = idx.commit();
                idx
            },
            |idx| {
                let mut total = 0usize;
                for q in 0..256 {
                    let x = (q % 8) as i32 * 16;
                    let y = ((q / 8) % 8) as i32 * 16;
                    let z = (q / 64) as i32 * 16;
                    total += idx
                        .query_box(Aabb3D::<i32>::from_origin_size(x, y, z, 48, 48, 48))
                        .count();
                }
                black_box(total);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_rtree_clustered_i32(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_i32_clustered");
    let boxes = gen_clustered_boxes(16, 256, 128);
    group.bench_function("insert_commit_query", |b| {
        b.iter_batched(
            Index::<i32, u32>::with_rtree,
            |mut idx| {
                for (i, r) in boxes.iter().copied().enumerate() {
                    let _ = idx.insert(r, i as u32);
                }
                let _ = idx.commit();
                let hits = idx
                    .query_box(Aabb3D::<i32>::from_origin_size(800, 800, 800, 400, 400, 400))
                    .count();
                black_box(hits);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_grid_banded_i32(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_i32_banded");
    let boxes = gen_slab_boxes(64, 64, 8, 2000);
    group.bench_function("insert_commit_query", |b| {
        b.iter_batched(
            || Index::<i32, u32>::with_uniform_grid(32, 32, 32),
            |mut idx| {
                for (i, r) in boxes.iter().copied().enumerate() {
                    let _ = idx.insert(r, i as u32);
                }
                let _ = idx.commit();
                let hits = idx
                    .query_box(Aabb3D::<i32>::from_origin_size(100, 100, 100, 400, 400, 400))
                    .count();
                black_box(hits);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_flatvec,
    bench_grid,
    bench_rtree_i32,
    bench_rtree_i64,
    bench_rtree_bulk_i32,
    bench_update_heavy_rtree_i64,
    bench_query_heavy_rtree_i32,
    bench_rtree_clustered_i32,
    bench_grid_banded_i32,
);
criterion_main!(benches);
