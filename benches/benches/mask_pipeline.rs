// Copyright 2025 the Voxelry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::{IVec3, UVec3};
use voxelry_mask::{BinaryEncoding, Bounds, Extent, MaskIndex, VoxelMask};

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

fn gen_clustered_masks(n_clusters: usize, per_cluster: usize, spread: i32) -> Vec<VoxelMask> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push(IVec3::new(
            rng.next_i32_in(1000),
            rng.next_i32_in(1000),
            rng.next_i32_in(1000),
        ));
    }
    for c in centers {
        for _ in 0..per_cluster {
            let d = IVec3::new(
                rng.next_i32_in(spread) - spread / 2,
                rng.next_i32_in(spread) - spread / 2,
                rng.next_i32_in(spread) - spread / 2,
            );
            let bounds = Bounds::new(c + d, Extent::new(8, 8, 8)).unwrap();
            out.push(VoxelMask::filled(bounds, BinaryEncoding::default()));
        }
    }
    out
}

// Hollow boxes on an overlapping lattice: bounds overlap everywhere but only
// shell voxels can confirm, so candidate rejection does real work.
fn gen_shell_lattice(n: usize, side: u32, step: i32) -> Vec<VoxelMask> {
    let mut out = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let corner = IVec3::new(x as i32 * step, y as i32 * step, z as i32 * step);
                let bounds = Bounds::new(corner, Extent::new(side, side, side)).unwrap();
                let mut m = VoxelMask::filled(bounds, BinaryEncoding::default());
                for lz in 1..side - 1 {
                    for ly in 1..side - 1 {
                        for lx in 1..side - 1 {
                            m.set_off(UVec3::new(lx, ly, lz));
                        }
                    }
                }
                out.push(m);
            }
        }
    }
    out
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask_build");
    for &(nc, pc) in &[(8usize, 16usize), (16, 16), (16, 64)] {
        let masks = gen_clustered_masks(nc, pc, 64);
        group.throughput(Throughput::Elements((nc * pc) as u64));
        group.bench_function(format!("bulk_build_{}x{}", nc, pc), |b| {
            b.iter_batched(
                || masks.clone(),
                |masks| {
                    let idx = MaskIndex::build(masks);
                    black_box(idx.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_pairwise(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask_pairwise");
    let masks = gen_clustered_masks(16, 16, 64);
    group.throughput(Throughput::Elements(masks.len() as u64));
    group.bench_function("intersects_with_all", |b| {
        b.iter_batched(
            || MaskIndex::build(masks.clone()),
            |idx| {
                let mut total = 0usize;
                for id in idx.ids() {
                    total += idx.intersects_with(id).len();
                }
                black_box(total);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_clusters(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask_clusters");
    let clustered = gen_clustered_masks(16, 16, 64);
    group.bench_function("spatially_separate_clustered", |b| {
        b.iter_batched(
            || MaskIndex::build(clustered.clone()),
            |idx| {
                black_box(idx.spatially_separate().len());
            },
            BatchSize::SmallInput,
        )
    });
    let shells = gen_shell_lattice(6, 8, 6);
    group.bench_function("spatially_separate_shell_lattice", |b| {
        b.iter_batched(
            || MaskIndex::build(shells.clone()),
            |idx| {
                black_box(idx.spatially_separate().len());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask_graph");
    let masks = gen_clustered_masks(16, 16, 64);
    group.bench_function("intersection_graph", |b| {
        b.iter_batched(
            || MaskIndex::build(masks.clone()),
            |idx| {
                let g = idx.intersection_graph();
                black_box(g.num_edges());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_point_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask_point_queries");
    let masks = gen_clustered_masks(16, 16, 64);
    let idx = MaskIndex::build(masks);
    group.bench_function("contains_point_512", |b| {
        b.iter(|| {
            let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
            let mut total = 0usize;
            for _ in 0..512 {
                let p = IVec3::new(
                    rng.next_i32_in(1000),
                    rng.next_i32_in(1000),
                    rng.next_i32_in(1000),
                );
                total += idx.contains_point(p).len();
            }
            black_box(total);
        })
    });
    group.finish();
}

fn bench_remove_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask_remove_heavy");
    let masks = gen_clustered_masks(16, 16, 64);
    group.bench_function("remove_half_then_cluster", |b| {
        b.iter_batched(
            || MaskIndex::build(masks.clone()),
            |mut idx| {
                for id in idx.ids().into_iter().step_by(2) {
                    idx.remove(id);
                }
                black_box(idx.spatially_separate().len());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_pairwise,
    bench_clusters,
    bench_graph,
    bench_point_queries,
    bench_remove_heavy,
);
criterion_main!(benches);
