// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_rstar::{
    Accept, BoundingBox, Count, RStarTree, RTreeParams, RemoveAll, ReinsertOrder,
};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

type Box2 = BoundingBox<i32, 2>;

fn gen_grid_rects(n: i32, cell: i32) -> Vec<Box2> {
    let mut out = Vec::with_capacity((n * n) as usize);
    for y in 0..n {
        for x in 0..n {
            out.push(BoundingBox::from_origin_extent([x * cell, y * cell], [cell, cell]));
        }
    }
    out
}

fn gen_random_rects(count: usize, extent: i32, max_side: i32) -> Vec<Box2> {
    let mut rng = StdRng::seed_from_u64(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            let x = rng.gen_range(0..extent);
            let y = rng.gen_range(0..extent);
            let w = rng.gen_range(0..max_side);
            let h = rng.gen_range(0..max_side);
            BoundingBox::from_origin_extent([x, y], [w, h])
        })
        .collect()
}

fn gen_clustered_rects(n_clusters: usize, per_cluster: usize, spread: i32) -> Vec<Box2> {
    let mut rng = StdRng::seed_from_u64(0xC1A5_7E55_9999_ABCD);
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for _ in 0..n_clusters {
        let cx = rng.gen_range(0..2000);
        let cy = rng.gen_range(0..2000);
        for _ in 0..per_cluster {
            let dx = rng.gen_range(-spread..spread);
            let dy = rng.gen_range(-spread..spread);
            out.push(BoundingBox::from_origin_extent([cx + dx, cy + dy], [12, 12]));
        }
    }
    out
}

fn build(params: RTreeParams, rects: &[Box2]) -> RStarTree<i32, u32, 2> {
    let mut tree = RStarTree::with_params(params);
    for (i, r) in rects.iter().enumerate() {
        tree.insert(*r, i as u32);
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    let datasets = [
        ("grid_n64", gen_grid_rects(64, 10)),
        ("random_10k", gen_random_rects(10_000, 1000, 20)),
        ("clustered_10k", gen_clustered_rects(20, 500, 60)),
    ];
    let fanouts = [(2, 4), (4, 8), (32, 64)];
    for (name, rects) in &datasets {
        group.throughput(Throughput::Elements(rects.len() as u64));
        for &(m, max) in &fanouts {
            let params = RTreeParams::new(m, max).unwrap();
            group.bench_function(format!("{name}_m{m}_M{max}"), |b| {
                b.iter(|| black_box(build(params, rects)));
            });
        }
        let centered = RTreeParams::new(4, 8)
            .unwrap()
            .with_reinsert_order(ReinsertOrder::CenterDistance);
        group.bench_function(format!("{name}_m4_M8_center_distance"), |b| {
            b.iter(|| black_box(build(centered, rects)));
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let rects = gen_random_rects(10_000, 1000, 20);
    let area = BoundingBox::from_origin_extent([100, 100], [300, 400]);
    for &(m, max) in &[(4, 8), (32, 64)] {
        let tree = build(RTreeParams::new(m, max).unwrap(), &rects);
        group.bench_function(format!("overlapping_m{m}_M{max}"), |b| {
            b.iter(|| black_box(tree.query(&Accept::Overlapping(area), Count::default())));
        });
        group.bench_function(format!("enclosing_m{m}_M{max}"), |b| {
            b.iter(|| black_box(tree.query(&Accept::Enclosing(area), Count::default())));
        });
        group.bench_function(format!("any_m{m}_M{max}"), |b| {
            b.iter(|| black_box(tree.query(&Accept::Any, Count::default())));
        });
    }
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");
    let rects = gen_random_rects(10_000, 1000, 20);
    let params = RTreeParams::new(4, 8).unwrap();
    group.bench_function("bounded_area_10k", |b| {
        b.iter_batched(
            || build(params, &rects),
            |mut tree| {
                let area = BoundingBox::from_origin_extent([100, 100], [300, 400]);
                black_box(tree.remove(&Accept::Enclosing(area), RemoveAll));
            },
            BatchSize::LargeInput,
        );
    });
    group.bench_function("items_one_by_one_2k", |b| {
        b.iter_batched(
            || build(params, &rects[..2000]),
            |mut tree| {
                for i in 0..2000_u32 {
                    black_box(tree.remove_item(&i, false));
                }
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_query, bench_remove);
criterion_main!(benches);
