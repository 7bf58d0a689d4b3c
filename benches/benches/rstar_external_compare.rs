// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use canopy_rstar::{Accept, BoundingBox, Count, RStarTree, RTreeParams};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

fn gen_grid_rects(n: usize, cell: f64) -> Vec<BoundingBox<f64, 2>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(BoundingBox::from_origin_extent([x0, y0], [cell, cell]));
        }
    }
    out
}

fn to_rstar_rects(v: &[BoundingBox<f64, 2>]) -> Vec<Rectangle<[f64; 2]>> {
    v.iter()
        .map(|r| Rectangle::from_corners(r.min, r.max))
        .collect()
}

fn bench_rstar_external_compare_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("rstar_external_compare_f64");
    for &n in &[64usize, 128] {
        let rects = gen_grid_rects(n, 10.0);
        let area = BoundingBox::from_origin_extent([100.0, 100.0], [400.0, 400.0]);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("canopy_build_query_n{}", n), |b| {
            b.iter_batched(
                || RStarTree::<f64, u32, 2>::with_params(RTreeParams::new(3, 6).unwrap()),
                |mut tree| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        tree.insert(r, i as u32);
                    }
                    let hits = tree.query(&Accept::Overlapping(area), Count::default()).count;
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        // rstar's default node capacity is 3..=6.
        group.bench_function(format!("rstar_build_query_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_rects(&rects),
                |rectangles| {
                    let mut tree = RTree::new();
                    for r in rectangles {
                        tree.insert(r);
                    }
                    let aabb = AABB::from_corners(area.min, area.max);
                    let hits: usize = tree.locate_in_envelope_intersecting(&aabb).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rstar_external_compare_f64);
criterion_main!(benches);
