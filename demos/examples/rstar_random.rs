// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Random dataset.
//!
//! Insert 10 000 random boxes into a wide-node tree, then count entries with
//! an accept-any query and two enclosing queries over the same area.
//!
//! Run:
//! - `cargo run -p canopy_demos --example rstar_random`
//! - `RUST_LOG=canopy_rstar=debug cargo run -p canopy_demos --example rstar_random`

use canopy_rstar::{Accept, BoundingBox, Count, RStarTree, RTreeParams};
use rand::Rng;

fn bounds(x: i32, y: i32, w: i32, h: i32) -> BoundingBox<i32, 2> {
    BoundingBox::from_origin_extent([x, y], [w, h])
}

fn main() {
    env_logger::init();

    let params = RTreeParams::new(32, 64).expect("32/64 is a valid fan-out");
    let mut tree: RStarTree<i32, u32, 2> = RStarTree::with_params(params);
    let mut rng = rand::thread_rng();
    for i in 0..10_000 {
        tree.insert(
            bounds(
                rng.gen_range(0..1000),
                rng.gen_range(0..1000),
                rng.gen_range(0..20),
                rng.gen_range(0..20),
            ),
            i,
        );
    }

    let any = tree.query(&Accept::Any, Count::default());
    println!(
        "AcceptAny: {} entries visited ({} entries in tree)",
        any.count,
        tree.len()
    );

    let area = bounds(100, 100, 300, 400);
    for _ in 0..2 {
        println!("Searching in {area}");
        let hits = tree.query(&Accept::Enclosing(area), Count::default());
        println!("Visited {} entries ({} entries in tree)", hits.count, tree.len());
    }

    let stats = tree.stats();
    println!(
        "height {}, {} nodes ({} at leaf level)",
        stats.height, stats.nodes, stats.leaf_nodes
    );
}
