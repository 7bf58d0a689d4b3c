// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sphere tree levels.
//!
//! Fill the deepest row of an octree-shaped sphere tree with random spheres,
//! derive every parent as the bounding sphere of its children, and print the
//! bound of each row.
//!
//! Run:
//! - `cargo run -p canopy_demos --example sphere_tree_levels`

use canopy_sphere_tree::{Sphere, SphereTree, bounding_sphere};
use glam::DVec3;
use rand::Rng;

fn main() {
    env_logger::init();

    let levels = 4;
    let mut tree = SphereTree::new(8, levels).expect("8 x 4 is a valid shape");
    let mut rng = rand::thread_rng();

    // Leave a few leaves unused to show they are skipped.
    for i in tree.row(levels - 1) {
        if rng.gen_bool(0.9) {
            let center = DVec3::new(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            );
            tree.nodes_mut()[i].sphere = Sphere::new(center, rng.gen_range(0.5..3.0));
        }
    }

    for level in (0..levels - 1).rev() {
        for i in tree.row(level) {
            let children: Vec<Sphere> = tree.children(i).map(|c| tree.nodes()[c].sphere).collect();
            if let Some(bound) = bounding_sphere(&children) {
                tree.nodes_mut()[i].sphere = bound;
            }
        }
    }

    for level in 0..levels {
        let row = tree.level(level);
        match bounding_sphere(&row) {
            Some(bound) => println!(
                "level {level}: {} spheres, bound center ({:.2}, {:.2}, {:.2}) radius {:.2}",
                row.len(),
                bound.center.x,
                bound.center.y,
                bound.center.z,
                bound.radius
            ),
            None => println!("level {level}: empty"),
        }
    }
}
