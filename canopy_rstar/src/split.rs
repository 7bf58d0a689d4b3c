// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! R*-tree split: axis by minimum total margin, cut by minimum overlap then area.

use alloc::vec::Vec;

use crate::types::{BoundingBox, Scalar, cmp_f64};

/// Which edge of a box orders the children along an axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Edge {
    Lower,
    Upper,
}

/// A chosen distribution: the first `index` children (in `axis`/`edge` order) form one group.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct SplitChoice {
    pub(crate) axis: usize,
    pub(crate) edge: Edge,
    pub(crate) index: usize,
}

pub(crate) fn sort_by_edge<T: Scalar, I, const D: usize>(
    items: &mut [(BoundingBox<T, D>, I)],
    axis: usize,
    edge: Edge,
) {
    match edge {
        Edge::Lower => items.sort_by(|a, b| {
            a.0.min[axis]
                .partial_cmp(&b.0.min[axis])
                .unwrap_or(core::cmp::Ordering::Equal)
        }),
        Edge::Upper => items.sort_by(|a, b| {
            a.0.max[axis]
                .partial_cmp(&b.0.max[axis])
                .unwrap_or(core::cmp::Ordering::Equal)
        }),
    }
}

/// Choose how to split an overflowing set of children, leaving `items` sorted
/// so that `items[..index]` and `items[index..]` are the two groups.
///
/// Every candidate cut keeps at least `min` items on each side. For each axis
/// the margins of all candidate distributions (over both edge orderings) are
/// summed; the axis with the smallest sum wins. Within an axis the distribution
/// with the least overlap between the two group boxes wins, ties going to the
/// smaller combined area.
pub(crate) fn choose_split<T: Scalar, I, const D: usize>(
    items: &mut [(BoundingBox<T, D>, I)],
    min: usize,
) -> SplitChoice {
    let n = items.len();
    assert!(
        min >= 1 && n >= 2 * min,
        "split requires at least {} children, got {n}",
        2 * min
    );

    let mut prefix: Vec<BoundingBox<T, D>> = Vec::with_capacity(n);
    let mut suffix: Vec<BoundingBox<T, D>> = Vec::with_capacity(n);
    let mut best: Option<(f64, SplitChoice)> = None;

    for axis in 0..D {
        let mut margin = 0.0;
        // (overlap, area, edge, index)
        let mut axis_best: Option<(f64, f64, Edge, usize)> = None;

        for edge in [Edge::Lower, Edge::Upper] {
            sort_by_edge(items, axis, edge);

            // Prefix and suffix unions make every candidate O(1).
            prefix.clear();
            let mut acc = BoundingBox::empty();
            for (bound, _) in items.iter() {
                acc.stretch(bound);
                prefix.push(acc);
            }
            suffix.clear();
            let mut acc = BoundingBox::empty();
            for (bound, _) in items.iter().rev() {
                acc.stretch(bound);
                suffix.push(acc);
            }
            suffix.reverse();

            for k in min..=(n - min) {
                let left = &prefix[k - 1];
                let right = &suffix[k];
                margin += left.margin() + right.margin();
                let overlap = left.overlap(right);
                let area = left.area() + right.area();
                let better = axis_best
                    .map(|(o, a, _, _)| overlap < o || (overlap == o && area < a))
                    .unwrap_or(true);
                if better {
                    axis_best = Some((overlap, area, edge, k));
                }
            }
        }

        if let Some((_, _, edge, index)) = axis_best
            && best.map(|(m, _)| margin < m).unwrap_or(true)
        {
            best = Some((margin, SplitChoice { axis, edge, index }));
        }
    }

    let (_, choice) = best.expect("split requires at least one axis");
    sort_by_edge(items, choice.axis, choice.edge);
    choice
}

/// Order `items` by a per-item key, farthest (largest) last.
pub(crate) fn sort_by_key_f64<I>(items: &mut [(f64, I)]) {
    items.sort_by(|a, b| cmp_f64(a.0, b.0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    type Box2 = BoundingBox<i32, 2>;

    fn bounds(x: i32, y: i32, w: i32, h: i32) -> Box2 {
        BoundingBox::from_origin_extent([x, y], [w, h])
    }

    fn union(items: &[(Box2, usize)]) -> Box2 {
        items.iter().fold(Box2::empty(), |acc, (b, _)| acc.union(b))
    }

    #[test]
    fn splits_two_clusters_apart() {
        // A low cluster and a high cluster, separable on either axis.
        let mut items = vec![
            (bounds(0, 0, 2, 2), 0),
            (bounds(50, 100, 2, 2), 1),
            (bounds(10, 1, 2, 2), 2),
            (bounds(20, 101, 2, 2), 3),
            (bounds(5, 2, 2, 2), 4),
        ];
        let choice = choose_split(&mut items, 2);
        let (left, right) = items.split_at(choice.index);
        let mut low: Vec<usize> = left.iter().map(|(_, i)| *i).collect();
        let mut high: Vec<usize> = right.iter().map(|(_, i)| *i).collect();
        low.sort_unstable();
        high.sort_unstable();
        assert_eq!(low, vec![0, 2, 4]);
        assert_eq!(high, vec![1, 3]);
        assert_eq!(union(left).overlap(&union(right)), 0.0);
    }

    #[test]
    fn groups_respect_minimum_fill() {
        for min in 1..=4 {
            let mut items: Vec<(Box2, usize)> =
                (0..9).map(|i| (bounds(i * 3, 0, 2, 2), i as usize)).collect();
            let before = union(&items);
            let choice = choose_split(&mut items, min);
            assert!(choice.index >= min && items.len() - choice.index >= min);
            let (left, right) = items.split_at(choice.index);
            assert_eq!(union(left).union(&union(right)), before);
        }
    }

    #[test]
    fn identical_boxes_still_split() {
        let mut items: Vec<(Box2, usize)> = (0..5).map(|i| (bounds(0, 0, 1, 1), i)).collect();
        let choice = choose_split(&mut items, 2);
        assert!(choice.index == 2 || choice.index == 3);
    }

    #[test]
    #[should_panic(expected = "split requires at least")]
    fn underfull_split_panics() {
        let mut items = vec![(bounds(0, 0, 1, 1), 0), (bounds(1, 1, 1, 1), 1)];
        let _ = choose_split(&mut items, 2);
    }
}
