// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree configuration: fan-out bounds and R*-tree tuning knobs.

/// Errors reported while validating [`RTreeParams`].
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ParamsError {
    /// The minimum fan-out must be at least one.
    #[error("minimum fan-out must be at least 1")]
    MinChildrenZero,
    /// The minimum fan-out must not exceed half the maximum fan-out.
    #[error("minimum fan-out {min} exceeds half of the maximum fan-out {max}")]
    MinChildrenTooLarge {
        /// Requested minimum fan-out.
        min: usize,
        /// Requested maximum fan-out.
        max: usize,
    },
    /// The forced-reinsertion fraction must lie strictly between 0 and 1.
    #[error("reinsertion fraction {0} is outside (0, 1)")]
    ReinsertFraction(f64),
    /// At least one candidate must survive the choose-subtree pruning.
    #[error("choose-subtree candidate count must be at least 1")]
    ZeroCandidates,
}

/// Ranking used to pick the children evicted by a forced reinsertion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReinsertOrder {
    /// Rank by [`BoundingBox::distance_from_center`](crate::BoundingBox::distance_from_center),
    /// the historical key.
    #[default]
    CenterSum,
    /// Rank by the squared distance between the child's center and the node's center.
    CenterDistance,
}

/// Configuration for an [`RStarTree`](crate::RStarTree).
///
/// ```
/// use canopy_rstar::{ParamsError, RTreeParams};
///
/// let params = RTreeParams::new(32, 64)?.with_reinsert_fraction(0.25)?;
/// assert_eq!(params.max_children(), 64);
/// assert_eq!(params.reinsert_count(), 16);
///
/// assert!(RTreeParams::new(5, 8).is_err());
/// # Ok::<(), ParamsError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RTreeParams {
    min_children: usize,
    max_children: usize,
    reinsert_fraction: f64,
    choose_subtree_candidates: usize,
    reinsert_order: ReinsertOrder,
}

impl RTreeParams {
    /// Fraction of an overflowing node's children evicted by forced reinsertion.
    pub const DEFAULT_REINSERT_FRACTION: f64 = 0.30;

    /// Candidate count kept by the choose-subtree area pre-sort.
    pub const DEFAULT_CHOOSE_SUBTREE_CANDIDATES: usize = 32;

    /// Create parameters with fan-out bounds `m` and `M`, requiring `1 <= m <= M / 2`.
    pub const fn new(min_children: usize, max_children: usize) -> Result<Self, ParamsError> {
        if min_children == 0 {
            return Err(ParamsError::MinChildrenZero);
        }
        if min_children > max_children / 2 {
            return Err(ParamsError::MinChildrenTooLarge {
                min: min_children,
                max: max_children,
            });
        }
        Ok(Self {
            min_children,
            max_children,
            reinsert_fraction: Self::DEFAULT_REINSERT_FRACTION,
            choose_subtree_candidates: Self::DEFAULT_CHOOSE_SUBTREE_CANDIDATES,
            reinsert_order: ReinsertOrder::CenterSum,
        })
    }

    /// Set the forced-reinsertion fraction.
    pub fn with_reinsert_fraction(mut self, fraction: f64) -> Result<Self, ParamsError> {
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(ParamsError::ReinsertFraction(fraction));
        }
        self.reinsert_fraction = fraction;
        Ok(self)
    }

    /// Set how many area-ranked candidates the overlap search considers.
    pub const fn with_choose_subtree_candidates(
        mut self,
        candidates: usize,
    ) -> Result<Self, ParamsError> {
        if candidates == 0 {
            return Err(ParamsError::ZeroCandidates);
        }
        self.choose_subtree_candidates = candidates;
        Ok(self)
    }

    /// Set the ranking used by forced reinsertion.
    pub const fn with_reinsert_order(mut self, order: ReinsertOrder) -> Self {
        self.reinsert_order = order;
        self
    }

    /// Minimum fan-out `m` of every non-root node.
    pub const fn min_children(&self) -> usize {
        self.min_children
    }

    /// Maximum fan-out `M` of every node.
    pub const fn max_children(&self) -> usize {
        self.max_children
    }

    /// Forced-reinsertion fraction.
    pub const fn reinsert_fraction(&self) -> f64 {
        self.reinsert_fraction
    }

    /// Candidate count for the choose-subtree pre-sort.
    pub const fn choose_subtree_candidates(&self) -> usize {
        self.choose_subtree_candidates
    }

    /// Ranking used by forced reinsertion.
    pub const fn reinsert_order(&self) -> ReinsertOrder {
        self.reinsert_order
    }

    /// Number of children evicted from an overflowing node: `max(1, floor((M + 1) * fraction))`.
    ///
    /// Capped so the node keeps at least `m` children.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Fraction is validated to (0, 1), so the product is a small non-negative count."
    )]
    pub fn reinsert_count(&self) -> usize {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Fan-out values are far below 2^52."
        )]
        let p = ((self.max_children + 1) as f64 * self.reinsert_fraction) as usize;
        p.clamp(1, self.max_children + 1 - self.min_children)
    }

    /// Whether choose-subtree should pre-sort by area before the overlap search.
    pub(crate) fn prunes_candidates(&self, child_count: usize) -> bool {
        self.max_children > (self.choose_subtree_candidates * 2) / 3
            && child_count > self.choose_subtree_candidates
    }
}

impl Default for RTreeParams {
    fn default() -> Self {
        Self {
            min_children: 4,
            max_children: 8,
            reinsert_fraction: Self::DEFAULT_REINSERT_FRACTION,
            choose_subtree_candidates: Self::DEFAULT_CHOOSE_SUBTREE_CANDIDATES,
            reinsert_order: ReinsertOrder::CenterSum,
        }
    }
}
