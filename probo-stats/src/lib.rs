#![warn(missing_docs)]
//! Probo Statistical Engine
//!
//! Provides the arithmetic behind benchmark reporting:
//! - Summary statistics (min/mean/median/max, standard deviation)
//! - Welch's t-test (unequal variances) with a correct two-sided p-value
//! - Pairwise significance matrices over timing sample sets

mod summary;
mod welch;

pub use summary::{TimingSummary, summarize};
pub use welch::{
    PairVerdict, PairwiseMatrix, StatsError, WelchTest, pairwise_welch, student_t_two_sided_p,
    welch_t_test,
};

/// Default significance threshold for pairwise tests.
pub const DEFAULT_ALPHA: f64 = 0.05;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert!((DEFAULT_ALPHA - 0.05).abs() < f64::EPSILON);
    }
}
