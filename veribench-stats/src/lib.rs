#![warn(missing_docs)]
//! Veribench Statistical Engine
//!
//! Turns a case's sample set into a defensible estimate:
//! - Summary statistics with a margin of error (Student's t for small
//!   counts, normal beyond 30 degrees of freedom)
//! - Explicit, reported sample trimming (never silent)
//! - Ranking and pairwise significance verdicts across cases

mod compare;
mod engine;
mod trim;

pub use compare::{
    compare_cases, CompareError, ComparisonResult, PairwiseComparison, RankedCase, Verdict,
};
pub use engine::{compute_statistics, critical_value, Statistics, StatsError};
pub use trim::{apply_trim, percentile, TrimAnalysis, TrimSummary};
