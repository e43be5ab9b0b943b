//! Summary Statistics and Margin of Error
//!
//! Consumes a case's sample set of per-iteration durations and derives
//! the read-only snapshot the report carries: mean, sample variance,
//! standard deviation, margin of error at the configured confidence
//! level, and operations per second as the reciprocal of the mean.
//!
//! The margin of error uses Student's t for small sample counts and
//! the normal quantile beyond 30 degrees of freedom. Both the critical
//! value and the `1/sqrt(n)` factor shrink as samples accumulate, so
//! for a fixed variance the margin never widens with more data.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use veribench_core::{CaseConfig, Completion, ConfidenceLevel, SampleSet};

use crate::trim::{apply_trim, TrimSummary};

/// The sample set cannot support the requested statistics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    /// Variance needs at least two samples surviving the trim.
    #[error("need at least 2 samples after trimming, have {have}")]
    InsufficientSamples {
        /// Samples remaining after the trim policy was applied.
        have: usize,
    },
}

/// Read-only statistical snapshot of one case's sample set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Samples that contributed to the estimates (after trimming).
    pub sample_count: usize,
    /// Mean per-iteration duration in nanoseconds.
    pub mean_ns: f64,
    /// Sample variance (n − 1 denominator), in ns².
    pub variance: f64,
    /// Standard deviation in nanoseconds.
    pub std_dev_ns: f64,
    /// Half-width of the confidence interval around the mean, in ns.
    pub margin_of_error_ns: f64,
    /// Confidence level the margin was computed at, as a fraction.
    pub confidence_level: f64,
    /// Operations per second: `1e9 / mean_ns`.
    pub ops_per_sec: f64,
    /// Aggregate measured time across all recorded cycles, untrimmed.
    pub total_elapsed: Duration,
    /// Effect of the trim policy on this sample set.
    pub trim: TrimSummary,
    /// How the measurement ended.
    pub completion: Completion,
}

impl Statistics {
    /// Whether the stopping rule's minimum sample count was met.
    pub fn is_complete(&self) -> bool {
        self.completion.is_complete()
    }

    /// Confidence interval around the mean, `[mean − moe, mean + moe]`.
    pub fn confidence_interval(&self) -> (f64, f64) {
        (
            self.mean_ns - self.margin_of_error_ns,
            self.mean_ns + self.margin_of_error_ns,
        )
    }
}

/// Compute the statistical snapshot for a sample set.
pub fn compute_statistics(
    samples: &SampleSet,
    config: &CaseConfig,
    completion: Completion,
) -> Result<Statistics, StatsError> {
    let per_iteration = samples.per_iteration_ns();
    let analysis = apply_trim(&per_iteration, config.trim);
    let kept = &analysis.kept;

    if kept.len() < 2 {
        return Err(StatsError::InsufficientSamples { have: kept.len() });
    }

    let n = kept.len() as f64;
    let mean = kept.iter().sum::<f64>() / n;
    let variance = kept.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();

    let critical = critical_value(config.confidence_level, kept.len() - 1);
    let margin_of_error = critical * std_dev / n.sqrt();

    let ops_per_sec = if mean > 0.0 { 1e9 / mean } else { 0.0 };

    Ok(Statistics {
        sample_count: kept.len(),
        mean_ns: mean,
        variance,
        std_dev_ns: std_dev,
        margin_of_error_ns: margin_of_error,
        confidence_level: config.confidence_level.value(),
        ops_per_sec,
        total_elapsed: samples.total_elapsed(),
        trim: analysis.summary(),
        completion,
    })
}

/// Two-sided critical values of Student's t for df 1..=30, columns for
/// the 90/95/99 percent levels. Beyond 30 degrees of freedom the
/// normal quantile is close enough.
#[rustfmt::skip]
const T_TABLE: [[f64; 3]; 30] = [
    [6.314, 12.706, 63.657],
    [2.920,  4.303,  9.925],
    [2.353,  3.182,  5.841],
    [2.132,  2.776,  4.604],
    [2.015,  2.571,  4.032],
    [1.943,  2.447,  3.707],
    [1.895,  2.365,  3.499],
    [1.860,  2.306,  3.355],
    [1.833,  2.262,  3.250],
    [1.812,  2.228,  3.169],
    [1.796,  2.201,  3.106],
    [1.782,  2.179,  3.055],
    [1.771,  2.160,  3.012],
    [1.761,  2.145,  2.977],
    [1.753,  2.131,  2.947],
    [1.746,  2.120,  2.921],
    [1.740,  2.110,  2.898],
    [1.734,  2.101,  2.878],
    [1.729,  2.093,  2.861],
    [1.725,  2.086,  2.845],
    [1.721,  2.080,  2.831],
    [1.717,  2.074,  2.819],
    [1.714,  2.069,  2.807],
    [1.711,  2.064,  2.797],
    [1.708,  2.060,  2.787],
    [1.706,  2.056,  2.779],
    [1.703,  2.052,  2.771],
    [1.701,  2.048,  2.763],
    [1.699,  2.045,  2.756],
    [1.697,  2.042,  2.750],
];

/// Normal quantiles for the same two-sided levels.
const Z_VALUES: [f64; 3] = [1.6449, 1.9600, 2.5758];

fn level_column(level: ConfidenceLevel) -> usize {
    match level {
        ConfidenceLevel::P90 => 0,
        ConfidenceLevel::P95 => 1,
        ConfidenceLevel::P99 => 2,
    }
}

/// Critical value for a confidence level and degrees of freedom.
pub fn critical_value(level: ConfidenceLevel, df: usize) -> f64 {
    let column = level_column(level);
    if df == 0 {
        // Unreachable with the 2-sample minimum; widest value is the
        // conservative answer.
        return T_TABLE[0][column];
    }
    if df <= T_TABLE.len() {
        T_TABLE[df - 1][column]
    } else {
        Z_VALUES[column]
    }
}
