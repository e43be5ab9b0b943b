//! Per-Case Configuration
//!
//! Configuration is a concrete struct with enumerated, validated
//! fields: out-of-range values are rejected at registration time, not
//! silently ignored. Per-case overrides carry only the fields the case
//! author set and are merged over run-level defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Confidence level for the margin of error.
///
/// Only the conventional levels are representable, which keeps the
/// critical-value tables exact and makes invalid levels a type error
/// rather than a runtime one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    /// 90% two-sided interval.
    P90,
    /// 95% two-sided interval (default).
    #[default]
    P95,
    /// 99% two-sided interval.
    P99,
}

impl ConfidenceLevel {
    /// The level as a fraction (0.90, 0.95, 0.99).
    pub fn value(self) -> f64 {
        match self {
            ConfidenceLevel::P90 => 0.90,
            ConfidenceLevel::P95 => 0.95,
            ConfidenceLevel::P99 => 0.99,
        }
    }
}

/// Sample trimming policy applied before final statistics.
///
/// Trimming is never applied silently: the default is `None`, and the
/// engine reports how many samples a non-default policy discarded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum TrimPolicy {
    /// Keep every sample.
    #[default]
    None,
    /// Discard samples farther than `k` standard deviations from the mean.
    StdDev {
        /// Distance bound in standard deviations; must be positive.
        k: f64,
    },
    /// Discard samples outside the `[lower, upper]` percentile band.
    Percentile {
        /// Lower percentile bound, in `[0, 100)`.
        lower: f64,
        /// Upper percentile bound, in `(lower, 100]`.
        upper: f64,
    },
}

impl TrimPolicy {
    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            TrimPolicy::None => Ok(()),
            TrimPolicy::StdDev { k } => {
                if k > 0.0 && k.is_finite() {
                    Ok(())
                } else {
                    Err(ConfigError::TrimBound(format!(
                        "stddev multiplier must be positive and finite, got {k}"
                    )))
                }
            }
            TrimPolicy::Percentile { lower, upper } => {
                if (0.0..100.0).contains(&lower) && lower < upper && upper <= 100.0 {
                    Ok(())
                } else {
                    Err(ConfigError::TrimBound(format!(
                        "percentile band must satisfy 0 <= lower < upper <= 100, got [{lower}, {upper}]"
                    )))
                }
            }
        }
    }
}

/// Fully resolved configuration for measuring one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseConfig {
    /// Bound on the relative error introduced by clock quantization.
    /// Cycles are sized so a half-tick of uncertainty stays within it.
    pub target_relative_error: f64,
    /// Minimum number of samples before the run can complete.
    pub min_samples: usize,
    /// Minimum aggregate measured time before the run can complete.
    pub min_total_duration: Duration,
    /// Wall-clock cutoff; enforced only at cycle boundaries.
    pub max_run_duration: Duration,
    /// Confidence level for the reported margin of error.
    pub confidence_level: ConfidenceLevel,
    /// Outlier trimming applied before final statistics.
    pub trim: TrimPolicy,
}

impl Default for CaseConfig {
    fn default() -> Self {
        Self {
            target_relative_error: 0.01,
            min_samples: 5,
            min_total_duration: Duration::from_millis(500),
            max_run_duration: Duration::from_secs(5),
            confidence_level: ConfidenceLevel::default(),
            trim: TrimPolicy::default(),
        }
    }
}

impl CaseConfig {
    /// Check every field; called once at registration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.target_relative_error > 0.0 && self.target_relative_error < 1.0) {
            return Err(ConfigError::TargetRelativeError(self.target_relative_error));
        }
        if self.min_samples < 2 {
            return Err(ConfigError::MinSamples(self.min_samples));
        }
        if self.max_run_duration.is_zero() {
            return Err(ConfigError::ZeroMaxRunDuration);
        }
        if self.min_total_duration > self.max_run_duration {
            return Err(ConfigError::MinTotalExceedsMaxRun {
                min_total: self.min_total_duration,
                max_run: self.max_run_duration,
            });
        }
        self.trim.validate()
    }

    /// Merge per-case overrides over these defaults.
    pub fn resolve(&self, overrides: &CaseOverrides) -> CaseConfig {
        CaseConfig {
            target_relative_error: overrides
                .target_relative_error
                .unwrap_or(self.target_relative_error),
            min_samples: overrides.min_samples.unwrap_or(self.min_samples),
            min_total_duration: overrides
                .min_total_duration
                .unwrap_or(self.min_total_duration),
            max_run_duration: overrides
                .max_run_duration
                .unwrap_or(self.max_run_duration),
            confidence_level: overrides
                .confidence_level
                .unwrap_or(self.confidence_level),
            trim: overrides.trim.unwrap_or(self.trim),
        }
    }
}

/// Per-case configuration overrides; unset fields fall back to the
/// run-level defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseOverrides {
    /// Override for [`CaseConfig::target_relative_error`].
    pub target_relative_error: Option<f64>,
    /// Override for [`CaseConfig::min_samples`].
    pub min_samples: Option<usize>,
    /// Override for [`CaseConfig::min_total_duration`].
    pub min_total_duration: Option<Duration>,
    /// Override for [`CaseConfig::max_run_duration`].
    pub max_run_duration: Option<Duration>,
    /// Override for [`CaseConfig::confidence_level`].
    pub confidence_level: Option<ConfidenceLevel>,
    /// Override for [`CaseConfig::trim`].
    pub trim: Option<TrimPolicy>,
}
