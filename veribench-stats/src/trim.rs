//! Sample Trimming
//!
//! Discards samples skewed by transient interference (a scheduler
//! preemption, a page fault storm) before final statistics. Trimming
//! only happens when the case explicitly asked for it, and its effect
//! is always carried into the report: how many samples were dropped
//! and the bounds that dropped them.

use serde::{Deserialize, Serialize};
use veribench_core::TrimPolicy;

/// Outcome of applying a trim policy to a sample set.
#[derive(Debug, Clone)]
pub struct TrimAnalysis {
    /// Samples inside the bounds, in original order.
    pub kept: Vec<f64>,
    /// Number of samples discarded.
    pub discarded: usize,
    /// Lower bound used, if the policy defines one.
    pub lower_bound: Option<f64>,
    /// Upper bound used, if the policy defines one.
    pub upper_bound: Option<f64>,
    /// The policy that produced this analysis.
    pub policy: TrimPolicy,
}

impl TrimAnalysis {
    /// Reportable summary of the trim's effect.
    pub fn summary(&self) -> TrimSummary {
        TrimSummary {
            policy: self.policy,
            discarded: self.discarded,
            lower_bound: self.lower_bound,
            upper_bound: self.upper_bound,
        }
    }
}

/// Trim effect as it appears in a report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimSummary {
    /// The configured policy.
    pub policy: TrimPolicy,
    /// Samples discarded by the policy.
    pub discarded: usize,
    /// Lower cut, when the policy defines one.
    pub lower_bound: Option<f64>,
    /// Upper cut, when the policy defines one.
    pub upper_bound: Option<f64>,
}

/// Apply a trim policy to per-iteration durations.
pub fn apply_trim(samples: &[f64], policy: TrimPolicy) -> TrimAnalysis {
    match policy {
        TrimPolicy::None => TrimAnalysis {
            kept: samples.to_vec(),
            discarded: 0,
            lower_bound: None,
            upper_bound: None,
            policy,
        },
        TrimPolicy::StdDev { k } => trim_by_std_dev(samples, k),
        TrimPolicy::Percentile { lower, upper } => trim_by_percentile(samples, lower, upper),
    }
}

/// Keep samples within `k` standard deviations of the mean.
fn trim_by_std_dev(samples: &[f64], k: f64) -> TrimAnalysis {
    if samples.is_empty() {
        return TrimAnalysis {
            kept: Vec::new(),
            discarded: 0,
            lower_bound: None,
            upper_bound: None,
            policy: TrimPolicy::StdDev { k },
        };
    }

    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    let lower = mean - k * std_dev;
    let upper = mean + k * std_dev;

    let kept: Vec<f64> = samples
        .iter()
        .copied()
        .filter(|&x| x >= lower && x <= upper)
        .collect();
    let discarded = samples.len() - kept.len();

    TrimAnalysis {
        kept,
        discarded,
        lower_bound: Some(lower),
        upper_bound: Some(upper),
        policy: TrimPolicy::StdDev { k },
    }
}

/// Keep samples inside the `[lower, upper]` percentile band.
fn trim_by_percentile(samples: &[f64], lower_pct: f64, upper_pct: f64) -> TrimAnalysis {
    let lower = percentile(samples, lower_pct);
    let upper = percentile(samples, upper_pct);

    let kept: Vec<f64> = samples
        .iter()
        .copied()
        .filter(|&x| x >= lower && x <= upper)
        .collect();
    let discarded = samples.len() - kept.len();

    TrimAnalysis {
        kept,
        discarded,
        lower_bound: Some(lower),
        upper_bound: Some(upper),
        policy: TrimPolicy::Percentile {
            lower: lower_pct,
            upper: upper_pct,
        },
    }
}

/// Percentile by linear interpolation between nearest ranks.
pub fn percentile(samples: &[f64], pct: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    if samples.len() == 1 {
        return samples[0];
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (pct / 100.0) * (sorted.len() - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(sorted.len() - 1);
    let fraction = rank - lower_idx as f64;

    sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_policy_keeps_everything() {
        let samples = vec![1.0, 2.0, 100.0];
        let analysis = apply_trim(&samples, TrimPolicy::None);

        assert_eq!(analysis.kept.len(), 3);
        assert_eq!(analysis.discarded, 0);
        assert_eq!(analysis.lower_bound, None);
    }

    #[test]
    fn std_dev_trim_drops_far_samples() {
        let mut samples = vec![100.0; 20];
        samples[0] = 99.0;
        samples[1] = 101.0;
        samples.push(1000.0); // far beyond 3 sigma

        let analysis = apply_trim(&samples, TrimPolicy::StdDev { k: 3.0 });
        assert_eq!(analysis.discarded, 1);
        assert!(!analysis.kept.contains(&1000.0));
        assert!(analysis.upper_bound.unwrap() < 1000.0);
    }

    #[test]
    fn percentile_trim_cuts_both_tails() {
        let samples: Vec<f64> = (1..=100).map(f64::from).collect();
        let analysis = apply_trim(
            &samples,
            TrimPolicy::Percentile {
                lower: 5.0,
                upper: 95.0,
            },
        );

        assert!(analysis.discarded >= 8);
        assert!(!analysis.kept.contains(&1.0));
        assert!(!analysis.kept.contains(&100.0));
        assert!(analysis.kept.contains(&50.0));
    }

    #[test]
    fn percentile_interpolates() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((percentile(&samples, 50.0) - 3.0).abs() < 1e-9);
        assert!((percentile(&samples, 25.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_is_harmless() {
        let analysis = apply_trim(&[], TrimPolicy::StdDev { k: 2.0 });
        assert!(analysis.kept.is_empty());
        assert_eq!(analysis.discarded, 0);
    }
}
