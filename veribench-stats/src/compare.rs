//! Case Comparison
//!
//! Ranks completed statistics by operations per second and issues a
//! pairwise verdict per pair. The central caution encoded here: a
//! nominal percentage difference means nothing unless it survives a
//! significance check — whenever two confidence intervals overlap, the
//! verdict is `Indistinguishable` no matter which mean looks better.

use serde::{Deserialize, Serialize};

use crate::engine::Statistics;

/// Comparison inputs were unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompareError {
    /// A ranking needs at least two cases.
    #[error("comparison needs at least 2 cases, got {have}")]
    NotEnoughCases {
        /// Number of cases supplied.
        have: usize,
    },
    /// An incomplete result must never be silently compared.
    #[error("case {name:?} is incomplete and cannot be compared")]
    IncompleteCase {
        /// Name of the offending case.
        name: String,
    },
}

/// Pairwise verdict for a contender measured against a baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// The contender's interval lies entirely below the baseline's.
    Faster,
    /// The contender's interval lies entirely above the baseline's.
    Slower,
    /// The intervals overlap; no significant difference can be claimed.
    Indistinguishable,
}

impl Verdict {
    /// The verdict seen from the other side of the pair.
    pub fn inverse(self) -> Verdict {
        match self {
            Verdict::Faster => Verdict::Slower,
            Verdict::Slower => Verdict::Faster,
            Verdict::Indistinguishable => Verdict::Indistinguishable,
        }
    }
}

/// One case's position in the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCase {
    /// Case name.
    pub name: String,
    /// Throughput the ranking is ordered by.
    pub ops_per_sec: f64,
}

/// Verdict for one pair of cases.
///
/// The percentage is `(mean_contender − mean_baseline) / mean_baseline
/// × 100`: positive when the contender's mean duration is larger
/// (slower), negative when smaller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseComparison {
    /// Case the difference is measured from.
    pub baseline: String,
    /// Case the verdict describes.
    pub contender: String,
    /// Verdict for the contender relative to the baseline.
    pub verdict: Verdict,
    /// Relative difference of mean durations, in percent.
    pub relative_change_pct: f64,
}

impl PairwiseComparison {
    /// The same pair seen from the contender's side: names swapped,
    /// verdict inverted, percentage negated.
    pub fn reversed(&self) -> PairwiseComparison {
        PairwiseComparison {
            baseline: self.contender.clone(),
            contender: self.baseline.clone(),
            verdict: self.verdict.inverse(),
            relative_change_pct: -self.relative_change_pct,
        }
    }
}

/// Ranking plus pairwise verdicts for a set of completed cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Cases ordered by operations per second, descending.
    pub ranking: Vec<RankedCase>,
    /// One entry per unordered pair, in input order.
    pub pairwise: Vec<PairwiseComparison>,
}

/// Compare two or more completed statistics.
///
/// Rejects any input whose stopping rule was not satisfied; feeding an
/// interrupted run into a comparison would launder noise into a
/// verdict.
pub fn compare_cases(entries: &[(&str, &Statistics)]) -> Result<ComparisonResult, CompareError> {
    if entries.len() < 2 {
        return Err(CompareError::NotEnoughCases {
            have: entries.len(),
        });
    }
    for (name, stats) in entries {
        if !stats.is_complete() {
            return Err(CompareError::IncompleteCase {
                name: (*name).to_string(),
            });
        }
    }

    let mut ranking: Vec<RankedCase> = entries
        .iter()
        .map(|(name, stats)| RankedCase {
            name: (*name).to_string(),
            ops_per_sec: stats.ops_per_sec,
        })
        .collect();
    ranking.sort_by(|a, b| {
        b.ops_per_sec
            .partial_cmp(&a.ops_per_sec)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut pairwise = Vec::with_capacity(entries.len() * (entries.len() - 1) / 2);
    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            let (baseline_name, baseline) = entries[i];
            let (contender_name, contender) = entries[j];
            pairwise.push(compare_pair(
                baseline_name,
                baseline,
                contender_name,
                contender,
            ));
        }
    }

    Ok(ComparisonResult { ranking, pairwise })
}

/// Verdict for one contender/baseline pair.
fn compare_pair(
    baseline_name: &str,
    baseline: &Statistics,
    contender_name: &str,
    contender: &Statistics,
) -> PairwiseComparison {
    let (base_lo, base_hi) = baseline.confidence_interval();
    let (cont_lo, cont_hi) = contender.confidence_interval();

    let overlap = base_lo <= cont_hi && cont_lo <= base_hi;
    let verdict = if overlap {
        Verdict::Indistinguishable
    } else if contender.mean_ns < baseline.mean_ns {
        Verdict::Faster
    } else {
        Verdict::Slower
    };

    let relative_change_pct = if baseline.mean_ns > 0.0 {
        (contender.mean_ns - baseline.mean_ns) / baseline.mean_ns * 100.0
    } else {
        0.0
    };

    PairwiseComparison {
        baseline: baseline_name.to_string(),
        contender: contender_name.to_string(),
        verdict,
        relative_change_pct,
    }
}
