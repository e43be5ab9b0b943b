//! Report Data Structures
//!
//! The read-only structures the harness hands to its collaborators: a
//! presentation layer renders them, a persistence layer stores them
//! keyed by case name and environment fingerprint. Nothing in here is
//! recomputed after the run completes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use veribench_core::{Completion, Error};
use veribench_stats::{ComparisonResult, Statistics, TrimSummary};

use crate::meta::SystemInfo;

/// Complete report for one run of one or more cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Run metadata and environment fingerprint.
    pub meta: ReportMeta,
    /// One entry per registered case, in registration order.
    pub cases: Vec<CaseReport>,
    /// Ranking and verdicts, present when two or more cases completed.
    pub comparison: Option<ComparisonResult>,
    /// Aggregate counts for the run.
    pub summary: RunSummary,
}

/// Report metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Harness version that produced the report.
    pub version: String,
    /// UTC time the report was generated.
    pub timestamp: DateTime<Utc>,
    /// Single-environment system description.
    pub system: SystemInfo,
}

/// Terminal state of one case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    /// Measured to a usable result.
    Measured,
    /// Cut off before the minimum sample count.
    Incomplete,
    /// The work (or its sizing) failed; nothing usable was measured.
    Failed,
}

/// Result of one case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    /// Case name, unique within the run.
    pub name: String,
    /// Terminal state.
    pub status: CaseStatus,
    /// Whether the stopping rule's minimum sample count was met.
    /// Incomplete reports must not be fed to a comparison.
    pub complete: bool,
    /// Statistics, when at least two samples survived.
    pub metrics: Option<CaseMetrics>,
    /// Non-fatal advisory (e.g. the run was time-limited).
    pub warning: Option<String>,
    /// Failure detail for [`CaseStatus::Failed`].
    pub failure: Option<FailureInfo>,
}

/// Statistical metrics of a measured case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseMetrics {
    /// Samples that contributed to the estimates.
    pub sample_count: usize,
    /// Mean per-iteration duration in nanoseconds.
    pub mean_ns: f64,
    /// Sample variance in ns².
    pub variance: f64,
    /// Standard deviation in nanoseconds.
    pub std_dev_ns: f64,
    /// Half-width of the confidence interval, in nanoseconds.
    pub margin_of_error_ns: f64,
    /// Confidence level of the margin, as a fraction.
    pub confidence_level: f64,
    /// Operations per second (reciprocal of the mean).
    pub ops_per_sec: f64,
    /// Aggregate measured time across all cycles, in nanoseconds.
    pub total_elapsed_ns: u64,
    /// Effect of the configured trim policy.
    pub trim: TrimSummary,
}

impl From<&Statistics> for CaseMetrics {
    fn from(stats: &Statistics) -> Self {
        Self {
            sample_count: stats.sample_count,
            mean_ns: stats.mean_ns,
            variance: stats.variance,
            std_dev_ns: stats.std_dev_ns,
            margin_of_error_ns: stats.margin_of_error_ns,
            confidence_level: stats.confidence_level,
            ops_per_sec: stats.ops_per_sec,
            total_elapsed_ns: stats.total_elapsed.as_nanos() as u64,
            trim: stats.trim,
        }
    }
}

/// Failure detail attached to a failed case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureInfo {
    /// Failure class ("work", "sizing", "config", "clock").
    pub kind: String,
    /// Human-readable message (panic payload or sizing detail).
    pub message: String,
}

impl FailureInfo {
    /// Classify a harness error into its reportable failure kind.
    pub fn from_error(error: &Error) -> Self {
        let kind = match error {
            Error::Work { .. } => "work",
            Error::CycleSizing { .. } => "sizing",
            Error::Config(_) => "config",
            Error::Clock(_) => "clock",
        };
        Self {
            kind: kind.to_string(),
            message: error.to_string(),
        }
    }
}

/// Aggregate counts for the whole run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Cases registered.
    pub total_cases: usize,
    /// Cases measured to a usable result.
    pub measured: usize,
    /// Cases cut off before their minimum sample count.
    pub incomplete: usize,
    /// Cases whose work or sizing failed.
    pub failed: usize,
    /// Wall-clock time for the whole run, in milliseconds.
    pub total_wall_ms: f64,
}

impl CaseReport {
    /// Report for a case with computed statistics.
    pub fn measured(name: impl Into<String>, stats: &Statistics) -> Self {
        let complete = stats.is_complete();
        let warning = match stats.completion {
            Completion::Satisfied => None,
            Completion::TimeLimited => Some(
                "maximum run duration reached; sample count met, result is time-limited"
                    .to_string(),
            ),
            Completion::Incomplete => Some(
                "maximum run duration reached before minimum sample count".to_string(),
            ),
        };
        Self {
            name: name.into(),
            status: if complete {
                CaseStatus::Measured
            } else {
                CaseStatus::Incomplete
            },
            complete,
            metrics: Some(CaseMetrics::from(stats)),
            warning,
            failure: None,
        }
    }

    /// Report for a case cut off with too few samples for statistics.
    pub fn incomplete(name: impl Into<String>, sample_count: usize) -> Self {
        Self {
            name: name.into(),
            status: CaseStatus::Incomplete,
            complete: false,
            metrics: None,
            warning: Some(format!(
                "only {sample_count} sample(s) collected before the cutoff"
            )),
            failure: None,
        }
    }

    /// Report for a case whose measurement failed outright.
    pub fn failed(name: impl Into<String>, error: &Error) -> Self {
        Self {
            name: name.into(),
            status: CaseStatus::Failed,
            complete: false,
            metrics: None,
            warning: None,
            failure: Some(FailureInfo::from_error(error)),
        }
    }
}

impl RunSummary {
    /// Tally case reports into run totals.
    pub fn tally(cases: &[CaseReport], total_wall_ms: f64) -> Self {
        let mut summary = RunSummary {
            total_cases: cases.len(),
            total_wall_ms,
            ..Default::default()
        };
        for case in cases {
            match case.status {
                CaseStatus::Measured => summary.measured += 1,
                CaseStatus::Incomplete => summary.incomplete += 1,
                CaseStatus::Failed => summary.failed += 1,
            }
        }
        summary
    }
}
