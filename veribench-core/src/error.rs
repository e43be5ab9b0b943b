//! Error Taxonomy
//!
//! Configuration and clock failures surface immediately to the caller;
//! a failure inside a case's work is isolated to that case and recorded
//! on its report instead of aborting sibling cases.

use std::time::Duration;

/// The clock cannot provide the guarantees measurement depends on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// The timer never advanced while probing its tick size.
    #[error("clock resolution could not be determined: timer did not advance")]
    ResolutionUndetermined,
}

/// Invalid configuration, rejected at registration time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Target relative error must be in (0, 1).
    #[error("target relative error must be in (0, 1), got {0}")]
    TargetRelativeError(f64),

    /// At least two samples are needed to estimate variance.
    #[error("minimum sample count must be at least 2, got {0}")]
    MinSamples(usize),

    /// A zero maximum run time would never admit a cycle.
    #[error("maximum run duration must be non-zero")]
    ZeroMaxRunDuration,

    /// The stopping rule could never be satisfied before the cutoff.
    #[error("minimum total duration {min_total:?} exceeds maximum run duration {max_run:?}")]
    MinTotalExceedsMaxRun {
        /// Configured minimum aggregate measurement time.
        min_total: Duration,
        /// Configured wall-clock cutoff.
        max_run: Duration,
    },

    /// A trimming bound that cannot select any samples.
    #[error("invalid trim bound: {0}")]
    TrimBound(String),

    /// Case names identify results and must be unique within a run.
    #[error("duplicate case name: {0:?}")]
    DuplicateName(String),
}

/// Top-level harness error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration; nothing was measured.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The clock is unusable; the whole run is abandoned.
    #[error(transparent)]
    Clock(#[from] ClockError),

    /// Adaptive sizing could not reach the minimum cycle duration.
    #[error(
        "case {case:?}: could not size a cycle to {required:?} within {attempts} attempts"
    )]
    CycleSizing {
        /// Name of the case being sized.
        case: String,
        /// Minimum cycle duration demanded by the error target.
        required: Duration,
        /// Number of sizing attempts made before giving up.
        attempts: u32,
    },

    /// The measured operation failed during a cycle.
    #[error("case {case:?} failed during measurement: {message}")]
    Work {
        /// Name of the failing case.
        case: String,
        /// Panic payload rendered as text.
        message: String,
    },
}
