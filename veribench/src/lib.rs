#![warn(missing_docs)]
//! # Veribench
//!
//! Statistical micro-benchmark harness built around clock quantization:
//! - **Adaptive cycle sizing**: cycles grow until the clock's tick size
//!   contributes less than the target relative error
//! - **Explicit scratch state**: setup builds it, work mutates it,
//!   teardown consumes it, once per cycle
//! - **Defensible estimates**: margin of error from Student's t (small
//!   sample counts) or the normal quantile, at an enumerated confidence
//!   level
//! - **Honest comparison**: overlapping confidence intervals are
//!   reported as indistinguishable, not ranked by noise
//! - **Failure isolation**: a panicking case is recorded on its own
//!   report and never takes down its siblings
//!
//! ## Quick Start
//!
//! ```no_run
//! use veribench::prelude::*;
//!
//! fn main() -> Result<(), veribench::Error> {
//!     let mut run = Run::new()?;
//!     run.register(Case::new("sum", || (0u64..1000).sum::<u64>()))?;
//!     run.register(Case::with_state(
//!         "sort",
//!         || (0..1000u64).rev().collect::<Vec<_>>(),
//!         |v| v.sort_unstable(),
//!     ))?;
//!
//!     let report = run.execute();
//!     println!("{}", veribench::format_human_output(&report));
//!     Ok(())
//! }
//! ```

mod config;
mod run;

pub use config::{HarnessConfig, OutputSection, RunSection};
pub use run::{CaseId, Run};

// Re-export the measurement core
pub use veribench_core::{
    Case, CaseConfig, CaseOverrides, Clock, ClockError, Completion, ConfidenceLevel, ConfigError,
    Error, ManualClock, MonotonicClock, Sample, SampleSet, TrimPolicy,
};

// Re-export statistics
pub use veribench_stats::{
    compare_cases, compute_statistics, ComparisonResult, PairwiseComparison, RankedCase,
    Statistics, TrimSummary, Verdict,
};

// Re-export reporting
pub use veribench_report::{
    format_human_output, to_json, CaseReport, CaseStatus, RunReport, RunSummary, SystemInfo,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Case, CaseConfig, CaseOverrides, ConfidenceLevel, Run, RunReport, TrimPolicy, Verdict,
    };
}
