//! Report assembly and rendering for veribench runs.
//!
//! A run produces a single [`RunReport`] that carries per-case metrics,
//! the cross-case comparison, environment metadata, and a tally of how
//! the run went. The report serializes cleanly to JSON via [`to_json`]
//! and renders to a terminal-friendly string via [`format_human_output`].

#![warn(missing_docs)]

pub mod human;
pub mod json;
pub mod meta;
pub mod report;

pub use human::format_human_output;
pub use json::to_json;
pub use meta::{build_report_meta, SystemInfo};
pub use report::{
    CaseMetrics, CaseReport, CaseStatus, FailureInfo, ReportMeta, RunReport, RunSummary,
};
