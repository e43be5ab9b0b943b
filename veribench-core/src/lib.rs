#![warn(missing_docs)]
//! Veribench Core - Measurement Runtime
//!
//! This crate provides the measurement machinery of the harness:
//! - `Clock` abstraction with empirically measured resolution
//! - `Case` with explicit scratch state and the cycle contract
//! - `Sampler` adaptive cycle sizing against clock quantization
//! - `CycleRunner` stopping rule and sample accumulation
//! - Validated per-case configuration and the error taxonomy
//!
//! Statistics and reporting live in `veribench-stats` and
//! `veribench-report`; the `veribench` facade ties everything together.

mod case;
mod clock;
mod config;
mod error;
mod runner;
mod sample;
mod sampler;

pub use case::{Case, RunnableCase};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{CaseConfig, CaseOverrides, ConfidenceLevel, TrimPolicy};
pub use error::{ClockError, ConfigError, Error};
pub use runner::{CaseRun, Completion, CycleRunner};
pub use sample::{Sample, SampleSet};
pub use sampler::{min_cycle_duration, Sampler, SizingError, MAX_SIZING_ATTEMPTS};
