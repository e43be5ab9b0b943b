//! Run Orchestration
//!
//! A [`Run`] owns the clock, the run-level defaults, and the registered
//! cases. Executing it measures every case in registration order,
//! computes statistics, compares the complete cases, and assembles the
//! final [`RunReport`].
//!
//! A failure inside one case's work is caught and recorded on that
//! case's report; sibling cases still run to completion.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use tracing::{debug, warn};

use veribench_core::{
    Case, CaseConfig, Clock, ConfigError, CycleRunner, Error, MonotonicClock, RunnableCase,
};
use veribench_report::{build_report_meta, CaseReport, RunReport, RunSummary};
use veribench_stats::{compare_cases, compute_statistics, ComparisonResult, Statistics, StatsError};

/// Handle for a registered case, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseId(usize);

impl CaseId {
    /// Position of the case in the run's registry.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A measurement run: clock, defaults, and the case registry.
pub struct Run {
    clock: Box<dyn Clock>,
    defaults: CaseConfig,
    cases: Vec<Box<dyn RunnableCase>>,
}

impl Run {
    /// A run against the monotonic system clock with default settings.
    ///
    /// Fails if the clock's resolution cannot be measured.
    pub fn new() -> Result<Self, Error> {
        let clock = MonotonicClock::new()?;
        Ok(Self::with_clock(clock))
    }

    /// A run against an explicit clock, usually a deterministic one in
    /// tests.
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            defaults: CaseConfig::default(),
            cases: Vec::new(),
        }
    }

    /// Replace the run-level defaults. The defaults are validated here
    /// so a bad configuration is rejected before anything is measured.
    pub fn with_defaults(mut self, defaults: CaseConfig) -> Result<Self, Error> {
        defaults.validate()?;
        self.defaults = defaults;
        Ok(self)
    }

    /// Register a case. Its resolved configuration is validated now,
    /// and its name must be unique within the run.
    pub fn register<S: 'static>(&mut self, case: Case<S>) -> Result<CaseId, Error> {
        self.defaults.resolve(case.overrides()).validate()?;
        if self.cases.iter().any(|c| c.name() == case.name()) {
            return Err(ConfigError::DuplicateName(case.name().to_string()).into());
        }
        self.cases.push(Box::new(case));
        Ok(CaseId(self.cases.len() - 1))
    }

    /// Number of registered cases.
    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    /// Measure every registered case and assemble the report.
    ///
    /// Cases run in registration order. A panic inside a case's setup,
    /// work, or teardown is recorded as that case's failure and does
    /// not abort the run.
    pub fn execute(&mut self) -> RunReport {
        let wall_start = Instant::now();
        let mut reports = Vec::with_capacity(self.cases.len());
        let mut measured: Vec<(String, Statistics)> = Vec::new();

        for case in &mut self.cases {
            let name = case.name().to_string();
            let config = self.defaults.resolve(case.overrides());
            debug!(case = %name, ?config, "measuring case");

            let outcome = catch_unwind(AssertUnwindSafe(|| {
                let mut runner = CycleRunner::new(self.clock.as_ref(), config.clone());
                runner.run(case.as_mut())
            }));

            let report = match outcome {
                Ok(Ok(run)) => match compute_statistics(&run.samples, &config, run.completion) {
                    Ok(stats) => {
                        debug!(
                            case = %name,
                            samples = stats.sample_count,
                            mean_ns = stats.mean_ns,
                            "case measured"
                        );
                        let report = CaseReport::measured(&name, &stats);
                        measured.push((name, stats));
                        report
                    }
                    Err(StatsError::InsufficientSamples { have }) => {
                        warn!(case = %name, samples = have, "not enough samples for statistics");
                        CaseReport::incomplete(&name, have)
                    }
                },
                Ok(Err(sizing)) => {
                    warn!(case = %name, %sizing, "cycle sizing failed");
                    let error = Error::CycleSizing {
                        case: name.clone(),
                        required: sizing.required,
                        attempts: sizing.attempts,
                    };
                    CaseReport::failed(&name, &error)
                }
                Err(panic) => {
                    let message = panic_message(panic);
                    warn!(case = %name, message = %message, "case panicked");
                    let error = Error::Work {
                        case: name.clone(),
                        message,
                    };
                    CaseReport::failed(&name, &error)
                }
            };
            reports.push(report);
        }

        let comparison = self.compare_measured(&measured);
        let summary = RunSummary::tally(&reports, wall_start.elapsed().as_secs_f64() * 1e3);

        RunReport {
            meta: build_report_meta(),
            cases: reports,
            comparison,
            summary,
        }
    }

    /// Compare the cases whose stopping rule was satisfied. Incomplete
    /// cases are excluded rather than failing the comparison.
    fn compare_measured(&self, measured: &[(String, Statistics)]) -> Option<ComparisonResult> {
        let comparable: Vec<(&str, &Statistics)> = measured
            .iter()
            .filter(|(name, stats)| {
                if stats.is_complete() {
                    true
                } else {
                    warn!(case = %name, "excluding incomplete case from comparison");
                    false
                }
            })
            .map(|(name, stats)| (name.as_str(), stats))
            .collect();

        if comparable.len() < 2 {
            return None;
        }
        match compare_cases(&comparable) {
            Ok(result) => Some(result),
            Err(err) => {
                warn!(%err, "comparison failed");
                None
            }
        }
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
