//! Cycle Orchestration and the Stopping Rule
//!
//! Requests cycles from the sampler until the sample set satisfies the
//! stopping rule: at least `min_samples` samples AND at least
//! `min_total_duration` of aggregate measured time. A wall-clock
//! cutoff is enforced only between cycles; a running cycle always
//! finishes, so no partial cycle is ever recorded.

use tracing::{debug, warn};

use crate::case::RunnableCase;
use crate::clock::Clock;
use crate::config::CaseConfig;
use crate::sample::SampleSet;
use crate::sampler::{Sampler, SizingError};

/// How a case's measurement ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Completion {
    /// Both stopping-rule minima were met.
    Satisfied,
    /// The wall-clock cutoff hit first, but the minimum sample count
    /// was met; the result is usable.
    TimeLimited,
    /// The cutoff hit before the minimum sample count; the result must
    /// not be compared against others.
    Incomplete,
}

impl Completion {
    /// Whether the sample set satisfies the minimum-count requirement.
    pub fn is_complete(self) -> bool {
        !matches!(self, Completion::Incomplete)
    }
}

/// Collected samples for one case, plus how collection ended.
#[derive(Debug, Clone)]
pub struct CaseRun {
    /// Samples in arrival order.
    pub samples: SampleSet,
    /// Stopping-rule outcome.
    pub completion: Completion,
}

/// Runs repeated cycles around one case and accumulates its sample set.
pub struct CycleRunner<'c> {
    clock: &'c dyn Clock,
    config: CaseConfig,
    sampler: Sampler<'c>,
}

impl<'c> CycleRunner<'c> {
    /// Create a runner for a validated configuration.
    pub fn new(clock: &'c dyn Clock, config: CaseConfig) -> Self {
        let sampler = Sampler::new(clock, config.target_relative_error);
        Self {
            clock,
            config,
            sampler,
        }
    }

    /// Measure a case until the stopping rule or the cutoff decides.
    pub fn run(&mut self, case: &mut dyn RunnableCase) -> Result<CaseRun, SizingError> {
        let started = self.clock.now();
        let mut samples = SampleSet::new();

        let completion = loop {
            let count_met = samples.len() >= self.config.min_samples;
            let duration_met = samples.total_elapsed() >= self.config.min_total_duration;
            if count_met && duration_met {
                break Completion::Satisfied;
            }

            // Cutoff applies only at cycle boundaries.
            let wall = self.clock.now().saturating_sub(started);
            if wall >= self.config.max_run_duration {
                if count_met {
                    warn!(
                        case = case.name(),
                        samples = samples.len(),
                        "run cut off by maximum duration; result is time-limited"
                    );
                    break Completion::TimeLimited;
                }
                warn!(
                    case = case.name(),
                    samples = samples.len(),
                    needed = self.config.min_samples,
                    "run cut off before minimum sample count; result is incomplete"
                );
                break Completion::Incomplete;
            }

            let sample = self.sampler.collect(case)?;
            debug!(
                case = case.name(),
                cycle = samples.len() + 1,
                iterations = sample.iterations,
                elapsed_ns = sample.elapsed.as_nanos() as u64,
                "cycle recorded"
            );
            samples.push(sample);
        };

        Ok(CaseRun {
            samples,
            completion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::Case;
    use crate::clock::ManualClock;
    use crate::config::CaseConfig;
    use std::rc::Rc;
    use std::time::Duration;

    fn ticking_case(clock: &Rc<ManualClock>, per_iteration: Duration) -> Case<()> {
        let work_clock = Rc::clone(clock);
        Case::new("tick", move || work_clock.advance(per_iteration))
    }

    fn millisecond_clock() -> Rc<ManualClock> {
        Rc::new(ManualClock::with_resolution(Duration::from_millis(1)))
    }

    #[test]
    fn satisfies_both_minima() {
        let clock = millisecond_clock();
        let mut case = ticking_case(&clock, Duration::from_micros(10));

        let config = CaseConfig {
            min_samples: 5,
            min_total_duration: Duration::from_millis(200),
            max_run_duration: Duration::from_secs(30),
            ..Default::default()
        };
        let mut runner = CycleRunner::new(&clock, config);
        let run = runner.run(&mut case).unwrap();

        assert_eq!(run.completion, Completion::Satisfied);
        assert!(run.samples.len() >= 5);
        assert!(run.samples.total_elapsed() >= Duration::from_millis(200));
        // Every recorded cycle individually meets the 50 ms sizing floor.
        for sample in run.samples.samples() {
            assert!(sample.elapsed >= Duration::from_millis(50));
        }
    }

    #[test]
    fn cutoff_with_enough_samples_is_time_limited() {
        let clock = millisecond_clock();
        let mut case = ticking_case(&clock, Duration::from_micros(10));

        // The aggregate-duration minimum equals the cutoff, so the
        // cutoff always lands first while samples keep accumulating.
        let config = CaseConfig {
            min_samples: 2,
            min_total_duration: Duration::from_millis(300),
            max_run_duration: Duration::from_millis(300),
            ..Default::default()
        };
        let mut runner = CycleRunner::new(&clock, config);
        let run = runner.run(&mut case).unwrap();

        assert_eq!(run.completion, Completion::TimeLimited);
        assert!(run.samples.len() >= 2);
        assert!(run.completion.is_complete());
    }

    #[test]
    fn cutoff_before_min_samples_is_incomplete() {
        let clock = millisecond_clock();
        let mut case = ticking_case(&clock, Duration::from_micros(10));

        let config = CaseConfig {
            min_samples: 5,
            min_total_duration: Duration::from_millis(100),
            max_run_duration: Duration::from_millis(100),
            ..Default::default()
        };
        let mut runner = CycleRunner::new(&clock, config);
        let run = runner.run(&mut case).unwrap();

        assert_eq!(run.completion, Completion::Incomplete);
        assert!(run.samples.len() < 5);
        assert!(!run.completion.is_complete());
    }

    #[test]
    fn running_cycle_finishes_before_cutoff_applies() {
        let clock = millisecond_clock();
        let mut case = ticking_case(&clock, Duration::from_micros(10));

        let config = CaseConfig {
            min_samples: 2,
            min_total_duration: Duration::from_millis(60),
            max_run_duration: Duration::from_millis(60),
            ..Default::default()
        };
        let mut runner = CycleRunner::new(&clock, config);
        let run = runner.run(&mut case).unwrap();

        // The cycle in flight when the cutoff passed was still recorded
        // whole: no sample is a truncated cycle.
        for sample in run.samples.samples() {
            assert!(sample.elapsed >= Duration::from_millis(50));
        }
    }
}
