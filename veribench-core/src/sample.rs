//! Samples and Sample Sets
//!
//! A sample is the timing of one cycle: N back-to-back iterations and
//! the elapsed time around them. The set keeps insertion order so a
//! trend across cycles (state leaking from one cycle into the next)
//! stays visible to diagnostics, even though the statistics themselves
//! are order-free.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing of one measured cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Number of work iterations in the cycle; always at least 1.
    pub iterations: u64,
    /// Elapsed time around the iterations, excluding setup/teardown.
    pub elapsed: Duration,
}

impl Sample {
    /// Create a sample. `iterations` must be at least 1.
    pub fn new(iterations: u64, elapsed: Duration) -> Self {
        assert!(iterations >= 1, "a cycle contains at least one iteration");
        Self {
            iterations,
            elapsed,
        }
    }

    /// Derived per-iteration duration in nanoseconds.
    pub fn per_iteration_ns(&self) -> f64 {
        self.elapsed.as_nanos() as f64 / self.iterations as f64
    }
}

/// Ordered sequence of samples for one case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleSet {
    samples: Vec<Sample>,
}

impl SampleSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample in arrival order.
    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    /// Number of samples collected so far.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no sample has been collected.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in arrival order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Sum of measured cycle times.
    pub fn total_elapsed(&self) -> Duration {
        self.samples.iter().map(|s| s.elapsed).sum()
    }

    /// Total iterations across all cycles.
    pub fn total_iterations(&self) -> u64 {
        self.samples.iter().map(|s| s.iterations).sum()
    }

    /// Per-iteration durations in nanoseconds, in arrival order.
    pub fn per_iteration_ns(&self) -> Vec<f64> {
        self.samples.iter().map(Sample::per_iteration_ns).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_iteration_divides_elapsed() {
        let sample = Sample::new(1000, Duration::from_millis(50));
        assert!((sample.per_iteration_ns() - 50_000.0).abs() < f64::EPSILON);
    }

    #[test]
    #[should_panic(expected = "at least one iteration")]
    fn zero_iterations_rejected() {
        let _ = Sample::new(0, Duration::from_millis(1));
    }

    #[test]
    fn set_accumulates_totals() {
        let mut set = SampleSet::new();
        set.push(Sample::new(10, Duration::from_millis(60)));
        set.push(Sample::new(20, Duration::from_millis(80)));

        assert_eq!(set.len(), 2);
        assert_eq!(set.total_iterations(), 30);
        assert_eq!(set.total_elapsed(), Duration::from_millis(140));

        let per_iter = set.per_iteration_ns();
        assert!((per_iter[0] - 6_000_000.0).abs() < f64::EPSILON);
        assert!((per_iter[1] - 4_000_000.0).abs() < f64::EPSILON);
    }
}
