//! Adaptive Cycle Sizing
//!
//! One clock reading is uncertain by up to half a tick, so a measured
//! duration `D` on a clock with resolution `R` carries a relative error
//! of about `(R / 2) / D`. Bounding that error by a target `e` means
//! every cycle must run for at least `R / (2 e)`: a 15 ms timer needs
//! 750 ms per cycle for 1% error, a 1 ms timer needs 50 ms.
//!
//! The sampler starts at N = 1 (or the previous cycle's stabilized N),
//! doubles while the measured cycle is far below the minimum, then
//! refines by linear interpolation toward the target. Every attempt is
//! a complete cycle; undersized attempts are discarded.

use std::time::Duration;

use tracing::{debug, trace};

use crate::case::RunnableCase;
use crate::clock::Clock;
use crate::sample::Sample;

/// Sizing attempts before giving up on a case. Doubling alone covers
/// the whole u64 range well within this budget, so hitting it means
/// the clock is not advancing the way its resolution promised.
pub const MAX_SIZING_ATTEMPTS: u32 = 64;

/// A cycle of this many iterations that still measures as zero elapsed
/// time means the clock is not advancing at all: even sub-nanosecond
/// work crosses a coarse 15 ms tick millions of iterations below this.
const STUCK_ITERATION_LIMIT: u64 = 1 << 26;

/// Adaptive sizing failed to produce a large-enough cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cycle never reached {required:?} within {attempts} sizing attempts")]
pub struct SizingError {
    /// Minimum cycle duration demanded by the error target.
    pub required: Duration,
    /// Attempts made before giving up.
    pub attempts: u32,
}

/// Produces samples whose cycle time is long enough that clock
/// quantization stays within the target relative error.
pub struct Sampler<'c> {
    clock: &'c dyn Clock,
    min_cycle: Duration,
    hint: u64,
}

impl<'c> Sampler<'c> {
    /// Create a sampler for a validated target relative error.
    pub fn new(clock: &'c dyn Clock, target_relative_error: f64) -> Self {
        let min_cycle = min_cycle_duration(clock.resolution(), target_relative_error);
        Self {
            clock,
            min_cycle,
            hint: 1,
        }
    }

    /// Minimum per-cycle elapsed time this sampler enforces.
    pub fn min_cycle_duration(&self) -> Duration {
        self.min_cycle
    }

    /// Iteration count the next cycle will start from.
    pub fn size_hint(&self) -> u64 {
        self.hint
    }

    /// Run cycles of growing size until one meets the minimum duration,
    /// and return that cycle's sample.
    pub fn collect(&mut self, case: &mut dyn RunnableCase) -> Result<Sample, SizingError> {
        let mut n = self.hint.max(1);

        for attempt in 1..=MAX_SIZING_ATTEMPTS {
            let sample = case.run_cycle(n, self.clock);

            if sample.elapsed >= self.min_cycle {
                if n != self.hint {
                    debug!(case = case.name(), iterations = n, "cycle size stabilized");
                }
                self.hint = n;
                return Ok(sample);
            }

            // Bail out early on a dead clock instead of doubling toward
            // u64::MAX worth of work.
            if sample.elapsed.is_zero() && n >= STUCK_ITERATION_LIMIT {
                return Err(SizingError {
                    required: self.min_cycle,
                    attempts: attempt,
                });
            }

            let next = next_iteration_count(n, sample.elapsed, self.min_cycle);
            trace!(
                case = case.name(),
                iterations = n,
                elapsed_ns = sample.elapsed.as_nanos() as u64,
                next,
                "cycle under minimum, resizing"
            );
            n = next;
        }

        Err(SizingError {
            required: self.min_cycle,
            attempts: MAX_SIZING_ATTEMPTS,
        })
    }
}

/// Minimum cycle duration for a clock resolution and error target:
/// `resolution / (2 * target)`.
pub fn min_cycle_duration(resolution: Duration, target_relative_error: f64) -> Duration {
    let nanos = resolution.as_nanos() as f64 / (2.0 * target_relative_error);
    Duration::from_nanos(nanos.ceil() as u64)
}

/// Choose the next iteration count after an undersized cycle.
///
/// Far from the target (or with nothing measurable at all) the timing
/// carries no usable signal, so N doubles. Close to the target, N is
/// interpolated linearly with 10% headroom so the next attempt usually
/// lands past the minimum.
fn next_iteration_count(n: u64, elapsed: Duration, required: Duration) -> u64 {
    if elapsed.is_zero() || elapsed * 8 < required {
        return n.saturating_mul(2);
    }

    let ratio = required.as_nanos() as f64 / elapsed.as_nanos() as f64;
    let scaled = (n as f64 * ratio * 1.1).ceil() as u64;
    scaled.max(n + 1)
}
