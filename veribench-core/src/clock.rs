//! Monotonic Time Sources
//!
//! Every timing guarantee downstream (cycle sizing, margin of error)
//! depends on knowing the clock's resolution, so a clock that cannot
//! report one is refused at construction rather than guessed at.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::error::ClockError;

/// Maximum spins while waiting for `Instant::now()` to change before
/// declaring the resolution undeterminable.
const RESOLUTION_SPIN_LIMIT: u32 = 10_000_000;

/// Number of tick observations taken; the smallest is the resolution.
const RESOLUTION_TRIALS: usize = 8;

/// A monotonic time source with a known resolution.
///
/// `now()` is a timestamp relative to an arbitrary fixed origin; only
/// differences between timestamps are meaningful.
pub trait Clock {
    /// Current monotonically non-decreasing timestamp.
    fn now(&self) -> Duration;

    /// Smallest time increment this clock can reliably distinguish.
    fn resolution(&self) -> Duration;
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn resolution(&self) -> Duration {
        (**self).resolution()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn resolution(&self) -> Duration {
        (**self).resolution()
    }
}

/// The system monotonic clock (`std::time::Instant`), with its
/// resolution measured empirically at construction.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: std::time::Instant,
    resolution: Duration,
}

impl MonotonicClock {
    /// Create a clock, measuring the tick size of `Instant::now()`.
    ///
    /// Fails with [`ClockError::ResolutionUndetermined`] if the
    /// underlying timer never advances within the spin budget.
    pub fn new() -> Result<Self, ClockError> {
        let resolution = measure_resolution()?;
        Ok(Self {
            origin: std::time::Instant::now(),
            resolution,
        })
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn resolution(&self) -> Duration {
        self.resolution
    }
}

/// Measure the smallest observable tick of `Instant::now()`.
///
/// Spins until the reading changes and records the delta, several
/// times over; the minimum delta is taken as the resolution. A timer
/// that never advances is unusable for measurement.
fn measure_resolution() -> Result<Duration, ClockError> {
    let mut smallest: Option<Duration> = None;

    for _ in 0..RESOLUTION_TRIALS {
        let start = std::time::Instant::now();
        let mut spins = 0u32;
        let tick = loop {
            let elapsed = start.elapsed();
            if !elapsed.is_zero() {
                break elapsed;
            }
            spins += 1;
            if spins >= RESOLUTION_SPIN_LIMIT {
                return Err(ClockError::ResolutionUndetermined);
            }
        };
        smallest = Some(match smallest {
            Some(best) => best.min(tick),
            None => tick,
        });
    }

    smallest.ok_or(ClockError::ResolutionUndetermined)
}

/// A deterministic clock driven by the test, with a configurable
/// quantization step.
///
/// `now()` rounds the internal counter down to a multiple of the
/// resolution, so sub-tick advances are invisible exactly as they are
/// on a coarse hardware timer. Share it between the harness and the
/// workload via `Rc` and advance it from inside the work closure to
/// simulate work of a known duration.
#[derive(Debug)]
pub struct ManualClock {
    nanos: Cell<u64>,
    resolution: Duration,
}

impl ManualClock {
    /// Create a manual clock with the given quantization step.
    pub fn with_resolution(resolution: Duration) -> Self {
        Self {
            nanos: Cell::new(0),
            resolution,
        }
    }

    /// Advance the underlying counter by `d`.
    pub fn advance(&self, d: Duration) {
        self.nanos.set(self.nanos.get() + d.as_nanos() as u64);
    }

    /// Raw (unquantized) counter value.
    pub fn raw(&self) -> Duration {
        Duration::from_nanos(self.nanos.get())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        let step = self.resolution.as_nanos() as u64;
        let now = self.nanos.get();
        if step <= 1 {
            return Duration::from_nanos(now);
        }
        Duration::from_nanos(now - now % step)
    }

    fn resolution(&self) -> Duration {
        self.resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_reports_resolution() {
        let clock = MonotonicClock::new().unwrap();
        assert!(!clock.resolution().is_zero());

        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn manual_clock_quantizes_to_resolution() {
        let clock = ManualClock::with_resolution(Duration::from_millis(1));

        clock.advance(Duration::from_micros(700));
        assert_eq!(clock.now(), Duration::ZERO);

        clock.advance(Duration::from_micros(700));
        assert_eq!(clock.now(), Duration::from_millis(1));
        assert_eq!(clock.raw(), Duration::from_micros(1400));
    }

    #[test]
    fn manual_clock_through_rc() {
        let clock = Rc::new(ManualClock::with_resolution(Duration::from_nanos(1)));
        clock.advance(Duration::from_secs(1));
        assert_eq!(Clock::now(&clock), Duration::from_secs(1));
    }
}
