//! Cases and the Cycle Contract
//!
//! A case owns its scratch state explicitly: setup builds the state,
//! the work mutates it, teardown consumes it. State flows through the
//! cycle as a value, so leakage across cycles is a visible data-flow
//! bug rather than ambient shared state.
//!
//! Every work closure's output is fed through `std::hint::black_box`
//! when the case is built. That is the standard mitigation against
//! dead-code elimination, not a guarantee against every optimizer.

use crate::clock::Clock;
use crate::config::CaseOverrides;
use crate::sample::Sample;

/// A named unit of work to measure, with optional scratch state.
///
/// Stateless case:
///
/// ```
/// use veribench_core::Case;
///
/// let case = Case::new("sum", || (0u64..100).sum::<u64>());
/// assert_eq!(case.name(), "sum");
/// ```
///
/// With scratch state rebuilt each cycle:
///
/// ```
/// use veribench_core::Case;
///
/// let case = Case::with_state(
///     "push",
///     || Vec::<u64>::with_capacity(1024),
///     |v| v.push(1),
/// );
/// assert_eq!(case.name(), "push");
/// ```
pub struct Case<S> {
    name: String,
    overrides: CaseOverrides,
    setup: Box<dyn FnMut() -> S>,
    work: Box<dyn FnMut(&mut S)>,
    teardown: Box<dyn FnMut(S)>,
}

impl Case<()> {
    /// A case with no scratch state.
    pub fn new<T, W>(name: impl Into<String>, mut work: W) -> Self
    where
        W: FnMut() -> T + 'static,
    {
        Case::with_state(name, || (), move |_| work())
    }
}

impl<S: 'static> Case<S> {
    /// A case whose setup rebuilds the scratch state once per cycle.
    pub fn with_state<T, F, W>(name: impl Into<String>, setup: F, mut work: W) -> Self
    where
        F: FnMut() -> S + 'static,
        W: FnMut(&mut S) -> T + 'static,
    {
        Self {
            name: name.into(),
            overrides: CaseOverrides::default(),
            setup: Box::new(setup),
            // The sink: output is observed after every iteration.
            work: Box::new(move |state| {
                std::hint::black_box(work(state));
            }),
            teardown: Box::new(drop),
        }
    }

    /// Replace the default teardown (dropping the state).
    pub fn with_teardown(mut self, teardown: impl FnMut(S) + 'static) -> Self {
        self.teardown = Box::new(teardown);
        self
    }

    /// Attach per-case configuration overrides.
    pub fn with_overrides(mut self, overrides: CaseOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Case name, unique within a run.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Type-erased case, as stored by a run's registry.
///
/// `run_cycle` is the load-bearing contract from the component design:
/// setup exactly once, then `iterations` back-to-back work invocations
/// with nothing interposed, then teardown exactly once. Only the
/// iterations are inside the timed window.
pub trait RunnableCase {
    /// Case name, unique within a run.
    fn name(&self) -> &str;

    /// Per-case configuration overrides.
    fn overrides(&self) -> &CaseOverrides;

    /// Execute one cycle of `iterations` invocations and time it.
    fn run_cycle(&mut self, iterations: u64, clock: &dyn Clock) -> Sample;
}

impl<S: 'static> RunnableCase for Case<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn overrides(&self) -> &CaseOverrides {
        &self.overrides
    }

    fn run_cycle(&mut self, iterations: u64, clock: &dyn Clock) -> Sample {
        let mut state = (self.setup)();

        let start = clock.now();
        for _ in 0..iterations {
            (self.work)(&mut state);
        }
        let elapsed = clock.now().saturating_sub(start);

        (self.teardown)(state);
        Sample::new(iterations.max(1), elapsed)
    }
}
