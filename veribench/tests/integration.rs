//! Integration tests for veribench
//!
//! These tests drive whole runs end to end against a deterministic
//! manual clock: the workload advances the clock from inside its work
//! closure, so cycle sizing, the stopping rule, and the statistics are
//! all exact and repeatable.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use veribench::{
    format_human_output, to_json, Case, CaseConfig, CaseOverrides, CaseStatus, ManualClock, Run,
    RunReport, Verdict,
};

/// A clock with a 1 ms tick; at the default 1% error target every
/// cycle must span at least 50 ms of it.
fn millisecond_clock() -> Rc<ManualClock> {
    Rc::new(ManualClock::with_resolution(Duration::from_millis(1)))
}

/// A case whose every work invocation advances the shared clock.
fn ticking_case(name: &str, clock: &Rc<ManualClock>, per_iteration: Duration) -> Case<()> {
    let work_clock = Rc::clone(clock);
    Case::new(name, move || work_clock.advance(per_iteration))
}

/// Test that a simulated workload runs to a complete report
#[test]
fn measured_case_produces_complete_report() {
    let clock = millisecond_clock();
    let mut run = Run::with_clock(Rc::clone(&clock));
    run.register(ticking_case("tick", &clock, Duration::from_micros(200)))
        .unwrap();

    let report = run.execute();

    assert_eq!(report.cases.len(), 1);
    let case = &report.cases[0];
    assert_eq!(case.status, CaseStatus::Measured);
    assert!(case.complete);
    assert!(case.warning.is_none());

    let metrics = case.metrics.as_ref().unwrap();
    // Default stopping rule: at least 5 samples and 500 ms aggregate.
    assert!(metrics.sample_count >= 5);
    assert!(metrics.total_elapsed_ns >= 500_000_000);
    // The simulated work costs 200 µs per iteration; quantization on a
    // 50 ms cycle stays within the 1% target by a wide margin.
    assert!((metrics.mean_ns - 200_000.0).abs() < 200_000.0 * 0.05);
    assert!(metrics.ops_per_sec > 0.0);

    assert_eq!(report.summary.total_cases, 1);
    assert_eq!(report.summary.measured, 1);
    // A single case has nothing to be compared against.
    assert!(report.comparison.is_none());
}

/// Test that a clearly faster case wins the ranking with a significant verdict
#[test]
fn faster_case_ranks_first_with_significant_verdict() {
    let clock = millisecond_clock();
    let mut run = Run::with_clock(Rc::clone(&clock));
    run.register(ticking_case("fast", &clock, Duration::from_micros(100)))
        .unwrap();
    run.register(ticking_case("slow", &clock, Duration::from_micros(400)))
        .unwrap();

    let report = run.execute();
    let comparison = report.comparison.as_ref().unwrap();

    assert_eq!(comparison.ranking[0].name, "fast");
    assert_eq!(comparison.ranking[1].name, "slow");

    assert_eq!(comparison.pairwise.len(), 1);
    let pair = &comparison.pairwise[0];
    assert_eq!(pair.baseline, "fast");
    assert_eq!(pair.contender, "slow");
    // 4x the mean duration: far outside any confidence interval.
    assert_eq!(pair.verdict, Verdict::Slower);
    assert!(pair.relative_change_pct > 250.0);

    // The same pair read the other way around.
    let reverse = pair.reversed();
    assert_eq!(reverse.verdict, Verdict::Faster);
    assert!(reverse.relative_change_pct < -60.0);
}

/// Test that a panicking case is recorded as failed while siblings complete
#[test]
fn panicking_case_is_isolated_from_siblings() {
    let clock = millisecond_clock();
    let mut run = Run::with_clock(Rc::clone(&clock));

    let invocations = Rc::new(Cell::new(0u64));
    let counter = Rc::clone(&invocations);
    let boom_clock = Rc::clone(&clock);
    run.register(Case::new("boom", move || {
        counter.set(counter.get() + 1);
        if counter.get() == 3 {
            panic!("boom on invocation 3");
        }
        boom_clock.advance(Duration::from_micros(200));
    }))
    .unwrap();
    run.register(ticking_case("steady", &clock, Duration::from_micros(200)))
        .unwrap();

    let report = run.execute();

    let boom = report.cases.iter().find(|c| c.name == "boom").unwrap();
    assert_eq!(boom.status, CaseStatus::Failed);
    assert!(!boom.complete);
    let failure = boom.failure.as_ref().unwrap();
    assert_eq!(failure.kind, "work");
    assert!(failure.message.contains("boom on invocation 3"));

    let steady = report.cases.iter().find(|c| c.name == "steady").unwrap();
    assert_eq!(steady.status, CaseStatus::Measured);
    assert!(steady.complete);

    assert_eq!(report.summary.measured, 1);
    assert_eq!(report.summary.failed, 1);
    // Only one case completed, so there is no comparison.
    assert!(report.comparison.is_none());
}

/// Test that work which never advances the clock fails sizing, not the run
#[test]
fn unsizable_work_is_reported_as_sizing_failure() {
    let clock = millisecond_clock();
    let mut run = Run::with_clock(Rc::clone(&clock));
    run.register(Case::new("frozen", || 42u64)).unwrap();
    run.register(ticking_case("steady", &clock, Duration::from_micros(200)))
        .unwrap();

    let report = run.execute();

    let frozen = report.cases.iter().find(|c| c.name == "frozen").unwrap();
    assert_eq!(frozen.status, CaseStatus::Failed);
    assert_eq!(frozen.failure.as_ref().unwrap().kind, "sizing");

    let steady = report.cases.iter().find(|c| c.name == "steady").unwrap();
    assert!(steady.complete);
}

/// Test that a case cut off before its minimum sample count is excluded
/// from the comparison
#[test]
fn cut_off_case_is_excluded_from_comparison() {
    let clock = millisecond_clock();
    let mut run = Run::with_clock(Rc::clone(&clock));

    // A cutoff equal to two cycles cannot reach five samples.
    let overrides = CaseOverrides {
        min_total_duration: Some(Duration::from_millis(100)),
        max_run_duration: Some(Duration::from_millis(100)),
        ..Default::default()
    };
    run.register(
        ticking_case("truncated", &clock, Duration::from_micros(200)).with_overrides(overrides),
    )
    .unwrap();
    run.register(ticking_case("fast", &clock, Duration::from_micros(100)))
        .unwrap();
    run.register(ticking_case("slow", &clock, Duration::from_micros(400)))
        .unwrap();

    let report = run.execute();

    let truncated = report.cases.iter().find(|c| c.name == "truncated").unwrap();
    assert!(!truncated.complete);
    assert!(truncated.warning.is_some());

    // The two complete cases are still compared with each other.
    let comparison = report.comparison.as_ref().unwrap();
    assert_eq!(comparison.ranking.len(), 2);
    assert!(comparison.ranking.iter().all(|r| r.name != "truncated"));
}

/// Test that per-case overrides shorten the stopping rule
#[test]
fn overrides_shorten_the_stopping_rule() {
    let clock = millisecond_clock();
    let mut run = Run::with_clock(Rc::clone(&clock));

    let overrides = CaseOverrides {
        min_samples: Some(3),
        min_total_duration: Some(Duration::from_millis(150)),
        ..Default::default()
    };
    run.register(
        ticking_case("short", &clock, Duration::from_micros(200)).with_overrides(overrides),
    )
    .unwrap();

    let report = run.execute();
    let metrics = report.cases[0].metrics.as_ref().unwrap();
    assert!(metrics.sample_count >= 3);
    assert!(metrics.total_elapsed_ns >= 150_000_000);
    // Well under what the run-level defaults would have demanded.
    assert!(metrics.total_elapsed_ns < 500_000_000);
}

/// Test that run-level defaults apply to every case without an override
#[test]
fn run_defaults_apply_to_registered_cases() {
    let clock = millisecond_clock();
    let defaults = CaseConfig {
        min_samples: 3,
        min_total_duration: Duration::from_millis(150),
        ..Default::default()
    };
    let mut run = Run::with_clock(Rc::clone(&clock))
        .with_defaults(defaults)
        .unwrap();
    run.register(ticking_case("tick", &clock, Duration::from_micros(200)))
        .unwrap();

    let report = run.execute();
    let metrics = report.cases[0].metrics.as_ref().unwrap();
    assert!(metrics.sample_count >= 3);
    assert!(metrics.total_elapsed_ns < 500_000_000);
}

/// Test that the report serializes to JSON and renders for humans
#[test]
fn report_renders_to_both_output_formats() {
    let clock = millisecond_clock();
    let mut run = Run::with_clock(Rc::clone(&clock));
    run.register(ticking_case("fast", &clock, Duration::from_micros(100)))
        .unwrap();
    run.register(ticking_case("slow", &clock, Duration::from_micros(400)))
        .unwrap();

    let report = run.execute();

    let json = to_json(&report).unwrap();
    let parsed: RunReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.cases.len(), 2);
    assert!(parsed.comparison.is_some());

    let human = format_human_output(&report);
    assert!(human.contains("fast"));
    assert!(human.contains("slow"));
}
