//! Terminal Output
//!
//! Plain-text rendering of a run report: per-case metrics with status
//! icons, the ranking with pairwise verdicts, and run totals.

use veribench_stats::Verdict;

use crate::report::{CaseStatus, RunReport};

/// Format a run report for human-readable terminal display.
pub fn format_human_output(report: &RunReport) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Veribench Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    for case in &report.cases {
        let status_icon = match case.status {
            CaseStatus::Measured => "✓",
            CaseStatus::Incomplete => "⚠",
            CaseStatus::Failed => "✗",
        };
        output.push_str(&format!("  {} {}\n", status_icon, case.name));

        if let Some(metrics) = &case.metrics {
            output.push_str(&format!(
                "      mean: {:.2} ns ± {:.2} ns ({:.0}% CI)  stddev: {:.2} ns\n",
                metrics.mean_ns,
                metrics.margin_of_error_ns,
                metrics.confidence_level * 100.0,
                metrics.std_dev_ns
            ));
            output.push_str(&format!(
                "      throughput: {}  samples: {}  measured: {:.2} ms\n",
                format_rate(metrics.ops_per_sec),
                metrics.sample_count,
                metrics.total_elapsed_ns as f64 / 1e6
            ));
            if metrics.trim.discarded > 0 {
                output.push_str(&format!(
                    "      trimmed: {} outlier sample(s) discarded\n",
                    metrics.trim.discarded
                ));
            }
        }

        if let Some(warning) = &case.warning {
            output.push_str(&format!("      warning: {}\n", warning));
        }
        if let Some(failure) = &case.failure {
            output.push_str(&format!("      error ({}): {}\n", failure.kind, failure.message));
        }
        output.push('\n');
    }

    if let Some(comparison) = &report.comparison {
        output.push_str("Ranking (by throughput)\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');

        let max_name_len = comparison
            .ranking
            .iter()
            .map(|r| r.name.len())
            .max()
            .unwrap_or(20);

        for (position, entry) in comparison.ranking.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {:<width$}  {}\n",
                position + 1,
                entry.name,
                format_rate(entry.ops_per_sec),
                width = max_name_len
            ));
        }

        output.push('\n');
        for pair in &comparison.pairwise {
            let line = match pair.verdict {
                Verdict::Indistinguishable => format!(
                    "  {} vs {}: indistinguishable (nominal {:+.1}%, within noise)",
                    pair.baseline, pair.contender, pair.relative_change_pct
                ),
                Verdict::Faster => format!(
                    "  {} vs {}: {} is faster ({:+.1}%)",
                    pair.baseline, pair.contender, pair.contender, pair.relative_change_pct
                ),
                Verdict::Slower => format!(
                    "  {} vs {}: {} is slower ({:+.1}%)",
                    pair.baseline, pair.contender, pair.contender, pair.relative_change_pct
                ),
            };
            output.push_str(&line);
            output.push('\n');
        }
        output.push('\n');
    }

    output.push_str("Summary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Cases: {}  Measured: {}  Incomplete: {}  Failed: {}\n",
        report.summary.total_cases,
        report.summary.measured,
        report.summary.incomplete,
        report.summary.failed
    ));
    output.push_str(&format!("  Duration: {:.2} ms\n", report.summary.total_wall_ms));

    output
}

/// Render a rate with a unit that keeps the mantissa readable.
fn format_rate(ops_per_sec: f64) -> String {
    if ops_per_sec >= 1e9 {
        format!("{:.2} Gop/s", ops_per_sec / 1e9)
    } else if ops_per_sec >= 1e6 {
        format!("{:.2} Mop/s", ops_per_sec / 1e6)
    } else if ops_per_sec >= 1e3 {
        format!("{:.2} Kop/s", ops_per_sec / 1e3)
    } else {
        format!("{:.2} op/s", ops_per_sec)
    }
}
