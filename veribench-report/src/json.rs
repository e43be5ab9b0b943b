//! JSON Output

use crate::report::RunReport;

/// Serialize a run report as prettified JSON.
///
/// This is the wire format the persistence and presentation
/// collaborators consume.
pub fn to_json(report: &RunReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::SystemInfo;
    use crate::report::{CaseReport, ReportMeta, RunSummary};

    #[test]
    fn report_round_trips_through_json() {
        let error = veribench_core::Error::Work {
            case: "x".to_string(),
            message: "panicked".to_string(),
        };
        let cases = vec![CaseReport::failed("x", &error)];
        let summary = RunSummary::tally(&cases, 3.0);
        let report = RunReport {
            meta: ReportMeta {
                version: "0.1.0".to_string(),
                timestamp: chrono::Utc::now(),
                system: SystemInfo {
                    os: "linux".to_string(),
                    arch: "x86_64".to_string(),
                    cpu: "test cpu".to_string(),
                    cpu_cores: 4,
                    memory_gb: 8.0,
                },
            },
            cases,
            comparison: None,
            summary,
        };

        let json = to_json(&report).unwrap();
        let parsed: RunReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.cases.len(), 1);
        assert_eq!(parsed.cases[0].name, "x");
        assert_eq!(parsed.summary.failed, 1);
    }
}
