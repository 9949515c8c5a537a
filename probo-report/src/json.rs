//! JSON Output

use crate::report::BenchReport;

/// Generate a prettified JSON report.
pub fn generate_json_report(report: &BenchReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
