#![warn(missing_docs)]
//! Probo Report - Reporting and Rendering
//!
//! Turns timing and test outcomes into output:
//! - Serializable report structures (JSON, machine-readable)
//! - Human-readable terminal tables
//! - Overlaid ASCII histograms of timing samples

mod format;
mod histogram;
mod json;
mod render;
mod report;

pub use format::TimeFormat;
pub use histogram::render_histogram;
pub use json::generate_json_report;
pub use render::{
    render_bench_table, render_equivalence, render_errored, render_grand_total, render_list,
    render_significance, render_splits, render_unit_banner, render_unit_summary,
};
pub use report::{
    BenchReport, CaseError, CaseResult, EquivalenceSummary, ReportMeta, SignificancePair,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal output
    Human,
    /// JSON with full sample data
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("human".parse::<OutputFormat>(), Ok(OutputFormat::Human));
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
