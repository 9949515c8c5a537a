//! Report Data Structures

use chrono::{DateTime, Utc};
use probo_stats::{PairVerdict, PairwiseMatrix, TimingSummary};
use serde::{Deserialize, Serialize};

/// Complete benchmark report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    /// Run metadata.
    pub meta: ReportMeta,
    /// Per-case timing results.
    pub results: Vec<CaseResult>,
    /// Cases that panicked during timing.
    pub errored: Vec<CaseError>,
    /// Equivalence-check outcome, when a check ran.
    pub equivalence: Option<EquivalenceSummary>,
    /// Pairwise significance results, when a t-test ran.
    pub significance: Vec<SignificancePair>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Crate version that produced the report.
    pub version: String,
    /// When the run finished.
    pub timestamp: DateTime<Utc>,
    /// Benchmark set title, if any.
    pub title: Option<String>,
    /// Routine calls per timing sample.
    pub number: u64,
    /// Timing samples per case.
    pub repeat: usize,
}

/// Timing result for one case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    /// Case name.
    pub name: String,
    /// Smallest sample, nanoseconds.
    pub min_ns: f64,
    /// Mean sample, nanoseconds.
    pub mean_ns: f64,
    /// Median sample, nanoseconds.
    pub median_ns: f64,
    /// Largest sample, nanoseconds.
    pub max_ns: f64,
    /// Sample standard deviation, nanoseconds.
    pub std_dev_ns: f64,
    /// Raw samples, nanoseconds per repetition.
    pub samples_ns: Vec<f64>,
}

impl CaseResult {
    /// Build a result from a summary plus the raw samples it came from.
    pub fn from_summary(name: impl Into<String>, summary: &TimingSummary, samples: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            min_ns: summary.min,
            mean_ns: summary.mean,
            median_ns: summary.median,
            max_ns: summary.max,
            std_dev_ns: summary.std_dev,
            samples_ns: samples,
        }
    }
}

/// A case that errored during timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseError {
    /// Case name.
    pub name: String,
    /// Panic payload message.
    pub message: String,
}

/// Equivalence-check outcome carried in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquivalenceSummary {
    /// Cases whose check values all compared equal.
    pub matched: Vec<String>,
    /// Cases without a check value.
    pub unchecked: Vec<String>,
}

/// One pairwise significance verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignificancePair {
    /// First case of the pair.
    pub left: String,
    /// Second case of the pair.
    pub right: String,
    /// Two-sided p-value from Welch's t-test.
    pub p_value: f64,
    /// Mean ratio left/right, present only for distinct pairs.
    pub ratio: Option<f64>,
    /// Whether the pair is statistically distinct at the chosen alpha.
    pub distinct: bool,
}

impl SignificancePair {
    /// Flatten a pairwise matrix into one entry per comparable pair.
    pub fn from_matrix(matrix: &PairwiseMatrix) -> Vec<Self> {
        let mut pairs = Vec::new();
        for (i, row) in matrix.cells.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                let Some(verdict) = cell else { continue };
                let (p_value, ratio, distinct) = match verdict {
                    PairVerdict::Indistinguishable { p_value } => (*p_value, None, false),
                    PairVerdict::Distinct { p_value, ratio } => (*p_value, Some(*ratio), true),
                };
                pairs.push(SignificancePair {
                    left: matrix.names[i].clone(),
                    right: matrix.names[j].clone(),
                    p_value,
                    ratio,
                    distinct,
                });
            }
        }
        pairs
    }
}
