//! Summary Statistics
//!
//! Computes per-case timing summaries. All statistics come from the full
//! sample set; there is no outlier cleaning at this level.

/// Summary of one case's timing samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimingSummary {
    /// Smallest sample.
    pub min: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median; for even-length sets the mean of the two middle values.
    pub median: f64,
    /// Largest sample.
    pub max: f64,
    /// Sample standard deviation (n - 1 denominator); 0 below 2 samples.
    pub std_dev: f64,
    /// Number of samples.
    pub sample_count: usize,
}

/// Compute a summary over `samples`. Empty input yields all zeros.
pub fn summarize(samples: &[f64]) -> TimingSummary {
    if samples.is_empty() {
        return TimingSummary::default();
    }

    let mean = samples.iter().sum::<f64>() / samples.len() as f64;

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let median = if sorted.len() % 2 == 0 {
        let mid = sorted.len() / 2;
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[sorted.len() / 2]
    };

    let std_dev = if samples.len() < 2 {
        0.0
    } else {
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>()
            / (samples.len() - 1) as f64;
        variance.sqrt()
    };

    TimingSummary {
        min: sorted[0],
        mean,
        median,
        max: sorted[sorted.len() - 1],
        std_dev,
        sample_count: samples.len(),
    }
}
