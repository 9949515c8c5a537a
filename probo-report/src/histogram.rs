//! ASCII Histograms
//!
//! Overlaid sample histograms for terminal display. All cases share one set
//! of bins spanning the global sample range, so their distributions can be
//! compared by eye; each case draws with its own symbol.

use crate::format::TimeFormat;
use crate::report::CaseResult;

const SYMBOLS: [char; 8] = ['#', 'o', 'x', '+', '*', '%', '@', '&'];

/// Render an overlaid histogram of every case's samples.
///
/// Bins are computed over the combined min/max of all samples. Each bin row
/// shows its range followed by one symbol per sample falling in it, grouped
/// by case. A legend maps symbols to case names.
pub fn render_histogram(results: &[CaseResult], bins: usize, tfmt: TimeFormat) -> String {
    let all: Vec<f64> = results
        .iter()
        .flat_map(|r| r.samples_ns.iter().copied())
        .collect();
    if all.is_empty() || bins == 0 {
        return String::new();
    }

    let lo = all.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = all.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = if hi > lo { hi - lo } else { 1.0 };
    let width = span / bins as f64;

    // counts[bin][case]
    let mut counts = vec![vec![0usize; results.len()]; bins];
    for (case_idx, result) in results.iter().enumerate() {
        for &sample in &result.samples_ns {
            let bin = (((sample - lo) / width) as usize).min(bins - 1);
            counts[bin][case_idx] += 1;
        }
    }

    let labels: Vec<String> = (0..bins)
        .map(|bin| {
            let start = lo + bin as f64 * width;
            let end = start + width;
            format!("[{}, {})", tfmt.format(start), tfmt.format(end))
        })
        .collect();
    let label_width = labels.iter().map(|l| l.len()).max().unwrap_or(0);

    let mut output = String::new();
    for (bin, label) in labels.iter().enumerate() {
        output.push_str(&format!("{:<width$} ", label, width = label_width));
        for (case_idx, &count) in counts[bin].iter().enumerate() {
            let symbol = SYMBOLS[case_idx % SYMBOLS.len()];
            for _ in 0..count {
                output.push(symbol);
            }
        }
        output.push('\n');
    }

    output.push_str("legend:");
    for (case_idx, result) in results.iter().enumerate() {
        let symbol = SYMBOLS[case_idx % SYMBOLS.len()];
        output.push_str(&format!(" {} {}", symbol, result.name));
    }
    output.push('\n');

    output
}
