//! Terminal Rendering
//!
//! Human-readable output for test runs and benchmark reports. Everything
//! returns a `String`; callers decide where it goes.

use crate::format::TimeFormat;
use crate::report::{CaseError, CaseResult, EquivalenceSummary, SignificancePair};
use probo_core::{RunTotals, TestDef, UnitOutcome};
use std::collections::BTreeMap;

/// Banner printed before a unit runs.
pub fn render_unit_banner(unit: &str) -> String {
    let width = unit.len().max(20) + 8;
    let bar = "#".repeat(width);
    format!("{}\n#   {}\n{}", bar, unit, bar)
}

/// Per-unit result summary: pass counts plus one line per failure.
pub fn render_unit_summary(outcome: &UnitOutcome) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "summary: passed:{} total:{}\n",
        outcome.passed, outcome.attempted
    ));
    for failure in &outcome.failures {
        output.push_str(&format!("  failed {}: {}\n", failure.name, failure.message));
    }
    output
}

/// Grand total across several units.
pub fn render_grand_total(totals: &RunTotals) -> String {
    format!(
        "grand total: units:{} passed:{} failed:{} total:{}\n",
        totals.units, totals.passed, totals.failed, totals.attempted
    )
}

/// List registered tests grouped by module path, in declaration order.
pub fn render_list(tests: &[&TestDef]) -> String {
    let mut modules: BTreeMap<&str, Vec<&TestDef>> = BTreeMap::new();
    for test in tests {
        modules.entry(test.module_path).or_default().push(test);
    }

    let mut output = String::new();
    for (module, tests) in modules {
        output.push_str(&format!("{}\n", module));
        for test in tests {
            let marker = if test.skip { " (skip)" } else { "" };
            output.push_str(&format!("  {}{}\n", test.name, marker));
        }
    }
    output
}

/// Timing table: one row per case with min/mean/median/max columns.
///
/// The name column is sized to the longest case name; timing columns are
/// right-aligned on the widest formatted value.
pub fn render_bench_table(results: &[CaseResult], tfmt: TimeFormat) -> String {
    if results.is_empty() {
        return String::new();
    }

    let name_width = results
        .iter()
        .map(|r| r.name.len())
        .max()
        .unwrap_or(4)
        .max("name".len());

    let rows: Vec<[String; 4]> = results
        .iter()
        .map(|r| {
            [
                tfmt.format(r.min_ns),
                tfmt.format(r.mean_ns),
                tfmt.format(r.median_ns),
                tfmt.format(r.max_ns),
            ]
        })
        .collect();

    let headers = ["min", "mean", "med", "max"];
    let mut col_widths = [0usize; 4];
    for (i, header) in headers.iter().enumerate() {
        col_widths[i] = rows
            .iter()
            .map(|row| row[i].len())
            .max()
            .unwrap_or(0)
            .max(header.len());
    }

    let mut output = String::new();
    output.push_str(&format!("{:<width$}", "name", width = name_width));
    for (i, header) in headers.iter().enumerate() {
        output.push_str(&format!("  {:>w$}", header, w = col_widths[i]));
    }
    output.push('\n');

    for (result, row) in results.iter().zip(&rows) {
        output.push_str(&format!("{:<width$}", result.name, width = name_width));
        for (i, cell) in row.iter().enumerate() {
            output.push_str(&format!("  {:>w$}", cell, w = col_widths[i]));
        }
        output.push('\n');
    }

    output
}

/// Named stopwatch laps, one row per name, followed by a total row.
///
/// Laps beyond the supplied names still count toward the total. The total
/// row is omitted when a single named lap is all there is.
pub fn render_splits(names: &[&str], laps_ns: &[u64], tfmt: TimeFormat) -> String {
    if laps_ns.is_empty() {
        return String::new();
    }
    let show_total = !(laps_ns.len() == 1 && !names.is_empty());

    let mut name_width = names.iter().map(|n| n.len()).max().unwrap_or(0);
    if show_total {
        name_width = name_width.max("total".len());
    }

    let mut output = String::new();
    for (name, &lap) in names.iter().zip(laps_ns) {
        output.push_str(&format!(
            "{:<w$}  {}\n",
            name,
            tfmt.format(lap as f64),
            w = name_width
        ));
    }
    if show_total {
        let total: u64 = laps_ns.iter().sum();
        output.push_str(&format!(
            "{:<w$}  {}\n",
            "total",
            tfmt.format(total as f64),
            w = name_width
        ));
    }
    output
}

/// Errored-case section; empty string when nothing errored.
pub fn render_errored(errored: &[CaseError]) -> String {
    if errored.is_empty() {
        return String::new();
    }

    let mut output = String::new();
    output.push_str("errored:\n");
    for error in errored {
        output.push_str(&format!("  {}: {}\n", error.name, error.message));
    }
    output
}

/// Equivalence-check section.
pub fn render_equivalence(eq: &EquivalenceSummary) -> String {
    let mut output = String::new();
    output.push_str("All results match!\n");
    if !eq.unchecked.is_empty() {
        output.push_str(&format!("unchecked: {}\n", eq.unchecked.join(", ")));
    }
    output
}

/// Pairwise significance section.
pub fn render_significance(pairs: &[SignificancePair], alpha: f64) -> String {
    if pairs.is_empty() {
        return String::new();
    }

    let mut output = String::new();
    output.push_str(&format!("pairwise Welch t-test (alpha = {}):\n", alpha));
    for pair in pairs {
        if pair.distinct {
            let ratio = pair.ratio.unwrap_or(f64::NAN);
            output.push_str(&format!(
                "  {} vs {}: distinct (p = {:.4}, ratio = {:.2}x)\n",
                pair.left, pair.right, pair.p_value, ratio
            ));
        } else {
            output.push_str(&format!(
                "  {} vs {}: indistinguishable (p = {:.4})\n",
                pair.left, pair.right, pair.p_value
            ));
        }
    }
    output
}
