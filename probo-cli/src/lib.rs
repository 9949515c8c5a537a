#![warn(missing_docs)]
//! Probo CLI Library
//!
//! Entry points for test and benchmark binaries. A test binary calls
//! [`run_tests`] from its `main` to get prefix-based selection over every
//! test registered with `probo_test!`; a benchmark binary builds a
//! `BenchSet` and hands it to [`run_bench`].
//!
//! # Example
//!
//! ```ignore
//! probo_test! {
//!     fn test_addition() {
//!         assert_eq!(2 + 2, 4);
//!     }
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     probo_cli::run_tests()
//! }
//! ```

mod discovery;
mod suite;

pub use discovery::{collect_test_files, spawn_unit};
pub use suite::Suite;

use clap::Parser;
use probo_core::{
    BenchConfig, BenchError, BenchSet, Failure, RunPolicy, RunTotals, UnitOutcome, parse_target,
    registered_tests, run_unit, select,
};
use probo_report::{
    BenchReport, CaseError, CaseResult, EquivalenceSummary, OutputFormat, ReportMeta,
    SignificancePair, TimeFormat, generate_json_report, render_bench_table, render_equivalence,
    render_errored, render_grand_total, render_histogram, render_list, render_significance,
    render_unit_banner, render_unit_summary,
};
use regex::Regex;
use std::fmt::Debug;
use std::path::Path;

/// Test-runner arguments
#[derive(Parser, Debug)]
#[command(name = "probo", about = "Prefix-convention test runner")]
pub struct TestCli {
    /// Targets: a directory, a test executable, or `unit:name1,name2`
    /// selections against the registry. Empty means every registered test.
    pub targets: Vec<String>,

    /// Keep running after a failure instead of stopping at the first one
    #[arg(short, long)]
    pub all: bool,

    /// Name prefix that marks a function or file as a test
    #[arg(short, long, default_value = "test_")]
    pub prefix: String,

    /// List matching tests without running them
    #[arg(short, long)]
    pub list: bool,

    /// Additional regex filter applied to test names
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Benchmark-runner arguments
#[derive(Parser, Debug)]
#[command(name = "probo-bench", about = "Repeat-sampling micro-benchmark runner")]
pub struct BenchArgs {
    /// Routine calls per timing sample
    #[arg(short, long, default_value = "100")]
    pub number: u64,

    /// Timing samples to collect per case
    #[arg(short, long, default_value = "10")]
    pub repeat: usize,

    /// Render an overlaid histogram of the samples
    #[arg(long)]
    pub gui: bool,

    /// Histogram bin count
    #[arg(long, default_value = "10")]
    pub bins: usize,

    /// Time display unit: auto, s, ms, us, ns
    #[arg(long, default_value = "auto")]
    pub tfmt: String,

    /// Keep declaration order instead of sorting by minimum time
    #[arg(long)]
    pub nosort: bool,

    /// Run pairwise Welch t-tests; optional value overrides alpha
    #[arg(long, num_args = 0..=1, default_missing_value = "0.05")]
    pub ttest: Option<f64>,

    /// Output format: human, json
    #[arg(long, default_value = "human")]
    pub format: String,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Initialize logging; safe to call more than once.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose { "probo=debug" } else { "probo=info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

/// Parse process arguments and run the test harness.
pub fn run_tests() -> anyhow::Result<()> {
    let cli = TestCli::parse();
    run_tests_with_cli(cli)
}

/// Run the test harness with pre-parsed arguments.
///
/// Every target yields one unit: directories expand into prefixed test
/// executables run as child processes, file paths run as one child each,
/// and anything else selects from the in-binary registry. No targets means
/// the whole registry as a single unit.
pub fn run_tests_with_cli(cli: TestCli) -> anyhow::Result<()> {
    init_tracing(cli.verbose);

    let filter = cli
        .filter
        .as_deref()
        .map(Regex::new)
        .transpose()
        .map_err(|e| anyhow::anyhow!("invalid filter: {}", e))?;
    let policy = if cli.all {
        RunPolicy::RunAll
    } else {
        RunPolicy::FailFast
    };

    let targets = expand_targets(&cli);

    if cli.list {
        print!("{}", list_targets(&targets, &cli, &filter)?);
        return Ok(());
    }

    let mut totals = RunTotals::default();
    let mut units = 0usize;

    for raw in &targets {
        let path = Path::new(raw);
        if !raw.is_empty() && path.is_dir() {
            for file in collect_test_files(path, &cli.prefix)? {
                let outcome = run_child_unit(&file, &cli)?;
                eprint!("{}", render_unit_summary(&outcome));
                totals.absorb(&outcome);
                units += 1;
                fail_fast_check(policy, &outcome)?;
            }
        } else if !raw.is_empty() && path.is_file() {
            let outcome = run_child_unit(path, &cli)?;
            eprint!("{}", render_unit_summary(&outcome));
            totals.absorb(&outcome);
            units += 1;
            fail_fast_check(policy, &outcome)?;
        } else {
            let outcome = run_registry_unit(raw, &cli, &filter, policy)?;
            eprint!("{}", render_unit_summary(&outcome));
            totals.absorb(&outcome);
            units += 1;
        }
    }

    if units > 1 {
        eprint!("{}", render_grand_total(&totals));
    }

    // Run-all mode reports failures in the summaries and exits normally;
    // only fail-fast propagates a process-level error.
    Ok(())
}

/// The configured targets, defaulting to the whole registry.
fn expand_targets(cli: &TestCli) -> Vec<String> {
    if cli.targets.is_empty() {
        vec![String::new()]
    } else {
        cli.targets.clone()
    }
}

/// Enumerate what each target would run, without invoking anything.
fn list_targets(
    targets: &[String],
    cli: &TestCli,
    filter: &Option<Regex>,
) -> anyhow::Result<String> {
    let tests = registered_tests();
    let mut output = String::new();

    for raw in targets {
        let path = Path::new(raw);
        if !raw.is_empty() && path.is_dir() {
            for file in collect_test_files(path, &cli.prefix)? {
                output.push_str(&format!("{}\n", file.display()));
            }
        } else if !raw.is_empty() && path.is_file() {
            output.push_str(&format!("{}\n", path.display()));
        } else {
            let target = parse_target(raw);
            let mut selected = select(tests.iter().copied(), &cli.prefix, &target);
            if let Some(re) = filter {
                selected.retain(|t| re.is_match(t.name));
            }
            output.push_str(&render_list(&selected));
        }
    }

    Ok(output)
}

/// Under fail-fast, a failed child unit stops the run.
fn fail_fast_check(policy: RunPolicy, outcome: &UnitOutcome) -> anyhow::Result<()> {
    if policy == RunPolicy::FailFast {
        if let Some(failure) = outcome.failures.first() {
            anyhow::bail!("{} failed: {}", failure.name, failure.message);
        }
    }
    Ok(())
}

/// Run a selection from the in-binary registry as one unit.
fn run_registry_unit(
    raw: &str,
    cli: &TestCli,
    filter: &Option<Regex>,
    policy: RunPolicy,
) -> anyhow::Result<UnitOutcome> {
    let target = parse_target(raw);
    let tests = registered_tests();
    let mut selected = select(tests.iter().copied(), &cli.prefix, &target);
    if let Some(re) = filter {
        selected.retain(|t| re.is_match(t.name));
    }

    let label = if raw.is_empty() { "registry" } else { raw };
    eprintln!("{}", render_unit_banner(label));
    run_unit(label, &selected, policy).map_err(Into::into)
}

/// Run one test executable as a child-process unit.
fn run_child_unit(path: &Path, cli: &TestCli) -> anyhow::Result<UnitOutcome> {
    let label = path.display().to_string();
    eprintln!("{}", render_unit_banner(&label));

    let status = spawn_unit(path, &cli.prefix, cli.all)?;
    let mut outcome = UnitOutcome {
        unit: label.clone(),
        attempted: 1,
        passed: 0,
        failures: Vec::new(),
    };
    if status.success() {
        outcome.passed = 1;
    } else {
        outcome.failures.push(Failure {
            name: label,
            message: format!("exited with {}", status),
        });
    }
    Ok(outcome)
}

/// Time a benchmark set and emit the report.
///
/// When `eq` is given the check values are verified for equivalence before
/// any timing happens; divergence aborts the run with each class's members
/// printed. Results are sorted fastest-first by minimum time unless
/// `--nosort` was passed.
pub fn run_bench<S, T: Debug>(
    set: &BenchSet<S, T>,
    eq: Option<&dyn Fn(&T, &T) -> bool>,
    args: &BenchArgs,
) -> anyhow::Result<()> {
    init_tracing(args.verbose);

    let format: OutputFormat = args
        .format
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let tfmt: TimeFormat = args.tfmt.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let equivalence = match eq {
        Some(eq) => match set.check_equivalence(|a, b| eq(a, b)) {
            Ok(outcome) => Some(EquivalenceSummary {
                matched: outcome.matched,
                unchecked: outcome.unchecked,
            }),
            Err(BenchError::ValuesDiverge { classes }) => {
                eprintln!("benchmark results diverge:");
                for class in &classes {
                    eprintln!("  {}: {}", class.members.join(", "), class.representative);
                }
                anyhow::bail!(BenchError::ValuesDiverge { classes });
            }
            Err(e) => return Err(e.into()),
        },
        None => None,
    };

    let config = BenchConfig {
        number: args.number,
        repeat: args.repeat,
    };
    let outcome = set.measure(&config);

    let mut results: Vec<CaseResult> = outcome
        .timed
        .iter()
        .map(|timed| {
            let summary = probo_stats::summarize(&timed.samples);
            CaseResult::from_summary(&timed.name, &summary, timed.samples.clone())
        })
        .collect();
    if !args.nosort {
        results.sort_by(|a, b| {
            a.min_ns
                .partial_cmp(&b.min_ns)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    let significance = match args.ttest {
        Some(alpha) => {
            let cases: Vec<(&str, &[f64])> = results
                .iter()
                .map(|r| (r.name.as_str(), r.samples_ns.as_slice()))
                .collect();
            let matrix = probo_stats::pairwise_welch(&cases, alpha);
            SignificancePair::from_matrix(&matrix)
        }
        None => Vec::new(),
    };

    let report = BenchReport {
        meta: ReportMeta {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now(),
            title: set.title().map(str::to_string),
            number: args.number,
            repeat: args.repeat,
        },
        results,
        errored: outcome
            .errored
            .iter()
            .map(|e| CaseError {
                name: e.name.clone(),
                message: e.message.clone(),
            })
            .collect(),
        equivalence,
        significance,
    };

    match format {
        OutputFormat::Json => println!("{}", generate_json_report(&report)?),
        OutputFormat::Human => {
            if let Some(title) = &report.meta.title {
                println!("{}", title);
            }
            if let Some(eq) = &report.equivalence {
                print!("{}", render_equivalence(eq));
            }
            print!("{}", render_bench_table(&report.results, tfmt));
            print!("{}", render_errored(&report.errored));
            if let Some(alpha) = args.ttest {
                print!("{}", render_significance(&report.significance, alpha));
            }
            if args.gui {
                print!("{}", render_histogram(&report.results, args.bins, tfmt));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_listed_alpha() {}
    fn test_listed_beta() {}
    probo_core::probo_test!(test_listed_alpha);
    probo_core::probo_test!(test_listed_beta);

    #[test]
    fn test_list_honors_target_selection() {
        let cli = TestCli::parse_from(["probo", "-l", ":listed_alpha"]);
        let listing = list_targets(&expand_targets(&cli), &cli, &None).unwrap();
        assert!(listing.contains("test_listed_alpha"));
        assert!(!listing.contains("test_listed_beta"));
    }

    #[test]
    fn test_list_without_targets_covers_the_registry() {
        let cli = TestCli::parse_from(["probo", "-l"]);
        let listing = list_targets(&expand_targets(&cli), &cli, &None).unwrap();
        assert!(listing.contains("test_listed_alpha"));
        assert!(listing.contains("test_listed_beta"));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = TestCli::parse_from(["probo"]);
        assert!(cli.targets.is_empty());
        assert!(!cli.all);
        assert_eq!(cli.prefix, "test_");
        assert!(cli.filter.is_none());
    }

    #[test]
    fn test_cli_targets_and_flags() {
        let cli = TestCli::parse_from(["probo", "-a", "-p", "check_", "sorting:alpha"]);
        assert!(cli.all);
        assert_eq!(cli.prefix, "check_");
        assert_eq!(cli.targets, vec!["sorting:alpha"]);
    }

    #[test]
    fn test_bench_args_defaults() {
        let args = BenchArgs::parse_from(["bench"]);
        assert_eq!(args.number, 100);
        assert_eq!(args.repeat, 10);
        assert!(args.ttest.is_none());
        assert_eq!(args.format, "human");
    }

    #[test]
    fn test_ttest_flag_with_and_without_value() {
        let args = BenchArgs::parse_from(["bench", "--ttest"]);
        assert_eq!(args.ttest, Some(0.05));

        let args = BenchArgs::parse_from(["bench", "--ttest", "0.01"]);
        assert_eq!(args.ttest, Some(0.01));
    }

    #[test]
    fn test_run_bench_human_output() {
        let set: BenchSet<u64, u64> = BenchSet::new(|| 0u64)
            .with_title("counters")
            .case_checked("add", |s| *s += 1, |s| *s)
            .case_checked("add_too", |s| *s += 1, |s| *s);
        let args = BenchArgs::parse_from(["bench", "-n", "5", "-r", "3", "--ttest"]);

        let eq = |a: &u64, b: &u64| a == b;
        run_bench(&set, Some(&eq), &args).unwrap();
    }

    #[test]
    fn test_run_bench_rejects_divergence() {
        let set: BenchSet<u64, u64> = BenchSet::new(|| 0u64)
            .case_checked("one", |_| (), |_| 1)
            .case_checked("two", |_| (), |_| 2);
        let args = BenchArgs::parse_from(["bench", "-n", "2", "-r", "2"]);

        let eq = |a: &u64, b: &u64| a == b;
        assert!(run_bench(&set, Some(&eq), &args).is_err());
    }

    #[test]
    fn test_run_bench_json_output() {
        let set: BenchSet<u64> = BenchSet::new(|| 0u64).case("add", |s| *s += 1);
        let args = BenchArgs::parse_from(["bench", "-n", "2", "-r", "2", "--format", "json"]);
        run_bench(&set, None, &args).unwrap();
    }

    #[test]
    fn test_unknown_format_is_an_error() {
        let set: BenchSet<u64> = BenchSet::new(|| 0u64).case("add", |s| *s += 1);
        let args = BenchArgs::parse_from(["bench", "--format", "yaml"]);
        assert!(run_bench(&set, None, &args).is_err());
    }
}
