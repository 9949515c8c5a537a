#![warn(missing_docs)]
//! # Probo
//!
//! Test harness and micro-benchmark runner built around a naming
//! convention: functions whose names carry the configured prefix
//! (`test_` by default) are tests, registered at link time and selectable
//! by `unit:name1,name2` targets.
//!
//! - **Prefix discovery**: register with `probo_test!`, run with
//!   [`run_tests`]; directories of prefixed executables run as child
//!   processes
//! - **Explicit suites**: [`Suite`] for tests that take their own
//!   command-line arguments
//! - **Benchmarking**: [`BenchSet`] with repeat-sampling timing,
//!   equivalence checking of result values, and pairwise Welch t-tests
//!
//! ## Quick Start
//!
//! ```ignore
//! use probo::prelude::*;
//!
//! probo_test! {
//!     fn test_addition() {
//!         assert_eq!(2 + 2, 4);
//!     }
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     probo::run_tests()
//! }
//! ```
//!
//! ## Benchmarks
//!
//! ```ignore
//! let set = BenchSet::new(|| (0..1000).collect::<Vec<u64>>())
//!     .case_checked("iter_sum", |v| { v.iter().sum::<u64>(); }, |v| v.iter().sum::<u64>())
//!     .case_checked("loop_sum", |v| { let mut s = 0; for x in v.iter() { s += x; } }, |v| {
//!         let mut s = 0;
//!         for x in v.iter() { s += x; }
//!         s
//!     });
//! probo::run_bench(&set, Some(&|a: &u64, b: &u64| a == b), &BenchArgs::parse())?;
//! ```

// Re-export core types
pub use probo_core::{
    BenchCase, BenchConfig, BenchError, BenchSet, EquivalenceClass, EquivalenceOutcome,
    ErroredCase, Failure, MeasureOutcome, RunError, RunPolicy, RunTotals, Stopwatch, Target,
    TestDef, TimedCase, Timer, UnitOutcome, parse_target, registered_tests, run_unit, select,
};

// The registration macro lives in probo-core; re-exported so user crates
// only depend on the facade.
pub use probo_core::probo_test;

// Re-export stats
pub use probo_stats::{
    DEFAULT_ALPHA, PairVerdict, PairwiseMatrix, StatsError, TimingSummary, WelchTest,
    pairwise_welch, summarize, welch_t_test,
};

// Re-export report types
pub use probo_report::{
    BenchReport, CaseError, CaseResult, EquivalenceSummary, OutputFormat, ReportMeta,
    SignificancePair, TimeFormat, render_splits,
};

// Re-export CLI entry points
pub use probo_cli::{BenchArgs, Suite, TestCli, run_bench, run_tests, run_tests_with_cli};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BenchArgs, BenchConfig, BenchSet, RunPolicy, Suite, Target, TestCli, probo_test,
        run_bench, run_tests,
    };
}
