#![warn(missing_docs)]
//! Probo Core - Test Registry and Execution
//!
//! This crate provides the execution environment for the harness:
//! - `TestDef` registry entries collected at link time via `inventory`
//! - Prefix-based selection with `unit:name1,name2` narrowing
//! - Fail-fast and run-all execution policies with panic capture
//! - `BenchSet` for building and timing named benchmark cases

mod bench;
mod discover;
mod measure;
mod runner;

pub use bench::{
    BenchCase, BenchConfig, BenchError, BenchSet, EquivalenceClass, EquivalenceOutcome,
    ErroredCase, MeasureOutcome, TimedCase,
};
pub use discover::{Target, parse_target, select};
pub use measure::{Stopwatch, Timer};
pub use runner::{
    Failure, RunError, RunPolicy, RunTotals, UnitOutcome, panic_message, run_unit,
};

/// Test definition registered via `probo_test!` or a direct `inventory::submit!`.
///
/// Failure is signalled by panicking; the runner catches the unwind and
/// records the payload message.
#[derive(Debug, Clone)]
pub struct TestDef {
    /// Test name; selection matches the configured prefix against this.
    pub name: &'static str,
    /// Module path of the registration site, used for `unit:` narrowing.
    pub module_path: &'static str,
    /// Source file path
    pub file: &'static str,
    /// Source line number
    pub line: u32,
    /// Exclude this test from aggregate runs (still runnable by name)
    pub skip: bool,
    /// The zero-argument test body
    pub runner_fn: fn(),
}

inventory::collect!(TestDef);

/// Anchor to prevent LTO from stripping inventory entries
#[used]
#[doc(hidden)]
pub static REGISTRY_ANCHOR: fn() = || {
    for _ in inventory::iter::<TestDef> {}
};

/// Internal re-exports for macro use
#[doc(hidden)]
pub mod internal {
    pub use inventory;
}

/// All registered tests in declaration order.
///
/// Registration order via `inventory` is unspecified, so declaration order
/// is defined as `(file, line)` order of the registered definitions.
pub fn registered_tests() -> Vec<&'static TestDef> {
    let mut tests: Vec<_> = inventory::iter::<TestDef>.into_iter().collect();
    tests.sort_by_key(|t| (t.file, t.line, t.name));
    tests
}

/// Register a test with the global registry.
///
/// Wraps a function definition and submits a [`TestDef`] entry for it:
///
/// ```ignore
/// probo_test! {
///     fn test_addition() {
///         assert_eq!(2 + 2, 4);
///     }
/// }
/// ```
///
/// An existing function can be registered by name (`probo_test!(my_fn);`),
/// and `probo_test!(skip my_fn);` registers it flagged to be excluded from
/// aggregate runs.
#[macro_export]
macro_rules! probo_test {
    ($(#[$meta:meta])* fn $name:ident() $body:block) => {
        $(#[$meta])*
        fn $name() $body
        $crate::probo_test!($name);
    };
    ($name:ident) => {
        $crate::internal::inventory::submit! {
            $crate::TestDef {
                name: stringify!($name),
                module_path: module_path!(),
                file: file!(),
                line: line!(),
                skip: false,
                runner_fn: $name,
            }
        }
    };
    (skip $name:ident) => {
        $crate::internal::inventory::submit! {
            $crate::TestDef {
                name: stringify!($name),
                module_path: module_path!(),
                file: file!(),
                line: line!(),
                skip: true,
                runner_fn: $name,
            }
        }
    };
}
