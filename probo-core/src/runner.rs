//! Sequential test execution.
//!
//! Tests run one at a time in the order given. A panicking test is a
//! failure; the unwind is caught and the payload message recorded. The
//! policy decides what happens next: `FailFast` propagates the first
//! failure immediately, `RunAll` records it and continues.

use crate::TestDef;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// What to do when a test fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPolicy {
    /// Stop at the first failure and propagate it.
    FailFast,
    /// Record the failure and continue with the remaining tests.
    RunAll,
}

/// A recorded test failure.
#[derive(Debug, Clone)]
pub struct Failure {
    /// Name of the failed test.
    pub name: String,
    /// Panic payload or error message.
    pub message: String,
}

/// Outcome of running one unit's tests.
#[derive(Debug, Clone, Default)]
pub struct UnitOutcome {
    /// Unit label (module path, file path, or suite name).
    pub unit: String,
    /// Number of tests invoked.
    pub attempted: usize,
    /// Number of tests that completed without failing.
    pub passed: usize,
    /// Failures recorded under `RunPolicy::RunAll`.
    pub failures: Vec<Failure>,
}

/// Errors from test execution.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RunError {
    /// A test failed under `RunPolicy::FailFast`.
    #[error("test {name} failed: {message}")]
    TestFailed {
        /// Name of the failed test.
        name: String,
        /// Panic payload or error message.
        message: String,
    },
}

/// Grand totals aggregated across several units.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunTotals {
    /// Units absorbed.
    pub units: usize,
    /// Tests invoked across all units.
    pub attempted: usize,
    /// Tests passed across all units.
    pub passed: usize,
    /// Tests failed across all units.
    pub failed: usize,
}

impl RunTotals {
    /// Fold one unit's outcome into the totals.
    pub fn absorb(&mut self, outcome: &UnitOutcome) {
        self.units += 1;
        self.attempted += outcome.attempted;
        self.passed += outcome.passed;
        self.failed += outcome.failures.len();
    }
}

/// Run `tests` in order under `policy`.
///
/// The pass count always equals attempted minus failed. With `FailFast`,
/// tests after the failing one are never invoked.
pub fn run_unit(
    unit: &str,
    tests: &[&TestDef],
    policy: RunPolicy,
) -> Result<UnitOutcome, RunError> {
    let mut outcome = UnitOutcome {
        unit: unit.to_string(),
        ..Default::default()
    };

    for test in tests {
        tracing::debug!(name = test.name, module = test.module_path, "running test");
        eprintln!("running {}", test.name);
        outcome.attempted += 1;

        match invoke(test.runner_fn) {
            Ok(()) => outcome.passed += 1,
            Err(message) => match policy {
                RunPolicy::FailFast => {
                    return Err(RunError::TestFailed {
                        name: test.name.to_string(),
                        message,
                    });
                }
                RunPolicy::RunAll => outcome.failures.push(Failure {
                    name: test.name.to_string(),
                    message,
                }),
            },
        }
    }

    Ok(outcome)
}

fn invoke(f: fn()) -> Result<(), String> {
    catch_unwind(AssertUnwindSafe(f)).map_err(panic_message)
}

/// Extract a readable message from a panic payload.
pub fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static OK_CALLS: AtomicUsize = AtomicUsize::new(0);
    static LATE_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn test_ok() {
        OK_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    fn test_boom() {
        panic!("boom");
    }

    fn test_late() {
        LATE_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    const fn def(name: &'static str, runner_fn: fn()) -> TestDef {
        TestDef {
            name,
            module_path: "runner::tests",
            file: "runner.rs",
            line: 0,
            skip: false,
            runner_fn,
        }
    }

    static PASSING: [TestDef; 2] = [def("test_a", test_ok), def("test_b", test_ok)];
    static MIXED: [TestDef; 3] = [
        def("test_ok", test_ok),
        def("test_boom", test_boom),
        def("test_late", test_late),
    ];

    #[test]
    fn all_passing_unit() {
        let tests: Vec<_> = PASSING.iter().collect();
        let outcome = run_unit("passing", &tests, RunPolicy::FailFast).unwrap();
        assert_eq!(outcome.attempted, 2);
        assert_eq!(outcome.passed, 2);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn fail_fast_stops_before_later_tests() {
        LATE_CALLS.store(0, Ordering::SeqCst);
        let tests: Vec<_> = MIXED.iter().collect();
        let err = run_unit("mixed", &tests, RunPolicy::FailFast).unwrap_err();
        assert!(matches!(err, RunError::TestFailed { ref name, .. } if name == "test_boom"));
        // The test declared after the failing one was never invoked.
        assert_eq!(LATE_CALLS.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn run_all_invokes_every_test_once() {
        LATE_CALLS.store(0, Ordering::SeqCst);
        let tests: Vec<_> = MIXED.iter().collect();
        let outcome = run_unit("mixed", &tests, RunPolicy::RunAll).unwrap();
        assert_eq!(outcome.attempted, 3);
        assert_eq!(outcome.passed, outcome.attempted - outcome.failures.len());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].name, "test_boom");
        assert_eq!(outcome.failures[0].message, "boom");
        assert_eq!(LATE_CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn totals_aggregate_across_units() {
        let tests: Vec<_> = MIXED.iter().collect();
        let mut totals = RunTotals::default();
        totals.absorb(&run_unit("one", &tests, RunPolicy::RunAll).unwrap());
        totals.absorb(&run_unit("two", &tests, RunPolicy::RunAll).unwrap());
        assert_eq!(totals.units, 2);
        assert_eq!(totals.attempted, 6);
        assert_eq!(totals.passed, 4);
        assert_eq!(totals.failed, 2);
    }
}
