//! Explicit Test Suites
//!
//! A `Suite` is the registry alternative to link-time collection: tests are
//! added by hand, each with its own argument parser, and the suite builds a
//! subcommand tree from them. Invoking the binary with a test's name runs
//! just that test with its own arguments; no subcommand (or `all`) runs the
//! whole suite with every parser's defaults.

use clap::{ArgAction, ArgMatches, Command};
use probo_core::{Failure, RunError, UnitOutcome, panic_message};
use probo_report::render_unit_summary;
use std::panic::{AssertUnwindSafe, catch_unwind};

type Action = Box<dyn Fn(&ArgMatches) -> anyhow::Result<()>>;

struct SuiteTest {
    name: String,
    skip: bool,
    parser: Command,
    action: Action,
}

/// An explicitly registered set of named, argument-taking tests.
pub struct Suite {
    name: String,
    tests: Vec<SuiteTest>,
}

impl Suite {
    /// Create an empty suite.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
        }
    }

    /// Register a test.
    ///
    /// `configure` decorates the test's own subcommand with arguments; the
    /// action receives the parsed matches. Arguments should carry defaults
    /// so the test can also run in an aggregate pass.
    pub fn register(
        mut self,
        name: impl Into<String>,
        configure: impl FnOnce(Command) -> Command,
        action: impl Fn(&ArgMatches) -> anyhow::Result<()> + 'static,
    ) -> Self {
        let name = name.into();
        let parser = configure(Command::new(name.clone()));
        self.tests.push(SuiteTest {
            name,
            skip: false,
            parser,
            action: Box::new(action),
        });
        self
    }

    /// Register a test excluded from aggregate runs; it still runs when
    /// named explicitly.
    pub fn register_skipped(
        mut self,
        name: impl Into<String>,
        configure: impl FnOnce(Command) -> Command,
        action: impl Fn(&ArgMatches) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self = self.register(name, configure, action);
        self.tests.last_mut().unwrap().skip = true;
        self
    }

    /// Registered test names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tests.iter().map(|t| t.name.as_str()).collect()
    }

    /// Build the subcommand tree: one subcommand per test plus `all`.
    pub fn command(&self) -> Command {
        let mut root = Command::new(self.name.clone()).subcommand_required(false);
        root = root.subcommand(
            Command::new("all").about("Run every non-skipped test").arg(
                clap::Arg::new("all")
                    .short('a')
                    .long("all")
                    .action(ArgAction::SetTrue)
                    .help("Keep running after a failure"),
            ),
        );
        for test in &self.tests {
            root = root.subcommand(test.parser.clone());
        }
        root
    }

    /// Parse process arguments and dispatch.
    pub fn run(&self) -> anyhow::Result<UnitOutcome> {
        self.run_from(std::env::args())
    }

    /// Parse the given arguments (binary name first) and dispatch.
    pub fn run_from(
        &self,
        argv: impl IntoIterator<Item = impl Into<std::ffi::OsString> + Clone>,
    ) -> anyhow::Result<UnitOutcome> {
        let matches = self.command().try_get_matches_from(argv)?;

        match matches.subcommand() {
            None => self.run_all(false),
            Some(("all", m)) => self.run_all(m.get_flag("all")),
            Some((name, m)) => {
                let test = self
                    .tests
                    .iter()
                    .find(|t| t.name == name)
                    .ok_or_else(|| anyhow::anyhow!("unknown test: {}", name))?;
                self.invoke(test, m)?;
                Ok(UnitOutcome {
                    unit: self.name.clone(),
                    attempted: 1,
                    passed: 1,
                    failures: Vec::new(),
                })
            }
        }
    }

    /// Run every non-skipped test with its parser's defaults.
    ///
    /// With `continue_on_fail` the first failure is recorded and the rest
    /// still run; otherwise it propagates immediately.
    pub fn run_all(&self, continue_on_fail: bool) -> anyhow::Result<UnitOutcome> {
        let mut outcome = UnitOutcome {
            unit: self.name.clone(),
            ..Default::default()
        };

        for test in self.tests.iter().filter(|t| !t.skip) {
            println!(">>> running test {} <<<", test.name);
            outcome.attempted += 1;

            // Default matches: parse an empty argument list.
            let empty = test
                .parser
                .clone()
                .no_binary_name(true)
                .try_get_matches_from(Vec::<String>::new());

            let result = match empty {
                Ok(matches) => self.invoke(test, &matches),
                Err(e) => Err(anyhow::anyhow!("argument defaults missing: {}", e)),
            };

            match result {
                Ok(()) => outcome.passed += 1,
                Err(e) => {
                    if !continue_on_fail {
                        return Err(RunError::TestFailed {
                            name: test.name.clone(),
                            message: e.to_string(),
                        }
                        .into());
                    }
                    outcome.failures.push(Failure {
                        name: test.name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        print!("{}", render_unit_summary(&outcome));
        Ok(outcome)
    }

    fn invoke(&self, test: &SuiteTest, matches: &ArgMatches) -> anyhow::Result<()> {
        match catch_unwind(AssertUnwindSafe(|| (test.action)(matches))) {
            Ok(result) => result,
            Err(panic) => Err(anyhow::anyhow!("{}", panic_message(panic))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Arg;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record(log: &Rc<RefCell<Vec<String>>>, entry: impl Into<String>) {
        log.borrow_mut().push(entry.into());
    }

    fn two_test_suite(log: Rc<RefCell<Vec<String>>>) -> Suite {
        let log_a = log.clone();
        let log_b = log;
        Suite::new("demo")
            .register(
                "greet",
                |cmd| {
                    cmd.arg(
                        Arg::new("who")
                            .long("who")
                            .default_value("world"),
                    )
                },
                move |m| {
                    let who: &String = m.get_one("who").unwrap();
                    record(&log_a, format!("greet {}", who));
                    Ok(())
                },
            )
            .register(
                "count",
                |cmd| cmd,
                move |_| {
                    record(&log_b, "count");
                    Ok(())
                },
            )
    }

    #[test]
    fn test_no_subcommand_runs_everything() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let suite = two_test_suite(log.clone());
        let outcome = suite.run_from(["demo"]).unwrap();

        assert_eq!(outcome.attempted, 2);
        assert_eq!(outcome.passed, 2);
        assert_eq!(*log.borrow(), vec!["greet world", "count"]);
    }

    #[test]
    fn test_named_test_gets_its_own_arguments() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let suite = two_test_suite(log.clone());
        let outcome = suite.run_from(["demo", "greet", "--who", "crab"]).unwrap();

        assert_eq!(outcome.attempted, 1);
        assert_eq!(*log.borrow(), vec!["greet crab"]);
    }

    #[test]
    fn test_failure_stops_the_default_pass() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_late = log.clone();
        let suite = Suite::new("demo")
            .register("boom", |cmd| cmd, |_| panic!("kaboom"))
            .register(
                "late",
                |cmd| cmd,
                move |_| {
                    record(&log_late, "late");
                    Ok(())
                },
            );

        assert!(suite.run_from(["demo"]).is_err());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_all_flag_keeps_running() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_late = log.clone();
        let suite = Suite::new("demo")
            .register("boom", |cmd| cmd, |_| panic!("kaboom"))
            .register(
                "late",
                |cmd| cmd,
                move |_| {
                    record(&log_late, "late");
                    Ok(())
                },
            );

        let outcome = suite.run_from(["demo", "all", "--all"]).unwrap();
        assert_eq!(outcome.attempted, 2);
        assert_eq!(outcome.passed, 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].name, "boom");
        assert_eq!(outcome.failures[0].message, "kaboom");
        assert_eq!(*log.borrow(), vec!["late"]);
    }

    #[test]
    fn test_skipped_runs_only_when_named() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_skip = log.clone();
        let suite = Suite::new("demo").register_skipped(
            "slow",
            |cmd| cmd,
            move |_| {
                record(&log_skip, "slow");
                Ok(())
            },
        );

        let outcome = suite.run_from(["demo"]).unwrap();
        assert_eq!(outcome.attempted, 0);
        assert!(log.borrow().is_empty());

        let outcome = suite.run_from(["demo", "slow"]).unwrap();
        assert_eq!(outcome.passed, 1);
        assert_eq!(*log.borrow(), vec!["slow"]);
    }

    #[test]
    fn test_names_built_at_runtime() {
        // Suite and test names are owned strings, not static strs; the
        // subcommand tree must accept them as-is.
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_run = log.clone();
        let suite = Suite::new(format!("suite_{}", 1)).register(
            format!("case_{}", 7),
            |cmd| cmd,
            move |_| {
                record(&log_run, "ran");
                Ok(())
            },
        );

        assert_eq!(suite.names(), vec!["case_7"]);
        let outcome = suite.run_from(["suite_1", "case_7"]).unwrap();
        assert_eq!(outcome.passed, 1);
        assert_eq!(*log.borrow(), vec!["ran"]);
    }

    #[test]
    fn test_error_results_count_as_failures() {
        let suite = Suite::new("demo").register(
            "errs",
            |cmd| cmd,
            |_| Err(anyhow::anyhow!("bad state")),
        );
        let outcome = suite.run_from(["demo", "all", "--all"]).unwrap();
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].message, "bad state");
    }
}
