//! Benchmark sets: definition, timing, and equivalence checking.
//!
//! A `BenchSet` pairs a setup callable producing a state value with named
//! cases measured against that state. Every role is a first-class closure;
//! nothing is executed from text.
//!
//! Timing follows repeat-sampling: for each of `repeat` repetitions a fresh
//! state is built (untimed), then `number` calls of the case routine are
//! timed as one wall-clock sample. A case that panics while being timed is
//! reported as errored without aborting the remaining cases.

use crate::measure::Timer;
use crate::runner::panic_message;
use std::fmt::Debug;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Timing configuration.
#[derive(Debug, Clone, Copy)]
pub struct BenchConfig {
    /// Calls of the case routine per timing sample.
    pub number: u64,
    /// Number of timing samples to collect per case.
    pub repeat: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            number: 100,
            repeat: 10,
        }
    }
}

/// A named benchmark case.
pub struct BenchCase<S, T> {
    name: String,
    routine: Box<dyn Fn(&mut S)>,
    check: Option<Box<dyn Fn(&mut S) -> T>>,
}

impl<S, T> BenchCase<S, T> {
    /// Case name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A set of benchmark cases sharing one setup callable.
///
/// `S` is the state type produced by setup; `T` is the check-value type used
/// for equivalence checking (defaults to `()` when unused).
pub struct BenchSet<S, T = ()> {
    title: Option<String>,
    setup: Box<dyn Fn() -> S>,
    cases: Vec<BenchCase<S, T>>,
}

/// Timing samples for one case, in nanoseconds per repetition.
#[derive(Debug, Clone)]
pub struct TimedCase {
    /// Case name.
    pub name: String,
    /// One non-negative sample per repetition: total nanoseconds for
    /// `number` routine calls.
    pub samples: Vec<f64>,
}

/// A case that panicked during timed execution.
#[derive(Debug, Clone)]
pub struct ErroredCase {
    /// Case name.
    pub name: String,
    /// Panic payload message.
    pub message: String,
}

/// Result of timing a whole set.
#[derive(Debug, Clone, Default)]
pub struct MeasureOutcome {
    /// Cases timed successfully, in declaration order.
    pub timed: Vec<TimedCase>,
    /// Cases that errored during timing.
    pub errored: Vec<ErroredCase>,
}

/// One equivalence class of check values.
#[derive(Debug, Clone)]
pub struct EquivalenceClass {
    /// Names of the cases whose check values compare equal.
    pub members: Vec<String>,
    /// `Debug` rendering of the class representative, truncated.
    pub representative: String,
}

/// Successful equivalence check: a single class plus unchecked cases.
#[derive(Debug, Clone)]
pub struct EquivalenceOutcome {
    /// Cases whose check values all compared equal.
    pub matched: Vec<String>,
    /// Cases without a check callable, reported rather than dropped.
    pub unchecked: Vec<String>,
}

/// Errors from benchmark preparation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BenchError {
    /// Check values split into more than one equivalence class.
    #[error("benchmark check values diverge into {} equivalence sets", .classes.len())]
    ValuesDiverge {
        /// The offending classes with representative values.
        classes: Vec<EquivalenceClass>,
    },
    /// An equality predicate was supplied but no case defines a check value.
    #[error("equivalence check requested but no case defines a check value")]
    NothingToCheck,
}

impl<S, T> BenchSet<S, T> {
    /// Create a set from a setup callable.
    pub fn new(setup: impl Fn() -> S + 'static) -> Self {
        Self {
            title: None,
            setup: Box::new(setup),
            cases: Vec::new(),
        }
    }

    /// Attach a display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Display title, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Add a case without a check value.
    pub fn case(mut self, name: impl Into<String>, routine: impl Fn(&mut S) + 'static) -> Self {
        self.cases.push(BenchCase {
            name: name.into(),
            routine: Box::new(routine),
            check: None,
        });
        self
    }

    /// Add a case with a check callable producing the designated result
    /// value for equivalence checking.
    pub fn case_checked(
        mut self,
        name: impl Into<String>,
        routine: impl Fn(&mut S) + 'static,
        check: impl Fn(&mut S) -> T + 'static,
    ) -> Self {
        self.cases.push(BenchCase {
            name: name.into(),
            routine: Box::new(routine),
            check: Some(Box::new(check)),
        });
        self
    }

    /// Number of cases.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Whether the set has no cases.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Case names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.cases.iter().map(|c| c.name.as_str()).collect()
    }

    /// Time every case.
    ///
    /// Cases run sequentially in declaration order. A panic inside one
    /// case's timing loop moves that case to the errored list; the rest are
    /// still timed.
    pub fn measure(&self, config: &BenchConfig) -> MeasureOutcome {
        let mut outcome = MeasureOutcome::default();

        for case in &self.cases {
            tracing::debug!(name = %case.name, "timing case");
            let result = catch_unwind(AssertUnwindSafe(|| {
                let mut samples = Vec::with_capacity(config.repeat);
                for _ in 0..config.repeat {
                    // Fresh state per repetition; setup is not timed.
                    let mut state = (self.setup)();
                    let timer = Timer::start();
                    for _ in 0..config.number {
                        (case.routine)(&mut state);
                    }
                    samples.push(timer.stop() as f64);
                    std::hint::black_box(&mut state);
                }
                samples
            }));

            match result {
                Ok(samples) => outcome.timed.push(TimedCase {
                    name: case.name.clone(),
                    samples,
                }),
                Err(panic) => outcome.errored.push(ErroredCase {
                    name: case.name.clone(),
                    message: panic_message(panic),
                }),
            }
        }

        outcome
    }
}

impl<S, T: Debug> BenchSet<S, T> {
    /// Partition check values into equivalence classes under `eq`.
    ///
    /// Each checked case runs once against a fresh state derived from setup.
    /// The intent is to compare otherwise-equivalent implementations, so
    /// more than one class is a hard error carrying each class's members and
    /// a `Debug` dump of its representative value.
    pub fn check_equivalence(
        &self,
        eq: impl Fn(&T, &T) -> bool,
    ) -> Result<EquivalenceOutcome, BenchError> {
        let mut classes: Vec<(Vec<&str>, T)> = Vec::new();
        let mut unchecked = Vec::new();

        for case in &self.cases {
            let Some(check) = &case.check else {
                unchecked.push(case.name.clone());
                continue;
            };
            let mut state = (self.setup)();
            let value = check(&mut state);
            match classes.iter_mut().find(|(_, rep)| eq(rep, &value)) {
                Some((members, _)) => members.push(case.name.as_str()),
                None => classes.push((vec![case.name.as_str()], value)),
            }
        }

        if classes.is_empty() {
            return Err(BenchError::NothingToCheck);
        }

        if classes.len() > 1 {
            return Err(BenchError::ValuesDiverge {
                classes: classes
                    .into_iter()
                    .map(|(members, rep)| EquivalenceClass {
                        members: members.into_iter().map(str::to_string).collect(),
                        representative: truncate_debug(&rep),
                    })
                    .collect(),
            });
        }

        let (members, _) = &classes[0];
        Ok(EquivalenceOutcome {
            matched: members.iter().map(|s| s.to_string()).collect(),
            unchecked,
        })
    }
}

fn truncate_debug(value: &impl Debug) -> String {
    let rendered = format!("{value:?}");
    if rendered.chars().count() > 100 {
        let mut cut: String = rendered.chars().take(100).collect();
        cut.push('…');
        cut
    } else {
        rendered
    }
}
