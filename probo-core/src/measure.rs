//! Wall-clock timing.
//!
//! A thin wrapper over `std::time::Instant`; monotonic, so elapsed
//! nanoseconds are always non-negative.

use std::time::Instant;

/// Timer for measuring benchmark repetitions.
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer.
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return elapsed nanoseconds.
    #[inline(always)]
    pub fn stop(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }
}

/// Split-interval timer for quick phase profiling.
///
/// Records one stamp at creation and one per [`split`](Self::split) call;
/// each adjacent pair of stamps is a lap. Render the laps with
/// `render_splits` to get a named interval report.
pub struct Stopwatch {
    stamps: Vec<Instant>,
}

impl Stopwatch {
    /// Start the stopwatch.
    pub fn new() -> Self {
        Self {
            stamps: vec![Instant::now()],
        }
    }

    /// Record a split point, closing the current lap.
    pub fn split(&mut self) {
        self.stamps.push(Instant::now());
    }

    /// Number of recorded laps.
    pub fn len(&self) -> usize {
        self.stamps.len() - 1
    }

    /// Whether no lap has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.stamps.len() < 2
    }

    /// Elapsed nanoseconds of each lap, in recording order.
    pub fn laps(&self) -> Vec<u64> {
        self.stamps
            .windows(2)
            .map(|pair| pair[1].duration_since(pair[0]).as_nanos() as u64)
            .collect()
    }

    /// Nanoseconds from start to the last split.
    pub fn total(&self) -> u64 {
        let last = self.stamps[self.stamps.len() - 1];
        last.duration_since(self.stamps[0]).as_nanos() as u64
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
