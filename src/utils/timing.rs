//! One-shot stopwatch used to time fetches and crawl phases.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Elapsed time of a finished `Timer`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimerResult {
    /// Elapsed whole milliseconds
    pub milli: u64,
    /// Elapsed whole seconds
    pub seconds: u64,
}

impl TimerResult {
    /// Builds a result from a measured duration.
    pub fn from_duration(duration: Duration) -> Self {
        Self {
            milli: duration_to_ms(duration),
            seconds: duration.as_secs(),
        }
    }
}

/// A single-use stopwatch.
///
/// `start()` captures a monotonic instant and `end()` consumes the timer, so a
/// timer can neither be reset nor ended twice.
#[derive(Debug)]
pub struct Timer {
    started: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn end(self) -> TimerResult {
        TimerResult::from_duration(self.started.elapsed())
    }
}

/// Converts a duration to whole milliseconds, saturating at `u64::MAX`.
pub fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
