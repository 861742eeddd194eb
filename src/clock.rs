//! Monotonic presentation clock

use std::time::Instant;

/// Monotonic microsecond clock for presentation timestamps
///
/// The audio stage stamps submitted samples with this clock so audio PTS
/// advance monotonically alongside the caller-supplied video timestamps.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Microseconds elapsed since the clock was created.
    pub fn now_us(&self) -> i64 {
        self.origin.elapsed().as_micros() as i64
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}
