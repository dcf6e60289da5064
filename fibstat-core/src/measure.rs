//! Timing
//!
//! Wall-clock timing for benchmark iterations on top of `std::time::Instant`.

use std::time::{Duration, Instant};

/// Timer for a single measured call
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start timing now
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed nanoseconds since `start`, saturating at `u64::MAX`
    #[inline(always)]
    pub fn stop(&self) -> u64 {
        duration_to_ns(self.start.elapsed())
    }
}

/// Nanoseconds in `d`, saturating at `u64::MAX`
#[inline]
pub fn duration_to_ns(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer() {
        let timer = Timer::start();
        std::thread::sleep(Duration::from_millis(10));
        let nanos = timer.stop();

        assert!(nanos >= 5_000_000);
        assert!(nanos < 1_000_000_000);
    }

    #[test]
    fn test_duration_to_ns() {
        assert_eq!(duration_to_ns(Duration::from_micros(3)), 3_000);
        assert_eq!(duration_to_ns(Duration::MAX), u64::MAX);
    }
}
