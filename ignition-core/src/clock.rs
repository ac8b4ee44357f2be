//! Nanosecond clocks.
//!
//! Readings are only meaningful relative to other readings of the same clock.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Instant;

pub trait NanoClock: Send + Sync {
    fn nano_time(&self) -> i64;
}

/// Monotonic clock backed by `std::time::Instant`, zeroed at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl NanoClock for MonotonicClock {
    fn nano_time(&self) -> i64 {
        // i64 nanos covers ~292 years of uptime.
        self.origin.elapsed().as_nanos() as i64
    }
}

/// A clock that only moves when told to. Used for tests and replaying recorded timings.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    pub fn set(&self, nanos: i64) {
        self.now.store(nanos, Ordering::SeqCst);
    }

    pub fn advance(&self, nanos: i64) {
        self.now.fetch_add(nanos, Ordering::SeqCst);
    }
}

impl NanoClock for ManualClock {
    fn nano_time(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
