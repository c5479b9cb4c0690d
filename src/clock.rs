// @author:    olinex
// @time:      2026/10/16

// self mods

// use other mods
use core::any::Any;
use core::sync::atomic::{AtomicU64, Ordering};

// use self mods

/// Source of the timestamps recorded in inode metadata.
pub trait Clock: Send + Sync + Any {
    /// Current time in milliseconds since the unix epoch
    fn now(&self) -> u64;
}

/// The mock clock which is impl [`Clock`] and used for testing.
/// Every call of [`Clock::now`] returns the previous value plus one step,
/// so timestamps are predictable and strictly increasing.
pub struct MockClock {
    ticks: AtomicU64,
    step: u64,
}
impl MockClock {
    /// Create a new mock clock
    ///
    /// # Arguments
    /// * start: the value returned by the first call
    /// * step: the distance between two consecutive values
    pub fn new(start: u64, step: u64) -> Self {
        Self {
            ticks: AtomicU64::new(start),
            step,
        }
    }

    /// Peek the value the next call will return, without advancing
    pub fn peek(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}
impl Default for MockClock {
    fn default() -> Self {
        Self::new(0, 1)
    }
}
impl Clock for MockClock {
    fn now(&self) -> u64 {
        self.ticks.fetch_add(self.step, Ordering::Relaxed)
    }
}

/// Wall clock backed by [`std::time::SystemTime`]
#[cfg(feature = "std")]
#[derive(Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|duration| duration.as_millis() as u64)
            .unwrap_or(0)
    }
}
