use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Instant;

/// Abstraction over the game clock.
/// Implementations: SystemClock (production), ManualClock (testing, simulation).
pub trait Clock {
    /// Current song time in milliseconds.
    fn now_ms(&self) -> i64;

    /// Called once when the attempt starts.
    fn start(&mut self) {}
}

/// Wall clock measured from `start()`. Reads 0 before it is started.
#[derive(Debug, Default)]
pub struct SystemClock {
    started_at: Option<Instant>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        self.started_at
            .map_or(0, |start| start.elapsed().as_millis() as i64)
    }

    fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }
}

/// Deterministic clock driven by hand.
///
/// Clones share the same time, so a test can keep a handle while the
/// controller owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    current_ms: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(ms: i64) -> Self {
        let clock = Self::new();
        clock.set(ms);
        clock
    }

    pub fn set(&self, ms: i64) {
        self.current_ms.store(ms, Ordering::Relaxed);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.current_ms.fetch_add(delta_ms, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.current_ms.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advance() {
        let clock = ManualClock::new();
        assert_eq!(clock.now_ms(), 0);
        clock.advance(1000);
        assert_eq!(clock.now_ms(), 1000);
        clock.advance(500);
        assert_eq!(clock.now_ms(), 1500);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::at(250);
        let handle = clock.clone();
        handle.set(5000);
        assert_eq!(clock.now_ms(), 5000);
    }

    #[test]
    fn system_clock_reads_zero_until_started() {
        let mut clock = SystemClock::new();
        assert_eq!(clock.now_ms(), 0);
        clock.start();
        let t1 = clock.now_ms();
        let t2 = clock.now_ms();
        assert!(t2 >= t1);
    }
}
