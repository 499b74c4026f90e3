//! Test doubles for the host side ports.
//!
//! Available in test builds or with the `test-helpers` feature.

use core::cell::Cell;

use embassy_time::Duration;

use crate::system::{
    scheduler::{TickHandle, TickQueue},
    time::WallClock,
};

/// Wall clock whose time only moves when told to.
///
/// Uses interior mutability so a test can keep advancing it while the engine
/// holds a shared reference.
#[derive(Debug, Default)]
pub struct MockClock {
    now: Cell<i64>,
}

impl MockClock {
    /// Create a mock clock starting at `now` Unix milliseconds.
    pub fn new(now: i64) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn set(&self, now: i64) {
        self.now.set(now);
    }

    pub fn advance_millis(&self, millis: i64) {
        self.now.set(self.now.get() + millis);
    }

    pub fn advance(&self, duration: Duration) {
        self.advance_millis(duration.as_millis() as i64);
    }
}

impl WallClock for MockClock {
    fn now_millis(&self) -> i64 {
        self.now.get()
    }
}

/// Delay queue that records what the scheduler asked for.
///
/// Holds a single slot like the host queue does. Scheduling while the slot is
/// taken is counted as stacking, which the scheduler must never do.
#[derive(Debug, Default)]
pub struct MockTickQueue {
    pending: Option<(TickHandle, Duration)>,
    scheduled: usize,
    cancelled: usize,
    stacked: usize,
}

impl MockTickQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tick waiting to fire and its requested delay
    pub fn pending(&self) -> Option<(TickHandle, Duration)> {
        self.pending
    }

    /// Number of ticks waiting to fire
    pub fn outstanding(&self) -> usize {
        self.pending.is_some() as usize
    }

    /// Remove the pending tick as if its delay elapsed
    pub fn fire(&mut self) -> Option<TickHandle> {
        self.pending.take().map(|(handle, _)| handle)
    }

    /// Total ticks submitted
    pub fn scheduled(&self) -> usize {
        self.scheduled
    }

    /// Ticks removed before they fired
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    /// Ticks submitted while another was still pending
    pub fn stacked(&self) -> usize {
        self.stacked
    }
}

impl TickQueue for MockTickQueue {
    fn schedule(&mut self, handle: TickHandle, delay: Duration) {
        if self.pending.is_some() {
            self.stacked += 1;
        }
        self.pending = Some((handle, delay));
        self.scheduled += 1;
    }

    fn cancel(&mut self, handle: TickHandle) {
        if matches!(self.pending, Some((pending, _)) if pending == handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}
