//! Redraw scheduling
//!
//! While the face is visible and interactive it is redrawn once per second,
//! with every tick landing on a whole second of wall clock time. The delay is
//! recomputed from the current time on every firing, so a late or dropped tick
//! never accumulates drift. In every other state nothing is scheduled at all,
//! ambient redraws are driven by the host's minute tick.

use embassy_time::Duration;

/// Update rate in interactive mode
pub const INTERACTIVE_UPDATE_RATE: Duration = Duration::from_secs(1);

/// Identifies one scheduled tick.
///
/// Handles are never reused, so a tick that was cancelled or replaced can be
/// recognised when it fires anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickHandle(u32);

impl TickHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Delay queue owned by the host.
///
/// Submitting must not block. The queue calls back into
/// [`WatchFaceEngine::on_tick`](crate::WatchFaceEngine::on_tick) with the
/// handle once the delay has elapsed.
pub trait TickQueue {
    /// Deliver `handle` after `delay`.
    fn schedule(&mut self, handle: TickHandle, delay: Duration);

    /// Drop `handle` if it is still queued. Unknown handles are ignored.
    fn cancel(&mut self, handle: TickHandle);
}

impl<Q: TickQueue + ?Sized> TickQueue for &mut Q {
    fn schedule(&mut self, handle: TickHandle, delay: Duration) {
        (**self).schedule(handle, delay)
    }

    fn cancel(&mut self, handle: TickHandle) {
        (**self).cancel(handle)
    }
}

/// Bookkeeping for the single outstanding tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchedulerState {
    /// Tick currently queued with the host, at most one
    pub pending_tick: Option<TickHandle>,
    /// Wall clock time (Unix ms) the last tick was scheduled for
    pub last_scheduled_deadline: Option<i64>,
}

/// Outcome of [`RenderScheduler::update_timer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerUpdate {
    /// The tick loop is not running, no redraw was requested
    Stopped,
    /// Redraw now, the next tick fires after `delay`
    Running {
        handle: TickHandle,
        delay: Duration,
        deadline: i64,
    },
}

impl TimerUpdate {
    /// Whether an immediate redraw is due
    pub fn invalidates(&self) -> bool {
        matches!(self, TimerUpdate::Running { .. })
    }
}

/// Delay until the next multiple of `interval` after `now_ms`.
///
/// Always in `1..=interval`, a reading exactly on the boundary waits a full
/// interval.
pub fn phase_aligned_delay(now_ms: i64, interval: Duration) -> Duration {
    let interval_ms = interval.as_millis().max(1) as i64;
    Duration::from_millis((interval_ms - now_ms.rem_euclid(interval_ms)) as u64)
}

/// Drives the once-per-interval redraw tick
#[derive(Debug)]
pub struct RenderScheduler {
    interval: Duration,
    state: SchedulerState,
    next_handle: u32,
    torn_down: bool,
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self::new(INTERACTIVE_UPDATE_RATE)
    }
}

impl RenderScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            state: SchedulerState::default(),
            next_handle: 0,
            torn_down: false,
        }
    }

    /// Restart or stop the tick loop.
    ///
    /// Any pending tick is cancelled first. If the loop should run, the caller
    /// must redraw immediately, and exactly one new tick is queued for the next
    /// interval boundary.
    pub fn update_timer<Q: TickQueue>(
        &mut self,
        should_run: bool,
        now_ms: i64,
        queue: &mut Q,
    ) -> TimerUpdate {
        self.cancel_pending(queue);

        if !should_run || self.torn_down {
            return TimerUpdate::Stopped;
        }

        let delay = phase_aligned_delay(now_ms, self.interval);
        let deadline = now_ms + delay.as_millis() as i64;
        let handle = TickHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);

        queue.schedule(handle, delay);
        self.state.pending_tick = Some(handle);
        self.state.last_scheduled_deadline = Some(deadline);
        trace!("Tick {} scheduled in {} ms", handle.0, delay.as_millis());

        TimerUpdate::Running {
            handle,
            delay,
            deadline,
        }
    }

    /// Claim a fired tick.
    ///
    /// Returns `false` for ticks that were cancelled, replaced, or fired after
    /// teardown. Those must be ignored.
    pub fn accept_tick(&mut self, handle: TickHandle) -> bool {
        if self.torn_down || self.state.pending_tick != Some(handle) {
            trace!("Ignoring stale tick {}", handle.0);
            return false;
        }
        self.state.pending_tick = None;
        true
    }

    /// Cancel the pending tick for good. Later calls never schedule again.
    pub fn teardown<Q: TickQueue>(&mut self, queue: &mut Q) {
        self.cancel_pending(queue);
        self.torn_down = true;
        debug!("Render scheduler torn down");
    }

    fn cancel_pending<Q: TickQueue>(&mut self, queue: &mut Q) {
        if let Some(handle) = self.state.pending_tick.take() {
            trace!("Cancelling tick {}", handle.0);
            queue.cancel(handle);
        }
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}
