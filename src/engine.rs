//! Event dispatch
//!
//! The host reports lifecycle changes as [`Event`]s. Every event goes through
//! [`WatchFaceEngine::handle`], which updates state, restarts or stops the tick
//! loop exactly once and returns at most one frame.

use chrono_tz::Tz;

use crate::{
    system::{
        config::FaceConfig,
        mode::{CapabilityFlags, DisplayModeState, Mode, Visibility},
        scheduler::{RenderScheduler, SchedulerState, TickHandle, TickQueue},
        time::{ClockSource, WallClock},
    },
    ui::{Renderer, ScreenShape},
};

/// Kind of touch reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapType {
    /// Finger went down
    Touch,
    /// Touch turned into another gesture
    TouchCancel,
    /// Tap completed
    Tap,
}

/// Environment change delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    VisibilityChanged(bool),
    AmbientModeChanged(bool),
    CapabilitiesChanged(CapabilityFlags),
    TimeZoneChanged(Tz),
    /// Once per minute nudge while in ambient mode
    TimeTick,
    Tap(TapType),
    InsetsChanged { round: bool },
    /// Session ends, no further events follow
    Destroy,
}

/// Watch face state machine.
///
/// Owns the clock, the display mode, the scheduler, the renderer and the host's
/// delay queue. Everything runs on one context, driven through `&mut self`.
pub struct WatchFaceEngine<C, R, Q> {
    clock: ClockSource<C>,
    display: DisplayModeState,
    scheduler: RenderScheduler,
    renderer: R,
    queue: Q,
}

impl<C, R, Q> WatchFaceEngine<C, R, Q>
where
    C: WallClock,
    R: Renderer,
    Q: TickQueue,
{
    pub fn new(clock: C, mut renderer: R, queue: Q, config: FaceConfig) -> Self {
        renderer.set_shape(config.shape);
        Self {
            clock: ClockSource::new(clock, config.time_zone, config.hour_format),
            display: DisplayModeState::new(),
            scheduler: RenderScheduler::new(config.update_interval),
            renderer,
            queue,
        }
    }

    /// Evaluate the tick loop once at startup
    pub fn start(&mut self) -> Option<R::Output> {
        info!("Watch face started");
        self.dispatch(false)
    }

    /// Apply a host event. Returns the frame to present, if any.
    pub fn handle(&mut self, event: Event) -> Option<R::Output> {
        if self.scheduler.is_torn_down() {
            trace!("Ignoring event after teardown");
            return None;
        }

        let repaint = match event {
            Event::VisibilityChanged(visible) => {
                self.display.set_visibility(Visibility::from_visible(visible)) && visible
            }
            Event::AmbientModeChanged(ambient) => self.display.set_mode(Mode::from_ambient(ambient)),
            Event::CapabilitiesChanged(flags) => self.display.set_capabilities(flags),
            Event::TimeZoneChanged(zone) => {
                self.clock.set_time_zone(zone);
                true
            }
            Event::TimeTick => true,
            Event::Tap(tap) => {
                debug!("Tap: {:?}", tap);
                true
            }
            Event::InsetsChanged { round } => {
                self.renderer.set_shape(ScreenShape::from_round(round));
                true
            }
            Event::Destroy => {
                self.scheduler.teardown(&mut self.queue);
                info!("Watch face destroyed");
                return None;
            }
        };

        self.dispatch(repaint)
    }

    /// A tick queued with the host fired
    pub fn on_tick(&mut self, handle: TickHandle) -> Option<R::Output> {
        if !self.scheduler.accept_tick(handle) {
            return None;
        }
        self.dispatch(false)
    }

    /// Cancel the pending tick and ignore everything that follows
    pub fn teardown(&mut self) {
        self.handle(Event::Destroy);
    }

    /// Restart the tick loop, then redraw at most once
    fn dispatch(&mut self, repaint: bool) -> Option<R::Output> {
        let update = self.scheduler.update_timer(
            self.display.should_run(),
            self.clock.now_millis(),
            &mut self.queue,
        );

        if update.invalidates() || (repaint && self.display.is_visible()) {
            Some(self.redraw())
        } else {
            None
        }
    }

    fn redraw(&self) -> R::Output {
        let snapshot = self.clock.snapshot();
        self.renderer
            .render(&snapshot, self.display.mode(), self.display.capabilities())
    }

    pub fn display(&self) -> &DisplayModeState {
        &self.display
    }

    pub fn clock(&self) -> &ClockSource<C> {
        &self.clock
    }

    /// Access the clock, e.g. to apply a time sync
    pub fn clock_mut(&mut self) -> &mut ClockSource<C> {
        &mut self.clock
    }

    pub fn scheduler_state(&self) -> &SchedulerState {
        self.scheduler.state()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut Q {
        &mut self.queue
    }

    pub fn is_torn_down(&self) -> bool {
        self.scheduler.is_torn_down()
    }
}
