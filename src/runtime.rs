//! Async driver for the engine
//!
//! Runs the engine as an embassy task: host events arrive through a channel,
//! the pending tick is an `embassy_time` deadline, and both are awaited
//! together so a tick can never fire while an event is being handled.
//!
//! ```ignore
//! static EVENTS: EventChannel<ThreadModeRawMutex, 8> = Channel::new();
//!
//! #[embassy_executor::task]
//! async fn watch_face(mut display: Display, clock: TimeManager) {
//!     let mut engine = WatchFaceEngine::new(
//!         clock,
//!         DefaultWatchface::default(),
//!         EmbassyTickQueue::new(),
//!         FaceConfig::default(),
//!     );
//!     run(&mut engine, &EVENTS, |frame| {
//!         if let Ok(frame) = frame {
//!             let _ = frame.draw(&mut display);
//!         }
//!     })
//!     .await;
//! }
//! ```

use embassy_futures::select::{select, Either};
use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};
use embassy_time::{Duration, Instant, Timer};

use crate::{
    engine::{Event, WatchFaceEngine},
    system::{
        scheduler::{TickHandle, TickQueue},
        time::WallClock,
    },
    ui::Renderer,
};

/// Channel the host posts events into
pub type EventChannel<M, const N: usize> = Channel<M, Event, N>;

/// Tick queue backed by the embassy timer.
///
/// Keeps the single pending tick as an absolute deadline for [`run`] to wait on.
#[derive(Debug, Default)]
pub struct EmbassyTickQueue {
    pending: Option<(TickHandle, Instant)>,
}

impl EmbassyTickQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending tick and when it is due
    pub fn next_deadline(&self) -> Option<(TickHandle, Instant)> {
        self.pending
    }

    /// Take the pending tick once its deadline passed
    pub fn fire(&mut self) -> Option<TickHandle> {
        self.pending.take().map(|(handle, _)| handle)
    }
}

impl TickQueue for EmbassyTickQueue {
    fn schedule(&mut self, handle: TickHandle, delay: Duration) {
        self.pending = Some((handle, Instant::now() + delay));
    }

    fn cancel(&mut self, handle: TickHandle) {
        if matches!(self.pending, Some((pending, _)) if pending == handle) {
            self.pending = None;
        }
    }
}

/// Drive `engine` until [`Event::Destroy`] arrives.
///
/// Every frame the engine produces is passed to `present`.
pub async fn run<M, C, R, F, const N: usize>(
    engine: &mut WatchFaceEngine<C, R, EmbassyTickQueue>,
    events: &EventChannel<M, N>,
    mut present: F,
) where
    M: RawMutex,
    C: WallClock,
    R: Renderer,
    F: FnMut(R::Output),
{
    if let Some(frame) = engine.start() {
        present(frame);
    }

    while !engine.is_torn_down() {
        let frame = match engine.queue().next_deadline() {
            Some((_, deadline)) => match select(events.receive(), Timer::at(deadline)).await {
                Either::First(event) => engine.handle(event),
                Either::Second(()) => match engine.queue_mut().fire() {
                    Some(handle) => engine.on_tick(handle),
                    None => None,
                },
            },
            None => engine.handle(events.receive().await),
        };

        if let Some(frame) = frame {
            present(frame);
        }
    }

    info!("Watch face task finished");
}
