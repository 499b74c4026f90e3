//! Watch face engine for the PineTime
//!
//! Decides when the face is redrawn and how it looks in interactive and
//! ambient mode. While visible and interactive the face redraws once per
//! second, phase aligned to the wall clock. In ambient mode or while hidden
//! nothing is scheduled and redraws only follow host events.
//!
//! The host feeds [`Event`]s into a [`WatchFaceEngine`], either directly or
//! through the embassy [`runtime`], and presents the frames it returns.
#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
mod fmt;

mod engine;
mod error;
pub mod runtime;
pub mod system;
pub mod ui;

#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;

pub use engine::{Event, TapType, WatchFaceEngine};
pub use error::Error;
pub use system::{
    config::FaceConfig,
    mode::{CapabilityFlags, DisplayModeState, Mode, Visibility},
    scheduler::{
        phase_aligned_delay, RenderScheduler, SchedulerState, TickHandle, TickQueue, TimerUpdate,
        INTERACTIVE_UPDATE_RATE,
    },
    time::{ClockSnapshot, ClockSource, HourFormat, TimeManager, TimeReference, WallClock},
};
pub use ui::{DefaultWatchface, DrawInstruction, Renderer, ScreenShape};

pub use chrono_tz::Tz;
