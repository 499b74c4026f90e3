//! UI definitions module

use crate::system::{
    mode::{CapabilityFlags, Mode},
    time::ClockSnapshot,
};

mod default_watchface;
mod draw;

pub use default_watchface::{DefaultWatchface, Palette};
pub use draw::{DrawInstruction, Label, LabelFont, SecondsDot, LCD_H, LCD_W};

/// Produces what to draw for one redraw.
///
/// Takes `&self` so rendering can never touch scheduling state. The engine
/// hands the output to the host without looking at it.
pub trait Renderer {
    type Output;

    /// Render the face for a fresh snapshot
    fn render(&self, snapshot: &ClockSnapshot, mode: Mode, capabilities: CapabilityFlags)
        -> Self::Output;

    /// Screen shape reported by the host, used for layout
    fn set_shape(&mut self, _shape: ScreenShape) {}
}

/// Outline of the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenShape {
    #[default]
    Rectangular,
    Round,
}

impl ScreenShape {
    pub fn from_round(round: bool) -> Self {
        if round {
            ScreenShape::Round
        } else {
            ScreenShape::Rectangular
        }
    }
}
