//! Draw instructions
//!
//! A [`DrawInstruction`] is a complete description of one frame. It is cheap to
//! build without touching the display and can be drawn onto any RGB565 target,
//! such as the ST7789 panel driver or a test buffer.

use embedded_graphics::{
    geometry::{Point, Size},
    mono_font::{iso_8859_1::FONT_10X20, MonoFont, MonoTextStyle},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Ellipse, PrimitiveStyle},
    text::{Baseline, Text},
};
use heapless::{String, Vec};
use profont::PROFONT_24_POINT;

use crate::Error;

pub const LCD_W: u32 = 240;
pub const LCD_H: u32 = 240;

const LABEL_LEN: usize = 8;
const MAX_LABELS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFont {
    /// Small text
    Caption,
    /// Large time digits
    Digits,
}

impl LabelFont {
    pub fn font(&self) -> &'static MonoFont<'static> {
        match self {
            LabelFont::Caption => &FONT_10X20,
            LabelFont::Digits => &PROFONT_24_POINT,
        }
    }
}

/// Text at a fixed position, top left anchored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: String<LABEL_LEN>,
    pub position: Point,
    pub font: LabelFont,
    pub color: Rgb565,
}

impl Label {
    pub fn new(text: &str, position: Point, font: LabelFont, color: Rgb565) -> Result<Self, Error> {
        let mut buf = String::new();
        buf.push_str(text).map_err(|_| Error::Format)?;
        Ok(Self {
            text: buf,
            position,
            font,
            color,
        })
    }
}

/// Dot marking the current second along the screen edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondsDot {
    pub position: Point,
    pub diameter: u32,
    pub color: Rgb565,
}

/// Everything needed to paint one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawInstruction {
    pub background: Rgb565,
    pub labels: Vec<Label, MAX_LABELS>,
    pub seconds_dot: Option<SecondsDot>,
    /// Hint for panel drivers that can smooth edges. [`DrawInstruction::draw`]
    /// ignores it, mono fonts are never smoothed. Off when the ambient display
    /// has reduced colors.
    pub anti_alias: bool,
}

impl DrawInstruction {
    pub fn new(background: Rgb565) -> Self {
        Self {
            background,
            labels: Vec::new(),
            seconds_dot: None,
            anti_alias: true,
        }
    }

    pub fn push_label(&mut self, label: Label) -> Result<(), Error> {
        self.labels.push(label).map_err(|_| Error::Format)
    }

    /// Find a label by its text
    pub fn label(&self, text: &str) -> Option<&Label> {
        self.labels.iter().find(|label| label.text.as_str() == text)
    }

    /// Paint the frame onto `target`
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        target.clear(self.background)?;

        for label in &self.labels {
            let style = MonoTextStyle::new(label.font.font(), label.color);
            Text::with_baseline(label.text.as_str(), label.position, style, Baseline::Top)
                .draw(target)?;
        }

        if let Some(dot) = &self.seconds_dot {
            Ellipse::new(dot.position, Size::new(dot.diameter, dot.diameter))
                .into_styled(PrimitiveStyle::with_fill(dot.color))
                .draw(target)?;
        }

        Ok(())
    }
}

/// Position of the seconds dot, travelling clockwise from the top center
pub(crate) fn seconds_dot_position(diameter: i32, seconds: i32) -> Point {
    let (w, h) = (LCD_W as i32, LCD_H as i32);
    let sec_h: i32 = h / 17;
    let sec_w: i32 = w / 17;

    match seconds {
        0..=7 => Point::new((8 + seconds) * sec_w, 0),
        8..=22 => Point::new(w - diameter, (seconds - 7) * sec_h),
        23..=37 => Point::new(w - (seconds - 21) * sec_w, h - diameter),
        38..=52 => Point::new(0, h - (seconds - 36) * sec_h),
        _ => Point::new((seconds - 52) * sec_w, 0),
    }
}
