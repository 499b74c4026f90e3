//! Default watchface
//!
//! Shows "It's" above the hours and minutes, each in its own color. Ambient
//! mode drops to a black background, a single text color and no seconds dot.

use embedded_graphics::{geometry::Point, pixelcolor::Rgb565, prelude::*};

use super::{
    draw::{seconds_dot_position, DrawInstruction, Label, LabelFont, SecondsDot},
    Renderer, ScreenShape,
};
use crate::{
    system::{
        mode::{CapabilityFlags, Mode},
        time::ClockSnapshot,
    },
    Error,
};

const CAPTION: &str = "It's";
const DOT_DIAMETER: u32 = 14;

/// Colors used for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb565,
    pub caption: Rgb565,
    pub hours: Rgb565,
    pub minutes: Rgb565,
    pub seconds: Rgb565,
}

impl Palette {
    pub const INTERACTIVE: Palette = Palette {
        background: Rgb565::new(2, 4, 3),
        // matte yellow
        caption: Rgb565::new(26, 46, 11),
        // matte blue
        hours: Rgb565::new(11, 35, 25),
        // matte red
        minutes: Rgb565::new(25, 22, 11),
        seconds: Rgb565::new(29, 55, 29),
    };

    pub const AMBIENT: Palette = Palette::ambient(Rgb565::new(24, 48, 24));

    /// Ambient palette for displays with reduced colors
    pub const REDUCED_COLOR: Palette = Palette::ambient(Rgb565::WHITE);

    const fn ambient(text: Rgb565) -> Palette {
        Palette {
            background: Rgb565::BLACK,
            caption: text,
            hours: text,
            minutes: text,
            seconds: text,
        }
    }

    /// Pick the palette for a mode
    pub fn select(mode: Mode, capabilities: CapabilityFlags) -> Palette {
        match mode {
            Mode::Interactive => Palette::INTERACTIVE,
            Mode::Ambient if capabilities.reduced_color_ambient => Palette::REDUCED_COLOR,
            Mode::Ambient => Palette::AMBIENT,
        }
    }
}

/// Label positions for a screen shape
struct Layout {
    caption: Point,
    hours: Point,
    minutes: Point,
}

impl Layout {
    const RECTANGULAR: Layout = Layout {
        caption: Point::new(24, 36),
        hours: Point::new(104, 72),
        minutes: Point::new(104, 132),
    };

    // Pulled in so nothing lands in the clipped corners
    const ROUND: Layout = Layout {
        caption: Point::new(56, 52),
        hours: Point::new(104, 80),
        minutes: Point::new(104, 136),
    };

    fn for_shape(shape: ScreenShape) -> &'static Layout {
        match shape {
            ScreenShape::Rectangular => &Layout::RECTANGULAR,
            ScreenShape::Round => &Layout::ROUND,
        }
    }
}

/// Offset applied in ambient mode on burn-in prone panels.
///
/// Moves the whole face by at most one pixel per axis, cycling every nine
/// minutes so no pixel stays lit for long.
fn burn_in_offset(minute: u8) -> Point {
    let minute = minute as i32;
    Point::new(minute % 3 - 1, (minute / 3) % 3 - 1)
}

/// Basic default watchface
#[derive(Debug, Default)]
pub struct DefaultWatchface {
    shape: ScreenShape,
}

impl DefaultWatchface {
    /// Create new watchface
    pub fn new(shape: ScreenShape) -> Self {
        Self { shape }
    }

    pub fn shape(&self) -> ScreenShape {
        self.shape
    }

    fn build(
        &self,
        snapshot: &ClockSnapshot,
        mode: Mode,
        capabilities: CapabilityFlags,
    ) -> Result<DrawInstruction, Error> {
        let palette = Palette::select(mode, capabilities);
        let layout = Layout::for_shape(self.shape);
        let offset = if mode == Mode::Ambient && capabilities.burn_in_risk {
            burn_in_offset(snapshot.minute)
        } else {
            Point::zero()
        };

        let mut frame = DrawInstruction::new(palette.background);
        frame.anti_alias = !(mode == Mode::Ambient && capabilities.reduced_color_ambient);

        let mut hours = [0u8; 2];
        let mut minutes = [0u8; 2];
        frame.push_label(Label::new(
            CAPTION,
            layout.caption + offset,
            LabelFont::Caption,
            palette.caption,
        )?)?;
        frame.push_label(Label::new(
            snapshot.hour_digits(&mut hours)?,
            layout.hours + offset,
            LabelFont::Digits,
            palette.hours,
        )?)?;
        frame.push_label(Label::new(
            snapshot.minute_digits(&mut minutes)?,
            layout.minutes + offset,
            LabelFont::Digits,
            palette.minutes,
        )?)?;

        // Seconds are only shown while the face redraws every second
        if mode == Mode::Interactive {
            frame.seconds_dot = Some(SecondsDot {
                position: seconds_dot_position(DOT_DIAMETER as i32, snapshot.second as i32),
                diameter: DOT_DIAMETER,
                color: palette.seconds,
            });
        }

        Ok(frame)
    }
}

impl Renderer for DefaultWatchface {
    type Output = Result<DrawInstruction, Error>;

    fn render(
        &self,
        snapshot: &ClockSnapshot,
        mode: Mode,
        capabilities: CapabilityFlags,
    ) -> Self::Output {
        self.build(snapshot, mode, capabilities)
    }

    fn set_shape(&mut self, shape: ScreenShape) {
        self.shape = shape;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::time::HourFormat;
    use chrono_tz::Tz;

    fn snapshot(hour: u8, minute: u8, second: u8) -> ClockSnapshot {
        ClockSnapshot {
            hour,
            minute,
            second,
            time_zone: Tz::UTC,
            format: HourFormat::TwentyFourHour,
        }
    }

    #[test]
    fn interactive_frame_has_colored_digits_and_seconds() {
        let face = DefaultWatchface::default();
        let frame = face
            .render(&snapshot(12, 34, 56), Mode::Interactive, CapabilityFlags::default())
            .unwrap();

        assert_eq!(frame.background, Palette::INTERACTIVE.background);
        assert_eq!(frame.labels.len(), 3);
        assert_eq!(frame.label("It's").unwrap().color, Palette::INTERACTIVE.caption);
        assert_eq!(frame.label("12").unwrap().color, Palette::INTERACTIVE.hours);
        assert_eq!(frame.label("34").unwrap().color, Palette::INTERACTIVE.minutes);
        assert!(frame.seconds_dot.is_some());
        assert!(frame.anti_alias);
    }

    #[test]
    fn ambient_frame_is_monochrome_without_seconds() {
        let face = DefaultWatchface::default();
        let frame = face
            .render(&snapshot(9, 5, 0), Mode::Ambient, CapabilityFlags::default())
            .unwrap();

        assert_eq!(frame.background, Rgb565::BLACK);
        assert!(frame.labels.iter().all(|l| l.color == Palette::AMBIENT.caption));
        assert!(frame.label("09").is_some());
        assert!(frame.label("05").is_some());
        assert!(frame.seconds_dot.is_none());
        assert!(frame.anti_alias);
    }

    #[test]
    fn reduced_color_ambient_disables_anti_aliasing() {
        let face = DefaultWatchface::default();
        let capabilities = CapabilityFlags {
            reduced_color_ambient: true,
            burn_in_risk: false,
        };
        let frame = face.render(&snapshot(9, 5, 0), Mode::Ambient, capabilities).unwrap();
        assert!(!frame.anti_alias);
        assert!(frame.labels.iter().all(|l| l.color == Rgb565::WHITE));

        // Only applies in ambient
        let frame = face.render(&snapshot(9, 5, 0), Mode::Interactive, capabilities).unwrap();
        assert!(frame.anti_alias);
    }

    #[test]
    fn burn_in_protection_shifts_ambient_layout() {
        let face = DefaultWatchface::default();
        let capabilities = CapabilityFlags {
            reduced_color_ambient: false,
            burn_in_risk: true,
        };

        let plain = face
            .render(&snapshot(9, 5, 0), Mode::Ambient, CapabilityFlags::default())
            .unwrap();
        let shifted = face.render(&snapshot(9, 5, 0), Mode::Ambient, capabilities).unwrap();
        let offset = burn_in_offset(5);
        assert_ne!(offset, Point::zero());
        for (a, b) in plain.labels.iter().zip(shifted.labels.iter()) {
            assert_eq!(a.position + offset, b.position);
        }

        // Interactive mode is never shifted
        let interactive = face
            .render(&snapshot(9, 5, 0), Mode::Interactive, capabilities)
            .unwrap();
        assert_eq!(interactive.label("09").unwrap().position, Layout::RECTANGULAR.hours);
    }

    #[test]
    fn burn_in_offset_stays_within_a_pixel() {
        for minute in 0..60 {
            let offset = burn_in_offset(minute);
            assert!(offset.x.abs() <= 1 && offset.y.abs() <= 1);
        }
    }

    #[test]
    fn round_screens_use_the_inset_layout() {
        let mut face = DefaultWatchface::default();
        face.set_shape(ScreenShape::Round);
        let frame = face
            .render(&snapshot(12, 34, 0), Mode::Interactive, CapabilityFlags::default())
            .unwrap();
        assert_eq!(face.shape(), ScreenShape::Round);
        assert_eq!(frame.label("It's").unwrap().position, Layout::ROUND.caption);
    }
}
