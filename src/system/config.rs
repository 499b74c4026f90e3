//! Watch face configuration

use chrono_tz::Tz;
use embassy_time::Duration;

use super::{scheduler::INTERACTIVE_UPDATE_RATE, time::HourFormat};
use crate::{ui::ScreenShape, Error};

/// Settings fixed when the engine is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceConfig {
    /// Redraw period in interactive mode
    pub update_interval: Duration,
    /// Hour counting used by snapshots
    pub hour_format: HourFormat,
    /// Zone used until the host reports one
    pub time_zone: Tz,
    /// Screen shape until the host reports insets
    pub shape: ScreenShape,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            update_interval: INTERACTIVE_UPDATE_RATE,
            hour_format: HourFormat::TwentyFourHour,
            time_zone: Tz::UTC,
            shape: ScreenShape::Rectangular,
        }
    }
}

impl FaceConfig {
    /// Create new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interactive redraw period, a whole number of milliseconds
    pub fn with_update_interval(mut self, interval: Duration) -> Result<Self, Error> {
        if interval.as_millis() == 0 || interval.as_micros() % 1000 != 0 {
            return Err(Error::InvalidInterval);
        }
        self.update_interval = interval;
        Ok(self)
    }

    pub fn with_hour_format(mut self, format: HourFormat) -> Self {
        self.hour_format = format;
        self
    }

    pub fn with_time_zone(mut self, zone: Tz) -> Self {
        self.time_zone = zone;
        self
    }

    /// Set the zone from an IANA identifier
    pub fn with_time_zone_name(self, name: &str) -> Result<Self, Error> {
        let zone = name.parse::<Tz>().map_err(|_| Error::UnknownTimeZone)?;
        Ok(self.with_time_zone(zone))
    }

    pub fn with_shape(mut self, shape: ScreenShape) -> Self {
        self.shape = shape;
        self
    }
}
