//! Time keeping for the watch face
//!
//! [`ClockSource`] turns a wall clock reading into the fields a face displays.
//! On the watch the wall clock is a [`TimeManager`], which extrapolates from the
//! last time sync using the monotonic embassy timer.

use chrono::{NaiveDate, TimeZone as _, Timelike, Utc};
use chrono_tz::Tz;
use embassy_time::Instant;

use crate::Error;

// Include the firmware build time, used until the first time sync
include!(concat!(env!("OUT_DIR"), "/utc.rs"));

/// Source of wall clock time in Unix milliseconds (UTC).
pub trait WallClock {
    fn now_millis(&self) -> i64;
}

impl<C: WallClock + ?Sized> WallClock for &C {
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}

/// UTC time paired with the monotonic instant at which it was valid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeReference {
    /// Clock time in Unix milliseconds
    utc_millis: i64,
    /// Related system time
    instant: Instant,
}

impl Default for TimeReference {
    fn default() -> Self {
        Self {
            utc_millis: BUILD_UTC_MILLIS,
            instant: Instant::from_ticks(0),
        }
    }
}

impl TimeReference {
    /// Reference valid at an explicit instant
    pub const fn at(utc_millis: i64, instant: Instant) -> Self {
        Self {
            utc_millis,
            instant,
        }
    }

    /// Reference valid right now
    pub fn from_utc_millis(utc_millis: i64) -> Self {
        Self::at(utc_millis, Instant::now())
    }

    /// Create new time reference from Current Time Service data, received now
    pub fn from_cts_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_cts_bytes_at(bytes, Instant::now())
    }

    /// Create new time reference from Current Time Service data received at `instant`.
    ///
    /// Layout: year (u16 LE), month, day, hours, minutes, seconds, day of week,
    /// fractions of a second in 1/256 steps.
    pub fn from_cts_bytes_at(bytes: &[u8], instant: Instant) -> Result<Self, Error> {
        if bytes.len() < 9 {
            return Err(Error::InvalidTimeReference);
        }
        let year = u16::from_le_bytes([bytes[0], bytes[1]]) as i32;
        let month = bytes[2] as u32;
        let day = bytes[3] as u32;
        let hour = bytes[4] as u32;
        let min = bytes[5] as u32;
        let sec = bytes[6] as u32;
        // Convert fractions_256 to milliseconds
        let milli = bytes[8] as u32 * 1000 / 256;

        let time = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_milli_opt(hour, min, sec, milli))
            .ok_or(Error::InvalidTimeReference)?;

        Ok(Self::at(time.and_utc().timestamp_millis(), instant))
    }

    pub fn utc_millis(&self) -> i64 {
        self.utc_millis
    }

    pub fn instant(&self) -> Instant {
        self.instant
    }
}

/// Wall clock backed by the embassy time driver
#[derive(Debug, Default)]
pub struct TimeManager {
    reference: TimeReference,
}

impl TimeManager {
    /// Initialize time measurement on boot
    pub fn init() -> Self {
        Self::default()
    }

    pub fn with_reference(reference: TimeReference) -> Self {
        Self { reference }
    }

    /// Update time reference
    pub fn set_time(&mut self, reference: TimeReference) {
        info!("Time reference updated to {}", reference.utc_millis);
        self.reference = reference;
    }

    /// Wall clock time at the given monotonic instant
    pub fn time_at(&self, now: Instant) -> i64 {
        let base = self.reference.utc_millis;
        match now.checked_duration_since(self.reference.instant) {
            Some(elapsed) => base + elapsed.as_millis() as i64,
            None => base - self.reference.instant.duration_since(now).as_millis() as i64,
        }
    }
}

impl WallClock for TimeManager {
    fn now_millis(&self) -> i64 {
        self.time_at(Instant::now())
    }
}

/// How the hour field is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HourFormat {
    /// 0..=23
    #[default]
    TwentyFourHour,
    /// 0..=11, noon and midnight show as 0
    TwelveHour,
}

/// Displayable time fields, taken fresh for every redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSnapshot {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub time_zone: Tz,
    pub format: HourFormat,
}

impl ClockSnapshot {
    /// Zero padded hour
    pub fn hour_digits<'b>(&self, buf: &'b mut [u8; 2]) -> Result<&'b str, Error> {
        two_digits(buf, self.hour)
    }

    /// Zero padded minute
    pub fn minute_digits<'b>(&self, buf: &'b mut [u8; 2]) -> Result<&'b str, Error> {
        two_digits(buf, self.minute)
    }

    /// Zero padded second
    pub fn second_digits<'b>(&self, buf: &'b mut [u8; 2]) -> Result<&'b str, Error> {
        two_digits(buf, self.second)
    }
}

fn two_digits(buf: &mut [u8; 2], value: u8) -> Result<&str, Error> {
    Ok(format_no_std::show(buf, format_args!("{:02}", value))?)
}

/// Current time in a time zone, read from a wall clock on demand
pub struct ClockSource<C> {
    clock: C,
    zone: Tz,
    format: HourFormat,
}

impl<C: WallClock> ClockSource<C> {
    pub fn new(clock: C, zone: Tz, format: HourFormat) -> Self {
        Self {
            clock,
            zone,
            format,
        }
    }

    /// Read the clock and split it into display fields
    pub fn snapshot(&self) -> ClockSnapshot {
        let utc = Utc
            .timestamp_millis_opt(self.clock.now_millis())
            .single()
            .unwrap_or_default();
        let local = utc.with_timezone(&self.zone);
        let hour = match self.format {
            HourFormat::TwentyFourHour => local.hour(),
            HourFormat::TwelveHour => local.hour() % 12,
        };

        ClockSnapshot {
            hour: hour as u8,
            minute: local.minute() as u8,
            second: local.second() as u8,
            time_zone: self.zone,
            format: self.format,
        }
    }

    /// Unix milliseconds, used to phase align ticks
    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    pub fn set_time_zone(&mut self, zone: Tz) {
        debug!("Time zone set to {}", zone.name());
        self.zone = zone;
    }

    /// Set the zone from an IANA identifier such as `Europe/Berlin`.
    pub fn set_time_zone_name(&mut self, name: &str) -> Result<(), Error> {
        match name.parse::<Tz>() {
            Ok(zone) => {
                self.set_time_zone(zone);
                Ok(())
            }
            Err(_) => {
                warn!("Ignoring unknown time zone {}", name);
                Err(Error::UnknownTimeZone)
            }
        }
    }

    pub fn time_zone(&self) -> Tz {
        self.zone
    }

    pub fn hour_format(&self) -> HourFormat {
        self.format
    }

    pub fn set_hour_format(&mut self, format: HourFormat) {
        self.format = format;
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockClock;

    // 2024-03-03 12:34:56.789 UTC
    const NOON_ISH: i64 = 1_709_469_296_789;

    #[test]
    fn snapshot_splits_fields() {
        let clock = MockClock::new(NOON_ISH);
        let source = ClockSource::new(&clock, Tz::UTC, HourFormat::TwentyFourHour);
        let snapshot = source.snapshot();

        assert_eq!(snapshot.hour, 12);
        assert_eq!(snapshot.minute, 34);
        assert_eq!(snapshot.second, 56);
        assert_eq!(snapshot.time_zone, Tz::UTC);
    }

    #[test]
    fn digits_are_zero_padded() {
        let clock = MockClock::new(NOON_ISH);
        let source = ClockSource::new(&clock, Tz::UTC, HourFormat::TwentyFourHour);
        let snapshot = source.snapshot();

        let mut hours = [0u8; 2];
        let mut minutes = [0u8; 2];
        assert_eq!(snapshot.hour_digits(&mut hours).unwrap(), "12");
        assert_eq!(snapshot.minute_digits(&mut minutes).unwrap(), "34");

        clock.set(NOON_ISH - 12 * 3_600_000 - 30 * 60_000);
        let early = source.snapshot();
        let mut buf = [0u8; 2];
        assert_eq!(early.hour_digits(&mut buf).unwrap(), "00");
        let mut buf = [0u8; 2];
        assert_eq!(early.minute_digits(&mut buf).unwrap(), "04");
        let mut buf = [0u8; 2];
        assert_eq!(early.second_digits(&mut buf).unwrap(), "56");
    }

    #[test]
    fn twelve_hour_format_wraps_noon_to_zero() {
        let clock = MockClock::new(NOON_ISH);
        let mut source = ClockSource::new(&clock, Tz::UTC, HourFormat::TwelveHour);
        assert_eq!(source.snapshot().hour, 0);

        clock.advance_millis(5 * 3_600_000);
        assert_eq!(source.snapshot().hour, 5);

        source.set_hour_format(HourFormat::TwentyFourHour);
        assert_eq!(source.snapshot().hour, 17);
    }

    #[test]
    fn snapshot_is_never_cached() {
        let clock = MockClock::new(NOON_ISH);
        let source = ClockSource::new(&clock, Tz::UTC, HourFormat::TwentyFourHour);
        assert_eq!(source.snapshot().second, 56);
        clock.advance_millis(1_000);
        assert_eq!(source.snapshot().second, 57);
    }

    #[test]
    fn time_zone_changes_apply_to_next_snapshot() {
        let clock = MockClock::new(NOON_ISH);
        let mut source = ClockSource::new(&clock, Tz::UTC, HourFormat::TwentyFourHour);

        source.set_time_zone(Tz::Asia__Kolkata);
        let snapshot = source.snapshot();
        assert_eq!((snapshot.hour, snapshot.minute), (18, 4));
        assert_eq!(snapshot.time_zone, Tz::Asia__Kolkata);

        source.set_time_zone_name("America/New_York").unwrap();
        assert_eq!(source.snapshot().hour, 7);
    }

    #[test]
    fn unknown_time_zone_keeps_previous_zone() {
        let clock = MockClock::new(NOON_ISH);
        let mut source = ClockSource::new(&clock, Tz::Europe__Berlin, HourFormat::TwentyFourHour);
        assert_eq!(
            source.set_time_zone_name("Mars/Olympus_Mons"),
            Err(Error::UnknownTimeZone)
        );
        assert_eq!(source.time_zone(), Tz::Europe__Berlin);
    }

    #[test]
    fn time_manager_extrapolates_from_reference() {
        let reference = TimeReference::at(NOON_ISH, Instant::from_millis(5_000));
        let manager = TimeManager::with_reference(reference);

        assert_eq!(manager.time_at(Instant::from_millis(5_000)), NOON_ISH);
        assert_eq!(manager.time_at(Instant::from_millis(7_250)), NOON_ISH + 2_250);
        assert_eq!(manager.time_at(Instant::from_millis(4_000)), NOON_ISH - 1_000);
    }

    #[test]
    fn time_manager_set_time_replaces_reference() {
        let mut manager = TimeManager::with_reference(TimeReference::at(0, Instant::from_ticks(0)));
        manager.set_time(TimeReference::at(NOON_ISH, Instant::from_millis(1_000)));
        assert_eq!(manager.time_at(Instant::from_millis(2_000)), NOON_ISH + 1_000);
    }

    #[test]
    fn cts_payload_is_parsed() {
        // 2024-03-03 12:34:56 + 128/256 s, Sunday
        let bytes = [0xe8, 0x07, 3, 3, 12, 34, 56, 7, 128, 0];
        let reference = TimeReference::from_cts_bytes_at(&bytes, Instant::from_millis(10)).unwrap();

        assert_eq!(reference.utc_millis(), NOON_ISH - 789 + 500);
        assert_eq!(reference.instant(), Instant::from_millis(10));
    }

    #[test]
    fn cts_payload_is_validated() {
        let truncated = [0xe8, 0x07, 3, 3, 12];
        assert_eq!(
            TimeReference::from_cts_bytes_at(&truncated, Instant::from_ticks(0)),
            Err(Error::InvalidTimeReference)
        );

        let february_thirtieth = [0xe8, 0x07, 2, 30, 12, 34, 56, 7, 0];
        assert_eq!(
            TimeReference::from_cts_bytes_at(&february_thirtieth, Instant::from_ticks(0)),
            Err(Error::InvalidTimeReference)
        );

        let bad_hour = [0xe8, 0x07, 3, 3, 25, 0, 0, 7, 0];
        assert!(TimeReference::from_cts_bytes_at(&bad_hour, Instant::from_ticks(0)).is_err());
    }

    #[test]
    fn default_reference_is_build_time() {
        let reference = TimeReference::default();
        assert_eq!(reference.utc_millis(), BUILD_UTC_MILLIS);
        assert!(reference.utc_millis() > NOON_ISH);
    }
}
