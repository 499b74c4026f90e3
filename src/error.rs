//! Errors reported at the edges of the watch face
//!
//! Scheduling and mode transitions are total and never fail. Only input coming
//! from outside (zone names, time sync payloads, configuration) can be rejected.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Time zone identifier is not in the tz database
    UnknownTimeZone,
    /// Time sync payload is truncated or holds an impossible date
    InvalidTimeReference,
    /// Update interval must be at least one millisecond
    InvalidInterval,
    /// A text field did not fit its buffer
    Format,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownTimeZone => f.write_str("unknown time zone"),
            Error::InvalidTimeReference => f.write_str("invalid time reference"),
            Error::InvalidInterval => f.write_str("update interval must be non-zero"),
            Error::Format => f.write_str("text does not fit its buffer"),
        }
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Error::Format
    }
}
