//! Trip clock and time-of-day values.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{MINUTES_PER_DAY, MINUTES_PER_HOUR};
use crate::numbers::minutes_to_hours;

/// Errors raised when parsing an `HH:MM` string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClockError {
    #[error("time of day must be formatted HH:MM (got {0:?})")]
    Format(String),
    #[error("time of day {hours:02}:{minutes:02} is outside 00:00..=24:00")]
    OutOfRange { hours: u32, minutes: u32 },
}

/// Minutes since midnight, `00:00..=24:00`.
///
/// `24:00` only appears as the closing marker of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self(0);
    pub const END_OF_DAY: Self = Self(1_440);

    /// Build from hours and minutes, rejecting values past `24:00`.
    #[must_use]
    pub fn from_hm(hours: u32, minutes: u32) -> Option<Self> {
        if minutes >= MINUTES_PER_HOUR {
            return None;
        }
        let total = hours.checked_mul(MINUTES_PER_HOUR)?.checked_add(minutes)?;
        if total > MINUTES_PER_DAY {
            return None;
        }
        u16::try_from(total).ok().map(Self)
    }

    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.0 as u32
    }

    #[must_use]
    pub const fn hours(self) -> u32 {
        self.minutes() / MINUTES_PER_HOUR
    }

    #[must_use]
    pub const fn minute(self) -> u32 {
        self.minutes() % MINUTES_PER_HOUR
    }

    /// Hours from `self` until `next`; a negative delta wraps past midnight.
    #[must_use]
    pub fn hours_until(self, next: Self) -> f64 {
        let from = i64::from(self.0);
        let to = i64::from(next.0);
        let mut diff = to - from;
        if diff < 0 {
            diff += i64::from(MINUTES_PER_DAY);
        }
        minutes_to_hours(u32::try_from(diff).unwrap_or(0))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (h, m) = trimmed
            .split_once(':')
            .ok_or_else(|| ClockError::Format(trimmed.to_string()))?;
        if h.is_empty() || m.len() != 2 {
            return Err(ClockError::Format(trimmed.to_string()));
        }
        let hours: u32 = h
            .parse()
            .map_err(|_| ClockError::Format(trimmed.to_string()))?;
        let minutes: u32 = m
            .parse()
            .map_err(|_| ClockError::Format(trimmed.to_string()))?;
        Self::from_hm(hours, minutes).ok_or(ClockError::OutOfRange { hours, minutes })
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Absolute minutes since 00:00 of trip day 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripClock(u32);

impl TripClock {
    pub const TRIP_START: Self = Self(0);

    #[must_use]
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    /// Clock for a time of day on a 1-based trip day.
    #[must_use]
    pub const fn at(day_number: u32, time: TimeOfDay) -> Self {
        let day_index = day_number.saturating_sub(1);
        Self(
            day_index
                .saturating_mul(MINUTES_PER_DAY)
                .saturating_add(time.minutes()),
        )
    }

    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.0
    }

    /// Zero-based day index.
    #[must_use]
    pub const fn day_index(self) -> u32 {
        self.0 / MINUTES_PER_DAY
    }

    /// One-based day number, as printed on log sheets.
    #[must_use]
    pub const fn day_number(self) -> u32 {
        self.day_index() + 1
    }

    #[must_use]
    pub const fn time_of_day(self) -> TimeOfDay {
        #[allow(clippy::cast_possible_truncation)]
        let minutes = (self.0 % MINUTES_PER_DAY) as u16;
        TimeOfDay(minutes)
    }

    #[must_use]
    pub const fn advanced(self, minutes: u32) -> Self {
        Self(self.0.saturating_add(minutes))
    }

    pub const fn advance(&mut self, minutes: u32) {
        self.0 = self.0.saturating_add(minutes);
    }

    /// Hours elapsed since `earlier`, zero if `earlier` is later.
    #[must_use]
    pub fn hours_since(self, earlier: Self) -> f64 {
        minutes_to_hours(self.0.saturating_sub(earlier.0))
    }
}

impl fmt::Display for TripClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day {} {}", self.day_number(), self.time_of_day())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_of_day_formats_and_parses() {
        let t = TimeOfDay::from_hm(6, 5).unwrap();
        assert_eq!(t.to_string(), "06:05");
        assert_eq!("06:05".parse::<TimeOfDay>().unwrap(), t);
        assert_eq!(TimeOfDay::END_OF_DAY.to_string(), "24:00");
        assert_eq!("24:00".parse::<TimeOfDay>().unwrap(), TimeOfDay::END_OF_DAY);
    }

    #[test]
    fn time_of_day_rejects_bad_input() {
        assert!(matches!("6".parse::<TimeOfDay>(), Err(ClockError::Format(_))));
        assert!(matches!("06:5".parse::<TimeOfDay>(), Err(ClockError::Format(_))));
        assert_eq!(
            "24:30".parse::<TimeOfDay>(),
            Err(ClockError::OutOfRange {
                hours: 24,
                minutes: 30
            })
        );
        assert!(TimeOfDay::from_hm(10, 60).is_none());
    }

    #[test]
    fn hours_until_wraps_past_midnight() {
        let late = TimeOfDay::from_hm(22, 0).unwrap();
        let early = TimeOfDay::from_hm(2, 30).unwrap();
        assert!((late.hours_until(early) - 4.5).abs() < f64::EPSILON);
        assert!((early.hours_until(late) - 19.5).abs() < f64::EPSILON);
        assert!(late.hours_until(late).abs() < f64::EPSILON);
        assert!((late.hours_until(TimeOfDay::END_OF_DAY) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn trip_clock_tracks_days() {
        let mut clock = TripClock::at(1, TimeOfDay::from_hm(23, 30).unwrap());
        assert_eq!(clock.day_number(), 1);
        clock.advance(45);
        assert_eq!(clock.day_number(), 2);
        assert_eq!(clock.time_of_day().to_string(), "00:15");
        assert_eq!(clock.to_string(), "day 2 00:15");
        assert_eq!(TripClock::at(2, TimeOfDay::from_hm(0, 15).unwrap()), clock);
    }

    #[test]
    fn time_of_day_serializes_as_string() {
        let t = TimeOfDay::from_hm(14, 45).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"14:45\"");
        let back: TimeOfDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
