use chrono::{DateTime, Local, Timelike, Utc};
use chrono_tz::Tz;
use derive_more::{Display, From, Into};
use std::f64::consts::TAU;
use std::str::FromStr;

use crate::domain::errors::AppError;

/// Zone a clock face follows. `Local` is the browser/system zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ClockZone {
    #[display(fmt = "local")]
    Local,
    #[display(fmt = "{}", _0)]
    Named(Tz),
}

impl ClockZone {
    /// Project an instant into this zone's wall clock.
    pub fn wall_time(&self, instant: DateTime<Utc>) -> WallTime {
        match self {
            ClockZone::Local => WallTime::from_time(&instant.with_timezone(&Local)),
            ClockZone::Named(tz) => WallTime::from_time(&instant.with_timezone(tz)),
        }
    }
}

impl FromStr for ClockZone {
    type Err = AppError;

    /// Empty or `"local"` selects the system zone; anything else must be an IANA name.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let name = raw.trim();
        if name.is_empty() || name.eq_ignore_ascii_case("local") {
            return Ok(ClockZone::Local);
        }
        name.parse::<Tz>()
            .map(ClockZone::Named)
            .map_err(|_| AppError::InvalidTimeZone(format!("unknown time zone '{name}'")))
    }
}

/// Wall-clock components on a 12-hour dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallTime {
    hour: u8,
    minute: u8,
    second: u8,
}

impl WallTime {
    /// Hours fold onto the dial (13 -> 1); minutes and seconds must be in range.
    pub fn new(hour: u8, minute: u8, second: u8) -> Option<Self> {
        (minute < 60 && second < 60).then_some(Self { hour: hour % 12, minute, second })
    }

    pub fn from_time<T: Timelike>(time: &T) -> Self {
        Self {
            hour: (time.hour() % 12) as u8,
            minute: time.minute() as u8,
            // leap second reads as :59
            second: time.second().min(59) as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }
}

/// Fraction of a full clockwise turn measured from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, From, Into)]
pub struct Turn(f64);

impl Turn {
    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn radians(&self) -> f64 {
        self.0 * TAU
    }

    pub fn degrees(&self) -> f64 {
        self.0 * 360.0
    }
}

/// Angles of the three hands for one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAngles {
    pub hour: Turn,
    pub minute: Turn,
    pub second: Turn,
}

impl HandAngles {
    pub fn from_wall_time(time: WallTime) -> Self {
        let hour = f64::from(time.hour);
        let minute = f64::from(time.minute);
        let second = f64::from(time.second);
        Self {
            hour: Turn((hour + minute / 60.0) / 12.0),
            minute: Turn((minute + second / 60.0) / 60.0),
            second: Turn(second / 60.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_local_aliases() {
        assert_eq!("".parse::<ClockZone>(), Ok(ClockZone::Local));
        assert_eq!(" Local ".parse::<ClockZone>(), Ok(ClockZone::Local));
    }

    #[test]
    fn rejects_unknown_zone() {
        let err = "Mars/Olympus_Mons".parse::<ClockZone>().unwrap_err();
        assert!(matches!(err, AppError::InvalidTimeZone(_)));
    }

    #[test]
    fn folds_afternoon_hours() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 1, 15, 4, 5).unwrap();
        let wall = ClockZone::Named(chrono_tz::UTC).wall_time(instant);
        assert_eq!((wall.hour(), wall.minute(), wall.second()), (3, 4, 5));
    }

    #[test]
    fn new_rejects_out_of_range_fields() {
        assert!(WallTime::new(3, 60, 0).is_none());
        assert!(WallTime::new(3, 0, 60).is_none());
        assert_eq!(WallTime::new(15, 0, 0).map(|w| w.hour()), Some(3));
    }
}
