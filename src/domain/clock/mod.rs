//! Clock aggregate: zone resolution, hand angles and face geometry.

pub mod face;
pub mod value_objects;

pub use face::*;
pub use value_objects::*;

use chrono::{DateTime, Utc};

/// Where "now" comes from. Swapped for a fixed instant in tests.
pub trait TimeSource {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource(pub DateTime<Utc>);

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Hand angles for `instant` as seen on a clock in `zone`.
pub fn hand_angles_at(zone: &ClockZone, instant: DateTime<Utc>) -> HandAngles {
    HandAngles::from_wall_time(zone.wall_time(instant))
}
