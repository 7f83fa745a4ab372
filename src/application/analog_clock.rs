//! Mounting a clock face: resolve the zone once, then redraw every frame
//! until the returned handle is dropped.

use chrono::{DateTime, Local, Utc};

use crate::domain::{
    clock::{ClockFaceGeometry, ClockZone, TimeSource, hand_angles_at},
    errors::AppError,
    logging::LogComponent,
};
use crate::infrastructure::rendering::{ClockFaceRenderer, FrameLoop, FrameScheduler, Surface};
use crate::time_utils::format_clock_readout;
use crate::{log_debug, log_error};

/// Fixed for the lifetime of one mounted face; a change means a new mount.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockFaceConfig {
    pub diameter: f64,
    /// IANA name, or empty / "local"
    pub time_zone: String,
}

impl ClockFaceConfig {
    pub fn new(diameter: f64, time_zone: impl Into<String>) -> Self {
        Self { diameter, time_zone: time_zone.into() }
    }

    pub fn zone(&self) -> Result<ClockZone, AppError> {
        self.time_zone.parse()
    }
}

/// A running face. Dropping it cancels the pending frame request.
pub struct MountedClock<S: FrameScheduler + 'static> {
    zone: ClockZone,
    frame_loop: FrameLoop<S>,
}

impl<S: FrameScheduler + 'static> MountedClock<S> {
    pub fn zone(&self) -> ClockZone {
        self.zone
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    pub fn frames(&self) -> u64 {
        self.frame_loop.frames()
    }

    pub fn stop(&self) {
        self.frame_loop.stop();
    }
}

/// Start the frame loop for one face.
///
/// An unknown zone is returned as `AppError::InvalidTimeZone` and logged
/// here, once; no loop is started. Draw failures inside the loop are
/// logged on first occurrence only.
pub fn mount_clock<Sf, T, S>(config: &ClockFaceConfig, mut surface: Sf, time: T, scheduler: S) -> Result<MountedClock<S>, AppError>
where
    Sf: Surface + 'static,
    T: TimeSource + 'static,
    S: FrameScheduler + 'static,
{
    let zone = config.zone().inspect_err(|e| {
        log_error!(LogComponent::Application("AnalogClock"), "❌ {}", e);
    })?;
    let geometry = ClockFaceGeometry::new(config.diameter)
        .ok_or_else(|| AppError::ConfigError(format!("clock diameter must be positive, got {}", config.diameter)))?;
    let renderer = ClockFaceRenderer::new(geometry);

    let mut reported = false;
    let frame_loop = FrameLoop::new(scheduler, move |_timestamp| {
        let angles = hand_angles_at(&zone, time.now());
        if let Err(e) = renderer.draw(&mut surface, &angles) {
            if !reported {
                reported = true;
                log_error!(LogComponent::Application("AnalogClock"), "❌ Draw failed for {}: {}", zone, e);
            }
        }
    });
    frame_loop.start(0.0)?;
    log_debug!(LogComponent::Application("AnalogClock"), "🕒 Clock mounted for {} at {}px", zone, config.diameter);

    Ok(MountedClock { zone, frame_loop })
}

/// 24-hour `HH:MM:SS` for the digital readout under a face.
pub fn digital_readout(zone: &ClockZone, instant: DateTime<Utc>) -> String {
    match zone {
        ClockZone::Local => format_clock_readout(&instant.with_timezone(&Local)),
        ClockZone::Named(tz) => format_clock_readout(&instant.with_timezone(tz)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn readout_follows_zone() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 12, 5, 9).unwrap();
        let hong_kong: ClockZone = "Asia/Hong_Kong".parse().unwrap();
        assert_eq!(digital_readout(&hong_kong, instant), "20:05:09");
        let utc: ClockZone = "UTC".parse().unwrap();
        assert_eq!(digital_readout(&utc, instant), "12:05:09");
    }
}
