use chrono::{TimeZone, Utc};
use clock_dashboard_wasm::application::{ClockFaceConfig, mount_clock};
use clock_dashboard_wasm::domain::clock::FixedTimeSource;
use clock_dashboard_wasm::domain::errors::AppError;
use clock_dashboard_wasm::infrastructure::rendering::{ManualFrameScheduler, RecordingSurface};

fn noon() -> FixedTimeSource {
    FixedTimeSource(Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap())
}

fn run_frames(scheduler: &ManualFrameScheduler, count: usize) {
    for frame in 0..count {
        scheduler.run_frame(frame as f64 * 16.7);
    }
}

#[test]
fn draws_once_per_frame_while_mounted() {
    let scheduler = ManualFrameScheduler::new();
    let surface = RecordingSurface::new();
    let clock = mount_clock(&ClockFaceConfig::new(120.0, "Asia/Hong_Kong"), surface.clone(), noon(), scheduler.clone())
        .unwrap();

    // first draw happens on mount
    assert_eq!(surface.frames(), 1);
    run_frames(&scheduler, 3);
    assert_eq!(surface.frames(), 4);
    assert_eq!(clock.frames(), 4);
    assert_eq!(scheduler.pending(), 1);
}

#[test]
fn no_draw_after_unmount() {
    let scheduler = ManualFrameScheduler::new();
    let surface = RecordingSurface::new();
    let clock =
        mount_clock(&ClockFaceConfig::new(120.0, "UTC"), surface.clone(), noon(), scheduler.clone()).unwrap();
    run_frames(&scheduler, 2);
    let drawn = surface.len();

    drop(clock);

    assert_eq!(scheduler.pending(), 0);
    run_frames(&scheduler, 10);
    assert_eq!(surface.len(), drawn);
}

#[test]
fn stop_cancels_without_dropping() {
    let scheduler = ManualFrameScheduler::new();
    let surface = RecordingSurface::new();
    let clock = mount_clock(&ClockFaceConfig::new(90.0, "local"), surface.clone(), noon(), scheduler.clone()).unwrap();

    clock.stop();

    assert!(!clock.is_running());
    assert_eq!(scheduler.run_frame(16.7), 0);
    assert_eq!(surface.frames(), 1);
}

#[test]
fn remount_with_new_zone_replaces_the_loop() {
    let scheduler = ManualFrameScheduler::new();
    let old_surface = RecordingSurface::new();
    let new_surface = RecordingSurface::new();

    let old = mount_clock(&ClockFaceConfig::new(120.0, "UTC"), old_surface.clone(), noon(), scheduler.clone()).unwrap();
    drop(old);
    let new = mount_clock(
        &ClockFaceConfig::new(160.0, "America/Vancouver"),
        new_surface.clone(),
        noon(),
        scheduler.clone(),
    )
    .unwrap();

    run_frames(&scheduler, 5);
    assert_eq!(old_surface.frames(), 1);
    assert_eq!(new_surface.frames(), 6);
    assert_eq!(new.zone().to_string(), "America/Vancouver");
    assert_eq!(scheduler.pending(), 1);
}

#[test]
fn invalid_zone_never_starts_a_loop() {
    let scheduler = ManualFrameScheduler::new();
    let surface = RecordingSurface::new();

    let result = mount_clock(&ClockFaceConfig::new(120.0, "Mars/Olympus_Mons"), surface.clone(), noon(), scheduler.clone());

    assert!(matches!(result, Err(AppError::InvalidTimeZone(_))));
    assert!(surface.is_empty());
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn zero_diameter_is_rejected() {
    let scheduler = ManualFrameScheduler::new();
    let result = mount_clock(&ClockFaceConfig::new(0.0, "UTC"), RecordingSurface::new(), noon(), scheduler.clone());
    assert!(matches!(result, Err(AppError::ConfigError(_))));
    assert_eq!(scheduler.pending(), 0);
}
