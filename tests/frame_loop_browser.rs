#![cfg(target_arch = "wasm32")]

use std::time::Duration;

use clock_dashboard_wasm::application::{ClockFaceConfig, mount_clock};
use clock_dashboard_wasm::domain::clock::SystemTimeSource;
use clock_dashboard_wasm::infrastructure::rendering::{AnimationFrameScheduler, RecordingSurface, prepare_canvas};
use gloo_timers::future::sleep;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test(async)]
async fn animation_frames_stop_after_unmount() {
    let surface = RecordingSurface::new();
    let clock = mount_clock(&ClockFaceConfig::new(180.0, "UTC"), surface.clone(), SystemTimeSource, AnimationFrameScheduler)
        .unwrap();

    sleep(Duration::from_millis(200)).await;
    assert!(surface.frames() > 1);

    drop(clock);
    let drawn = surface.len();
    sleep(Duration::from_millis(200)).await;
    assert_eq!(surface.len(), drawn);
}

#[wasm_bindgen_test]
fn canvas_face_draws_without_error() {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();
    document.body().unwrap().append_child(&canvas).unwrap();

    let context = prepare_canvas(&canvas, 180, 180).unwrap();
    let clock = mount_clock(&ClockFaceConfig::new(180.0, "Asia/Hong_Kong"), context, SystemTimeSource, AnimationFrameScheduler)
        .unwrap();

    assert_eq!(canvas.width(), 180);
    assert!(clock.is_running());
}
