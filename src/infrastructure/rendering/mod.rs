//! Canvas 2D rendering: the surface seam, the clock and chart renderers and
//! the animation-frame loop.

pub mod chart_renderer;
pub mod clock_renderer;
pub mod frame_loop;
pub mod surface;

pub use chart_renderer::LineChartRenderer;
pub use clock_renderer::ClockFaceRenderer;
pub use frame_loop::{AnimationFrameScheduler, FrameLoop, FrameScheduler, ManualFrameScheduler};
pub use surface::{DrawOp, RecordingSurface, Surface};

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::domain::errors::{AppError, RenderingResult};

/// Size the canvas and hand back its 2D context.
pub fn prepare_canvas(canvas: &HtmlCanvasElement, width: u32, height: u32) -> RenderingResult<CanvasRenderingContext2d> {
    canvas.set_width(width);
    canvas.set_height(height);
    canvas
        .get_context("2d")
        .map_err(|e| AppError::from_js("getContext", e))?
        .ok_or_else(|| AppError::RenderingError("2D context not available".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| AppError::RenderingError("Failed to cast to 2D context".into()))
}
