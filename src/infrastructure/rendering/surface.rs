//! 2D drawing surface abstraction.
//!
//! The canvas context implements it for the browser; `RecordingSurface`
//! captures the calls so renderers can be checked on the host.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use strum::{AsRefStr, Display as StrumDisplay};
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::domain::errors::{AppError, RenderingResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum TextBaseline {
    Top,
    Middle,
    Alphabetic,
    Bottom,
}

/// The subset of the canvas 2D API the renderers need.
pub trait Surface {
    fn clear(&mut self, width: f64, height: f64);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64) -> RenderingResult<()>;
    fn rotate(&mut self, radians: f64) -> RenderingResult<()>;

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Full circle path
    fn circle(&mut self, x: f64, y: f64, radius: f64) -> RenderingResult<()>;
    fn fill(&mut self);
    fn stroke(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn set_fill_color(&mut self, color: &str);
    fn set_stroke_color(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_dash(&mut self, segments: &[f64]) -> RenderingResult<()>;

    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> RenderingResult<()>;
}

impl Surface for CanvasRenderingContext2d {
    fn clear(&mut self, width: f64, height: f64) {
        self.clear_rect(0.0, 0.0, width, height);
    }

    fn save(&mut self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&mut self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn translate(&mut self, x: f64, y: f64) -> RenderingResult<()> {
        CanvasRenderingContext2d::translate(self, x, y).map_err(|e| AppError::from_js("translate", e))
    }

    fn rotate(&mut self, radians: f64) -> RenderingResult<()> {
        CanvasRenderingContext2d::rotate(self, radians).map_err(|e| AppError::from_js("rotate", e))
    }

    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::line_to(self, x, y);
    }

    fn circle(&mut self, x: f64, y: f64, radius: f64) -> RenderingResult<()> {
        self.arc(x, y, radius, 0.0, TAU).map_err(|e| AppError::from_js("arc", e))
    }

    fn fill(&mut self) {
        CanvasRenderingContext2d::fill(self);
    }

    fn stroke(&mut self) {
        CanvasRenderingContext2d::stroke(self);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        CanvasRenderingContext2d::fill_rect(self, x, y, width, height);
    }

    fn set_fill_color(&mut self, color: &str) {
        self.set_fill_style(&JsValue::from(color));
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.set_stroke_style(&JsValue::from(color));
    }

    fn set_line_width(&mut self, width: f64) {
        CanvasRenderingContext2d::set_line_width(self, width);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        CanvasRenderingContext2d::set_line_cap(self, cap.as_ref());
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> RenderingResult<()> {
        let array = js_sys::Array::new();
        for segment in segments {
            array.push(&JsValue::from_f64(*segment));
        }
        CanvasRenderingContext2d::set_line_dash(self, &array).map_err(|e| AppError::from_js("setLineDash", e))
    }

    fn set_font(&mut self, font: &str) {
        CanvasRenderingContext2d::set_font(self, font);
    }

    fn set_text_align(&mut self, align: TextAlign) {
        CanvasRenderingContext2d::set_text_align(self, align.as_ref());
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        CanvasRenderingContext2d::set_text_baseline(self, baseline.as_ref());
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> RenderingResult<()> {
        CanvasRenderingContext2d::fill_text(self, text, x, y).map_err(|e| AppError::from_js("fillText", e))
    }
}

/// One recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear { width: f64, height: f64 },
    Save,
    Restore,
    Translate { x: f64, y: f64 },
    Rotate { radians: f64 },
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Circle { x: f64, y: f64, radius: f64 },
    Fill,
    Stroke,
    FillRect { x: f64, y: f64, width: f64, height: f64 },
    FillColor(String),
    StrokeColor(String),
    LineWidth(f64),
    LineCap(LineCap),
    LineDash(Vec<f64>),
    Font(String),
    TextAlign(TextAlign),
    TextBaseline(TextBaseline),
    FillText { text: String, x: f64, y: f64 },
}

/// Surface that records every call. Clones share the same log, so a test
/// can keep one handle while a renderer or frame loop owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    ops: Rc<RefCell<Vec<DrawOp>>>,
    reject_text: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records like `new`, but every `fill_text` fails after being logged.
    pub fn rejecting_text() -> Self {
        Self { reject_text: true, ..Self::default() }
    }

    pub fn ops(&self) -> Vec<DrawOp> {
        self.ops.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.ops.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.borrow().is_empty()
    }

    pub fn count(&self, predicate: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.borrow().iter().filter(|op| predicate(op)).count()
    }

    pub fn reset(&self) {
        self.ops.borrow_mut().clear();
    }

    /// Number of full redraws, i.e. `Clear` calls.
    pub fn frames(&self) -> usize {
        self.count(|op| matches!(op, DrawOp::Clear { .. }))
    }

    /// Deepest save nesting, or `None` if a restore ever ran without a matching save
    /// or the log ends inside a save.
    pub fn balanced_depth(&self) -> Option<usize> {
        let mut depth = 0usize;
        let mut deepest = 0usize;
        for op in self.ops.borrow().iter() {
            match op {
                DrawOp::Save => {
                    depth += 1;
                    deepest = deepest.max(depth);
                }
                DrawOp::Restore => depth = depth.checked_sub(1)?,
                _ => {}
            }
        }
        (depth == 0).then_some(deepest)
    }

    /// True when every translate/rotate happens inside a save/restore scope.
    pub fn transforms_scoped(&self) -> bool {
        let mut depth = 0usize;
        for op in self.ops.borrow().iter() {
            match op {
                DrawOp::Save => depth += 1,
                DrawOp::Restore => depth = depth.saturating_sub(1),
                DrawOp::Translate { .. } | DrawOp::Rotate { .. } if depth == 0 => return false,
                _ => {}
            }
        }
        true
    }

    fn push(&self, op: DrawOp) {
        self.ops.borrow_mut().push(op);
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.push(DrawOp::Clear { width, height });
    }

    fn save(&mut self) {
        self.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.push(DrawOp::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) -> RenderingResult<()> {
        self.push(DrawOp::Translate { x, y });
        Ok(())
    }

    fn rotate(&mut self, radians: f64) -> RenderingResult<()> {
        self.push(DrawOp::Rotate { radians });
        Ok(())
    }

    fn begin_path(&mut self) {
        self.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.push(DrawOp::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.push(DrawOp::LineTo { x, y });
    }

    fn circle(&mut self, x: f64, y: f64, radius: f64) -> RenderingResult<()> {
        self.push(DrawOp::Circle { x, y, radius });
        Ok(())
    }

    fn fill(&mut self) {
        self.push(DrawOp::Fill);
    }

    fn stroke(&mut self) {
        self.push(DrawOp::Stroke);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push(DrawOp::FillRect { x, y, width, height });
    }

    fn set_fill_color(&mut self, color: &str) {
        self.push(DrawOp::FillColor(color.to_string()));
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.push(DrawOp::StrokeColor(color.to_string()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.push(DrawOp::LineWidth(width));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.push(DrawOp::LineCap(cap));
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> RenderingResult<()> {
        self.push(DrawOp::LineDash(segments.to_vec()));
        Ok(())
    }

    fn set_font(&mut self, font: &str) {
        self.push(DrawOp::Font(font.to_string()));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.push(DrawOp::TextAlign(align));
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.push(DrawOp::TextBaseline(baseline));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> RenderingResult<()> {
        self.push(DrawOp::FillText { text: text.to_string(), x, y });
        if self.reject_text {
            return Err(AppError::RenderingError(format!("fillText rejected '{text}'")));
        }
        Ok(())
    }
}
