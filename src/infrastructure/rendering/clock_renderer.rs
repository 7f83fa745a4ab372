use crate::domain::clock::{ClockFaceGeometry, HandAngles, HandStroke, Tick, palette};
use crate::domain::errors::RenderingResult;

use super::surface::{LineCap, Surface, TextAlign, TextBaseline};

/// Draws a complete analog face for one set of hand angles.
///
/// Every frame is a full redraw. Each element is drawn inside its own
/// save/restore pair so rotations never carry over to the next element.
#[derive(Debug, Clone, Copy)]
pub struct ClockFaceRenderer {
    geometry: ClockFaceGeometry,
}

impl ClockFaceRenderer {
    pub fn new(geometry: ClockFaceGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &ClockFaceGeometry {
        &self.geometry
    }

    pub fn draw<S: Surface>(&self, surface: &mut S, angles: &HandAngles) -> RenderingResult<()> {
        let size = self.geometry.diameter();
        surface.clear(size, size);

        self.draw_face(surface)?;
        for tick in self.geometry.hour_ticks() {
            self.draw_tick(surface, &tick, palette::HOUR_TICK)?;
        }
        for tick in self.geometry.minute_ticks() {
            self.draw_tick(surface, &tick, palette::MINUTE_TICK)?;
        }
        self.draw_numerals(surface)?;
        for hand in self.geometry.hands(angles) {
            self.draw_hand(surface, &hand)?;
        }
        self.draw_cap(surface)
    }

    fn draw_face<S: Surface>(&self, surface: &mut S) -> RenderingResult<()> {
        let center = self.geometry.center();
        surface.save();
        surface.begin_path();
        let result = surface.circle(center, center, self.geometry.face_radius());
        if result.is_ok() {
            surface.set_fill_color(palette::FACE);
            surface.fill();
            surface.set_line_width(self.geometry.rim_width());
            surface.set_stroke_color(palette::RIM);
            surface.stroke();
        }
        surface.restore();
        result
    }

    fn draw_tick<S: Surface>(&self, surface: &mut S, tick: &Tick, color: &str) -> RenderingResult<()> {
        self.rotated(surface, tick.angle, |surface| {
            surface.begin_path();
            surface.move_to(0.0, -tick.inner);
            surface.line_to(0.0, -tick.outer);
            surface.set_line_width(tick.width);
            surface.set_stroke_color(color);
            surface.stroke();
            Ok(())
        })
    }

    fn draw_numerals<S: Surface>(&self, surface: &mut S) -> RenderingResult<()> {
        let center = self.geometry.center();
        surface.save();
        surface.set_font(&self.geometry.numeral_font());
        surface.set_fill_color(palette::NUMERAL);
        surface.set_text_baseline(TextBaseline::Middle);
        surface.set_text_align(TextAlign::Center);
        let result = self
            .geometry
            .numerals()
            .iter()
            .try_for_each(|numeral| surface.fill_text(&numeral.text, center + numeral.dx, center + numeral.dy));
        surface.restore();
        result
    }

    fn draw_hand<S: Surface>(&self, surface: &mut S, hand: &HandStroke) -> RenderingResult<()> {
        self.rotated(surface, hand.angle, |surface| {
            surface.begin_path();
            surface.move_to(0.0, hand.tail);
            surface.line_to(0.0, -hand.length);
            surface.set_line_width(hand.width);
            surface.set_stroke_color(hand.color);
            surface.set_line_cap(LineCap::Round);
            surface.stroke();
            Ok(())
        })
    }

    fn draw_cap<S: Surface>(&self, surface: &mut S) -> RenderingResult<()> {
        let center = self.geometry.center();
        surface.save();
        surface.begin_path();
        let result = surface.circle(center, center, self.geometry.cap_radius());
        if result.is_ok() {
            surface.set_fill_color(palette::CAP_FILL);
            surface.set_stroke_color(palette::CAP_RIM);
            surface.set_line_width(1.5);
            surface.fill();
            surface.stroke();
        }
        surface.restore();
        result
    }

    /// Run `body` with the origin moved to the center and rotated by `angle`.
    /// The state is restored even when a step fails.
    fn rotated<S, F>(&self, surface: &mut S, angle: f64, body: F) -> RenderingResult<()>
    where
        S: Surface,
        F: FnOnce(&mut S) -> RenderingResult<()>,
    {
        let center = self.geometry.center();
        surface.save();
        let result = surface
            .translate(center, center)
            .and_then(|_| surface.rotate(angle))
            .and_then(|_| body(surface));
        surface.restore();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::WallTime;
    use crate::infrastructure::rendering::surface::{DrawOp, RecordingSurface};

    #[test]
    fn one_stroke_per_tick_hand_face_and_cap() {
        let renderer = ClockFaceRenderer::new(ClockFaceGeometry::new(180.0).unwrap());
        let mut surface = RecordingSurface::new();
        let angles = HandAngles::from_wall_time(WallTime::new(10, 8, 42).unwrap());

        renderer.draw(&mut surface, &angles).unwrap();

        // face + 12 hour + 48 minute + 3 hands + cap
        assert_eq!(surface.count(|op| matches!(op, DrawOp::Stroke)), 65);
        assert_eq!(surface.count(|op| matches!(op, DrawOp::FillText { .. })), 12);
        assert_eq!(surface.frames(), 1);
    }
}
