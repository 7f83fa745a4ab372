use crate::domain::chart::{ChartLayout, ChartRow, PriceSeries, Tooltip};
use crate::domain::errors::RenderingResult;
use crate::domain::logging::LogComponent;
use crate::log_debug;

use super::surface::{LineCap, Surface, TextAlign, TextBaseline};

const GRID_COLOR: &str = "#ccc";
const AXIS_COLOR: &str = "#666";
const LABEL_FONT: &str = "12px Arial";
const DOT_RADIUS: f64 = 3.0;
const ACTIVE_DOT_RADIUS: f64 = 5.0;

/// Line chart of a price series with a numeric time axis.
#[derive(Debug, Clone)]
pub struct LineChartRenderer {
    width: f64,
    height: f64,
    line_color: String,
}

impl LineChartRenderer {
    pub fn new(width: f64, height: f64, line_color: impl Into<String>) -> Self {
        Self { width, height, line_color: line_color.into() }
    }

    /// Full redraw. `hover` is the row under the pointer, if any.
    pub fn render<S: Surface>(
        &self,
        surface: &mut S,
        series: &PriceSeries,
        layout: Option<&ChartLayout>,
        hover: Option<&ChartRow>,
    ) -> RenderingResult<()> {
        surface.clear(self.width, self.height);

        let Some(layout) = layout else {
            return self.render_no_data(surface);
        };

        log_debug!(
            LogComponent::Infrastructure("LineChartRenderer"),
            "📈 Rendering {} points, x={:?}",
            series.rows().len(),
            layout.x_domain()
        );

        self.render_grid(surface, layout)?;
        self.render_axes(surface, series, layout)?;
        self.render_line(surface, series, layout);
        if let Some(row) = hover {
            self.render_tooltip(surface, series, layout, row)?;
        }
        Ok(())
    }

    fn render_grid<S: Surface>(&self, surface: &mut S, layout: &ChartLayout) -> RenderingResult<()> {
        scoped(surface, |surface| {
            surface.set_line_dash(&[3.0, 3.0])?;
            surface.set_stroke_color(GRID_COLOR);
            surface.set_line_width(1.0);
            for price in layout.y_scale().ticks() {
                let y = layout.y_to_px(price);
                surface.begin_path();
                surface.move_to(layout.plot_left(), y);
                surface.line_to(layout.plot_right(), y);
                surface.stroke();
            }
            for tick in layout.time_ticks() {
                let x = layout.x_to_px(tick as f64);
                surface.begin_path();
                surface.move_to(x, layout.plot_top());
                surface.line_to(x, layout.plot_bottom());
                surface.stroke();
            }
            Ok(())
        })
    }

    fn render_axes<S: Surface>(&self, surface: &mut S, series: &PriceSeries, layout: &ChartLayout) -> RenderingResult<()> {
        scoped(surface, |surface| {
            surface.set_stroke_color(AXIS_COLOR);
            surface.set_fill_color(AXIS_COLOR);
            surface.set_line_width(1.0);
            surface.set_font(LABEL_FONT);

            surface.begin_path();
            surface.move_to(layout.plot_left(), layout.plot_top());
            surface.line_to(layout.plot_left(), layout.plot_bottom());
            surface.line_to(layout.plot_right(), layout.plot_bottom());
            surface.stroke();

            let scale = layout.y_scale();
            let precision = scale.precision();
            surface.set_text_align(TextAlign::Right);
            surface.set_text_baseline(TextBaseline::Middle);
            for price in scale.ticks() {
                let text = format!("{:.*}", precision, price);
                surface.fill_text(&text, layout.plot_left() - 6.0, layout.y_to_px(price))?;
            }

            surface.set_text_align(TextAlign::Center);
            surface.set_text_baseline(TextBaseline::Top);
            for tick in layout.time_ticks() {
                let text = series.label_for(tick);
                surface.fill_text(&text, layout.x_to_px(tick as f64), layout.plot_bottom() + 8.0)?;
            }
            Ok(())
        })
    }

    fn render_line<S: Surface>(&self, surface: &mut S, series: &PriceSeries, layout: &ChartLayout) {
        let points: Vec<(f64, f64)> = series
            .rows()
            .iter()
            .map(|row| (layout.x_to_px(row.epoch_seconds as f64), layout.y_to_px(row.price_usd)))
            .collect();

        surface.save();
        surface.set_stroke_color(&self.line_color);
        surface.set_line_width(1.5);
        surface.set_line_cap(LineCap::Round);
        surface.begin_path();
        trace_monotone(surface, &points);
        surface.stroke();

        surface.set_fill_color("#fff");
        for (x, y) in &points {
            surface.begin_path();
            if surface.circle(*x, *y, DOT_RADIUS).is_ok() {
                surface.fill();
                surface.stroke();
            }
        }
        surface.restore();
    }

    fn render_tooltip<S: Surface>(
        &self,
        surface: &mut S,
        series: &PriceSeries,
        layout: &ChartLayout,
        row: &ChartRow,
    ) -> RenderingResult<()> {
        let tooltip = Tooltip::for_row(series, row);
        let x = layout.x_to_px(row.epoch_seconds as f64);
        let y = layout.y_to_px(row.price_usd);

        scoped(surface, |surface| {
            surface.set_stroke_color(GRID_COLOR);
            surface.set_line_width(1.0);
            surface.begin_path();
            surface.move_to(x, layout.plot_top());
            surface.line_to(x, layout.plot_bottom());
            surface.stroke();

            surface.set_fill_color(&self.line_color);
            surface.begin_path();
            surface.circle(x, y, ACTIVE_DOT_RADIUS)?;
            surface.fill();

            let box_width = 190.0;
            let box_height = 46.0;
            // flip to the left of the cursor near the right edge
            let box_x = if x + 12.0 + box_width > layout.width() { x - 12.0 - box_width } else { x + 12.0 };
            let box_y = (y - box_height / 2.0).clamp(0.0, (layout.height() - box_height).max(0.0));
            surface.set_fill_color("#fff");
            surface.fill_rect(box_x, box_y, box_width, box_height);
            surface.set_stroke_color(GRID_COLOR);
            surface.begin_path();
            surface.move_to(box_x, box_y);
            surface.line_to(box_x + box_width, box_y);
            surface.line_to(box_x + box_width, box_y + box_height);
            surface.line_to(box_x, box_y + box_height);
            surface.line_to(box_x, box_y);
            surface.stroke();

            surface.set_font(LABEL_FONT);
            surface.set_text_align(TextAlign::Left);
            surface.set_text_baseline(TextBaseline::Top);
            surface.set_fill_color("#000");
            surface.fill_text(&tooltip.label, box_x + 8.0, box_y + 8.0)?;
            surface.set_fill_color(&self.line_color);
            surface.fill_text(&tooltip.value, box_x + 8.0, box_y + 26.0)?;
            Ok(())
        })
    }

    fn render_no_data<S: Surface>(&self, surface: &mut S) -> RenderingResult<()> {
        scoped(surface, |surface| {
            surface.set_fill_color(AXIS_COLOR);
            surface.set_font("16px Arial");
            surface.set_text_align(TextAlign::Center);
            surface.set_text_baseline(TextBaseline::Middle);
            surface.fill_text("No data", self.width / 2.0, self.height / 2.0)
        })
    }
}

/// Run `body` between save and restore; the state is restored even when a step fails.
fn scoped<S, F>(surface: &mut S, body: F) -> RenderingResult<()>
where
    S: Surface,
    F: FnOnce(&mut S) -> RenderingResult<()>,
{
    surface.save();
    let result = body(surface);
    surface.restore();
    result
}

/// Monotone cubic path through `points` (Fritsch-Carlson tangents), so the
/// curve never overshoots between samples. Points must be sorted by x.
fn trace_monotone<S: Surface>(surface: &mut S, points: &[(f64, f64)]) {
    let Some(&(x0, y0)) = points.first() else { return };
    surface.move_to(x0, y0);
    if points.len() < 3 {
        for &(x, y) in &points[1..] {
            surface.line_to(x, y);
        }
        return;
    }
    let tangents = monotone_tangents(points);
    for i in 0..points.len() - 1 {
        let (xa, ya) = points[i];
        let (xb, yb) = points[i + 1];
        let h = xb - xa;
        // canvas has no bezier in the trait; approximate each segment with short lines
        const STEPS: usize = 8;
        for step in 1..=STEPS {
            let t = step as f64 / STEPS as f64;
            let (t2, t3) = (t * t, t * t * t);
            let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
            let h10 = t3 - 2.0 * t2 + t;
            let h01 = -2.0 * t3 + 3.0 * t2;
            let h11 = t3 - t2;
            let y = h00 * ya + h10 * h * tangents[i] + h01 * yb + h11 * h * tangents[i + 1];
            surface.line_to(xa + t * h, y);
        }
    }
}

fn monotone_tangents(points: &[(f64, f64)]) -> Vec<f64> {
    let n = points.len();
    let secant = |i: usize| {
        let dx = points[i + 1].0 - points[i].0;
        if dx == 0.0 { 0.0 } else { (points[i + 1].1 - points[i].1) / dx }
    };
    let slopes: Vec<f64> = (0..n - 1).map(secant).collect();
    let mut tangents = vec![0.0; n];
    tangents[0] = slopes[0];
    tangents[n - 1] = slopes[n - 2];
    for i in 1..n - 1 {
        tangents[i] = if slopes[i - 1] * slopes[i] <= 0.0 { 0.0 } else { (slopes[i - 1] + slopes[i]) / 2.0 };
    }
    for i in 0..n - 1 {
        if slopes[i] == 0.0 {
            tangents[i] = 0.0;
            tangents[i + 1] = 0.0;
            continue;
        }
        let a = tangents[i] / slopes[i];
        let b = tangents[i + 1] / slopes[i];
        let sum = a * a + b * b;
        if sum > 9.0 {
            let tau = 3.0 / sum.sqrt();
            tangents[i] = tau * a * slopes[i];
            tangents[i + 1] = tau * b * slopes[i];
        }
    }
    tangents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::Margins;
    use crate::domain::market_data::PriceSample;
    use crate::infrastructure::rendering::surface::{DrawOp, RecordingSurface};

    fn series(points: &[(i64, f64)]) -> PriceSeries {
        let samples: Vec<_> = points.iter().map(|(t, p)| PriceSample::at_epoch(*t, *p)).collect();
        PriceSeries::from_snapshot(&samples, chrono_tz::America::Vancouver)
    }

    #[test]
    fn empty_series_renders_placeholder() {
        let renderer = LineChartRenderer::new(900.0, 400.0, "#8884d8");
        let mut surface = RecordingSurface::new();
        renderer.render(&mut surface, &series(&[]), None, None).unwrap();
        assert!(surface.ops().contains(&DrawOp::FillText { text: "No data".into(), x: 450.0, y: 200.0 }));
    }

    #[test]
    fn monotone_path_does_not_overshoot() {
        let points = [(0.0, 100.0), (60.0, 20.0), (120.0, 20.0), (180.0, 70.0)];
        let mut surface = RecordingSurface::new();
        trace_monotone(&mut surface, &points);

        for op in surface.ops() {
            if let DrawOp::LineTo { x, y } = op {
                assert!((20.0 - 1e-9..=100.0 + 1e-9).contains(&y), "overshoot at ({x}, {y})");
            }
        }
        assert_eq!(surface.ops().last(), Some(&DrawOp::LineTo { x: 180.0, y: 70.0 }));
    }

    #[test]
    fn hover_draws_tooltip_label_in_display_zone() {
        let s = series(&[(100, 80.1), (200, 81.3)]);
        let layout = ChartLayout::new(&s, 900.0, 400.0, Margins::default()).unwrap();
        let mut surface = RecordingSurface::new();
        let hover = s.nearest(110.0).cloned();
        LineChartRenderer::new(900.0, 400.0, "#8884d8")
            .render(&mut surface, &s, Some(&layout), hover.as_ref())
            .unwrap();

        let texts: Vec<String> = surface
            .ops()
            .into_iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"1969-12-31, 16:01:40".to_string()));
        assert!(texts.contains(&"price_usd : 80.1".to_string()));
        assert_eq!(surface.balanced_depth(), Some(1));
    }

    #[test]
    fn failed_text_still_restores_state() {
        let s = series(&[(100, 80.1), (200, 81.3)]);
        let layout = ChartLayout::new(&s, 900.0, 400.0, Margins::default()).unwrap();
        let renderer = LineChartRenderer::new(900.0, 400.0, "#8884d8");

        let mut surface = RecordingSurface::rejecting_text();
        assert!(renderer.render(&mut surface, &s, Some(&layout), s.nearest(100.0)).is_err());
        assert_eq!(surface.balanced_depth(), Some(1));

        let mut empty = RecordingSurface::rejecting_text();
        assert!(renderer.render(&mut empty, &series(&[]), None, None).is_err());
        assert_eq!(empty.balanced_depth(), Some(1));
    }
}
