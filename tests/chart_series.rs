use chrono_tz::America::Vancouver;
use clock_dashboard_wasm::domain::chart::{AxisDomain, ChartLayout, Margins, PriceSeries, Tooltip};
use clock_dashboard_wasm::domain::market_data::PriceSample;
use clock_dashboard_wasm::infrastructure::rendering::{DrawOp, LineChartRenderer, RecordingSurface};
use clock_dashboard_wasm::time_utils::format_epoch_seconds;
use insta::assert_json_snapshot;
use serde_json::json;

fn two_row_snapshot() -> Vec<PriceSample> {
    serde_json::from_value(json!([
        { "id": 1, "created_at": "1970-01-01T00:01:40+00:00", "epoch_s": 100, "price_usd": 80.1 },
        { "id": 2, "created_at": "1970-01-01T00:03:20+00:00", "epoch_s": 200, "price_usd": 81.3 }
    ]))
    .unwrap()
}

fn drawn_text(surface: &RecordingSurface) -> Vec<String> {
    surface
        .ops()
        .into_iter()
        .filter_map(|op| match op {
            DrawOp::FillText { text, .. } => Some(text),
            _ => None,
        })
        .collect()
}

#[test]
fn x_domain_is_observed_min_and_max() {
    let series = PriceSeries::from_snapshot(&two_row_snapshot(), Vancouver);
    assert_eq!(series.x_domain(), Some(AxisDomain::new(100.0, 200.0)));

    let layout = ChartLayout::new(&series, 900.0, 400.0, Margins::default()).unwrap();
    assert_eq!(layout.x_domain(), AxisDomain::new(100.0, 200.0));
    assert_eq!(layout.x_to_px(100.0), layout.plot_left());
    assert_eq!(layout.x_to_px(200.0), layout.plot_right());
}

#[test]
fn tooltip_label_uses_the_display_zone() {
    let series = PriceSeries::from_snapshot(&two_row_snapshot(), Vancouver);
    let row = series.nearest(100.0).unwrap();
    let tooltip = Tooltip::for_row(&series, row);

    assert_eq!(tooltip.label, format_epoch_seconds(100, &Vancouver));
    assert_eq!(tooltip.label, "1969-12-31, 16:01:40");
    assert_eq!(tooltip.value, "price_usd : 80.1");
}

#[test]
fn price_axis_brackets_the_data() {
    let series = PriceSeries::from_snapshot(&two_row_snapshot(), Vancouver);
    let scale = series.price_scale().unwrap();
    assert!(scale.domain.min <= 80.1);
    assert!(scale.domain.max >= 81.3);
    assert!(scale.ticks().len() >= 2);
}

#[test]
fn rows_keep_passthrough_order_and_labels() {
    let series = PriceSeries::from_snapshot(&two_row_snapshot(), Vancouver);
    assert_json_snapshot!("chart_rows", series.rows());
    let ids: Vec<_> = series.rows().iter().map(|row| row.extra.get("id").cloned()).collect();
    assert_eq!(ids, vec![Some(json!(1)), Some(json!(2))]);
}

#[test]
fn rendered_axis_and_hover_use_formatted_labels() {
    let series = PriceSeries::from_snapshot(&two_row_snapshot(), Vancouver);
    let layout = ChartLayout::new(&series, 900.0, 400.0, Margins::default());
    let renderer = LineChartRenderer::new(900.0, 400.0, "#8884d8");
    let mut surface = RecordingSurface::new();

    renderer.render(&mut surface, &series, layout.as_ref(), series.nearest(100.0)).unwrap();

    let text = drawn_text(&surface);
    assert!(text.iter().any(|t| t == "1969-12-31, 16:03:20"));
    // axis tick and tooltip both carry the first label
    assert_eq!(text.iter().filter(|t| *t == "1969-12-31, 16:01:40").count(), 2);
    assert!(surface.count(|op| matches!(op, DrawOp::StrokeColor(c) if c == "#8884d8")) >= 1);
    assert!(surface.count(|op| matches!(op, DrawOp::LineDash(d) if d == &vec![3.0, 3.0])) >= 1);
}

#[test]
fn empty_snapshot_shows_placeholder() {
    let series = PriceSeries::from_snapshot(&[], Vancouver);
    assert!(series.x_domain().is_none());
    let layout = ChartLayout::new(&series, 900.0, 400.0, Margins::default());
    assert!(layout.is_none());

    let mut surface = RecordingSurface::new();
    LineChartRenderer::new(900.0, 400.0, "#8884d8").render(&mut surface, &series, None, None).unwrap();
    assert_eq!(drawn_text(&surface), ["No data"]);
}

#[test]
fn single_sample_is_padded_for_drawing_only() {
    let series = PriceSeries::from_snapshot(&[PriceSample::at_epoch(150, 80.0)], Vancouver);
    assert_eq!(series.x_domain(), Some(AxisDomain::new(150.0, 150.0)));

    let layout = ChartLayout::new(&series, 900.0, 400.0, Margins::default()).unwrap();
    assert_eq!(layout.x_domain(), AxisDomain::new(149.0, 151.0));
    let mid = (layout.plot_left() + layout.plot_right()) / 2.0;
    assert!((layout.x_to_px(150.0) - mid).abs() < 1e-9);
}

#[test]
fn pointer_maps_back_to_nearest_row() {
    let series = PriceSeries::from_snapshot(&two_row_snapshot(), Vancouver);
    let layout = ChartLayout::new(&series, 900.0, 400.0, Margins::default()).unwrap();

    let near_end = layout.x_to_px(180.0);
    let x = layout.px_to_x(near_end);
    assert_eq!(series.nearest(x).map(|row| row.epoch_seconds), Some(200));
    // left of the plot clamps to the first row
    assert_eq!(series.nearest(layout.px_to_x(0.0)).map(|row| row.epoch_seconds), Some(100));
}
