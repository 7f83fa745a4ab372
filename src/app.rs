use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;
use gloo_timers::callback::Interval;
use leptos::html::Canvas;
use leptos::*;

use crate::{
    application::{
        ClockFaceConfig, MountedClock, PriceDashboard, SnapshotListener, SnapshotUpdate, browser_spawner,
        digital_readout, mount_clock,
    },
    config::{ChartConfig, ClockConfig, DashboardConfig, FeedConfig},
    domain::{
        chart::{ChartLayout, Margins, PriceSeries},
        clock::{ClockZone, SystemTimeSource},
        logging::LogComponent,
    },
    infrastructure::{
        rendering::{AnimationFrameScheduler, LineChartRenderer, prepare_canvas},
        supabase::{SupabaseRealtime, SupabaseRestClient},
    },
    log_error, log_info,
};

const STYLES: &str = r#"
.dashboard {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Arial, sans-serif;
    padding: 24px;
    color: #222;
}

.clock-row {
    display: flex;
    justify-content: space-evenly;
    align-items: flex-end;
    gap: 12px;
    margin: 24px 0;
    flex-wrap: wrap;
}

.clock-card {
    flex: 1;
    min-width: 180px;
    max-width: 220px;
    display: flex;
    flex-direction: column;
    align-items: center;
}

.clock-label {
    font-weight: bold;
    margin-top: 8px;
    text-align: center;
}

.clock-readout {
    font-family: monospace;
    font-size: 1.25em;
    text-align: center;
}

.clock-error {
    color: #d31c1c;
    font-size: 0.9em;
    text-align: center;
    padding: 8px;
}

.chart-card {
    width: 100%;
    max-width: 900px;
    background: #fff;
    border-radius: 16px;
    box-shadow: 0 4px 12px #0001;
    padding: 24px;
    box-sizing: border-box;
}

.chart-card canvas {
    max-width: 100%;
    cursor: crosshair;
}

.feed-status {
    font-size: 0.9em;
    color: #666;
    margin-bottom: 8px;
}

.feed-error {
    color: #d31c1c;
}
"#;

/// Three world clocks over a live price chart
#[component]
pub fn App(config: DashboardConfig) -> impl IntoView {
    let DashboardConfig { feed, clocks, chart, .. } = config;
    let title = chart.title.clone();

    view! {
        <style>{STYLES}</style>
        <div class="dashboard">
            <div class="clock-row">
                {clocks.into_iter().map(|clock| view! { <ClockCard clock=clock/> }).collect_view()}
            </div>
            <h2>{title}</h2>
            <PriceChart chart=chart feed=feed/>
        </div>
    }
}

#[component]
fn ClockCard(clock: ClockConfig) -> impl IntoView {
    let face = ClockFaceConfig::new(f64::from(clock.diameter), clock.time_zone.clone());

    view! {
        <div class="clock-card">
            <AnalogClock config=face/>
            <DigitalClock label={clock.label} time_zone={clock.time_zone}/>
        </div>
    }
}

/// Canvas face redrawn every animation frame until unmounted
#[component]
pub fn AnalogClock(config: ClockFaceConfig) -> impl IntoView {
    let canvas_ref = create_node_ref::<Canvas>();
    let size = config.diameter.max(1.0).round() as u32;
    let error = create_rw_signal(None::<String>);
    let mounted: Rc<RefCell<Option<MountedClock<AnimationFrameScheduler>>>> = Rc::new(RefCell::new(None));

    let slot = Rc::clone(&mounted);
    // mounts at most once per instance; a new config means a new instance
    create_effect(move |attempted: Option<bool>| {
        if attempted == Some(true) {
            return true;
        }
        let Some(canvas) = canvas_ref.get() else {
            return false;
        };
        let started = prepare_canvas(&canvas, size, size)
            .and_then(|context| mount_clock(&config, context, SystemTimeSource, AnimationFrameScheduler));
        match started {
            Ok(clock) => *slot.borrow_mut() = Some(clock),
            Err(e) => error.set(Some(e.message().to_string())),
        }
        true
    });

    on_cleanup(move || {
        mounted.borrow_mut().take();
    });

    view! {
        <div class="analog-clock">
            <canvas
                node_ref=canvas_ref
                width=size.to_string()
                height=size.to_string()
                style=move || if error.with(Option::is_some) { "display: none;" } else { "display: block;" }
            />
            {move || error.get().map(|message| view! { <div class="clock-error">{message}</div> })}
        </div>
    }
}

/// Label plus `HH:MM:SS`, refreshed once a second
#[component]
pub fn DigitalClock(label: String, time_zone: String) -> impl IntoView {
    let zone = time_zone.parse::<ClockZone>().ok();
    let (now, set_now) = create_signal(Utc::now());
    let timer = Interval::new(1_000, move || set_now.set(Utc::now()));
    on_cleanup(move || drop(timer));

    let readout = move || match zone {
        Some(zone) => digital_readout(&zone, now.get()),
        None => "--:--:--".to_string(),
    };

    view! {
        <div>
            <div class="clock-label">{label}</div>
            <div class="clock-readout">{readout}</div>
        </div>
    }
}

/// Live line chart over the price table
#[component]
pub fn PriceChart(chart: ChartConfig, feed: FeedConfig) -> impl IntoView {
    let canvas_ref = create_node_ref::<Canvas>();
    let width = f64::from(chart.width);
    let height = f64::from(chart.height);
    let zone = chart.zone().unwrap_or(chrono_tz::Tz::UTC);

    let snapshot = create_rw_signal(SnapshotUpdate::default());
    let hover = create_rw_signal(None::<i64>);
    let series = create_memo(move |_| snapshot.with(|update| PriceSeries::from_snapshot(&update.samples, zone)));

    let listener: SnapshotListener = Rc::new(move |update| snapshot.set(update));
    let dashboard = PriceDashboard::new(Rc::new(SupabaseRestClient::new(&feed)), browser_spawner(), listener);
    let mounted = dashboard.mount(&SupabaseRealtime::new(&feed));
    if mounted.is_subscribed() {
        log_info!(LogComponent::Presentation("PriceChart"), "📡 Watching {}", feed.table);
    }
    on_cleanup(move || drop(mounted));

    let renderer = LineChartRenderer::new(width, height, chart.line_color.clone());
    create_effect(move |_| {
        let Some(canvas) = canvas_ref.get() else { return };
        let hovered = hover.get();
        series.with(|series| {
            let layout = ChartLayout::new(series, width, height, Margins::default());
            let row = hovered.and_then(|x| series.nearest(x as f64));
            let drawn = prepare_canvas(&canvas, chart.width, chart.height)
                .and_then(|mut context| renderer.render(&mut context, series, layout.as_ref(), row));
            if let Err(e) = drawn {
                log_error!(LogComponent::Presentation("PriceChart"), "❌ {}", e);
            }
        });
    });

    let on_move = move |event: ev::MouseEvent| {
        // canvas may be scaled down by CSS
        let scale = canvas_ref
            .get_untracked()
            .map(|canvas| f64::from(canvas.width()) / f64::from(canvas.client_width().max(1)))
            .unwrap_or(1.0);
        let x = f64::from(event.offset_x()) * scale;
        let y = f64::from(event.offset_y()) * scale;
        let target = series.with_untracked(|series| {
            ChartLayout::new(series, width, height, Margins::default())
                .filter(|layout| layout.in_plot(x, y))
                .and_then(|layout| series.nearest(layout.px_to_x(x)).map(|row| row.epoch_seconds))
        });
        if hover.get_untracked() != target {
            hover.set(target);
        }
    };

    view! {
        <div class="chart-card">
            <div class="feed-status">
                {move || snapshot.with(|update| format!("{} samples", update.samples.len()))}
                {move || snapshot.with(|update| update.error.clone()).map(|message| view! {
                    <span class="feed-error">" · Error: "{message}</span>
                })}
                {move || snapshot.with(|update| update.channel_error.clone()).map(|message| view! {
                    <span class="feed-error">" · Live updates off: "{message}</span>
                })}
            </div>
            <canvas
                node_ref=canvas_ref
                width=chart.width.to_string()
                height=chart.height.to_string()
                on:mousemove=on_move
                on:mouseleave=move |_| hover.set(None)
            />
        </div>
    }
}
