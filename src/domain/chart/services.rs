use super::entities::PriceSeries;
use super::value_objects::{AxisDomain, NiceScale};

/// Plot-area margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self { left: 60.0, right: 30.0, top: 20.0, bottom: 40.0 }
    }
}

/// Number of labelled ticks along the time axis.
pub const TIME_TICK_COUNT: usize = 5;

/// Maps data coordinates to surface pixels for one series at one size.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    width: f64,
    height: f64,
    margins: Margins,
    x: AxisDomain,
    y: NiceScale,
}

impl ChartLayout {
    /// `None` for an empty series: nothing to scale against.
    pub fn new(series: &PriceSeries, width: f64, height: f64, margins: Margins) -> Option<Self> {
        // single sample: pad a second each side so the point sits mid-plot
        let x = series.x_domain()?.widened_if_flat(1.0);
        let y = series.price_scale()?;
        Some(Self { width, height, margins, x, y })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn plot_left(&self) -> f64 {
        self.margins.left
    }

    pub fn plot_right(&self) -> f64 {
        self.width - self.margins.right
    }

    pub fn plot_top(&self) -> f64 {
        self.margins.top
    }

    pub fn plot_bottom(&self) -> f64 {
        self.height - self.margins.bottom
    }

    pub fn plot_width(&self) -> f64 {
        (self.plot_right() - self.plot_left()).max(0.0)
    }

    pub fn plot_height(&self) -> f64 {
        (self.plot_bottom() - self.plot_top()).max(0.0)
    }

    pub fn x_domain(&self) -> AxisDomain {
        self.x
    }

    pub fn y_scale(&self) -> &NiceScale {
        &self.y
    }

    pub fn x_to_px(&self, epoch_seconds: f64) -> f64 {
        self.plot_left() + self.x.normalize(epoch_seconds) * self.plot_width()
    }

    pub fn y_to_px(&self, price: f64) -> f64 {
        // canvas y grows downward
        self.plot_bottom() - self.y.domain.normalize(price) * self.plot_height()
    }

    /// Inverse of `x_to_px`, clamped to the plot area.
    pub fn px_to_x(&self, px: f64) -> f64 {
        if self.plot_width() == 0.0 {
            return self.x.min;
        }
        let t = ((px - self.plot_left()) / self.plot_width()).clamp(0.0, 1.0);
        self.x.lerp(t)
    }

    pub fn in_plot(&self, px: f64, py: f64) -> bool {
        px >= self.plot_left() && px <= self.plot_right() && py >= self.plot_top() && py <= self.plot_bottom()
    }

    /// Evenly spaced x ticks from `dataMin` to `dataMax` inclusive.
    pub fn time_ticks(&self) -> Vec<i64> {
        let mut ticks: Vec<i64> = (0..TIME_TICK_COUNT)
            .map(|i| self.x.lerp(i as f64 / (TIME_TICK_COUNT - 1) as f64).round() as i64)
            .collect();
        ticks.dedup();
        ticks
    }
}
