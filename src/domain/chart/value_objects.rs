use serde::Serialize;

/// Closed numeric interval of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisDomain {
    pub min: f64,
    pub max: f64,
}

impl AxisDomain {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Tight bounds of `values`; `None` for an empty or non-finite input.
    pub fn of<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let mut iter = values.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        (min.is_finite() && max.is_finite()).then_some(Self { min, max })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Same interval, widened by `pad` on both ends when it has no width.
    pub fn widened_if_flat(&self, pad: f64) -> Self {
        if self.span() > 0.0 { *self } else { Self::new(self.min - pad, self.max + pad) }
    }

    /// Position of `value` in the interval, 0 at `min` and 1 at `max`.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.span();
        if span == 0.0 { 0.5 } else { (value - self.min) / span }
    }

    pub fn lerp(&self, t: f64) -> f64 {
        self.min + t * self.span()
    }
}

/// "Auto" scaled axis: bounds snapped outward to a round step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NiceScale {
    pub domain: AxisDomain,
    pub step: f64,
}

impl NiceScale {
    pub fn auto(data: AxisDomain, tick_count: usize) -> Self {
        let tick_count = tick_count.max(2);
        let data = data.widened_if_flat(data.min.abs().max(1.0) * 0.05);
        let step = nice_step(data.span() / (tick_count - 1) as f64);
        let min = (data.min / step).floor() * step;
        let max = (data.max / step).ceil() * step;
        Self { domain: AxisDomain::new(min, max), step }
    }

    pub fn ticks(&self) -> Vec<f64> {
        let count = (self.domain.span() / self.step).round() as usize;
        (0..=count).map(|i| self.domain.min + i as f64 * self.step).collect()
    }

    /// Decimal places needed to print a tick without noise.
    pub fn precision(&self) -> usize {
        (0..6)
            .find(|d| {
                let scaled = self.step * 10f64.powi(*d as i32);
                (scaled - scaled.round()).abs() < 1e-6
            })
            .unwrap_or(6)
    }
}

/// Smallest of 1, 2, 2.5, 5, 10 (times a power of ten) not below `raw`.
fn nice_step(raw: f64) -> f64 {
    if !(raw.is_finite() && raw > 0.0) {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = [1.0, 2.0, 2.5, 5.0, 10.0].into_iter().find(|n| fraction <= *n + 1e-9).unwrap_or(10.0);
    nice * magnitude
}
