use chrono_tz::Tz;
use serde::Serialize;
use serde_json::{Map, Value};

use super::value_objects::{AxisDomain, NiceScale};
use crate::domain::market_data::PriceSample;
use crate::time_utils::{format_epoch_seconds, format_instant};

/// Ticks requested from the auto-scaled price axis.
pub const PRICE_TICK_COUNT: usize = 5;

/// Chart-ready projection of one sample. `time` is display text only; the
/// plotted key is `epoch_seconds`. Uninterpreted columns ride along.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub epoch_seconds: i64,
    pub price_usd: f64,
    pub time: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Rows derived from one snapshot, labelled in a fixed display zone.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    zone: Tz,
    rows: Vec<ChartRow>,
}

impl PriceSeries {
    pub fn from_snapshot(samples: &[PriceSample], zone: Tz) -> Self {
        let rows = samples
            .iter()
            .map(|sample| ChartRow {
                epoch_seconds: sample.epoch_seconds,
                price_usd: sample.price_usd,
                time: format_instant(sample.created_at, &zone),
                extra: sample.extra.clone(),
            })
            .collect();
        Self { zone, rows }
    }

    pub fn rows(&self) -> &[ChartRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// `[dataMin, dataMax]` of the epoch column.
    pub fn x_domain(&self) -> Option<AxisDomain> {
        AxisDomain::of(self.rows.iter().map(|row| row.epoch_seconds as f64))
    }

    pub fn price_scale(&self) -> Option<NiceScale> {
        AxisDomain::of(self.rows.iter().map(|row| row.price_usd))
            .map(|data| NiceScale::auto(data, PRICE_TICK_COUNT))
    }

    /// Axis tick and tooltip text for an x value.
    pub fn label_for(&self, epoch_seconds: i64) -> String {
        format_epoch_seconds(epoch_seconds, &self.zone)
    }

    /// Row whose x value is closest to `epoch_seconds`; ties go to the earlier row.
    pub fn nearest(&self, epoch_seconds: f64) -> Option<&ChartRow> {
        self.rows.iter().min_by(|a, b| {
            let da = (a.epoch_seconds as f64 - epoch_seconds).abs();
            let db = (b.epoch_seconds as f64 - epoch_seconds).abs();
            da.total_cmp(&db)
        })
    }
}

/// Text shown while hovering a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub label: String,
    pub value: String,
}

impl Tooltip {
    pub fn for_row(series: &PriceSeries, row: &ChartRow) -> Self {
        Self { label: series.label_for(row.epoch_seconds), value: format!("price_usd : {}", row.price_usd) }
    }
}
