use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One row of the price table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    #[serde(deserialize_with = "deserialize_created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "epoch_s")]
    pub epoch_seconds: i64,
    pub price_usd: f64,
    /// Columns the dashboard does not interpret (id, source, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PriceSample {
    pub fn new(created_at: DateTime<Utc>, epoch_seconds: i64, price_usd: f64) -> Self {
        Self { created_at, epoch_seconds, price_usd, extra: Map::new() }
    }

    /// Sample whose creation time equals its epoch column.
    pub fn at_epoch(epoch_seconds: i64, price_usd: f64) -> Self {
        let created_at = DateTime::from_timestamp(epoch_seconds, 0).unwrap_or_default();
        Self::new(created_at, epoch_seconds, price_usd)
    }
}

/// Accepts both `timestamptz` (with offset) and bare `timestamp` columns; bare values are UTC.
fn deserialize_created_at<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(zoned) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(zoned.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f%#z"]
        .iter()
        .find_map(|fmt| {
            DateTime::parse_from_str(&raw, fmt)
                .map(|zoned| zoned.with_timezone(&Utc))
                .ok()
                .or_else(|| NaiveDateTime::parse_from_str(&raw, fmt).ok().map(|naive| naive.and_utc()))
        })
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised created_at '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rest_row_with_passthrough_columns() {
        let row = r#"{"id":7,"created_at":"2024-05-01T12:00:00.5+00:00","epoch_s":1714564800,"price_usd":83.12}"#;
        let sample: PriceSample = serde_json::from_str(row).unwrap();
        assert_eq!(sample.epoch_seconds, 1_714_564_800);
        assert_eq!(sample.price_usd, 83.12);
        assert_eq!(sample.extra.get("id"), Some(&Value::from(7)));
        assert_eq!(
            sample.created_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + chrono::Duration::milliseconds(500)
        );
    }

    #[test]
    fn bare_timestamp_is_utc() {
        let row = r#"{"created_at":"2024-05-01T12:00:00","epoch_s":1,"price_usd":1.0}"#;
        let sample: PriceSample = serde_json::from_str(row).unwrap();
        assert_eq!(sample.created_at, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn postgres_text_form_with_short_offset() {
        let row = r#"{"created_at":"2024-05-01 12:00:00+00","epoch_s":1,"price_usd":1.0}"#;
        let sample: PriceSample = serde_json::from_str(row).unwrap();
        assert_eq!(sample.created_at, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
    }
}
