use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// `en-CA`, 24-hour style: `YYYY-MM-DD, HH:MM:SS`.
const LABEL_FORMAT: &str = "%Y-%m-%d, %H:%M:%S";

/// Format an epoch-milliseconds instant in `zone` for axis ticks and tooltips.
/// Out-of-range values clamp to the epoch.
pub fn format_time_label(epoch_ms: i64, zone: &Tz) -> String {
    let instant: DateTime<Utc> = Utc
        .timestamp_millis_opt(epoch_ms)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH);
    instant.with_timezone(zone).format(LABEL_FORMAT).to_string()
}

/// Seconds variant used by the chart, whose x values are epoch seconds.
pub fn format_epoch_seconds(epoch_seconds: i64, zone: &Tz) -> String {
    format_time_label(epoch_seconds.saturating_mul(1000), zone)
}

pub fn format_instant(instant: DateTime<Utc>, zone: &Tz) -> String {
    instant.with_timezone(zone).format(LABEL_FORMAT).to_string()
}

/// `HH:MM:SS` readout under each analog face.
pub fn format_clock_readout<T: TimeZone>(instant: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    instant.format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_in_vancouver() {
        let label = format_time_label(0, &chrono_tz::America::Vancouver);
        assert_eq!(label, "1969-12-31, 16:00:00");
    }

    #[test]
    fn seconds_and_millis_agree() {
        let zone = chrono_tz::Asia::Hong_Kong;
        assert_eq!(format_epoch_seconds(1_700_000_000, &zone), format_time_label(1_700_000_000_000, &zone));
    }
}
