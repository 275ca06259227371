use chrono::{DateTime, FixedOffset, Offset, SecondsFormat, Utc};
use serde::Serialize;

pub const TIMEZONE: &str = "Asia/Kolkata";

/// IST is UTC+05:30 all year round.
const KOLKATA_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

#[derive(Debug, Serialize)]
pub struct TimeReport {
    pub timezone: &'static str,
    pub datetime: String,
}

/// The constant is within ±24h, so `east_opt` never falls through to UTC.
fn kolkata_offset() -> FixedOffset {
    FixedOffset::east_opt(KOLKATA_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

pub fn now_in_kolkata() -> TimeReport {
    format_in_kolkata(Utc::now())
}

fn format_in_kolkata(instant: DateTime<Utc>) -> TimeReport {
    TimeReport {
        timezone: TIMEZONE,
        datetime: instant
            .with_timezone(&kolkata_offset())
            .to_rfc3339_opts(SecondsFormat::Millis, false),
    }
}
