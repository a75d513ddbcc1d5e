//! Display formatting for stored timestamps.
//!
//! Rows are stored in UTC; exports and chart data show them as wall-clock
//! time in a configured IANA zone.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Format used by the CSV export and the chart data.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Resolves an IANA zone name, falling back to UTC for unknown names.
pub fn parse_timezone(name: &str) -> Tz {
    match name.trim().parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            tracing::warn!(timezone = name, "unknown display timezone, using UTC");
            Tz::UTC
        }
    }
}

/// Formats `ts` as `YYYY-MM-DD HH:mm` in `tz`.
pub fn format_local(ts: DateTime<Utc>, tz: Tz) -> String {
    ts.with_timezone(&tz).format(DISPLAY_FORMAT).to_string()
}
