//! Timestamp formatting for hash input
//!
//! Hashes are computed over RFC3339 timestamps with nanosecond precision and
//! trailing zeros of the fraction removed (`2024-01-02T03:04:05.1Z`, or no
//! fraction at all on a whole second). The output must stay byte-stable.

use chrono::{DateTime, Timelike, Utc};

/// Format a UTC timestamp as RFC3339 with trimmed nanosecond fraction
pub fn format_rfc3339_nanos(ts: &DateTime<Utc>) -> String {
    let base = ts.format("%Y-%m-%dT%H:%M:%S");
    // Leap-second representation pushes nanos past 1e9; fold it back
    let nanos = ts.nanosecond() % 1_000_000_000;

    if nanos == 0 {
        return format!("{}Z", base);
    }

    let fraction = format!("{:09}", nanos);
    format!("{}.{}Z", base, fraction.trim_end_matches('0'))
}
