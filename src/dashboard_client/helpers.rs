use chrono::{DateTime, TimeDelta, TimeZone, Utc};

pub const STATUS_PATH: &str = "/api/status";
pub const RANK_PATH: &str = "/api/rank";

/// API version the status payload layout was written against.
pub const SUPPORTED_API_VERSION: &str = "1.13.1";

// Below this a `startTime` is taken to be in seconds rather than milliseconds.
const MILLIS_THRESHOLD: f64 = 1e11;

pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Interpret a Unix timestamp that may be in seconds or milliseconds.
pub fn timestamp_to_datetime(raw: f64) -> Option<DateTime<Utc>> {
    if !raw.is_finite() || raw < 0.0 {
        return None;
    }
    let millis = if raw >= MILLIS_THRESHOLD {
        raw
    } else {
        raw * 1000.0
    };
    Utc.timestamp_millis_opt(millis as i64).single()
}

pub fn format_uptime(duration: TimeDelta) -> String {
    if duration.num_seconds() < 60 {
        format!("{} s", duration.num_seconds().max(0))
    } else if duration.num_minutes() < 60 {
        format!("{} min", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{} h {} min", duration.num_hours(), duration.num_minutes() % 60)
    } else {
        format!("{} d {} h", duration.num_days(), duration.num_hours() % 24)
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}
