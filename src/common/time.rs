use chrono::Utc;

/// Get current Unix timestamp in milliseconds
pub fn unix_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
