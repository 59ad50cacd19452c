//! Small shared utilities

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Today's date as an ISO `YYYY-MM-DD` string (UTC)
///
/// Default for financial record dates when the caller omits one.
pub fn today_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}
