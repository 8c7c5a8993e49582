use chrono::{DateTime, Utc};

/// Converts a millisecond epoch timestamp back into a date. Values outside chrono's
/// representable range fall back to the epoch itself.
pub fn from_epoch_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Renders a moment in the compact UTC form calendar template links expect,
/// e.g. `20240131T120000000Z`. This is an ISO timestamp with `-`, `:` and `.` dropped.
pub fn format_utc_basic(millis: i64) -> String {
    from_epoch_millis(millis)
        .format("%Y%m%dT%H%M%S%3fZ")
        .to_string()
}
