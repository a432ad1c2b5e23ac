use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch, `None` for instants before it.
pub fn unix_timestamp_ms(instant: SystemTime) -> Option<u64> {
    let elapsed = instant.duration_since(UNIX_EPOCH).ok()?;
    Some(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

/// Returns the current Unix timestamp in milliseconds.
pub fn current_unix_timestamp_ms() -> u64 {
    unix_timestamp_ms(SystemTime::now()).unwrap_or_default()
}
