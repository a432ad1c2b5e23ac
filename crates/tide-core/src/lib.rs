//! Foundational low-level utilities shared across Tide crates.
//!
//! Provides wall-clock helpers used for response metadata and the boolean
//! flag vocabulary shared by snapshot normalization and request parsing.

pub mod flag_vocabulary;
pub mod time_utils;

pub use flag_vocabulary::{is_truthy_flag, is_truthy_value, TRUTHY_FLAG_VALUES};
pub use time_utils::{current_unix_timestamp_ms, unix_timestamp_ms};

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;

    #[test]
    fn unix_timestamp_ms_handles_epoch_bounds() {
        assert_eq!(unix_timestamp_ms(UNIX_EPOCH), Some(0));
        assert_eq!(
            unix_timestamp_ms(UNIX_EPOCH + Duration::from_millis(1_710_482_400_123)),
            Some(1_710_482_400_123)
        );
        assert_eq!(unix_timestamp_ms(UNIX_EPOCH - Duration::from_secs(1)), None);
        assert!(current_unix_timestamp_ms() > 1_700_000_000_000);
    }
}
