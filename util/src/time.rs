//! General time utility functions

use chrono;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_duration_to_seconds() {
        let d = chrono::Duration::milliseconds(1500);
        assert_eq!(duration_to_seconds(d), Some(1.5));

        // num_nanoseconds overflows beyond ~292 years
        assert_eq!(duration_to_seconds(chrono::Duration::days(365 * 300)), None);
    }
}
