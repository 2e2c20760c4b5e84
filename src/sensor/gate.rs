//! Interval-based rate gate deciding whether a stream is due for a call.

use chrono::{DateTime, Duration, Utc};

/// Returns true when a stream should be called: either it has never been
/// called, or strictly more than `interval_hours` has elapsed since the last
/// successful call. Exact equality does not trigger; a full interval must
/// have completely elapsed.
pub fn should_call(
    now: DateTime<Utc>,
    last_call_at: Option<DateTime<Utc>>,
    interval_hours: u32,
) -> bool {
    match last_call_at {
        None => true,
        Some(last) => now - last > Duration::hours(i64::from(interval_hours)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, s).unwrap()
    }

    #[test]
    fn never_called_is_due() {
        assert!(should_call(at(10, 0, 0), None, 1));
    }

    #[test]
    fn due_after_interval_elapses() {
        let last = at(8, 0, 0);
        assert!(should_call(at(10, 0, 1), last.into(), 2));
    }

    #[test]
    fn exact_equality_is_not_due() {
        let last = at(8, 0, 0);
        assert!(!should_call(at(10, 0, 0), last.into(), 2));
    }

    #[test]
    fn within_interval_is_not_due() {
        let last = at(9, 30, 0);
        assert!(!should_call(at(10, 0, 0), last.into(), 1));
    }

    #[test]
    fn clock_going_backwards_is_not_due() {
        let last = at(10, 0, 0);
        assert!(!should_call(at(9, 0, 0), last.into(), 1));
    }
}
