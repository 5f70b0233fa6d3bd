// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and epoch conversions.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Convert a UTC timestamp to epoch milliseconds (the persisted wire unit).
pub fn epoch_ms(date: DateTime<Utc>) -> i64 {
    date.timestamp_millis()
}

/// Convert epoch milliseconds back to a UTC timestamp.
///
/// Out-of-range values collapse to the epoch rather than panicking; persisted
/// blobs with such timestamps are already garbage and get treated as stale.
pub fn from_epoch_ms(ms: i64) -> DateTime<Utc> {
    match Utc.timestamp_millis_opt(ms) {
        chrono::LocalResult::Single(dt) => dt,
        _ => DateTime::<Utc>::UNIX_EPOCH,
    }
}

/// Hours elapsed between two instants, clamped to zero when `later` is not
/// actually later.
pub fn elapsed_hours(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    let ms = later.signed_duration_since(earlier).num_milliseconds();
    if ms <= 0 {
        0.0
    } else {
        ms as f64 / 3_600_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_ms_round_trip() {
        let now = Utc::now();
        let ms = epoch_ms(now);
        let back = from_epoch_ms(ms);
        // Round-trips at millisecond precision
        assert_eq!(epoch_ms(back), ms);
    }

    #[test]
    fn test_elapsed_hours_clamps_negative() {
        let t0 = Utc::now();
        let t1 = t0 + chrono::Duration::hours(2);
        assert_eq!(elapsed_hours(t1, t0), 0.0);
        let hours = elapsed_hours(t0, t1);
        assert!((hours - 2.0).abs() < 1e-9);
    }
}
