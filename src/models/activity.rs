// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Normalized activity session model.
//!
//! `ActivityData` is produced once per completed session and read-only
//! afterward. All distances are meters; durations are seconds. The clamping
//! accessors are the single place non-finite and negative inputs are
//! neutralized, so every reward formula downstream can trust its numbers.

use chrono::{DateTime, Utc};
use geo::LineString;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Board sport that produced the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Skateboard,
    Longboard,
    Snowboard,
    Surf,
    Kiteboard,
    Wakeboard,
}

/// A single GPS sample on the session track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Snapshot of one completed activity session.
///
/// Identity fields are validated at the API boundary; the numeric fields
/// are clamped, not rejected, so a garbage tracker cannot fail a whole
/// submission.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActivityData {
    #[validate(length(min = 1, max = 128))]
    pub id: String,
    pub activity_type: ActivityType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Session length in seconds
    pub duration_secs: f64,
    /// Distance covered in meters
    pub distance_meters: f64,
    /// Ordered GPS track (may be empty for sessions without a fix)
    #[serde(default)]
    pub locations: Vec<TrackPoint>,
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,
}

impl ActivityData {
    /// Duration in seconds, with non-finite and negative values clamped to 0.
    pub fn duration_secs_clamped(&self) -> f64 {
        clamp_non_negative(self.duration_secs)
    }

    /// Duration in minutes.
    pub fn duration_minutes(&self) -> f64 {
        self.duration_secs_clamped() / 60.0
    }

    /// Duration in hours.
    pub fn duration_hours(&self) -> f64 {
        self.duration_secs_clamped() / 3600.0
    }

    /// Distance in meters, with non-finite and negative values clamped to 0.
    pub fn distance_meters_clamped(&self) -> f64 {
        clamp_non_negative(self.distance_meters)
    }

    /// Distance in kilometers (formulas quoted per-km convert through this).
    pub fn distance_km(&self) -> f64 {
        self.distance_meters_clamped() / 1000.0
    }

    /// The GPS track as a line string, if there are enough points to form one.
    pub fn track_line(&self) -> Option<LineString<f64>> {
        if self.locations.len() < 2 {
            return None;
        }
        Some(LineString::from(
            self.locations
                .iter()
                .map(|p| (p.lon, p.lat))
                .collect::<Vec<_>>(),
        ))
    }
}

/// Clamp to a finite, non-negative value (garbage in, zero out).
fn clamp_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_activity(duration_secs: f64, distance_meters: f64) -> ActivityData {
        let start = Utc::now();
        ActivityData {
            id: "act_1".to_string(),
            activity_type: ActivityType::Skateboard,
            start_time: start,
            end_time: start + chrono::Duration::seconds(duration_secs as i64),
            duration_secs,
            distance_meters,
            locations: Vec::new(),
            user_id: "user_1".to_string(),
        }
    }

    #[test]
    fn test_clamps_negative_and_non_finite() {
        assert_eq!(make_activity(-10.0, 5.0).duration_secs_clamped(), 0.0);
        assert_eq!(make_activity(f64::NAN, 5.0).duration_secs_clamped(), 0.0);
        assert_eq!(
            make_activity(10.0, f64::INFINITY).distance_meters_clamped(),
            0.0
        );
        assert_eq!(make_activity(10.0, -1.0).distance_km(), 0.0);
    }

    #[test]
    fn test_unit_conversions() {
        let activity = make_activity(3600.0, 2500.0);
        assert!((activity.duration_hours() - 1.0).abs() < 1e-12);
        assert!((activity.duration_minutes() - 60.0).abs() < 1e-12);
        assert!((activity.distance_km() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_track_line_needs_two_points() {
        let mut activity = make_activity(600.0, 100.0);
        assert!(activity.track_line().is_none());
        activity.locations.push(TrackPoint {
            lat: 37.0,
            lon: -122.0,
        });
        assert!(activity.track_line().is_none());
        activity.locations.push(TrackPoint {
            lat: 37.01,
            lon: -122.01,
        });
        assert!(activity.track_line().is_some());
    }
}
