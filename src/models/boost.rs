// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity boost model: a time-boxed reward multiplier unlocked by meeting
//! an activity threshold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::activity::ActivityType;

/// Which network(s) a boost applies to.
///
/// Serialized as the string `"all"` or a specific network id, matching the
/// `networkId` field consumed by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BoostTarget {
    All,
    Network(String),
}

impl From<String> for BoostTarget {
    fn from(value: String) -> Self {
        if value == "all" {
            BoostTarget::All
        } else {
            BoostTarget::Network(value)
        }
    }
}

impl From<BoostTarget> for String {
    fn from(value: BoostTarget) -> Self {
        match value {
            BoostTarget::All => "all".to_string(),
            BoostTarget::Network(id) => id,
        }
    }
}

/// One boost: unlock condition, multiplier, and live activation state.
///
/// State machine: `Inactive(progress < 100)` -> `Active(until end_time)` ->
/// `Inactive(progress = 0)` on expiry or manual deactivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityBoost {
    pub id: String,
    pub name: String,
    /// Reward multiplier while active (1.0 = neutral)
    pub multiplier: f64,
    /// Active window length once triggered, seconds
    pub duration_secs: i64,
    /// Target network, or all networks
    #[serde(rename = "networkId")]
    pub target: BoostTarget,
    /// Sport the unlock condition counts
    pub activity_type: ActivityType,
    /// Minimum session duration to unlock, seconds
    pub min_duration_secs: f64,
    /// Optional minimum session distance to unlock, meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_distance_meters: Option<f64>,
    /// Unlock progress, 0-100
    pub progress: f64,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl ActivityBoost {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: &str,
        name: &str,
        multiplier: f64,
        duration_secs: i64,
        target: BoostTarget,
        activity_type: ActivityType,
        min_duration_secs: f64,
        min_distance_meters: Option<f64>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            multiplier,
            duration_secs,
            target,
            activity_type,
            min_duration_secs,
            min_distance_meters,
            progress: 0.0,
            is_active: false,
            start_time: None,
            end_time: None,
        }
    }

    /// Progress for one observed session: `min(duration, distance)`
    /// sub-progress, each `(observed / minimum) * 100` capped at 100.
    ///
    /// Distance only gates when the boost configures a minimum AND the
    /// session supplied a distance; otherwise it counts as met.
    pub fn compute_progress(&self, duration_secs: f64, distance_meters: Option<f64>) -> f64 {
        let duration_progress = sub_progress(duration_secs, self.min_duration_secs);
        let distance_progress = match (self.min_distance_meters, distance_meters) {
            (Some(min), Some(observed)) => sub_progress(observed, min),
            _ => 100.0,
        };
        duration_progress.min(distance_progress)
    }

    /// Mark active for `duration_secs` starting at `now`.
    pub fn activate(&mut self, now: DateTime<Utc>) {
        self.is_active = true;
        self.start_time = Some(now);
        self.end_time = Some(now + chrono::Duration::seconds(self.duration_secs));
    }

    /// Reset to the inactive, zero-progress state.
    pub fn reset(&mut self) {
        self.is_active = false;
        self.progress = 0.0;
        self.start_time = None;
        self.end_time = None;
    }

    /// True when the active window has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match (self.is_active, self.end_time) {
            (true, Some(end)) => end < now,
            _ => false,
        }
    }

    /// True when this boost applies to the given network.
    pub fn applies_to(&self, network_id: &str) -> bool {
        match &self.target {
            BoostTarget::All => true,
            BoostTarget::Network(id) => id == network_id,
        }
    }
}

/// `(observed / minimum) * 100`, capped at 100. A non-positive minimum is
/// already met; garbage observations count as zero.
fn sub_progress(observed: f64, minimum: f64) -> f64 {
    if !minimum.is_finite() || minimum <= 0.0 {
        return 100.0;
    }
    if !observed.is_finite() || observed <= 0.0 {
        return 0.0;
    }
    ((observed / minimum) * 100.0).min(100.0)
}
