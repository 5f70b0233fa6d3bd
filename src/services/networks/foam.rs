// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! FOAM service: FOAM for proofs of presence, counted as anchor zones the
//! session track crosses.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use geo::{Intersects, LineString, Polygon};
use std::sync::Arc;

use super::accrual::{clamp_reward, settle_and_append};
use crate::config::ConfigError;
use crate::models::{ActivityData, NetworkCategory, NetworkDescriptor, NetworkStatus, NoExtra};
use crate::services::network::{MinerLogic, NetworkCore, ServiceResult};
use crate::services::oracle::RewardOracle;
use crate::store::RewardStore;

/// A FOAM anchor: a named point with presence value.
#[derive(Debug, Clone)]
pub struct AnchorPoint {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl AnchorPoint {
    pub fn new(name: &str, lat: f64, lon: f64) -> Self {
        Self {
            name: name.to_string(),
            lat,
            lon,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FoamConfig {
    /// Anchors whose zones count for presence proofs
    pub anchors: Vec<AnchorPoint>,
    /// Half-width of the square zone around each anchor, meters
    pub zone_radius_meters: f64,
    /// FOAM per zone crossed
    pub foam_per_zone: f64,
    /// Payout ceiling per submission
    pub max_per_submission: f64,
}

impl Default for FoamConfig {
    fn default() -> Self {
        Self {
            anchors: vec![
                AnchorPoint::new("venice-skatepark", 33.9850, -118.4695),
                AnchorPoint::new("mavericks", 37.4953, -122.4953),
                AnchorPoint::new("palisades-tahoe", 39.1963, -120.2366),
                AnchorPoint::new("hood-river", 45.7054, -121.5215),
                AnchorPoint::new("barcelona-macba", 41.3833, 2.1667),
            ],
            zone_radius_meters: 250.0,
            foam_per_zone: 5.0,
            max_per_submission: 25.0,
        }
    }
}

impl FoamConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.zone_radius_meters.is_finite() || self.zone_radius_meters <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "zone_radius_meters",
                message: format!("must be positive, got {}", self.zone_radius_meters),
            });
        }
        for (field, value) in [
            ("foam_per_zone", self.foam_per_zone),
            ("max_per_submission", self.max_per_submission),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    message: format!("must be finite and non-negative, got {value}"),
                });
            }
        }
        for anchor in &self.anchors {
            if !(-90.0..=90.0).contains(&anchor.lat) || !(-180.0..=180.0).contains(&anchor.lon) {
                return Err(ConfigError::Invalid {
                    field: "anchors",
                    message: format!("anchor {} has out-of-range coordinates", anchor.name),
                });
            }
        }
        Ok(())
    }
}

/// An anchor with its zone boundary precomputed.
struct FoamZone {
    name: String,
    polygon: Polygon<f64>,
}

pub struct FoamService {
    core: NetworkCore<NoExtra>,
    oracle: Arc<dyn RewardOracle>,
    config: FoamConfig,
    zones: Vec<FoamZone>,
}

impl FoamService {
    pub async fn load(
        store: Arc<dyn RewardStore>,
        oracle: Arc<dyn RewardOracle>,
        config: FoamConfig,
    ) -> ServiceResult<Self> {
        config.validate()?;
        let zones = config
            .anchors
            .iter()
            .map(|anchor| FoamZone {
                name: anchor.name.clone(),
                polygon: zone_polygon(anchor, config.zone_radius_meters),
            })
            .collect::<Vec<_>>();
        tracing::info!(count = zones.len(), "Loaded FOAM anchor zones");

        let descriptor = NetworkDescriptor::new(
            "foam",
            "FOAM",
            "FOAM",
            "FOAM Token",
            "/logos/foam.svg",
            "Prove presence at mapped spots and earn FOAM",
            NetworkCategory::Location,
            NetworkStatus::Beta,
        );
        Ok(Self {
            core: NetworkCore::load(descriptor, store).await?,
            oracle,
            config,
            zones,
        })
    }

    /// Names of all zones the track crosses.
    pub fn zones_crossed(&self, track: &LineString<f64>) -> Vec<&str> {
        self.zones
            .iter()
            .filter(|zone| track.intersects(&zone.polygon))
            .map(|zone| zone.name.as_str())
            .collect()
    }
}

/// Square zone around an anchor, sized in meters and converted to degrees
/// at the anchor's latitude.
fn zone_polygon(anchor: &AnchorPoint, radius_meters: f64) -> Polygon<f64> {
    const METERS_PER_DEGREE: f64 = 111_320.0;
    let dlat = radius_meters / METERS_PER_DEGREE;
    let shrink = anchor.lat.to_radians().cos().abs().max(1e-6);
    let dlon = radius_meters / (METERS_PER_DEGREE * shrink);
    Polygon::new(
        LineString::from(vec![
            (anchor.lon - dlon, anchor.lat - dlat),
            (anchor.lon + dlon, anchor.lat - dlat),
            (anchor.lon + dlon, anchor.lat + dlat),
            (anchor.lon - dlon, anchor.lat + dlat),
            (anchor.lon - dlon, anchor.lat - dlat),
        ]),
        vec![],
    )
}

#[async_trait]
impl MinerLogic for FoamService {
    type Extra = NoExtra;

    fn core(&self) -> &NetworkCore<NoExtra> {
        &self.core
    }

    async fn earn(&self, activity: &ActivityData, now: DateTime<Utc>) -> ServiceResult<bool> {
        let Some(mut state) = self.core.accepting_state().await else {
            return Ok(false);
        };
        // No track, no presence proof.
        let Some(track) = activity.track_line() else {
            return Ok(false);
        };
        let crossed = self.zones_crossed(&track);
        if !crossed.is_empty() {
            tracing::debug!(
                activity_id = %activity.id,
                zones = crossed.len(),
                "Presence zones crossed"
            );
        }
        let base = clamp_reward(
            crossed.len() as f64 * self.config.foam_per_zone,
            self.config.max_per_submission,
        );
        let amount = base * self.core.multiplier().await;
        settle_and_append(
            &self.core,
            &mut state,
            self.oracle.as_ref(),
            amount,
            &activity.id,
            now,
        )
        .await
    }
}
