// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sweatcoin service: SWEAT for movement, steps derived from distance.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::accrual::{clamp_reward, settle_and_append};
use crate::config::ConfigError;
use crate::models::{ActivityData, NetworkCategory, NetworkDescriptor, NetworkStatus, NoExtra};
use crate::services::network::{MinerLogic, NetworkCore, ServiceResult};
use crate::services::oracle::RewardOracle;
use crate::store::RewardStore;

#[derive(Debug, Clone)]
pub struct SweatcoinConfig {
    /// Step equivalent per meter of board distance
    pub steps_per_meter: f64,
    /// SWEAT per thousand steps
    pub sweat_per_thousand_steps: f64,
    /// Payout ceiling per submission
    pub max_per_submission: f64,
}

impl Default for SweatcoinConfig {
    fn default() -> Self {
        Self {
            steps_per_meter: 1.31,
            sweat_per_thousand_steps: 1.0,
            max_per_submission: 10.0,
        }
    }
}

impl SweatcoinConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("steps_per_meter", self.steps_per_meter),
            ("sweat_per_thousand_steps", self.sweat_per_thousand_steps),
            ("max_per_submission", self.max_per_submission),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    message: format!("must be finite and non-negative, got {value}"),
                });
            }
        }
        Ok(())
    }
}

pub struct SweatcoinService {
    core: NetworkCore<NoExtra>,
    oracle: Arc<dyn RewardOracle>,
    config: SweatcoinConfig,
}

impl SweatcoinService {
    pub async fn load(
        store: Arc<dyn RewardStore>,
        oracle: Arc<dyn RewardOracle>,
        config: SweatcoinConfig,
    ) -> ServiceResult<Self> {
        config.validate()?;
        let descriptor = NetworkDescriptor::new(
            "sweatcoin",
            "Sweatcoin",
            "SWEAT",
            "Sweat Economy Token",
            "/logos/sweatcoin.svg",
            "Convert session distance into SWEAT",
            NetworkCategory::Move,
            NetworkStatus::Live,
        );
        Ok(Self {
            core: NetworkCore::load(descriptor, store).await?,
            oracle,
            config,
        })
    }
}

#[async_trait]
impl MinerLogic for SweatcoinService {
    type Extra = NoExtra;

    fn core(&self) -> &NetworkCore<NoExtra> {
        &self.core
    }

    async fn earn(&self, activity: &ActivityData, now: DateTime<Utc>) -> ServiceResult<bool> {
        let Some(mut state) = self.core.accepting_state().await else {
            return Ok(false);
        };
        let steps = activity.distance_meters_clamped() * self.config.steps_per_meter;
        let base = clamp_reward(
            steps / 1000.0 * self.config.sweat_per_thousand_steps,
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
