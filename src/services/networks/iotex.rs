// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! IoTeX W3bStream service: IOTX for device-proofed session telemetry.

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
pub struct IotexConfig {
    /// IOTX per hour of session time
    pub iotx_per_hour: f64,
    /// IOTX per kilometer covered
    pub iotx_per_km: f64,
    /// Payout ceiling per submission
    pub max_per_submission: f64,
}

impl Default for IotexConfig {
    fn default() -> Self {
        Self {
            iotx_per_hour: 10.0,
            iotx_per_km: 2.0,
            max_per_submission: 50.0,
        }
    }
}

impl IotexConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("iotx_per_hour", self.iotx_per_hour),
            ("iotx_per_km", self.iotx_per_km),
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

pub struct IotexService {
    core: NetworkCore<NoExtra>,
    oracle: Arc<dyn RewardOracle>,
    config: IotexConfig,
}

impl IotexService {
    pub async fn load(
        store: Arc<dyn RewardStore>,
        oracle: Arc<dyn RewardOracle>,
        config: IotexConfig,
    ) -> ServiceResult<Self> {
        config.validate()?;
        let descriptor = NetworkDescriptor::new(
            "iotex",
            "IoTeX W3bStream",
            "IOTX",
            "IoTeX Token",
            "/logos/iotex.svg",
            "Stream session telemetry through W3bStream and earn IOTX",
            NetworkCategory::Compute,
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
impl MinerLogic for IotexService {
    type Extra = NoExtra;

    fn core(&self) -> &NetworkCore<NoExtra> {
        &self.core
    }

    async fn earn(&self, activity: &ActivityData, now: DateTime<Utc>) -> ServiceResult<bool> {
        let Some(mut state) = self.core.accepting_state().await else {
            return Ok(false);
        };
        let base = clamp_reward(
            activity.duration_hours() * self.config.iotx_per_hour
                + activity.distance_km() * self.config.iotx_per_km,
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
