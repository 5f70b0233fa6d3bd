// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bitcoin Signet service: whole test-sats per kilometer covered.

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
pub struct SignetConfig {
    /// Sats per kilometer covered
    pub sats_per_km: f64,
    /// Payout ceiling per submission, in sats
    pub max_sats_per_submission: f64,
}

impl Default for SignetConfig {
    fn default() -> Self {
        Self {
            sats_per_km: 100.0,
            max_sats_per_submission: 2000.0,
        }
    }
}

impl SignetConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("sats_per_km", self.sats_per_km),
            ("max_sats_per_submission", self.max_sats_per_submission),
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

pub struct SignetService {
    core: NetworkCore<NoExtra>,
    oracle: Arc<dyn RewardOracle>,
    config: SignetConfig,
}

impl SignetService {
    pub async fn load(
        store: Arc<dyn RewardStore>,
        oracle: Arc<dyn RewardOracle>,
        config: SignetConfig,
    ) -> ServiceResult<Self> {
        config.validate()?;
        let descriptor = NetworkDescriptor::new(
            "bitcoin-signet",
            "Bitcoin Signet",
            "sBTC",
            "Signet Bitcoin (sats)",
            "/logos/bitcoin-signet.svg",
            "Faucet-backed test sats for distance covered",
            NetworkCategory::Chain,
            NetworkStatus::Beta,
        );
        Ok(Self {
            core: NetworkCore::load(descriptor, store).await?,
            oracle,
            config,
        })
    }
}

#[async_trait]
impl MinerLogic for SignetService {
    type Extra = NoExtra;

    fn core(&self) -> &NetworkCore<NoExtra> {
        &self.core
    }

    async fn earn(&self, activity: &ActivityData, now: DateTime<Utc>) -> ServiceResult<bool> {
        let Some(mut state) = self.core.accepting_state().await else {
            return Ok(false);
        };
        let base = clamp_reward(
            activity.distance_km() * self.config.sats_per_km,
            self.config.max_sats_per_submission,
        );
        // Sats are indivisible; round the boosted payout down.
        let amount = (base * self.core.multiplier().await).floor();
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
