// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitmint service: FITT per session minute, gated by a stamina pool.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::accrual::{clamp_reward, regenerate};
use crate::config::ConfigError;
use crate::models::{
    ActivityData, NetworkCategory, NetworkDescriptor, NetworkStatus, RewardRecord,
};
use crate::services::network::{MinerLogic, NetworkCore, ServiceResult};
use crate::services::oracle::RewardOracle;
use crate::store::RewardStore;
use crate::time_utils::epoch_ms;

#[derive(Debug, Clone)]
pub struct FitmintConfig {
    /// Stamina pool capacity
    pub stamina_cap: f64,
    /// Stamina regained per hour of rest
    pub stamina_regen_per_hour: f64,
    /// Stamina burned per session minute
    pub stamina_cost_per_minute: f64,
    /// FITT earned per session minute
    pub fitt_per_minute: f64,
    /// FITT ceiling per submission
    pub max_fitt_per_submission: f64,
}

impl Default for FitmintConfig {
    fn default() -> Self {
        Self {
            stamina_cap: 100.0,
            stamina_regen_per_hour: 10.0,
            stamina_cost_per_minute: 1.0,
            fitt_per_minute: 0.5,
            max_fitt_per_submission: 60.0,
        }
    }
}

impl FitmintConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("stamina_cap", self.stamina_cap),
            ("stamina_regen_per_hour", self.stamina_regen_per_hour),
            ("stamina_cost_per_minute", self.stamina_cost_per_minute),
            ("fitt_per_minute", self.fitt_per_minute),
            ("max_fitt_per_submission", self.max_fitt_per_submission),
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

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitmintState {
    /// Current stamina; a missing value means a fresh, full pool.
    #[serde(default)]
    pub stamina: Option<f64>,
    /// Epoch millis of the last stamina update
    #[serde(default)]
    pub last_stamina_update: Option<i64>,
}

pub struct FitmintService {
    core: NetworkCore<FitmintState>,
    oracle: Arc<dyn RewardOracle>,
    config: FitmintConfig,
}

impl FitmintService {
    pub async fn load(
        store: Arc<dyn RewardStore>,
        oracle: Arc<dyn RewardOracle>,
        config: FitmintConfig,
    ) -> ServiceResult<Self> {
        config.validate()?;
        let descriptor = NetworkDescriptor::new(
            "fitmint",
            "Fitmint",
            "FITT",
            "Fitmint Token",
            "/logos/fitmint.svg",
            "Burn stamina, bank FITT",
            NetworkCategory::Move,
            NetworkStatus::Beta,
        );
        Ok(Self {
            core: NetworkCore::load(descriptor, store).await?,
            oracle,
            config,
        })
    }

    /// Current stamina for display, regenerated to `now` without persisting.
    pub async fn stamina(&self, now: DateTime<Utc>) -> f64 {
        let state = self.core.state().await;
        regenerate(
            state.extra.stamina.unwrap_or(self.config.stamina_cap),
            self.config.stamina_cap,
            self.config.stamina_regen_per_hour,
            state.extra.last_stamina_update,
            now,
        )
    }
}

#[async_trait]
impl MinerLogic for FitmintService {
    type Extra = FitmintState;

    fn core(&self) -> &NetworkCore<FitmintState> {
        &self.core
    }

    async fn earn(&self, activity: &ActivityData, now: DateTime<Utc>) -> ServiceResult<bool> {
        let Some(mut state) = self.core.accepting_state().await else {
            return Ok(false);
        };

        let minutes = activity.duration_minutes();
        let stamina = regenerate(
            state.extra.stamina.unwrap_or(self.config.stamina_cap),
            self.config.stamina_cap,
            self.config.stamina_regen_per_hour,
            state.extra.last_stamina_update,
            now,
        );
        let cost = minutes * self.config.stamina_cost_per_minute;
        if cost > stamina {
            // All or nothing: no partial payout for a session the pool
            // cannot cover.
            state.extra.stamina = Some(stamina);
            state.extra.last_stamina_update = Some(epoch_ms(now));
            self.core.persist(&state).await?;
            tracing::debug!(
                network = %self.core.descriptor().id,
                cost,
                stamina,
                "Session rejected for insufficient stamina"
            );
            return Ok(false);
        }

        let base = clamp_reward(
            minutes * self.config.fitt_per_minute,
            self.config.max_fitt_per_submission,
        );
        let amount = base * self.core.multiplier().await;
        if amount <= 0.0 {
            return Ok(false);
        }

        let descriptor = self.core.descriptor();
        match self
            .oracle
            .settle(
                &descriptor.id,
                state.user_id.as_deref().unwrap_or_default(),
                &descriptor.token_symbol,
                amount,
            )
            .await
        {
            Ok(settlement) => {
                // The burn only counts when the session pays out.
                state.extra.stamina = Some(stamina - cost);
                state.extra.last_stamina_update = Some(epoch_ms(now));
                state.rewards.push(RewardRecord {
                    amount,
                    timestamp: epoch_ms(now),
                    activity_id: activity.id.clone(),
                    tx_hash: settlement.tx_hash,
                });
                self.core.persist(&state).await?;
                Ok(true)
            }
            Err(error) => {
                tracing::warn!(
                    network = %descriptor.id,
                    %error,
                    "Settlement failed, session not rewarded"
                );
                Ok(false)
            }
        }
    }
}
