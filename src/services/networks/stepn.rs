// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! STEPN service: GST per session minute, gated by an energy tank that
//! refills over time, with a rare GMT drop on top.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::accrual::{clamp_reward, regenerate};
use crate::config::ConfigError;
use crate::models::{
    ActivityData, NetworkCategory, NetworkDescriptor, NetworkStatus, RewardRecord, TokenBalance,
};
use crate::services::network::{MinerLogic, NetworkCore, ServiceResult};
use crate::services::oracle::RewardOracle;
use crate::store::RewardStore;
use crate::time_utils::epoch_ms;

#[derive(Debug, Clone)]
pub struct StepnConfig {
    /// Energy tank capacity
    pub energy_cap: f64,
    /// Energy regained per hour of rest
    pub energy_regen_per_hour: f64,
    /// Energy burned per session minute
    pub energy_cost_per_minute: f64,
    /// GST earned per session minute
    pub gst_per_minute: f64,
    /// GST ceiling per submission
    pub max_gst_per_submission: f64,
    /// Chance of a GMT drop on a rewarded session
    pub gmt_drop_chance: f64,
    /// GMT granted when the drop hits
    pub gmt_drop_amount: f64,
}

impl Default for StepnConfig {
    fn default() -> Self {
        Self {
            energy_cap: 20.0,
            energy_regen_per_hour: 2.0,
            energy_cost_per_minute: 0.2,
            gst_per_minute: 0.7,
            max_gst_per_submission: 35.0,
            gmt_drop_chance: 0.03,
            gmt_drop_amount: 1.0,
        }
    }
}

impl StepnConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("energy_cap", self.energy_cap),
            ("energy_regen_per_hour", self.energy_regen_per_hour),
            ("energy_cost_per_minute", self.energy_cost_per_minute),
            ("gst_per_minute", self.gst_per_minute),
            ("max_gst_per_submission", self.max_gst_per_submission),
            ("gmt_drop_amount", self.gmt_drop_amount),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    message: format!("must be finite and non-negative, got {value}"),
                });
            }
        }
        if !self.gmt_drop_chance.is_finite() || !(0.0..=1.0).contains(&self.gmt_drop_chance) {
            return Err(ConfigError::Invalid {
                field: "gmt_drop_chance",
                message: format!("must be within [0, 1], got {}", self.gmt_drop_chance),
            });
        }
        Ok(())
    }
}

/// Persisted alongside the shared miner fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepnState {
    /// Current energy; a missing value means a fresh, full tank.
    #[serde(default)]
    pub energy: Option<f64>,
    /// Epoch millis of the last energy update
    #[serde(default)]
    pub last_energy_update: Option<i64>,
    /// Bonus GMT accumulated from rare drops
    #[serde(default)]
    pub gmt_earned: f64,
}

pub struct StepnService {
    core: NetworkCore<StepnState>,
    oracle: Arc<dyn RewardOracle>,
    config: StepnConfig,
}

impl StepnService {
    pub async fn load(
        store: Arc<dyn RewardStore>,
        oracle: Arc<dyn RewardOracle>,
        config: StepnConfig,
    ) -> ServiceResult<Self> {
        config.validate()?;
        let descriptor = NetworkDescriptor::new(
            "stepn",
            "STEPN",
            "GST",
            "Green Satoshi Token",
            "/logos/stepn.svg",
            "Move-to-earn GST with energy-limited sessions",
            NetworkCategory::Move,
            NetworkStatus::Live,
        );
        Ok(Self {
            core: NetworkCore::load(descriptor, store).await?,
            oracle,
            config,
        })
    }

    /// Current energy level for display, regenerated to `now` without
    /// persisting.
    pub async fn energy(&self, now: DateTime<Utc>) -> f64 {
        let state = self.core.state().await;
        regenerate(
            state.extra.energy.unwrap_or(self.config.energy_cap),
            self.config.energy_cap,
            self.config.energy_regen_per_hour,
            state.extra.last_energy_update,
            now,
        )
    }
}

#[async_trait]
impl MinerLogic for StepnService {
    type Extra = StepnState;

    fn core(&self) -> &NetworkCore<StepnState> {
        &self.core
    }

    async fn earn(&self, activity: &ActivityData, now: DateTime<Utc>) -> ServiceResult<bool> {
        let Some(mut state) = self.core.accepting_state().await else {
            return Ok(false);
        };

        let minutes = activity.duration_minutes();
        let energy = regenerate(
            state.extra.energy.unwrap_or(self.config.energy_cap),
            self.config.energy_cap,
            self.config.energy_regen_per_hour,
            state.extra.last_energy_update,
            now,
        );
        let cost = minutes * self.config.energy_cost_per_minute;
        if cost > energy {
            // All or nothing: an undersized tank rejects the whole session.
            state.extra.energy = Some(energy);
            state.extra.last_energy_update = Some(epoch_ms(now));
            self.core.persist(&state).await?;
            tracing::debug!(
                network = %self.core.descriptor().id,
                cost,
                energy,
                "Session rejected for insufficient energy"
            );
            return Ok(false);
        }

        let base = clamp_reward(
            minutes * self.config.gst_per_minute,
            self.config.max_gst_per_submission,
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
                state.extra.energy = Some(energy - cost);
                state.extra.last_energy_update = Some(epoch_ms(now));
                state.rewards.push(RewardRecord {
                    amount,
                    timestamp: epoch_ms(now),
                    activity_id: activity.id.clone(),
                    tx_hash: settlement.tx_hash,
                });
                if self.oracle.roll_bonus(self.config.gmt_drop_chance).await {
                    state.extra.gmt_earned += self.config.gmt_drop_amount;
                    tracing::info!(
                        network = %descriptor.id,
                        amount = self.config.gmt_drop_amount,
                        "GMT drop"
                    );
                }
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

    async fn extra_balances(&self) -> Vec<TokenBalance> {
        let gmt = self.core.state().await.extra.gmt_earned;
        if gmt > 0.0 {
            vec![TokenBalance {
                symbol: "GMT".to_string(),
                amount: gmt,
            }]
        } else {
            Vec::new()
        }
    }
}
