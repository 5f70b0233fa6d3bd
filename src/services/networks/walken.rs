// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Walken service: WLKN per session minute plus a rare gem drop.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::accrual::clamp_reward;
use crate::config::ConfigError;
use crate::models::{
    ActivityData, NetworkCategory, NetworkDescriptor, NetworkStatus, RewardRecord, TokenBalance,
};
use crate::services::network::{MinerLogic, NetworkCore, ServiceResult};
use crate::services::oracle::RewardOracle;
use crate::store::RewardStore;
use crate::time_utils::epoch_ms;

#[derive(Debug, Clone)]
pub struct WalkenConfig {
    /// WLKN earned per session minute
    pub wlkn_per_minute: f64,
    /// WLKN ceiling per submission
    pub max_wlkn_per_submission: f64,
    /// Chance of a gem drop on a rewarded session
    pub gem_drop_chance: f64,
}

impl Default for WalkenConfig {
    fn default() -> Self {
        Self {
            wlkn_per_minute: 0.1,
            max_wlkn_per_submission: 10.0,
            gem_drop_chance: 0.05,
        }
    }
}

impl WalkenConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("wlkn_per_minute", self.wlkn_per_minute),
            ("max_wlkn_per_submission", self.max_wlkn_per_submission),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    message: format!("must be finite and non-negative, got {value}"),
                });
            }
        }
        if !self.gem_drop_chance.is_finite() || !(0.0..=1.0).contains(&self.gem_drop_chance) {
            return Err(ConfigError::Invalid {
                field: "gem_drop_chance",
                message: format!("must be within [0, 1], got {}", self.gem_drop_chance),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkenState {
    /// Gems collected from rare drops
    #[serde(default)]
    pub gems: u32,
}

pub struct WalkenService {
    core: NetworkCore<WalkenState>,
    oracle: Arc<dyn RewardOracle>,
    config: WalkenConfig,
}

impl WalkenService {
    pub async fn load(
        store: Arc<dyn RewardStore>,
        oracle: Arc<dyn RewardOracle>,
        config: WalkenConfig,
    ) -> ServiceResult<Self> {
        config.validate()?;
        let descriptor = NetworkDescriptor::new(
            "walken",
            "Walken",
            "WLKN",
            "Walken Token",
            "/logos/walken.svg",
            "Session minutes become WLKN, with gem drops for your CAThletes",
            NetworkCategory::Move,
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
impl MinerLogic for WalkenService {
    type Extra = WalkenState;

    fn core(&self) -> &NetworkCore<WalkenState> {
        &self.core
    }

    async fn earn(&self, activity: &ActivityData, now: DateTime<Utc>) -> ServiceResult<bool> {
        let Some(mut state) = self.core.accepting_state().await else {
            return Ok(false);
        };
        let base = clamp_reward(
            activity.duration_minutes() * self.config.wlkn_per_minute,
            self.config.max_wlkn_per_submission,
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
                state.rewards.push(RewardRecord {
                    amount,
                    timestamp: epoch_ms(now),
                    activity_id: activity.id.clone(),
                    tx_hash: settlement.tx_hash,
                });
                if self.oracle.roll_bonus(self.config.gem_drop_chance).await {
                    state.extra.gems += 1;
                    tracing::info!(network = %descriptor.id, gems = state.extra.gems, "Gem drop");
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
        let gems = self.core.state().await.extra.gems;
        if gems > 0 {
            vec![TokenBalance {
                symbol: "GEM".to_string(),
                amount: f64::from(gems),
            }]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityType;
    use crate::services::network::RewardNetwork;
    use crate::services::oracle::SimOracle;
    use crate::store::MemoryStore;

    fn session(minutes: f64) -> ActivityData {
        let start = Utc::now();
        ActivityData {
            id: "act_1".to_string(),
            activity_type: ActivityType::Longboard,
            start_time: start,
            end_time: start + chrono::Duration::seconds((minutes * 60.0) as i64),
            duration_secs: minutes * 60.0,
            distance_meters: 4000.0,
            locations: Vec::new(),
            user_id: "rider_1".to_string(),
        }
    }

    async fn make_service(config: WalkenConfig) -> WalkenService {
        let service = WalkenService::load(
            Arc::new(MemoryStore::new()),
            Arc::new(SimOracle::seeded(8)),
            config,
        )
        .await
        .unwrap();
        service.enable("rider_1").await.unwrap();
        service
    }

    #[tokio::test]
    async fn test_minutes_become_wlkn() {
        let service = make_service(WalkenConfig::default()).await;
        assert!(service
            .submit_activity(&session(45.0), Utc::now())
            .await
            .unwrap());
        assert!((service.balance().await - 4.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_marathon_session_hits_cap() {
        let service = make_service(WalkenConfig::default()).await;
        assert!(service
            .submit_activity(&session(300.0), Utc::now())
            .await
            .unwrap());
        assert!((service.balance().await - 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_certain_drop_collects_gems() {
        let config = WalkenConfig {
            gem_drop_chance: 1.0,
            ..WalkenConfig::default()
        };
        let service = make_service(config).await;
        let now = Utc::now();
        assert!(service.submit_activity(&session(10.0), now).await.unwrap());
        assert!(service.submit_activity(&session(10.0), now).await.unwrap());
        let balances = service.token_balances().await;
        assert_eq!(balances[1].symbol, "GEM");
        assert!((balances[1].amount - 2.0).abs() < 1e-9);
    }
}
