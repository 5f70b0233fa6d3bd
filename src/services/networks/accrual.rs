// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Accrual primitives shared by the network formulas: passive time-based
//! disbursement, bounded-resource regeneration, and reward clamping.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::models::{MinerState, RewardRecord};
use crate::services::network::{NetworkCore, ServiceResult};
use crate::services::oracle::RewardOracle;
use crate::time_utils::{elapsed_hours, epoch_ms, from_epoch_ms};

/// Configuration for a passive (uptime-paid) network.
#[derive(Debug, Clone)]
pub struct PassiveConfig {
    /// Tokens earned per hour of uptime
    pub rate_per_hour: f64,
    /// Minimum seconds between disbursements
    pub reward_interval_secs: i64,
}

impl Default for PassiveConfig {
    fn default() -> Self {
        Self {
            rate_per_hour: 0.05,
            reward_interval_secs: 3600,
        }
    }
}

impl PassiveConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rate_per_hour.is_finite() || self.rate_per_hour < 0.0 {
            return Err(ConfigError::Invalid {
                field: "rate_per_hour",
                message: format!("must be finite and non-negative, got {}", self.rate_per_hour),
            });
        }
        if self.reward_interval_secs <= 0 {
            return Err(ConfigError::Invalid {
                field: "reward_interval_secs",
                message: format!("must be positive, got {}", self.reward_interval_secs),
            });
        }
        Ok(())
    }
}

/// Persisted extra state for passive networks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassiveState {
    /// Epoch ms of the last disbursement; `None` until the first poll after
    /// enabling starts the clock.
    #[serde(default)]
    pub last_reward_time: Option<i64>,
}

/// One passive-accrual poll.
///
/// Pays `elapsed_hours * rate * multiplier` once at least one reward
/// interval has elapsed since the last disbursement, advancing the clock
/// exactly to `now`. On settlement failure the clock does not advance, so
/// the span pays out (once) on a later successful poll.
pub(crate) async fn passive_tick(
    core: &NetworkCore<PassiveState>,
    oracle: &dyn RewardOracle,
    config: &PassiveConfig,
    source: &str,
    now: DateTime<Utc>,
) -> ServiceResult<Option<RewardRecord>> {
    let Some(mut state) = core.accepting_state().await else {
        return Ok(None);
    };

    let Some(last_ms) = state.extra.last_reward_time else {
        // First poll after enabling: start the accrual clock.
        state.extra.last_reward_time = Some(epoch_ms(now));
        core.persist(&state).await?;
        return Ok(None);
    };

    let elapsed = elapsed_hours(from_epoch_ms(last_ms), now);
    if elapsed * 3600.0 < config.reward_interval_secs as f64 {
        return Ok(None);
    }

    let base = elapsed * config.rate_per_hour;
    let amount = if base.is_finite() && base > 0.0 {
        base * core.multiplier().await
    } else {
        0.0
    };
    if amount <= 0.0 {
        // Zero rate: advance the clock so the span is not re-examined forever.
        state.extra.last_reward_time = Some(epoch_ms(now));
        core.persist(&state).await?;
        return Ok(None);
    }

    let descriptor = core.descriptor();
    let user_id = state.user_id.clone().unwrap_or_default();
    match oracle
        .settle(&descriptor.id, &user_id, &descriptor.token_symbol, amount)
        .await
    {
        Ok(settlement) => {
            let record = RewardRecord {
                amount,
                timestamp: epoch_ms(now),
                activity_id: source.to_string(),
                tx_hash: settlement.tx_hash,
            };
            state.rewards.push(record.clone());
            state.extra.last_reward_time = Some(epoch_ms(now));
            core.persist(&state).await?;
            tracing::debug!(network = %descriptor.id, amount, "Passive reward disbursed");
            Ok(Some(record))
        }
        Err(e) => {
            tracing::warn!(network = %descriptor.id, error = %e, "Passive settlement failed");
            Ok(None)
        }
    }
}

/// Clamp a computed reward: garbage and non-positive amounts become zero,
/// and a positive finite cap bounds the payout.
pub(crate) fn clamp_reward(amount: f64, cap: f64) -> f64 {
    if !amount.is_finite() || amount <= 0.0 {
        return 0.0;
    }
    if cap.is_finite() && cap > 0.0 {
        amount.min(cap)
    } else {
        amount
    }
}

/// Regenerate a bounded resource from its last update to `now`.
pub(crate) fn regenerate(
    level: f64,
    cap: f64,
    regen_per_hour: f64,
    last_update: Option<i64>,
    now: DateTime<Utc>,
) -> f64 {
    let cap = if cap.is_finite() && cap > 0.0 { cap } else { 0.0 };
    let current = if level.is_finite() { level } else { 0.0 };
    let Some(last_ms) = last_update else {
        return current.clamp(0.0, cap);
    };
    let hours = elapsed_hours(from_epoch_ms(last_ms), now);
    let regen = if regen_per_hour.is_finite() && regen_per_hour > 0.0 {
        hours * regen_per_hour
    } else {
        0.0
    };
    (current + regen).clamp(0.0, cap)
}

/// Settle a submission reward and append it to the ledger.
///
/// `Ok(false)` covers both a zero amount and a settlement failure; only a
/// settled reward mutates and persists state.
pub(crate) async fn settle_and_append<X>(
    core: &NetworkCore<X>,
    state: &mut MinerState<X>,
    oracle: &dyn RewardOracle,
    amount: f64,
    activity_id: &str,
    now: DateTime<Utc>,
) -> ServiceResult<bool>
where
    X: Default + Serialize + DeserializeOwned + Send + Sync,
{
    if amount <= 0.0 {
        return Ok(false);
    }
    let descriptor = core.descriptor();
    let user_id = state.user_id.clone().unwrap_or_default();
    match oracle
        .settle(&descriptor.id, &user_id, &descriptor.token_symbol, amount)
        .await
    {
        Ok(settlement) => {
            state.rewards.push(RewardRecord {
                amount,
                timestamp: epoch_ms(now),
                activity_id: activity_id.to_string(),
                tx_hash: settlement.tx_hash,
            });
            core.persist(state).await?;
            tracing::debug!(network = %descriptor.id, amount, activity_id, "Reward disbursed");
            Ok(true)
        }
        Err(e) => {
            tracing::warn!(
                network = %descriptor.id,
                activity_id,
                error = %e,
                "Settlement failed, submission dropped"
            );
            Ok(false)
        }
    }
}
