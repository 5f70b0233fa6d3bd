// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared reward-service contract and state core.
//!
//! Every network service is the same machine with a different formula:
//! enable/disable state, an append-only reward ledger, and a persisted blob
//! under its own storage namespace. `NetworkCore` owns that machine;
//! `MinerLogic` is the small per-network surface (the formula); the
//! `RewardNetwork` trait is what the rest of the application sees, provided
//! for every `MinerLogic` by a blanket impl.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::{
    ActivityData, MinerSnapshot, MinerState, NetworkDescriptor, RewardRecord, TokenBalance,
};
use crate::store::{RewardStore, StoreError};

/// Errors a reward service can surface. Preconditions are not errors; they
/// come back as `Ok(false)`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Storage failure: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid service configuration: {0}")]
    Config(#[from] crate::config::ConfigError),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Storage namespace for a network id.
pub fn namespace_for(network_id: &str) -> String {
    format!("network.{network_id}")
}

// ─── NetworkCore ─────────────────────────────────────────────

/// State owned by every network service: descriptor, persisted miner state,
/// and the runtime boost multiplier (never persisted; boosts re-assert it).
pub struct NetworkCore<X> {
    descriptor: NetworkDescriptor,
    store: Arc<dyn RewardStore>,
    namespace: String,
    state: RwLock<MinerState<X>>,
    multiplier: RwLock<f64>,
}

impl<X> NetworkCore<X>
where
    X: Default + Serialize + DeserializeOwned + Send + Sync,
{
    /// Build a core by loading the service's namespace from the store.
    ///
    /// An absent blob starts from defaults; a malformed blob is logged and
    /// replaced with defaults rather than failing construction.
    pub async fn load(
        descriptor: NetworkDescriptor,
        store: Arc<dyn RewardStore>,
    ) -> ServiceResult<Self> {
        let namespace = namespace_for(&descriptor.id);
        let state = match store.get(&namespace).await? {
            Some(blob) => match serde_json::from_str::<MinerState<X>>(&blob) {
                Ok(state) => {
                    tracing::debug!(
                        network = %descriptor.id,
                        rewards = state.rewards.len(),
                        enabled = state.is_enabled,
                        "Restored miner state"
                    );
                    state
                }
                Err(e) => {
                    tracing::warn!(
                        network = %descriptor.id,
                        error = %e,
                        "Malformed miner state, starting from defaults"
                    );
                    MinerState::default()
                }
            },
            None => MinerState::default(),
        };

        Ok(Self {
            descriptor,
            store,
            namespace,
            state: RwLock::new(state),
            multiplier: RwLock::new(1.0),
        })
    }

    pub fn descriptor(&self) -> &NetworkDescriptor {
        &self.descriptor
    }

    pub async fn state(&self) -> RwLockReadGuard<'_, MinerState<X>> {
        self.state.read().await
    }

    pub async fn state_mut(&self) -> RwLockWriteGuard<'_, MinerState<X>> {
        self.state.write().await
    }

    /// Take the write lock only if submissions may be accepted (enabled and
    /// bound to a user). Formulas start here so the precondition check can
    /// never be skipped.
    pub async fn accepting_state(&self) -> Option<RwLockWriteGuard<'_, MinerState<X>>> {
        let state = self.state.write().await;
        state.accepting().then_some(state)
    }

    /// Serialize `state` into the service's namespace.
    ///
    /// Called with the write lock held, so the persisted blob always matches
    /// what the in-memory state was at the call.
    pub async fn persist(&self, state: &MinerState<X>) -> ServiceResult<()> {
        let blob = serde_json::to_string(state).map_err(|e| StoreError::Io {
            namespace: self.namespace.clone(),
            message: e.to_string(),
        })?;
        self.store.put(&self.namespace, &blob).await?;
        Ok(())
    }

    pub async fn is_enabled(&self) -> bool {
        self.state.read().await.is_enabled
    }

    pub async fn user_id(&self) -> Option<String> {
        self.state.read().await.user_id.clone()
    }

    pub async fn balance(&self) -> f64 {
        self.state.read().await.balance()
    }

    pub async fn rewards(&self) -> Vec<RewardRecord> {
        self.state.read().await.rewards.clone()
    }

    pub async fn multiplier(&self) -> f64 {
        *self.multiplier.read().await
    }

    /// Set the boost multiplier. Invalid values fall back to neutral.
    pub async fn set_multiplier(&self, multiplier: f64) {
        let value = if multiplier.is_finite() && multiplier > 0.0 {
            multiplier
        } else {
            1.0
        };
        *self.multiplier.write().await = value;
    }

    pub async fn snapshot(&self) -> MinerSnapshot {
        let state = self.state.read().await;
        MinerSnapshot {
            descriptor: self.descriptor.clone(),
            is_enabled: state.is_enabled,
            user_id: state.user_id.clone(),
            balance: state.balance(),
            reward_count: state.rewards.len(),
            multiplier: *self.multiplier.read().await,
        }
    }
}

// ─── Service traits ──────────────────────────────────────────

/// The per-network half of a reward service: its persisted extra state and
/// its formula. Everything else is shared.
#[async_trait]
pub trait MinerLogic: Send + Sync {
    /// Service-specific persisted fields, flattened into the miner blob.
    type Extra: Default + Serialize + DeserializeOwned + Send + Sync;

    fn core(&self) -> &NetworkCore<Self::Extra>;

    /// Compute and disburse the reward for one submitted session.
    ///
    /// Returns whether the submission was accepted. Implementations check
    /// preconditions through `core().accepting_state()` and answer
    /// `Ok(false)` (not an error) when they do not hold.
    async fn earn(&self, activity: &ActivityData, now: DateTime<Utc>) -> ServiceResult<bool>;

    /// Passive accrual tick; submission-only networks keep the default.
    async fn tick(&self, now: DateTime<Utc>) -> ServiceResult<Option<RewardRecord>> {
        let _ = now;
        Ok(None)
    }

    /// Holdings beyond the primary token (rare-event bonus tokens).
    async fn extra_balances(&self) -> Vec<TokenBalance> {
        Vec::new()
    }

    /// Called with the write lock held while disabling; passive networks
    /// clear their accrual clock here so downtime never pays out.
    fn on_disable(&self, state: &mut MinerState<Self::Extra>) {
        let _ = state;
    }
}

/// What the manager, boost service, and HTTP layer see of a network service.
#[async_trait]
pub trait RewardNetwork: Send + Sync {
    fn descriptor(&self) -> &NetworkDescriptor;
    async fn is_enabled(&self) -> bool;
    async fn user_id(&self) -> Option<String>;
    /// Enable mining for a user. Idempotent for the same user.
    async fn enable(&self, user_id: &str) -> ServiceResult<()>;
    /// Disable mining. Safe when already disabled.
    async fn disable(&self) -> ServiceResult<()>;
    /// Submit one activity session; `Ok(false)` when nothing was earned.
    async fn submit_activity(
        &self,
        activity: &ActivityData,
        now: DateTime<Utc>,
    ) -> ServiceResult<bool>;
    /// Passive-accrual poll; returns the disbursed record, if any.
    async fn poll(&self, now: DateTime<Utc>) -> ServiceResult<Option<RewardRecord>>;
    async fn balance(&self) -> f64;
    async fn rewards(&self) -> Vec<RewardRecord>;
    /// Holdings per token symbol (primary first).
    async fn token_balances(&self) -> Vec<TokenBalance>;
    async fn multiplier(&self) -> f64;
    async fn set_multiplier(&self, multiplier: f64);
    async fn snapshot(&self) -> MinerSnapshot;
}

#[async_trait]
impl<S: MinerLogic> RewardNetwork for S {
    fn descriptor(&self) -> &NetworkDescriptor {
        self.core().descriptor()
    }

    async fn is_enabled(&self) -> bool {
        self.core().is_enabled().await
    }

    async fn user_id(&self) -> Option<String> {
        self.core().user_id().await
    }

    async fn enable(&self, user_id: &str) -> ServiceResult<()> {
        let core = self.core();
        let mut state = core.state_mut().await;
        if state.is_enabled && state.user_id.as_deref() == Some(user_id) {
            return Ok(());
        }
        state.is_enabled = true;
        state.user_id = Some(user_id.to_string());
        core.persist(&state).await?;
        tracing::info!(network = %core.descriptor().id, user_id, "Mining enabled");
        Ok(())
    }

    async fn disable(&self) -> ServiceResult<()> {
        let core = self.core();
        let mut state = core.state_mut().await;
        if !state.is_enabled {
            return Ok(());
        }
        state.is_enabled = false;
        self.on_disable(&mut state);
        core.persist(&state).await?;
        tracing::info!(network = %core.descriptor().id, "Mining disabled");
        Ok(())
    }

    async fn submit_activity(
        &self,
        activity: &ActivityData,
        now: DateTime<Utc>,
    ) -> ServiceResult<bool> {
        self.earn(activity, now).await
    }

    async fn poll(&self, now: DateTime<Utc>) -> ServiceResult<Option<RewardRecord>> {
        self.tick(now).await
    }

    async fn balance(&self) -> f64 {
        self.core().balance().await
    }

    async fn rewards(&self) -> Vec<RewardRecord> {
        self.core().rewards().await
    }

    async fn token_balances(&self) -> Vec<TokenBalance> {
        let mut balances = vec![TokenBalance {
            symbol: self.core().descriptor().token_symbol.clone(),
            amount: self.core().balance().await,
        }];
        balances.extend(self.extra_balances().await);
        balances
    }

    async fn multiplier(&self) -> f64 {
        self.core().multiplier().await
    }

    async fn set_multiplier(&self, multiplier: f64) {
        self.core().set_multiplier(multiplier).await;
    }

    async fn snapshot(&self) -> MinerSnapshot {
        self.core().snapshot().await
    }
}
