// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registry and fan-out coordinator for the DePIN network services.

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::{ActivityData, MinerSnapshot, RewardRecord, TokenBalance};
use crate::services::network::{RewardNetwork, ServiceResult};
use crate::services::networks::{
    FitmintService, FoamService, HeliumMobileService, IotexService, MystService, NetworkTuning,
    SignetService, StepnService, SweatcoinService, WalkenService,
};
use crate::services::oracle::RewardOracle;
use crate::store::RewardStore;

/// Owns every known network service and coordinates cross-network
/// operations. Construct once at startup and share via `Arc`.
pub struct DepinManager {
    services: Vec<Arc<dyn RewardNetwork>>,
}

impl DepinManager {
    pub fn new(services: Vec<Arc<dyn RewardNetwork>>) -> Self {
        Self { services }
    }

    /// Build the full network fleet against one store and oracle.
    pub async fn with_default_networks(
        store: Arc<dyn RewardStore>,
        oracle: Arc<dyn RewardOracle>,
        tuning: NetworkTuning,
    ) -> ServiceResult<Self> {
        let services: Vec<Arc<dyn RewardNetwork>> = vec![
            Arc::new(MystService::load(store.clone(), oracle.clone(), tuning.myst).await?),
            Arc::new(IotexService::load(store.clone(), oracle.clone(), tuning.iotex).await?),
            Arc::new(SignetService::load(store.clone(), oracle.clone(), tuning.signet).await?),
            Arc::new(
                HeliumMobileService::load(store.clone(), oracle.clone(), tuning.helium).await?,
            ),
            Arc::new(FoamService::load(store.clone(), oracle.clone(), tuning.foam).await?),
            Arc::new(
                SweatcoinService::load(store.clone(), oracle.clone(), tuning.sweatcoin).await?,
            ),
            Arc::new(StepnService::load(store.clone(), oracle.clone(), tuning.stepn).await?),
            Arc::new(WalkenService::load(store.clone(), oracle.clone(), tuning.walken).await?),
            Arc::new(FitmintService::load(store, oracle, tuning.fitmint).await?),
        ];
        tracing::info!(count = services.len(), "DePIN networks registered");
        Ok(Self::new(services))
    }

    pub fn services(&self) -> &[Arc<dyn RewardNetwork>] {
        &self.services
    }

    pub fn service(&self, network_id: &str) -> Option<&Arc<dyn RewardNetwork>> {
        self.services
            .iter()
            .find(|service| service.descriptor().id == network_id)
    }

    /// Services currently enabled, queried fresh rather than cached.
    pub async fn active_services(&self) -> Vec<Arc<dyn RewardNetwork>> {
        let mut active = Vec::new();
        for service in &self.services {
            if service.is_enabled().await {
                active.push(service.clone());
            }
        }
        active
    }

    /// Fan one activity out to every active service.
    ///
    /// Each submission is isolated: a failure in one network is logged and
    /// recorded as `false` without blocking the others. The result map has
    /// exactly one entry per active service.
    pub async fn submit_to_all(
        &self,
        activity: &ActivityData,
        now: DateTime<Utc>,
    ) -> BTreeMap<String, bool> {
        let active = self.active_services().await;
        let outcomes = join_all(active.iter().map(|service| async move {
            let id = service.descriptor().id.clone();
            let accepted = match service.submit_activity(activity, now).await {
                Ok(accepted) => accepted,
                Err(error) => {
                    tracing::warn!(network = %id, %error, "Activity submission failed");
                    false
                }
            };
            (id, accepted)
        }))
        .await;
        outcomes.into_iter().collect()
    }

    /// Total holdings per token symbol across every service. Networks that
    /// share a symbol are summed into one bucket.
    pub async fn total_balances(&self) -> Vec<TokenBalance> {
        let per_service = join_all(
            self.services
                .iter()
                .map(|service| service.token_balances()),
        )
        .await;

        let mut buckets: BTreeMap<String, f64> = BTreeMap::new();
        for balance in per_service.into_iter().flatten() {
            *buckets.entry(balance.symbol).or_default() += balance.amount;
        }
        buckets
            .into_iter()
            .map(|(symbol, amount)| TokenBalance { symbol, amount })
            .collect()
    }

    /// Run one passive-accrual poll across the fleet, isolating failures,
    /// and collect whatever was disbursed.
    pub async fn poll_all(&self, now: DateTime<Utc>) -> Vec<(String, RewardRecord)> {
        let mut disbursed = Vec::new();
        for service in &self.services {
            let id = &service.descriptor().id;
            match service.poll(now).await {
                Ok(Some(record)) => disbursed.push((id.clone(), record)),
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(network = %id, %error, "Passive accrual poll failed");
                }
            }
        }
        disbursed
    }

    pub async fn snapshots(&self) -> Vec<MinerSnapshot> {
        join_all(self.services.iter().map(|service| service.snapshot())).await
    }
}
