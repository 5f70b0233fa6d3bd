// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Helium Mobile service: passive MOBILE accrual for coverage mapping.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::accrual::{passive_tick, PassiveConfig, PassiveState};
use crate::models::{
    ActivityData, MinerState, NetworkCategory, NetworkDescriptor, NetworkStatus, RewardRecord,
};
use crate::services::network::{MinerLogic, NetworkCore, ServiceResult};
use crate::services::oracle::RewardOracle;
use crate::store::RewardStore;

/// Ledger label for coverage disbursements.
const COVERAGE_SOURCE: &str = "coverage-uptime";

pub struct HeliumMobileService {
    core: NetworkCore<PassiveState>,
    oracle: Arc<dyn RewardOracle>,
    config: PassiveConfig,
}

impl HeliumMobileService {
    pub async fn load(
        store: Arc<dyn RewardStore>,
        oracle: Arc<dyn RewardOracle>,
        config: PassiveConfig,
    ) -> ServiceResult<Self> {
        config.validate()?;
        let descriptor = NetworkDescriptor::new(
            "helium-mobile",
            "Helium Mobile",
            "MOBILE",
            "Helium Mobile Token",
            "/logos/helium-mobile.svg",
            "Map mobile coverage on the way to the spot and earn MOBILE",
            NetworkCategory::Wireless,
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
impl MinerLogic for HeliumMobileService {
    type Extra = PassiveState;

    fn core(&self) -> &NetworkCore<PassiveState> {
        &self.core
    }

    /// Coverage mapping pays for uptime, not sessions.
    async fn earn(&self, _activity: &ActivityData, _now: DateTime<Utc>) -> ServiceResult<bool> {
        Ok(false)
    }

    async fn tick(&self, now: DateTime<Utc>) -> ServiceResult<Option<RewardRecord>> {
        passive_tick(
            &self.core,
            self.oracle.as_ref(),
            &self.config,
            COVERAGE_SOURCE,
            now,
        )
        .await
    }

    fn on_disable(&self, state: &mut MinerState<PassiveState>) {
        state.extra.last_reward_time = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::network::RewardNetwork;
    use crate::services::oracle::SimOracle;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_accrues_at_configured_rate() {
        let service = HeliumMobileService::load(
            Arc::new(MemoryStore::new()),
            Arc::new(SimOracle::seeded(2)),
            PassiveConfig {
                rate_per_hour: 1.0,
                reward_interval_secs: 3600,
            },
        )
        .await
        .unwrap();

        service.enable("rider_1").await.unwrap();
        let t0 = Utc::now();
        service.poll(t0).await.unwrap();

        // Two intervals pass before the next poll: one record for the
        // whole span, no double-counting.
        let t1 = t0 + chrono::Duration::seconds(7200);
        let record = service.poll(t1).await.unwrap().expect("reward due");
        assert!((record.amount - 2.0).abs() < 1e-9);
        assert_eq!(service.rewards().await.len(), 1);

        // Immediately after, nothing further is due.
        assert!(service.poll(t1).await.unwrap().is_none());
    }
}
