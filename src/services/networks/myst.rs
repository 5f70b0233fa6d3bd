// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mysterium node service: passive MYST accrual while the node is enabled.

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

/// Ledger label for uptime disbursements.
const UPTIME_SOURCE: &str = "node-uptime";

pub struct MystService {
    core: NetworkCore<PassiveState>,
    oracle: Arc<dyn RewardOracle>,
    config: PassiveConfig,
}

impl MystService {
    pub async fn load(
        store: Arc<dyn RewardStore>,
        oracle: Arc<dyn RewardOracle>,
        config: PassiveConfig,
    ) -> ServiceResult<Self> {
        config.validate()?;
        let descriptor = NetworkDescriptor::new(
            "myst",
            "Mysterium",
            "MYST",
            "Mysterium Token",
            "/logos/myst.svg",
            "Run a Mysterium node and earn MYST for shared bandwidth",
            NetworkCategory::Bandwidth,
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
impl MinerLogic for MystService {
    type Extra = PassiveState;

    fn core(&self) -> &NetworkCore<PassiveState> {
        &self.core
    }

    /// Mysterium pays for uptime, not sessions.
    async fn earn(&self, _activity: &ActivityData, _now: DateTime<Utc>) -> ServiceResult<bool> {
        Ok(false)
    }

    async fn tick(&self, now: DateTime<Utc>) -> ServiceResult<Option<RewardRecord>> {
        passive_tick(&self.core, self.oracle.as_ref(), &self.config, UPTIME_SOURCE, now).await
    }

    fn on_disable(&self, state: &mut MinerState<PassiveState>) {
        // Stop the accrual clock so downtime never pays out.
        state.extra.last_reward_time = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::network::RewardNetwork;
    use crate::services::oracle::SimOracle;
    use crate::store::MemoryStore;
    use crate::time_utils::epoch_ms;

    async fn make_service() -> MystService {
        MystService::load(
            Arc::new(MemoryStore::new()),
            Arc::new(SimOracle::seeded(1)),
            PassiveConfig::default(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_poll_is_noop_while_disabled() {
        let service = make_service().await;
        assert!(service.poll(Utc::now()).await.unwrap().is_none());
        assert_eq!(service.balance().await, 0.0);
    }

    #[tokio::test]
    async fn test_first_poll_starts_clock_second_poll_pays() {
        let service = make_service().await;
        service.enable("rider_1").await.unwrap();

        let t0 = Utc::now();
        assert!(service.poll(t0).await.unwrap().is_none());

        // Half an interval: too soon
        let t1 = t0 + chrono::Duration::seconds(1800);
        assert!(service.poll(t1).await.unwrap().is_none());

        // A full interval since the clock started
        let t2 = t0 + chrono::Duration::seconds(3600);
        let record = service.poll(t2).await.unwrap().expect("reward due");
        assert!((record.amount - 0.05).abs() < 1e-9);
        assert_eq!(record.timestamp, epoch_ms(t2));
        assert_eq!(record.activity_id, UPTIME_SOURCE);

        let state = service.core().state().await;
        assert_eq!(state.extra.last_reward_time, Some(epoch_ms(t2)));
    }

    #[tokio::test]
    async fn test_boost_multiplier_scales_disbursement() {
        let service = make_service().await;
        service.enable("rider_1").await.unwrap();
        service.set_multiplier(2.0).await;

        let t0 = Utc::now();
        service.poll(t0).await.unwrap();
        let t1 = t0 + chrono::Duration::seconds(3600);
        let record = service.poll(t1).await.unwrap().expect("reward due");
        // 1 h * 0.05 MYST/h * 2.0
        assert!((record.amount - 0.1).abs() < 1e-9);
        assert_eq!(service.rewards().await.len(), 1);
    }

    #[tokio::test]
    async fn test_disable_clears_accrual_clock() {
        let service = make_service().await;
        service.enable("rider_1").await.unwrap();
        let t0 = Utc::now();
        service.poll(t0).await.unwrap();
        service.disable().await.unwrap();

        // Re-enabled a day later: the downtime must not pay.
        service.enable("rider_1").await.unwrap();
        let t1 = t0 + chrono::Duration::days(1);
        assert!(service.poll(t1).await.unwrap().is_none());
        let t2 = t1 + chrono::Duration::seconds(3600);
        let record = service.poll(t2).await.unwrap().expect("reward due");
        assert!((record.amount - 0.05).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_submissions_never_pay() {
        let service = make_service().await;
        service.enable("rider_1").await.unwrap();
        let activity = crate::models::ActivityData {
            id: "act_1".to_string(),
            activity_type: crate::models::ActivityType::Surf,
            start_time: Utc::now(),
            end_time: Utc::now(),
            duration_secs: 3600.0,
            distance_meters: 5000.0,
            locations: Vec::new(),
            user_id: "rider_1".to_string(),
        };
        assert!(!service.submit_activity(&activity, Utc::now()).await.unwrap());
    }
}
