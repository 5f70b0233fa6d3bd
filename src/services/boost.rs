// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity boost service: tracks progress toward boost conditions, applies
//! time-boxed multipliers to target networks, and expires them.
//!
//! Multipliers flow one way: this service pushes them into the network
//! services on every transition, so each network always holds its current
//! effective multiplier without knowing why.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{ActivityBoost, ActivityType, BoostTarget};
use crate::services::manager::DepinManager;

/// Catalog entries plus the copies currently running.
#[derive(Debug, Default)]
struct BoostLedger {
    catalog: Vec<ActivityBoost>,
    active: Vec<ActivityBoost>,
}

pub struct BoostService {
    manager: Arc<DepinManager>,
    ledger: RwLock<BoostLedger>,
}

impl BoostService {
    pub fn new(manager: Arc<DepinManager>, catalog: Vec<ActivityBoost>) -> Self {
        Self {
            manager,
            ledger: RwLock::new(BoostLedger {
                catalog,
                active: Vec::new(),
            }),
        }
    }

    pub fn with_default_catalog(manager: Arc<DepinManager>) -> Self {
        Self::new(manager, default_catalog())
    }

    pub async fn boosts(&self) -> Vec<ActivityBoost> {
        self.ledger.read().await.catalog.clone()
    }

    pub async fn active_boosts(&self) -> Vec<ActivityBoost> {
        self.ledger.read().await.active.clone()
    }

    /// The boost currently governing one network: a boost targeting it
    /// specifically wins over an "all" boost, regardless of activation
    /// order.
    pub async fn active_boost_for(&self, network_id: &str) -> Option<ActivityBoost> {
        boost_for(&self.ledger.read().await.active, network_id).cloned()
    }

    /// Effective multiplier for one network; neutral 1.0 when nothing
    /// applies.
    pub async fn multiplier_for(&self, network_id: &str) -> f64 {
        effective_multiplier(&self.ledger.read().await.active, network_id)
    }

    /// Fold one observed session into every matching boost's progress.
    ///
    /// Progress reflects the best single session, recomputed per
    /// observation rather than accumulated. Boosts already running are left
    /// alone. Returns the boosts this session activated.
    pub async fn update_activity_progress(
        &self,
        activity_type: ActivityType,
        duration_secs: f64,
        distance_meters: Option<f64>,
        now: DateTime<Utc>,
    ) -> Vec<ActivityBoost> {
        let mut ledger = self.ledger.write().await;
        let mut activated = Vec::new();

        for index in 0..ledger.catalog.len() {
            let boost = &mut ledger.catalog[index];
            if boost.activity_type != activity_type || boost.is_active {
                continue;
            }
            boost.progress = boost.compute_progress(duration_secs, distance_meters);
            if boost.progress >= 100.0 {
                boost.activate(now);
                let copy = boost.clone();
                tracing::info!(
                    boost = %copy.id,
                    multiplier = copy.multiplier,
                    "Boost condition met, activating"
                );
                ledger.active.push(copy.clone());
                activated.push(copy);
            }
        }

        if !activated.is_empty() {
            self.reconcile_multipliers(&ledger).await;
        }
        activated
    }

    /// Manually activate a catalog boost. Returns false for an unknown id
    /// or one already running.
    pub async fn activate_boost(&self, id: &str, now: DateTime<Utc>) -> bool {
        let mut ledger = self.ledger.write().await;
        let Some(boost) = ledger.catalog.iter_mut().find(|boost| boost.id == id) else {
            return false;
        };
        if boost.is_active {
            return false;
        }
        boost.activate(now);
        let copy = boost.clone();
        tracing::info!(boost = %copy.id, multiplier = copy.multiplier, "Boost activated");
        ledger.active.push(copy);
        self.reconcile_multipliers(&ledger).await;
        true
    }

    /// Deactivate a running boost and reset its catalog entry. Returns
    /// false when the boost is not currently active.
    pub async fn deactivate_boost(&self, id: &str) -> bool {
        let mut ledger = self.ledger.write().await;
        if !self.remove_active(&mut ledger, id) {
            return false;
        }
        tracing::info!(boost = %id, "Boost deactivated");
        self.reconcile_multipliers(&ledger).await;
        true
    }

    /// Expire boosts whose window has passed. Polling is the caller's job;
    /// there is no internal timer. Returns the ids that expired.
    pub async fn check_expired(&self, now: DateTime<Utc>) -> Vec<String> {
        let mut ledger = self.ledger.write().await;
        let expired: Vec<String> = ledger
            .active
            .iter()
            .filter(|boost| boost.is_expired(now))
            .map(|boost| boost.id.clone())
            .collect();
        if expired.is_empty() {
            return expired;
        }
        for id in &expired {
            self.remove_active(&mut ledger, id);
            tracing::info!(boost = %id, "Boost expired");
        }
        self.reconcile_multipliers(&ledger).await;
        expired
    }

    /// Drop `id` from the active list and reset its catalog entry. Returns
    /// whether it was running.
    fn remove_active(&self, ledger: &mut BoostLedger, id: &str) -> bool {
        let before = ledger.active.len();
        ledger.active.retain(|boost| boost.id != id);
        if ledger.active.len() == before {
            return false;
        }
        if let Some(entry) = ledger.catalog.iter_mut().find(|boost| boost.id == id) {
            entry.reset();
        }
        true
    }

    /// Push every network's effective multiplier, derived from the active
    /// list. Recomputing the whole fleet keeps a network covered by an
    /// "all" boost when its specific boost ends first.
    async fn reconcile_multipliers(&self, ledger: &BoostLedger) {
        for service in self.manager.services() {
            let multiplier = effective_multiplier(&ledger.active, &service.descriptor().id);
            service.set_multiplier(multiplier).await;
        }
    }
}

fn boost_for<'a>(active: &'a [ActivityBoost], network_id: &str) -> Option<&'a ActivityBoost> {
    active
        .iter()
        .find(|boost| matches!(&boost.target, BoostTarget::Network(id) if id == network_id))
        .or_else(|| active.iter().find(|boost| boost.target == BoostTarget::All))
}

fn effective_multiplier(active: &[ActivityBoost], network_id: &str) -> f64 {
    boost_for(active, network_id)
        .map(|boost| boost.multiplier)
        .unwrap_or(1.0)
}

/// The boost catalog offered at startup.
fn default_catalog() -> Vec<ActivityBoost> {
    vec![
        ActivityBoost::new(
            "morning-shred",
            "Morning Shred",
            1.25,
            3600,
            BoostTarget::All,
            ActivityType::Skateboard,
            1800.0,
            None,
        ),
        ActivityBoost::new(
            "dawn-patrol",
            "Dawn Patrol",
            2.0,
            7200,
            BoostTarget::Network("stepn".to_string()),
            ActivityType::Surf,
            2700.0,
            None,
        ),
        ActivityBoost::new(
            "powder-day",
            "Powder Day",
            2.0,
            14400,
            BoostTarget::Network("helium-mobile".to_string()),
            ActivityType::Snowboard,
            7200.0,
            Some(5000.0),
        ),
        ActivityBoost::new(
            "distance-demon",
            "Distance Demon",
            1.5,
            5400,
            BoostTarget::Network("sweatcoin".to_string()),
            ActivityType::Longboard,
            3600.0,
            Some(10000.0),
        ),
        ActivityBoost::new(
            "flat-water",
            "Flat Water Cruise",
            1.5,
            5400,
            BoostTarget::Network("walken".to_string()),
            ActivityType::Wakeboard,
            2400.0,
            None,
        ),
        ActivityBoost::new(
            "big-air",
            "Big Air",
            1.75,
            7200,
            BoostTarget::Network("foam".to_string()),
            ActivityType::Kiteboard,
            3600.0,
            Some(8000.0),
        ),
    ]
}
