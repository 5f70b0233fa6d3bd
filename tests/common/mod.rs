// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use shred_rewards::config::Config;
use shred_rewards::routes::create_router;
use shred_rewards::services::{BoostService, DepinManager, NetworkTuning, SimOracle};
use shred_rewards::store::{MemoryStore, RewardStore, StoreError};
use shred_rewards::AppState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Create a test app on an in-memory store and seeded oracle.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_on(Arc::new(MemoryStore::new()), SimOracle::seeded(42)).await
}

/// Create a test app over a specific store and oracle, so tests can inject
/// failures or reuse a store across restarts.
#[allow(dead_code)]
pub async fn create_test_app_on(
    store: Arc<dyn RewardStore>,
    oracle: SimOracle,
) -> (axum::Router, Arc<AppState>) {
    let config = Config::default();
    let manager = Arc::new(
        DepinManager::with_default_networks(store, Arc::new(oracle), NetworkTuning::default())
            .await
            .expect("network services should load"),
    );
    let boosts = Arc::new(BoostService::with_default_catalog(manager.clone()));

    let state = Arc::new(AppState {
        config,
        manager,
        boosts,
    });

    (create_router(state.clone()), state)
}

/// JSON body for one activity submission.
#[allow(dead_code)]
pub fn activity_json(
    id: &str,
    activity_type: &str,
    duration_secs: f64,
    distance_meters: f64,
) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "activityType": activity_type,
        "startTime": "2026-08-22T08:00:00Z",
        "endTime": "2026-08-22T10:00:00Z",
        "durationSecs": duration_secs,
        "distanceMeters": distance_meters,
        "userId": "rider_1",
    })
}

/// Deserialize a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Store wrapper that can be poisoned mid-test: once poisoned, every write
/// fails. Reads keep working so services still see their loaded state.
#[allow(dead_code)]
pub struct PoisonableStore {
    inner: MemoryStore,
    poisoned: AtomicBool,
    target_namespace: String,
}

#[allow(dead_code)]
impl PoisonableStore {
    pub fn new(target_namespace: &str) -> Self {
        Self {
            inner: MemoryStore::new(),
            poisoned: AtomicBool::new(false),
            target_namespace: target_namespace.to_string(),
        }
    }

    pub fn poison(&self) {
        self.poisoned.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl RewardStore for PoisonableStore {
    async fn get(&self, namespace: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(namespace).await
    }

    async fn put(&self, namespace: &str, blob: &str) -> Result<(), StoreError> {
        if self.poisoned.load(Ordering::SeqCst) && namespace == self.target_namespace {
            return Err(StoreError::Io {
                namespace: namespace.to_string(),
                message: "poisoned by test".to_string(),
            });
        }
        self.inner.put(namespace, blob).await
    }

    async fn remove(&self, namespace: &str) -> Result<(), StoreError> {
        self.inner.remove(namespace).await
    }
}
