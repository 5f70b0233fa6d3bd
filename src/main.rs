// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shred-Rewards API Server
//!
//! Aggregates DePIN token rewards for board-sports sessions: each network
//! service mines its own token, the manager fans submissions out, and the
//! boost service applies time-boxed multipliers.

use shred_rewards::{
    config::{Config, OracleMode, StoreBackend},
    services::{
        BoostService, DepinManager, HttpOracle, NetworkTuning, RewardOracle, SimOracle,
    },
    store::{FileStore, MemoryStore, RewardStore},
    AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Shred-Rewards API");

    // Select the persistence backend
    let store: Arc<dyn RewardStore> = match config.store_backend {
        StoreBackend::File => {
            tracing::info!(dir = %config.data_dir, "Using file store");
            Arc::new(
                FileStore::open(&config.data_dir)
                    .await
                    .expect("Failed to open data directory"),
            )
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; state is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // Select the reward oracle
    let oracle: Arc<dyn RewardOracle> = match config.oracle_mode {
        OracleMode::Http => {
            let url = config
                .oracle_url
                .as_deref()
                .expect("ORACLE_URL is checked at config load");
            tracing::info!(url, "Using HTTP settlement oracle");
            Arc::new(HttpOracle::new(url))
        }
        OracleMode::Sim => {
            tracing::info!(seed = config.oracle_seed, "Using simulated oracle");
            Arc::new(SimOracle::seeded(config.oracle_seed))
        }
    };

    // Build the network fleet and the boost catalog
    let manager = Arc::new(
        DepinManager::with_default_networks(store, oracle, NetworkTuning::default())
            .await
            .expect("Failed to load network services"),
    );
    let boosts = Arc::new(BoostService::with_default_catalog(manager.clone()));

    // Passive accrual and boost expiry are polled, not event-driven; this
    // loop is the only clock the services see between requests.
    spawn_poll_loop(
        manager.clone(),
        boosts.clone(),
        config.poll_interval_secs,
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        manager,
        boosts,
    });

    // Build router
    let app = shred_rewards::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Periodic driver for passive accrual and boost expiry.
fn spawn_poll_loop(manager: Arc<DepinManager>, boosts: Arc<BoostService>, interval_secs: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let now = chrono::Utc::now();

            let disbursed = manager.poll_all(now).await;
            for (network_id, record) in &disbursed {
                tracing::debug!(
                    network = %network_id,
                    amount = record.amount,
                    "Passive reward disbursed"
                );
            }

            let expired = boosts.check_expired(now).await;
            if !expired.is_empty() {
                tracing::info!(count = expired.len(), "Expired boosts cleaned up");
            }
        }
    });
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shred_rewards=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
