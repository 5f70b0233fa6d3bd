// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reward oracle: the seam between reward bookkeeping and network backends.
//!
//! Every disbursement is settled through an oracle before it lands in a
//! ledger, and rare-event bonuses are sampled through it. Production uses
//! `HttpOracle` against a settlement endpoint; development and tests use
//! `SimOracle`, which is seedable and can be told to fail per network.

use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tokio::sync::Mutex;

/// Errors from oracle calls. Callers treat any of these as "this
/// disbursement did not happen" and stay usable.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("Settlement endpoint returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Settlement request failed: {0}")]
    Transport(String),

    #[error("Settlement rejected for network {0}")]
    Rejected(String),
}

/// Outcome of a successful settlement.
#[derive(Debug, Clone)]
pub struct Settlement {
    /// Transaction hash, when the backend produced one
    pub tx_hash: Option<String>,
}

/// External settlement and randomness source for reward services.
#[async_trait]
pub trait RewardOracle: Send + Sync {
    /// Record a computed reward with the network backend.
    async fn settle(
        &self,
        network_id: &str,
        user_id: &str,
        token_symbol: &str,
        amount: f64,
    ) -> Result<Settlement, OracleError>;

    /// Sample one independent rare-event trial with probability `p`.
    ///
    /// Each call is an independent draw; probability never accumulates
    /// across calls. `p <= 0` never fires, `p >= 1` always fires.
    async fn roll_bonus(&self, probability: f64) -> bool;
}

// ─── HTTP Oracle ─────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SettlementRequest<'a> {
    user_id: &'a str,
    token_symbol: &'a str,
    amount: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettlementResponse {
    #[serde(default)]
    tx_hash: Option<String>,
}

/// Oracle backed by a real settlement endpoint.
#[derive(Debug, Clone)]
pub struct HttpOracle {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOracle {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RewardOracle for HttpOracle {
    async fn settle(
        &self,
        network_id: &str,
        user_id: &str,
        token_symbol: &str,
        amount: f64,
    ) -> Result<Settlement, OracleError> {
        let url = format!("{}/networks/{}/settlements", self.base_url, network_id);
        let response = self
            .client
            .post(&url)
            .json(&SettlementRequest {
                user_id,
                token_symbol,
                amount,
            })
            .send()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OracleError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body: SettlementResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;
        Ok(Settlement {
            tx_hash: body.tx_hash,
        })
    }

    async fn roll_bonus(&self, probability: f64) -> bool {
        if !probability.is_finite() || probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        rand::thread_rng().gen::<f64>() < probability
    }
}

// ─── Simulated Oracle ────────────────────────────────────────

/// Deterministic oracle for development and tests.
///
/// Seeded, so a given seed replays the same transaction hashes and bonus
/// draws. Networks listed in `fail_networks` reject every settlement,
/// which is how tests exercise per-network failure isolation.
pub struct SimOracle {
    rng: Mutex<ChaCha8Rng>,
    fail_networks: HashSet<String>,
}

impl SimOracle {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
            fail_networks: HashSet::new(),
        }
    }

    /// Make every settlement for `network_id` fail.
    pub fn fail_network(mut self, network_id: &str) -> Self {
        self.fail_networks.insert(network_id.to_string());
        self
    }
}

#[async_trait]
impl RewardOracle for SimOracle {
    async fn settle(
        &self,
        network_id: &str,
        _user_id: &str,
        _token_symbol: &str,
        _amount: f64,
    ) -> Result<Settlement, OracleError> {
        if self.fail_networks.contains(network_id) {
            return Err(OracleError::Rejected(network_id.to_string()));
        }
        let bytes: [u8; 16] = self.rng.lock().await.gen();
        Ok(Settlement {
            tx_hash: Some(format!("0x{}", hex::encode(bytes))),
        })
    }

    async fn roll_bonus(&self, probability: f64) -> bool {
        if !probability.is_finite() || probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.rng.lock().await.gen::<f64>() < probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_oracle_is_deterministic() {
        let a = SimOracle::seeded(7);
        let b = SimOracle::seeded(7);
        let hash_a = a.settle("myst", "u", "MYST", 1.0).await.unwrap().tx_hash;
        let hash_b = b.settle("myst", "u", "MYST", 1.0).await.unwrap().tx_hash;
        assert_eq!(hash_a, hash_b);
        assert!(hash_a.unwrap().starts_with("0x"));
    }

    #[tokio::test]
    async fn test_bonus_extremes() {
        let oracle = SimOracle::seeded(1);
        assert!(!oracle.roll_bonus(0.0).await);
        assert!(!oracle.roll_bonus(-1.0).await);
        assert!(!oracle.roll_bonus(f64::NAN).await);
        assert!(oracle.roll_bonus(1.0).await);
        assert!(oracle.roll_bonus(2.0).await);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let oracle = SimOracle::seeded(1).fail_network("stepn");
        assert!(oracle.settle("stepn", "u", "GST", 1.0).await.is_err());
        assert!(oracle.settle("myst", "u", "MYST", 1.0).await.is_ok());
    }
}
