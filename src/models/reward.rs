// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reward ledger models and the persisted per-service miner state.

use serde::{Deserialize, Serialize};

use super::network::NetworkDescriptor;

/// One append-only ledger entry. Records are never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardRecord {
    /// Amount in the service's primary token
    pub amount: f64,
    /// Epoch milliseconds at disbursement
    pub timestamp: i64,
    /// Source activity id, or a synthetic id for passive accrual
    pub activity_id: String,
    /// Settlement transaction hash, when the oracle produced one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

/// A service's holdings in one token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    pub symbol: String,
    pub amount: f64,
}

/// Persisted state of one network service.
///
/// Serialized as a single JSON blob under the service's storage namespace,
/// with the service-specific fields flattened alongside the shared ones.
/// Every field defaults so a partial or missing blob loads cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinerState<X> {
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub rewards: Vec<RewardRecord>,
    #[serde(flatten)]
    pub extra: X,
}

impl<X: Default> Default for MinerState<X> {
    fn default() -> Self {
        Self {
            is_enabled: false,
            user_id: None,
            rewards: Vec::new(),
            extra: X::default(),
        }
    }
}

impl<X> MinerState<X> {
    /// Balance is derived from the ledger, never stored.
    pub fn balance(&self) -> f64 {
        self.rewards.iter().map(|r| r.amount).sum()
    }

    /// True when submissions may be accepted (enabled and bound to a user).
    pub fn accepting(&self) -> bool {
        self.is_enabled && self.user_id.is_some()
    }
}

/// Extra state for services that persist nothing beyond the shared fields.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NoExtra {}

/// Live view of one service for the API: identity plus current miner state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinerSnapshot {
    #[serde(flatten)]
    pub descriptor: NetworkDescriptor,
    pub is_enabled: bool,
    pub user_id: Option<String>,
    pub balance: f64,
    pub reward_count: usize,
    pub multiplier: f64,
}
