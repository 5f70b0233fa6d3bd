// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Network descriptor model: the immutable identity of a reward network.

use serde::{Deserialize, Serialize};

/// Broad category a DePIN network belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkCategory {
    Bandwidth,
    Wireless,
    Compute,
    Location,
    Move,
    Chain,
}

/// Integration maturity shown to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkStatus {
    Live,
    Beta,
}

/// Immutable identity record for a reward-earning network.
///
/// Constructed once per service and never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDescriptor {
    /// Stable network id (also the storage namespace suffix)
    pub id: String,
    /// Display name
    pub name: String,
    /// Primary token ticker (e.g. "MYST")
    pub token_symbol: String,
    /// Primary token full name
    pub token_name: String,
    /// Logo asset URL for the UI
    pub logo_url: String,
    /// One-line description
    pub description: String,
    pub category: NetworkCategory,
    pub status: NetworkStatus,
}

impl NetworkDescriptor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: &str,
        name: &str,
        token_symbol: &str,
        token_name: &str,
        logo_url: &str,
        description: &str,
        category: NetworkCategory,
        status: NetworkStatus,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            token_symbol: token_symbol.to_string(),
            token_name: token_name.to_string(),
            logo_url: logo_url.to_string(),
            description: description.to_string(),
            category,
            status,
        }
    }
}
