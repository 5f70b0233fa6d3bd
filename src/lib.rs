// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Shred-Rewards: DePIN reward aggregation for board-sports sessions
//!
//! This crate provides the backend API that turns completed riding
//! sessions into token rewards across a fleet of DePIN networks, with
//! activity-unlocked multiplier boosts on top.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod time_utils;

use config::Config;
use services::{BoostService, DepinManager};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub manager: Arc<DepinManager>,
    pub boosts: Arc<BoostService>,
}
