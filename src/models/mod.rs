// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod boost;
pub mod network;
pub mod reward;

pub use activity::{ActivityData, ActivityType, TrackPoint};
pub use boost::{ActivityBoost, BoostTarget};
pub use network::{NetworkCategory, NetworkDescriptor, NetworkStatus};
pub use reward::{MinerSnapshot, MinerState, NoExtra, RewardRecord, TokenBalance};
