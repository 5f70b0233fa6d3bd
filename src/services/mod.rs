// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - reward bookkeeping and coordination.

pub mod boost;
pub mod manager;
pub mod network;
pub mod networks;
pub mod oracle;

pub use boost::BoostService;
pub use manager::DepinManager;
pub use network::{MinerLogic, NetworkCore, RewardNetwork, ServiceError, ServiceResult};
pub use networks::NetworkTuning;
pub use oracle::{HttpOracle, OracleError, RewardOracle, Settlement, SimOracle};
