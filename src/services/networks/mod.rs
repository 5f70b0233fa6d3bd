// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The DePIN network services and their shared accrual math.

pub mod accrual;
pub mod fitmint;
pub mod foam;
pub mod helium;
pub mod iotex;
pub mod myst;
pub mod signet;
pub mod stepn;
pub mod sweatcoin;
pub mod walken;

pub use accrual::PassiveConfig;
pub use fitmint::{FitmintConfig, FitmintService};
pub use foam::{AnchorPoint, FoamConfig, FoamService};
pub use helium::HeliumMobileService;
pub use iotex::{IotexConfig, IotexService};
pub use myst::MystService;
pub use signet::{SignetConfig, SignetService};
pub use stepn::{StepnConfig, StepnService};
pub use sweatcoin::{SweatcoinConfig, SweatcoinService};
pub use walken::{WalkenConfig, WalkenService};

/// Reward parameters for every network, bundled so the whole fleet can be
/// tuned from one place.
#[derive(Debug, Clone)]
pub struct NetworkTuning {
    pub myst: PassiveConfig,
    pub helium: PassiveConfig,
    pub iotex: IotexConfig,
    pub signet: SignetConfig,
    pub foam: FoamConfig,
    pub sweatcoin: SweatcoinConfig,
    pub stepn: StepnConfig,
    pub walken: WalkenConfig,
    pub fitmint: FitmintConfig,
}

impl Default for NetworkTuning {
    fn default() -> Self {
        Self {
            myst: PassiveConfig::default(),
            helium: PassiveConfig {
                rate_per_hour: 1.0,
                reward_interval_secs: 3600,
            },
            iotex: IotexConfig::default(),
            signet: SignetConfig::default(),
            foam: FoamConfig::default(),
            sweatcoin: SweatcoinConfig::default(),
            stepn: StepnConfig::default(),
            walken: WalkenConfig::default(),
            fitmint: FitmintConfig::default(),
        }
    }
}
