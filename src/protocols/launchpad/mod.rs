//! Raydium Launchpad (the program behind Bonk pool launches).

pub mod accounts;
pub mod params;

use solana_pubkey::{Pubkey, pubkey};

pub use accounts::{GlobalConfig, PlatformConfig, PoolState, PoolStatus, VestingSchedule};
pub use params::{
    ConstantCurve, CurveParams, FixedCurve, InitializeArgs, LinearCurve, MintParams, VestingParams,
};

pub const PROGRAM_ID: Pubkey = pubkey!("LanMV9sAd7wArD4vJFi2qDdfnVhFxYSUg6eADduJ3uj");

/// `initialize` creates a new pool together with its base mint.
pub const INITIALIZE: [u8; 8] = [175, 175, 109, 31, 13, 152, 155, 237];

pub const GLOBAL_CONFIG_ACCOUNT: &str = "GlobalConfig";
pub const PLATFORM_CONFIG_ACCOUNT: &str = "PlatformConfig";
pub const POOL_STATE_ACCOUNT: &str = "PoolState";
