use borsh::BorshDeserialize;
use serde::{Deserialize, Serialize};
use solana_pubkey::Pubkey;

use crate::error::Error;
use crate::protocols::launchpad::{
    GLOBAL_CONFIG_ACCOUNT, PLATFORM_CONFIG_ACCOUNT, POOL_STATE_ACCOUNT,
};
use crate::protocols::{DISCRIMINATOR_LEN, account_discriminator};
use crate::types::pubkey_string;

/// Program-wide fee and migration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub epoch: u64,
    pub curve_type: u8,
    pub index: u16,
    pub migrate_fee: u64,
    pub trade_fee_rate: u64,
    pub max_share_fee_rate: u64,
    pub min_base_supply: u64,
    pub max_lock_rate: u64,
    pub min_base_sell_rate: u64,
    pub min_base_migrate_rate: u64,
    pub min_quote_fund_raising: u64,
    #[serde(with = "pubkey_string")]
    pub quote_mint: Pubkey,
    #[serde(with = "pubkey_string")]
    pub protocol_fee_owner: Pubkey,
    #[serde(with = "pubkey_string")]
    pub migrate_fee_owner: Pubkey,
    #[serde(with = "pubkey_string")]
    pub migrate_to_amm_wallet: Pubkey,
    #[serde(with = "pubkey_string")]
    pub migrate_to_cpswap_wallet: Pubkey,
}

/// Settings of the launch platform (front-end) a pool was created through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub epoch: u64,
    #[serde(with = "pubkey_string")]
    pub platform_fee_wallet: Pubkey,
    #[serde(with = "pubkey_string")]
    pub platform_nft_wallet: Pubkey,
    pub platform_scale: u64,
    pub creator_scale: u64,
    pub burn_scale: u64,
    pub fee_rate: u64,
    pub name: String,
    pub web: String,
    pub img: String,
    #[serde(with = "pubkey_string")]
    pub cpswap_config: Pubkey,
    pub creator_fee_rate: u64,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum PoolStatus {
    Fund,
    Migrate,
    Trade,
}

impl PoolStatus {
    pub fn from_code(code: u8) -> Result<Self, Error> {
        match code {
            0 => Ok(Self::Fund),
            1 => Ok(Self::Migrate),
            2 => Ok(Self::Trade),
            _ => Err(Error::Protocol {
                reason: format!("unknown pool status code: {code}"),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshDeserialize)]
#[cfg_attr(test, derive(borsh::BorshSerialize))]
pub struct VestingSchedule {
    pub total_locked_amount: u64,
    pub cliff_period: u64,
    pub unlock_period: u64,
    pub start_time: u64,
    pub allocated_share_amount: u64,
}

/// Bonding-curve pool created by `initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    pub epoch: u64,
    pub auth_bump: u8,
    pub status: PoolStatus,
    pub base_decimals: u8,
    pub quote_decimals: u8,
    pub migrate_type: u8,
    pub supply: u64,
    pub total_base_sell: u64,
    pub virtual_base: u64,
    pub virtual_quote: u64,
    pub real_base: u64,
    pub real_quote: u64,
    pub total_quote_fund_raising: u64,
    pub quote_protocol_fee: u64,
    pub platform_fee: u64,
    pub migrate_fee: u64,
    pub vesting_schedule: VestingSchedule,
    #[serde(with = "pubkey_string")]
    pub global_config: Pubkey,
    #[serde(with = "pubkey_string")]
    pub platform_config: Pubkey,
    #[serde(with = "pubkey_string")]
    pub base_mint: Pubkey,
    #[serde(with = "pubkey_string")]
    pub quote_mint: Pubkey,
    #[serde(with = "pubkey_string")]
    pub base_vault: Pubkey,
    #[serde(with = "pubkey_string")]
    pub quote_vault: Pubkey,
    #[serde(with = "pubkey_string")]
    pub creator: Pubkey,
}

// On-chain layouts. Fields after the last one listed (padding, later
// additions) are left unread.

#[derive(BorshDeserialize)]
#[cfg_attr(test, derive(borsh::BorshSerialize))]
pub(crate) struct GlobalConfigLayout {
    pub(crate) epoch: u64,
    pub(crate) curve_type: u8,
    pub(crate) index: u16,
    pub(crate) migrate_fee: u64,
    pub(crate) trade_fee_rate: u64,
    pub(crate) max_share_fee_rate: u64,
    pub(crate) min_base_supply: u64,
    pub(crate) max_lock_rate: u64,
    pub(crate) min_base_sell_rate: u64,
    pub(crate) min_base_migrate_rate: u64,
    pub(crate) min_quote_fund_raising: u64,
    pub(crate) quote_mint: [u8; 32],
    pub(crate) protocol_fee_owner: [u8; 32],
    pub(crate) migrate_fee_owner: [u8; 32],
    pub(crate) migrate_to_amm_wallet: [u8; 32],
    pub(crate) migrate_to_cpswap_wallet: [u8; 32],
}

#[derive(BorshDeserialize)]
#[cfg_attr(test, derive(borsh::BorshSerialize))]
pub(crate) struct PlatformConfigLayout {
    pub(crate) epoch: u64,
    pub(crate) platform_fee_wallet: [u8; 32],
    pub(crate) platform_nft_wallet: [u8; 32],
    pub(crate) platform_scale: u64,
    pub(crate) creator_scale: u64,
    pub(crate) burn_scale: u64,
    pub(crate) fee_rate: u64,
    pub(crate) name: [u8; 64],
    pub(crate) web: [u8; 256],
    pub(crate) img: [u8; 256],
    pub(crate) cpswap_config: [u8; 32],
    pub(crate) creator_fee_rate: u64,
}

#[derive(BorshDeserialize)]
#[cfg_attr(test, derive(borsh::BorshSerialize))]
pub(crate) struct PoolStateLayout {
    pub(crate) epoch: u64,
    pub(crate) auth_bump: u8,
    pub(crate) status: u8,
    pub(crate) base_decimals: u8,
    pub(crate) quote_decimals: u8,
    pub(crate) migrate_type: u8,
    pub(crate) supply: u64,
    pub(crate) total_base_sell: u64,
    pub(crate) virtual_base: u64,
    pub(crate) virtual_quote: u64,
    pub(crate) real_base: u64,
    pub(crate) real_quote: u64,
    pub(crate) total_quote_fund_raising: u64,
    pub(crate) quote_protocol_fee: u64,
    pub(crate) platform_fee: u64,
    pub(crate) migrate_fee: u64,
    pub(crate) vesting_schedule: VestingSchedule,
    pub(crate) global_config: [u8; 32],
    pub(crate) platform_config: [u8; 32],
    pub(crate) base_mint: [u8; 32],
    pub(crate) quote_mint: [u8; 32],
    pub(crate) base_vault: [u8; 32],
    pub(crate) quote_vault: [u8; 32],
    pub(crate) creator: [u8; 32],
}

/// Strip an account's 8-byte Anchor discriminator after checking it, then
/// read the leading fields of `T`.
fn decode_anchor_account<T: BorshDeserialize>(
    account: &'static str,
    data: &[u8],
) -> Result<T, Error> {
    let Some((discriminator, body)) = data.split_first_chunk::<DISCRIMINATOR_LEN>() else {
        return Err(Error::Decode {
            record: account,
            reason: format!("account data is {} bytes, shorter than its discriminator", data.len()),
        });
    };
    if *discriminator != account_discriminator(account) {
        return Err(Error::Protocol {
            reason: format!(
                "account discriminator {} is not {account}",
                hex::encode(discriminator)
            ),
        });
    }
    let mut cursor = body;
    T::deserialize(&mut cursor).map_err(|e| Error::Decode {
        record: account,
        reason: e.to_string(),
    })
}

fn nul_trimmed(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

pub fn decode_global_config(data: &[u8]) -> Result<GlobalConfig, Error> {
    let raw: GlobalConfigLayout = decode_anchor_account(GLOBAL_CONFIG_ACCOUNT, data)?;
    Ok(GlobalConfig {
        epoch: raw.epoch,
        curve_type: raw.curve_type,
        index: raw.index,
        migrate_fee: raw.migrate_fee,
        trade_fee_rate: raw.trade_fee_rate,
        max_share_fee_rate: raw.max_share_fee_rate,
        min_base_supply: raw.min_base_supply,
        max_lock_rate: raw.max_lock_rate,
        min_base_sell_rate: raw.min_base_sell_rate,
        min_base_migrate_rate: raw.min_base_migrate_rate,
        min_quote_fund_raising: raw.min_quote_fund_raising,
        quote_mint: Pubkey::new_from_array(raw.quote_mint),
        protocol_fee_owner: Pubkey::new_from_array(raw.protocol_fee_owner),
        migrate_fee_owner: Pubkey::new_from_array(raw.migrate_fee_owner),
        migrate_to_amm_wallet: Pubkey::new_from_array(raw.migrate_to_amm_wallet),
        migrate_to_cpswap_wallet: Pubkey::new_from_array(raw.migrate_to_cpswap_wallet),
    })
}

pub fn decode_platform_config(data: &[u8]) -> Result<PlatformConfig, Error> {
    let raw: PlatformConfigLayout = decode_anchor_account(PLATFORM_CONFIG_ACCOUNT, data)?;
    Ok(PlatformConfig {
        epoch: raw.epoch,
        platform_fee_wallet: Pubkey::new_from_array(raw.platform_fee_wallet),
        platform_nft_wallet: Pubkey::new_from_array(raw.platform_nft_wallet),
        platform_scale: raw.platform_scale,
        creator_scale: raw.creator_scale,
        burn_scale: raw.burn_scale,
        fee_rate: raw.fee_rate,
        name: nul_trimmed(&raw.name),
        web: nul_trimmed(&raw.web),
        img: nul_trimmed(&raw.img),
        cpswap_config: Pubkey::new_from_array(raw.cpswap_config),
        creator_fee_rate: raw.creator_fee_rate,
    })
}

pub fn decode_pool_state(data: &[u8]) -> Result<PoolState, Error> {
    let raw: PoolStateLayout = decode_anchor_account(POOL_STATE_ACCOUNT, data)?;
    Ok(PoolState {
        epoch: raw.epoch,
        auth_bump: raw.auth_bump,
        status: PoolStatus::from_code(raw.status)?,
        base_decimals: raw.base_decimals,
        quote_decimals: raw.quote_decimals,
        migrate_type: raw.migrate_type,
        supply: raw.supply,
        total_base_sell: raw.total_base_sell,
        virtual_base: raw.virtual_base,
        virtual_quote: raw.virtual_quote,
        real_base: raw.real_base,
        real_quote: raw.real_quote,
        total_quote_fund_raising: raw.total_quote_fund_raising,
        quote_protocol_fee: raw.quote_protocol_fee,
        platform_fee: raw.platform_fee,
        migrate_fee: raw.migrate_fee,
        vesting_schedule: raw.vesting_schedule,
        global_config: Pubkey::new_from_array(raw.global_config),
        platform_config: Pubkey::new_from_array(raw.platform_config),
        base_mint: Pubkey::new_from_array(raw.base_mint),
        quote_mint: Pubkey::new_from_array(raw.quote_mint),
        base_vault: Pubkey::new_from_array(raw.base_vault),
        quote_vault: Pubkey::new_from_array(raw.quote_vault),
        creator: Pubkey::new_from_array(raw.creator),
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub(crate) fn with_discriminator(account: &str, body: &[u8]) -> Vec<u8> {
        let mut data = account_discriminator(account).to_vec();
        data.extend_from_slice(body);
        data
    }

    pub(crate) fn global_config_layout() -> GlobalConfigLayout {
        GlobalConfigLayout {
            epoch: 7,
            curve_type: 0,
            index: 1,
            migrate_fee: 0,
            trade_fee_rate: 2_500,
            max_share_fee_rate: 10_000,
            min_base_supply: 10_000_000,
            max_lock_rate: 300_000,
            min_base_sell_rate: 200_000,
            min_base_migrate_rate: 200_000,
            min_quote_fund_raising: 30_000_000_000,
            quote_mint: [1; 32],
            protocol_fee_owner: [2; 32],
            migrate_fee_owner: [3; 32],
            migrate_to_amm_wallet: [4; 32],
            migrate_to_cpswap_wallet: [5; 32],
        }
    }

    pub(crate) fn platform_config_layout() -> PlatformConfigLayout {
        let mut name = [0u8; 64];
        name[..8].copy_from_slice(b"letsbonk");
        let mut web = [0u8; 256];
        web[..16].copy_from_slice(b"https://bonk.fun");
        PlatformConfigLayout {
            epoch: 7,
            platform_fee_wallet: [6; 32],
            platform_nft_wallet: [7; 32],
            platform_scale: 0,
            creator_scale: 0,
            burn_scale: 0,
            fee_rate: 10_000,
            name,
            web,
            img: [0; 256],
            cpswap_config: [8; 32],
            creator_fee_rate: 0,
        }
    }

    pub(crate) fn pool_state_layout() -> PoolStateLayout {
        PoolStateLayout {
            epoch: 7,
            auth_bump: 255,
            status: 0,
            base_decimals: 6,
            quote_decimals: 9,
            migrate_type: 1,
            supply: 1_000_000_000_000_000,
            total_base_sell: 793_100_000_000_000,
            virtual_base: 1_073_025_605_596_382,
            virtual_quote: 30_000_852_951,
            real_base: 0,
            real_quote: 0,
            total_quote_fund_raising: 85_000_000_000,
            quote_protocol_fee: 0,
            platform_fee: 0,
            migrate_fee: 0,
            vesting_schedule: VestingSchedule::default(),
            global_config: [9; 32],
            platform_config: [10; 32],
            base_mint: [11; 32],
            quote_mint: [12; 32],
            base_vault: [13; 32],
            quote_vault: [14; 32],
            creator: [15; 32],
        }
    }

    pub(crate) fn encode<T: borsh::BorshSerialize>(account: &str, layout: &T) -> Vec<u8> {
        with_discriminator(account, &borsh::to_vec(layout).unwrap_or_default())
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn decodes_global_config_and_ignores_padding() {
        let mut data = encode(GLOBAL_CONFIG_ACCOUNT, &global_config_layout());
        data.extend_from_slice(&[0u8; 128]);
        let config = decode_global_config(&data).unwrap();
        assert_eq!(config.trade_fee_rate, 2_500);
        assert_eq!(config.quote_mint, Pubkey::new_from_array([1; 32]));
        assert_eq!(
            config.migrate_to_cpswap_wallet,
            Pubkey::new_from_array([5; 32])
        );
    }

    #[test]
    fn decodes_platform_config_text_fields() {
        let data = encode(PLATFORM_CONFIG_ACCOUNT, &platform_config_layout());
        let config = decode_platform_config(&data).unwrap();
        assert_eq!(config.name, "letsbonk");
        assert_eq!(config.web, "https://bonk.fun");
        assert_eq!(config.img, "");
        assert_eq!(config.fee_rate, 10_000);
    }

    #[test]
    fn decodes_pool_state_status_and_keys() {
        let data = encode(POOL_STATE_ACCOUNT, &pool_state_layout());
        let pool = decode_pool_state(&data).unwrap();
        assert_eq!(pool.status, PoolStatus::Fund);
        assert_eq!(pool.base_decimals, 6);
        assert_eq!(pool.creator, Pubkey::new_from_array([15; 32]));
    }

    #[test]
    fn rejects_foreign_account_discriminator() {
        let data = encode(GLOBAL_CONFIG_ACCOUNT, &global_config_layout());
        assert!(matches!(
            decode_pool_state(&data),
            Err(Error::Protocol { .. })
        ));
    }

    #[test]
    fn rejects_truncated_account_data() {
        let data = encode(POOL_STATE_ACCOUNT, &pool_state_layout());
        assert!(matches!(
            decode_pool_state(&data[..40]),
            Err(Error::Decode { .. })
        ));
        assert!(matches!(
            decode_pool_state(&data[..4]),
            Err(Error::Decode { .. })
        ));
    }

    #[test]
    fn rejects_unknown_pool_status() {
        let mut layout = pool_state_layout();
        layout.status = 9;
        let data = encode(POOL_STATE_ACCOUNT, &layout);
        assert!(decode_pool_state(&data).is_err());
    }
}
