//! Positional account binding for the `initialize` instruction.
//!
//! An instruction references accounts by position only. [`AccountSchema`]
//! names each position, so a new instruction layout is a new schema table
//! rather than a change to the resolver.

#[cfg(feature = "native")]
pub mod lookup;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use solana_pubkey::Pubkey;

use crate::protocols::launchpad::{GlobalConfig, PlatformConfig, PoolState};
use crate::protocols::{METADATA_PROGRAM_ID, RENT_SYSVAR_ID};
use crate::types::pubkey_string;

/// Raw-map label for positions past the end of the schema.
pub const UNKNOWN_ROLE: &str = "unknown";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
    strum_macros::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum AccountRole {
    Payer,
    Creator,
    GlobalConfig,
    PlatformConfig,
    Authority,
    PoolState,
    BaseMint,
    QuoteMint,
    BaseVault,
    QuoteVault,
    MetadataAccount,
    BaseTokenProgram,
    QuoteTokenProgram,
    MetadataProgram,
    SystemProgram,
    RentProgram,
    EventAuthority,
    Program,
}

/// Ordered role names of one instruction layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSchema {
    pub name: &'static str,
    pub roles: &'static [AccountRole],
}

/// Account layout of Raydium Launchpad `initialize`.
pub const INITIALIZE_V1: AccountSchema = AccountSchema {
    name: "initialize_v1",
    roles: &[
        AccountRole::Payer,
        AccountRole::Creator,
        AccountRole::GlobalConfig,
        AccountRole::PlatformConfig,
        AccountRole::Authority,
        AccountRole::PoolState,
        AccountRole::BaseMint,
        AccountRole::QuoteMint,
        AccountRole::BaseVault,
        AccountRole::QuoteVault,
        AccountRole::MetadataAccount,
        AccountRole::BaseTokenProgram,
        AccountRole::QuoteTokenProgram,
        AccountRole::MetadataProgram,
        AccountRole::SystemProgram,
        AccountRole::RentProgram,
        AccountRole::EventAuthority,
        AccountRole::Program,
    ],
};

impl AccountSchema {
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn position(&self, role: AccountRole) -> Option<usize> {
        self.roles.iter().position(|r| *r == role)
    }

    /// Label for the account at `position`, `"unknown"` past the schema.
    pub fn label(&self, position: usize) -> &'static str {
        self.roles.get(position).map_or(UNKNOWN_ROLE, |role| role.into())
    }

    /// Address bound to `role`, or `None` when the schema lacks the role or
    /// the account index is outside the key table.
    pub fn key_for(
        &self,
        role: AccountRole,
        accounts: &[u8],
        account_keys: &[Pubkey],
    ) -> Option<Pubkey> {
        let position = self.position(role)?;
        let index = *accounts.get(position)?;
        account_keys.get(usize::from(index)).copied()
    }
}

/// Accounts of an `initialize` call bound to their roles.
///
/// `metadata_program` and `rent_program` always hold the well-known
/// addresses and are never read from the instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRoleSet {
    #[serde(with = "pubkey_string")]
    pub payer: Pubkey,
    #[serde(with = "pubkey_string")]
    pub creator: Pubkey,
    #[serde(with = "pubkey_string")]
    pub global_config: Pubkey,
    #[serde(with = "pubkey_string")]
    pub platform_config: Pubkey,
    #[serde(with = "pubkey_string")]
    pub authority: Pubkey,
    #[serde(with = "pubkey_string")]
    pub pool_state: Pubkey,
    #[serde(with = "pubkey_string")]
    pub base_mint: Pubkey,
    #[serde(with = "pubkey_string")]
    pub quote_mint: Pubkey,
    #[serde(with = "pubkey_string")]
    pub base_vault: Pubkey,
    #[serde(with = "pubkey_string")]
    pub quote_vault: Pubkey,
    #[serde(with = "pubkey_string")]
    pub metadata_account: Pubkey,
    #[serde(with = "pubkey_string")]
    pub base_token_program: Pubkey,
    #[serde(with = "pubkey_string")]
    pub quote_token_program: Pubkey,
    #[serde(with = "pubkey_string")]
    pub metadata_program: Pubkey,
    #[serde(with = "pubkey_string")]
    pub system_program: Pubkey,
    #[serde(with = "pubkey_string")]
    pub rent_program: Pubkey,
    #[serde(with = "pubkey_string")]
    pub event_authority: Pubkey,
    #[serde(with = "pubkey_string")]
    pub program: Pubkey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_config_state: Option<GlobalConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_config_state: Option<PlatformConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_state_data: Option<PoolState>,
}

/// Label every in-range account index with its role name.
///
/// Indices outside the key table are skipped. All positions past the schema
/// share the `"unknown"` key, so the last of them wins.
pub fn resolve_raw_accounts(
    schema: &AccountSchema,
    accounts: &[u8],
    account_keys: &[Pubkey],
) -> BTreeMap<String, String> {
    let mut raw = BTreeMap::new();
    for (position, index) in accounts.iter().enumerate() {
        if let Some(key) = account_keys.get(usize::from(*index)) {
            raw.insert(schema.label(position).to_string(), key.to_string());
        }
    }
    raw
}

/// Bind the instruction's accounts to typed roles. `None` when the
/// instruction carries fewer accounts than the schema or a bound index is
/// outside the key table.
pub fn resolve_role_set(
    schema: &AccountSchema,
    accounts: &[u8],
    account_keys: &[Pubkey],
) -> Option<AccountRoleSet> {
    if accounts.len() < schema.len() {
        return None;
    }
    let key = |role| schema.key_for(role, accounts, account_keys);
    Some(AccountRoleSet {
        payer: key(AccountRole::Payer)?,
        creator: key(AccountRole::Creator)?,
        global_config: key(AccountRole::GlobalConfig)?,
        platform_config: key(AccountRole::PlatformConfig)?,
        authority: key(AccountRole::Authority)?,
        pool_state: key(AccountRole::PoolState)?,
        base_mint: key(AccountRole::BaseMint)?,
        quote_mint: key(AccountRole::QuoteMint)?,
        base_vault: key(AccountRole::BaseVault)?,
        quote_vault: key(AccountRole::QuoteVault)?,
        metadata_account: key(AccountRole::MetadataAccount)?,
        base_token_program: key(AccountRole::BaseTokenProgram)?,
        quote_token_program: key(AccountRole::QuoteTokenProgram)?,
        metadata_program: METADATA_PROGRAM_ID,
        system_program: key(AccountRole::SystemProgram)?,
        rent_program: RENT_SYSVAR_ID,
        event_authority: key(AccountRole::EventAuthority)?,
        program: key(AccountRole::Program)?,
        global_config_state: None,
        platform_config_state: None,
        pool_state_data: None,
    })
}
