use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solana_pubkey::Pubkey;

use crate::accounts::AccountRoleSet;
use crate::error::Error;
use crate::protocols::launchpad::{CurveParams, MintParams, VestingParams};

/// One `logsSubscribe` notification for a transaction that mentions the
/// watched program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogNotification {
    /// Transaction signature (base58).
    pub signature: String,
    /// Program log lines in emission order.
    pub logs: Vec<String>,
    /// Whether the transaction failed on chain.
    pub failed: bool,
}

/// A compiled instruction as it appears in a transaction message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledInstruction {
    /// Index of the invoked program in the account-key table.
    pub program_id_index: u8,
    /// Ordered indices into the account-key table.
    pub accounts: Vec<u8>,
    /// Raw instruction data, discriminator included.
    pub data: Vec<u8>,
}

/// The parts of a fetched transaction the processor reads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchedTransaction {
    pub slot: u64,
    /// Unix timestamp in seconds, when the node reports one.
    pub block_time: Option<i64>,
    /// Static keys followed by lookup-table loaded keys (writable, then readonly).
    pub account_keys: Vec<Pubkey>,
    /// Top-level instructions in execution order.
    pub instructions: Vec<CompiledInstruction>,
}

/// A decoded `initialize` call, the unit published by the monitor.
///
/// Payload records and the role set are optional: a payload that stops
/// decoding part way still yields an event with the records read before the
/// failure, and instructions with fewer accounts than the schema carry only
/// `raw_accounts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializeEvent {
    /// Transaction signature (base58).
    pub signature: String,
    /// Position of the matched instruction within the transaction.
    pub instruction_index: usize,
    /// Hex-encoded 8-byte instruction discriminator.
    pub discriminator: String,
    /// Instruction data length in bytes, discriminator included.
    pub data_length: usize,
    /// Number of account indices the instruction references.
    pub account_count: usize,
    pub mint_params: Option<MintParams>,
    pub curve_params: Option<CurveParams>,
    pub vesting_params: Option<VestingParams>,
    /// Role-bound accounts, present when the instruction carries the full schema.
    pub accounts: Option<AccountRoleSet>,
    /// Role name to base58 address for every account index in range.
    pub raw_accounts: BTreeMap<String, String>,
    pub slot: u64,
    /// Block time of the transaction.
    pub transfer_time: Option<DateTime<Utc>>,
}

impl InitializeEvent {
    /// Base mint of the new pool, when the role set was bound.
    pub fn base_mint(&self) -> Option<Pubkey> {
        self.accounts.as_ref().map(|accounts| accounts.base_mint)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Serialize a [`Pubkey`] as its base58 string.
pub mod pubkey_string {
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer, Serializer};
    use solana_pubkey::Pubkey;

    pub fn serialize<S: Serializer>(key: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(key)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Pubkey, D::Error> {
        let value = String::deserialize(deserializer)?;
        Pubkey::from_str(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "pubkey_string")]
        key: Pubkey,
    }

    #[test]
    fn pubkeys_serialize_as_base58() {
        let wrapper = Wrapper {
            key: crate::protocols::RENT_SYSVAR_ID,
        };
        let json = serde_json::to_string(&wrapper).unwrap();
        assert_eq!(
            json,
            r#"{"key":"SysvarRent111111111111111111111111111111111"}"#
        );
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.key, wrapper.key);
    }

    #[test]
    fn rejects_malformed_base58() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"key":"0OIl"}"#).is_err());
    }
}
