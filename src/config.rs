use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use solana_pubkey::Pubkey;

use crate::error::Error;
use crate::protocols::{DISCRIMINATOR_LEN, launchpad, parse_discriminator, parse_pubkey};

/// Ledger finality requested when fetching transactions and accounts.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

/// Monitor settings, loadable from TOML. Every field has a default so an
/// empty file watches Raydium Launchpad `initialize` calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// Watched program, base58.
    pub program_id: String,
    /// Watched instruction discriminator, 16 hex digits.
    pub discriminator: String,
    pub commitment: Commitment,
    pub max_supported_transaction_version: Option<u8>,
    /// How long a publish may wait for the consumer before the event is dropped.
    pub publish_timeout_ms: u64,
    /// A notification is fetched only if some log line contains one of these.
    pub prefilter_keywords: Vec<String>,
    /// Drop notifications for transactions that failed on chain before the
    /// prefilter. Off by default.
    pub skip_failed_transactions: bool,
    /// Fetch and decode the config and pool accounts of each event.
    pub resolve_account_states: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            program_id: launchpad::PROGRAM_ID.to_string(),
            discriminator: hex::encode(launchpad::INITIALIZE),
            commitment: Commitment::Confirmed,
            max_supported_transaction_version: Some(0),
            publish_timeout_ms: 3_000,
            prefilter_keywords: vec!["create".to_string()],
            skip_failed_transactions: false,
            resolve_account_states: true,
        }
    }
}

impl MonitorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
            reason: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(text).map_err(|e| Error::Config {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.program()?;
        self.instruction_discriminator()?;
        if self.publish_timeout_ms == 0 {
            return Err(Error::Config {
                reason: "publish_timeout_ms must be positive".to_string(),
            });
        }
        if self.prefilter_keywords.iter().any(String::is_empty) {
            return Err(Error::Config {
                reason: "prefilter keywords must not be empty strings".to_string(),
            });
        }
        Ok(())
    }

    pub fn program(&self) -> Result<Pubkey, Error> {
        parse_pubkey(&self.program_id)
    }

    pub fn instruction_discriminator(&self) -> Result<[u8; DISCRIMINATOR_LEN], Error> {
        parse_discriminator(&self.discriminator)
    }

    pub fn publish_timeout(&self) -> Duration {
        Duration::from_millis(self.publish_timeout_ms)
    }
}
