//! Ledger access behind a trait, with the Solana JSON-RPC implementation.

use std::str::FromStr;

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcTransactionConfig;
use solana_client::rpc_response::RpcLogsResponse;
use solana_pubkey::Pubkey;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::Signature;
use solana_transaction_status::{
    EncodedConfirmedTransactionWithStatusMeta, UiLoadedAddresses, UiTransactionEncoding,
};

use crate::config::Commitment;
use crate::error::Error;
use crate::protocols::parse_pubkey;
use crate::types::{CompiledInstruction, FetchedTransaction, LogNotification};

#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn fetch_transaction(
        &self,
        signature: &str,
        commitment: Commitment,
        max_supported_transaction_version: Option<u8>,
    ) -> Result<FetchedTransaction, Error>;

    /// Raw account data, `None` when the account does not exist.
    async fn fetch_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, Error>;
}

impl From<Commitment> for CommitmentConfig {
    fn from(commitment: Commitment) -> Self {
        match commitment {
            Commitment::Processed => CommitmentConfig::processed(),
            Commitment::Confirmed => CommitmentConfig::confirmed(),
            Commitment::Finalized => CommitmentConfig::finalized(),
        }
    }
}

impl From<RpcLogsResponse> for LogNotification {
    fn from(response: RpcLogsResponse) -> Self {
        Self {
            signature: response.signature,
            logs: response.logs,
            failed: response.err.is_some(),
        }
    }
}

pub struct RpcLedgerClient {
    rpc: RpcClient,
    commitment: Commitment,
}

impl RpcLedgerClient {
    /// Account reads use `commitment`; transaction reads take theirs per call.
    pub fn new(rpc_url: impl Into<String>, commitment: Commitment) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url.into(), commitment.into()),
            commitment,
        }
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn fetch_transaction(
        &self,
        signature: &str,
        commitment: Commitment,
        max_supported_transaction_version: Option<u8>,
    ) -> Result<FetchedTransaction, Error> {
        let parsed = Signature::from_str(signature).map_err(|e| Error::Parse {
            reason: format!("invalid signature {signature}: {e}"),
        })?;
        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::Base64),
            commitment: Some(commitment.into()),
            max_supported_transaction_version,
        };
        let confirmed = self
            .rpc
            .get_transaction_with_config(&parsed, config)
            .await
            .map_err(|e| Error::TransactionUnavailable {
                signature: signature.to_string(),
                reason: e.to_string(),
            })?;
        flatten_transaction(signature, confirmed)
    }

    async fn fetch_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, Error> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.commitment.into())
            .await
            .map_err(|e| Error::Rpc {
                reason: format!("get_account {address}: {e}"),
            })?;
        Ok(response.value.map(|account| account.data))
    }
}

/// Reduce an RPC transaction to the key table and top-level instructions.
///
/// Keys loaded from address lookup tables follow the static keys, writable
/// before readonly, which is the order compiled account indices refer to.
fn flatten_transaction(
    signature: &str,
    confirmed: EncodedConfirmedTransactionWithStatusMeta,
) -> Result<FetchedTransaction, Error> {
    let unavailable = |reason: &str| Error::TransactionUnavailable {
        signature: signature.to_string(),
        reason: reason.to_string(),
    };
    let with_meta = confirmed.transaction;
    let transaction = with_meta
        .transaction
        .decode()
        .ok_or_else(|| unavailable("transaction body could not be decoded"))?;

    let mut account_keys = transaction.message.static_account_keys().to_vec();
    if let Some(meta) = &with_meta.meta {
        let loaded: Option<UiLoadedAddresses> = meta.loaded_addresses.clone().into();
        if let Some(loaded) = loaded {
            for address in loaded.writable.iter().chain(&loaded.readonly) {
                account_keys.push(parse_pubkey(address)?);
            }
        }
    }

    let instructions = transaction
        .message
        .instructions()
        .iter()
        .map(|ix| CompiledInstruction {
            program_id_index: ix.program_id_index,
            accounts: ix.accounts.clone(),
            data: ix.data.clone(),
        })
        .collect();

    Ok(FetchedTransaction {
        slot: confirmed.slot,
        block_time: confirmed.block_time,
        account_keys,
        instructions,
    })
}
