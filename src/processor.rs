use std::sync::Arc;

use chrono::DateTime;
use tracing::{debug, info, warn};

use crate::accounts::lookup::resolve_account_states;
use crate::accounts::{AccountSchema, INITIALIZE_V1, resolve_raw_accounts, resolve_role_set};
use crate::client::LedgerClient;
use crate::config::{Commitment, MonitorConfig};
use crate::decoder::{PartialInitializeArgs, decode_initialize_args};
use crate::error::Error;
use crate::matcher::InstructionMatcher;
use crate::protocols::DISCRIMINATOR_LEN;
use crate::types::{CompiledInstruction, FetchedTransaction, InitializeEvent};

/// Turns a signature into an [`InitializeEvent`].
///
/// Only fetching and matching fail the call. Payload decode and account
/// resolution problems are logged and leave the affected fields empty.
pub struct TransactionProcessor<C: ?Sized> {
    client: Arc<C>,
    matcher: InstructionMatcher,
    schema: AccountSchema,
    commitment: Commitment,
    max_supported_transaction_version: Option<u8>,
    resolve_account_states: bool,
}

impl<C: LedgerClient + ?Sized> TransactionProcessor<C> {
    pub fn new(client: Arc<C>, config: &MonitorConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            client,
            matcher: InstructionMatcher::new(
                config.program()?,
                config.instruction_discriminator()?,
            ),
            schema: INITIALIZE_V1,
            commitment: config.commitment,
            max_supported_transaction_version: config.max_supported_transaction_version,
            resolve_account_states: config.resolve_account_states,
        })
    }

    pub fn with_schema(mut self, schema: AccountSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn matcher(&self) -> &InstructionMatcher {
        &self.matcher
    }

    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    pub async fn process(&self, signature: &str) -> Result<InitializeEvent, Error> {
        let transaction = self
            .client
            .fetch_transaction(
                signature,
                self.commitment,
                self.max_supported_transaction_version,
            )
            .await?;

        let Some((index, instruction)) = self.matcher.find_first(&transaction) else {
            return Err(Error::NoMatchingInstruction {
                signature: signature.to_string(),
            });
        };

        info!(
            signature,
            instruction_index = index,
            slot = transaction.slot,
            "initialize instruction matched"
        );
        Ok(self
            .build_event(signature, &transaction, index, instruction)
            .await)
    }

    async fn build_event(
        &self,
        signature: &str,
        transaction: &FetchedTransaction,
        index: usize,
        instruction: &CompiledInstruction,
    ) -> InitializeEvent {
        let payload = instruction.data.get(DISCRIMINATOR_LEN..).unwrap_or_default();
        let args = match decode_initialize_args(payload) {
            Ok(args) => PartialInitializeArgs::from(args),
            Err(partial) => {
                warn!(signature, error = %partial.source, "initialize payload decode failed");
                partial.decoded
            }
        };

        let raw_accounts =
            resolve_raw_accounts(&self.schema, &instruction.accounts, &transaction.account_keys);
        let mut accounts =
            resolve_role_set(&self.schema, &instruction.accounts, &transaction.account_keys);
        match accounts.as_mut() {
            Some(set) if self.resolve_account_states => {
                resolve_account_states(self.client.as_ref(), set).await;
            }
            Some(_) => {}
            None => debug!(
                signature,
                schema = self.schema.name,
                account_count = instruction.accounts.len(),
                "account roles not bound"
            ),
        }

        InitializeEvent {
            signature: signature.to_string(),
            instruction_index: index,
            discriminator: hex::encode(self.matcher.discriminator()),
            data_length: instruction.data.len(),
            account_count: instruction.accounts.len(),
            mint_params: args.mint_params,
            curve_params: args.curve_params,
            vesting_params: args.vesting_params,
            accounts,
            raw_accounts,
            slot: transaction.slot,
            transfer_time: transaction
                .block_time
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        }
    }
}
