use solana_pubkey::Pubkey;
use tracing::{debug, warn};

use crate::accounts::AccountRoleSet;
use crate::client::LedgerClient;
use crate::error::Error;
use crate::protocols::launchpad::accounts::{
    decode_global_config, decode_platform_config, decode_pool_state,
};
use crate::protocols::launchpad::{
    GLOBAL_CONFIG_ACCOUNT, PLATFORM_CONFIG_ACCOUNT, POOL_STATE_ACCOUNT,
};

/// Fetch and decode the config and pool accounts referenced by `set`.
///
/// Each lookup is independent. A missing account, a fetch error or a decode
/// error leaves that state `None` and is logged.
pub async fn resolve_account_states<C>(client: &C, set: &mut AccountRoleSet)
where
    C: LedgerClient + ?Sized,
{
    set.global_config_state = fetch_state(
        client,
        &set.global_config,
        GLOBAL_CONFIG_ACCOUNT,
        decode_global_config,
    )
    .await;
    set.platform_config_state = fetch_state(
        client,
        &set.platform_config,
        PLATFORM_CONFIG_ACCOUNT,
        decode_platform_config,
    )
    .await;
    set.pool_state_data =
        fetch_state(client, &set.pool_state, POOL_STATE_ACCOUNT, decode_pool_state).await;
}

async fn fetch_state<C, T>(
    client: &C,
    address: &Pubkey,
    account: &'static str,
    decode: fn(&[u8]) -> Result<T, Error>,
) -> Option<T>
where
    C: LedgerClient + ?Sized,
{
    let data = match client.fetch_account_data(address).await {
        Ok(Some(data)) => data,
        Ok(None) => {
            warn!(%address, account, "account not found");
            return None;
        }
        Err(e) => {
            warn!(%address, account, error = %e, "account fetch failed");
            return None;
        }
    };
    match decode(&data) {
        Ok(state) => {
            debug!(%address, account, "account state decoded");
            Some(state)
        }
        Err(e) => {
            warn!(%address, account, error = %e, "account decode failed");
            None
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::accounts::{INITIALIZE_V1, resolve_role_set};
    use crate::config::Commitment;
    use crate::protocols::launchpad::accounts::fixtures::{
        encode, global_config_layout, pool_state_layout,
    };
    use crate::types::FetchedTransaction;

    #[derive(Default)]
    struct AccountStore {
        accounts: HashMap<Pubkey, Vec<u8>>,
        failing: Option<Pubkey>,
        requests: Mutex<Vec<Pubkey>>,
    }

    #[async_trait]
    impl LedgerClient for AccountStore {
        async fn fetch_transaction(
            &self,
            signature: &str,
            _commitment: Commitment,
            _max_supported_transaction_version: Option<u8>,
        ) -> Result<FetchedTransaction, Error> {
            Err(Error::TransactionUnavailable {
                signature: signature.to_string(),
                reason: "not stored".to_string(),
            })
        }

        async fn fetch_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, Error> {
            self.requests.lock().unwrap().push(*address);
            if self.failing == Some(*address) {
                return Err(Error::Rpc {
                    reason: "connection reset".to_string(),
                });
            }
            Ok(self.accounts.get(address).cloned())
        }
    }

    fn role_set() -> AccountRoleSet {
        let keys: Vec<Pubkey> = (0..18u8).map(|i| Pubkey::new_from_array([i + 1; 32])).collect();
        let accounts: Vec<u8> = (0..18).collect();
        resolve_role_set(&INITIALIZE_V1, &accounts, &keys).unwrap()
    }

    #[tokio::test]
    async fn fills_each_decodable_state() {
        let mut set = role_set();
        let mut store = AccountStore::default();
        store.accounts.insert(
            set.global_config,
            encode(GLOBAL_CONFIG_ACCOUNT, &global_config_layout()),
        );
        store
            .accounts
            .insert(set.pool_state, encode(POOL_STATE_ACCOUNT, &pool_state_layout()));

        resolve_account_states(&store, &mut set).await;

        assert_eq!(set.global_config_state.unwrap().trade_fee_rate, 2_500);
        assert!(set.platform_config_state.is_none());
        assert_eq!(set.pool_state_data.unwrap().base_decimals, 6);
        assert_eq!(store.requests.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn failures_leave_states_absent() {
        let mut set = role_set();
        let mut store = AccountStore {
            failing: Some(set.global_config),
            ..AccountStore::default()
        };
        // Pool state bytes under the platform config address decode as the wrong account.
        store.accounts.insert(
            set.platform_config,
            encode(POOL_STATE_ACCOUNT, &pool_state_layout()),
        );
        store.accounts.insert(set.pool_state, vec![0u8; 4]);

        resolve_account_states(&store, &mut set).await;

        assert!(set.global_config_state.is_none());
        assert!(set.platform_config_state.is_none());
        assert!(set.pool_state_data.is_none());
    }
}
