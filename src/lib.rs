#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

pub mod accounts;
pub mod config;
pub mod decoder;
pub mod error;
pub mod matcher;
pub mod protocols;
pub mod types;

#[cfg(feature = "native")]
pub mod client;
#[cfg(feature = "native")]
pub mod monitor;
#[cfg(feature = "native")]
pub mod processor;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use accounts::{
    AccountRole, AccountRoleSet, AccountSchema, INITIALIZE_V1, resolve_raw_accounts,
    resolve_role_set,
};
pub use config::{Commitment, MonitorConfig};
pub use decoder::{PartialDecode, PartialInitializeArgs, decode_initialize_args};
pub use error::Error;
pub use matcher::InstructionMatcher;
pub use types::{CompiledInstruction, FetchedTransaction, InitializeEvent, LogNotification};

#[cfg(feature = "native")]
pub use client::{LedgerClient, RpcLedgerClient};
#[cfg(feature = "native")]
pub use monitor::{EventReceiver, LogMonitor, MonitorExit, MonitorStats, PublishOutcome};
#[cfg(feature = "native")]
pub use processor::TransactionProcessor;
