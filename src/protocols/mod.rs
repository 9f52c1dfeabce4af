pub mod launchpad;

use sha2::{Digest, Sha256};
use solana_pubkey::{Pubkey, pubkey};
use std::str::FromStr;

use crate::error::Error;

/// Metaplex token metadata program.
pub const METADATA_PROGRAM_ID: Pubkey = pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");
/// Rent sysvar.
pub const RENT_SYSVAR_ID: Pubkey = pubkey!("SysvarRent111111111111111111111111111111111");

pub const DISCRIMINATOR_LEN: usize = 8;

fn sighash(namespace: &str, name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(format!("{namespace}:{name}").as_bytes());
    let hash = hasher.finalize();
    let mut disc = [0u8; DISCRIMINATOR_LEN];
    disc.copy_from_slice(&hash[..DISCRIMINATOR_LEN]);
    disc
}

/// Anchor instruction discriminator: first 8 bytes of `sha256("global:<name>")`.
pub fn instruction_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    sighash("global", name)
}

/// Anchor account discriminator: first 8 bytes of `sha256("account:<Name>")`.
pub fn account_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    sighash("account", name)
}

pub fn parse_pubkey(value: &str) -> Result<Pubkey, Error> {
    Pubkey::from_str(value).map_err(|e| Error::Parse {
        reason: format!("invalid pubkey {value}: {e}"),
    })
}

pub fn parse_discriminator(value: &str) -> Result<[u8; DISCRIMINATOR_LEN], Error> {
    let bytes = hex::decode(value.trim_start_matches("0x")).map_err(|e| Error::Parse {
        reason: format!("invalid discriminator hex {value}: {e}"),
    })?;
    bytes.try_into().map_err(|bytes: Vec<u8>| Error::Parse {
        reason: format!(
            "discriminator must be {DISCRIMINATOR_LEN} bytes, got {}",
            bytes.len()
        ),
    })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;

    #[test]
    fn initialize_discriminator_matches_anchor_sighash() {
        assert_eq!(
            instruction_discriminator("initialize"),
            launchpad::INITIALIZE
        );
    }

    #[test]
    fn account_and_instruction_namespaces_differ() {
        assert_ne!(
            account_discriminator("PoolState"),
            instruction_discriminator("PoolState")
        );
    }

    #[test]
    fn parses_discriminator_with_and_without_prefix() {
        let expected = launchpad::INITIALIZE;
        assert_eq!(parse_discriminator("afaf6d1f0d989bed").unwrap(), expected);
        assert_eq!(parse_discriminator("0xafaf6d1f0d989bed").unwrap(), expected);
    }

    #[test]
    fn rejects_discriminator_of_wrong_length() {
        assert!(parse_discriminator("afaf6d1f").is_err());
        assert!(parse_discriminator("zz").is_err());
    }

    #[test]
    fn well_known_addresses_round_trip() {
        assert_eq!(
            parse_pubkey("SysvarRent111111111111111111111111111111111").unwrap(),
            RENT_SYSVAR_ID
        );
        assert!(parse_pubkey("not-a-key").is_err());
    }
}
