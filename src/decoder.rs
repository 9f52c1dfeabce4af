//! Sequential Borsh decoding of the `initialize` payload.
//!
//! Each step is a pure function over an immutable slice returning the decoded
//! record and the bytes left after it. The payload holds `MintParams`,
//! `CurveParams` and `VestingParams` back to back; a failure stops the walk
//! and later records are not attempted.

use borsh::BorshDeserialize;
use tracing::debug;

use crate::error::Error;
use crate::protocols::launchpad::{CurveParams, InitializeArgs, MintParams, VestingParams};

/// Records decoded before a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialInitializeArgs {
    pub mint_params: Option<MintParams>,
    pub curve_params: Option<CurveParams>,
    pub vesting_params: Option<VestingParams>,
}

impl From<InitializeArgs> for PartialInitializeArgs {
    fn from(args: InitializeArgs) -> Self {
        Self {
            mint_params: Some(args.mint_params),
            curve_params: Some(args.curve_params),
            vesting_params: Some(args.vesting_params),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("initialize payload decoded partially: {source}")]
pub struct PartialDecode {
    pub decoded: PartialInitializeArgs,
    #[source]
    pub source: Error,
}

/// Decode one record from the front of `input`.
pub fn decode_record<'a, T: BorshDeserialize>(
    record: &'static str,
    input: &'a [u8],
) -> Result<(T, &'a [u8]), Error> {
    let mut cursor = input;
    let value = T::deserialize(&mut cursor).map_err(|e| Error::Decode {
        record,
        reason: e.to_string(),
    })?;
    Ok((value, cursor))
}

pub fn decode_mint_params(input: &[u8]) -> Result<(MintParams, &[u8]), Error> {
    decode_record("MintParams", input)
}

pub fn decode_curve_params(input: &[u8]) -> Result<(CurveParams, &[u8]), Error> {
    decode_record("CurveParams", input)
}

pub fn decode_vesting_params(input: &[u8]) -> Result<(VestingParams, &[u8]), Error> {
    decode_record("VestingParams", input)
}

/// Decode the argument payload that follows the 8-byte discriminator.
pub fn decode_initialize_args(payload: &[u8]) -> Result<InitializeArgs, PartialDecode> {
    let mut decoded = PartialInitializeArgs::default();
    if payload.is_empty() {
        return Err(PartialDecode {
            decoded,
            source: Error::EmptyPayload,
        });
    }

    let (mint_params, rest) = match decode_mint_params(payload) {
        Ok(step) => step,
        Err(source) => return Err(PartialDecode { decoded, source }),
    };
    decoded.mint_params = Some(mint_params.clone());

    let (curve_params, rest) = match decode_curve_params(rest) {
        Ok(step) => step,
        Err(source) => return Err(PartialDecode { decoded, source }),
    };
    decoded.curve_params = Some(curve_params.clone());

    let (vesting_params, rest) = match decode_vesting_params(rest) {
        Ok(step) => step,
        Err(source) => return Err(PartialDecode { decoded, source }),
    };

    if !rest.is_empty() {
        debug!(trailing = rest.len(), "ignoring bytes after VestingParams");
    }

    Ok(InitializeArgs {
        mint_params,
        curve_params,
        vesting_params,
    })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use crate::protocols::launchpad::{ConstantCurve, LinearCurve};

    fn sample_args() -> InitializeArgs {
        InitializeArgs {
            mint_params: MintParams {
                decimals: 6,
                name: "Bonk Dog".to_string(),
                symbol: "BDOG".to_string(),
                uri: "https://ipfs.io/ipfs/bafkreid".to_string(),
            },
            curve_params: CurveParams::Constant {
                data: ConstantCurve {
                    supply: 1_000_000_000_000_000,
                    total_base_sell: 793_100_000_000_000,
                    total_quote_fund_raising: 85_000_000_000,
                    migrate_type: 1,
                },
            },
            vesting_params: VestingParams {
                total_locked_amount: 0,
                cliff_period: 0,
                unlock_period: 0,
            },
        }
    }

    #[test]
    fn decodes_canonical_payload() {
        let args = sample_args();
        let bytes = borsh::to_vec(&args).unwrap();
        assert_eq!(decode_initialize_args(&bytes).unwrap(), args);
    }

    #[test]
    fn mint_params_read_decimals_first() {
        let bytes = borsh::to_vec(&sample_args()).unwrap();
        assert_eq!(bytes[0], 6);
        assert_eq!(&bytes[1..5], &8u32.to_le_bytes());
        assert_eq!(&bytes[5..13], b"Bonk Dog");
    }

    #[test]
    fn steps_return_the_remaining_input() {
        let bytes = borsh::to_vec(&sample_args()).unwrap();
        let (mint, rest) = decode_mint_params(&bytes).unwrap();
        assert_eq!(mint.symbol, "BDOG");
        let (curve, rest) = decode_curve_params(rest).unwrap();
        assert_eq!(curve.migrate_type(), 1);
        let (vesting, rest) = decode_vesting_params(rest).unwrap();
        assert_eq!(vesting.cliff_period, 0);
        assert!(rest.is_empty());
    }

    #[test]
    fn empty_payload_is_reported_before_any_record() {
        let err = decode_initialize_args(&[]).unwrap_err();
        assert!(matches!(err.source, Error::EmptyPayload));
        assert_eq!(err.decoded, PartialInitializeArgs::default());
    }

    #[test]
    fn buffers_shorter_than_mint_params_yield_no_records() {
        for len in 1..13 {
            for fill in [0x00u8, 0x01, 0xff] {
                let err = decode_initialize_args(&vec![fill; len]).unwrap_err();
                assert!(
                    matches!(err.source, Error::Decode { record: "MintParams", .. }),
                    "len {len} fill {fill}"
                );
                assert_eq!(err.decoded, PartialInitializeArgs::default());
            }
        }
    }

    #[test]
    fn truncated_curve_keeps_mint_params_and_skips_vesting() {
        let bytes = borsh::to_vec(&sample_args()).unwrap();
        let mint_len = borsh::to_vec(&sample_args().mint_params).unwrap().len();
        let err = decode_initialize_args(&bytes[..mint_len + 5]).unwrap_err();
        assert!(matches!(
            err.source,
            Error::Decode {
                record: "CurveParams",
                ..
            }
        ));
        assert_eq!(err.decoded.mint_params, Some(sample_args().mint_params));
        assert!(err.decoded.curve_params.is_none());
        assert!(err.decoded.vesting_params.is_none());
    }

    #[test]
    fn truncated_vesting_keeps_earlier_records() {
        let mut args = sample_args();
        args.curve_params = CurveParams::Linear {
            data: LinearCurve {
                supply: 10,
                total_quote_fund_raising: 20,
                migrate_type: 0,
            },
        };
        let bytes = borsh::to_vec(&args).unwrap();
        let err = decode_initialize_args(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(
            err.source,
            Error::Decode {
                record: "VestingParams",
                ..
            }
        ));
        assert_eq!(err.decoded.curve_params, Some(args.curve_params));
    }

    #[test]
    fn unknown_curve_tag_is_a_decode_error() {
        let args = sample_args();
        let mut bytes = borsh::to_vec(&args.mint_params).unwrap();
        bytes.push(7);
        bytes.extend_from_slice(&[0u8; 32]);
        let err = decode_initialize_args(&bytes).unwrap_err();
        assert!(matches!(
            err.source,
            Error::Decode {
                record: "CurveParams",
                ..
            }
        ));
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let args = sample_args();
        let mut bytes = borsh::to_vec(&args).unwrap();
        bytes.extend_from_slice(&[0xaa; 16]);
        assert_eq!(decode_initialize_args(&bytes).unwrap(), args);
    }
}
