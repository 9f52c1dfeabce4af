use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Base mint metadata supplied to `initialize`.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct MintParams {
    pub decimals: u8,
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct ConstantCurve {
    pub supply: u64,
    pub total_base_sell: u64,
    pub total_quote_fund_raising: u64,
    pub migrate_type: u8,
}

#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct FixedCurve {
    pub supply: u64,
    pub total_quote_fund_raising: u64,
    pub migrate_type: u8,
}

#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct LinearCurve {
    pub supply: u64,
    pub total_quote_fund_raising: u64,
    pub migrate_type: u8,
}

/// Bonding curve configuration. The Borsh tag byte selects the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum CurveParams {
    Constant { data: ConstantCurve },
    Fixed { data: FixedCurve },
    Linear { data: LinearCurve },
}

impl CurveParams {
    pub fn supply(&self) -> u64 {
        match self {
            Self::Constant { data } => data.supply,
            Self::Fixed { data } => data.supply,
            Self::Linear { data } => data.supply,
        }
    }

    pub fn total_quote_fund_raising(&self) -> u64 {
        match self {
            Self::Constant { data } => data.total_quote_fund_raising,
            Self::Fixed { data } => data.total_quote_fund_raising,
            Self::Linear { data } => data.total_quote_fund_raising,
        }
    }

    pub fn migrate_type(&self) -> u8 {
        match self {
            Self::Constant { data } => data.migrate_type,
            Self::Fixed { data } => data.migrate_type,
            Self::Linear { data } => data.migrate_type,
        }
    }
}

#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct VestingParams {
    pub total_locked_amount: u64,
    pub cliff_period: u64,
    pub unlock_period: u64,
}

/// The three argument records of `initialize`, in wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct InitializeArgs {
    pub mint_params: MintParams,
    pub curve_params: CurveParams,
    pub vesting_params: VestingParams,
}
