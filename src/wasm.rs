use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::accounts::INITIALIZE_V1;
use crate::decoder::{PartialInitializeArgs, decode_initialize_args};
use crate::protocols::launchpad::{self, CurveParams, MintParams, VestingParams};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DecodedInitialize {
    mint_params: Option<MintParams>,
    curve_params: Option<CurveParams>,
    vesting_params: Option<VestingParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).unwrap_or(JsValue::NULL)
}

fn error_result(msg: &str) -> JsValue {
    to_js(&serde_json::json!({ "error": msg }))
}

/// Whether raw instruction data starts with the `initialize` discriminator.
#[wasm_bindgen]
pub fn is_initialize_data(data: &[u8]) -> bool {
    data.starts_with(&launchpad::INITIALIZE)
}

/// Decode raw `initialize` instruction data, discriminator included.
///
/// A payload that fails part way returns the records read so far plus an
/// `error` field.
#[wasm_bindgen]
pub fn decode_initialize_data(data: &[u8]) -> JsValue {
    let Some(payload) = data.strip_prefix(&launchpad::INITIALIZE) else {
        return error_result("Not an initialize instruction");
    };
    let (args, error) = match decode_initialize_args(payload) {
        Ok(args) => (PartialInitializeArgs::from(args), None),
        Err(partial) => (partial.decoded, Some(partial.source.to_string())),
    };
    to_js(&DecodedInitialize {
        mint_params: args.mint_params,
        curve_params: args.curve_params,
        vesting_params: args.vesting_params,
        error,
    })
}

/// Role names of the `initialize` account list, in instruction order.
#[wasm_bindgen]
pub fn account_role_names() -> JsValue {
    let names: Vec<&str> = (0..INITIALIZE_V1.len())
        .map(|position| INITIALIZE_V1.label(position))
        .collect();
    to_js(&names)
}
