#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("parse error: {reason}")]
    Parse { reason: String },

    #[error("protocol error: {reason}")]
    Protocol { reason: String },

    #[error("instruction payload is empty")]
    EmptyPayload,

    #[error("failed to decode {record}: {reason}")]
    Decode { record: &'static str, reason: String },

    #[error("rpc error: {reason}")]
    Rpc { reason: String },

    #[error("subscription error: {reason}")]
    Subscription { reason: String },

    #[error("transaction {signature} unavailable: {reason}")]
    TransactionUnavailable { signature: String, reason: String },

    #[error("no matching instruction in transaction {signature}")]
    NoMatchingInstruction { signature: String },

    #[error("config error: {reason}")]
    Config { reason: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Structural mismatches are "not applicable" rather than failures.
    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Self::NoMatchingInstruction { .. })
    }
}
