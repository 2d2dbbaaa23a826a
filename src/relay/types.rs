//! Transaction Service Types
//!
//! Request and response bodies of the Safe Transaction Service endpoints
//! this crate consumes.

use ethers_core::types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// `GET /safes/{safe}/`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SafeInfo {
    #[serde(deserialize_with = "de_u64_lenient")]
    pub nonce: u64,
    #[serde(default)]
    pub version: Option<String>,
}

/// One not-yet-executed proposal
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PendingTransaction {
    #[serde(deserialize_with = "de_u64_lenient")]
    pub nonce: u64,
}

/// Paginated list wrapper
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// `POST /safes/{safe}/multisig-transactions/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRequest {
    pub safe: String,
    pub to: String,
    /// Decimal string
    pub value: String,
    pub data: String,
    pub operation: u8,
    #[serde(serialize_with = "ser_u256_number")]
    pub safe_tx_gas: U256,
    #[serde(serialize_with = "ser_u256_number")]
    pub base_gas: U256,
    #[serde(serialize_with = "ser_u256_number")]
    pub gas_price: U256,
    pub gas_token: String,
    pub refund_receiver: String,
    pub nonce: u64,
    pub contract_transaction_hash: String,
    pub sender: String,
    pub signature: String,
    pub origin: String,
}

/// The service has reported nonces both as numbers and as strings
fn de_u64_lenient<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(u64),
        Str(String),
    }

    match NumOrString::deserialize(deserializer)? {
        NumOrString::Num(n) => Ok(n),
        NumOrString::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Integers that fit in u64 go out as JSON numbers, larger ones as decimal strings
fn ser_u256_number<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if *value <= U256::from(u64::MAX) {
        serializer.serialize_u64(value.as_u64())
    } else {
        serializer.serialize_str(&value.to_string())
    }
}
