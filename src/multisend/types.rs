//! Multisend Type Definitions
//!
//! Sub-transactions as read from a Transaction Builder payload.

use crate::error::{ErrorCode, SubmitError};
use crate::utils::{checksum, decode_hex};
use ethers_core::types::{Address, U256};
use serde::{Deserialize, Serialize};

/// How the Safe dispatches a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operation {
    #[default]
    Call,
    DelegateCall,
}

impl Operation {
    pub fn code(&self) -> u8 {
        match self {
            Operation::Call => 0,
            Operation::DelegateCall => 1,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, MultisendError> {
        match code {
            0 => Ok(Operation::Call),
            1 => Ok(Operation::DelegateCall),
            other => Err(MultisendError::UnknownOperation(other as u64)),
        }
    }
}

/// One entry of a multisend batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTransaction {
    pub to: Address,
    pub value: U256,
    pub data: Vec<u8>,
    pub operation: Operation,
}

impl SubTransaction {
    /// Plain call with no value and no data
    pub fn call(to: Address) -> Self {
        Self {
            to,
            value: U256::zero(),
            data: Vec::new(),
            operation: Operation::Call,
        }
    }

    /// Packed length: 85-byte header plus call data
    pub fn packed_len(&self) -> usize {
        super::encoder::ENTRY_HEADER_LEN + self.data.len()
    }

    /// Build from the loosely typed JSON form
    pub fn from_raw(raw: &RawTransaction) -> Result<Self, MultisendError> {
        let to_bytes = decode_hex(&raw.to)
            .map_err(|e| MultisendError::InvalidAddress(format!("{} ({})", raw.to, e.message)))?;
        if to_bytes.len() != 20 {
            return Err(MultisendError::InvalidAddress(format!(
                "{}: expected 20 bytes, got {}",
                raw.to,
                to_bytes.len()
            )));
        }

        let value = match &raw.value {
            None => U256::zero(),
            Some(v) => parse_value(v)?,
        };

        let data = match raw.data.as_deref() {
            None => Vec::new(),
            Some(hex_str) => decode_hex(hex_str).map_err(|e| MultisendError::InvalidData(e.message))?,
        };

        let operation = match &raw.operation {
            None | Some(serde_json::Value::Null) => Operation::Call,
            Some(v) => {
                let code = v
                    .as_u64()
                    .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
                    .ok_or_else(|| MultisendError::InvalidOperation(v.to_string()))?;
                if code > u8::MAX as u64 {
                    return Err(MultisendError::UnknownOperation(code));
                }
                Operation::from_code(code as u8)?
            }
        };

        Ok(Self {
            to: Address::from_slice(&to_bytes),
            value,
            data,
            operation,
        })
    }
}

/// Transaction entry exactly as it appears in the payload file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTransaction {
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<serde_json::Value>,
}

impl From<&SubTransaction> for RawTransaction {
    fn from(tx: &SubTransaction) -> Self {
        Self {
            to: checksum(&tx.to),
            value: Some(serde_json::Value::String(tx.value.to_string())),
            data: Some(format!("0x{}", hex::encode(&tx.data))),
            operation: Some(serde_json::Value::from(tx.operation.code())),
        }
    }
}

/// Value fields are decimal strings; bare JSON integers are accepted too
fn parse_value(value: &serde_json::Value) -> Result<U256, MultisendError> {
    match value {
        serde_json::Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(U256::zero());
            }
            U256::from_dec_str(s).map_err(|_| MultisendError::InvalidValue(s.to_string()))
        }
        serde_json::Value::Number(n) => n
            .as_u64()
            .map(U256::from)
            .ok_or_else(|| MultisendError::InvalidValue(n.to_string())),
        other => Err(MultisendError::InvalidValue(other.to_string())),
    }
}

/// Errors raised while building or unpacking a batch
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MultisendError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid call data: {0}")]
    InvalidData(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Unknown operation code: {0}")]
    UnknownOperation(u64),

    #[error("Unexpected selector: 0x{0}")]
    UnexpectedSelector(String),

    #[error("Truncated input: {0}")]
    Truncated(String),
}

impl From<MultisendError> for SubmitError {
    fn from(e: MultisendError) -> Self {
        SubmitError::new(ErrorCode::Encoding, e.to_string())
    }
}
