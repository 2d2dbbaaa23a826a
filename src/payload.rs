//! Transaction Builder Payloads
//!
//! One JSON file per network, `<dir>/<network>-payload.json`:
//!
//! ```json
//! { "chainId": 10, "transactions": [ { "to": "0x..", "value": "0", "data": "0x", "operation": 0 } ] }
//! ```
//!
//! Every entry is validated up front, so a malformed batch fails before the
//! relay is contacted.

use crate::error::{SubmitError, SubmitResult};
use crate::multisend::{RawTransaction, SubTransaction};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPayload {
    chain_id: serde_json::Value,
    #[serde(default)]
    transactions: Vec<RawTransaction>,
}

/// Parsed payload for one network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub chain_id: u64,
    pub transactions: Vec<SubTransaction>,
}

impl Payload {
    /// Parse and validate payload JSON
    pub fn from_json(json: &str) -> SubmitResult<Self> {
        let raw: RawPayload = serde_json::from_str(json)
            .map_err(|e| SubmitError::parse(format!("invalid payload JSON: {}", e)))?;

        let chain_id = raw
            .chain_id
            .as_u64()
            .or_else(|| raw.chain_id.as_str().and_then(|s| s.trim().parse().ok()))
            .ok_or_else(|| SubmitError::parse(format!("invalid chainId {}", raw.chain_id)))?;

        let transactions = raw
            .transactions
            .iter()
            .enumerate()
            .map(|(i, tx)| {
                SubTransaction::from_raw(tx).map_err(|e| {
                    SubmitError::from(e).with_details(format!("transaction #{}", i + 1))
                })
            })
            .collect::<SubmitResult<Vec<_>>>()?;

        Ok(Self {
            chain_id,
            transactions,
        })
    }

    /// Load the payload for `network` from `dir`.
    ///
    /// A missing file or an empty transaction list is a `Payload` error;
    /// malformed JSON is a `Parse` error and malformed entries are
    /// `Encoding` errors.
    pub fn load(dir: &Path, network: &str) -> SubmitResult<Self> {
        let path = payload_path(dir, network);
        if !path.exists() {
            return Err(SubmitError::payload(format!(
                "{}: missing payload {}",
                network,
                path.display()
            )));
        }

        let json = fs::read_to_string(&path).map_err(|e| {
            SubmitError::internal(format!("{}: cannot read {}", network, path.display()))
                .with_details(e.to_string())
        })?;
        let payload = Self::from_json(&json)?;

        if payload.transactions.is_empty() {
            return Err(SubmitError::payload(format!(
                "{}: payload has no transactions",
                network
            )));
        }

        Ok(payload)
    }

    /// Split into contiguous chunks of at most `size` transactions
    pub fn chunks(&self, size: usize) -> Vec<&[SubTransaction]> {
        chunk_transactions(&self.transactions, size)
    }
}

/// Where the payload for `network` lives
pub fn payload_path(dir: &Path, network: &str) -> PathBuf {
    dir.join(format!("{}-payload.json", network))
}

/// Contiguous groups of `size`; the last one may be shorter. `size` of 0 is treated as 1.
pub fn chunk_transactions(transactions: &[SubTransaction], size: usize) -> Vec<&[SubTransaction]> {
    transactions.chunks(size.max(1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use ethers_core::types::Address;

    fn sample(n: usize) -> Vec<SubTransaction> {
        (0..n)
            .map(|i| SubTransaction::call(Address::from_low_u64_be(i as u64 + 1)))
            .collect()
    }

    #[test]
    fn test_chunk_sizes() {
        let txs = sample(97);
        let sizes: Vec<_> = chunk_transactions(&txs, 40).iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![40, 40, 17]);

        let exact = sample(80);
        assert_eq!(chunk_transactions(&exact, 40).len(), 2);
        assert_eq!(chunk_transactions(&sample(3), 0).len(), 3);
    }

    #[test]
    fn test_chunks_preserve_order() {
        let txs = sample(5);
        let flattened: Vec<_> = chunk_transactions(&txs, 2).concat();
        assert_eq!(flattened, txs);
    }

    #[test]
    fn test_from_json() {
        let payload = Payload::from_json(
            r#"{"chainId": 10, "transactions": [
                {"to": "0xAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAa", "value": "0", "data": "0x", "operation": 0}
            ]}"#,
        )
        .unwrap();
        assert_eq!(payload.chain_id, 10);
        assert_eq!(payload.transactions.len(), 1);

        let string_id = Payload::from_json(r#"{"chainId": "42161", "transactions": []}"#).unwrap();
        assert_eq!(string_id.chain_id, 42161);
    }

    #[test]
    fn test_from_json_reports_bad_entry() {
        let err = Payload::from_json(
            r#"{"chainId": 10, "transactions": [
                {"to": "0xAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAa"},
                {"to": "0x1234", "data": "0x"}
            ]}"#,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::Encoding);
        assert_eq!(err.details.as_deref(), Some("transaction #2"));
    }

    #[test]
    fn test_from_json_rejects_malformed_document() {
        let err = Payload::from_json("{\"chainId\": 10, \"transactions\": [").unwrap_err();
        assert_eq!(err.code, ErrorCode::Parse);

        let err = Payload::from_json(r#"{"chainId": "ten", "transactions": []}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::Parse);
    }

    #[test]
    fn test_load_missing_and_empty() {
        let dir = tempfile::tempdir().unwrap();

        let missing = Payload::load(dir.path(), "base").unwrap_err();
        assert_eq!(missing.code, ErrorCode::Payload);
        assert!(missing.message.contains("missing payload"));

        fs::write(
            payload_path(dir.path(), "base"),
            r#"{"chainId": 8453, "transactions": []}"#,
        )
        .unwrap();
        let empty = Payload::load(dir.path(), "base").unwrap_err();
        assert_eq!(empty.code, ErrorCode::Payload);
        assert!(empty.message.contains("no transactions"));
    }
}
