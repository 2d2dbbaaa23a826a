//! Multisend Encoding
//!
//! Packs sub-transactions the way MultiSendCallOnly unpacks them:
//!
//! ```text
//! operation (1) | to (20) | value (32, BE) | data length (32, BE) | data
//! ```
//!
//! repeated with no padding or separators, then wraps the blob as the single
//! `bytes` argument of `multiSend(bytes)`.

use super::types::*;
use crate::utils::keccak256;
use ethers_core::types::{Address, U256};

/// Function whose selector prefixes the call data
pub const MULTISEND_SIGNATURE: &str = "multiSend(bytes)";

/// Fixed per-entry header: operation + address + value + length
pub const ENTRY_HEADER_LEN: usize = 1 + 20 + 32 + 32;

/// 4-byte selector of `multiSend(bytes)` (0x8d80ff0a)
pub fn multisend_selector() -> [u8; 4] {
    let hash = keccak256(MULTISEND_SIGNATURE.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

fn u256_word(value: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

/// Pack transactions into the raw multisend blob
pub fn pack_transactions(transactions: &[SubTransaction]) -> Vec<u8> {
    let total: usize = transactions.iter().map(SubTransaction::packed_len).sum();
    let mut packed = Vec::with_capacity(total);

    for tx in transactions {
        packed.push(tx.operation.code());
        packed.extend_from_slice(tx.to.as_bytes());
        packed.extend_from_slice(&u256_word(tx.value));
        packed.extend_from_slice(&u256_word(U256::from(tx.data.len())));
        packed.extend_from_slice(&tx.data);
    }

    packed
}

/// Full call data for `multiSend(bytes)`
pub fn encode_multisend(transactions: &[SubTransaction]) -> Vec<u8> {
    let packed = pack_transactions(transactions);
    let padded_len = packed.len().div_ceil(32) * 32;

    let mut call = Vec::with_capacity(4 + 32 + 32 + padded_len);
    call.extend_from_slice(&multisend_selector());
    // single dynamic argument: head is the offset of its tail
    call.extend_from_slice(&u256_word(U256::from(32u64)));
    call.extend_from_slice(&u256_word(U256::from(packed.len())));
    call.extend_from_slice(&packed);
    call.resize(4 + 64 + padded_len, 0);

    call
}

/// Call data as `0x`-prefixed hex
pub fn encode_multisend_hex(transactions: &[SubTransaction]) -> String {
    format!("0x{}", hex::encode(encode_multisend(transactions)))
}

fn read_word(data: &[u8], offset: usize, what: &str) -> Result<U256, MultisendError> {
    let end = offset
        .checked_add(32)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| MultisendError::Truncated(format!("{} at byte {}", what, offset)))?;
    Ok(U256::from_big_endian(&data[offset..end]))
}

fn word_to_usize(word: U256, what: &str) -> Result<usize, MultisendError> {
    if word > U256::from(usize::MAX) {
        return Err(MultisendError::Truncated(format!("{} out of range", what)));
    }
    Ok(word.as_usize())
}

/// Reverse of [`pack_transactions`]
pub fn unpack_transactions(packed: &[u8]) -> Result<Vec<SubTransaction>, MultisendError> {
    let mut transactions = Vec::new();
    let mut offset = 0usize;

    while offset < packed.len() {
        if packed.len() - offset < ENTRY_HEADER_LEN {
            return Err(MultisendError::Truncated(format!(
                "entry header at byte {}",
                offset
            )));
        }

        let operation = Operation::from_code(packed[offset])?;
        let to = Address::from_slice(&packed[offset + 1..offset + 21]);
        let value = read_word(packed, offset + 21, "value")?;
        let data_len = word_to_usize(read_word(packed, offset + 53, "data length")?, "data length")?;

        let data_start = offset + ENTRY_HEADER_LEN;
        let data_end = data_start
            .checked_add(data_len)
            .filter(|end| *end <= packed.len())
            .ok_or_else(|| MultisendError::Truncated(format!("call data at byte {}", data_start)))?;

        transactions.push(SubTransaction {
            to,
            value,
            data: packed[data_start..data_end].to_vec(),
            operation,
        });
        offset = data_end;
    }

    Ok(transactions)
}

/// Reverse of [`encode_multisend`]
pub fn decode_multisend(call_data: &[u8]) -> Result<Vec<SubTransaction>, MultisendError> {
    if call_data.len() < 4 {
        return Err(MultisendError::Truncated("selector".to_string()));
    }
    let (selector, args) = call_data.split_at(4);
    if selector != multisend_selector() {
        return Err(MultisendError::UnexpectedSelector(hex::encode(selector)));
    }

    let offset = word_to_usize(read_word(args, 0, "bytes offset")?, "bytes offset")?;
    let len = word_to_usize(read_word(args, offset, "bytes length")?, "bytes length")?;
    let start = offset + 32;
    let end = start
        .checked_add(len)
        .filter(|end| *end <= args.len())
        .ok_or_else(|| MultisendError::Truncated("packed transactions".to_string()))?;

    unpack_transactions(&args[start..end])
}
