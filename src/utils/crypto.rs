//! Crypto and hex helpers
//!
//! Keccak hashing, EIP-55 checksums and the strict hex parsing shared by
//! the multisend encoder, the typed-data hasher and the relay client.

use crate::error::{SubmitError, SubmitResult};
use ethers_core::types::Address;
use tiny_keccak::{Hasher, Keccak};

/// Keccak256 hash (used for Ethereum addresses)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// Convert raw address bytes to checksummed Ethereum address
pub fn to_checksum_address(address: &[u8]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut result = String::from("0x");
    for (i, ch) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };

        if ch.is_ascii_digit() {
            result.push(ch);
        } else if nibble >= 8 {
            result.push(ch.to_ascii_uppercase());
        } else {
            result.push(ch);
        }
    }

    result
}

/// Checksummed form of a typed address
pub fn checksum(address: &Address) -> String {
    to_checksum_address(address.as_bytes())
}

/// Decode a hex string with or without `0x` prefix.
///
/// Odd-length input is rejected rather than left-padded.
pub fn decode_hex(value: &str) -> SubmitResult<Vec<u8>> {
    let trimmed = value.trim();
    let stripped = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if stripped.len() % 2 != 0 {
        return Err(SubmitError::encoding(format!(
            "odd-length hex string ({} digits)",
            stripped.len()
        )));
    }

    hex::decode(stripped).map_err(|e| SubmitError::encoding(format!("invalid hex: {}", e)))
}

/// Parse a 20-byte address. Mixed case is accepted without checksum validation.
pub fn parse_address(value: &str) -> SubmitResult<Address> {
    let bytes = decode_hex(value)
        .map_err(|e| SubmitError::encoding(format!("invalid address {:?}", value)).with_details(e.message))?;

    if bytes.len() != 20 {
        return Err(SubmitError::encoding(format!(
            "invalid address {:?}: expected 20 bytes, got {}",
            value,
            bytes.len()
        )));
    }

    Ok(Address::from_slice(&bytes))
}

/// `0x`-prefixed lowercase hex
pub fn to_hex_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
