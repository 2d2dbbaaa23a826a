//! EIP-712 Hashing
//!
//! Domain separator and struct hashing for Safe transactions. Every word
//! is 32 bytes big-endian; addresses are left-padded from 20 bytes.

use super::types::*;
use crate::utils::keccak256;
use ethers_core::types::{Address, U256};

/// Magic prefix for EIP-712 encoding
const EIP712_PREFIX: &[u8] = b"\x19\x01";

/// keccak256 of [`SAFE_TX_TYPE`]
pub fn safe_tx_typehash() -> [u8; 32] {
    keccak256(SAFE_TX_TYPE.as_bytes())
}

/// keccak256 of [`SAFE_DOMAIN_TYPE`]
pub fn domain_typehash() -> [u8; 32] {
    keccak256(SAFE_DOMAIN_TYPE.as_bytes())
}

fn address_word(address: &Address) -> [u8; 32] {
    let mut padded = [0u8; 32];
    padded[12..].copy_from_slice(address.as_bytes());
    padded
}

fn uint_word(value: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

/// Calculate the domain separator hash
///
/// domainSeparator = keccak256(typeHash || chainId || verifyingContract)
pub fn domain_separator(domain: &SafeDomain) -> [u8; 32] {
    let mut encoded = Vec::with_capacity(3 * 32);
    encoded.extend_from_slice(&domain_typehash());
    encoded.extend_from_slice(&domain.chain_id_bytes());
    encoded.extend_from_slice(&address_word(&domain.verifying_contract));
    keccak256(&encoded)
}

/// Hash a Safe transaction struct
///
/// hashStruct(tx) = keccak256(typeHash || encodeData(tx)), with `data`
/// replaced by its own keccak256.
pub fn hash_struct(tx: &SafeTransaction) -> [u8; 32] {
    let mut encoded = Vec::with_capacity(11 * 32);
    encoded.extend_from_slice(&safe_tx_typehash());
    encoded.extend_from_slice(&address_word(&tx.to));
    encoded.extend_from_slice(&uint_word(tx.value));
    encoded.extend_from_slice(&keccak256(&tx.data));
    encoded.extend_from_slice(&uint_word(U256::from(tx.operation.code())));
    encoded.extend_from_slice(&uint_word(tx.safe_tx_gas));
    encoded.extend_from_slice(&uint_word(tx.base_gas));
    encoded.extend_from_slice(&uint_word(tx.gas_price));
    encoded.extend_from_slice(&address_word(&tx.gas_token));
    encoded.extend_from_slice(&address_word(&tx.refund_receiver));
    encoded.extend_from_slice(&uint_word(tx.nonce));
    keccak256(&encoded)
}

/// Calculate the final EIP-712 hash for signing
///
/// hash = keccak256("\x19\x01" || domainSeparator || hashStruct(tx))
pub fn safe_tx_hash(domain: &SafeDomain, tx: &SafeTransaction) -> [u8; 32] {
    get_pre_image(domain, tx).final_hash
}

/// Get the pre-image components (for external signing)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eip712PreImage {
    pub domain_separator: [u8; 32],
    pub struct_hash: [u8; 32],
    pub final_hash: [u8; 32],
}

/// Calculate the pre-image components for EIP-712
pub fn get_pre_image(domain: &SafeDomain, tx: &SafeTransaction) -> Eip712PreImage {
    let domain_separator = domain_separator(domain);
    let struct_hash = hash_struct(tx);

    let mut data = Vec::with_capacity(2 + 32 + 32);
    data.extend_from_slice(EIP712_PREFIX);
    data.extend_from_slice(&domain_separator);
    data.extend_from_slice(&struct_hash);
    let final_hash = keccak256(&data);

    Eip712PreImage {
        domain_separator,
        struct_hash,
        final_hash,
    }
}
