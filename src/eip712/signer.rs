//! EIP-712 Signing
//!
//! ECDSA signing and verification of Safe transaction hashes.

use super::hasher::safe_tx_hash;
use super::types::*;
use crate::utils::keccak256;
use ethers_core::types::Address;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

/// Sign a Safe transaction for its domain
pub fn sign_safe_transaction(
    domain: &SafeDomain,
    tx: &SafeTransaction,
    private_key: &[u8],
) -> Result<Eip712Signature, Eip712Error> {
    let hash = safe_tx_hash(domain, tx);
    sign_hash(&hash, private_key)
}

/// Sign a pre-computed hash
pub fn sign_hash(hash: &[u8; 32], private_key: &[u8]) -> Result<Eip712Signature, Eip712Error> {
    if private_key.len() != 32 {
        return Err(Eip712Error::InvalidKey(format!(
            "invalid private key length: expected 32, got {}",
            private_key.len()
        )));
    }

    let secp = Secp256k1::new();

    let secret_key = SecretKey::from_slice(private_key)
        .map_err(|e| Eip712Error::InvalidKey(e.to_string()))?;

    let message = Message::from_digest_slice(hash)
        .map_err(|e| Eip712Error::SigningError(e.to_string()))?;

    let (recovery_id, signature) = secp
        .sign_ecdsa_recoverable(&message, &secret_key)
        .serialize_compact();

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&signature[0..32]);
    s.copy_from_slice(&signature[32..64]);

    // v is recovery_id + 27; Safe treats 27/28 as a plain ECDSA signature
    let v = recovery_id.to_i32() as u8 + 27;

    Ok(Eip712Signature::new(r, s, v))
}

/// Verify a signature against a hash and expected address
pub fn verify_signature(
    hash: &[u8; 32],
    signature: &Eip712Signature,
    expected: &Address,
) -> Result<bool, Eip712Error> {
    Ok(recover_address(hash, signature)? == *expected)
}

/// Recover the signer's address from a signature
pub fn recover_address(hash: &[u8; 32], signature: &Eip712Signature) -> Result<Address, Eip712Error> {
    let secp = Secp256k1::new();

    if signature.v < 27 {
        return Err(Eip712Error::InvalidSignature(format!("unexpected v {}", signature.v)));
    }
    let recovery_id = secp256k1::ecdsa::RecoveryId::from_i32((signature.v - 27) as i32)
        .map_err(|e| Eip712Error::InvalidSignature(e.to_string()))?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[0..32].copy_from_slice(&signature.r);
    sig_bytes[32..64].copy_from_slice(&signature.s);

    let recoverable_sig =
        secp256k1::ecdsa::RecoverableSignature::from_compact(&sig_bytes, recovery_id)
            .map_err(|e| Eip712Error::InvalidSignature(e.to_string()))?;

    let message = Message::from_digest_slice(hash)
        .map_err(|e| Eip712Error::SigningError(e.to_string()))?;

    let public_key = secp
        .recover_ecdsa(&message, &recoverable_sig)
        .map_err(|e| Eip712Error::InvalidSignature(e.to_string()))?;

    Ok(public_key_to_address(&public_key))
}

/// Address controlled by a 32-byte secret key
pub fn address_from_secret(private_key: &[u8]) -> Result<Address, Eip712Error> {
    let secret_key = SecretKey::from_slice(private_key)
        .map_err(|e| Eip712Error::InvalidKey(e.to_string()))?;
    let public_key = PublicKey::from_secret_key(&Secp256k1::signing_only(), &secret_key);
    Ok(public_key_to_address(&public_key))
}

/// Convert a secp256k1 public key to an Ethereum address
fn public_key_to_address(public_key: &PublicKey) -> Address {
    // uncompressed key without the 0x04 tag
    let pubkey_bytes = public_key.serialize_uncompressed();
    let hash = keccak256(&pubkey_bytes[1..]);
    Address::from_slice(&hash[12..32])
}
