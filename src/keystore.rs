//! Signer Key Store
//!
//! The proposer key is decrypted once per run from a Web3 Secret Storage
//! file and held in a zeroize-on-drop buffer until the run ends. It is
//! never written anywhere.

use crate::eip712::{address_from_secret, sign_hash, Eip712Signature};
use crate::error::{SubmitError, SubmitResult};
use ethers_core::types::Address;
use ethers_signers::LocalWallet;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::path::Path;
use zeroize::{Zeroize, Zeroizing};

/// Decrypted signing key and the address it controls
pub struct SignerKey {
    secret: Zeroizing<[u8; 32]>,
    address: Address,
}

impl SignerKey {
    /// Decrypt `path` with the password held in the environment variable `password_env`.
    pub fn load(path: &Path, password_env: &str) -> SubmitResult<Self> {
        let password = std::env::var(password_env).map(SecretString::from).map_err(|_| {
            SubmitError::keystore(format!(
                "password environment variable {} is not set",
                password_env
            ))
        })?;
        Self::decrypt(path, &password)
    }

    /// Decrypt a key file with an explicit password
    pub fn decrypt(path: &Path, password: &SecretString) -> SubmitResult<Self> {
        if !path.exists() {
            return Err(SubmitError::keystore(format!(
                "key file {} does not exist",
                path.display()
            )));
        }

        let wallet = LocalWallet::decrypt_keystore(path, password.expose_secret().as_bytes())
            .map_err(|e| {
                SubmitError::keystore(format!("cannot decrypt {}", path.display()))
                    .with_details(e.to_string())
            })?;

        let mut bytes = wallet.signer().to_bytes();
        let key = Self::from_secret_bytes(bytes.as_slice());
        bytes.as_mut_slice().zeroize();
        key
    }

    /// Wrap raw key bytes
    pub fn from_secret_bytes(bytes: &[u8]) -> SubmitResult<Self> {
        if bytes.len() != 32 {
            return Err(SubmitError::keystore(format!(
                "expected a 32-byte secret key, got {} bytes",
                bytes.len()
            )));
        }
        let mut secret = Zeroizing::new([0u8; 32]);
        secret.copy_from_slice(bytes);

        let address = address_from_secret(secret.as_slice())
            .map_err(|e| SubmitError::keystore(e.to_string()))?;

        Ok(Self { secret, address })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a 32-byte digest
    pub fn sign(&self, hash: &[u8; 32]) -> SubmitResult<Eip712Signature> {
        Ok(sign_hash(hash, self.secret.as_slice())?)
    }
}

impl fmt::Debug for SignerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerKey")
            .field("address", &self.address)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eip712::recover_address;
    use crate::error::ErrorCode;
    use ethers_signers::Signer;

    // Hardhat account #0 (DO NOT USE IN PRODUCTION)
    const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn write_keystore(dir: &Path, password: &str) -> std::path::PathBuf {
        let key = hex::decode(TEST_KEY).unwrap();
        let (wallet, _) = LocalWallet::encrypt_keystore(
            dir,
            &mut rand::thread_rng(),
            &key,
            password,
            Some("signer.json"),
        )
        .unwrap();
        assert_eq!(
            crate::utils::checksum(&wallet.address()),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
        dir.join("signer.json")
    }

    #[test]
    fn test_decrypt_keystore() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_keystore(dir.path(), "correct horse");

        let key = SignerKey::decrypt(&path, &SecretString::from("correct horse".to_string())).unwrap();
        assert_eq!(
            crate::utils::checksum(&key.address()),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn test_wrong_password() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_keystore(dir.path(), "correct horse");

        let err = SignerKey::decrypt(&path, &SecretString::from("battery".to_string())).unwrap_err();
        assert_eq!(err.code, ErrorCode::KeyStore);
        assert!(err.is_fatal());
    }

    #[test]
    fn test_missing_password_variable() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_keystore(dir.path(), "pw");

        let err = SignerKey::load(&path, "SAFE_BATCH_TEST_UNSET_PASSWORD_VAR").unwrap_err();
        assert_eq!(err.code, ErrorCode::KeyStore);
        assert!(err.message.contains("SAFE_BATCH_TEST_UNSET_PASSWORD_VAR"));
    }

    #[test]
    fn test_missing_key_file() {
        let err = SignerKey::decrypt(
            Path::new("/nonexistent/signer.json"),
            &SecretString::from("pw".to_string()),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::KeyStore);
    }

    #[test]
    fn test_sign_recovers_address() {
        let key = SignerKey::from_secret_bytes(&hex::decode(TEST_KEY).unwrap()).unwrap();
        let hash = [0x5au8; 32];
        let signature = key.sign(&hash).unwrap();
        assert_eq!(recover_address(&hash, &signature).unwrap(), key.address());
    }

    #[test]
    fn test_debug_hides_secret() {
        let key = SignerKey::from_secret_bytes(&hex::decode(TEST_KEY).unwrap()).unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("ac0974"));
        assert!(SignerKey::from_secret_bytes(&[1u8; 16]).is_err());
    }
}
