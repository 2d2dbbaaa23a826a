//! EIP-712 Type Definitions
//!
//! The Safe transaction struct, its signing domain and signature container.

use crate::multisend::Operation;
use ethers_core::types::{Address, U256};
use zeroize::Zeroize;

/// Literal EIP-712 type of a Safe transaction
pub const SAFE_TX_TYPE: &str = "SafeTx(address to,uint256 value,bytes data,uint8 operation,\
uint256 safeTxGas,uint256 baseGas,uint256 gasPrice,address gasToken,\
address refundReceiver,uint256 nonce)";

/// Literal EIP-712 domain type used by Safe >= 1.3.0
pub const SAFE_DOMAIN_TYPE: &str = "EIP712Domain(uint256 chainId,address verifyingContract)";

/// A Safe transaction as hashed by `Safe.getTransactionHash`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeTransaction {
    pub to: Address,
    pub value: U256,
    pub data: Vec<u8>,
    pub operation: Operation,
    pub safe_tx_gas: U256,
    pub base_gas: U256,
    pub gas_price: U256,
    pub gas_token: Address,
    pub refund_receiver: Address,
    pub nonce: U256,
}

impl SafeTransaction {
    /// Delegatecall into a batch executor with no value and no gas refund.
    pub fn delegate_batch(executor: Address, data: Vec<u8>, nonce: u64) -> Self {
        Self {
            to: executor,
            value: U256::zero(),
            data,
            operation: Operation::DelegateCall,
            safe_tx_gas: U256::zero(),
            base_gas: U256::zero(),
            gas_price: U256::zero(),
            gas_token: Address::zero(),
            refund_receiver: Address::zero(),
            nonce: U256::from(nonce),
        }
    }
}

/// Signing domain: one Safe on one chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeDomain {
    /// The EIP-155 chain ID
    pub chain_id: u64,
    /// The Safe contract that will verify the signature
    pub verifying_contract: Address,
}

impl SafeDomain {
    pub fn new(chain_id: u64, verifying_contract: Address) -> Self {
        Self {
            chain_id,
            verifying_contract,
        }
    }

    /// Get the chain ID as a big-endian 32-byte array
    pub fn chain_id_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&self.chain_id.to_be_bytes());
        bytes
    }
}

/// EIP-712 signature components
#[derive(Debug, Clone, Zeroize)]
#[zeroize(drop)]
pub struct Eip712Signature {
    /// r component (32 bytes)
    pub r: [u8; 32],
    /// s component (32 bytes)
    pub s: [u8; 32],
    /// v component (recovery id + 27)
    pub v: u8,
}

impl Eip712Signature {
    /// Create from raw components
    pub fn new(r: [u8; 32], s: [u8; 32], v: u8) -> Self {
        Self { r, s, v }
    }

    /// Create from 65-byte signature (r || s || v)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Eip712Error> {
        if bytes.len() != 65 {
            return Err(Eip712Error::InvalidSignature("expected 65 bytes".to_string()));
        }

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[0..32]);
        s.copy_from_slice(&bytes[32..64]);
        let v = bytes[64];

        Ok(Self { r, s, v })
    }

    /// Convert to 65-byte representation (r || s || v)
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[0..32].copy_from_slice(&self.r);
        bytes[32..64].copy_from_slice(&self.s);
        bytes[64] = self.v;
        bytes
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

/// Errors that can occur during EIP-712 operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum Eip712Error {
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Signing error: {0}")]
    SigningError(String),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),
}

impl From<Eip712Error> for crate::error::SubmitError {
    fn from(e: Eip712Error) -> Self {
        crate::error::SubmitError::signing(e.to_string())
    }
}
