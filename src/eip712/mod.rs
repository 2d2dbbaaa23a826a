//! EIP-712 Safe Transaction Hashing
//!
//! Typed structured data hashing and signing for Safe transactions.
//! The hash binds the transaction to one Safe on one chain:
//!
//! ```text
//! keccak256(0x19 0x01 || domainSeparator(chainId, safe) || hashStruct(SafeTx))
//! ```
//!
//! # Reference
//! - <https://eips.ethereum.org/EIPS/eip-712>
//!
//! # Example
//! ```rust,ignore
//! use safe_batch::eip712::{safe_tx_hash, sign_hash, SafeDomain, SafeTransaction};
//!
//! let domain = SafeDomain::new(chain_id, safe);
//! let hash = safe_tx_hash(&domain, &tx);
//! let signature = sign_hash(&hash, &private_key)?;
//! ```

pub mod types;
pub mod hasher;
pub mod signer;

pub use types::*;
pub use hasher::*;
pub use signer::*;
