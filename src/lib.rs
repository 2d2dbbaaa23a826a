//! Safe Batch Core Library
//!
//! Prepares, signs and queues batched Safe multisig proposals on several
//! networks at once.
//!
//! # Architecture
//!
//! This crate provides:
//! - **chains**: Network registry and MultiSendCallOnly deployments
//! - **multisend**: Packing sub-transactions into one `multiSend(bytes)` call
//! - **payload**: Per-network payload files and chunking
//! - **eip712**: SafeTx hashing, signing and signer recovery
//! - **nonce**: Starting nonce resolution against the pending queue
//! - **relay**: Safe Transaction Service client
//! - **submitter**: Per-network orchestration and run report
//! - **keystore**: Decrypted proposer key, zeroized on drop
//! - **config**: Command line parsing
//!
//! # Security
//!
//! The proposer key is decrypted once per run and held in a `zeroize`
//! buffer. Log fields that look like key material are redacted.
//!
//! # Example
//!
//! ```rust,ignore
//! use safe_batch::{BatchSubmitter, ChainRegistry, HttpTransactionService, RelayConfig, SignerKey, SubmitOptions};
//!
//! let signer = SignerKey::load(&keystore, "SAFE_KEYSTORE_PASSWORD")?;
//! let service = HttpTransactionService::new(RelayConfig::default())?;
//! let submitter = BatchSubmitter::new(ChainRegistry::mainnets(), service, SubmitOptions::new(safe, "payloads"));
//! let report = submitter.run(&["optimism"], &signer)?;
//! ```

pub mod error;
pub mod utils;
pub mod chains;
pub mod multisend;
pub mod payload;
pub mod eip712;
pub mod nonce;
pub mod relay;
pub mod keystore;
pub mod submitter;
pub mod config;

// Re-export key types for convenience
pub use error::{ErrorCode, SubmitError, SubmitResult};
pub use chains::{ChainConfig, ChainRegistry};
pub use keystore::SignerKey;
pub use nonce::NoncePolicy;
pub use relay::{HttpTransactionService, RelayConfig, TransactionService};
pub use submitter::{BatchSubmitter, RunReport, SubmitOptions};
