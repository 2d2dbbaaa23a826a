//! Multi-Network Batch Submission
//!
//! Turns per-network payload files into signed batch proposals queued at
//! the Safe Transaction Service.
//!
//! # Example
//! ```rust,ignore
//! use safe_batch::chains::ChainRegistry;
//! use safe_batch::relay::{HttpTransactionService, RelayConfig};
//! use safe_batch::submitter::{BatchSubmitter, SubmitOptions};
//!
//! let service = HttpTransactionService::new(RelayConfig::default())?;
//! let submitter = BatchSubmitter::new(ChainRegistry::mainnets(), service, SubmitOptions::new(safe, "payloads"));
//! let report = submitter.run(&["optimism", "base"], &signer)?;
//! std::process::exit(report.exit_code());
//! ```

pub mod batch;
pub mod report;

pub use batch::*;
pub use report::*;
