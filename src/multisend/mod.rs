//! Multisend Batching
//!
//! Deterministic packing of sub-transactions into one `multiSend(bytes)`
//! call, as executed by the MultiSendCallOnly helper contract through a
//! Safe delegatecall.
//!
//! # Example
//! ```rust,ignore
//! use safe_batch::multisend::{encode_multisend_hex, SubTransaction};
//!
//! let data = encode_multisend_hex(&[SubTransaction::call(target)]);
//! ```

pub mod types;
pub mod encoder;

pub use types::*;
pub use encoder::*;
