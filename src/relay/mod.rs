//! Safe Transaction Service Relay
//!
//! The off-chain service that queues proposals until owners confirm them.
//! Only three endpoints are used:
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET | `/safes/{safe}/` | confirmed nonce, version |
//! | GET | `/safes/{safe}/multisig-transactions/` | pending proposals |
//! | POST | `/safes/{safe}/multisig-transactions/` | submit a proposal |

pub mod types;
pub mod client;

pub use types::*;
pub use client::*;
