//! Command Line Configuration
//!
//! Parses arguments with clap and folds them into a validated [`RunConfig`].

use crate::chains::parse_executor_entry;
use crate::error::{SubmitError, SubmitResult};
use crate::nonce::NoncePolicy;
use crate::submitter::{SubmitOptions, SANDBOX_SAFE};
use crate::utils::parse_address;
use clap::Parser;
use ethers_core::types::Address;
use std::path::PathBuf;

/// Networks processed when `--chains` is not given
pub const DEFAULT_CHAINS: &str = "arbitrum,optimism,polygon,gnosis,base,celo";

#[derive(Debug, Clone, Parser)]
#[command(name = "safe-batch")]
#[command(about = "Propose batched Safe transactions on several networks", long_about = None)]
pub struct Cli {
    /// Safe wallet address
    #[arg(long)]
    pub safe: String,

    /// Web3 Secret Storage key file of the proposer
    #[arg(long)]
    pub keystore: PathBuf,

    /// Environment variable holding the key file password
    #[arg(long, default_value = "SAFE_KEYSTORE_PASSWORD")]
    pub password_env: String,

    /// Directory containing <network>-payload.json files
    #[arg(long, default_value = ".")]
    pub payload_dir: PathBuf,

    /// Comma separated networks, processed in order
    #[arg(long, default_value = DEFAULT_CHAINS)]
    pub chains: String,

    /// Sub-transactions per proposal
    #[arg(long, env = "CHUNK_SIZE", default_value_t = 40)]
    pub chunk_size: usize,

    /// Nonce of the first proposal on every network
    #[arg(long)]
    pub start_nonce: Option<u64>,

    /// MultiSendCallOnly address, overriding the version table
    #[arg(long)]
    pub multisend_call_only: Option<String>,

    /// Extra executor table entries as version=address
    #[arg(long = "executor", value_name = "VERSION=ADDRESS")]
    pub executors: Vec<String>,

    /// Label shown next to the proposals in the Safe web app
    #[arg(long, default_value = "gardens-v2 batch upgrade")]
    pub origin: String,

    /// Start at the confirmed nonce, replacing pending proposals
    #[arg(long, conflicts_with = "skip_pending")]
    pub force: bool,

    /// Start after the highest pending proposal
    #[arg(long)]
    pub skip_pending: bool,

    /// Deliver proposals to the shared test Safe
    #[arg(long)]
    pub test: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Validated settings for one invocation
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub networks: Vec<String>,
    pub keystore: PathBuf,
    pub password_env: String,
    pub executors: Vec<(String, Address)>,
    pub verbose: bool,
    pub options: SubmitOptions,
}

impl RunConfig {
    pub fn from_cli(cli: Cli) -> SubmitResult<Self> {
        let safe = parse_address(&cli.safe)
            .map_err(|e| SubmitError::configuration(format!("invalid --safe: {}", e.message)))?;

        if cli.chunk_size == 0 {
            return Err(SubmitError::configuration("--chunk-size must be at least 1"));
        }

        let networks = parse_chain_list(&cli.chains);
        if networks.is_empty() {
            return Err(SubmitError::configuration("--chains names no networks"));
        }

        let executor_override = cli
            .multisend_call_only
            .as_deref()
            .map(parse_address)
            .transpose()
            .map_err(|e| {
                SubmitError::configuration(format!("invalid --multisend-call-only: {}", e.message))
            })?;

        let executors = cli
            .executors
            .iter()
            .map(|entry| parse_executor_entry(entry))
            .collect::<SubmitResult<Vec<_>>>()?;

        let nonce_policy = nonce_policy(cli.start_nonce, cli.force, cli.skip_pending)?;

        let options = SubmitOptions {
            safe,
            sandbox_safe: cli.test.then_some(SANDBOX_SAFE),
            payload_dir: cli.payload_dir,
            chunk_size: cli.chunk_size,
            nonce_policy,
            executor_override,
            origin: cli.origin,
        };

        Ok(Self {
            networks,
            keystore: cli.keystore,
            password_env: cli.password_env,
            executors,
            verbose: cli.verbose,
            options,
        })
    }
}

/// Split a comma separated network list, dropping blanks
pub fn parse_chain_list(chains: &str) -> Vec<String> {
    chains
        .split(',')
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect()
}

/// Fold the nonce flags into one policy; an explicit start nonce wins
pub fn nonce_policy(start_nonce: Option<u64>, force: bool, skip_pending: bool) -> SubmitResult<NoncePolicy> {
    match (start_nonce, force, skip_pending) {
        (_, true, true) => Err(SubmitError::configuration(
            "--force and --skip-pending are mutually exclusive",
        )),
        (Some(n), _, _) => Ok(NoncePolicy::Explicit(n)),
        (None, true, false) => Ok(NoncePolicy::Force),
        (None, false, true) => Ok(NoncePolicy::SkipPending),
        (None, false, false) => Ok(NoncePolicy::Default),
    }
}
