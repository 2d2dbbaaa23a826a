//! Batch Submitter
//!
//! Drives each network through
//! load payload → fetch wallet state → resolve nonce → chunk →
//! (encode → hash → sign → submit)*. A failure stops the remaining chunks
//! of its own network only; later networks still run.

use super::report::*;
use crate::chains::{ChainConfig, ChainRegistry, DEFAULT_SAFE_VERSION};
use crate::eip712::{safe_tx_hash, SafeDomain, SafeTransaction};
use crate::error::{ErrorCode, SubmitError, SubmitResult};
use crate::keystore::SignerKey;
use crate::multisend::{encode_multisend, SubTransaction};
use crate::nonce::{chunk_nonce, resolve, NoncePolicy};
use crate::payload::Payload;
use crate::relay::{ProposalRequest, TransactionService};
use crate::utils::{checksum, to_hex_prefixed};
use crate::{log_debug, log_error, log_info, log_warn};
use ethers_core::types::{Address, H160};
use std::path::PathBuf;

/// Shared wallet used for dry runs with `--test`
pub const SANDBOX_SAFE: Address = H160(SANDBOX_SAFE_BYTES);

/// 0xD7d5AEDb6faf61CD17E395D586a7C9B365e685cD
const SANDBOX_SAFE_BYTES: [u8; 20] = [
    0xd7, 0xd5, 0xae, 0xdb, 0x6f, 0xaf, 0x61, 0xcd, 0x17, 0xe3, 0x95, 0xd5, 0x86, 0xa7, 0xc9, 0xb3,
    0x65, 0xe6, 0x85, 0xcd,
];

/// Per-run submission settings
#[derive(Debug, Clone)]
pub struct SubmitOptions {
    /// Wallet whose state is read and whose domain signs the proposals
    pub safe: Address,
    /// When set, proposals are delivered to this wallet instead
    pub sandbox_safe: Option<Address>,
    pub payload_dir: PathBuf,
    pub chunk_size: usize,
    pub nonce_policy: NoncePolicy,
    /// Batch executor to use regardless of the wallet version
    pub executor_override: Option<Address>,
    /// Free-form label attached to each proposal; not part of the hash
    pub origin: String,
}

impl SubmitOptions {
    pub fn new(safe: Address, payload_dir: impl Into<PathBuf>) -> Self {
        Self {
            safe,
            sandbox_safe: None,
            payload_dir: payload_dir.into(),
            chunk_size: 40,
            nonce_policy: NoncePolicy::Default,
            executor_override: None,
            origin: "gardens-v2 batch upgrade".to_string(),
        }
    }

    /// Wallet proposals are addressed to
    pub fn target_safe(&self) -> Address {
        self.sandbox_safe.unwrap_or(self.safe)
    }
}

/// Wallet state fetched once per network
#[derive(Debug, Clone)]
struct WalletState {
    version: String,
    confirmed: u64,
    pending: Vec<u64>,
}

/// Failure while processing one network, tagged with how to report it
enum Abort {
    Skip(String),
    Unreachable(SubmitError),
    Fail(SubmitError),
}

impl From<SubmitError> for Abort {
    fn from(error: SubmitError) -> Self {
        Abort::Fail(error)
    }
}

/// Orchestrates proposal submission across networks
pub struct BatchSubmitter<S: TransactionService> {
    registry: ChainRegistry,
    service: S,
    options: SubmitOptions,
}

impl<S: TransactionService> BatchSubmitter<S> {
    pub fn new(registry: ChainRegistry, service: S, options: SubmitOptions) -> Self {
        Self {
            registry,
            service,
            options,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Process `networks` in order.
    ///
    /// Per-network failures end up in the report. Only run-scoped errors
    /// (signing) are returned.
    pub fn run<N: AsRef<str>>(&self, networks: &[N], signer: &SignerKey) -> SubmitResult<RunReport> {
        let mut report = RunReport::default();

        log_info!(
            "submitter",
            "starting run",
            safe = checksum(&self.options.safe),
            sender = checksum(&signer.address()),
            networks = networks.len(),
            chunk_size = self.options.chunk_size,
            policy = self.options.nonce_policy,
        );

        for network in networks {
            let network = network.as_ref();
            let mut network_report = NetworkReport::new(network);

            match self.process_network(network, signer, &mut network_report) {
                Ok(()) => {}
                Err(Abort::Skip(reason)) => {
                    log_warn!("submitter", reason.clone());
                    network_report.outcome = NetworkOutcome::PayloadMissing { reason };
                }
                Err(Abort::Unreachable(error)) => {
                    log_error!("submitter", format!("{}: relay unreachable: {}", network, error));
                    network_report.outcome = NetworkOutcome::RelayUnreachable { error };
                }
                Err(Abort::Fail(error)) if error.is_fatal() => return Err(error),
                Err(Abort::Fail(error)) => {
                    log_error!("submitter", error.to_string());
                    network_report.outcome = NetworkOutcome::Failed { error };
                }
            }

            report.networks.push(network_report);
        }

        Ok(report)
    }

    fn process_network(
        &self,
        network: &str,
        signer: &SignerKey,
        report: &mut NetworkReport,
    ) -> Result<(), Abort> {
        let chain = self.registry.chain(network)?;

        let payload = match Payload::load(&self.options.payload_dir, network) {
            Ok(payload) => payload,
            Err(e) if e.code == ErrorCode::Payload => return Err(Abort::Skip(e.message)),
            Err(e) => return Err(Abort::Fail(prefixed(network, e))),
        };

        if payload.chain_id != chain.chain_id {
            return Err(Abort::Fail(SubmitError::configuration(format!(
                "{}: payload chainId {} does not match expected {}",
                network, payload.chain_id, chain.chain_id
            ))));
        }

        let state = self.fetch_wallet_state(chain).map_err(Abort::Unreachable)?;
        let resolution = resolve(self.options.nonce_policy, state.confirmed, &state.pending)
            .map_err(|e| Abort::Fail(prefixed(network, e)))?;
        report.base_nonce = Some(resolution.base_nonce);
        if let Some(notice) = &resolution.notice {
            log_warn!("nonce", format!("{}: {}", network, notice));
            report.notice = Some(notice.clone());
        }

        let executor = self
            .registry
            .executor_for(&state.version, self.options.executor_override);
        let chunks = payload.chunks(self.options.chunk_size);
        let total = chunks.len();

        log_info!(
            "submitter",
            format!("{}: submitting {} transaction(s) in {} part(s)", network, payload.transactions.len(), total),
            version = state.version,
            executor = checksum(&executor),
            base_nonce = resolution.base_nonce,
        );

        for (i, chunk) in chunks.iter().enumerate() {
            let part = i + 1;
            let part_failed = |e: SubmitError| {
                let message = format!("submit failed on part {}/{}: {}", part, total, e.message);
                Abort::Fail(prefixed(network, SubmitError { message, ..e }))
            };

            let nonce = chunk_nonce(resolution.base_nonce, part).map_err(part_failed)?;
            let proposal = self
                .submit_chunk(chain, executor, chunk, nonce, signer)
                .map_err(part_failed)?;

            let submitted = SubmittedProposal {
                part,
                total,
                nonce,
                tracking_url: tracking_url(
                    &chain.short_name,
                    &checksum(&self.options.target_safe()),
                    &proposal.contract_transaction_hash,
                ),
                safe_tx_hash: proposal.contract_transaction_hash,
                sandbox: self.options.sandbox_safe.is_some(),
            };
            println!("{}", submitted.status_line(network));
            println!("{}", submitted.tracking_url);
            report.submitted.push(submitted);
        }

        Ok(())
    }

    /// Confirmed nonce, version and pending queue of the caller's wallet
    fn fetch_wallet_state(&self, chain: &ChainConfig) -> SubmitResult<WalletState> {
        let info = self.service.safe_info(chain, &self.options.safe)?;
        let version = info
            .version
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SAFE_VERSION.to_string());

        let pending: Vec<u64> = if self.options.nonce_policy.needs_pending() {
            self.service
                .pending_transactions(chain, &self.options.safe)?
                .iter()
                .map(|tx| tx.nonce)
                .collect()
        } else {
            Vec::new()
        };

        log_debug!(
            "nonce",
            format!("{}: wallet state", chain.name),
            confirmed = info.nonce,
            pending = pending.len(),
            version = version,
        );

        Ok(WalletState {
            version,
            confirmed: info.nonce,
            pending,
        })
    }

    /// Encode, hash, sign and deliver one chunk
    fn submit_chunk(
        &self,
        chain: &ChainConfig,
        executor: Address,
        chunk: &[SubTransaction],
        nonce: u64,
        signer: &SignerKey,
    ) -> SubmitResult<ProposalRequest> {
        let data = encode_multisend(chunk);
        let tx = SafeTransaction::delegate_batch(executor, data, nonce);
        let domain = SafeDomain::new(chain.chain_id, self.options.safe);
        let hash = safe_tx_hash(&domain, &tx);
        let signature = signer.sign(&hash)?;

        let request = build_request(
            &tx,
            self.options.target_safe(),
            signer.address(),
            &hash,
            &signature.to_hex(),
            &self.options.origin,
        );

        log_debug!(
            "submitter",
            format!("{}: proposing nonce {}", chain.name, nonce),
            transactions = chunk.len(),
            data_len = tx.data.len(),
            safe_tx_hash = request.contract_transaction_hash,
        );

        self.service.propose(chain, &self.options.target_safe(), &request)?;
        Ok(request)
    }
}

/// Prefix an error message with the network it belongs to
fn prefixed(network: &str, error: SubmitError) -> SubmitError {
    SubmitError {
        message: format!("{}: {}", network, error.message),
        ..error
    }
}

/// Relay body for a signed batch transaction
pub fn build_request(
    tx: &SafeTransaction,
    safe: Address,
    sender: Address,
    hash: &[u8; 32],
    signature: &str,
    origin: &str,
) -> ProposalRequest {
    ProposalRequest {
        safe: checksum(&safe),
        to: checksum(&tx.to),
        value: tx.value.to_string(),
        data: to_hex_prefixed(&tx.data),
        operation: tx.operation.code(),
        safe_tx_gas: tx.safe_tx_gas,
        base_gas: tx.base_gas,
        gas_price: tx.gas_price,
        gas_token: checksum(&tx.gas_token),
        refund_receiver: checksum(&tx.refund_receiver),
        nonce: tx.nonce.low_u64(),
        contract_transaction_hash: to_hex_prefixed(hash),
        sender: checksum(&sender),
        signature: signature.to_string(),
        origin: origin.to_string(),
    }
}
