//! Run Report
//!
//! What happened on each network, in the order the networks were processed.

use crate::error::SubmitError;
use serde::Serialize;
use std::fmt;

/// Base of the Safe web app link for a queued proposal
pub const TRACKING_BASE_URL: &str = "https://app.safe.global/transactions/tx";

/// One proposal accepted by the relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedProposal {
    /// 1-based chunk index
    pub part: usize,
    pub total: usize,
    pub nonce: u64,
    /// `0x`-prefixed safeTxHash
    pub safe_tx_hash: String,
    pub tracking_url: String,
    pub sandbox: bool,
}

impl SubmittedProposal {
    /// `"<network>: submitted part <i>/<n> (nonce <nonce>)"`
    pub fn status_line(&self, network: &str) -> String {
        let line = format!(
            "{}: submitted part {}/{} (nonce {})",
            network, self.part, self.total, self.nonce
        );
        if self.sandbox {
            format!("{} [test safe]", line)
        } else {
            line
        }
    }
}

/// Safe web app link for a proposal on `safe` (checksummed)
pub fn tracking_url(short_name: &str, safe: &str, safe_tx_hash: &str) -> String {
    format!(
        "{}?safe={}:{}&id=multisig_{}_{}",
        TRACKING_BASE_URL, short_name, safe, safe, safe_tx_hash
    )
}

/// Final state of one network
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NetworkOutcome {
    /// Every chunk was accepted
    Completed,
    /// No payload file, or one with no transactions
    PayloadMissing { reason: String },
    /// Wallet state could not be fetched
    RelayUnreachable { error: SubmitError },
    /// Configuration, encoding or submission failure
    Failed { error: SubmitError },
}

impl NetworkOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            NetworkOutcome::RelayUnreachable { .. } | NetworkOutcome::Failed { .. }
        )
    }
}

impl fmt::Display for NetworkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkOutcome::Completed => write!(f, "completed"),
            NetworkOutcome::PayloadMissing { reason } => write!(f, "skipped ({})", reason),
            NetworkOutcome::RelayUnreachable { error } => write!(f, "relay unreachable: {}", error),
            NetworkOutcome::Failed { error } => write!(f, "failed: {}", error),
        }
    }
}

/// Report for one network
#[derive(Debug, Clone, Serialize)]
pub struct NetworkReport {
    pub network: String,
    pub base_nonce: Option<u64>,
    pub notice: Option<String>,
    pub submitted: Vec<SubmittedProposal>,
    pub outcome: NetworkOutcome,
}

impl NetworkReport {
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            base_nonce: None,
            notice: None,
            submitted: Vec::new(),
            outcome: NetworkOutcome::Completed,
        }
    }

    pub fn nonces(&self) -> Vec<u64> {
        self.submitted.iter().map(|p| p.nonce).collect()
    }
}

/// Report for a whole run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub networks: Vec<NetworkReport>,
}

impl RunReport {
    pub fn network(&self, name: &str) -> Option<&NetworkReport> {
        self.networks.iter().find(|n| n.network == name)
    }

    pub fn submitted_count(&self) -> usize {
        self.networks.iter().map(|n| n.submitted.len()).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &NetworkReport> {
        self.networks.iter().filter(|n| n.outcome.is_failure())
    }

    /// 0 when nothing failed, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.failures().next().is_some() {
            1
        } else {
            0
        }
    }

    /// Log one line per network plus totals
    pub fn log_summary(&self) {
        for network in &self.networks {
            let message = format!("{}: {}", network.network, network.outcome);
            if network.outcome.is_failure() {
                crate::log_error!("submitter", message, submitted = network.submitted.len());
            } else {
                crate::log_info!("submitter", message, submitted = network.submitted.len());
            }
        }
        crate::log_info!(
            "submitter",
            "run finished",
            networks = self.networks.len(),
            proposals = self.submitted_count(),
            failed = self.failures().count(),
        );
    }
}
