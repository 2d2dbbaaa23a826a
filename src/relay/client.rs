//! Transaction Service Client
//!
//! Blocking HTTP access to the Safe Transaction Service, behind the
//! [`TransactionService`] trait so the submitter can be driven by a
//! scripted relay in tests.

use super::types::*;
use crate::chains::ChainConfig;
use crate::error::{SubmitError, SubmitResult};
use crate::utils::checksum;
use ethers_core::types::Address;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use std::time::Duration;

/// Most recent pending proposals considered for nonce reconciliation
pub const PENDING_LIMIT: u32 = 50;

/// Status codes the service uses to accept a proposal
const ACCEPTED: [StatusCode; 3] = [StatusCode::OK, StatusCode::CREATED, StatusCode::ACCEPTED];

/// The three relay operations the submitter needs
pub trait TransactionService {
    /// Confirmed nonce and version of a Safe
    fn safe_info(&self, chain: &ChainConfig, safe: &Address) -> SubmitResult<SafeInfo>;

    /// Not-yet-executed proposals, highest nonce first, at most [`PENDING_LIMIT`]
    fn pending_transactions(
        &self,
        chain: &ChainConfig,
        safe: &Address,
    ) -> SubmitResult<Vec<PendingTransaction>>;

    /// Submit one signed proposal for `safe`
    fn propose(
        &self,
        chain: &ChainConfig,
        safe: &Address,
        request: &ProposalRequest,
    ) -> SubmitResult<()>;
}

/// Timeouts for relay calls
#[derive(Debug, Clone, Copy)]
pub struct RelayConfig {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub submit_timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            submit_timeout: Duration::from_secs(60),
        }
    }
}

/// reqwest-backed [`TransactionService`]
pub struct HttpTransactionService {
    client: Client,
    config: RelayConfig,
}

impl HttpTransactionService {
    pub fn new(config: RelayConfig) -> SubmitResult<Self> {
        let client = Client::builder()
            .timeout(config.read_timeout)
            .connect_timeout(config.connect_timeout)
            .tcp_nodelay(true)
            .user_agent(concat!("safe-batch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SubmitError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn safe_url(chain: &ChainConfig, safe: &Address) -> String {
        format!("{}/safes/{}/", chain.service_url, checksum(safe))
    }

    fn transactions_url(chain: &ChainConfig, safe: &Address) -> String {
        format!("{}multisig-transactions/", Self::safe_url(chain, safe))
    }

    /// Turn a non-success status into an error carrying the body
    fn check_status(response: Response, context: &str) -> SubmitResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(SubmitError::network(format!("{} failed: {}", context, status.as_u16()))
            .with_details(body))
    }
}

impl TransactionService for HttpTransactionService {
    fn safe_info(&self, chain: &ChainConfig, safe: &Address) -> SubmitResult<SafeInfo> {
        let response = self.client.get(Self::safe_url(chain, safe)).send()?;
        let response = Self::check_status(response, "Safe info request")?;
        Ok(response.json()?)
    }

    fn pending_transactions(
        &self,
        chain: &ChainConfig,
        safe: &Address,
    ) -> SubmitResult<Vec<PendingTransaction>> {
        let limit = PENDING_LIMIT.to_string();
        let response = self
            .client
            .get(Self::transactions_url(chain, safe))
            .query(&[
                ("executed", "false"),
                ("ordering", "-nonce"),
                ("limit", limit.as_str()),
            ])
            .send()?;
        let response = Self::check_status(response, "Pending transactions request")?;
        let page: Page<PendingTransaction> = response.json()?;
        Ok(page.results)
    }

    fn propose(
        &self,
        chain: &ChainConfig,
        safe: &Address,
        request: &ProposalRequest,
    ) -> SubmitResult<()> {
        let response = self
            .client
            .post(Self::transactions_url(chain, safe))
            .timeout(self.config.submit_timeout)
            .json(request)
            .send()?;

        let status = response.status();
        if ACCEPTED.contains(&status) {
            return Ok(());
        }

        let body = response.text().unwrap_or_default();
        Err(SubmitError::rejected(format!("{}: {}", status.as_u16(), body.trim())))
    }
}
