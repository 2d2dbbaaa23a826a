//! Network Registry
//!
//! Immutable per-network configuration: relay endpoint, expected chain id
//! and the short prefix the Safe web app uses in links. Also carries the
//! version-keyed table of MultiSendCallOnly deployments.
//!
//! The registry is built once and handed to the submitter, so tests can run
//! against synthetic networks.

use crate::error::{SubmitError, SubmitResult};
use crate::utils::parse_address;
use ethers_core::types::Address;
use std::collections::BTreeMap;
use url::Url;

/// Safe version assumed when the relay does not report one
pub const DEFAULT_SAFE_VERSION: &str = "1.3.0";

/// Configuration for one network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    /// Name used on the command line and in payload file names
    pub name: String,
    /// EIP-155 chain id the payload must declare
    pub chain_id: u64,
    /// Base URL of the transaction service, including the `/api/v1` prefix
    pub service_url: String,
    /// Short identifier (`arb1`, `oeth`, ...) used in tracking links
    pub short_name: String,
}

impl ChainConfig {
    pub fn new(
        name: impl Into<String>,
        chain_id: u64,
        service_url: impl Into<String>,
        short_name: impl Into<String>,
    ) -> SubmitResult<Self> {
        let name = name.into();
        let service_url = service_url.into().trim_end_matches('/').to_string();

        let parsed = Url::parse(&service_url).map_err(|e| {
            SubmitError::configuration(format!("{}: invalid service URL {:?}", name, service_url))
                .with_details(e.to_string())
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SubmitError::configuration(format!(
                "{}: service URL must be http(s), got {}",
                name,
                parsed.scheme()
            )));
        }

        Ok(Self {
            name,
            chain_id,
            service_url,
            short_name: short_name.into(),
        })
    }
}

/// Registry of networks and executor deployments
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: BTreeMap<String, ChainConfig>,
    executors: BTreeMap<String, Address>,
}

impl ChainRegistry {
    /// Build a registry from explicit tables
    pub fn new(
        chains: impl IntoIterator<Item = ChainConfig>,
        executors: impl IntoIterator<Item = (String, Address)>,
    ) -> SubmitResult<Self> {
        let chains: BTreeMap<_, _> = chains.into_iter().map(|c| (c.name.clone(), c)).collect();
        let executors: BTreeMap<_, _> = executors.into_iter().collect();

        if !executors.contains_key(DEFAULT_SAFE_VERSION) {
            return Err(SubmitError::configuration(format!(
                "executor table has no entry for default Safe version {}",
                DEFAULT_SAFE_VERSION
            )));
        }

        Ok(Self { chains, executors })
    }

    /// Production Safe Transaction Service deployments
    pub fn mainnets() -> Self {
        const CHAINS: &[(&str, u64, &str, &str)] = &[
            ("arbitrum", 42161, "https://safe-transaction-arbitrum.safe.global", "arb1"),
            ("optimism", 10, "https://safe-transaction-optimism.safe.global", "oeth"),
            ("polygon", 137, "https://safe-transaction-polygon.safe.global", "matic"),
            ("gnosis", 100, "https://safe-transaction-gnosis-chain.safe.global", "gno"),
            ("base", 8453, "https://safe-transaction-base.safe.global", "base"),
            ("celo", 42220, "https://safe-transaction-celo.safe.global", "celo"),
        ];
        const EXECUTORS: &[(&str, [u8; 20])] = &[
            ("1.3.0", MULTISEND_CALL_ONLY_130),
            ("1.3.1", MULTISEND_CALL_ONLY_130),
            ("1.4.1", MULTISEND_CALL_ONLY_141),
        ];

        let chains = CHAINS.iter().map(|(name, chain_id, url, short)| ChainConfig {
            name: name.to_string(),
            chain_id: *chain_id,
            service_url: format!("{}/api/v1", url),
            short_name: short.to_string(),
        });
        let executors = EXECUTORS
            .iter()
            .map(|(version, bytes)| (version.to_string(), Address::from(*bytes)));

        Self {
            chains: chains.map(|c| (c.name.clone(), c)).collect(),
            executors: executors.collect(),
        }
    }

    /// Add or replace executor table entries
    pub fn with_executors(mut self, entries: impl IntoIterator<Item = (String, Address)>) -> Self {
        self.executors.extend(entries);
        self
    }

    /// Look up a network by name
    pub fn chain(&self, name: &str) -> SubmitResult<&ChainConfig> {
        self.chains.get(name).ok_or_else(|| {
            SubmitError::configuration(format!("{}: no Safe service URL configured", name))
        })
    }

    /// Names of all configured networks, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }

    /// MultiSendCallOnly address for a Safe version.
    ///
    /// An explicit override always wins. Build metadata (`1.3.0+L2`) is
    /// ignored; unknown versions fall back to the 1.3.0 deployment.
    pub fn executor_for(&self, version: &str, override_address: Option<Address>) -> Address {
        if let Some(address) = override_address {
            return address;
        }
        let release = version.split('+').next().unwrap_or(version).trim();
        self.executors
            .get(release)
            .or_else(|| self.executors.get(DEFAULT_SAFE_VERSION))
            .copied()
            .unwrap_or_default()
    }
}

/// Parse an executor table entry given as `version=address`
pub fn parse_executor_entry(entry: &str) -> SubmitResult<(String, Address)> {
    let (version, address) = entry.split_once('=').ok_or_else(|| {
        SubmitError::configuration(format!("expected version=address, got {:?}", entry))
    })?;
    Ok((version.trim().to_string(), parse_address(address)?))
}

/// MultiSendCallOnly 1.3.0 (0x40A2aCCbd92BCA938b02010E17A5b8929b49130D)
const MULTISEND_CALL_ONLY_130: [u8; 20] = [
    0x40, 0xa2, 0xac, 0xcb, 0xd9, 0x2b, 0xca, 0x93, 0x8b, 0x02, 0x01, 0x0e, 0x17, 0xa5, 0xb8, 0x92,
    0x9b, 0x49, 0x13, 0x0d,
];

/// MultiSendCallOnly 1.4.1 (0x9641d764fc13c8B624c04430C7356C1C7C8102e2)
const MULTISEND_CALL_ONLY_141: [u8; 20] = [
    0x96, 0x41, 0xd7, 0x64, 0xfc, 0x13, 0xc8, 0xb6, 0x24, 0xc0, 0x44, 0x30, 0xc7, 0x35, 0x6c, 0x1c,
    0x7c, 0x81, 0x02, 0xe2,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::checksum;

    #[test]
    fn test_mainnet_lookup() {
        let registry = ChainRegistry::mainnets();
        let arbitrum = registry.chain("arbitrum").unwrap();
        assert_eq!(arbitrum.chain_id, 42161);
        assert_eq!(arbitrum.short_name, "arb1");
        assert_eq!(
            arbitrum.service_url,
            "https://safe-transaction-arbitrum.safe.global/api/v1"
        );

        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["arbitrum", "base", "celo", "gnosis", "optimism", "polygon"]);
    }

    #[test]
    fn test_unknown_chain_is_configuration_error() {
        let err = ChainRegistry::mainnets().chain("fantom").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::Configuration);
        assert!(err.message.contains("fantom"));
    }

    #[test]
    fn test_executor_table() {
        let registry = ChainRegistry::mainnets();
        assert_eq!(
            checksum(&registry.executor_for("1.3.0", None)),
            "0x40A2aCCbd92BCA938b02010E17A5b8929b49130D"
        );
        assert_eq!(
            checksum(&registry.executor_for("1.4.1", None)),
            "0x9641d764fc13c8B624c04430C7356C1C7C8102e2"
        );
        // unknown versions use the 1.3.0 deployment
        assert_eq!(
            registry.executor_for("0.9.0", None),
            registry.executor_for("1.3.0", None)
        );

        assert_eq!(
            registry.executor_for("1.4.1+L2", None),
            registry.executor_for("1.4.1", None)
        );

        let manual = Address::repeat_byte(0x11);
        assert_eq!(registry.executor_for("1.4.1", Some(manual)), manual);

        let extended = registry.with_executors(vec![("1.5.0".to_string(), manual)]);
        assert_eq!(extended.executor_for("1.5.0", None), manual);
    }

    #[test]
    fn test_synthetic_registry() {
        let local = ChainConfig::new("devnet", 31337, "http://127.0.0.1:8000/api/v1/", "dev").unwrap();
        assert_eq!(local.service_url, "http://127.0.0.1:8000/api/v1");

        let registry = ChainRegistry::new(
            vec![local],
            vec![parse_executor_entry("1.3.0=0x40A2aCCbd92BCA938b02010E17A5b8929b49130D").unwrap()],
        )
        .unwrap();
        assert!(registry.chain("devnet").is_ok());

        let missing_default =
            ChainRegistry::new(Vec::new(), vec![("1.4.1".to_string(), Address::zero())]);
        assert!(missing_default.is_err());
    }

    #[test]
    fn test_rejects_bad_service_url() {
        assert!(ChainConfig::new("x", 1, "not a url", "x").is_err());
        assert!(ChainConfig::new("x", 1, "ftp://relay.example", "x").is_err());
    }
}
