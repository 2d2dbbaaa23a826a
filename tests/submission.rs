use ethers_core::types::Address;
use safe_batch::relay::{PendingTransaction, ProposalRequest, SafeInfo};
use safe_batch::submitter::NetworkOutcome;
use safe_batch::utils::parse_address;
use safe_batch::{
    BatchSubmitter, ChainConfig, ChainRegistry, SignerKey, SubmitError, SubmitOptions,
    SubmitResult, TransactionService,
};
use std::cell::RefCell;
use std::path::Path;

/// Relay that accepts everything except one network's second proposal
struct FlakyRelay {
    failing_network: &'static str,
    proposals: RefCell<Vec<(String, ProposalRequest)>>,
}

impl TransactionService for FlakyRelay {
    fn safe_info(&self, _chain: &ChainConfig, _safe: &Address) -> SubmitResult<SafeInfo> {
        Ok(SafeInfo {
            nonce: 7,
            version: Some("1.3.0".to_string()),
        })
    }

    fn pending_transactions(
        &self,
        _chain: &ChainConfig,
        _safe: &Address,
    ) -> SubmitResult<Vec<PendingTransaction>> {
        Ok(Vec::new())
    }

    fn propose(
        &self,
        chain: &ChainConfig,
        _safe: &Address,
        request: &ProposalRequest,
    ) -> SubmitResult<()> {
        let mut proposals = self.proposals.borrow_mut();
        proposals.push((chain.name.clone(), request.clone()));
        let sent = proposals.iter().filter(|(n, _)| *n == chain.name).count();
        if chain.name == self.failing_network && sent == 2 {
            return Err(SubmitError::rejected("500: upstream error"));
        }
        Ok(())
    }
}

fn registry() -> ChainRegistry {
    ChainRegistry::new(
        vec![
            ChainConfig::new("optimism", 10, "http://relay.test/optimism/api/v1", "oeth").unwrap(),
            ChainConfig::new("base", 8453, "http://relay.test/base/api/v1", "base").unwrap(),
        ],
        vec![(
            "1.3.0".to_string(),
            parse_address("0x40A2aCCbd92BCA938b02010E17A5b8929b49130D").unwrap(),
        )],
    )
    .unwrap()
}

fn write_payload(dir: &Path, network: &str, chain_id: u64, count: usize) {
    let transactions: Vec<_> = (0..count)
        .map(|_| serde_json::json!({ "to": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa" }))
        .collect();
    let body = serde_json::json!({ "chainId": chain_id, "transactions": transactions });
    std::fs::write(dir.join(format!("{}-payload.json", network)), body.to_string()).unwrap();
}

#[test]
fn single_transaction_matches_known_hash() {
    let dir = tempfile::tempdir().unwrap();
    write_payload(dir.path(), "optimism", 10, 1);

    let safe = parse_address("0xD7d5AEDb6faf61CD17E395D586a7C9B365e685cD").unwrap();
    let relay = FlakyRelay {
        failing_network: "none",
        proposals: RefCell::new(Vec::new()),
    };
    let submitter = BatchSubmitter::new(registry(), relay, SubmitOptions::new(safe, dir.path()));
    let signer = SignerKey::from_secret_bytes(&[0x42u8; 32]).unwrap();

    let report = submitter.run(&["optimism"], &signer).unwrap();
    assert_eq!(report.exit_code(), 0);

    let proposals = submitter.service().proposals.borrow();
    assert_eq!(proposals.len(), 1);
    let request = &proposals[0].1;
    assert_eq!(request.nonce, 7);
    // one empty call to 0xaa..aa through MultiSendCallOnly 1.3.0 on Optimism at nonce 7
    assert_eq!(
        request.contract_transaction_hash,
        "0x5a9fc49d44bf692247aa0f5aa0b2cf544b2e284c8076054d47256394757da063"
    );
}

#[test]
fn rejected_chunk_isolated_to_its_network() {
    let dir = tempfile::tempdir().unwrap();
    write_payload(dir.path(), "optimism", 10, 5);
    write_payload(dir.path(), "base", 8453, 5);

    let relay = FlakyRelay {
        failing_network: "optimism",
        proposals: RefCell::new(Vec::new()),
    };
    let mut options = SubmitOptions::new(Address::repeat_byte(0x12), dir.path());
    options.chunk_size = 2;
    let submitter = BatchSubmitter::new(registry(), relay, options);
    let signer = SignerKey::from_secret_bytes(&[0x42u8; 32]).unwrap();

    let report = submitter.run(&["optimism", "base"], &signer).unwrap();

    let optimism = report.network("optimism").unwrap();
    assert_eq!(optimism.nonces(), vec![7]);
    assert!(matches!(optimism.outcome, NetworkOutcome::Failed { .. }));

    let base = report.network("base").unwrap();
    assert_eq!(base.nonces(), vec![7, 8, 9]);
    assert!(matches!(base.outcome, NetworkOutcome::Completed));

    let attempted: Vec<_> = submitter
        .service()
        .proposals
        .borrow()
        .iter()
        .map(|(network, request)| (network.clone(), request.nonce))
        .collect();
    assert_eq!(
        attempted,
        vec![
            ("optimism".to_string(), 7),
            ("optimism".to_string(), 8),
            ("base".to_string(), 7),
            ("base".to_string(), 8),
            ("base".to_string(), 9),
        ]
    );
    assert_eq!(report.exit_code(), 1);
}
