use ethers_signers::LocalWallet;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const SAFE: &str = "0xD7d5AEDb6faf61CD17E395D586a7C9B365e685cD";

// Hardhat account #0 (DO NOT USE IN PRODUCTION)
const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn run_cli(args: &[&str], envs: &[(&str, &str)]) -> Output {
    let binary_path = assert_cmd::cargo::cargo_bin!("safe-batch");
    let mut command = Command::new(binary_path);
    command.args(args).env_remove("CHUNK_SIZE");
    for (key, value) in envs {
        command.env(key, value);
    }
    command.output().expect("cli runs")
}

fn write_keystore(dir: &Path, password: &str) -> PathBuf {
    let key = hex::decode(TEST_KEY).expect("test key hex");
    LocalWallet::encrypt_keystore(dir, &mut rand::thread_rng(), &key, password, Some("signer.json"))
        .expect("keystore written");
    dir.join("signer.json")
}

#[test]
fn cli_help_lists_nonce_flags() {
    let output = run_cli(&["--help"], &[]);
    assert!(output.status.success(), "{:?}", output);

    let stdout = String::from_utf8(output.stdout).expect("stdout is utf8");
    for flag in ["--force", "--skip-pending", "--start-nonce", "--chunk-size", "--test"] {
        assert!(stdout.contains(flag), "help is missing {}", flag);
    }
}

#[test]
fn cli_rejects_force_with_skip_pending() {
    let output = run_cli(
        &["--safe", SAFE, "--keystore", "k.json", "--force", "--skip-pending"],
        &[],
    );
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn cli_rejects_malformed_safe() {
    let output = run_cli(&["--safe", "0x1234", "--keystore", "k.json"], &[]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--safe"), "stderr: {}", stderr);
}

#[test]
fn cli_missing_password_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let keystore = write_keystore(dir.path(), "hunter2");

    let output = run_cli(
        &[
            "--safe",
            SAFE,
            "--keystore",
            keystore.to_str().expect("utf8 path"),
            "--password-env",
            "SAFE_BATCH_CLI_TEST_UNSET",
            "--chains",
            "base",
        ],
        &[],
    );
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SAFE_BATCH_CLI_TEST_UNSET"), "stderr: {}", stderr);
    assert!(!stderr.contains("hunter2"));
}

#[test]
fn cli_wrong_password_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let keystore = write_keystore(dir.path(), "hunter2");

    let output = run_cli(
        &[
            "--safe",
            SAFE,
            "--keystore",
            keystore.to_str().expect("utf8 path"),
            "--password-env",
            "SAFE_BATCH_CLI_TEST_PASSWORD",
            "--chains",
            "base",
        ],
        &[("SAFE_BATCH_CLI_TEST_PASSWORD", "wrong")],
    );
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn cli_skips_networks_without_payloads() {
    let dir = tempfile::tempdir().expect("tempdir");
    let keystore = write_keystore(dir.path(), "hunter2");
    let payloads = tempfile::tempdir().expect("payload dir");

    let output = run_cli(
        &[
            "--safe",
            SAFE,
            "--keystore",
            keystore.to_str().expect("utf8 path"),
            "--password-env",
            "SAFE_BATCH_CLI_TEST_PASSWORD",
            "--payload-dir",
            payloads.path().to_str().expect("utf8 path"),
            "--chains",
            "base,celo",
        ],
        &[("SAFE_BATCH_CLI_TEST_PASSWORD", "hunter2")],
    );

    assert!(output.status.success(), "{:?}", output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("base: missing payload"), "stderr: {}", stderr);
    assert!(stderr.contains("celo: missing payload"), "stderr: {}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn cli_unknown_network_fails_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let keystore = write_keystore(dir.path(), "hunter2");

    let output = run_cli(
        &[
            "--safe",
            SAFE,
            "--keystore",
            keystore.to_str().expect("utf8 path"),
            "--password-env",
            "SAFE_BATCH_CLI_TEST_PASSWORD",
            "--chains",
            "zksync",
        ],
        &[("SAFE_BATCH_CLI_TEST_PASSWORD", "hunter2")],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("zksync: no Safe service URL configured"), "stderr: {}", stderr);
}
