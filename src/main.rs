use clap::Parser;
use safe_batch::config::{Cli, RunConfig};
use safe_batch::utils::logging::set_debug;
use safe_batch::{
    log_error, log_info, BatchSubmitter, ChainRegistry, HttpTransactionService, RelayConfig,
    SignerKey,
};
use std::process::ExitCode;

/// Exit status for key store and argument failures
const EXIT_FATAL: u8 = 2;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // 0 for --help and --version, 2 for usage errors
            let _ = e.print();
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            log_error!("main", format!("{:#}", e));
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let config = RunConfig::from_cli(cli)?;
    set_debug(config.verbose);
    let registry = ChainRegistry::mainnets().with_executors(config.executors.clone());

    let signer = SignerKey::load(&config.keystore, &config.password_env)?;
    log_info!("main", "proposer key loaded", sender = safe_batch::utils::checksum(&signer.address()));

    let service = HttpTransactionService::new(RelayConfig::default())?;
    let submitter = BatchSubmitter::new(registry, service, config.options);
    let report = submitter.run(&config.networks, &signer)?;
    report.log_summary();

    Ok(report.exit_code() as u8)
}
