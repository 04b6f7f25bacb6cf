//! Casper contract deployer.
//!
//! # Pipeline
//!
//! ```text
//!   secret_key.pem ──▶ wallet ──┐
//!                               ├──▶ deploy builder ──▶ sign ──▶ node RPC ──▶ report
//!   contract.wasm ──▶ artifact ─┘                                (once)
//! ```
//!
//! Runs with no arguments against the Casper testnet defaults. Exits 0 when
//! the node accepts the deploy and 1 on any error, including a failed
//! execution when waiting for it.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

use casper_deployer::cli::Cli;
use casper_deployer::observability::logging;
use casper_deployer::report;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init("warn");
            let err = casper_deployer::DeployerError::from(e);
            eprint!("{}", report::failure(&err));
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability.log_level);

    tracing::info!(
        rpc_url = %config.node.rpc_url,
        chain_name = %config.deploy.chain_name,
        payment_amount = config.deploy.payment_amount,
        "Configuration loaded"
    );

    let mut stdout = std::io::stdout();
    match casper_deployer::run(&config, &mut stdout).await {
        Ok(outcome) => {
            tracing::info!(deploy_hash = %outcome.deploy_hash, "Done");
            let _ = stdout.flush();
            ExitCode::SUCCESS
        }
        Err(e) => {
            let _ = stdout.flush();
            tracing::error!(error = %e, local = e.is_local(), "Deployment failed");
            eprint!("{}", report::failure(&e));
            ExitCode::FAILURE
        }
    }
}
