//! Command-line interface.
//!
//! With no flags the deployer uses its built-in testnet defaults. A config
//! file replaces those defaults and individual flags override both.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{load_with_overrides, ConfigError};
use crate::config::DeployerConfig;

#[derive(Debug, Parser)]
#[command(name = "casper-deployer")]
#[command(about = "Install a compiled contract on a Casper network", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Node JSON-RPC URL
    #[arg(long)]
    pub node: Option<String>,

    /// Ed25519 secret key (PKCS#8 PEM)
    #[arg(long)]
    pub key: Option<String>,

    /// Compiled contract module
    #[arg(long)]
    pub wasm: Option<String>,

    /// Network name
    #[arg(long)]
    pub chain_name: Option<String>,

    /// Payment amount in motes
    #[arg(long)]
    pub payment_amount: Option<u64>,

    /// Management fee in basis points
    #[arg(long)]
    pub management_fee_bp: Option<u32>,

    /// Wait for the deploy to execute and report the contract hash
    #[arg(long)]
    pub wait: bool,

    /// Maximum time to wait for execution, in seconds
    #[arg(long)]
    pub wait_timeout_secs: Option<u64>,
}

impl Cli {
    /// Merge defaults, the optional config file and flags, then validate.
    pub fn resolve_config(&self) -> Result<DeployerConfig, ConfigError> {
        load_with_overrides(self.config.as_deref(), |config| self.apply_overrides(config))
    }

    fn apply_overrides(&self, config: &mut DeployerConfig) {
        if let Some(node) = &self.node {
            config.node.rpc_url = node.clone();
        }
        if let Some(key) = &self.key {
            config.paths.secret_key = key.clone();
        }
        if let Some(wasm) = &self.wasm {
            config.paths.wasm = wasm.clone();
        }
        if let Some(chain_name) = &self.chain_name {
            config.deploy.chain_name = chain_name.clone();
        }
        if let Some(amount) = self.payment_amount {
            config.deploy.payment_amount = amount;
        }
        if let Some(fee) = self.management_fee_bp {
            config.deploy.management_fee_bp = fee;
        }
        if self.wait {
            config.node.wait_for_execution = true;
        }
        if let Some(secs) = self.wait_timeout_secs {
            config.node.wait_timeout_secs = secs;
        }
    }
}
