//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the deployer.
//! All types derive Serde traits for deserialization from config files, and
//! every field defaults to the Casper testnet values so no file is required.

use serde::{Deserialize, Serialize};

/// Payment of 200 CSPR, in motes.
pub const DEFAULT_PAYMENT_AMOUNT: u64 = 200_000_000_000;

/// Root configuration for the deployer.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DeployerConfig {
    /// Node connection settings.
    pub node: NodeConfig,

    /// Deploy parameters.
    pub deploy: DeployConfig,

    /// Input file locations.
    pub paths: PathsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Node connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NodeConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// RPC request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Block explorer base URL used for links.
    pub explorer_url: String,

    /// Poll for the execution result after submission.
    pub wait_for_execution: bool,

    /// Maximum time to poll for the execution result, in seconds.
    pub wait_timeout_secs: u64,

    /// Delay between status polls, in seconds.
    pub poll_interval_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://rpc.testnet.casperlabs.io/rpc".to_string(),
            request_timeout_secs: 30,
            explorer_url: "https://testnet.cspr.live".to_string(),
            wait_for_execution: false,
            wait_timeout_secs: 300,
            poll_interval_secs: 5,
        }
    }
}

/// Parameters of the installation deploy.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DeployConfig {
    /// Network name (e.g., "casper-test").
    pub chain_name: String,

    /// Payment amount in motes.
    pub payment_amount: u64,

    /// Gas price multiplier.
    pub gas_price: u64,

    /// Deploy time-to-live in milliseconds.
    pub ttl_ms: u64,

    /// Management fee in basis points passed to the contract installer.
    pub management_fee_bp: u32,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            chain_name: "casper-test".to_string(),
            payment_amount: DEFAULT_PAYMENT_AMOUNT,
            gas_price: 1,
            ttl_ms: 1_800_000, // 30 minutes
            management_fee_bp: 100, // 1%
        }
    }
}

/// Input file locations.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Path to the Ed25519 secret key (PKCS#8 PEM).
    pub secret_key: String,

    /// Path to the compiled contract.
    pub wasm: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            secret_key: "secret_key.pem".to_string(),
            wasm: "wasm/YieldOptimizer.wasm".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}
