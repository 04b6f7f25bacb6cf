//! Casper contract deployer library.

pub mod artifact;
pub mod blockchain;
pub mod cli;
pub mod config;
pub mod deployer;
pub mod error;
pub mod observability;
pub mod report;

pub use config::DeployerConfig;
pub use deployer::{run, DeployOutcome};
pub use error::{DeployerError, DeployerResult};
