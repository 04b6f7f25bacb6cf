//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults (Casper testnet)
//!     → optional config file (TOML), loader.rs
//!     → command-line overrides, cli.rs
//!     → validation.rs (semantic checks)
//!     → DeployerConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the tool runs with no file and no flags
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::DeployerConfig;
pub use schema::NodeConfig;
