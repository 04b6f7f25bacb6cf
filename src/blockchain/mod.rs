//! Casper deploy subsystem.
//!
//! # Data Flow
//! ```text
//! PEM key file
//!     → wallet.rs (key decoding, signing)
//! WASM + params + args
//!     → transaction.rs (build, hash, approve)
//!         uses bytesrepr.rs, args.rs
//!     → client.rs (account_put_deploy)
//!     → status.rs (optional execution follow-up)
//! ```
//!
//! # Security Constraints
//! - Never log private keys
//! - All RPC calls have a configured timeout
//! - A deploy is submitted at most once per run

pub mod args;
pub mod bytesrepr;
pub mod client;
pub mod status;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use args::{CLValue, RuntimeArgs};
pub use client::NodeClient;
pub use status::ExecutionStatus;
pub use transaction::{DeployBuilder, DeployParams, SignedDeploy, UnsignedDeploy};
pub use types::{BlockchainError, DeployHash, PublicKey};
pub use wallet::Wallet;
