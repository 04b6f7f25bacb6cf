//! Console narration of a deployer run.
//!
//! Everything here is pure formatting; the caller decides where it goes.

use std::error::Error;
use std::fmt::Write as _;

use crate::blockchain::status::ExecutionStatus;
use crate::blockchain::types::{DeployHash, PublicKey};

/// What is about to be deployed, and where.
#[derive(Debug, Clone)]
pub struct DeploySummary {
    pub contract_name: String,
    pub node: String,
    pub chain_name: String,
    pub wasm_size: usize,
    pub public_key: PublicKey,
}

/// Explorer page for a deploy.
pub fn explorer_link(explorer_url: &str, hash: &DeployHash) -> String {
    format!("{}/deploy/{}", explorer_url.trim_end_matches('/'), hash.to_hex())
}

/// Explorer page for an installed contract key such as `hash-…`.
pub fn contract_link(explorer_url: &str, contract_hash: &str) -> String {
    format!(
        "{}/contract/{}",
        explorer_url.trim_end_matches('/'),
        contract_hash.trim_start_matches("hash-")
    )
}

pub fn progress(summary: &DeploySummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Deploying {} to {}...", summary.contract_name, summary.chain_name);
    let _ = writeln!(out, "   Node: {}", summary.node);
    let _ = writeln!(out, "   Network: {}", summary.chain_name);
    let _ = writeln!(out, "   WASM Size: {} bytes", summary.wasm_size);
    let _ = writeln!(out, "   Public Key: {}", summary.public_key.to_hex());
    out
}

pub fn submitted(hash: &DeployHash, explorer_url: &str) -> String {
    let link = explorer_link(explorer_url, hash);
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "Deploy submitted successfully!");
    let _ = writeln!(out, "   Deploy Hash: {}", hash.to_hex());
    let _ = writeln!(out, "   Explorer: {}", link);
    out
}

/// Hints printed when not waiting for execution.
pub fn next_steps() -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "Deployment initiated. Check the explorer for status.");
    let _ = writeln!(out, "   The contract should be deployed in 1-2 minutes.");
    let _ = writeln!(out);
    let _ = writeln!(out, "After deployment completes:");
    let _ = writeln!(out, "   1. Visit the explorer link above");
    let _ = writeln!(out, "   2. Find the contract hash in the execution results");
    let _ = writeln!(out, "   3. Update your .env files with the contract hash");
    out
}

pub fn execution(status: &ExecutionStatus, explorer_url: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    match status {
        ExecutionStatus::Pending => {
            let _ = writeln!(out, "Deploy not executed yet. Check the explorer for status.");
        }
        ExecutionStatus::Succeeded {
            contract_hash,
            cost,
            ..
        } => {
            let _ = writeln!(out, "Contract deployed successfully!");
            if let Some(cost) = cost {
                let _ = writeln!(out, "   Cost: {} motes", cost);
            }
            match contract_hash {
                Some(hash) => {
                    let _ = writeln!(out, "   Contract Hash: {}", hash);
                    let _ = writeln!(out, "   Explorer: {}", contract_link(explorer_url, hash));
                    let _ = writeln!(out);
                    let _ = writeln!(out, "Update your .env files with:");
                    let _ = writeln!(out, "   VITE_CONTRACT_HASH={}", hash);
                    let _ = writeln!(out, "   CONTRACT_HASH={}", hash);
                }
                None => {
                    let _ = writeln!(out, "   No contract write found in the execution effects.");
                }
            }
        }
        ExecutionStatus::Failed { error } => {
            let _ = writeln!(out, "Deploy execution failed: {}", error);
        }
    }
    out
}

/// The error followed by every cause in its chain.
pub fn failure(error: &(dyn Error + 'static)) -> String {
    let mut out = format!("Deployment failed: {}\n", error);
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = writeln!(out, "   caused by: {}", cause);
        source = cause.source();
    }
    out
}
