//! Top-level error type.

use thiserror::Error;

use crate::artifact::ArtifactError;
use crate::blockchain::{BlockchainError, DeployHash};
use crate::config::ConfigError;

/// Any failure that ends a deployer run.
#[derive(Debug, Error)]
pub enum DeployerError {
    #[error("configuration error")]
    Config(#[from] ConfigError),

    #[error("could not load contract module")]
    Artifact(#[from] ArtifactError),

    #[error("deploy failed")]
    Blockchain(#[from] BlockchainError),

    /// The node accepted the deploy but its execution failed.
    #[error("deploy {deploy_hash} executed with error: {error}")]
    Execution { deploy_hash: DeployHash, error: String },

    /// Writing the report failed. `submitted` records whether the deploy had
    /// already been sent when it happened.
    #[error("could not write report")]
    Output {
        submitted: bool,
        #[source]
        source: std::io::Error,
    },
}

impl DeployerError {
    /// True when the failure happened before anything was sent to the node.
    pub fn is_local(&self) -> bool {
        match self {
            DeployerError::Config(_) | DeployerError::Artifact(_) => true,
            DeployerError::Blockchain(e) => matches!(
                e,
                BlockchainError::KeyFile { .. } | BlockchainError::Wallet(_)
            ),
            DeployerError::Execution { .. } => false,
            DeployerError::Output { submitted, .. } => !submitted,
        }
    }

    /// Map a report write failure before submission.
    pub(crate) fn output_before_submit(source: std::io::Error) -> Self {
        DeployerError::Output {
            submitted: false,
            source,
        }
    }

    /// Map a report write failure after submission.
    pub(crate) fn output_after_submit(source: std::io::Error) -> Self {
        DeployerError::Output {
            submitted: true,
            source,
        }
    }
}

/// Result type for a deployer run.
pub type DeployerResult<T> = Result<T, DeployerError>;
