//! The deploy pipeline: key, module, build, sign, submit, report.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use crate::artifact::Artifact;
use crate::blockchain::status::{self, ExecutionStatus};
use crate::blockchain::types::{DeployHash, PublicKey, Timestamp};
use crate::blockchain::{
    CLValue, DeployBuilder, DeployParams, NodeClient, RuntimeArgs, SignedDeploy, Wallet,
};
use crate::config::DeployerConfig;
use crate::error::{DeployerError, DeployerResult};
use crate::report::{self, DeploySummary};

/// Runtime argument read by the contract installer.
pub const MANAGEMENT_FEE_ARG: &str = "management_fee_bp";

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct DeployOutcome {
    pub deploy_hash: DeployHash,
    pub explorer_link: String,
    pub public_key: PublicKey,
    pub wasm_size: usize,
    /// Present only when waiting for execution was requested.
    pub execution: Option<ExecutionStatus>,
}

/// Build and sign the installation deploy for `artifact`.
pub fn prepare_deploy(
    config: &DeployerConfig,
    wallet: &Wallet,
    artifact: Artifact,
    timestamp: Timestamp,
) -> SignedDeploy {
    let params = DeployParams {
        account: wallet.public_key(),
        chain_name: config.deploy.chain_name.clone(),
        gas_price: config.deploy.gas_price,
        ttl: Duration::from_millis(config.deploy.ttl_ms),
        payment_amount: config.deploy.payment_amount,
        timestamp,
    };
    let args = RuntimeArgs::new().with(
        MANAGEMENT_FEE_ARG,
        CLValue::u32(config.deploy.management_fee_bp),
    );

    DeployBuilder::new(params)
        .build(artifact.into_bytes(), args)
        .sign(wallet)
}

/// Run the whole pipeline once, narrating progress to `out`.
///
/// Local inputs are read before any network activity and the deploy is
/// submitted at most once.
pub async fn run<W: Write>(
    config: &DeployerConfig,
    out: &mut W,
) -> DeployerResult<DeployOutcome> {
    let wallet = Wallet::from_pem_file(Path::new(&config.paths.secret_key))?;
    let wasm_path = Path::new(&config.paths.wasm);
    let artifact = Artifact::load(wasm_path)?;
    let client = NodeClient::new(&config.node)?;

    let summary = DeploySummary {
        contract_name: wasm_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "contract".to_string()),
        node: config.node.rpc_url.clone(),
        chain_name: config.deploy.chain_name.clone(),
        wasm_size: artifact.len(),
        public_key: wallet.public_key(),
    };
    out.write_all(report::progress(&summary).as_bytes())
        .and_then(|()| out.flush())
        .map_err(DeployerError::output_before_submit)?;

    let deploy = prepare_deploy(config, &wallet, artifact, Timestamp::now());
    tracing::info!(
        deploy_hash = %deploy.hash(),
        chain_name = %config.deploy.chain_name,
        management_fee_bp = config.deploy.management_fee_bp,
        "Deploy signed"
    );

    let deploy_hash = client.put_deploy(&deploy).await?;
    out.write_all(report::submitted(&deploy_hash, &config.node.explorer_url).as_bytes())
        .map_err(DeployerError::output_after_submit)?;

    let execution = if config.node.wait_for_execution {
        let outcome = follow_execution(config, &client, &deploy_hash, &summary, out).await?;
        if let ExecutionStatus::Failed { error } = outcome {
            return Err(DeployerError::Execution { deploy_hash, error });
        }
        Some(outcome)
    } else {
        out.write_all(report::next_steps().as_bytes())
            .map_err(DeployerError::output_after_submit)?;
        None
    };

    Ok(DeployOutcome {
        explorer_link: report::explorer_link(&config.node.explorer_url, &deploy_hash),
        deploy_hash,
        public_key: summary.public_key,
        wasm_size: summary.wasm_size,
        execution,
    })
}

/// Poll for the execution result and report it. Falls back to the account's
/// named keys when the effects carry no contract write.
async fn follow_execution<W: Write>(
    config: &DeployerConfig,
    client: &NodeClient,
    deploy_hash: &DeployHash,
    summary: &DeploySummary,
    out: &mut W,
) -> DeployerResult<ExecutionStatus> {
    out.write_all(b"\nWaiting for execution...\n")
        .and_then(|()| out.flush())
        .map_err(DeployerError::output_after_submit)?;

    let mut outcome = status::wait_for_execution(
        client,
        deploy_hash,
        Duration::from_secs(config.node.poll_interval_secs),
        Duration::from_secs(config.node.wait_timeout_secs),
    )
    .await;

    if let ExecutionStatus::Succeeded {
        contract_hash,
        block_hash: Some(block_hash),
        ..
    } = &mut outcome
    {
        if contract_hash.is_none() {
            match status::find_named_contract(
                client,
                block_hash,
                &summary.public_key,
                &summary.contract_name,
            )
            .await
            {
                Ok(found) => *contract_hash = found,
                Err(e) => {
                    tracing::warn!(
                        deploy_hash = %deploy_hash,
                        error = %e,
                        "Named key lookup failed"
                    );
                }
            }
        }
    }

    out.write_all(report::execution(&outcome, &config.node.explorer_url).as_bytes())
        .map_err(DeployerError::output_after_submit)?;
    Ok(outcome)
}
