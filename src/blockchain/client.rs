//! Node JSON-RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Submit signed deploys (`account_put_deploy`)
//! - Query deploy status (`info_get_deploy`)
//! - Read account named keys (`query_global_state`)
//! - Surface HTTP, transport and JSON-RPC errors with their details
//!
//! Every call is a single attempt. Nothing here retries.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::blockchain::transaction::SignedDeploy;
use crate::blockchain::types::{BlockchainError, BlockchainResult, DeployHash, NodeConfig};

const PUT_DEPLOY: &str = "account_put_deploy";
const GET_DEPLOY: &str = "info_get_deploy";
const QUERY_GLOBAL_STATE: &str = "query_global_state";

#[derive(Debug, Serialize)]
struct RpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    id: String,
    method: &'a str,
    params: P,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<R> {
    result: Option<R>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct PutDeployParams<'a> {
    deploy: &'a SignedDeploy,
}

#[derive(Debug, Deserialize)]
struct PutDeployResult {
    deploy_hash: String,
}

#[derive(Debug, Serialize)]
struct GetDeployParams {
    deploy_hash: String,
    finalized_approvals: bool,
}

#[derive(Debug, Serialize)]
enum StateIdentifier {
    BlockHash(String),
}

#[derive(Debug, Serialize)]
struct QueryGlobalStateParams<'a> {
    state_identifier: StateIdentifier,
    key: &'a str,
    path: Vec<String>,
}

/// JSON-RPC client for a single node.
#[derive(Clone)]
pub struct NodeClient {
    http: reqwest::Client,
    rpc_url: url::Url,
    timeout_duration: Duration,
}

impl NodeClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `config` - Node configuration
    ///
    /// # Returns
    /// A new client or error if the URL is invalid
    pub fn new(config: &NodeConfig) -> BlockchainResult<Self> {
        let rpc_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let timeout_duration = Duration::from_secs(config.request_timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout_duration)
            .build()?;

        Ok(Self {
            http,
            rpc_url,
            timeout_duration,
        })
    }

    pub fn rpc_url(&self) -> &url::Url {
        &self.rpc_url
    }

    /// Submit a signed deploy and return the hash the node accepted it under.
    pub async fn put_deploy(&self, deploy: &SignedDeploy) -> BlockchainResult<DeployHash> {
        tracing::info!(
            rpc_url = %self.rpc_url,
            deploy_hash = %deploy.hash(),
            "Submitting deploy"
        );

        let result: PutDeployResult = self.call(PUT_DEPLOY, PutDeployParams { deploy }).await?;
        let accepted = DeployHash::from_hex(&result.deploy_hash)?;

        if accepted != *deploy.hash() {
            return Err(BlockchainError::HashMismatch {
                expected: *deploy.hash(),
                actual: accepted,
            });
        }

        tracing::info!(deploy_hash = %accepted, "Deploy accepted by node");
        Ok(accepted)
    }

    /// Fetch a deploy with its execution results as raw JSON.
    pub async fn get_deploy(&self, hash: &DeployHash) -> BlockchainResult<serde_json::Value> {
        let params = GetDeployParams {
            deploy_hash: hash.to_hex(),
            finalized_approvals: false,
        };
        self.call(GET_DEPLOY, params).await
    }

    /// Read the stored value under `key` as of `block_hash`.
    pub async fn query_global_state(
        &self,
        block_hash: &str,
        key: &str,
    ) -> BlockchainResult<serde_json::Value> {
        let params = QueryGlobalStateParams {
            state_identifier: StateIdentifier::BlockHash(block_hash.to_string()),
            key,
            path: Vec::new(),
        };
        self.call(QUERY_GLOBAL_STATE, params).await
    }

    /// Issue one JSON-RPC call.
    pub async fn call<P, R>(&self, method: &str, params: P) -> BlockchainResult<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: uuid::Uuid::new_v4().to_string(),
            method,
            params,
        };

        let response = self
            .http
            .post(self.rpc_url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BlockchainError::Timeout(self.timeout_duration.as_secs())
                } else {
                    BlockchainError::Transport(e)
                }
            })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BlockchainError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: RpcResponse<R> = serde_json::from_str(&body).map_err(|e| {
            BlockchainError::InvalidResponse(format!(
                "{} response is not valid JSON-RPC: {}",
                method, e
            ))
        })?;

        if let Some(error) = parsed.error {
            tracing::warn!(
                method,
                code = error.code,
                message = %error.message,
                "Node returned error"
            );
            return Err(BlockchainError::RpcResponse {
                method: method.to_string(),
                code: error.code,
                message: error.message,
                data: error.data,
            });
        }

        parsed.result.ok_or_else(|| {
            BlockchainError::InvalidResponse(format!(
                "{} response has neither result nor error",
                method
            ))
        })
    }
}

impl std::fmt::Debug for NodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClient")
            .field("rpc_url", &self.rpc_url.as_str())
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
