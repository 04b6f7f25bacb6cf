//! Execution follow-up for a submitted deploy.
//!
//! Polls `info_get_deploy` until the node reports an execution result, and
//! can look the installed contract up in the account's named keys. This only
//! reads status; the deploy itself is never re-sent.

use std::time::Duration;

use serde_json::Value;
use tokio::time::{interval, timeout};

use crate::blockchain::client::NodeClient;
use crate::blockchain::types::{BlockchainResult, DeployHash, PublicKey};

/// Execution state of a deploy as seen by the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// Not executed yet, or not known to the node yet.
    Pending,
    /// Executed successfully.
    Succeeded {
        /// Key of the first contract written by the deploy, if any.
        contract_hash: Option<String>,
        /// Gas cost as reported by the node.
        cost: Option<String>,
        /// Block the deploy was executed in.
        block_hash: Option<String>,
    },
    /// Executed and failed.
    Failed { error: String },
}

/// Interpret an `info_get_deploy` result.
///
/// Understands both the `execution_results` list of 1.x nodes and the
/// `execution_info` object of 2.x nodes.
pub fn parse_execution_status(result: &Value) -> ExecutionStatus {
    if let Some(first) = result
        .get("execution_results")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
    {
        return with_block_hash(parse_v1_result(&first["result"]), &first["block_hash"]);
    }

    let Some(info) = result.get("execution_info") else {
        return ExecutionStatus::Pending;
    };
    match &info["execution_result"] {
        Value::Null => ExecutionStatus::Pending,
        exec => with_block_hash(parse_v2_result(exec), &info["block_hash"]),
    }
}

fn with_block_hash(status: ExecutionStatus, block: &Value) -> ExecutionStatus {
    match status {
        ExecutionStatus::Succeeded {
            contract_hash,
            cost,
            ..
        } => ExecutionStatus::Succeeded {
            contract_hash,
            cost,
            block_hash: block.as_str().map(str::to_string),
        },
        other => other,
    }
}

fn parse_v1_result(result: &Value) -> ExecutionStatus {
    if let Some(success) = result.get("Success") {
        let contract_hash = success["effect"]["transforms"]
            .as_array()
            .and_then(|transforms| {
                transforms.iter().find(|t| {
                    t["transform"] == "WriteContract"
                        || t["transform"].get("WriteContract").is_some()
                })
            })
            .and_then(|t| t["key"].as_str())
            .map(str::to_string);
        return ExecutionStatus::Succeeded {
            contract_hash,
            cost: value_to_string(&success["cost"]),
            block_hash: None,
        };
    }
    if let Some(failure) = result.get("Failure") {
        return ExecutionStatus::Failed {
            error: value_to_string(&failure["error_message"])
                .unwrap_or_else(|| failure.to_string()),
        };
    }
    ExecutionStatus::Pending
}

fn parse_v2_result(exec: &Value) -> ExecutionStatus {
    if let Some(legacy) = exec.get("Version1") {
        return parse_v1_result(legacy);
    }
    let Some(inner) = exec.get("Version2") else {
        return ExecutionStatus::Pending;
    };

    if let Some(error) = inner["error_message"].as_str() {
        return ExecutionStatus::Failed {
            error: error.to_string(),
        };
    }

    let contract_hash = inner["effects"]
        .as_array()
        .and_then(|effects| {
            effects.iter().find(|e| {
                let write = &e["kind"]["Write"];
                write.get("Contract").is_some() || write.get("AddressableEntity").is_some()
            })
        })
        .and_then(|e| e["key"].as_str())
        .map(str::to_string);

    ExecutionStatus::Succeeded {
        contract_hash,
        cost: value_to_string(&inner["cost"]).or_else(|| value_to_string(&inner["consumed"])),
        block_hash: None,
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Lowercase with separators removed, so `YieldOptimizer` and
/// `yield_optimizer` compare equal.
fn normalize_key_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Pick the named key whose name contains `contract_name`.
///
/// Accepts the `[{name, key}]` list nodes return as well as a plain
/// name-to-key object.
pub fn find_in_named_keys(stored_value: &Value, contract_name: &str) -> Option<String> {
    let wanted = normalize_key_name(contract_name);
    if wanted.is_empty() {
        return None;
    }
    let named_keys = &stored_value["Account"]["named_keys"];

    if let Some(list) = named_keys.as_array() {
        return list
            .iter()
            .find(|entry| {
                entry["name"]
                    .as_str()
                    .is_some_and(|name| normalize_key_name(name).contains(&wanted))
            })
            .and_then(|entry| entry["key"].as_str())
            .map(str::to_string);
    }

    named_keys.as_object().and_then(|map| {
        map.iter()
            .find(|(name, _)| normalize_key_name(name).contains(&wanted))
            .and_then(|(_, key)| key.as_str().or_else(|| key["key"].as_str()))
            .map(str::to_string)
    })
}

/// Look the installed contract up in `account`'s named keys as of
/// `block_hash`. Used when the execution effects carry no contract write.
pub async fn find_named_contract(
    client: &NodeClient,
    block_hash: &str,
    account: &PublicKey,
    contract_name: &str,
) -> BlockchainResult<Option<String>> {
    let result = client
        .query_global_state(block_hash, &account.account_key())
        .await?;
    Ok(find_in_named_keys(&result["stored_value"], contract_name))
}

/// Wait for a deploy to be executed.
///
/// # Arguments
/// * `client` - Node client
/// * `hash` - Deploy hash to monitor
/// * `poll_interval` - Delay between status queries
/// * `wait_timeout` - Maximum time to wait
///
/// Query failures are logged and polling continues; [`ExecutionStatus::Pending`]
/// is returned when the timeout elapses.
pub async fn wait_for_execution(
    client: &NodeClient,
    hash: &DeployHash,
    poll_interval: Duration,
    wait_timeout: Duration,
) -> ExecutionStatus {
    let result = timeout(wait_timeout, async {
        let mut ticker = interval(poll_interval);

        loop {
            ticker.tick().await;

            match client.get_deploy(hash).await {
                Ok(result) => match parse_execution_status(&result) {
                    ExecutionStatus::Pending => {
                        tracing::debug!(deploy_hash = %hash, "Deploy pending");
                    }
                    done => return done,
                },
                Err(e) => {
                    tracing::debug!(deploy_hash = %hash, error = %e, "Status query failed");
                }
            }
        }
    })
    .await;

    match result {
        Ok(status) => status,
        Err(_) => {
            tracing::warn!(
                deploy_hash = %hash,
                timeout_secs = wait_timeout.as_secs(),
                "Deploy not executed before wait timeout"
            );
            ExecutionStatus::Pending
        }
    }
}
