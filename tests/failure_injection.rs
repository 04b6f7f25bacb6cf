//! Failure injection tests: every submission failure ends the run without a retry.

use casper_deployer::blockchain::BlockchainError;
use casper_deployer::{DeployerConfig, DeployerError};

mod common;

fn config_for(fixture: &common::Fixture, rpc_url: String) -> DeployerConfig {
    let mut config = DeployerConfig::default();
    config.node.rpc_url = rpc_url;
    config.node.request_timeout_secs = 5;
    config.paths.secret_key = fixture.key_path.display().to_string();
    config.paths.wasm = fixture.wasm_path.display().to_string();
    config
}

#[tokio::test]
async fn test_http_error_is_not_retried() {
    let fixture = common::Fixture::new(128);
    let (addr, log) =
        common::start_mock_node(|_| async { (500, "Internal Server Error".to_string()) }).await;

    let mut out = Vec::new();
    let err = casper_deployer::run(&config_for(&fixture, format!("http://{}/rpc", addr)), &mut out)
        .await
        .unwrap_err();

    assert_eq!(log.count(), 1, "Should not retry");
    assert!(matches!(
        err,
        DeployerError::Blockchain(BlockchainError::Http { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_rpc_error_is_reported() {
    let fixture = common::Fixture::new(128);
    let (addr, log) = common::start_mock_node(|request| async move {
        (200, common::rpc_error(&request, -32008, "invalid deploy: the deploy has expired"))
    })
    .await;

    let mut out = Vec::new();
    let err = casper_deployer::run(&config_for(&fixture, format!("http://{}/rpc", addr)), &mut out)
        .await
        .unwrap_err();

    assert_eq!(log.count(), 1);
    let report = casper_deployer::report::failure(&err);
    assert!(report.contains("code -32008"));
    assert!(report.contains("the deploy has expired"));
}

#[tokio::test]
async fn test_garbage_response_is_reported() {
    let fixture = common::Fixture::new(128);
    let (addr, _log) = common::start_mock_node(|_| async { (200, "<html>".to_string()) }).await;

    let mut out = Vec::new();
    let err = casper_deployer::run(&config_for(&fixture, format!("http://{}/rpc", addr)), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DeployerError::Blockchain(BlockchainError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_connection_refused() {
    let fixture = common::Fixture::new(128);
    // Bind then drop to get a port nobody listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let mut out = Vec::new();
    let err = casper_deployer::run(
        &config_for(&fixture, format!("http://127.0.0.1:{}/rpc", port)),
        &mut out,
    )
    .await
    .unwrap_err();

    assert!(!err.is_local());
    // Progress was printed before the network call, success was not.
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("WASM Size: 128 bytes"));
    assert!(!text.contains("Deploy submitted"));
}

#[tokio::test]
async fn test_binary_exits_non_zero_on_submission_failure() {
    let fixture = common::Fixture::new(128);
    let (addr, log) =
        common::start_mock_node(|_| async { (503, "Service Unavailable".to_string()) }).await;

    let output = tokio::process::Command::new(env!("CARGO_BIN_EXE_casper-deployer"))
        .current_dir(fixture.path())
        .arg("--node")
        .arg(format!("http://{}/rpc", addr))
        .arg("--key")
        .arg(&fixture.key_path)
        .arg("--wasm")
        .arg(&fixture.wasm_path)
        .env_remove("RUST_LOG")
        .output()
        .await
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(log.count(), 1, "Should not retry");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Deployment failed"));
    assert!(stderr.contains("HTTP 503"));
}

fn failed_execution(request: &serde_json::Value) -> (u16, String) {
    let result = serde_json::json!({
        "deploy": {},
        "execution_results": [{
            "block_hash": "00",
            "result": { "Failure": { "error_message": "Out of gas error", "cost": "1" } }
        }]
    });
    (200, common::rpc_result(request, result))
}

#[tokio::test]
async fn test_failed_execution_is_an_error() {
    let fixture = common::Fixture::new(128);
    let (addr, log) = common::start_accepting_node(failed_execution).await;

    let mut config = config_for(&fixture, format!("http://{}/rpc", addr));
    config.node.wait_for_execution = true;
    config.node.poll_interval_secs = 1;
    config.node.wait_timeout_secs = 10;

    let mut out = Vec::new();
    let err = casper_deployer::run(&config, &mut out).await.unwrap_err();

    assert_eq!(common::method_count(&log, "account_put_deploy"), 1);
    assert!(!err.is_local());
    let DeployerError::Execution { deploy_hash, error } = &err else {
        panic!("unexpected error: {:?}", err);
    };
    assert_eq!(error, "Out of gas error");

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains(&format!("Deploy Hash: {}", deploy_hash.to_hex())));
    assert!(text.contains("/deploy/"));
    assert!(text.contains("Deploy execution failed: Out of gas error"));
}

#[tokio::test]
async fn test_binary_exits_non_zero_on_failed_execution() {
    let fixture = common::Fixture::new(128);
    let (addr, log) = common::start_accepting_node(failed_execution).await;

    let output = tokio::process::Command::new(env!("CARGO_BIN_EXE_casper-deployer"))
        .current_dir(fixture.path())
        .arg("--node")
        .arg(format!("http://{}/rpc", addr))
        .arg("--key")
        .arg(&fixture.key_path)
        .arg("--wasm")
        .arg(&fixture.wasm_path)
        .arg("--wait")
        .arg("--wait-timeout-secs")
        .arg("10")
        .env_remove("RUST_LOG")
        .output()
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(common::method_count(&log, "account_put_deploy"), 1);

    let hash = log.bodies()[0]["params"]["deploy"]["hash"]
        .as_str()
        .unwrap()
        .to_string();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!("Deploy Hash: {}", hash)));
    assert!(stdout.contains("Deploy execution failed: Out of gas error"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Deployment failed"));
    assert!(stderr.contains("Out of gas error"));
}

#[tokio::test]
async fn test_binary_exits_non_zero_on_missing_key() {
    let fixture = common::Fixture::new(128);
    let output = tokio::process::Command::new(env!("CARGO_BIN_EXE_casper-deployer"))
        .current_dir(fixture.path())
        .arg("--key")
        .arg(fixture.path().join("absent.pem"))
        .arg("--wasm")
        .arg(&fixture.wasm_path)
        .output()
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("absent.pem"));
}
