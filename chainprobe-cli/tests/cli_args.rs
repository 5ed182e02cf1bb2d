mod common;
use common::TestEnv;
use predicates::prelude::*;

#[tokio::test]
async fn test_help_lists_modes() {
    let env = TestEnv::new().await;
    env.chainprobe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--archive"))
        .stdout(predicate::str::contains("--realtime"))
        .stdout(predicate::str::contains("--metrics-port"));
}

#[tokio::test]
async fn test_missing_rpc_url() {
    let env = TestEnv::new().await;
    env.chainprobe()
        .arg("--archive")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("RPC_URL must be set"));
}

#[tokio::test]
async fn test_blank_rpc_url() {
    let env = TestEnv::new().await;
    env.chainprobe()
        .arg("--rpc-url")
        .arg("   ")
        .arg("--realtime")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("RPC_URL must be set"));
}

#[tokio::test]
async fn test_mode_required() {
    let env = TestEnv::new().await;
    env.chainprobe()
        .arg("--rpc-url")
        .arg(env.server.uri())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No mode selected"));
}

#[tokio::test]
async fn test_invalid_rpc_url() {
    let env = TestEnv::new().await;
    env.chainprobe()
        .arg("--rpc-url")
        .arg("not a url")
        .arg("--archive")
        .arg("--no-metrics")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid RPC URL"));
}
