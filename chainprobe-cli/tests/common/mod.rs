#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_partial_json, method},
    Mock, MockServer, ResponseTemplate,
};

pub struct TestEnv {
    pub server: MockServer,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// The binary, with a clean environment and no metrics listener.
    pub fn chainprobe(&self) -> Command {
        let mut cmd = Command::cargo_bin("chainprobe").unwrap();
        cmd.env_remove("RPC_URL");
        cmd.env("RUST_LOG", "warn");
        cmd.env("NO_COLOR", "1");
        cmd
    }

    pub async fn mock_rpc(&self, method_name: &str, response_json: Value) {
        let response = ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": response_json
        }));

        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": method_name })))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }
}

pub fn hash(byte: u8) -> String {
    format!("0x{}", format!("{:02x}", byte).repeat(32))
}

/// A block with one transaction and an all-zero bloom.
pub fn get_mock_block(block_number: u64) -> Value {
    json!({
        "number": format!("0x{:x}", block_number),
        "hash": hash(0xAA),
        "parentHash": hash(0x00),
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "timestamp": "0x65b17a10",
        "transactions": [hash(0x01)]
    })
}

pub fn get_mock_log(tx_hash: &str) -> Value {
    json!({
        "address": "0x1111111111111111111111111111111111111111",
        "topics": [],
        "data": "0x",
        "blockHash": hash(0xAA),
        "blockNumber": "0x1",
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "logIndex": "0x0",
        "removed": false
    })
}
