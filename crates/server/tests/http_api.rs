//! Integration tests for the HTTP surface
//!
//! The router runs over a `NodeGateway` backed by a mock RPC client, covering block id
//! resolution and the error body returned for each failure class.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use config::{ChainFeeConfigs, SidecarConfig};
use http_body_util::BodyExt;
use polkadot_block_api::app::create_app;
use polkadot_block_api::gateway::NodeGateway;
use polkadot_block_api::state::AppState;
use serde_json::{Value, json};
use subxt_rpcs::RpcClient;
use subxt_rpcs::client::MockRpcClient;
use subxt_rpcs::client::mock_rpc_client::{Json as MockJson, MockRpcClientBuilder};
use tower::ServiceExt;

async fn app(builder: MockRpcClientBuilder) -> axum::Router {
    let mock = builder
        .method_handler("system_properties", async |_params| {
            MockJson(json!({ "ss58Format": 0 }))
        })
        .build();
    let gateway = NodeGateway::from_client(RpcClient::new(mock)).await.unwrap();
    create_app(AppState::with_gateway(
        SidecarConfig::default(),
        gateway,
        ChainFeeConfigs::empty(),
    ))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app(MockRpcClient::builder()).await, "/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_malformed_block_id_is_bad_request() {
    for uri in ["/v1/blocks/latest", "/v1/blocks/-3", "/v1/blocks/0x1234"] {
        let (status, body) = get(app(MockRpcClient::builder()).await, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["code"], 400);
        assert_eq!(body["error"], "Bad Request");
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    }
}

#[tokio::test]
async fn test_unknown_height_is_not_found() {
    let builder = MockRpcClient::builder()
        .method_handler("chain_getBlockHash", async |_params| MockJson(Value::Null));
    let (status, body) = get(app(builder).await, "/v1/blocks/123456789").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
    assert_eq!(body["message"], "Block at height 123456789 not found");
}

#[tokio::test]
async fn test_unknown_hash_is_not_found() {
    let builder = MockRpcClient::builder()
        .method_handler("chain_getBlock", async |_params| MockJson(Value::Null));
    let hash = format!("0x{}", "ab".repeat(32));
    let (status, body) = get(app(builder).await, &format!("/v1/blocks/{hash}")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("Block {hash} not found"));
}

#[tokio::test]
async fn test_upstream_failure_is_internal_error() {
    // No chain_getFinalizedHead handler: the RPC call fails
    let (status, body) = get(app(MockRpcClient::builder()).await, "/v1/blocks/head").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 500);
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|m| m.starts_with("Failed to resolve block"))
    );
}
