//! End-to-end caching behaviour: `ProxyEngine` → `RpcCache` → `HttpUpstream` → mockito.

use crate::mock_infrastructure::{
    build_cache_stack, rpc_request, BlockResponseBuilder, RpcMockBuilder, StackOptions,
};
use rpc_cache::{
    metrics::CacheMetricsSnapshot,
    proxy::ProxyError,
    types::{CacheStatus, JsonRpcRequest},
    upstream::UpstreamError,
};
use serde_json::json;

#[tokio::test]
async fn test_static_methods_hit_upstream_once() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_result("eth_chainId", &json!("0x420"), 1).await;
    mock.mock_result("net_version", &json!("0x1234"), 1).await;
    let stack = build_cache_stack(&mock.url(), StackOptions::default()).await;

    for (method, expected) in [("eth_chainId", "0x420"), ("net_version", "0x1234")] {
        let first = stack.engine.process_request(rpc_request(method, json!([]))).await.unwrap();
        let second = stack.engine.process_request(rpc_request(method, json!([]))).await.unwrap();

        assert_eq!(first.result, Some(json!(expected)));
        assert_eq!(first.result, second.result);
        assert_eq!(first.cache_status, Some(CacheStatus::Miss));
        assert_eq!(second.cache_status, Some(CacheStatus::Hit));
    }

    mock.assert_all().await;
    assert_eq!(
        stack.metrics.snapshot(),
        CacheMetricsSnapshot { hits: 2, misses: 2, backend_errors: 0 }
    );
}

#[tokio::test]
async fn test_confirmed_block_hits_upstream_once() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_get_block_by_number(1, &json!("dummy_block"), 1).await;
    let stack = build_cache_stack(&mock.url(), StackOptions::default()).await;

    let request = || rpc_request("eth_getBlockByNumber", json!(["0x1", true]));
    let first = stack.engine.process_request(request()).await.unwrap();
    let second = stack.engine.process_request(request()).await.unwrap();

    mock.assert_all().await;
    assert_eq!(first.result, Some(json!("dummy_block")));
    assert_eq!(first.result, second.result);
    assert_eq!(
        stack.metrics.snapshot(),
        CacheMetricsSnapshot { hits: 1, misses: 1, backend_errors: 0 }
    );
}

#[tokio::test]
async fn test_unconfirmed_block_always_forwarded() {
    let mut mock = RpcMockBuilder::new().await;
    let block = BlockResponseBuilder::new(0x5b).build();
    mock.mock_get_block_by_number(0x5b, &block, 2).await;
    let stack = build_cache_stack(&mock.url(), StackOptions::default()).await;

    for _ in 0..2 {
        let response = stack
            .engine
            .process_request(rpc_request("eth_getBlockByNumber", json!(["0x5b", false])))
            .await
            .unwrap();
        assert_eq!(response.result, Some(block.clone()));
        assert_eq!(response.cache_status, Some(CacheStatus::Miss));
    }

    mock.assert_all().await;
    assert!(stack.storage.is_empty());
}

#[tokio::test]
async fn test_block_becomes_cacheable_once_confirmed() {
    let mut mock = RpcMockBuilder::new().await;
    let block = BlockResponseBuilder::new(0x5b)
        .with_transactions(vec![json!(format!("0x{:064x}", 7))])
        .build();
    mock.mock_get_block_by_number(0x5b, &block, 2).await;
    let stack = build_cache_stack(&mock.url(), StackOptions::default()).await;
    let request = || rpc_request("eth_getBlockByNumber", json!(["0x5b", true]));

    stack.engine.process_request(request()).await.unwrap();
    stack.chain_state.update_block_number(0x65).await;
    stack.engine.process_request(request()).await.unwrap();
    let cached = stack.engine.process_request(request()).await.unwrap();

    mock.assert_all().await;
    assert_eq!(cached.cache_status, Some(CacheStatus::Hit));
    assert_eq!(cached.result, Some(block));
}

#[tokio::test]
async fn test_tags_always_forwarded() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_result("eth_getBlockByNumber", &BlockResponseBuilder::new(100).build(), 2).await;
    let stack = build_cache_stack(&mock.url(), StackOptions::default()).await;

    for _ in 0..2 {
        stack
            .engine
            .process_request(rpc_request("eth_getBlockByNumber", json!(["latest", false])))
            .await
            .unwrap();
    }

    mock.assert_all().await;
    assert!(stack.storage.is_empty());
}

#[tokio::test]
async fn test_block_number_served_from_oracle() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_result("eth_blockNumber", &json!("0x1"), 0).await;
    let stack = build_cache_stack(&mock.url(), StackOptions::default()).await;

    let first = stack
        .engine
        .process_request(rpc_request("eth_blockNumber", json!([])))
        .await
        .unwrap();
    stack.chain_state.update_block_number(0x65).await;
    let second = stack
        .engine
        .process_request(rpc_request("eth_blockNumber", json!([])))
        .await
        .unwrap();

    mock.assert_all().await;
    assert_eq!(first.result, Some(json!("0x64")));
    assert_eq!(second.result, Some(json!("0x65")));
    assert!(stack.storage.is_empty());
}

#[tokio::test]
async fn test_block_number_falls_back_before_first_oracle_update() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_result("eth_blockNumber", &json!("0x7"), 1).await;
    let options = StackOptions { tip: None, ..StackOptions::default() };
    let stack = build_cache_stack(&mock.url(), options).await;

    let response = stack
        .engine
        .process_request(rpc_request("eth_blockNumber", json!([])))
        .await
        .unwrap();

    mock.assert_all().await;
    assert_eq!(response.result, Some(json!("0x7")));
    assert_eq!(response.cache_status, Some(CacheStatus::Miss));
}

#[tokio::test]
async fn test_error_responses_never_cached() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_rpc_error("eth_getBlockByNumber", -32000, "header not found", 2).await;
    let stack = build_cache_stack(&mock.url(), StackOptions::default()).await;

    for _ in 0..2 {
        let response = stack
            .engine
            .process_request(rpc_request("eth_getBlockByNumber", json!(["0x1", false])))
            .await
            .unwrap();
        let error = response.error.expect("error response");
        assert_eq!(error.code, -32000);
        assert_eq!(error.message, "header not found");
    }

    mock.assert_all().await;
    assert!(stack.storage.is_empty());
}

#[tokio::test]
async fn test_null_block_not_cached() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_get_block_by_number(2, &json!(null), 2).await;
    let stack = build_cache_stack(&mock.url(), StackOptions::default()).await;

    for _ in 0..2 {
        stack
            .engine
            .process_request(rpc_request("eth_getBlockByNumber", json!(["0x2", false])))
            .await
            .unwrap();
    }

    mock.assert_all().await;
    assert!(stack.storage.is_empty());
}

#[tokio::test]
async fn test_http_failure_surfaces_as_upstream_error() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_http_status("eth_chainId", 503, 1).await;
    let stack = build_cache_stack(&mock.url(), StackOptions::default()).await;

    let err = stack
        .engine
        .process_request(rpc_request("eth_chainId", json!([])))
        .await
        .unwrap_err();

    mock.assert_all().await;
    assert!(matches!(err, ProxyError::Upstream(UpstreamError::HttpError(503, _))));
    assert!(stack.storage.is_empty());
}

#[tokio::test]
async fn test_pinned_call_cached_and_keyed_canonically() {
    let mut mock = RpcMockBuilder::new().await;
    let balance = json!(format!("0x{:064x}", 1));
    mock.mock_result("eth_call", &balance, 1).await;
    let stack = build_cache_stack(&mock.url(), StackOptions::default()).await;

    let call = json!({"to": "0xAbC0000000000000000000000000000000000001", "data": "0x70A08231"});
    let reordered =
        json!({"data": "0x70a08231", "to": "0xabc0000000000000000000000000000000000001"});

    let first = stack
        .engine
        .process_request(rpc_request("eth_call", json!([call, "0x50"])))
        .await
        .unwrap();
    let second = stack
        .engine
        .process_request(rpc_request("eth_call", json!([reordered, "0x50"])))
        .await
        .unwrap();

    mock.assert_all().await;
    assert_eq!(first.result, Some(balance));
    assert_eq!(first.result, second.result);
    assert_eq!(second.cache_status, Some(CacheStatus::Hit));
}

#[tokio::test]
async fn test_compressed_storage_serves_identical_results() {
    let mut mock = RpcMockBuilder::new().await;
    let block = BlockResponseBuilder::new(1).build();
    mock.mock_get_block_by_number(1, &block, 1).await;
    let options = StackOptions { compression: true, ..StackOptions::default() };
    let stack = build_cache_stack(&mock.url(), options).await;

    let request = || rpc_request("eth_getBlockByNumber", json!(["0x1", false]));
    stack.engine.process_request(request()).await.unwrap();
    let cached = stack.engine.process_request(request()).await.unwrap();

    mock.assert_all().await;
    assert_eq!(cached.result, Some(block));
    assert_eq!(stack.storage.len(), 1);
}

#[tokio::test]
async fn test_cached_response_carries_caller_id() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_result("eth_chainId", &json!("0x420"), 1).await;
    let stack = build_cache_stack(&mock.url(), StackOptions::default()).await;

    stack.engine.process_request(rpc_request("eth_chainId", json!([]))).await.unwrap();
    let request = JsonRpcRequest::new("eth_chainId", None, json!("client-42"));
    let cached = stack.engine.process_request(request).await.unwrap();

    assert_eq!(*cached.id, json!("client-42"));
    mock.assert_all().await;
}
