//! `OraclePoller` against a mocked node.

use crate::mock_infrastructure::RpcMockBuilder;
use rpc_cache::{
    chain::{ChainOracle, ChainState, OracleError, OraclePoller},
    upstream::HttpUpstream,
};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tokio::sync::broadcast;

fn poller_for(url: &str, chain_state: Arc<ChainState>, interval: Duration) -> OraclePoller {
    let upstream = Arc::new(HttpUpstream::new(url, Duration::from_secs(2)).unwrap());
    OraclePoller::new(upstream, chain_state, interval)
}

#[tokio::test]
async fn test_poll_once_populates_chain_state() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_result("eth_blockNumber", &json!("0x64"), 1).await;
    mock.mock_result("eth_gasPrice", &json!("0x3b9aca00"), 1).await;

    let chain_state = Arc::new(ChainState::new());
    assert!(matches!(chain_state.latest_block_number().await, Err(OracleError::Unavailable(_))));

    poller_for(&mock.url(), chain_state.clone(), Duration::from_secs(60)).poll_once().await;

    mock.assert_all().await;
    assert_eq!(chain_state.latest_block_number().await, Ok(100));
    assert_eq!(chain_state.latest_gas_price().await, Ok(1_000_000_000));
}

#[tokio::test]
async fn test_failed_poll_keeps_previous_values() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_http_status("eth_blockNumber", 500, 1).await;
    mock.mock_result("eth_gasPrice", &json!("not-hex"), 1).await;

    let chain_state = Arc::new(ChainState::new());
    chain_state.update_block_number(42).await;
    chain_state.update_gas_price(7);

    poller_for(&mock.url(), chain_state.clone(), Duration::from_secs(60)).poll_once().await;

    mock.assert_all().await;
    assert_eq!(chain_state.current_tip(), Some(42));
    assert_eq!(chain_state.current_gas_price(), Some(7));
}

#[tokio::test]
async fn test_poller_never_moves_tip_backwards() {
    let mut mock = RpcMockBuilder::new().await;
    mock.mock_result("eth_blockNumber", &json!("0x10"), 1).await;
    mock.mock_result("eth_gasPrice", &json!("0x1"), 1).await;

    let chain_state = Arc::new(ChainState::new());
    chain_state.update_block_number(0x20).await;

    poller_for(&mock.url(), chain_state.clone(), Duration::from_secs(60)).poll_once().await;

    assert_eq!(chain_state.current_tip(), Some(0x20));
    assert_eq!(chain_state.current_gas_price(), Some(1));
}

#[tokio::test]
async fn test_background_poller_stops_on_shutdown() {
    let mut mock = RpcMockBuilder::new().await;
    let chain_state = Arc::new(ChainState::new());
    mock.mock_result("eth_blockNumber", &json!("0x64"), 1).await;
    mock.mock_result("eth_gasPrice", &json!("0x1"), 1).await;

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    // First tick is immediate; the next one is an hour away.
    let handle = poller_for(&mock.url(), chain_state.clone(), Duration::from_secs(3600))
        .start_with_shutdown(shutdown_rx);

    tokio::time::timeout(Duration::from_secs(2), async {
        while chain_state.current_gas_price().is_none() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    shutdown_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(2), handle).await.unwrap().unwrap();

    mock.assert_all().await;
    assert_eq!(chain_state.current_tip(), Some(100));
}
