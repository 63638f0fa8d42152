//! Liveness of the local Gamma server.

use std::time::Duration;

use tokio::net::TcpListener;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::api::{create_query, NodeClient};
use crate::constants::{DEPLOY_GET_INFO_SYSTEM_METHOD_NAME, DEPLOY_SYSTEM_CONTRACT_NAME, IS_READY_POLLING_INTERVAL};
use gamma_jsoncodec::ArgValue;

/// Whether something already listens on `port`.
pub async fn is_port_listening(port: u16) -> bool {
    // a failed bind means the port is likely taken
    TcpListener::bind(("0.0.0.0", port)).await.is_err()
}

/// Ready once the node answers a system query past its genesis block.
pub async fn is_ready(client: &NodeClient, public_key: &[u8]) -> bool {
    let query = create_query(
        public_key,
        client.virtual_chain(),
        DEPLOY_SYSTEM_CONTRACT_NAME,
        DEPLOY_GET_INFO_SYSTEM_METHOD_NAME,
        &[ArgValue::String(DEPLOY_SYSTEM_CONTRACT_NAME.to_string())],
    );

    match client.run_query(&query).await {
        // no transactions are accepted before block 1 closes under consensus
        Ok(response) => response.block_height > 0,
        Err(e) => {
            debug!(error = %e, "liveness check failed");
            false
        }
    }
}

/// Poll [`is_ready`] until it succeeds or `timeout` passes.
///
/// Returns whether the server became ready.
pub async fn wait_until_ready(client: &NodeClient, public_key: &[u8], timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if is_ready(client, public_key).await {
            return true;
        }
        sleep(IS_READY_POLLING_INTERVAL).await;
    }
    false
}
