//! Node JSON-RPC client.

use std::sync::atomic::{AtomicU64, Ordering};

use gamma_jsoncodec::{CodecError, ReceiptProofResponse, RunQueryResponse, TransactionResponse};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::types::*;
use crate::constants::{CONNECT_TIMEOUT, REQUEST_TIMEOUT};

/// Errors that can occur when talking to a node.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON-RPC error: {0}")]
    Rpc(String),
    #[error("Failed to parse response: {0}")]
    Parse(String),
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Failed to decode response arguments: {0}")]
    Decode(#[from] CodecError),
}

/// Client bound to one endpoint and virtual chain.
pub struct NodeClient {
    client: Client,
    endpoint: String,
    virtual_chain: u32,
    request_id: AtomicU64,
}

impl NodeClient {
    /// Create a client for `endpoint`.
    pub fn new(endpoint: impl Into<String>, virtual_chain: u32) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(ApiError::Http)?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            virtual_chain,
            request_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn virtual_chain(&self) -> u32 {
        self.virtual_chain
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Call a JSON-RPC method.
    async fn call<P: serde::Serialize, R: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, ApiError> {
        let request = JsonRpcRequest::new(method, params, self.next_id());
        debug!(endpoint = %self.endpoint, method, id = request.id, "rpc call");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ApiError::Connection(format!("Cannot connect to {}", self.endpoint))
                } else {
                    ApiError::Http(e)
                }
            })?;

        let rpc_response: JsonRpcResponse<R> = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Connection(format!("Timed out reading from {}", self.endpoint))
            } else {
                ApiError::Parse(e.to_string())
            }
        })?;

        if let Some(error) = rpc_response.error {
            return Err(ApiError::Rpc(error.to_string()));
        }

        rpc_response
            .result
            .ok_or_else(|| ApiError::Parse("Missing result in response".to_string()))
    }

    /// Submit a signed transaction and wait for its outcome.
    pub async fn send_transaction(&self, tx: &SignedTransaction) -> Result<TransactionResponse, ApiError> {
        self.call::<_, TransactionResult>("sendTransaction", tx).await?.try_into()
    }

    /// Run a read-only query.
    pub async fn run_query(&self, query: &RequestBody) -> Result<RunQueryResponse, ApiError> {
        let params = Query { query: query.clone() };
        self.call::<_, QueryResult>("runQuery", params).await?.try_into()
    }

    /// Status of a previously sent transaction.
    pub async fn get_transaction_status(&self, tx_id: &str) -> Result<TransactionResponse, ApiError> {
        let params = TxIdParams {
            tx_id: tx_id.to_string(),
        };
        self.call::<_, TransactionResult>("getTransactionStatus", params)
            .await?
            .try_into()
    }

    /// Receipt proof of a committed transaction.
    pub async fn get_transaction_receipt_proof(&self, tx_id: &str) -> Result<ReceiptProofResponse, ApiError> {
        let params = TxIdParams {
            tx_id: tx_id.to_string(),
        };
        self.call::<_, ReceiptProofResult>("getTransactionReceiptProof", params)
            .await?
            .try_into()
    }
}
