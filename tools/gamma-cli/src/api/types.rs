//! Node JSON-RPC wire types.

use chrono::{DateTime, Utc};
use gamma_crypto::decode_plain_hex;
use gamma_jsoncodec::{
    decode_output_args, Arg, ContractEvent, ExecutionResult, ReceiptProofResponse, RequestStatus, RunQueryResponse,
    TransactionResponse, TransactionStatus,
};
use serde::{Deserialize, Serialize};

use super::client::ApiError;

/// Signer identity attached to every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signer {
    pub scheme: String,
    /// `0x` hex
    pub public_key: String,
}

/// Transaction or query body. Field order is the signing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    pub protocol_version: u32,
    pub virtual_chain_id: u32,
    pub network_type: String,
    /// Unix nanoseconds
    pub timestamp: u64,
    pub signer: Signer,
    pub contract_name: String,
    pub method_name: String,
    pub input_arguments: Vec<Arg>,
}

/// Params of `sendTransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransaction {
    pub transaction: RequestBody,
    /// `0x` hex Ed25519 signature over the body digest
    pub signature: String,
}

/// Params of `runQuery`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub query: RequestBody,
}

/// Params of the transaction lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxIdParams {
    pub tx_id: String,
}

/// Event in a node response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEvent {
    pub contract_name: String,
    pub event_name: String,
    #[serde(default)]
    pub arguments: Vec<Arg>,
}

/// Result of `runQuery`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub request_status: RequestStatus,
    pub execution_result: ExecutionResult,
    #[serde(default)]
    pub output_arguments: Vec<Arg>,
    #[serde(default)]
    pub output_events: Vec<WireEvent>,
    pub block_height: u64,
    pub block_timestamp: DateTime<Utc>,
}

/// Result of `sendTransaction` and `getTransactionStatus`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    pub request_status: RequestStatus,
    pub execution_result: ExecutionResult,
    #[serde(default)]
    pub output_arguments: Vec<Arg>,
    #[serde(default)]
    pub output_events: Vec<WireEvent>,
    pub transaction_status: TransactionStatus,
    pub block_height: u64,
    pub block_timestamp: DateTime<Utc>,
}

/// Result of `getTransactionReceiptProof`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptProofResult {
    #[serde(flatten)]
    pub transaction: TransactionResult,
    #[serde(default)]
    pub packed_proof: String,
    #[serde(default)]
    pub packed_receipt: String,
    #[serde(default)]
    pub proof_signers: Vec<String>,
}

fn decode_events(events: Vec<WireEvent>) -> Result<Vec<ContractEvent>, ApiError> {
    events
        .into_iter()
        .map(|event| -> Result<ContractEvent, ApiError> {
            Ok(ContractEvent {
                contract_name: event.contract_name,
                event_name: event.event_name,
                arguments: decode_output_args(&event.arguments)?,
            })
        })
        .collect()
}

fn decode_bytes(field: &str, value: &str) -> Result<Vec<u8>, ApiError> {
    decode_plain_hex(value).map_err(|e| ApiError::Parse(format!("{} is not hex: {}", field, e)))
}

impl TryFrom<QueryResult> for RunQueryResponse {
    type Error = ApiError;

    fn try_from(r: QueryResult) -> Result<Self, Self::Error> {
        Ok(Self {
            request_status: r.request_status,
            execution_result: r.execution_result,
            output_arguments: decode_output_args(&r.output_arguments)?,
            output_events: decode_events(r.output_events)?,
            block_height: r.block_height,
            block_timestamp: r.block_timestamp,
        })
    }
}

impl TryFrom<TransactionResult> for TransactionResponse {
    type Error = ApiError;

    fn try_from(r: TransactionResult) -> Result<Self, Self::Error> {
        Ok(Self {
            request_status: r.request_status,
            execution_result: r.execution_result,
            output_arguments: decode_output_args(&r.output_arguments)?,
            output_events: decode_events(r.output_events)?,
            transaction_status: r.transaction_status,
            block_height: r.block_height,
            block_timestamp: r.block_timestamp,
        })
    }
}

impl TryFrom<ReceiptProofResult> for ReceiptProofResponse {
    type Error = ApiError;

    fn try_from(r: ReceiptProofResult) -> Result<Self, Self::Error> {
        Ok(Self {
            packed_proof: decode_bytes("packedProof", &r.packed_proof)?,
            packed_receipt: decode_bytes("packedReceipt", &r.packed_receipt)?,
            proof_signers: r
                .proof_signers
                .iter()
                .map(|signer| decode_bytes("proofSigners", signer))
                .collect::<Result<_, _>>()?,
            transaction: r.transaction.try_into()?,
        })
    }
}

/// JSON-RPC request structure
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<T> {
    pub jsonrpc: &'static str,
    pub method: String,
    pub params: T,
    pub id: u64,
}

impl<T> JsonRpcRequest<T> {
    pub fn new(method: impl Into<String>, params: T, id: u64) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params,
            id,
        }
    }
}

/// JSON-RPC response structure
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<T> {
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error
#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RPC Error {}: {}", self.code, self.message)?;
        if let Some(data) = &self.data {
            write!(f, " ({})", data)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamma_jsoncodec::ArgValue;

    const PROOF_RESULT: &str = r#"{
        "requestStatus": "COMPLETED",
        "executionResult": "SUCCESS",
        "outputArguments": [{"Type": "uint32", "Value": "7"}],
        "outputEvents": [{"contractName": "Counter", "eventName": "Added", "arguments": []}],
        "transactionStatus": "COMMITTED",
        "blockHeight": 12,
        "blockTimestamp": "2019-03-14T09:26:53.589Z",
        "packedProof": "0x0102",
        "packedReceipt": "ff",
        "proofSigners": ["0xaabb"]
    }"#;

    #[test]
    fn test_receipt_proof_decodes() {
        let wire: ReceiptProofResult = serde_json::from_str(PROOF_RESULT).unwrap();
        let response = ReceiptProofResponse::try_from(wire).unwrap();

        assert_eq!(response.packed_proof, vec![1, 2]);
        assert_eq!(response.packed_receipt, vec![0xff]);
        assert_eq!(response.proof_signers, vec![vec![0xaa, 0xbb]]);
        assert_eq!(response.transaction.output_arguments, vec![ArgValue::Uint32(7)]);
        assert_eq!(response.transaction.output_events[0].event_name, "Added");
        assert_eq!(response.transaction.block_height, 12);
    }

    #[test]
    fn test_unknown_output_type_rejected() {
        let wire: QueryResult = serde_json::from_str(
            r#"{
                "requestStatus": "COMPLETED",
                "executionResult": "SUCCESS",
                "outputArguments": [{"Type": "uint8", "Value": "7"}],
                "blockHeight": 1,
                "blockTimestamp": "2019-03-14T09:26:53Z"
            }"#,
        )
        .unwrap();

        let err = RunQueryResponse::try_from(wire).unwrap_err();

        assert!(err.to_string().contains("uint8"));
    }

    #[test]
    fn test_body_serializes_camel_case_in_order() {
        let body = RequestBody {
            protocol_version: 1,
            virtual_chain_id: 42,
            network_type: "TEST_NET".into(),
            timestamp: 5,
            signer: Signer {
                scheme: "EDDSA".into(),
                public_key: "0x00".into(),
            },
            contract_name: "C".into(),
            method_name: "m".into(),
            input_arguments: vec![],
        };

        let json = serde_json::to_string(&body).unwrap();

        assert_eq!(
            json,
            r#"{"protocolVersion":1,"virtualChainId":42,"networkType":"TEST_NET","timestamp":5,"signer":{"scheme":"EDDSA","publicKey":"0x00"},"contractName":"C","methodName":"m","inputArguments":[]}"#
        );
    }

    #[test]
    fn test_rpc_error_display() {
        let err: JsonRpcError = serde_json::from_str(r#"{"code": -32601, "message": "Method not found"}"#).unwrap();
        assert_eq!(err.to_string(), "RPC Error -32601: Method not found");
    }
}
