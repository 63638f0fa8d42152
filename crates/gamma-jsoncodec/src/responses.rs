//! # Node Responses
//!
//! Native forms of the four node responses and the pretty JSON printed
//! for each command. Every command prints a subset of the same field
//! list, in this order:
//!
//! | Field | send-tx | run-query | tx-status | tx-proof |
//! |-------|:-:|:-:|:-:|:-:|
//! | `RequestStatus` | x | x | x | x |
//! | `TxId` | x | | | |
//! | `ExecutionResult` | x | x | x | x |
//! | `OutputArguments` | x | x | x | x |
//! | `OutputEvents` | x | x | x | x |
//! | `TransactionStatus` | x | | x | x |
//! | `BlockHeight` | x | x | x | x |
//! | `BlockTimestamp` | x | x | x | x |
//! | `PackedProof`, `PackedReceipt`, `ProofSigners` | | | | x |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::args::{marshal_args, Arg, ArgValue};

/// `BlockTimestamp` rendering, UTC with milliseconds.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Outcome of the request as a whole.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Completed,
    InProcess,
    NotFound,
    Rejected,
    Congestion,
    SystemError,
    OutOfSync,
    /// A value this client does not know, kept as sent.
    #[serde(untagged)]
    Other(String),
}

/// Outcome of contract execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionResult {
    Success,
    ErrorSmartContract,
    ErrorInput,
    ErrorContractNotDeployed,
    ErrorUnexpected,
    NotExecuted,
    /// A value this client does not know, kept as sent.
    #[serde(untagged)]
    Other(String),
}

/// Where the transaction stands on the node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Committed,
    DuplicateTransactionAlreadyCommitted,
    Pending,
    DuplicateTransactionAlreadyPending,
    NoRecordFound,
    RejectedUnsupportedVersion,
    RejectedVirtualChainMismatch,
    RejectedTimestampWindowExceeded,
    RejectedSignatureMismatch,
    RejectedUnknownSignerScheme,
    RejectedGlobalPreOrder,
    RejectedVirtualChainPreOrder,
    RejectedSmartContractPreOrder,
    RejectedTimestampAheadOfNodeTime,
    RejectedCongestion,
    RejectedDuplicatePendingTransaction,
    /// A value this client does not know, kept as sent.
    #[serde(untagged)]
    Other(String),
}

/// Event emitted by a contract, decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractEvent {
    pub contract_name: String,
    pub event_name: String,
    pub arguments: Vec<ArgValue>,
}

/// Event as printed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Event {
    pub contract_name: String,
    pub event_name: String,
    pub arguments: Vec<Arg>,
}

impl From<&ContractEvent> for Event {
    fn from(event: &ContractEvent) -> Self {
        Self {
            contract_name: event.contract_name.clone(),
            event_name: event.event_name.clone(),
            arguments: marshal_args(&event.arguments),
        }
    }
}

/// Convert decoded events to their printed form.
pub fn marshal_events(events: &[ContractEvent]) -> Vec<Event> {
    events.iter().map(Event::from).collect()
}

/// Response to `runQuery`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunQueryResponse {
    pub request_status: RequestStatus,
    pub execution_result: ExecutionResult,
    pub output_arguments: Vec<ArgValue>,
    pub output_events: Vec<ContractEvent>,
    pub block_height: u64,
    pub block_timestamp: DateTime<Utc>,
}

/// Response to `sendTransaction` and `getTransactionStatus`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionResponse {
    pub request_status: RequestStatus,
    pub execution_result: ExecutionResult,
    pub output_arguments: Vec<ArgValue>,
    pub output_events: Vec<ContractEvent>,
    pub transaction_status: TransactionStatus,
    pub block_height: u64,
    pub block_timestamp: DateTime<Utc>,
}

/// Response to `getTransactionReceiptProof`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiptProofResponse {
    pub transaction: TransactionResponse,
    pub packed_proof: Vec<u8>,
    pub packed_receipt: Vec<u8>,
    /// Addresses of the nodes that signed the block.
    pub proof_signers: Vec<Vec<u8>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ResponseJson<'a> {
    request_status: &'a RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    tx_id: Option<&'a str>,
    execution_result: &'a ExecutionResult,
    output_arguments: Vec<Arg>,
    output_events: Vec<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_status: Option<&'a TransactionStatus>,
    block_height: String,
    block_timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    packed_proof: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    packed_receipt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proof_signers: Option<Vec<String>>,
}

impl<'a> ResponseJson<'a> {
    fn from_transaction(r: &'a TransactionResponse) -> Self {
        Self {
            request_status: &r.request_status,
            tx_id: None,
            execution_result: &r.execution_result,
            output_arguments: marshal_args(&r.output_arguments),
            output_events: marshal_events(&r.output_events),
            transaction_status: Some(&r.transaction_status),
            block_height: r.block_height.to_string(),
            block_timestamp: format_timestamp(&r.block_timestamp),
            packed_proof: None,
            packed_receipt: None,
            proof_signers: None,
        }
    }
}

/// Printed form of a `send-tx` or `deploy` result.
pub fn marshal_send_tx_response(r: &TransactionResponse, tx_id: &str) -> Result<String, serde_json::Error> {
    let json = ResponseJson {
        tx_id: Some(tx_id),
        ..ResponseJson::from_transaction(r)
    };
    serde_json::to_string_pretty(&json)
}

/// Printed form of a `run-query` result.
pub fn marshal_read_response(r: &RunQueryResponse) -> Result<String, serde_json::Error> {
    let json = ResponseJson {
        request_status: &r.request_status,
        tx_id: None,
        execution_result: &r.execution_result,
        output_arguments: marshal_args(&r.output_arguments),
        output_events: marshal_events(&r.output_events),
        transaction_status: None,
        block_height: r.block_height.to_string(),
        block_timestamp: format_timestamp(&r.block_timestamp),
        packed_proof: None,
        packed_receipt: None,
        proof_signers: None,
    };
    serde_json::to_string_pretty(&json)
}

/// Printed form of a `tx-status` result.
pub fn marshal_tx_status_response(r: &TransactionResponse) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ResponseJson::from_transaction(r))
}

/// Printed form of a `tx-proof` result.
pub fn marshal_tx_proof_response(r: &ReceiptProofResponse) -> Result<String, serde_json::Error> {
    let json = ResponseJson {
        packed_proof: Some(format!("0x{}", hex::encode(&r.packed_proof))),
        packed_receipt: Some(format!("0x{}", hex::encode(&r.packed_receipt))),
        proof_signers: Some(
            r.proof_signers
                .iter()
                .map(|signer| format!("0x{}", hex::encode(signer)))
                .collect(),
        ),
        ..ResponseJson::from_transaction(&r.transaction)
    };
    serde_json::to_string_pretty(&json)
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(ISO_DATE_FORMAT).to_string()
}
