//! # Gamma JSON Codec
//!
//! JSON shapes exchanged by `gamma-cli` with its user and with the node.
//!
//! ## Components
//!
//! | Module | Shape |
//! |--------|-------|
//! | `args` | Typed contract arguments (`{"Type", "Value"}`) |
//! | `request` | `send-tx` / `run-query` input files |
//! | `responses` | Node responses and their printed form |
//! | `keys` | Test keys file |
//! | `config` | Environments config file |

#![warn(clippy::all)]

pub mod args;
pub mod config;
pub mod errors;
pub mod keys;
pub mod request;
pub mod responses;

// Re-exports
pub use args::{
    apply_overrides, decode_output_args, marshal_args, unmarshal_args, Arg, ArgType, ArgValue, RawValue,
    SUPPORTED_TYPES,
};
pub use config::{parse_conf_file, ConfEnv, ConfFile};
pub use errors::CodecError;
pub use keys::{generate_test_keys, keys_file_from_accounts, Key, KeysFile, RawKey, TEST_KEY_COUNT};
pub use request::{parse_method_call, MethodCall};
pub use responses::{
    marshal_read_response, marshal_send_tx_response, marshal_tx_proof_response, marshal_tx_status_response,
    ContractEvent, Event, ExecutionResult, ReceiptProofResponse, RequestStatus, RunQueryResponse,
    TransactionResponse, TransactionStatus,
};
