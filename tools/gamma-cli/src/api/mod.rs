//! Node client module.
//!
//! Builds and signs requests and posts them as JSON-RPC 2.0 calls to
//! the node's endpoint.

mod client;
mod transaction;
mod types;

pub use client::{ApiError, NodeClient};
pub use transaction::{body_digest, create_query, create_transaction, sign_transaction, tx_id};
pub use types::*;
