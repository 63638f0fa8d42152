//! Gamma CLI: Orbs personal blockchain sandbox manager
//!
//! Runs a local Gamma server and Prism explorer in docker, and talks to
//! any Orbs node over JSON-RPC to deploy contracts, send transactions and
//! run queries.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  cli        command table, usage, dispatch                   │
//! ├──────────────────────────────┬───────────────────────────────┤
//! │  commands::local             │  commands::public_api         │
//! │  docker, is_ready            │  api (NodeClient), keys       │
//! ├──────────────────────────────┴───────────────────────────────┤
//! │  config, options             gamma-jsoncodec, gamma-crypto   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod docker;
pub mod error;
pub mod is_ready;
pub mod keys;
pub mod options;

pub use cli::{parse_invocation, render_help, run, CommandId, Invocation};
pub use error::{CliError, Result};
pub use options::GlobalOptions;
