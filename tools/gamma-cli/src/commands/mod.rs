//! Command handlers.
//!
//! | Module | Commands |
//! |--------|----------|
//! | `local` | `start-local`, `stop-local`, `upgrade-server`, `logs`, `version` |
//! | `public_api` | `deploy`, `send-tx`, `run-query`, `tx-status`, `tx-proof` |
//!
//! `gen-test-keys` and `help` are handled here.

pub mod local;
pub mod public_api;

use gamma_jsoncodec::TEST_KEY_COUNT;
use tracing::debug;

use crate::cli::{render_help, CommandId, Invocation};
use crate::error::{CliError, Result};
use crate::keys::write_test_keys;
use crate::options::GlobalOptions;

/// Run a parsed invocation.
pub async fn execute(invocation: Invocation) -> Result<()> {
    let Invocation {
        command,
        positionals,
        options,
    } = invocation;
    debug!(command = command.name, ?positionals, "dispatching");

    match command.id {
        CommandId::StartLocal => local::start_local(&options).await,
        CommandId::StopLocal => local::stop_local(&options).await,
        CommandId::GenTestKeys => gen_test_keys(&options),
        CommandId::Deploy => public_api::deploy(&positionals[0], &options).await,
        CommandId::SendTx => public_api::send_tx(&positionals[0], &options).await,
        CommandId::RunQuery => public_api::run_query(&positionals[0], &options).await,
        CommandId::TxStatus => public_api::tx_status(&positionals[0], &options).await,
        CommandId::TxProof => public_api::tx_proof(&positionals[0], &options).await,
        CommandId::UpgradeServer => local::upgrade_server(&options).await,
        CommandId::Logs => local::logs(&options).await,
        CommandId::Version => local::version(&options).await,
        CommandId::Help => show_help(),
    }
}

/// `gen-test-keys`: overwrite the keys file with a fresh batch.
pub fn gen_test_keys(options: &GlobalOptions) -> Result<()> {
    let path = options.keys_path();
    write_test_keys(&path)?;
    println!("{} new test keys written successfully to '{}'.\n", TEST_KEY_COUNT, path.display());
    Ok(())
}

/// `help`: usage goes to stderr and the process exits with status 2.
pub fn show_help() -> Result<()> {
    eprint!("{}", render_help());
    Err(CliError::HelpShown)
}
