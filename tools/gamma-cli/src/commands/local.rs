//! Local sandbox commands: containers on this machine.

use tracing::{info, warn};

use crate::api::NodeClient;
use crate::config::{is_experimental, local_endpoint};
use crate::constants::{DEFAULT_VIRTUAL_CHAIN, GAMMA_CLI_VERSION, IS_READY_TOTAL_WAIT_TIMEOUT};
use crate::docker::{
    ensure_installed, start_container, started_banner, stop_container, stream_logs, upgrade_image, DockerService,
    StartOutcome,
};
use crate::error::{CliError, Result};
use crate::is_ready::wait_until_ready;
use crate::keys::load_test_key;
use crate::options::GlobalOptions;

use super::gen_test_keys;

/// `start-local`: Gamma, then Prism unless `-no-ui`.
///
/// Stops early (successfully) when Gamma is already running.
pub async fn start_local(options: &GlobalOptions) -> Result<()> {
    let experimental = is_experimental(options)?;

    let gamma = DockerService::gamma(options);
    if !start_service(&gamma, options, experimental).await? {
        return Ok(());
    }

    if options.no_ui {
        info!("prism disabled");
        return Ok(());
    }
    start_service(&DockerService::prism(), options, experimental).await?;
    Ok(())
}

/// Start one container. Returns false when it was already running.
async fn start_service(service: &DockerService, options: &GlobalOptions, experimental: bool) -> Result<bool> {
    if !options.keys_path().exists() {
        gen_test_keys(options)?;
    }

    match start_container(service, experimental).await? {
        StartOutcome::AlreadyRunning => Ok(false),
        StartOutcome::Started { version } => {
            if options.wait {
                wait_for_gamma(options).await?;
            }
            println!("{}", started_banner(service, &version));
            Ok(true)
        }
    }
}

async fn wait_for_gamma(options: &GlobalOptions) -> Result<()> {
    let signer = load_test_key(&options.keys_path(), &options.signer)?;
    let client = NodeClient::new(local_endpoint(options.port), DEFAULT_VIRTUAL_CHAIN).map_err(|source| {
        CliError::RequestFailed {
            command: "is-ready",
            source,
        }
    })?;

    if !wait_until_ready(&client, &signer.public_key, IS_READY_TOTAL_WAIT_TIMEOUT).await {
        warn!(
            timeout_secs = IS_READY_TOTAL_WAIT_TIMEOUT.as_secs(),
            "gamma server not ready before timeout"
        );
    }
    Ok(())
}

/// `stop-local`: stop both containers.
pub async fn stop_local(options: &GlobalOptions) -> Result<()> {
    let experimental = is_experimental(options)?;
    stop_container(&DockerService::gamma(options), experimental).await?;
    stop_container(&DockerService::prism(), experimental).await
}

/// `upgrade-server`: pull newer images of both containers.
pub async fn upgrade_server(options: &GlobalOptions) -> Result<()> {
    let experimental = is_experimental(options)?;
    upgrade_image(&DockerService::gamma(options), experimental).await?;
    upgrade_image(&DockerService::prism(), experimental).await
}

/// `logs`: follow contract output of the Gamma container.
pub async fn logs(options: &GlobalOptions) -> Result<()> {
    let experimental = is_experimental(options)?;
    stream_logs(&DockerService::gamma(options), experimental).await
}

/// `version`: this binary and the installed images.
pub async fn version(options: &GlobalOptions) -> Result<()> {
    println!("gamma-cli version v{}", GAMMA_CLI_VERSION);

    let experimental = is_experimental(options)?;
    let gamma_version = ensure_installed(&DockerService::gamma(options), experimental).await?;
    println!("Gamma server version {} (docker)", gamma_version);

    let prism_version = ensure_installed(&DockerService::prism(), experimental).await?;
    println!("Prism blockchain explorer version {} (docker)", prism_version);
    Ok(())
}
