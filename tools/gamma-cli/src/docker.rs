//! # Docker Lifecycle
//!
//! Gamma runs as two containers on a private docker network: the Gamma
//! server itself and the Prism block explorer. Everything here shells
//! out to the `docker` binary.
//!
//! ## Image tags
//!
//! Stable releases are tagged `vMAJOR.MINOR.PATCH`. Environments marked
//! experimental track the floating `experimental` tag instead, and never
//! consult the registry.

use std::io;
use std::process::{Output, Stdio};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::constants::*;
use crate::error::{CliError, RegistryError, Result};
use crate::options::GlobalOptions;

static SEMVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v(\d+)\.(\d+)\.(\d+)").expect("semver pattern is valid"));

/// A managed container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerService {
    /// Display name.
    pub name: &'static str,
    pub image: &'static str,
    pub container_name: &'static str,
    /// Host port.
    pub port: u16,
    pub container_port: u16,
    /// `KEY=value` pairs.
    pub env: Vec<String>,
    /// Command override, empty for the image default.
    pub command: Vec<String>,
}

impl DockerService {
    /// The Gamma server, on `-port`.
    pub fn gamma(options: &GlobalOptions) -> Self {
        let command = if options.override_config.is_empty() {
            Vec::new()
        } else {
            vec![
                "./gamma-server".to_string(),
                "-override-config".to_string(),
                options.override_config.clone(),
            ]
        };

        Self {
            name: GAMMA_NAME,
            image: GAMMA_IMAGE,
            container_name: GAMMA_CONTAINER,
            port: options.port,
            container_port: GAMMA_CONTAINER_PORT,
            env: Vec::new(),
            command,
        }
    }

    /// The Prism explorer, pointed at the Gamma container.
    pub fn prism() -> Self {
        Self {
            name: PRISM_NAME,
            image: PRISM_IMAGE,
            container_name: PRISM_CONTAINER,
            port: PRISM_PORT,
            container_port: PRISM_PORT,
            env: vec![
                format!("ORBS_URL=http://{}:{}", GAMMA_CONTAINER, GAMMA_CONTAINER_PORT),
                format!("ORBS_VIRTUAL_CHAIN_ID={}", DEFAULT_VIRTUAL_CHAIN),
                "DATABASE_TYPE=inmemory".to_string(),
                "ORBS_POLLING_INTERVAL=500".to_string(),
            ],
            command: Vec::new(),
        }
    }

    /// Docker Hub tag listing of the image.
    pub fn registry_tags_url(&self) -> String {
        format!("{}/{}/tags/", DOCKER_REGISTRY_TAGS_URL, self.image)
    }

    /// Arguments of `docker run` for image tag `version`.
    pub fn run_args(&self, version: &str) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "-d".to_string(),
            "--name".to_string(),
            self.container_name.to_string(),
            "-p".to_string(),
            format!("{}:{}", self.port, self.container_port),
            "--network".to_string(),
            DOCKER_NETWORK.to_string(),
        ];
        for value in &self.env {
            args.push("-e".to_string());
            args.push(value.clone());
        }
        args.push(format!("{}:{}", self.image, version));
        args.extend(self.command.iter().cloned());
        args
    }
}

/// Outcome of [`start_container`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Started { version: String },
    AlreadyRunning,
}

// ============================================================================
// Pure helpers
// ============================================================================

/// Tag of `image` in `docker images` output, if installed.
pub fn extract_tag_from_images_output(image: &str, output: &str, experimental: bool) -> Option<String> {
    let tag = if experimental {
        regex::escape(DOCKER_TAG_EXPERIMENTAL)
    } else {
        r"v\S+".to_string()
    };
    let re = Regex::new(&format!(r"{}\s+({})", regex::escape(image), tag)).ok()?;
    re.captures(output).map(|c| c[1].to_string())
}

/// Compare two release tags.
///
/// An unparsable `t1` is always lower; otherwise an unparsable `t2` is
/// always lower. Only the sign of the result is meaningful.
pub fn cmp_tags(t1: &str, t2: &str) -> i64 {
    let Some(v1) = parse_semver(t1) else {
        return -1;
    };
    let Some(v2) = parse_semver(t2) else {
        return 1;
    };
    v1.iter()
        .zip(v2.iter())
        .map(|(a, b)| a - b)
        .find(|diff| *diff != 0)
        .unwrap_or(0)
}

fn parse_semver(tag: &str) -> Option<[i64; 3]> {
    let caps = SEMVER.captures(tag)?;
    let part = |i: usize| caps[i].parse::<i64>().unwrap_or(0);
    Some([part(1), part(2), part(3)])
}

#[derive(Deserialize)]
struct DockerHubTags {
    #[serde(default)]
    results: Vec<DockerHubTag>,
}

#[derive(Deserialize)]
struct DockerHubTag {
    #[serde(default)]
    name: String,
}

/// Highest release tag in a Docker Hub tag listing.
pub fn extract_latest_tag_from_registry_response(bytes: &[u8]) -> std::result::Result<String, RegistryError> {
    let response: Option<DockerHubTags> =
        serde_json::from_slice(bytes).map_err(|e| RegistryError::Malformed(e.to_string()))?;

    let mut max_tag = String::new();
    for tag in response.map(|r| r.results).unwrap_or_default() {
        if cmp_tags(&tag.name, &max_tag) > 0 {
            max_tag = tag.name;
        }
    }

    if max_tag.is_empty() {
        return Err(RegistryError::NoValidTags);
    }
    Ok(max_tag)
}

/// Whether a `docker logs` line is contract output rather than server logging.
pub fn is_gamma_log_line(line: &str) -> bool {
    !line.contains("info ")
        && !line.starts_with("error ")
        && !line.starts_with("debug ")
        && !line.starts_with('\t')
        && !line.starts_with("] ")
}

fn install_url() -> &'static str {
    if cfg!(target_os = "macos") {
        "https://docs.docker.com/docker-for-mac/install/"
    } else {
        "https://docs.docker.com/install/"
    }
}

fn combined(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

// ============================================================================
// Docker invocations
// ============================================================================

async fn docker<S: AsRef<str>>(args: &[S]) -> io::Result<Output> {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    debug!(?args, "docker");
    Command::new("docker").args(&args).output().await
}

/// `docker images <image>` output, or the docker-missing error.
async fn list_images(image: &str) -> Result<String> {
    match docker(&["images", image]).await {
        Ok(output) if output.status.success() => Ok(combined(&output)),
        Ok(output) => {
            debug!(output = %combined(&output), "docker images failed");
            Err(CliError::DockerNotInstalled {
                install_url: install_url(),
            })
        }
        Err(e) => {
            debug!(error = %e, "docker not runnable");
            Err(CliError::DockerNotInstalled {
                install_url: install_url(),
            })
        }
    }
}

async fn pull(image: &str, tag: &str) {
    let reference = format!("{}:{}", image, tag);
    debug!(%reference, "docker pull");
    match Command::new("docker").args(["pull", &reference]).status().await {
        Ok(status) if status.success() => info!(%reference, "image pulled"),
        Ok(status) => warn!(%reference, %status, "docker pull failed"),
        Err(e) => warn!(%reference, error = %e, "docker pull failed"),
    }
}

/// Latest tag to install: `experimental`, or the registry's highest release.
pub async fn latest_tag(service: &DockerService, experimental: bool) -> Result<String> {
    if experimental {
        return Ok(DOCKER_TAG_EXPERIMENTAL.to_string());
    }

    let url = service.registry_tags_url();
    debug!(%url, "querying registry");
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(CliError::RegistryConnect)?;
    let response = client.get(&url).send().await.map_err(CliError::RegistryConnect)?;
    let bytes = response.bytes().await.map_err(|_| CliError::RegistryBadResponse)?;
    if bytes.is_empty() {
        return Err(CliError::RegistryBadResponse);
    }

    extract_latest_tag_from_registry_response(&bytes).map_err(CliError::RegistryParse)
}

/// Make sure docker works and the image is present, pulling the latest
/// tag if it is not. Returns the installed tag.
pub async fn ensure_installed(service: &DockerService, experimental: bool) -> Result<String> {
    let output = list_images(service.image).await?;
    if let Some(tag) = extract_tag_from_images_output(service.image, &output, experimental) {
        return Ok(tag);
    }

    let latest = latest_tag(service, experimental).await?;
    println!("{} image is not installed, downloading version {}:\n", service.name, latest);
    pull(service.image, &latest).await;
    println!();

    let output = match docker(&["images", service.image]).await {
        Ok(output) if output.status.success() => combined(&output),
        _ => return Err(CliError::ImageDownload),
    };
    if output.matches('\n').count() <= 1 {
        return Err(CliError::ImageDownload);
    }
    extract_tag_from_images_output(service.image, &output, experimental).ok_or(CliError::ImageDownload)
}

/// Whether `docker ps` lists the container.
pub async fn is_container_running(container_name: &str) -> bool {
    let filter = format!("name={}", container_name);
    match docker(&["ps", "-f", &filter]).await {
        // a header line plus at least one container
        Ok(output) if output.status.success() => combined(&output).matches('\n').count() > 1,
        _ => false,
    }
}

async fn create_network() -> Result<()> {
    let filter = format!("name={}", DOCKER_NETWORK);
    let output = docker(&["network", "ls", "--filter", &filter, "-q"])
        .await
        .map_err(|e| network_error(e.to_string()))?;
    if !output.status.success() {
        return Err(network_error(combined(&output)));
    }

    if combined(&output).trim().is_empty() {
        info!(network = DOCKER_NETWORK, "creating docker network");
        let output = docker(&["network", "create", DOCKER_NETWORK])
            .await
            .map_err(|e| network_error(e.to_string()))?;
        if !output.status.success() {
            return Err(network_error(combined(&output)));
        }
    }
    Ok(())
}

fn network_error(reason: String) -> CliError {
    CliError::DockerNetwork {
        network: DOCKER_NETWORK,
        reason: reason.trim().to_string(),
    }
}

/// Start the service's container unless it already runs.
pub async fn start_container(service: &DockerService, experimental: bool) -> Result<StartOutcome> {
    let version = ensure_installed(service, experimental).await?;

    if is_container_running(service.container_name).await {
        println!("{}", already_running_banner(service));
        return Ok(StartOutcome::AlreadyRunning);
    }

    create_network().await?;

    let output = docker(&service.run_args(&version))
        .await
        .map_err(|e| CliError::DockerRun(e.to_string()))?;
    if !output.status.success() {
        return Err(CliError::DockerRun(combined(&output)));
    }

    if !is_container_running(service.container_name).await {
        return Err(CliError::ContainerNotStarted);
    }

    info!(container = service.container_name, %version, "container started");
    Ok(StartOutcome::Started { version })
}

/// Stop and remove the service's container. The image is installed
/// first if missing.
pub async fn stop_container(service: &DockerService, experimental: bool) -> Result<()> {
    ensure_installed(service, experimental).await?;

    match docker(&["stop", service.container_name]).await {
        Ok(output) if output.status.success() => {}
        _ => println!("{} server is already stopped.\n", service.name),
    }

    match docker(&["rm", "-f", service.container_name]).await {
        Ok(output) if output.status.success() => {}
        Ok(output) => println!("Could not remove docker container.\n\n{}", combined(&output)),
        Err(e) => println!("Could not remove docker container.\n\n{}", e),
    }

    if is_container_running(service.container_name).await {
        return Err(CliError::ContainerNotStopped);
    }

    info!(container = service.container_name, "container stopped");
    println!("{}", stopped_banner(service));
    Ok(())
}

/// Pull a newer image if the registry has one.
pub async fn upgrade_image(service: &DockerService, experimental: bool) -> Result<()> {
    let current = ensure_installed(service, experimental).await?;
    let latest = latest_tag(service, experimental).await?;

    if !experimental && cmp_tags(&latest, &current) <= 0 {
        println!(
            "Current {} stable version {} does not require upgrade.",
            service.name, current
        );
    } else {
        println!("Downloading latest version {}:\n", latest);
        pull(service.image, &latest).await;
        println!();
    }
    Ok(())
}

/// Follow the container's output, printing contract output only.
pub async fn stream_logs(service: &DockerService, experimental: bool) -> Result<()> {
    ensure_installed(service, experimental).await?;

    let mut child = Command::new("docker")
        .args(["logs", "-f", "--tail=20", service.container_name])
        .stdout(Stdio::piped())
        .spawn()
        .map_err(CliError::DockerLogs)?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| CliError::DockerLogs(io::Error::new(io::ErrorKind::BrokenPipe, "no stdout")))?;

    let mut lines = BufReader::new(stdout).lines();
    while let Some(line) = lines.next_line().await.map_err(CliError::DockerLogs)? {
        if is_gamma_log_line(&line) {
            println!("{}", line);
        }
    }

    let status = child.wait().await.map_err(CliError::DockerLogs)?;
    debug!(%status, "docker logs exited");
    Ok(())
}

// ============================================================================
// Banners
// ============================================================================

const RULE: &str = "*********************************************************************************";

pub fn already_running_banner(service: &DockerService) -> String {
    format!(
        "\n{RULE}\n              {} is already running!\n\n  Run 'gamma-cli help' in terminal to learn how to interact with this instance.\n\n{RULE}*\n",
        service.name
    )
}

pub fn started_banner(service: &DockerService, version: &str) -> String {
    format!(
        "\n{RULE}\n                 {} {} is running!\n\n  Local blockchain instance started and listening on port {}.\n  Run 'gamma-cli help' in terminal to learn how to interact with this instance.\n\n{RULE}*\n",
        service.name, version, service.port
    )
}

pub fn stopped_banner(service: &DockerService) -> String {
    format!(
        "\n{RULE}\n                    {} stopped.\n\n  A local blockchain instance is running in-memory.\n  The next time you start the instance, all contracts and state will disappear.\n\n{RULE}*\n",
        service.name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const IMAGES_OUTPUT: &str = "REPOSITORY          TAG                 IMAGE ID            CREATED             SIZE\n\
orbsnetwork/gamma   v0.7.0              1a2b3c4d5e6f        2 weeks ago         126MB\n\
orbsnetwork/gamma   experimental        6f5e4d3c2b1a        3 days ago          127MB\n";

    fn hub_response(names: &[&str]) -> String {
        let results: Vec<String> = names
            .iter()
            .map(|name| format!(r#"{{"name": "{}", "full_size": 126289039, "v2": true}}"#, name))
            .collect();
        format!(
            r#"{{"count": {}, "next": null, "previous": null, "results": [{}]}}"#,
            names.len(),
            results.join(", ")
        )
    }

    #[test]
    fn test_extract_tag_stable() {
        assert_eq!(
            extract_tag_from_images_output(GAMMA_IMAGE, IMAGES_OUTPUT, false).as_deref(),
            Some("v0.7.0")
        );
    }

    #[test]
    fn test_extract_tag_experimental() {
        assert_eq!(
            extract_tag_from_images_output(GAMMA_IMAGE, IMAGES_OUTPUT, true).as_deref(),
            Some("experimental")
        );
    }

    #[test]
    fn test_extract_tag_not_found() {
        let header_only = "REPOSITORY          TAG                 IMAGE ID            CREATED             SIZE\n";
        assert_eq!(extract_tag_from_images_output(GAMMA_IMAGE, header_only, false), None);
        assert_eq!(extract_tag_from_images_output(PRISM_IMAGE, IMAGES_OUTPUT, false), None);
    }

    #[test]
    fn test_latest_tag_happy_flow() {
        let tag = extract_latest_tag_from_registry_response(hub_response(&["v0.4.2", "v0.7.0"]).as_bytes());
        assert_eq!(tag.unwrap(), "v0.7.0");
    }

    #[test]
    fn test_latest_tag_happy_flow_reversed() {
        let tag = extract_latest_tag_from_registry_response(hub_response(&["v1.2.3", "v0.7.0"]).as_bytes());
        assert_eq!(tag.unwrap(), "v1.2.3");
    }

    #[test]
    fn test_latest_tag_skips_non_semver() {
        let tag = extract_latest_tag_from_registry_response(hub_response(&["latest", "v0.7.0"]).as_bytes());
        assert_eq!(tag.unwrap(), "v0.7.0");

        let tag = extract_latest_tag_from_registry_response(hub_response(&["experimental", "v0.7.0"]).as_bytes());
        assert_eq!(tag.unwrap(), "v0.7.0");
    }

    #[test]
    fn test_latest_tag_failures() {
        assert!(matches!(
            extract_latest_tag_from_registry_response(b""),
            Err(RegistryError::Malformed(_))
        ));
        assert_eq!(
            extract_latest_tag_from_registry_response(hub_response(&[]).as_bytes()),
            Err(RegistryError::NoValidTags)
        );
        assert!(extract_latest_tag_from_registry_response(br#"{"count": 2, "results": [{"name": "v0.4.2", "ima"#).is_err());
    }

    #[test]
    fn test_cmp_tags() {
        assert_eq!(cmp_tags("v1.2.3", "v1.2.3"), 0);
        assert!(cmp_tags("v1.2.3", "v1.2.0") > 0);
        assert!(cmp_tags("v1.2.3", "v1.1.3") > 0);
        assert!(cmp_tags("v2.1.3", "v1.2.3") > 0);
        assert!(cmp_tags("v1.2.0", "v1.2.3") < 0);
        assert!(cmp_tags("v1.1.3", "v1.2.3") < 0);
        assert!(cmp_tags("v1.2.3", "v2.1.3") < 0);
    }

    #[test]
    fn test_cmp_tags_unparsable() {
        assert!(cmp_tags("junk", "junk") < 0);
        assert!(cmp_tags("junk2", "junk1") < 0);
        assert!(cmp_tags("junk", "v1.2.3") < 0);
        assert!(cmp_tags("v1.2.3", "junk") > 0);
    }

    #[test]
    fn test_log_filter() {
        assert!(is_gamma_log_line("counter is now 5"));
        assert!(!is_gamma_log_line("2019 info transaction committed"));
        assert!(!is_gamma_log_line("error something broke"));
        assert!(!is_gamma_log_line("debug trace"));
        assert!(!is_gamma_log_line("\tat frame"));
        assert!(!is_gamma_log_line("] continuation"));
    }

    #[test]
    fn test_gamma_run_args() {
        let options = GlobalOptions {
            port: 9000,
            override_config: r#"{"a":1}"#.into(),
            ..GlobalOptions::default()
        };

        let args = DockerService::gamma(&options).run_args("v1.0.0");

        assert_eq!(
            args,
            vec![
                "run",
                "-d",
                "--name",
                "orbs-gamma-server",
                "-p",
                "9000:8080",
                "--network",
                "gamma",
                "orbsnetwork/gamma:v1.0.0",
                "./gamma-server",
                "-override-config",
                r#"{"a":1}"#,
            ]
        );
    }

    #[test]
    fn test_prism_run_args_carry_env() {
        let args = DockerService::prism().run_args("v0.5.0");

        assert!(args.contains(&"3000:3000".to_string()));
        assert!(args.contains(&"ORBS_URL=http://orbs-gamma-server:8080".to_string()));
        assert!(args.contains(&"ORBS_VIRTUAL_CHAIN_ID=42".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("orbsnetwork/prism:v0.5.0"));
    }

    #[test]
    fn test_registry_url() {
        assert_eq!(
            DockerService::prism().registry_tags_url(),
            "https://registry.hub.docker.com/v2/repositories/orbsnetwork/prism/tags/"
        );
    }

    #[test]
    fn test_started_banner_names_port() {
        let banner = started_banner(&DockerService::gamma(&GlobalOptions::default()), "v0.7.0");
        assert!(banner.contains("Orbs Gamma personal blockchain v0.7.0 is running!"));
        assert!(banner.contains("listening on port 8080"));
    }

    proptest! {
        #[test]
        fn prop_cmp_tags_antisymmetric(a in (0i64..50, 0i64..50, 0i64..50), b in (0i64..50, 0i64..50, 0i64..50)) {
            let t1 = format!("v{}.{}.{}", a.0, a.1, a.2);
            let t2 = format!("v{}.{}.{}", b.0, b.1, b.2);
            prop_assert_eq!(cmp_tags(&t1, &t2).signum(), -cmp_tags(&t2, &t1).signum());
            prop_assert_eq!(cmp_tags(&t1, &t2).signum(), (a.cmp(&b) as i64).signum());
        }
    }
}
