//! File names, environment ids, docker names and timeouts.

use std::time::Duration;

/// Reported by `version`.
pub const GAMMA_CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const CONFIG_FILENAME: &str = "orbs-gamma-config.json";
pub const TEST_KEYS_FILENAME: &str = "orbs-test-keys.json";

pub const LOCAL_ENV_ID: &str = "local";
pub const EXPERIMENTAL_ENV_ID: &str = "experimental";

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SIGNER: &str = "user1";
pub const DEFAULT_VIRTUAL_CHAIN: u32 = 42;
pub const LOCALHOST_ENDPOINT: &str = "localhost";

// Docker
pub const DOCKER_NETWORK: &str = "gamma";
pub const DOCKER_TAG_EXPERIMENTAL: &str = "experimental";
pub const DOCKER_REGISTRY_TAGS_URL: &str = "https://registry.hub.docker.com/v2/repositories";

pub const GAMMA_NAME: &str = "Orbs Gamma personal blockchain";
pub const GAMMA_IMAGE: &str = "orbsnetwork/gamma";
pub const GAMMA_CONTAINER: &str = "orbs-gamma-server";
pub const GAMMA_CONTAINER_PORT: u16 = 8080;

pub const PRISM_NAME: &str = "Prism blockchain explorer";
pub const PRISM_IMAGE: &str = "orbsnetwork/prism";
pub const PRISM_CONTAINER: &str = "orbs-gamma-prism";
pub const PRISM_PORT: u16 = 3000;

// Readiness
pub const IS_READY_TOTAL_WAIT_TIMEOUT: Duration = Duration::from_secs(20);
pub const IS_READY_POLLING_INTERVAL: Duration = Duration::from_millis(500);

// Node client
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// System contracts
pub const DEPLOY_SYSTEM_CONTRACT_NAME: &str = "_Deployments";
pub const DEPLOY_SYSTEM_METHOD_NAME: &str = "deployService";
pub const DEPLOY_GET_INFO_SYSTEM_METHOD_NAME: &str = "getInfo";
pub const PROCESSOR_TYPE_NATIVE: u32 = 1;
