//! CLI error type.
//!
//! Every variant renders as the message shown to the user after
//! `ERROR:`; `main` maps all of them to exit status 2.

use std::io;
use std::path::PathBuf;

use gamma_crypto::CryptoError;
use gamma_jsoncodec::CodecError;
use thiserror::Error;

use crate::api::ApiError;

/// Errors surfaced by commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Usage was printed; nothing else to report.
    #[error("usage requested")]
    HelpShown,

    // ── Dispatcher ──────────────────────────────────────────────────────
    #[error("Command '{0}' not found, run 'gamma-cli help' to see available commands.")]
    UnknownCommand(String),

    #[error("Command '{command}' is missing required arguments [{}].", .required.join(" "))]
    MissingArguments { command: String, required: Vec<String> },

    #[error("Command '{command}' argument {position} should be {expected}.")]
    BadArgument {
        command: String,
        position: usize,
        expected: String,
    },

    #[error("Invalid options.\n\n{0}")]
    InvalidOptions(String),

    // ── Config ──────────────────────────────────────────────────────────
    #[error("Could not open config file '{}' containing environment details.\n\n{source}", .path.display())]
    ConfigOpen { path: PathBuf, source: io::Error },

    #[error("Failed parsing config json file '{}'.\n\n{source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Key 'Environments' does not contain data in config file '{}'.", .path.display())]
    ConfigEmpty { path: PathBuf },

    #[error("Environment with id '{env}' not found in config file '{}'.", .path.display())]
    EnvironmentNotFound { env: String, path: PathBuf },

    #[error("Environment Endpoints key does not contain any endpoints.")]
    NoEndpoints,

    #[error("Local Gamma server is not running, use 'gamma-cli start-local' to start it.")]
    LocalServerNotRunning,

    // ── Keys ────────────────────────────────────────────────────────────
    #[error("Could not encode keys to json.\n\n{0}")]
    KeysEncode(serde_json::Error),

    #[error("Could not write keys to file.\n\n{0}")]
    KeysWrite(io::Error),

    #[error("Could not open keys file '{}'.\n\n{source}", .path.display())]
    KeysOpen { path: PathBuf, source: io::Error },

    #[error("Failed parsing keys json file '{}'. Try deleting the key file to have it automatically recreated.\n\n{source}", .path.display())]
    KeysParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Key with id '{id}' not found in key file '{}'.", .path.display())]
    KeyNotFound { id: String, path: PathBuf },

    #[error("Could not parse hex string in key '{id}'. Try deleting the key file '{}' to have it automatically recreated.\n\n{source}", .path.display())]
    KeyHex {
        id: String,
        path: PathBuf,
        source: CryptoError,
    },

    // ── Requests ────────────────────────────────────────────────────────
    #[error("Could not open input file.\n\n{0}")]
    InputOpen(io::Error),

    #[error("Failed parsing input json file '{}'.\n\n{source}", .path.display())]
    InputParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Could not find path\n\n{0}")]
    SourceNotFound(io::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Could not encode payload of the message about to be sent to server.\n\n{0}")]
    Payload(#[from] CryptoError),

    #[error("Cannot connect to server at endpoint {endpoint}\n\nPlease check that:\n - The server is started and running (if just started, may need a second to initialize).\n - The server is accessible over the network.\n - The endpoint is properly configured if a config file is used.")]
    NoConnection { endpoint: String },

    #[error("Request {command} failed on server.\n\n{source}")]
    RequestFailed {
        command: &'static str,
        source: ApiError,
    },

    #[error("Could not encode {command} response to json.\n\n{source}")]
    ResponseEncode {
        command: &'static str,
        source: serde_json::Error,
    },

    // ── Docker ──────────────────────────────────────────────────────────
    #[error("Docker is required but not running. Is it installed on your machine?\n\nInstall from:  {install_url}")]
    DockerNotInstalled { install_url: &'static str },

    #[error("Could not exec 'docker run' command.\n\n{0}")]
    DockerRun(String),

    #[error("Could not run docker image.")]
    ContainerNotStarted,

    #[error("Could not stop docker container.")]
    ContainerNotStopped,

    #[error("Could not download docker image.")]
    ImageDownload,

    #[error("could not create docker network {network}: {reason}")]
    DockerNetwork { network: &'static str, reason: String },

    #[error("could not read gamma server docker logs: {0}")]
    DockerLogs(io::Error),

    #[error("Cannot connect to docker registry to get image list.")]
    RegistryConnect(#[source] reqwest::Error),

    #[error("Bad image list response from docker registry.")]
    RegistryBadResponse,

    #[error("Cannot parse image list response from docker registry.")]
    RegistryParse(#[source] RegistryError),
}

/// Docker Hub tag list problems.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("malformed tag list: {0}")]
    Malformed(String),

    #[error("no valid tags found")]
    NoValidTags,
}

/// Result alias for command handlers.
pub type Result<T> = std::result::Result<T, CliError>;
