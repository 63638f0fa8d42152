//! Config file format (`orbs-gamma-config.json`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Top-level config file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfFile {
    /// Environments by id.
    #[serde(default)]
    pub environments: HashMap<String, ConfEnv>,
}

/// One environment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfEnv {
    /// Virtual chain id.
    #[serde(default)]
    pub virtual_chain: u32,
    /// Node endpoints, the first one is used.
    #[serde(default)]
    pub endpoints: Vec<String>,
    /// Track the floating `experimental` image tag.
    #[serde(default)]
    pub experimental: bool,
}

/// Parse a config file.
pub fn parse_conf_file(bytes: &[u8]) -> Result<ConfFile, serde_json::Error> {
    // `null` is valid JSON and reads as an empty file
    let conf: Option<ConfFile> = serde_json::from_slice(bytes)?;
    Ok(conf.unwrap_or_default())
}
