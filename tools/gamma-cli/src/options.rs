//! Global options shared by every command.
//!
//! Options use single-dash long names (`-port 8080`, `-wait`,
//! `-env=experimental`). They are rewritten to `--name=value` form and
//! handed to clap; switches never consume the following token.

use std::path::PathBuf;

use clap::builder::{OsStringValueParser, TypedValueParser};
use clap::{ArgAction, Parser};

use crate::constants::{CONFIG_FILENAME, DEFAULT_PORT, DEFAULT_SIGNER, LOCAL_ENV_ID, TEST_KEYS_FILENAME};
use crate::error::{CliError, Result};

/// Number of `-argN` overrides.
pub const ARG_OVERRIDE_COUNT: usize = 9;

/// Option descriptor used to render usage.
#[derive(Debug, Clone, Copy)]
pub struct FlagInfo {
    pub name: &'static str,
    /// Value placeholder, empty for switches.
    pub value_name: &'static str,
    pub usage: &'static str,
    /// Rendered when set.
    pub default: Option<&'static str>,
}

/// Options listed by `help`, alphabetical. `-argN` are not listed.
pub static FLAGS: &[FlagInfo] = &[
    FlagInfo {
        name: "config",
        value_name: "string",
        usage: "path to config file",
        default: Some(CONFIG_FILENAME),
    },
    FlagInfo {
        name: "env",
        value_name: "string",
        usage: "environment from config file containing server connection details",
        default: Some(LOCAL_ENV_ID),
    },
    FlagInfo {
        name: "keys",
        value_name: "string",
        usage: "name of the json file containing test keys",
        default: Some(TEST_KEYS_FILENAME),
    },
    FlagInfo {
        name: "name",
        value_name: "string",
        usage: "name of the smart contract being deployed",
        default: None,
    },
    FlagInfo {
        name: "no-ui",
        value_name: "",
        usage: "do not start Prism blockchain explorer",
        default: None,
    },
    FlagInfo {
        name: "override-config",
        value_name: "string",
        usage: "json string with config overrides for the Gamma server",
        default: None,
    },
    FlagInfo {
        name: "port",
        value_name: "int",
        usage: "listening port for Gamma server",
        default: Some("8080"),
    },
    FlagInfo {
        name: "signer",
        value_name: "string",
        usage: "id of the signing key from the test key json",
        default: Some(DEFAULT_SIGNER),
    },
    FlagInfo {
        name: "wait",
        value_name: "",
        usage: "wait until Gamma server is ready and listening",
        default: None,
    },
];

/// Parsed options.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "gamma-cli",
    no_binary_name = true,
    args_override_self = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct GlobalOptions {
    /// listening port for Gamma server
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// id of the signing key from the test key json
    #[arg(long, default_value = DEFAULT_SIGNER)]
    pub signer: String,

    /// name of the smart contract being deployed
    #[arg(long, default_value = "")]
    pub name: String,

    /// name of the json file containing test keys
    #[arg(long, default_value = TEST_KEYS_FILENAME, value_parser = OsStringValueParser::new().map(PathBuf::from))]
    pub keys: PathBuf,

    /// path to config file
    #[arg(long, default_value = CONFIG_FILENAME)]
    pub config: PathBuf,

    /// environment from config file containing server connection details
    #[arg(long, default_value = LOCAL_ENV_ID)]
    pub env: String,

    /// wait until Gamma server is ready and listening
    #[arg(long, action = ArgAction::SetTrue)]
    pub wait: bool,

    /// do not start Prism blockchain explorer
    #[arg(long = "no-ui", action = ArgAction::SetTrue)]
    pub no_ui: bool,

    /// json string with config overrides for the Gamma server
    #[arg(long = "override-config", default_value = "")]
    pub override_config: String,

    #[arg(long, hide = true, allow_hyphen_values = true)]
    pub arg1: Option<String>,
    #[arg(long, hide = true, allow_hyphen_values = true)]
    pub arg2: Option<String>,
    #[arg(long, hide = true, allow_hyphen_values = true)]
    pub arg3: Option<String>,
    #[arg(long, hide = true, allow_hyphen_values = true)]
    pub arg4: Option<String>,
    #[arg(long, hide = true, allow_hyphen_values = true)]
    pub arg5: Option<String>,
    #[arg(long, hide = true, allow_hyphen_values = true)]
    pub arg6: Option<String>,
    #[arg(long, hide = true, allow_hyphen_values = true)]
    pub arg7: Option<String>,
    #[arg(long, hide = true, allow_hyphen_values = true)]
    pub arg8: Option<String>,
    #[arg(long, hide = true, allow_hyphen_values = true)]
    pub arg9: Option<String>,

    /// Positionals after the options; ignored.
    #[arg(hide = true)]
    pub trailing: Vec<String>,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            signer: DEFAULT_SIGNER.to_string(),
            name: String::new(),
            keys: PathBuf::from(TEST_KEYS_FILENAME),
            config: PathBuf::from(CONFIG_FILENAME),
            env: LOCAL_ENV_ID.to_string(),
            wait: false,
            no_ui: false,
            override_config: String::new(),
            arg1: None,
            arg2: None,
            arg3: None,
            arg4: None,
            arg5: None,
            arg6: None,
            arg7: None,
            arg8: None,
            arg9: None,
            trailing: Vec::new(),
        }
    }
}

impl GlobalOptions {
    /// `-arg1`..`-arg9`, in order.
    pub fn arg_overrides(&self) -> [Option<String>; ARG_OVERRIDE_COUNT] {
        [
            self.arg1.clone(),
            self.arg2.clone(),
            self.arg3.clone(),
            self.arg4.clone(),
            self.arg5.clone(),
            self.arg6.clone(),
            self.arg7.clone(),
            self.arg8.clone(),
            self.arg9.clone(),
        ]
    }

    /// Keys file path, falling back to the default name when blank.
    pub fn keys_path(&self) -> PathBuf {
        if self.keys.as_os_str().is_empty() {
            PathBuf::from(TEST_KEYS_FILENAME)
        } else {
            self.keys.clone()
        }
    }
}

/// Parse the options that follow a command and its positionals.
pub fn parse_flags<S: AsRef<str>>(args: &[S]) -> Result<GlobalOptions> {
    let normalized = normalize_flags(args)?;
    GlobalOptions::try_parse_from(normalized).map_err(|e| CliError::InvalidOptions(e.to_string().trim_end().to_string()))
}

/// Rewrite known options to clap's `--name=value` form.
///
/// A value option takes the next token verbatim, even when it looks like
/// an option. A switch takes no token; `-wait=false` drops it. Tokens
/// that are not known options pass through untouched.
pub fn normalize_flags<S: AsRef<str>>(args: &[S]) -> Result<Vec<String>> {
    let mut out = Vec::with_capacity(args.len());
    let mut tokens = args.iter().map(|arg| arg.as_ref());

    while let Some(token) = tokens.next() {
        let Some((name, value)) = split_flag(token) else {
            out.push(token.to_string());
            continue;
        };

        match flag_kind(name) {
            None => out.push(token.to_string()),
            Some(FlagKind::Switch) => match value {
                None => out.push(format!("--{}", name)),
                Some(value) => {
                    if parse_bool_value(value).ok_or_else(|| invalid_bool(name, value))? {
                        out.push(format!("--{}", name));
                    }
                }
            },
            Some(FlagKind::Value) => match value.or_else(|| tokens.next()) {
                Some(value) => out.push(format!("--{}={}", name, value)),
                // clap reports the missing value
                None => out.push(format!("--{}", name)),
            },
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagKind {
    Switch,
    Value,
}

/// `-name`, `--name`, `-name=value` into name and optional value.
fn split_flag(token: &str) -> Option<(&str, Option<&str>)> {
    let body = token.strip_prefix("--").or_else(|| token.strip_prefix('-'))?;
    if body.is_empty() || body.starts_with('-') {
        return None;
    }
    Some(match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    })
}

fn flag_kind(name: &str) -> Option<FlagKind> {
    if let Some(flag) = FLAGS.iter().find(|flag| flag.name == name) {
        return Some(if flag.value_name.is_empty() {
            FlagKind::Switch
        } else {
            FlagKind::Value
        });
    }
    let is_override = name
        .strip_prefix("arg")
        .and_then(|n| n.parse::<usize>().ok())
        .is_some_and(|n| (1..=ARG_OVERRIDE_COUNT).contains(&n));
    is_override.then_some(FlagKind::Value)
}

/// Boolean spellings accepted for switches.
fn parse_bool_value(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

fn invalid_bool(name: &str, value: &str) -> CliError {
    CliError::InvalidOptions(format!("invalid boolean value \"{}\" for -{}", value, name))
}
