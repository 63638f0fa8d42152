//! Environment resolution.
//!
//! The `local` and `experimental` environments have built-in defaults
//! that are used whenever the config file cannot supply them; any other
//! environment id must be defined in the file.

use std::fs;
use std::path::Path;

use gamma_jsoncodec::{parse_conf_file, ConfEnv};
use tracing::debug;

use crate::constants::{DEFAULT_VIRTUAL_CHAIN, EXPERIMENTAL_ENV_ID, LOCALHOST_ENDPOINT, LOCAL_ENV_ID};
use crate::docker::{is_container_running, DockerService};
use crate::error::{CliError, Result};
use crate::is_ready::is_port_listening;
use crate::options::GlobalOptions;

/// Built-in environment for `local` / `experimental`.
pub fn default_config_for_env(env: &str) -> Option<ConfEnv> {
    let experimental = match env {
        LOCAL_ENV_ID => false,
        EXPERIMENTAL_ENV_ID => true,
        _ => return None,
    };
    Some(ConfEnv {
        virtual_chain: DEFAULT_VIRTUAL_CHAIN,
        endpoints: vec![LOCALHOST_ENDPOINT.to_string()],
        experimental,
    })
}

/// Load environment `env` from the config file at `path`.
pub fn environment_from_config_file(path: &Path, env: &str) -> Result<ConfEnv> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(source) => {
            debug!(path = %path.display(), error = %source, "config file not readable");
            return default_config_for_env(env).ok_or_else(|| CliError::ConfigOpen {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let mut conf = parse_conf_file(&bytes).map_err(|source| CliError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;

    if conf.environments.is_empty() {
        return default_config_for_env(env).ok_or_else(|| CliError::ConfigEmpty {
            path: path.to_path_buf(),
        });
    }

    match conf.environments.remove(env) {
        Some(found) => Ok(found),
        None => default_config_for_env(env).ok_or_else(|| CliError::EnvironmentNotFound {
            env: env.to_string(),
            path: path.to_path_buf(),
        }),
    }
}

/// Environment selected by `-env` / `-config`.
pub fn selected_environment(options: &GlobalOptions) -> Result<ConfEnv> {
    environment_from_config_file(&options.config, &options.env)
}

/// Whether docker images should track the `experimental` tag.
pub fn is_experimental(options: &GlobalOptions) -> Result<bool> {
    match options.env.as_str() {
        LOCAL_ENV_ID => Ok(false),
        EXPERIMENTAL_ENV_ID => Ok(true),
        _ => Ok(selected_environment(options)?.experimental),
    }
}

/// Map the environment's first endpoint to a URL.
///
/// `localhost` stands for the local Gamma container and requires it to
/// be up (container running or its port taken).
pub async fn resolve_endpoint(env: &ConfEnv, options: &GlobalOptions) -> Result<String> {
    let endpoint = env.endpoints.first().ok_or(CliError::NoEndpoints)?;
    if endpoint != LOCALHOST_ENDPOINT {
        return Ok(endpoint.clone());
    }

    let gamma = DockerService::gamma(options);
    if !is_container_running(gamma.container_name).await && !is_port_listening(gamma.port).await {
        return Err(CliError::LocalServerNotRunning);
    }
    Ok(local_endpoint(gamma.port))
}

/// URL of a Gamma server on this machine.
pub fn local_endpoint(port: u16) -> String {
    format!("http://localhost:{}", port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults() {
        let local = default_config_for_env("local").unwrap();
        assert_eq!(local.virtual_chain, 42);
        assert_eq!(local.endpoints, vec!["localhost"]);
        assert!(!local.experimental);

        assert!(default_config_for_env("experimental").unwrap().experimental);
        assert!(default_config_for_env("mainnet").is_none());
    }

    #[tokio::test]
    async fn test_remote_endpoint_used_verbatim() {
        let env = ConfEnv {
            virtual_chain: 1,
            endpoints: vec!["http://node1:8080".into(), "http://node2:8080".into()],
            experimental: false,
        };

        let endpoint = resolve_endpoint(&env, &GlobalOptions::default()).await.unwrap();

        assert_eq!(endpoint, "http://node1:8080");
    }

    #[tokio::test]
    async fn test_empty_endpoints_rejected() {
        let env = ConfEnv::default();
        assert!(matches!(
            resolve_endpoint(&env, &GlobalOptions::default()).await,
            Err(CliError::NoEndpoints)
        ));
    }

    #[test]
    fn test_local_endpoint_format() {
        assert_eq!(local_endpoint(8080), "http://localhost:8080");
    }
}
