//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the signing key.
pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";
/// Environment variable overriding the RPC endpoint.
pub const RPC_URL_ENV_VAR: &str = "RPC_URL";
/// Environment variable overriding the listen port.
pub const PORT_ENV_VAR: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, message: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, message } => write!(f, "Invalid {}: {}", var, message),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from an optional TOML file, then apply environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => ServiceConfig::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides using the given lookup.
///
/// The private key is only ever read here. Empty values count as unset.
pub fn apply_env<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = get(PRIVATE_KEY_ENV_VAR) {
        config.signer.private_key = Some(key);
    }

    if let Some(url) = get(RPC_URL_ENV_VAR) {
        config.blockchain.rpc_url = url.trim().to_string();
    }

    if let Some(port) = get(PORT_ENV_VAR) {
        config.listener.port = port.trim().parse().map_err(|e| ConfigError::Env {
            var: PORT_ENV_VAR,
            message: format!("'{}' is not a port: {}", port, e),
        })?;
    }

    let production = ["APP_ENV", "NODE_ENV"]
        .iter()
        .filter_map(|key| get(*key))
        .any(|value| value.trim().eq_ignore_ascii_case("production"));
    if production {
        config.runtime.production = true;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServiceConfig::default();
        apply_env(
            &mut config,
            env(&[
                ("PRIVATE_KEY", "abc"),
                ("RPC_URL", "http://localhost:8545"),
                ("PORT", "8080"),
                ("NODE_ENV", "production"),
            ]),
        )
        .unwrap();

        assert_eq!(config.signer.private_key.as_deref(), Some("abc"));
        assert_eq!(config.blockchain.rpc_url, "http://localhost:8545");
        assert_eq!(config.listener.port, 8080);
        assert!(config.runtime.production);
    }

    #[test]
    fn test_empty_env_is_ignored() {
        let mut config = ServiceConfig::default();
        apply_env(&mut config, env(&[("RPC_URL", "  "), ("PRIVATE_KEY", "")])).unwrap();
        assert_eq!(config.blockchain.rpc_url, "https://mainnet.base.org");
        assert!(config.signer.private_key.is_none());
    }

    #[test]
    fn test_bad_port() {
        let mut config = ServiceConfig::default();
        let err = apply_env(&mut config, env(&[("PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config(Some(Path::new("/nonexistent/transfer-api.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
