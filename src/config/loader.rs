//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid environment variable {name}: {reason}")]
    InvalidEnvVar { name: &'static str, reason: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, then apply process
/// environment overrides and the command-line `port`, and validate.
pub fn load_config(path: Option<&Path>, port: Option<u16>) -> Result<AppConfig, ConfigError> {
    let config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => AppConfig::default(),
    };

    resolve_config(config, |name| std::env::var(name).ok(), port)
}

/// Layer environment overrides, then `port`, onto `config` and validate
/// the result.
pub fn resolve_config<F>(
    mut config: AppConfig,
    lookup: F,
    port: Option<u16>,
) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    apply_env_overrides(&mut config, lookup)?;
    if let Some(port) = port {
        config.listener.port = port;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse TOML text into a configuration without validating it.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Override file values with `PORT`, `HOST`, `API_KEY` and `LOG_LEVEL`.
///
/// `lookup` abstracts the environment so tests do not touch process state.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        config.listener.port = port.parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::InvalidEnvVar {
                name: "PORT",
                reason: e.to_string(),
            }
        })?;
    }
    if let Some(host) = lookup("HOST") {
        config.listener.host = host;
    }
    if let Some(api_key) = lookup("API_KEY") {
        config.auth.api_key = Some(api_key);
    }
    if let Some(level) = lookup("LOG_LEVEL") {
        config.observability.log_level = level;
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
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = parse_config("[listener]\nport = 8080\n").unwrap();
        apply_env_overrides(&mut config, env(&[("PORT", "4000"), ("API_KEY", "abc")])).unwrap();

        assert_eq!(config.listener.port, 4000);
        assert_eq!(config.auth.api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_invalid_port() {
        let mut config = AppConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { name: "PORT", .. }));
    }

    #[test]
    fn test_no_env_keeps_values() {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, env(&[])).unwrap();
        assert_eq!(config.listener.port, 3000);
        assert!(config.auth.api_key.is_none());
    }

    #[test]
    fn test_command_line_port_wins_over_env() {
        let config = resolve_config(AppConfig::default(), env(&[("PORT", "4000")]), Some(5000))
            .unwrap();
        assert_eq!(config.listener.port, 5000);

        let config = resolve_config(AppConfig::default(), env(&[("PORT", "4000")]), None).unwrap();
        assert_eq!(config.listener.port, 4000);
    }

    #[test]
    fn test_command_line_port_is_validated() {
        let err = resolve_config(AppConfig::default(), env(&[]), Some(0)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation(ref errors) if errors == &[ValidationError::ZeroPort]
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            parse_config("[listener\nport = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation_message_lists_errors() {
        let err = ConfigError::Validation(vec![
            ValidationError::ZeroPort,
            ValidationError::ZeroTimeout,
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: listener.port must be non-zero, limits.request_timeout_secs must be greater than 0"
        );
    }
}
