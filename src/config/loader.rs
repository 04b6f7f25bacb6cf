//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::DeployerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[source] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<DeployerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Start from `path` (or the defaults when there is none), apply `overrides`,
/// then validate the result.
pub fn load_with_overrides(
    path: Option<&Path>,
    overrides: impl FnOnce(&mut DeployerConfig),
) -> Result<DeployerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => DeployerConfig::default(),
    };
    overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<DeployerConfig, ConfigError> {
    load_with_overrides(Some(path), |_| {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[deploy]\nchain_name = \"casper-net-1\"\ngas_price = 2").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.deploy.chain_name, "casper-net-1");
        assert_eq!(config.deploy.gas_price, 2);
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/deployer.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[deploy\nchain_name = 3").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_message() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[deploy]\npayment_amount = 0\ngas_price = 0").unwrap();
        let err = load_config(file.path()).unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("Validation failed: "));
        assert!(text.contains("deploy.payment_amount"));
        assert!(text.contains("deploy.gas_price"));
    }

    #[test]
    fn test_overrides_are_validated() {
        let config = load_with_overrides(None, |c| c.deploy.gas_price = 3).unwrap();
        assert_eq!(config.deploy.gas_price, 3);
        assert_eq!(config.deploy.chain_name, "casper-test");

        let err = load_with_overrides(None, |c| c.node.rpc_url = "nope".to_string()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;

        let err = read_config(Path::new("/nonexistent/deployer.toml")).unwrap_err();
        assert!(err.to_string().starts_with("IO error: "));
        assert!(err.source().is_some());
    }
}
