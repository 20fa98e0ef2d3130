//! Configuration module for the orders API.
//!
//! This module provides structures and utilities for managing service
//! configuration. It supports loading configuration from TOML files with
//! `${VAR}` / `${VAR:-default}` environment substitution and validates that
//! the referenced storage implementation is actually configured.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the orders API.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
	/// Identity of this service instance.
	#[serde(default)]
	pub service: ServiceConfig,
	/// Configuration for the HTTP API server.
	#[serde(default)]
	pub api: ApiConfig,
	/// Configuration for the order store.
	#[serde(default)]
	pub storage: StorageConfig,
}

/// Configuration specific to the service instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
	/// Identifier used in logs.
	#[serde(default = "default_service_id")]
	pub id: String,
}

impl Default for ServiceConfig {
	fn default() -> Self {
		Self {
			id: default_service_id(),
		}
	}
}

fn default_service_id() -> String {
	"orders-api".to_string()
}

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
	/// Maximum request body size in bytes.
	#[serde(default = "default_max_request_size")]
	pub max_request_size: usize,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			host: default_api_host(),
			port: default_api_port(),
			max_request_size: default_max_request_size(),
		}
	}
}

/// Returns the default API host.
fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

/// Returns the default API port.
fn default_api_port() -> u16 {
	5000
}

/// Returns the default maximum request size in bytes.
fn default_max_request_size() -> usize {
	1024 * 1024 // 1MB
}

/// Configuration for the order store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	#[serde(default)]
	pub implementations: HashMap<String, toml::Value>,
}

impl Default for StorageConfig {
	fn default() -> Self {
		let mut implementations = HashMap::new();
		implementations.insert(
			"memory".to_string(),
			toml::Value::Table(toml::map::Map::new()),
		);
		Self {
			primary: "memory".to_string(),
			implementations,
		}
	}
}

impl StorageConfig {
	/// Configuration table of the primary implementation.
	pub fn primary_config(&self) -> Option<&toml::Value> {
		self.implementations.get(&self.primary)
	}
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut missing = None;
	let resolved = re.replace_all(input, |caps: &regex::Captures| {
		let var_name = &caps[1];
		match (std::env::var(var_name), caps.get(2)) {
			(Ok(value), _) => value,
			(Err(_), Some(default)) => default.as_str().to_string(),
			(Err(_), None) => {
				missing.get_or_insert_with(|| var_name.to_string());
				String::new()
			},
		}
	});

	match missing {
		Some(var_name) => Err(ConfigError::Validation(format!(
			"Environment variable '{}' not found",
			var_name
		))),
		None => Ok(resolved.into_owned()),
	}
}

impl Config {
	/// Loads configuration from a file with environment variable resolution.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path).await?;
		content.parse()
	}

	/// Validates the configuration to ensure all required fields are properly set.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.service.id.is_empty() {
			return Err(ConfigError::Validation("Service ID cannot be empty".into()));
		}
		if self.api.port == 0 {
			return Err(ConfigError::Validation("API port cannot be 0".into()));
		}
		if self.storage.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Storage primary implementation cannot be empty".into(),
			));
		}
		if !self.storage.implementations.contains_key(&self.storage.primary) {
			return Err(ConfigError::Validation(format!(
				"Primary storage '{}' has no entry in [storage.implementations]",
				self.storage.primary
			)));
		}
		Ok(())
	}
}

/// Implementation of FromStr trait for Config to enable parsing from string.
///
/// Environment variables are resolved first, then the TOML is parsed and
/// validated.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("ORDERS_TEST_HOST", "0.0.0.0");

		let input = "host = \"${ORDERS_TEST_HOST}\"\nport = ${ORDERS_TEST_PORT_UNSET:-8080}";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "host = \"0.0.0.0\"\nport = 8080");

		std::env::remove_var("ORDERS_TEST_HOST");
	}

	#[test]
	fn test_missing_env_var_errors() {
		let result = resolve_env_vars("id = \"${ORDERS_TEST_DEFINITELY_UNSET}\"");
		assert!(
			matches!(result, Err(ConfigError::Validation(msg)) if msg.contains("ORDERS_TEST_DEFINITELY_UNSET"))
		);
	}

	#[test]
	fn test_defaults_apply_to_empty_file() {
		let config: Config = "".parse().unwrap();
		assert_eq!(config.service.id, "orders-api");
		assert_eq!(config.api.host, "127.0.0.1");
		assert_eq!(config.api.port, 5000);
		assert_eq!(config.storage.primary, "memory");
		assert!(config.storage.primary_config().is_some());
	}

	#[test]
	fn test_full_config() {
		let config: Config = r#"
[service]
id = "orders-demo"

[api]
host = "0.0.0.0"
port = 8080
max_request_size = 2048

[storage]
primary = "memory"
[storage.implementations.memory]
seed_file = "data/orders.json"
"#
		.parse()
		.unwrap();

		assert_eq!(config.service.id, "orders-demo");
		assert_eq!(config.api.port, 8080);
		assert_eq!(config.api.max_request_size, 2048);
		let memory = config.storage.primary_config().unwrap();
		assert_eq!(memory.get("seed_file").and_then(|v| v.as_str()), Some("data/orders.json"));
	}

	#[test]
	fn test_primary_must_be_configured() {
		let result: Result<Config, _> = r#"
[storage]
primary = "redis"
[storage.implementations.memory]
"#
		.parse();
		assert!(matches!(result, Err(ConfigError::Validation(msg)) if msg.contains("redis")));
	}

	#[test]
	fn test_zero_port_is_rejected() {
		let result: Result<Config, _> = "[api]\nport = 0".parse();
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_invalid_toml() {
		let result: Result<Config, _> = "[api\nport = 1".parse();
		assert!(matches!(result, Err(ConfigError::Parse(_))));
	}

	#[tokio::test]
	async fn test_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[api]\nport = 7000").unwrap();

		let config = Config::from_file(file.path().to_str().unwrap()).await.unwrap();
		assert_eq!(config.api.port, 7000);
	}

	#[tokio::test]
	async fn test_from_missing_file() {
		let result = Config::from_file("/nonexistent/orders.toml").await;
		assert!(matches!(result, Err(ConfigError::Io(_))));
	}
}
