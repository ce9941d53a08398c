// wallet-config/src/lib.rs

use regex::Regex;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use url::Url;

use wallet_types::{StorageBackend, WalletConfig};

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
	file_path: Option<String>,
	env_prefix: String,
}

impl Default for ConfigLoader {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "WALLET_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_string_lossy().to_string());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	pub async fn load(&self) -> Result<WalletConfig, ConfigError> {
		let mut config = if let Some(file_path) = &self.file_path {
			self.load_from_file(file_path).await?
		} else {
			return Err(ConfigError::FileNotFound(
				"No configuration file specified".to_string(),
			));
		};

		self.apply_env_overrides(&mut config)?;
		validate_config(&config)?;

		Ok(config)
	}

	/// Parses and validates configuration text. `${VAR}` references are
	/// substituted, but no prefixed environment overrides are applied.
	pub fn from_toml(content: &str) -> Result<WalletConfig, ConfigError> {
		let config = parse(&substitute_env_vars(content)?)?;
		validate_config(&config)?;
		Ok(config)
	}

	async fn load_from_file(&self, file_path: &str) -> Result<WalletConfig, ConfigError> {
		if !tokio::fs::try_exists(file_path).await? {
			return Err(ConfigError::FileNotFound(file_path.to_string()));
		}
		debug!("Loading configuration from {}", file_path);

		let content = tokio::fs::read_to_string(file_path).await?;
		parse(&substitute_env_vars(&content)?)
	}

	fn apply_env_overrides(&self, config: &mut WalletConfig) -> Result<(), ConfigError> {
		if let Ok(log_level) = env::var(format!("{}LOG_LEVEL", self.env_prefix)) {
			config.logging.level = log_level;
		}

		if let Ok(network_id) = env::var(format!("{}NETWORK_ID", self.env_prefix)) {
			config.network.network_id = network_id;
		}

		if let Ok(node_url) = env::var(format!("{}NODE_URL", self.env_prefix)) {
			config.network.node_url = parse_url("node URL", &node_url)?;
		}

		if let Ok(wallet_url) = env::var(format!("{}WALLET_URL", self.env_prefix)) {
			config.network.wallet_url = parse_url("wallet URL", &wallet_url)?;
		}

		Ok(())
	}
}

fn parse(content: &str) -> Result<WalletConfig, ConfigError> {
	toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn parse_url(what: &str, value: &str) -> Result<Url, ConfigError> {
	Url::parse(value).map_err(|e| ConfigError::ValidationError(format!("Invalid {}: {}", what, e)))
}

fn substitute_env_vars(content: &str) -> Result<String, ConfigError> {
	let mut result = content.to_string();

	let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::ParseError(e.to_string()))?;

	for cap in re.captures_iter(content) {
		let full_match = &cap[0];
		let var_name = &cap[1];

		let env_value =
			env::var(var_name).map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

		result = result.replace(full_match, &env_value);
	}

	Ok(result)
}

fn validate_config(config: &WalletConfig) -> Result<(), ConfigError> {
	if config.network.network_id.trim().is_empty() {
		return Err(ConfigError::ValidationError(
			"network.network_id must not be empty".to_string(),
		));
	}

	for (name, url) in [
		("network.node_url", &config.network.node_url),
		("network.wallet_url", &config.network.wallet_url),
	] {
		if !matches!(url.scheme(), "http" | "https") {
			return Err(ConfigError::ValidationError(format!(
				"{} must be an http(s) URL, got {}",
				name, url
			)));
		}
	}

	if config.network.timeout_ms == 0 {
		return Err(ConfigError::ValidationError(
			"network.timeout_ms must be positive".to_string(),
		));
	}

	if config.storage.backend == StorageBackend::File
		&& !config.storage.path.as_deref().is_some_and(|p| !p.is_empty())
	{
		return Err(ConfigError::ValidationError(
			"storage.path is required for the file backend".to_string(),
		));
	}

	Ok(())
}
