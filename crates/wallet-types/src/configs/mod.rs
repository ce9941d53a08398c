//! # Configuration Types
//!
//! Configuration structures for the wallet connection: which network and
//! wallet service to talk to, how the application namespaces its persisted
//! state, where that state lives and how logging is set up.

use serde::{Deserialize, Serialize};
use url::Url;

/// Root configuration object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletConfig {
	/// Chain network and wallet endpoints
	pub network: NetworkConfig,
	/// Application namespace settings
	#[serde(default)]
	pub app: AppConfig,
	/// Persistence backend for session state and keys
	#[serde(default)]
	pub storage: StorageConfig,
	/// Logging settings for the CLI
	#[serde(default)]
	pub logging: LoggingConfig,
}

/// Network and wallet service endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
	/// Network identifier keys are stored under, e.g. `testnet`
	pub network_id: String,
	/// JSON-RPC endpoint used for access key and account queries
	pub node_url: Url,
	/// Base URL of the wallet service users are redirected to
	pub wallet_url: Url,
	/// HTTP timeout for RPC calls
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
}

/// Application namespace settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
	/// Prefix for the persisted auth data key
	pub key_prefix: Option<String>,
	/// The application's own contract, used as a fallback prefix
	pub contract_name: Option<String>,
}

impl AppConfig {
	/// Resolves the prefix: explicit prefix, then contract name, then
	/// `default`. Empty strings count as unset.
	pub fn resolved_key_prefix(&self) -> String {
		self.key_prefix
			.as_deref()
			.filter(|p| !p.is_empty())
			.or_else(|| self.contract_name.as_deref().filter(|c| !c.is_empty()))
			.unwrap_or("default")
			.to_string()
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
	#[default]
	Memory,
	File,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
	#[serde(default)]
	pub backend: StorageBackend,
	/// Base directory for the file backend
	pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
	#[serde(default = "default_log_level")]
	pub level: String,
	#[serde(default)]
	pub json: bool,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: default_log_level(),
			json: false,
		}
	}
}

fn default_timeout_ms() -> u64 {
	10_000
}

fn default_log_level() -> String {
	"info".to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_key_prefix_resolution() {
		let mut app = AppConfig::default();
		assert_eq!(app.resolved_key_prefix(), "default");

		app.contract_name = Some("app.testnet".to_string());
		assert_eq!(app.resolved_key_prefix(), "app.testnet");

		app.key_prefix = Some("my-app".to_string());
		assert_eq!(app.resolved_key_prefix(), "my-app");

		app.key_prefix = Some(String::new());
		assert_eq!(app.resolved_key_prefix(), "app.testnet");
	}
}
