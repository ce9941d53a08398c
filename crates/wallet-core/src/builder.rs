//! Assembles a [`RedirectWallet`] from configuration.

use crate::encoding::{JsonTransactionEncoder, TransactionEncoder};
use crate::environment::SessionEnvironment;
use crate::selector::KeySelector;
use crate::session::{RedirectSession, SessionSettings};
use crate::wallet::RedirectWallet;
use std::sync::Arc;
use tracing::info;
use wallet_account::{AccessKeyLedger, AccountLookup, RpcClient};
use wallet_config::{ConfigError, ConfigLoader};
use wallet_storage::{create_storage, KeyStore, StorageInterface, StorageKeyStore};
use wallet_types::{WalletConfig, WalletError};

/// Builder for a [`RedirectWallet`].
///
/// Only the configuration and the page environment are required. Every
/// other collaborator defaults to what the configuration describes: the
/// configured storage backend for both session data and keys, and the
/// configured RPC node for account and access key queries.
#[derive(Default)]
pub struct WalletBuilder {
	config: Option<WalletConfig>,
	config_path: Option<String>,
	environment: Option<Arc<dyn SessionEnvironment>>,
	storage: Option<Box<dyn StorageInterface>>,
	keystore: Option<Arc<dyn KeyStore>>,
	ledger: Option<Arc<dyn AccessKeyLedger>>,
	accounts: Option<Arc<dyn AccountLookup>>,
	encoder: Option<Box<dyn TransactionEncoder>>,
}

impl WalletBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_config(mut self, config: WalletConfig) -> Self {
		self.config = Some(config);
		self
	}

	pub fn with_config_file(mut self, path: impl Into<String>) -> Self {
		self.config_path = Some(path.into());
		self
	}

	pub fn with_environment(mut self, environment: Arc<dyn SessionEnvironment>) -> Self {
		self.environment = Some(environment);
		self
	}

	pub fn with_storage(mut self, storage: Box<dyn StorageInterface>) -> Self {
		self.storage = Some(storage);
		self
	}

	pub fn with_keystore(mut self, keystore: Arc<dyn KeyStore>) -> Self {
		self.keystore = Some(keystore);
		self
	}

	pub fn with_ledger(mut self, ledger: Arc<dyn AccessKeyLedger>) -> Self {
		self.ledger = Some(ledger);
		self
	}

	pub fn with_account_lookup(mut self, accounts: Arc<dyn AccountLookup>) -> Self {
		self.accounts = Some(accounts);
		self
	}

	pub fn with_encoder(mut self, encoder: Box<dyn TransactionEncoder>) -> Self {
		self.encoder = Some(encoder);
		self
	}

	/// Builds the wallet. Loading the session resolves a pending wallet
	/// callback in the current URL, so this may rewrite the page URL.
	pub async fn build(self) -> Result<RedirectWallet, WalletError> {
		let config = if let Some(config) = self.config {
			config
		} else if let Some(config_path) = self.config_path {
			ConfigLoader::new()
				.with_file(&config_path)
				.load()
				.await
				.map_err(|e| match e {
					ConfigError::FileNotFound(msg) => {
						WalletError::Config(format!("Config file not found: {}", msg))
					}
					ConfigError::ParseError(msg) => {
						WalletError::Config(format!("Config parse error: {}", msg))
					}
					ConfigError::ValidationError(msg) => {
						WalletError::Config(format!("Config validation error: {}", msg))
					}
					ConfigError::EnvVarNotFound(var) => {
						WalletError::Config(format!("Environment variable not found: {}", var))
					}
					ConfigError::IoError(e) => {
						WalletError::Config(format!("IO error reading config: {}", e))
					}
				})?
		} else {
			return Err(WalletError::Config(
				"No configuration or config file path provided".to_string(),
			));
		};

		let environment = self.environment.ok_or_else(|| {
			WalletError::Config("No session environment provided".to_string())
		})?;

		let (ledger, accounts) = match (self.ledger, self.accounts) {
			(Some(ledger), Some(accounts)) => (ledger, accounts),
			(ledger, accounts) => {
				let client = Arc::new(
					RpcClient::from_config(&config.network)
						.map_err(|e| WalletError::Config(format!("RPC client: {}", e)))?,
				);
				(
					ledger.unwrap_or_else(|| client.clone() as Arc<dyn AccessKeyLedger>),
					accounts.unwrap_or(client as Arc<dyn AccountLookup>),
				)
			}
		};

		let storage = self
			.storage
			.unwrap_or_else(|| create_storage(&config.storage));
		let keystore = self.keystore.unwrap_or_else(|| {
			Arc::new(StorageKeyStore::new(create_storage(&config.storage))) as Arc<dyn KeyStore>
		});
		let encoder = self
			.encoder
			.unwrap_or_else(|| Box::new(JsonTransactionEncoder) as Box<dyn TransactionEncoder>);

		let settings = SessionSettings::from_config(&config);
		info!(
			"Connecting to wallet {} on {} (key prefix {})",
			settings.wallet_url, settings.network_id, settings.app_key_prefix
		);

		let session = RedirectSession::load(settings, environment, storage, keystore, accounts).await?;

		Ok(RedirectWallet::new(session, KeySelector::new(ledger), encoder))
	}
}
