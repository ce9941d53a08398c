//! Sign-in session and the two redirect legs.
//!
//! The outbound leg ([`RedirectSession::start_sign_in`]) sends the user to the
//! wallet's login page, optionally after generating a pending access key. The
//! inbound leg ([`RedirectSession::complete_sign_in`]) runs when the page is
//! loaded again with the wallet's callback parameters: it records the
//! identity, promotes the pending key and cleans the URL.

use crate::encoding::transactions_param;
use crate::environment::SessionEnvironment;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::{form_urlencoded, Url};
use wallet_account::AccountLookup;
use wallet_storage::{KeyStore, StorageError, StorageInterface, StorageService};
use wallet_types::{AccountId, Identity, KeyPair, PublicKey, WalletConfig, WalletError};

const LOGIN_WALLET_URL_SUFFIX: &str = "login/";
const SIGN_WALLET_URL_SUFFIX: &str = "sign";
const AUTH_DATA_KEY_SUFFIX: &str = "_wallet_auth_key";
const SESSION_NAMESPACE: &str = "session";

/// Key store identity prefix for keys generated before the wallet confirmed
/// them.
pub const PENDING_ACCESS_KEY_PREFIX: &str = "pending_key";

/// Query parameters the wallet appends to callbacks. All of them are removed
/// from the page URL once read.
pub const CALLBACK_PARAMS: [&str; 5] = [
	"public_key",
	"all_keys",
	"account_id",
	"meta",
	"transactionHashes",
];

/// Static settings of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
	pub network_id: String,
	pub wallet_url: Url,
	pub app_key_prefix: String,
}

impl SessionSettings {
	pub fn from_config(config: &WalletConfig) -> Self {
		Self {
			network_id: config.network.network_id.clone(),
			wallet_url: config.network.wallet_url.clone(),
			app_key_prefix: config.app.resolved_key_prefix(),
		}
	}

	/// Storage key of the persisted identity.
	pub fn auth_data_key(&self) -> String {
		format!("{}{}", self.app_key_prefix, AUTH_DATA_KEY_SUFFIX)
	}
}

/// Observable state of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
	SignedOut,
	SignedIn(Identity),
}

/// Options for the outbound sign-in redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInOptions {
	/// Contract the application wants a function call key for.
	pub contract_id: Option<AccountId>,
	/// Methods the key may call. Empty means any method. Only sent along
	/// with a contract.
	pub method_names: Vec<String>,
	pub success_url: Option<String>,
	pub failure_url: Option<String>,
}

impl SignInOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_contract(mut self, contract_id: impl Into<AccountId>) -> Self {
		self.contract_id = Some(contract_id.into());
		self
	}

	pub fn with_method_names<I, S>(mut self, method_names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.method_names = method_names.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_success_url(mut self, url: impl Into<String>) -> Self {
		self.success_url = Some(url.into());
		self
	}

	pub fn with_failure_url(mut self, url: impl Into<String>) -> Self {
		self.failure_url = Some(url.into());
		self
	}
}

/// Callback parameters as read from the page URL.
#[derive(Debug, Default)]
struct Callback {
	account_id: Option<AccountId>,
	public_key: Option<PublicKey>,
	all_keys: Vec<PublicKey>,
	has_reserved_params: bool,
}

impl Callback {
	fn parse(url: &Url) -> Self {
		let param = |name: &str| {
			url.query_pairs()
				.find(|(key, _)| key == name)
				.map(|(_, value)| value.into_owned())
				.filter(|value| !value.is_empty())
		};

		let all_keys = param("all_keys")
			.map(|keys| {
				keys.split(',')
					.map(str::trim)
					.filter(|key| !key.is_empty())
					.map(PublicKey::from)
					.collect()
			})
			.unwrap_or_default();

		Self {
			account_id: param("account_id").map(AccountId::from),
			public_key: param("public_key").map(PublicKey::from),
			all_keys,
			has_reserved_params: url
				.query_pairs()
				.any(|(key, _)| CALLBACK_PARAMS.contains(&key.as_ref())),
		}
	}
}

fn pending_key_identity(public_key: &PublicKey) -> String {
	format!("{}{}", PENDING_ACCESS_KEY_PREFIX, public_key)
}

/// Returns `url` without any of the [`CALLBACK_PARAMS`].
///
/// Other query segments are kept byte for byte, in their original order.
pub fn strip_callback_params(url: &Url) -> Url {
	let Some(query) = url.query() else {
		return url.clone();
	};

	let remaining: Vec<&str> = query
		.split('&')
		.filter(|segment| match form_urlencoded::parse(segment.as_bytes()).next() {
			Some((key, _)) => !CALLBACK_PARAMS.contains(&key.as_ref()),
			None => false,
		})
		.collect();

	let mut clean = url.clone();
	if remaining.is_empty() {
		clean.set_query(None);
	} else {
		clean.set_query(Some(&remaining.join("&")));
	}
	clean
}

/// Persisted sign-in state of one application on one page.
pub struct RedirectSession {
	settings: SessionSettings,
	environment: Arc<dyn SessionEnvironment>,
	storage: StorageService,
	keystore: Arc<dyn KeyStore>,
	accounts: Arc<dyn AccountLookup>,
	identity: Identity,
}

impl RedirectSession {
	/// Restores the session from storage.
	///
	/// When no signed-in identity is stored, the current URL is treated as a
	/// possible wallet callback and completed right away.
	pub async fn load(
		settings: SessionSettings,
		environment: Arc<dyn SessionEnvironment>,
		storage: Box<dyn StorageInterface>,
		keystore: Arc<dyn KeyStore>,
		accounts: Arc<dyn AccountLookup>,
	) -> Result<Self, WalletError> {
		let storage = StorageService::new(storage);
		let auth_data_key = settings.auth_data_key();

		let identity = match storage
			.retrieve_optional::<Identity>(SESSION_NAMESPACE, &auth_data_key)
			.await
		{
			Ok(identity) => identity.unwrap_or_default(),
			Err(StorageError::Serialization(e)) => {
				warn!("Discarding unreadable auth data {}: {}", auth_data_key, e);
				Identity::default()
			}
			Err(e) => return Err(e.into()),
		};

		let mut session = Self {
			settings,
			environment,
			storage,
			keystore,
			accounts,
			identity,
		};

		if session.is_signed_in() {
			debug!("Restored session for {}", session.account_id());
		} else {
			session.complete_sign_in().await?;
		}

		Ok(session)
	}

	pub fn settings(&self) -> &SessionSettings {
		&self.settings
	}

	pub fn environment(&self) -> &Arc<dyn SessionEnvironment> {
		&self.environment
	}

	pub fn identity(&self) -> &Identity {
		&self.identity
	}

	pub fn is_signed_in(&self) -> bool {
		self.identity.is_signed_in()
	}

	/// The signed-in account id, or an empty string.
	pub fn account_id(&self) -> &str {
		self.identity.account_id_or_empty()
	}

	pub fn state(&self) -> SessionState {
		if self.is_signed_in() {
			SessionState::SignedIn(self.identity.clone())
		} else {
			SessionState::SignedOut
		}
	}

	/// Public key of the permanent key stored for the signed-in account.
	pub async fn local_key(&self) -> Result<Option<PublicKey>, WalletError> {
		if !self.is_signed_in() {
			return Ok(None);
		}
		let key_pair = self
			.keystore
			.get_key(&self.settings.network_id, self.account_id())
			.await?;
		Ok(key_pair.map(|kp| kp.public_key()))
	}

	/// Issues the outbound sign-in redirect and returns the URL navigated to.
	///
	/// With a contract id the contract must exist; a fresh key pair is then
	/// stored as a pending key and its public key sent to the wallet for
	/// approval. Success and failure URLs default to the current page.
	pub async fn start_sign_in(&self, options: SignInOptions) -> Result<Url, WalletError> {
		let current_url = self.environment.current_url();
		let mut new_url = self.wallet_endpoint(LOGIN_WALLET_URL_SUFFIX);

		let success_url = options
			.success_url
			.unwrap_or_else(|| current_url.to_string());
		let failure_url = options
			.failure_url
			.unwrap_or_else(|| current_url.to_string());
		new_url
			.query_pairs_mut()
			.append_pair("success_url", &success_url)
			.append_pair("failure_url", &failure_url);

		if let Some(contract_id) = &options.contract_id {
			if !self.accounts.account_exists(contract_id).await? {
				return Err(WalletError::UnknownContract(contract_id.clone()));
			}

			let key_pair = KeyPair::from_random();
			let public_key = key_pair.public_key();
			self.keystore
				.set_key(
					&self.settings.network_id,
					&pending_key_identity(&public_key),
					&key_pair,
				)
				.await?;

			let mut query = new_url.query_pairs_mut();
			query
				.append_pair("contract_id", contract_id.as_str())
				.append_pair("public_key", public_key.as_str());
			for method_name in &options.method_names {
				query.append_pair("methodNames", method_name);
			}
			drop(query);

			info!(
				"Requesting sign-in for contract {} with pending key {}",
				contract_id, public_key
			);
		} else if !options.method_names.is_empty() {
			warn!("Ignoring method names for a sign-in without contract");
		}

		debug!("Redirecting to {}", new_url);
		self.environment.assign(new_url.clone());
		Ok(new_url)
	}

	/// Resolves a wallet callback found in the current URL.
	///
	/// Returns true when this call signed the user in. Safe to call at any
	/// time: without callback parameters it changes nothing, and the reserved
	/// parameters are removed from the URL whether or not sign-in succeeded.
	pub async fn complete_sign_in(&mut self) -> Result<bool, WalletError> {
		let current_url = self.environment.current_url();
		let callback = Callback::parse(&current_url);

		let outcome = self.apply_callback(&callback).await;

		if callback.has_reserved_params {
			self.environment
				.replace_url(strip_callback_params(&current_url));
		}

		outcome
	}

	async fn apply_callback(&mut self, callback: &Callback) -> Result<bool, WalletError> {
		let Some(account_id) = callback.account_id.clone() else {
			if let Some(public_key) = &callback.public_key {
				let err = WalletError::MalformedCallback(format!(
					"public_key {} without account_id",
					public_key
				));
				warn!("{}, no sign-in occurred", err);
			}
			return Ok(false);
		};

		let identity = Identity::new(account_id.clone(), callback.all_keys.clone());
		if let Some(public_key) = &callback.public_key {
			if !identity.knows_key(public_key) {
				warn!(
					"Wallet did not list approved key {} among the keys of {}",
					public_key, account_id
				);
			}
		}

		self.storage
			.store(SESSION_NAMESPACE, &self.settings.auth_data_key(), &identity)
			.await?;
		self.identity = identity;
		info!("Signed in as {}", account_id);

		if let Some(public_key) = &callback.public_key {
			self.promote_pending_key(&account_id, public_key).await?;
		}

		Ok(true)
	}

	/// Moves the pending key for `public_key` to the account's permanent slot.
	async fn promote_pending_key(
		&self,
		account_id: &AccountId,
		public_key: &PublicKey,
	) -> Result<bool, WalletError> {
		let network_id = &self.settings.network_id;
		let pending_identity = pending_key_identity(public_key);

		let Some(key_pair) = self.keystore.get_key(network_id, &pending_identity).await? else {
			warn!(
				"No pending key {} to promote for {}",
				public_key, account_id
			);
			return Ok(false);
		};

		// Copy, then delete. Never the reverse.
		self.keystore
			.set_key(network_id, account_id.as_str(), &key_pair)
			.await?;
		if let Err(e) = self.keystore.remove_key(network_id, &pending_identity).await {
			warn!(
				"Promoted key {} for {} but could not remove the pending copy: {}",
				public_key, account_id, e
			);
		}

		info!("Promoted pending key {} for {}", public_key, account_id);
		Ok(true)
	}

	/// Issues the outbound signing redirect for already encoded payloads.
	pub fn start_sign_transactions(
		&self,
		payloads: &[Vec<u8>],
		meta: Option<&str>,
		callback_url: Option<&str>,
	) -> Url {
		let current_url = self.environment.current_url();
		let mut new_url = self.wallet_endpoint(SIGN_WALLET_URL_SUFFIX);

		let mut query = new_url.query_pairs_mut();
		query
			.append_pair("transactions", &transactions_param(payloads))
			.append_pair("callbackUrl", callback_url.unwrap_or(current_url.as_str()));
		if let Some(meta) = meta {
			query.append_pair("meta", meta);
		}
		drop(query);

		debug!("Redirecting to {}", new_url);
		self.environment.assign(new_url.clone());
		new_url
	}

	/// Forgets the signed-in identity. Keys stay in the key store.
	pub async fn sign_out(&mut self) -> bool {
		let account_id = self.account_id().to_string();
		self.identity = Identity::default();

		if let Err(e) = self
			.storage
			.remove(SESSION_NAMESPACE, &self.settings.auth_data_key())
			.await
		{
			warn!("Failed to clear persisted auth data: {}", e);
		}

		info!("Signed out {}", account_id);
		true
	}

	fn wallet_endpoint(&self, suffix: &str) -> Url {
		let mut url = self.settings.wallet_url.clone();
		let path = format!("{}/{}", url.path().trim_end_matches('/'), suffix);
		url.set_path(&path);
		url.set_query(None);
		url.set_fragment(None);
		url
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::environment::MemoryEnvironment;
	use crate::testing::MockChain;
	use async_trait::async_trait;
	use wallet_storage::{MemoryStorage, StorageKeyStore};

	/// Key store whose deletes always fail.
	struct UndeletableKeyStore(StorageKeyStore);

	#[async_trait]
	impl KeyStore for UndeletableKeyStore {
		async fn get_key(
			&self,
			network_id: &str,
			identity: &str,
		) -> Result<Option<KeyPair>, StorageError> {
			self.0.get_key(network_id, identity).await
		}

		async fn set_key(
			&self,
			network_id: &str,
			identity: &str,
			key_pair: &KeyPair,
		) -> Result<(), StorageError> {
			self.0.set_key(network_id, identity, key_pair).await
		}

		async fn remove_key(&self, _network_id: &str, _identity: &str) -> Result<(), StorageError> {
			Err(StorageError::Backend("read-only".to_string()))
		}
	}

	const PAGE: &str = "https://app.example/page";

	struct Fixture {
		env: Arc<MemoryEnvironment>,
		storage: MemoryStorage,
		key_storage: MemoryStorage,
		keystore: Arc<StorageKeyStore>,
		chain: Arc<MockChain>,
	}

	impl Fixture {
		fn new(page: &str) -> Self {
			let key_storage = MemoryStorage::new();
			Self {
				env: Arc::new(MemoryEnvironment::new(page.parse().unwrap())),
				storage: MemoryStorage::new(),
				keystore: Arc::new(StorageKeyStore::new(Box::new(key_storage.clone()))),
				key_storage,
				chain: Arc::new(MockChain::new().with_account("app.testnet")),
			}
		}

		fn settings() -> SessionSettings {
			SessionSettings {
				network_id: "testnet".to_string(),
				wallet_url: "https://wallet.testnet.near.org".parse().unwrap(),
				app_key_prefix: "app".to_string(),
			}
		}

		async fn session(&self) -> RedirectSession {
			RedirectSession::load(
				Self::settings(),
				self.env.clone(),
				Box::new(self.storage.clone()),
				self.keystore.clone(),
				self.chain.clone(),
			)
			.await
			.unwrap()
		}
	}

	fn pairs(url: &Url) -> Vec<(String, String)> {
		url.query_pairs()
			.map(|(k, v)| (k.into_owned(), v.into_owned()))
			.collect()
	}

	fn values(url: &Url, name: &str) -> Vec<String> {
		pairs(url)
			.into_iter()
			.filter(|(k, _)| k == name)
			.map(|(_, v)| v)
			.collect()
	}

	#[tokio::test]
	async fn test_sign_in_without_contract() {
		let fixture = Fixture::new(PAGE);
		let session = fixture.session().await;
		assert_eq!(session.state(), SessionState::SignedOut);

		let url = session.start_sign_in(SignInOptions::new()).await.unwrap();

		assert_eq!(url.path(), "/login/");
		assert_eq!(
			pairs(&url),
			vec![
				("success_url".to_string(), PAGE.to_string()),
				("failure_url".to_string(), PAGE.to_string()),
			]
		);
		assert_eq!(fixture.env.last_navigation(), Some(url));
	}

	#[tokio::test]
	async fn test_sign_in_with_contract_and_methods() {
		let fixture = Fixture::new(PAGE);
		let session = fixture.session().await;

		let url = session
			.start_sign_in(
				SignInOptions::new()
					.with_contract("app.testnet")
					.with_method_names(["foo", "bar"])
					.with_success_url("https://app.example/ok"),
			)
			.await
			.unwrap();

		assert_eq!(values(&url, "success_url"), vec!["https://app.example/ok"]);
		assert_eq!(values(&url, "failure_url"), vec![PAGE]);
		assert_eq!(values(&url, "contract_id"), vec!["app.testnet"]);
		assert_eq!(values(&url, "methodNames"), vec!["foo", "bar"]);

		let public_key = values(&url, "public_key").remove(0);
		assert!(public_key.starts_with("ed25519:"));

		let pending = fixture
			.keystore
			.get_key("testnet", &format!("pending_key{}", public_key))
			.await
			.unwrap()
			.unwrap();
		assert_eq!(pending.public_key().as_str(), public_key);
	}

	#[tokio::test]
	async fn test_sign_in_unknown_contract() {
		let fixture = Fixture::new(PAGE);
		let session = fixture.session().await;

		let result = session
			.start_sign_in(SignInOptions::new().with_contract("ghost.testnet"))
			.await;

		assert!(matches!(result, Err(WalletError::UnknownContract(id)) if id.as_str() == "ghost.testnet"));
		assert!(fixture.env.navigations().is_empty());
	}

	#[tokio::test]
	async fn test_sign_in_with_ledger_down() {
		let mut fixture = Fixture::new(PAGE);
		fixture.chain = Arc::new(MockChain::new().unavailable());
		let session = fixture.session().await;

		let result = session
			.start_sign_in(SignInOptions::new().with_contract("app.testnet"))
			.await;

		assert!(matches!(result, Err(WalletError::LedgerUnavailable(_))));
		assert!(fixture.env.navigations().is_empty());
		assert!(fixture.key_storage.is_empty());
	}

	#[tokio::test]
	async fn test_method_names_need_contract() {
		let fixture = Fixture::new(PAGE);
		let session = fixture.session().await;

		let url = session
			.start_sign_in(SignInOptions::new().with_method_names(["foo"]))
			.await
			.unwrap();
		assert!(values(&url, "methodNames").is_empty());
		assert!(values(&url, "public_key").is_empty());
	}

	#[tokio::test]
	async fn test_callback_completes_sign_in() {
		let fixture = Fixture::new(
			"https://app.example/page?tab=2&account_id=alice.testnet&public_key=ed25519:ABC&all_keys=ed25519:ABC,ed25519:DEF",
		);
		let key_pair = KeyPair::from_random();
		fixture
			.keystore
			.set_key("testnet", "pending_keyed25519:ABC", &key_pair)
			.await
			.unwrap();

		let session = fixture.session().await;

		assert_eq!(
			session.state(),
			SessionState::SignedIn(Identity::new(
				AccountId::from("alice.testnet"),
				vec![PublicKey::from("ed25519:ABC"), PublicKey::from("ed25519:DEF")],
			))
		);
		assert_eq!(
			fixture
				.keystore
				.get_key("testnet", "alice.testnet")
				.await
				.unwrap(),
			Some(key_pair)
		);
		assert!(fixture
			.keystore
			.get_key("testnet", "pending_keyed25519:ABC")
			.await
			.unwrap()
			.is_none());
		assert_eq!(
			fixture.env.current_url().as_str(),
			"https://app.example/page?tab=2"
		);

		let stored: serde_json::Value = serde_json::from_slice(
			&fixture
				.storage
				.get_bytes("session:app_wallet_auth_key")
				.await
				.unwrap(),
		)
		.unwrap();
		assert_eq!(stored["accountId"], "alice.testnet");
	}

	#[tokio::test]
	async fn test_round_trip_across_reload() {
		let fixture = Fixture::new(PAGE);
		let session = fixture.session().await;
		let url = session
			.start_sign_in(SignInOptions::new().with_contract("app.testnet"))
			.await
			.unwrap();
		let public_key = values(&url, "public_key").remove(0);
		let pending = fixture
			.keystore
			.get_key("testnet", &format!("pending_key{}", public_key))
			.await
			.unwrap()
			.unwrap();

		// Wallet sends the user back
		let mut callback: Url = PAGE.parse().unwrap();
		callback
			.query_pairs_mut()
			.append_pair("account_id", "alice.testnet")
			.append_pair("public_key", &public_key)
			.append_pair("all_keys", &public_key);
		fixture.env.set_current_url(callback);

		let reloaded = fixture.session().await;
		assert!(reloaded.is_signed_in());
		assert_eq!(reloaded.account_id(), "alice.testnet");
		assert_eq!(
			reloaded.local_key().await.unwrap(),
			Some(PublicKey::from(public_key.as_str()))
		);
		assert_eq!(
			fixture
				.keystore
				.get_key("testnet", "alice.testnet")
				.await
				.unwrap(),
			Some(pending)
		);
		assert_eq!(fixture.env.current_url().as_str(), PAGE);
	}

	#[tokio::test]
	async fn test_complete_sign_in_is_idempotent() {
		let fixture = Fixture::new(
			"https://app.example/page?account_id=alice.testnet&public_key=ed25519:ABC&all_keys=ed25519:ABC",
		);
		fixture
			.keystore
			.set_key("testnet", "pending_keyed25519:ABC", &KeyPair::from_random())
			.await
			.unwrap();

		let mut session = fixture.session().await;
		assert_eq!(fixture.env.replacements(), 1);
		let permanent = fixture
			.keystore
			.get_key("testnet", "alice.testnet")
			.await
			.unwrap();

		assert!(!session.complete_sign_in().await.unwrap());
		assert!(!session.complete_sign_in().await.unwrap());

		assert_eq!(fixture.env.replacements(), 1);
		assert_eq!(session.account_id(), "alice.testnet");
		assert_eq!(
			fixture
				.keystore
				.get_key("testnet", "alice.testnet")
				.await
				.unwrap(),
			permanent
		);
	}

	#[tokio::test]
	async fn test_callback_without_account_is_ignored() {
		let fixture =
			Fixture::new("https://app.example/page?public_key=ed25519:ABC&meta=xyz");
		let key_pair = KeyPair::from_random();
		fixture
			.keystore
			.set_key("testnet", "pending_keyed25519:ABC", &key_pair)
			.await
			.unwrap();

		let session = fixture.session().await;

		assert!(!session.is_signed_in());
		assert_eq!(session.account_id(), "");
		assert_eq!(fixture.env.current_url().as_str(), PAGE);
		// The pending key is left orphaned
		assert_eq!(
			fixture
				.keystore
				.get_key("testnet", "pending_keyed25519:ABC")
				.await
				.unwrap(),
			Some(key_pair)
		);
	}

	#[tokio::test]
	async fn test_missing_pending_key_still_signs_in() {
		let fixture = Fixture::new(
			"https://app.example/page?account_id=alice.testnet&public_key=ed25519:GONE&all_keys=ed25519:GONE",
		);

		let session = fixture.session().await;

		assert!(session.is_signed_in());
		assert!(fixture
			.keystore
			.get_key("testnet", "alice.testnet")
			.await
			.unwrap()
			.is_none());
		assert_eq!(fixture.env.current_url().as_str(), PAGE);
	}

	#[tokio::test]
	async fn test_failed_pending_cleanup_keeps_promoted_key() {
		let fixture = Fixture::new(PAGE);
		let keystore = Arc::new(UndeletableKeyStore(StorageKeyStore::new(Box::new(
			MemoryStorage::new(),
		))));
		let key_pair = KeyPair::from_random();
		let public_key = key_pair.public_key();
		keystore
			.set_key("testnet", &format!("pending_key{}", public_key), &key_pair)
			.await
			.unwrap();

		fixture.env.set_current_url(
			format!(
				"{}?account_id=alice.testnet&public_key={}&all_keys={}",
				PAGE, public_key, public_key
			)
			.parse()
			.unwrap(),
		);
		let session = RedirectSession::load(
			Fixture::settings(),
			fixture.env.clone(),
			Box::new(fixture.storage.clone()),
			keystore.clone(),
			fixture.chain.clone(),
		)
		.await
		.unwrap();

		assert!(session.is_signed_in());
		assert_eq!(
			keystore.get_key("testnet", "alice.testnet").await.unwrap(),
			Some(key_pair.clone())
		);
		// The pending copy is left behind
		assert_eq!(
			keystore
				.get_key("testnet", &format!("pending_key{}", public_key))
				.await
				.unwrap(),
			Some(key_pair)
		);
		assert_eq!(fixture.env.current_url().as_str(), PAGE);
	}

	#[tokio::test]
	async fn test_transaction_callback_is_stripped() {
		let fixture = Fixture::new(
			"https://app.example/page?transactionHashes=abc,def&meta=order-7#top",
		);
		let session = fixture.session().await;

		assert!(!session.is_signed_in());
		assert_eq!(
			fixture.env.current_url().as_str(),
			"https://app.example/page#top"
		);
	}

	#[tokio::test]
	async fn test_persisted_identity_survives_restart() {
		let fixture = Fixture::new(
			"https://app.example/page?account_id=alice.testnet&all_keys=ed25519:ABC",
		);
		fixture.session().await;

		fixture.env.set_current_url(PAGE.parse().unwrap());
		let restarted = fixture.session().await;
		assert_eq!(restarted.account_id(), "alice.testnet");
		assert_eq!(
			restarted.identity().all_keys,
			vec![PublicKey::from("ed25519:ABC")]
		);
	}

	#[tokio::test]
	async fn test_sign_out() {
		let fixture = Fixture::new(
			"https://app.example/page?account_id=alice.testnet&all_keys=ed25519:ABC",
		);
		let mut session = fixture.session().await;
		assert!(session.is_signed_in());

		assert!(session.sign_out().await);
		assert_eq!(session.state(), SessionState::SignedOut);
		assert_eq!(session.account_id(), "");
		assert!(!fixture
			.storage
			.exists("session:app_wallet_auth_key")
			.await
			.unwrap());

		let restarted = fixture.session().await;
		assert!(!restarted.is_signed_in());
	}

	#[tokio::test]
	async fn test_unreadable_auth_data_means_signed_out() {
		let fixture = Fixture::new(PAGE);
		fixture
			.storage
			.set_bytes("session:app_wallet_auth_key", b"{not json".to_vec())
			.await
			.unwrap();

		let session = fixture.session().await;
		assert!(!session.is_signed_in());
	}

	#[tokio::test]
	async fn test_sign_transactions_url() {
		let fixture = Fixture::new(PAGE);
		let session = fixture.session().await;

		let url = session.start_sign_transactions(&[b"tx".to_vec()], Some("m1"), None);

		assert_eq!(url.path(), "/sign");
		assert_eq!(values(&url, "transactions"), vec!["dHg="]);
		assert_eq!(values(&url, "callbackUrl"), vec![PAGE]);
		assert_eq!(values(&url, "meta"), vec!["m1"]);
		assert_eq!(fixture.env.last_navigation(), Some(url));
	}

	#[test]
	fn test_strip_callback_params_keeps_others() {
		let url: Url = "https://app.example/p?a=1&account_id=x&b=2&all_keys=k"
			.parse()
			.unwrap();
		assert_eq!(
			strip_callback_params(&url).as_str(),
			"https://app.example/p?a=1&b=2"
		);

		let plain: Url = "https://app.example/p".parse().unwrap();
		assert_eq!(strip_callback_params(&plain), plain);

		let encoded: Url = "https://app.example/p?q=a%20b&flag&account_id=x&meta=m"
			.parse()
			.unwrap();
		assert_eq!(
			strip_callback_params(&encoded).as_str(),
			"https://app.example/p?q=a%20b&flag"
		);
	}
}
