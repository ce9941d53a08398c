//! Key store for pending and permanent access keys.

use crate::{StorageError, StorageInterface, StorageService};
use async_trait::async_trait;
use tracing::debug;
use wallet_types::KeyPair;

const KEYSTORE_NAMESPACE: &str = "keystore";

/// Persistent mapping from `(network, identity)` to a key pair.
///
/// `identity` is usually an account id; pending keys use a reserved prefix
/// so they never collide with one.
#[async_trait]
pub trait KeyStore: Send + Sync {
	/// Returns the stored key pair, or `None` when nothing is stored.
	async fn get_key(&self, network_id: &str, identity: &str)
		-> Result<Option<KeyPair>, StorageError>;

	async fn set_key(
		&self,
		network_id: &str,
		identity: &str,
		key_pair: &KeyPair,
	) -> Result<(), StorageError>;

	async fn remove_key(&self, network_id: &str, identity: &str) -> Result<(), StorageError>;
}

/// Key store persisting key pairs through a [`StorageInterface`] backend.
///
/// Entries live under `keystore:<identity>:<network>` and hold the
/// `ed25519:...` text form of the pair.
pub struct StorageKeyStore {
	storage: StorageService,
}

impl StorageKeyStore {
	pub fn new(backend: Box<dyn StorageInterface>) -> Self {
		Self {
			storage: StorageService::new(backend),
		}
	}

	fn entry_id(network_id: &str, identity: &str) -> String {
		format!("{}:{}", identity, network_id)
	}
}

#[async_trait]
impl KeyStore for StorageKeyStore {
	async fn get_key(
		&self,
		network_id: &str,
		identity: &str,
	) -> Result<Option<KeyPair>, StorageError> {
		self.storage
			.retrieve_optional(KEYSTORE_NAMESPACE, &Self::entry_id(network_id, identity))
			.await
	}

	async fn set_key(
		&self,
		network_id: &str,
		identity: &str,
		key_pair: &KeyPair,
	) -> Result<(), StorageError> {
		debug!(
			"Storing key {} for {} on {}",
			key_pair.public_key(),
			identity,
			network_id
		);
		self.storage
			.store(
				KEYSTORE_NAMESPACE,
				&Self::entry_id(network_id, identity),
				key_pair,
			)
			.await
	}

	async fn remove_key(&self, network_id: &str, identity: &str) -> Result<(), StorageError> {
		debug!("Removing key for {} on {}", identity, network_id);
		self.storage
			.remove(KEYSTORE_NAMESPACE, &Self::entry_id(network_id, identity))
			.await
	}
}
