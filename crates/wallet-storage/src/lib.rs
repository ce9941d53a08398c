//! Storage module for the redirect wallet.
//!
//! Provides the persistent key-value abstraction the session keeps its auth
//! data in, the typed JSON wrapper on top of it, and the key store that
//! holds pending and permanent access keys.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use wallet_types::WalletError;

pub mod keystore;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

pub use implementations::file::FileStorage;
pub use implementations::memory::MemoryStorage;
pub use keystore::{KeyStore, StorageKeyStore};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs when a requested item is not found.
	#[error("Not found")]
	NotFound,
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
}

impl From<StorageError> for WalletError {
	fn from(err: StorageError) -> Self {
		WalletError::Storage(err.to_string())
	}
}

/// Trait defining the low-level interface for storage backends.
///
/// This is the persistent key-value store of the hosting platform (the
/// browser's local storage in the original setting).
#[async_trait]
pub trait StorageInterface: Send + Sync {
	/// Retrieves raw bytes for the given key.
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError>;

	/// Stores raw bytes, replacing any previous value.
	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

	/// Deletes the value associated with the given key. Deleting a missing
	/// key is not an error.
	async fn delete(&self, key: &str) -> Result<(), StorageError>;

	/// Checks if a key exists in storage.
	async fn exists(&self, key: &str) -> Result<bool, StorageError>;
}

/// High-level storage service that provides typed operations.
///
/// Values are stored as JSON under `namespace:id`.
pub struct StorageService {
	/// The underlying storage backend implementation.
	backend: Box<dyn StorageInterface>,
}

impl StorageService {
	/// Creates a new StorageService with the specified backend.
	pub fn new(backend: Box<dyn StorageInterface>) -> Self {
		Self { backend }
	}

	fn key(namespace: &str, id: &str) -> String {
		format!("{}:{}", namespace, id)
	}

	/// Serializes and stores a value.
	pub async fn store<T: Serialize>(
		&self,
		namespace: &str,
		id: &str,
		data: &T,
	) -> Result<(), StorageError> {
		let bytes =
			serde_json::to_vec(data).map_err(|e| StorageError::Serialization(e.to_string()))?;
		self.backend.set_bytes(&Self::key(namespace, id), bytes).await
	}

	/// Retrieves and deserializes a value from storage.
	pub async fn retrieve<T: DeserializeOwned>(
		&self,
		namespace: &str,
		id: &str,
	) -> Result<T, StorageError> {
		let bytes = self.backend.get_bytes(&Self::key(namespace, id)).await?;
		serde_json::from_slice(&bytes).map_err(|e| StorageError::Serialization(e.to_string()))
	}

	/// Like [`retrieve`](Self::retrieve) but maps a missing key to `None`.
	pub async fn retrieve_optional<T: DeserializeOwned>(
		&self,
		namespace: &str,
		id: &str,
	) -> Result<Option<T>, StorageError> {
		match self.retrieve(namespace, id).await {
			Ok(value) => Ok(Some(value)),
			Err(StorageError::NotFound) => Ok(None),
			Err(e) => Err(e),
		}
	}

	/// Removes a value from storage.
	pub async fn remove(&self, namespace: &str, id: &str) -> Result<(), StorageError> {
		self.backend.delete(&Self::key(namespace, id)).await
	}

	pub async fn contains(&self, namespace: &str, id: &str) -> Result<bool, StorageError> {
		self.backend.exists(&Self::key(namespace, id)).await
	}
}

/// Factory function to create a storage backend from configuration.
///
/// The file backend defaults to `./data/wallet` when no path is configured.
pub fn create_storage(config: &wallet_types::StorageConfig) -> Box<dyn StorageInterface> {
	match config.backend {
		wallet_types::StorageBackend::Memory => Box::new(MemoryStorage::new()),
		wallet_types::StorageBackend::File => {
			let path = config.path.as_deref().unwrap_or("./data/wallet");
			Box::new(FileStorage::new(std::path::PathBuf::from(path)))
		}
	}
}
