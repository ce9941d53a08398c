//! In-memory storage backend.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory storage, lost when the process exits.
///
/// Clones share the same underlying map, which lets tests keep a handle on
/// the data a session writes.
#[derive(Clone, Default)]
pub struct MemoryStorage {
	data: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}
}

#[async_trait]
impl StorageInterface for MemoryStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		self.data
			.get(key)
			.map(|entry| entry.value().clone())
			.ok_or(StorageError::NotFound)
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		self.data.insert(key.to_string(), value);
		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		self.data.remove(key);
		Ok(())
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		Ok(self.data.contains_key(key))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_memory_storage() {
		let storage = MemoryStorage::new();
		assert!(matches!(
			storage.get_bytes("missing").await,
			Err(StorageError::NotFound)
		));

		storage.set_bytes("k", vec![1, 2, 3]).await.unwrap();
		assert_eq!(storage.get_bytes("k").await.unwrap(), vec![1, 2, 3]);

		// Clones see the same data
		let shared = storage.clone();
		assert!(shared.exists("k").await.unwrap());

		storage.delete("k").await.unwrap();
		storage.delete("k").await.unwrap();
		assert!(shared.is_empty());
	}
}
