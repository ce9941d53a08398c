//! In-memory chain used by the unit tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use wallet_account::{AccessKeyLedger, AccountError, AccountLookup};
use wallet_types::{AccessKeyRecord, AccountId};

#[derive(Default)]
pub(crate) struct MockChain {
	keys: HashMap<AccountId, Vec<AccessKeyRecord>>,
	accounts: HashSet<AccountId>,
	unavailable: bool,
	pub(crate) key_queries: AtomicUsize,
}

impl MockChain {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn with_account(mut self, account_id: &str) -> Self {
		self.accounts.insert(AccountId::from(account_id));
		self
	}

	pub(crate) fn with_keys(mut self, account_id: &str, keys: Vec<AccessKeyRecord>) -> Self {
		self.accounts.insert(AccountId::from(account_id));
		self.keys.insert(AccountId::from(account_id), keys);
		self
	}

	pub(crate) fn unavailable(mut self) -> Self {
		self.unavailable = true;
		self
	}
}

#[async_trait]
impl AccessKeyLedger for MockChain {
	async fn get_access_keys(
		&self,
		account_id: &AccountId,
	) -> Result<Vec<AccessKeyRecord>, AccountError> {
		self.key_queries.fetch_add(1, Ordering::SeqCst);
		if self.unavailable {
			return Err(AccountError::Transport("connection refused".to_string()));
		}
		Ok(self.keys.get(account_id).cloned().unwrap_or_default())
	}
}

#[async_trait]
impl AccountLookup for MockChain {
	async fn account_exists(&self, account_id: &AccountId) -> Result<bool, AccountError> {
		if self.unavailable {
			return Err(AccountError::Transport("connection refused".to_string()));
		}
		Ok(self.accounts.contains(account_id))
	}
}
