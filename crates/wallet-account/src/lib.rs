//! Chain account queries used by the redirect wallet.
//!
//! The wallet never signs through this crate. It only reads: which access
//! keys an account has registered, and whether an account exists at all.

use async_trait::async_trait;
use thiserror::Error;
use wallet_types::{AccessKeyRecord, AccountId, WalletError};

pub mod implementations {
	pub mod rpc;
}

pub use implementations::rpc::RpcClient;

#[derive(Debug, Error)]
pub enum AccountError {
	#[error("Transport error: {0}")]
	Transport(String),
	#[error("RPC error: {0}")]
	Rpc(String),
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
}

impl From<AccountError> for WalletError {
	fn from(err: AccountError) -> Self {
		WalletError::LedgerUnavailable(err.to_string())
	}
}

/// Source of truth for the access keys registered on an account.
#[async_trait]
pub trait AccessKeyLedger: Send + Sync {
	/// Returns the account's access keys in ledger order.
	async fn get_access_keys(
		&self,
		account_id: &AccountId,
	) -> Result<Vec<AccessKeyRecord>, AccountError>;
}

/// Existence check for accounts.
#[async_trait]
pub trait AccountLookup: Send + Sync {
	/// `Ok(false)` when the chain reports the account as unknown; errors are
	/// reserved for failed queries.
	async fn account_exists(&self, account_id: &AccountId) -> Result<bool, AccountError>;
}
