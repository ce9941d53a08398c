//! Error types for the redirect wallet.

use crate::AccountId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
	/// The sign-in target contract does not exist. Raised before any
	/// navigation happens.
	#[error("Contract account {0} does not exist")]
	UnknownContract(AccountId),

	/// The access key (or account) query failed.
	#[error("Access key ledger unavailable: {0}")]
	LedgerUnavailable(String),

	/// None of the account's keys covers the requested transaction.
	#[error("Cannot find matching key for transaction sent to {receiver_id}")]
	NoAuthorizingKey { receiver_id: AccountId },

	/// The wallet callback carried inconsistent parameters.
	#[error("Malformed wallet callback: {0}")]
	MalformedCallback(String),

	#[error("Not signed in")]
	NotSignedIn,

	#[error("Storage error: {0}")]
	Storage(String),

	#[error("Key store error: {0}")]
	KeyStore(String),

	#[error("Encoding error: {0}")]
	Encoding(String),

	#[error("Configuration error: {0}")]
	Config(String),
}
