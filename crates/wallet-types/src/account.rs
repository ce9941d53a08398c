//! Account and public key identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Human readable account identifier, e.g. `alice.testnet`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Display for AccountId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for AccountId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

impl From<String> for AccountId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

/// Public key in its textual `<curve>:<base58>` form.
///
/// The string form doubles as the key's fingerprint: it is how keys are
/// matched against the ledger and how pending keys are looked up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey(pub String);

impl PublicKey {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for PublicKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for PublicKey {
	fn from(key: &str) -> Self {
		Self(key.to_string())
	}
}

impl From<String> for PublicKey {
	fn from(key: String) -> Self {
		Self(key)
	}
}
