//! The persisted sign-in identity.

use crate::{AccountId, PublicKey};
use serde::{Deserialize, Serialize};

/// Who the wallet said signed in, and which keys it reported for them.
///
/// Stored as JSON `{"accountId": ..., "allKeys": [...]}` under the app's auth
/// data key. A missing or empty `accountId` means signed out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub account_id: Option<AccountId>,
	#[serde(default)]
	pub all_keys: Vec<PublicKey>,
}

impl Identity {
	pub fn new(account_id: AccountId, all_keys: Vec<PublicKey>) -> Self {
		Self {
			account_id: Some(account_id),
			all_keys,
		}
	}

	pub fn is_signed_in(&self) -> bool {
		self.account_id
			.as_ref()
			.map(|id| !id.is_empty())
			.unwrap_or(false)
	}

	/// The account id, or an empty string when signed out.
	pub fn account_id_or_empty(&self) -> &str {
		self.account_id.as_ref().map(|id| id.as_str()).unwrap_or("")
	}

	pub fn knows_key(&self, key: &PublicKey) -> bool {
		self.all_keys.contains(key)
	}
}
