//! On-chain access keys as reported by the ledger.
//!
//! The JSON layout mirrors the node's `view_access_key_list` response so the
//! RPC client can deserialize straight into these types.

use crate::{AccountId, PublicKey};
use serde::{Deserialize, Serialize};

/// What an access key is allowed to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessKeyPermission {
	/// Unrestricted key.
	FullAccess,
	/// Key limited to calling methods on a single receiver without
	/// attaching deposits.
	FunctionCall(FunctionCallPermission),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCallPermission {
	/// Remaining gas allowance, as a decimal string. `None` means unlimited.
	#[serde(default)]
	pub allowance: Option<String>,
	pub receiver_id: AccountId,
	/// Empty means any method.
	#[serde(default)]
	pub method_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKey {
	pub nonce: u64,
	pub permission: AccessKeyPermission,
}

/// An access key together with the public key it is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKeyRecord {
	pub public_key: PublicKey,
	pub access_key: AccessKey,
}

impl AccessKeyRecord {
	pub fn full_access(public_key: impl Into<PublicKey>) -> Self {
		Self {
			public_key: public_key.into(),
			access_key: AccessKey {
				nonce: 0,
				permission: AccessKeyPermission::FullAccess,
			},
		}
	}

	pub fn function_call(
		public_key: impl Into<PublicKey>,
		receiver_id: impl Into<AccountId>,
		method_names: &[&str],
	) -> Self {
		Self {
			public_key: public_key.into(),
			access_key: AccessKey {
				nonce: 0,
				permission: AccessKeyPermission::FunctionCall(FunctionCallPermission {
					allowance: None,
					receiver_id: receiver_id.into(),
					method_names: method_names.iter().map(|m| m.to_string()).collect(),
				}),
			},
		}
	}

	pub fn permission(&self) -> &AccessKeyPermission {
		&self.access_key.permission
	}
}
