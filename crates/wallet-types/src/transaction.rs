//! Transaction requests handed to the wallet for signing.

use crate::{AccessKey, AccountId, PublicKey};
use serde::{Deserialize, Serialize};

/// Amounts are in the chain's smallest denomination.
pub type Balance = u128;
pub type Gas = u64;

/// A single action within a transaction.
///
/// Only [`Action::FunctionCall`] is ever inspected when deciding whether an
/// access key covers a request; every other kind requires a full access key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
	CreateAccount,
	DeployContract {
		code: Vec<u8>,
	},
	FunctionCall {
		method_name: String,
		#[serde(default)]
		args: Vec<u8>,
		gas: Gas,
		#[serde(default)]
		deposit: Balance,
	},
	Transfer {
		deposit: Balance,
	},
	Stake {
		stake: Balance,
		public_key: PublicKey,
	},
	AddKey {
		public_key: PublicKey,
		access_key: AccessKey,
	},
	DeleteKey {
		public_key: PublicKey,
	},
	DeleteAccount {
		beneficiary_id: AccountId,
	},
}

impl Action {
	pub fn function_call(
		method_name: impl Into<String>,
		args: Vec<u8>,
		gas: Gas,
		deposit: Balance,
	) -> Self {
		Action::FunctionCall {
			method_name: method_name.into(),
			args,
			gas,
			deposit,
		}
	}

	pub fn transfer(deposit: Balance) -> Self {
		Action::Transfer { deposit }
	}
}

/// An unsigned request: which account receives which actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
	pub receiver_id: AccountId,
	pub actions: Vec<Action>,
}

impl TransactionRequest {
	pub fn new(receiver_id: impl Into<AccountId>, actions: Vec<Action>) -> Self {
		Self {
			receiver_id: receiver_id.into(),
			actions,
		}
	}
}

/// Options for a wallet signing redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignTransactionOptions {
	pub request: TransactionRequest,
	/// Opaque value the wallet echoes back in the callback's `meta` parameter.
	pub wallet_meta: Option<String>,
	/// Where the wallet returns to. Defaults to the current page.
	pub callback_url: Option<String>,
}

impl SignTransactionOptions {
	pub fn new(request: TransactionRequest) -> Self {
		Self {
			request,
			wallet_meta: None,
			callback_url: None,
		}
	}

	pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
		self.wallet_meta = Some(meta.into());
		self
	}

	pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
		self.callback_url = Some(url.into());
		self
	}
}
