//! Picks the access key that should sign a transaction.

use crate::authorizer::authorizes;
use std::sync::Arc;
use tracing::debug;
use wallet_account::AccessKeyLedger;
use wallet_types::{AccessKeyRecord, AccountId, Action, PublicKey, WalletError};

/// Chooses an authorizing key among an account's on-chain access keys.
pub struct KeySelector {
	ledger: Arc<dyn AccessKeyLedger>,
}

impl KeySelector {
	pub fn new(ledger: Arc<dyn AccessKeyLedger>) -> Self {
		Self { ledger }
	}

	/// Returns the key that should sign `actions` sent to `receiver_id`, or
	/// `None` when no key covers them.
	///
	/// A locally held key wins whenever it authorizes the request. Otherwise
	/// keys are tried in ledger order, but only those listed in `known_keys`
	/// (the keys the wallet reported as belonging to this application's
	/// user).
	pub async fn select(
		&self,
		account_id: &AccountId,
		known_keys: &[PublicKey],
		receiver_id: &AccountId,
		actions: &[Action],
		local_key: Option<&PublicKey>,
	) -> Result<Option<AccessKeyRecord>, WalletError> {
		let access_keys = self.ledger.get_access_keys(account_id).await?;

		if let Some(local_key) = local_key {
			let local_record = access_keys.iter().find(|k| &k.public_key == local_key);
			if let Some(record) = local_record {
				if authorizes(account_id, record, receiver_id, actions) {
					debug!("Local key {} authorizes transaction to {}", local_key, receiver_id);
					return Ok(Some(record.clone()));
				}
			}
		}

		let selected = access_keys.into_iter().find(|record| {
			known_keys.contains(&record.public_key)
				&& authorizes(account_id, record, receiver_id, actions)
		});

		match &selected {
			Some(record) => debug!(
				"Wallet key {} authorizes transaction to {}",
				record.public_key, receiver_id
			),
			None => debug!("No key of {} authorizes transaction to {}", account_id, receiver_id),
		}

		Ok(selected)
	}

	/// Like [`select`](Self::select) but refuses with
	/// [`WalletError::NoAuthorizingKey`] instead of returning `None`.
	pub async fn require(
		&self,
		account_id: &AccountId,
		known_keys: &[PublicKey],
		receiver_id: &AccountId,
		actions: &[Action],
		local_key: Option<&PublicKey>,
	) -> Result<AccessKeyRecord, WalletError> {
		self.select(account_id, known_keys, receiver_id, actions, local_key)
			.await?
			.ok_or_else(|| WalletError::NoAuthorizingKey {
				receiver_id: receiver_id.clone(),
			})
	}
}
