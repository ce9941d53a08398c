//! Encoding of transaction payloads for the wallet's signing page.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use wallet_types::{AccessKeyRecord, AccountId, Action, PublicKey, TransactionRequest, WalletError};

/// Turns a request and the key chosen to sign it into the bytes the wallet
/// receives.
pub trait TransactionEncoder: Send + Sync {
	fn encode(
		&self,
		signer_id: &AccountId,
		access_key: &AccessKeyRecord,
		request: &TransactionRequest,
	) -> Result<Vec<u8>, WalletError>;
}

#[derive(Serialize)]
struct UnsignedTransaction<'a> {
	signer_id: &'a AccountId,
	public_key: &'a PublicKey,
	receiver_id: &'a AccountId,
	actions: &'a [Action],
}

/// Encodes the unsigned request as JSON.
///
/// Nonce and block hash are not included; the wallet fills them in when it
/// builds the transaction it actually signs.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTransactionEncoder;

impl TransactionEncoder for JsonTransactionEncoder {
	fn encode(
		&self,
		signer_id: &AccountId,
		access_key: &AccessKeyRecord,
		request: &TransactionRequest,
	) -> Result<Vec<u8>, WalletError> {
		let unsigned = UnsignedTransaction {
			signer_id,
			public_key: &access_key.public_key,
			receiver_id: &request.receiver_id,
			actions: &request.actions,
		};
		serde_json::to_vec(&unsigned).map_err(|e| WalletError::Encoding(e.to_string()))
	}
}

/// Joins encoded payloads into the `transactions` query value.
pub fn transactions_param(payloads: &[Vec<u8>]) -> String {
	payloads
		.iter()
		.map(|payload| STANDARD.encode(payload))
		.collect::<Vec<_>>()
		.join(",")
}
