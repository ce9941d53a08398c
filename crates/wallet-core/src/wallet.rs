//! Public wallet facade.

use crate::encoding::TransactionEncoder;
use crate::selector::KeySelector;
use crate::session::{RedirectSession, SessionState, SignInOptions};
use tracing::{info, warn};
use url::Url;
use wallet_types::{
	AccessKeyRecord, AccountId, Action, PublicKey, SignTransactionOptions, TransactionRequest,
	WalletError,
};

/// Wallet connection driven entirely by redirects.
///
/// Every `request_*` method ends by navigating away. The returned URL is
/// what the page was sent to; on a real page nothing observes it.
pub struct RedirectWallet {
	session: RedirectSession,
	selector: KeySelector,
	encoder: Box<dyn TransactionEncoder>,
}

impl RedirectWallet {
	pub fn new(
		session: RedirectSession,
		selector: KeySelector,
		encoder: Box<dyn TransactionEncoder>,
	) -> Self {
		Self {
			session,
			selector,
			encoder,
		}
	}

	pub fn session(&self) -> &RedirectSession {
		&self.session
	}

	pub fn state(&self) -> SessionState {
		self.session.state()
	}

	pub fn is_signed_in(&self) -> bool {
		self.session.is_signed_in()
	}

	/// The signed-in account id, or an empty string when signed out.
	pub fn get_account_id(&self) -> String {
		self.session.account_id().to_string()
	}

	/// Redirects to the wallet's login page.
	pub async fn request_sign_in(&self, options: SignInOptions) -> Result<Url, WalletError> {
		self.session.start_sign_in(options).await
	}

	/// Resolves a wallet callback in the current URL. Already done once when
	/// the wallet is built.
	pub async fn complete_sign_in(&mut self) -> Result<bool, WalletError> {
		self.session.complete_sign_in().await
	}

	pub async fn sign_out(&mut self) -> bool {
		self.session.sign_out().await
	}

	/// Finds the key that should sign a transaction for the signed-in
	/// account, preferring `local_key` when it authorizes the request.
	pub async fn access_key_for_transaction(
		&self,
		receiver_id: &AccountId,
		actions: &[Action],
		local_key: Option<&PublicKey>,
	) -> Result<Option<AccessKeyRecord>, WalletError> {
		let account_id = self.signed_in_account()?;
		self.selector
			.select(
				&account_id,
				&self.session.identity().all_keys,
				receiver_id,
				actions,
				local_key,
			)
			.await
	}

	/// Redirects to the wallet to sign `options.request`.
	///
	/// The key stored locally for the account is preferred. Refuses with
	/// [`WalletError::NoAuthorizingKey`] before navigating when no key of the
	/// account covers the request.
	pub async fn request_sign_transaction(
		&self,
		options: SignTransactionOptions,
	) -> Result<Url, WalletError> {
		let account_id = self.signed_in_account()?;
		let request = &options.request;

		let local_key = self.session.local_key().await?;
		let access_key = self
			.selector
			.require(
				&account_id,
				&self.session.identity().all_keys,
				&request.receiver_id,
				&request.actions,
				local_key.as_ref(),
			)
			.await?;

		let payload = self.encoder.encode(&account_id, &access_key, request)?;
		info!(
			"Requesting signature of transaction to {} with key {}",
			request.receiver_id, access_key.public_key
		);

		Ok(self.session.start_sign_transactions(
			&[payload],
			options.wallet_meta.as_deref(),
			options.callback_url.as_deref(),
		))
	}

	/// Account handle for the signed-in user.
	pub fn account(&self) -> Option<ConnectedAccount<'_>> {
		if !self.is_signed_in() {
			warn!("Can not create account object, user is not signed in");
			return None;
		}
		Some(ConnectedAccount {
			wallet: self,
			account_id: AccountId::from(self.session.account_id()),
		})
	}

	fn signed_in_account(&self) -> Result<AccountId, WalletError> {
		if !self.is_signed_in() {
			return Err(WalletError::NotSignedIn);
		}
		Ok(AccountId::from(self.session.account_id()))
	}
}

/// A signed-in account whose transactions are signed by the wallet.
pub struct ConnectedAccount<'a> {
	wallet: &'a RedirectWallet,
	account_id: AccountId,
}

impl ConnectedAccount<'_> {
	pub fn account_id(&self) -> &AccountId {
		&self.account_id
	}

	/// Sends the transaction to the wallet for signing. The page navigates
	/// away, so no outcome is returned.
	pub async fn sign_and_send_transaction(
		&self,
		request: TransactionRequest,
	) -> Result<Url, WalletError> {
		self.wallet
			.request_sign_transaction(SignTransactionOptions::new(request))
			.await
	}
}
