//! Redirect-based wallet connection.
//!
//! A page hands the user over to an external wallet service to approve a
//! sign-in or sign a transaction, and resumes from the callback URL when the
//! wallet sends the user back. This crate holds the protocol:
//!
//! - [`authorizer`]: does a given access key cover a request?
//! - [`selector`]: which of the account's keys should sign it?
//! - [`session`]: persisted sign-in state plus the outbound and inbound
//!   redirect legs, including pending key promotion.
//! - [`wallet`]: the public facade tying the above together.
//!
//! Navigation is never awaited: once a redirect is issued the page is gone,
//! so the outbound builders and the inbound resolver are independent entry
//! points that only share persisted state.

pub mod authorizer;
pub mod builder;
pub mod encoding;
pub mod environment;
pub mod selector;
pub mod session;
pub mod wallet;

#[cfg(test)]
pub(crate) mod testing;

pub use authorizer::{authorizes, MULTISIG_CONFIRM_METHOD};
pub use builder::WalletBuilder;
pub use encoding::{JsonTransactionEncoder, TransactionEncoder};
pub use environment::{MemoryEnvironment, SessionEnvironment};
pub use selector::KeySelector;
pub use session::{RedirectSession, SessionSettings, SessionState, SignInOptions};
pub use wallet::{ConnectedAccount, RedirectWallet};
