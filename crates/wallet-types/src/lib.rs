//! Shared types for the redirect wallet connection.
//!
//! Account identifiers, key material, on-chain access keys, transaction
//! requests, the persisted sign-in identity, configuration and the error
//! type used across the workspace.

pub mod access_key;
pub mod account;
pub mod configs;
pub mod errors;
pub mod identity;
pub mod keys;
pub mod transaction;

pub use access_key::*;
pub use account::*;
pub use configs::*;
pub use errors::*;
pub use identity::*;
pub use keys::*;
pub use transaction::*;
