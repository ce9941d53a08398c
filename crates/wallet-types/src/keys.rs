//! Ed25519 key pairs used as application access keys.

use crate::{PublicKey, WalletError};
use ed25519_dalek::{SigningKey, KEYPAIR_LENGTH, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const ED25519_PREFIX: &str = "ed25519:";

/// An ed25519 key pair.
///
/// The textual form is `ed25519:<base58(secret || public)>`, the layout
/// wallets and key stores exchange. Parsing also accepts a bare 32 byte
/// secret; with the full 64 bytes the public half must match the secret.
#[derive(Clone)]
pub struct KeyPair {
	signing_key: SigningKey,
}

impl KeyPair {
	/// Generates a fresh random key pair.
	pub fn from_random() -> Self {
		Self {
			signing_key: SigningKey::generate(&mut OsRng),
		}
	}

	pub fn from_secret_bytes(secret: &[u8; SECRET_KEY_LENGTH]) -> Self {
		Self {
			signing_key: SigningKey::from_bytes(secret),
		}
	}

	/// Public half of the pair, which is also its fingerprint.
	pub fn public_key(&self) -> PublicKey {
		let encoded = bs58::encode(self.signing_key.verifying_key().as_bytes()).into_string();
		PublicKey(format!("{}{}", ED25519_PREFIX, encoded))
	}
}

impl PartialEq for KeyPair {
	fn eq(&self, other: &Self) -> bool {
		self.signing_key.to_bytes() == other.signing_key.to_bytes()
	}
}

impl Eq for KeyPair {}

// Never print the secret half.
impl fmt::Debug for KeyPair {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("KeyPair")
			.field("public_key", &self.public_key())
			.finish()
	}
}

impl fmt::Display for KeyPair {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let keypair_bytes = self.signing_key.to_keypair_bytes();
		write!(
			f,
			"{}{}",
			ED25519_PREFIX,
			bs58::encode(keypair_bytes).into_string()
		)
	}
}

impl FromStr for KeyPair {
	type Err = WalletError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let encoded = s.strip_prefix(ED25519_PREFIX).ok_or_else(|| {
			WalletError::KeyStore("Unsupported key type, expected ed25519".to_string())
		})?;

		let bytes = bs58::decode(encoded)
			.into_vec()
			.map_err(|e| WalletError::KeyStore(format!("Invalid base58 secret key: {}", e)))?;

		let (secret, public) = match bytes.len() {
			SECRET_KEY_LENGTH => (&bytes[..], None),
			KEYPAIR_LENGTH => {
				let (secret, public) = bytes.split_at(SECRET_KEY_LENGTH);
				(secret, Some(public))
			}
			len => {
				return Err(WalletError::KeyStore(format!(
					"Invalid secret key length: {} bytes",
					len
				)))
			}
		};

		let secret: [u8; SECRET_KEY_LENGTH] = secret
			.try_into()
			.map_err(|_| WalletError::KeyStore("Invalid secret key".to_string()))?;
		let key_pair = Self::from_secret_bytes(&secret);

		if let Some(public) = public {
			let expected = key_pair.signing_key.verifying_key();
			if public != &expected.as_bytes()[..PUBLIC_KEY_LENGTH] {
				return Err(WalletError::KeyStore(
					"Public key does not match secret key".to_string(),
				));
			}
		}

		Ok(key_pair)
	}
}

impl Serialize for KeyPair {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_string())
	}
}

impl<'de> Deserialize<'de> for KeyPair {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_text_form_round_trip() {
		let key_pair = KeyPair::from_random();
		let text = key_pair.to_string();
		assert!(text.starts_with("ed25519:"));

		let parsed: KeyPair = text.parse().unwrap();
		assert_eq!(parsed, key_pair);
		assert_eq!(parsed.public_key(), key_pair.public_key());
	}

	#[test]
	fn test_public_key_fingerprint() {
		let key_pair = KeyPair::from_secret_bytes(&[7u8; 32]);
		let fingerprint = key_pair.public_key();
		assert!(fingerprint.as_str().starts_with("ed25519:"));

		// Deterministic for a fixed secret
		assert_eq!(
			fingerprint,
			KeyPair::from_secret_bytes(&[7u8; 32]).public_key()
		);
		assert_ne!(
			fingerprint,
			KeyPair::from_secret_bytes(&[8u8; 32]).public_key()
		);
	}

	#[test]
	fn test_rejects_bad_text() {
		assert!("secp256k1:abc".parse::<KeyPair>().is_err());
		assert!("ed25519:0OIl".parse::<KeyPair>().is_err());
		assert!("ed25519:2".parse::<KeyPair>().is_err());
	}

	#[test]
	fn test_debug_hides_secret() {
		let key_pair = KeyPair::from_random();
		let debug = format!("{:?}", key_pair);
		assert!(debug.contains(key_pair.public_key().as_str()));
		assert!(!debug.contains(&key_pair.to_string()));
	}

	#[test]
	fn test_bare_secret_accepted() {
		let key_pair = KeyPair::from_secret_bytes(&[7u8; 32]);
		let text = format!("ed25519:{}", bs58::encode([7u8; 32]).into_string());
		assert_eq!(text.parse::<KeyPair>().unwrap(), key_pair);
	}

	#[test]
	fn test_rejects_mismatched_public_half() {
		let mut bytes = KeyPair::from_secret_bytes(&[7u8; 32])
			.signing_key
			.to_keypair_bytes();
		bytes[SECRET_KEY_LENGTH..]
			.copy_from_slice(KeyPair::from_secret_bytes(&[8u8; 32]).signing_key.verifying_key().as_bytes());

		let text = format!("ed25519:{}", bs58::encode(bytes).into_string());
		assert!(matches!(
			text.parse::<KeyPair>(),
			Err(WalletError::KeyStore(msg)) if msg.contains("does not match")
		));

		// 33 bytes is neither a bare secret nor a full pair
		let odd = format!("ed25519:{}", bs58::encode([1u8; 33]).into_string());
		assert!(odd.parse::<KeyPair>().is_err());
	}
}
