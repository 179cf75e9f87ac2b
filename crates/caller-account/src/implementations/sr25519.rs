//! Local sr25519 account backed by `subxt-signer`.

use crate::AccountError;
use caller_types::{AccountId, Signature, SigningAccount};
use std::fmt;
use std::str::FromStr;
use subxt_signer::{sr25519::Keypair, SecretUri};

/// Keypair held in memory, derived from a secret URI.
///
/// Suitable for development chains where accounts such as `//Alice` are
/// derived from the well known dev phrase.
pub struct Sr25519Account {
	keypair: Keypair,
}

impl Sr25519Account {
	/// Derives a keypair from `//Alice`-style paths or
	/// `<mnemonic>[//hard][/soft][///password]` URIs.
	pub fn from_uri(uri: &str) -> Result<Self, AccountError> {
		let secret_uri =
			SecretUri::from_str(uri).map_err(|e| AccountError::InvalidUri(e.to_string()))?;
		let keypair =
			Keypair::from_uri(&secret_uri).map_err(|e| AccountError::InvalidKey(e.to_string()))?;

		Ok(Self { keypair })
	}

	pub fn keypair(&self) -> &Keypair {
		&self.keypair
	}
}

impl SigningAccount for Sr25519Account {
	fn account_id(&self) -> AccountId {
		AccountId(self.keypair.public_key().0)
	}

	fn sign(&self, payload: &[u8]) -> Signature {
		Signature(self.keypair.sign(payload).0)
	}
}

impl fmt::Debug for Sr25519Account {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Sr25519Account")
			.field("account_id", &self.account_id())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use subxt_signer::sr25519;

	const ALICE: &str = "d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d";

	#[test]
	fn test_dev_account_derivation() {
		let alice = Sr25519Account::from_uri("//Alice").unwrap();
		assert_eq!(hex::encode(alice.account_id().0), ALICE);
	}

	#[test]
	fn test_signature_verifies() {
		let alice = Sr25519Account::from_uri("//Alice").unwrap();
		let signature = alice.sign(b"flip");

		let verified = sr25519::verify(
			&sr25519::Signature(signature.0),
			b"flip",
			&alice.keypair().public_key(),
		);
		assert!(verified);
	}

	#[test]
	fn test_distinct_paths_give_distinct_accounts() {
		let alice = Sr25519Account::from_uri("//Alice").unwrap();
		let bob = Sr25519Account::from_uri("//Bob").unwrap();
		assert_ne!(alice.account_id(), bob.account_id());
	}

	#[test]
	fn test_invalid_phrase_is_rejected() {
		let result = Sr25519Account::from_uri("definitely not a valid mnemonic//Alice");
		assert!(result.is_err());
	}
}
