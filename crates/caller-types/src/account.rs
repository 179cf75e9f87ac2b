//! Account identities and the signing seam.

use codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 32-byte account identifier (public key or contract address).
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize,
)]
pub struct AccountId(pub [u8; 32]);

impl fmt::Display for AccountId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(self.0))
	}
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountIdError {
	#[error("Invalid hex: {0}")]
	InvalidHex(String),
	#[error("Expected 32 bytes, got {0}")]
	InvalidLength(usize),
}

/// Parses a hex encoded account id, with or without the `0x` prefix.
///
/// SS58 addresses are chain specific and are parsed by the chain backend.
impl FromStr for AccountId {
	type Err = AccountIdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let stripped = s.strip_prefix("0x").unwrap_or(s);
		let bytes = hex::decode(stripped).map_err(|e| AccountIdError::InvalidHex(e.to_string()))?;
		let raw: [u8; 32] = bytes
			.as_slice()
			.try_into()
			.map_err(|_| AccountIdError::InvalidLength(bytes.len()))?;
		Ok(AccountId(raw))
	}
}

/// Raw sr25519 signature bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

/// A cryptographic identity able to authorize transactions.
///
/// Signing is synchronous: implementations hold their key material locally.
pub trait SigningAccount: Send + Sync {
	/// The account that pays for and originates transactions.
	fn account_id(&self) -> AccountId;

	/// Signs an extrinsic signer payload.
	fn sign(&self, payload: &[u8]) -> Signature;
}
