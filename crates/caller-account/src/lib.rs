//! Signing identities for contract calls.

use caller_types::SigningAccount;
use std::sync::Arc;
use thiserror::Error;

pub mod implementations;

pub use implementations::sr25519::Sr25519Account;

#[derive(Debug, Error)]
pub enum AccountError {
	#[error("Invalid secret URI: {0}")]
	InvalidUri(String),
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// Derives the signing account described by a secret URI.
pub fn account_from_uri(uri: &str) -> Result<Arc<dyn SigningAccount>, AccountError> {
	let account = Sr25519Account::from_uri(uri)?;
	tracing::info!(account = %account.account_id(), "Loaded signing account");
	Ok(Arc::new(account))
}
