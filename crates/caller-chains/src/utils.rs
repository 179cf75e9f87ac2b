//! Address helpers.

use caller_types::{AccountId, ChainError};
use std::str::FromStr;
use subxt::utils::AccountId32;

/// Parses an SS58 address or a 32-byte hex account id.
pub fn parse_address(address: &str) -> Result<AccountId, ChainError> {
	let address = address.trim();
	if address.starts_with("0x") {
		return AccountId::from_str(address)
			.map_err(|e| ChainError::InvalidAddress(format!("{}: {}", address, e)));
	}

	AccountId32::from_str(address)
		.map(|account| AccountId(account.0))
		.map_err(|e| ChainError::InvalidAddress(format!("{}: {}", address, e)))
}
