//! Execution cost ("gas") accounting.

use codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Two-dimensional weight charged for executing a call.
///
/// Matches the runtime's `Weight`, whose fields are compact encoded.
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode, Serialize, Deserialize,
)]
pub struct Weight {
	#[codec(compact)]
	pub ref_time: u64,
	#[codec(compact)]
	pub proof_size: u64,
}

impl Weight {
	pub fn new(ref_time: u64, proof_size: u64) -> Self {
		Self {
			ref_time,
			proof_size,
		}
	}
}

impl fmt::Display for Weight {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{{ refTime: {}, proofSize: {} }}",
			self.ref_time, self.proof_size
		)
	}
}

/// Storage deposit movement reported by a contract dry-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum StorageDeposit {
	Refund(u128),
	Charge(u128),
}

impl fmt::Display for StorageDeposit {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StorageDeposit::Refund(amount) => write!(f, "Refund({})", amount),
			StorageDeposit::Charge(amount) => write!(f, "Charge({})", amount),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_weight_is_compact_encoded() {
		let weight = Weight::new(1, 2);
		// one byte per small compact value
		assert_eq!(weight.encode(), vec![0x04, 0x08]);

		let decoded = Weight::decode(&mut &[0x04u8, 0x08][..]).unwrap();
		assert_eq!(decoded, weight);
	}

	#[test]
	fn test_weight_display() {
		assert_eq!(
			Weight::new(1_000, 64).to_string(),
			"{ refTime: 1000, proofSize: 64 }"
		);
	}
}
