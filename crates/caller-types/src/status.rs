//! Transaction pool and block inclusion status.

use std::fmt;

/// 32-byte hash (block or extrinsic).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct H256(pub [u8; 32]);

impl fmt::Display for H256 {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(self.0))
	}
}

/// Where an included transaction ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InclusionRef {
	pub block_hash: H256,
	pub extrinsic_hash: H256,
}

/// Lifecycle status of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
	/// Accepted by the local pool.
	Validated,
	/// Gossiped to peers.
	Broadcasted,
	/// Previously in a best block that got retracted.
	NoLongerInBestBlock,
	/// Included in a best block.
	InBlock(InclusionRef),
	/// Included in a finalized block.
	Finalized(InclusionRef),
	/// Rejected by the pool.
	Invalid(String),
	/// Dropped from the pool.
	Dropped(String),
	/// The node gave up watching the transaction.
	Error(String),
}

impl TxStatus {
	/// Whether the status reports inclusion in a block, best or finalized.
	pub fn is_in_block(&self) -> bool {
		matches!(self, TxStatus::InBlock(_) | TxStatus::Finalized(_))
	}

	/// Whether the status means the transaction will never be included.
	pub fn is_error(&self) -> bool {
		matches!(
			self,
			TxStatus::Invalid(_) | TxStatus::Dropped(_) | TxStatus::Error(_)
		)
	}

	pub fn inclusion(&self) -> Option<&InclusionRef> {
		match self {
			TxStatus::InBlock(inclusion) | TxStatus::Finalized(inclusion) => Some(inclusion),
			_ => None,
		}
	}
}

impl fmt::Display for TxStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TxStatus::Validated => write!(f, "Validated"),
			TxStatus::Broadcasted => write!(f, "Broadcasted"),
			TxStatus::NoLongerInBestBlock => write!(f, "NoLongerInBestBlock"),
			TxStatus::InBlock(inclusion) => write!(f, "InBlock({})", inclusion.block_hash),
			TxStatus::Finalized(inclusion) => write!(f, "Finalized({})", inclusion.block_hash),
			TxStatus::Invalid(message) => write!(f, "Invalid({})", message),
			TxStatus::Dropped(message) => write!(f, "Dropped({})", message),
			TxStatus::Error(message) => write!(f, "Error({})", message),
		}
	}
}
