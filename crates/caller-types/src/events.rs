//! Decoded events and the per-update submission snapshot.

use crate::{RawDispatchError, TxStatus};
use std::fmt;

/// A runtime event attached to the submitted extrinsic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEvent {
	pub pallet: String,
	pub variant: String,
	/// Human readable rendering of the event fields, if it has any.
	pub fields: Option<String>,
}

impl fmt::Display for ChainEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.pallet, self.variant)?;
		if let Some(fields) = &self.fields {
			write!(f, "({})", fields)?;
		}
		Ok(())
	}
}

/// An event emitted by contract code, decoded against the contract ABI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractEvent {
	pub identifier: String,
	/// Human readable rendering of each event argument.
	pub args: Vec<String>,
}

impl fmt::Display for ContractEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}({})", self.identifier, self.args.join(", "))
	}
}

/// One update from a transaction status subscription.
///
/// Events, dispatch metadata and contract events are only populated once the
/// transaction has been included in a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxUpdate {
	pub status: TxStatus,
	pub events: Vec<ChainEvent>,
	/// Human readable dispatch info (weight, class, fee payment).
	pub dispatch_info: Option<String>,
	pub dispatch_error: Option<RawDispatchError>,
	pub contract_events: Vec<ContractEvent>,
}

impl TxUpdate {
	/// Update carrying only a status, as seen before block inclusion.
	pub fn pending(status: TxStatus) -> Self {
		Self {
			status,
			events: Vec::new(),
			dispatch_info: None,
			dispatch_error: None,
			contract_events: Vec::new(),
		}
	}
}
