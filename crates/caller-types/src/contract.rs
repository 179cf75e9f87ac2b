//! Contract call payloads and dry-run results.

use crate::{AccountId, ContractEvent, RawDispatchError, StorageDeposit, Weight};
use codec::{Decode, Encode};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Failed to decode contract event: {0}")]
pub struct EventDecodeError(pub String);

/// Decodes `Contracts.ContractEmitted` payloads against a contract ABI.
pub trait ContractEventDecoder: Send + Sync {
	/// `topics` are the topics of the event record, `data` its payload.
	fn decode_event(
		&self,
		topics: &[[u8; 32]],
		data: &[u8],
	) -> Result<ContractEvent, EventDecodeError>;
}

/// A state-changing contract call, ready to be signed and submitted.
///
/// Corresponds to the `Contracts.call` extrinsic.
#[derive(Clone)]
pub struct ContractCall {
	pub dest: AccountId,
	pub value: u128,
	pub gas_limit: Weight,
	pub storage_deposit_limit: Option<u128>,
	/// Message selector followed by the SCALE encoded arguments.
	pub data: Vec<u8>,
	/// Decoder for events emitted by `dest` while executing the call.
	pub event_decoder: Option<Arc<dyn ContractEventDecoder>>,
}

impl fmt::Debug for ContractCall {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ContractCall")
			.field("dest", &self.dest)
			.field("value", &self.value)
			.field("gas_limit", &self.gas_limit)
			.field("storage_deposit_limit", &self.storage_deposit_limit)
			.field("data", &hex::encode(&self.data))
			.field("event_decoder", &self.event_decoder.is_some())
			.finish()
	}
}

/// Parameters of the `ContractsApi_call` runtime API, encoded in order.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ContractCallRequest {
	pub origin: AccountId,
	pub dest: AccountId,
	pub value: u128,
	/// `None` lets the node use the maximum block weight.
	pub gas_limit: Option<Weight>,
	pub storage_deposit_limit: Option<u128>,
	pub input_data: Vec<u8>,
}

/// Output of a contract execution.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ExecReturnValue {
	pub flags: u32,
	pub data: Vec<u8>,
}

impl ExecReturnValue {
	const REVERT: u32 = 0x0000_0001;

	/// Whether the contract asked for its state changes to be rolled back.
	pub fn did_revert(&self) -> bool {
		self.flags & Self::REVERT != 0
	}
}

/// Result of a contract dry-run.
///
/// The runtime appends an optional list of event records which is not decoded.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ContractExecResult {
	pub gas_consumed: Weight,
	pub gas_required: Weight,
	pub storage_deposit: StorageDeposit,
	pub debug_message: Vec<u8>,
	pub result: Result<ExecReturnValue, RawDispatchError>,
}
