//! Contract bound to an address and a chain connection.

use crate::{ContractError, ContractMetadata};
use caller_types::{
	AccountId, ChainInterface, ContractCall, ContractCallRequest, ContractEventDecoder,
	ContractExecResult, DispatchFailure, StorageDeposit, Weight,
};
use codec::Decode;
use scale_value::Value;
use std::sync::Arc;
use tracing::debug;

/// Options for a state-changing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOptions {
	pub value: u128,
	pub gas_limit: Weight,
	pub storage_deposit_limit: Option<u128>,
}

impl CallOptions {
	pub fn with_gas_limit(gas_limit: Weight) -> Self {
		Self {
			value: 0,
			gas_limit,
			storage_deposit_limit: None,
		}
	}
}

/// Outcome of a read-only dry-run.
#[derive(Debug, Clone)]
pub struct QueryResult {
	/// Decoded return value, `None` for messages without one.
	pub output: Option<Value<u32>>,
	pub gas_consumed: Weight,
	pub gas_required: Weight,
	pub storage_deposit: StorageDeposit,
	pub debug_message: String,
}

pub struct ContractProxy {
	chain: Arc<dyn ChainInterface>,
	address: AccountId,
	metadata: Arc<ContractMetadata>,
}

impl ContractProxy {
	pub fn new(
		chain: Arc<dyn ChainInterface>,
		address: AccountId,
		metadata: Arc<ContractMetadata>,
	) -> Self {
		Self {
			chain,
			address,
			metadata,
		}
	}

	/// Dry-runs `message` as `origin` without gas limit.
	///
	/// A dry-run that traps or reverts is reported as an error even though
	/// the runtime API call itself succeeded.
	pub async fn query(
		&self,
		origin: &AccountId,
		message: &str,
		encoded_args: &[u8],
	) -> Result<QueryResult, ContractError> {
		let message = self.metadata.message(message)?;
		let request = ContractCallRequest {
			origin: *origin,
			dest: self.address,
			value: 0,
			gas_limit: None,
			storage_deposit_limit: None,
			input_data: message.call_data(encoded_args),
		};

		let bytes = self.chain.call_contract(request).await?;
		let exec = ContractExecResult::decode(&mut bytes.as_slice())
			.map_err(|e| ContractError::Decode(format!("ContractExecResult: {}", e)))?;

		debug!(
			message = %message.label,
			gas_consumed = %exec.gas_consumed,
			gas_required = %exec.gas_required,
			"Dry-run complete"
		);

		let returned = match exec.result {
			Ok(returned) => returned,
			Err(raw) => {
				let registry = self.chain.error_registry();
				return Err(DispatchFailure::from_raw(&raw, registry.as_ref()).into());
			}
		};

		if returned.did_revert() {
			let reason = match self.metadata.decode_output(message, &returned.data) {
				Ok(Some(value)) => value.to_string(),
				_ => format!("0x{}", hex::encode(&returned.data)),
			};
			return Err(ContractError::Reverted(reason));
		}

		Ok(QueryResult {
			output: self.metadata.decode_output(message, &returned.data)?,
			gas_consumed: exec.gas_consumed,
			gas_required: exec.gas_required,
			storage_deposit: exec.storage_deposit,
			debug_message: String::from_utf8_lossy(&exec.debug_message).into_owned(),
		})
	}

	/// Builds a `Contracts.call` for `message`.
	pub fn tx(
		&self,
		message: &str,
		encoded_args: &[u8],
		options: CallOptions,
	) -> Result<ContractCall, ContractError> {
		let message = self.metadata.message(message)?;
		if options.value > 0 && !message.payable {
			return Err(ContractError::NotPayable(message.label.clone()));
		}

		Ok(ContractCall {
			dest: self.address,
			value: options.value,
			gas_limit: options.gas_limit,
			storage_deposit_limit: options.storage_deposit_limit,
			data: message.call_data(encoded_args),
			event_decoder: Some(self.metadata.clone() as Arc<dyn ContractEventDecoder>),
		})
	}
}
