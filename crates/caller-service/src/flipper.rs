//! The flipper scenario.

use caller_contract::{CallOptions, ContractError, ContractProxy};
use caller_delivery::{sign_and_resolve, ResolveError};
use caller_types::{ChainInterface, SigningAccount};
use scale_value::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum FlipperError {
	#[error(transparent)]
	Contract(#[from] ContractError),

	#[error(transparent)]
	Resolve(#[from] ResolveError),

	#[error("Message {0} returned no value")]
	NoOutput(String),
}

/// A deployed flipper contract and the account that calls it.
pub struct Flipper {
	chain: Arc<dyn ChainInterface>,
	signer: Arc<dyn SigningAccount>,
	contract: ContractProxy,
}

impl Flipper {
	pub fn new(
		chain: Arc<dyn ChainInterface>,
		signer: Arc<dyn SigningAccount>,
		contract: ContractProxy,
	) -> Self {
		Self {
			chain,
			signer,
			contract,
		}
	}

	/// Queries `get` and returns the decoded output.
	pub async fn get_value(&self) -> Result<Value<u32>, FlipperError> {
		let result = self
			.contract
			.query(&self.signer.account_id(), "get", &[])
			.await?;
		let output = result
			.output
			.ok_or_else(|| FlipperError::NoOutput("get".to_string()))?;

		info!("getValue: output:: {}", output);
		Ok(output)
	}

	/// Dry-runs `flip` for a gas estimate, then submits it and waits for
	/// inclusion.
	pub async fn flip_value(&self) -> Result<(), FlipperError> {
		let estimate = self
			.contract
			.query(&self.signer.account_id(), "flip", &[])
			.await?;
		info!("flipValue: gasLimit:: {}", estimate.gas_required);

		let call = self.contract.tx(
			"flip",
			&[],
			CallOptions::with_gas_limit(estimate.gas_required),
		)?;

		sign_and_resolve(
			self.chain.as_ref(),
			"flipValue",
			call,
			self.signer.as_ref(),
			|_| (),
		)
		.await?;
		Ok(())
	}

	/// `get`, `flip`, `get`.
	pub async fn run(&self) -> Result<(), FlipperError> {
		self.get_value().await?;
		self.flip_value().await?;
		self.get_value().await?;
		Ok(())
	}
}
