//! Chain connection seam.

use crate::{ContractCall, ContractCallRequest, ErrorRegistry, SigningAccount, TxUpdate};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
	#[error("Connection error: {0}")]
	Connection(String),

	#[error("Submission error: {0}")]
	Submission(String),

	#[error("Runtime API error: {0}")]
	RuntimeApi(String),

	#[error("Decode error: {0}")]
	Decode(String),

	#[error("Invalid address: {0}")]
	InvalidAddress(String),
}

/// Failure reported by the status stream before the transaction made it into
/// a block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
	#[error("Transaction invalid: {0}")]
	Invalid(String),

	#[error("Transaction dropped: {0}")]
	Dropped(String),

	#[error("Subscription error: {0}")]
	Subscription(String),
}

/// Cancels a status subscription. Only the first `cancel` has an effect.
pub struct Unsubscribe(Option<Box<dyn FnOnce() + Send>>);

impl Unsubscribe {
	pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
		Self(Some(Box::new(cancel)))
	}

	pub fn cancel(&mut self) {
		if let Some(cancel) = self.0.take() {
			cancel();
		}
	}

	pub fn is_cancelled(&self) -> bool {
		self.0.is_none()
	}
}

impl fmt::Debug for Unsubscribe {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Unsubscribe")
			.field("cancelled", &self.is_cancelled())
			.finish()
	}
}

/// Live status stream of one submitted transaction.
pub struct Subscription {
	pub updates: BoxStream<'static, Result<TxUpdate, TransportError>>,
	pub unsubscribe: Unsubscribe,
}

/// Connection to a node exposing `pallet-contracts`.
#[async_trait]
pub trait ChainInterface: Send + Sync {
	/// Signs `call` with `signer`, submits it and subscribes to its status.
	async fn submit_and_watch(
		&self,
		call: ContractCall,
		signer: &dyn SigningAccount,
	) -> Result<Subscription, ChainError>;

	/// Dry-runs a contract call through the `ContractsApi_call` runtime API,
	/// returning the SCALE encoded `ContractExecResult`.
	async fn call_contract(&self, request: ContractCallRequest) -> Result<Vec<u8>, ChainError>;

	/// Registry used to resolve module errors of this chain.
	fn error_registry(&self) -> Arc<dyn ErrorRegistry>;
}
