//! ink! contract ABI handling.
//!
//! `ContractMetadata` loads a contract's metadata file and knows how to encode
//! calls and decode outputs and events against it. `ContractProxy` binds the
//! metadata to a deployed address and a chain connection, offering read-only
//! queries and transaction builders for the contract's messages.

use caller_types::{ChainError, DispatchFailure};
use thiserror::Error;

pub mod metadata;
pub mod proxy;

pub use metadata::{ContractMetadata, EventSpec, Message, MessageArg};
pub use proxy::{CallOptions, ContractProxy, QueryResult};

#[derive(Debug, Error)]
pub enum ContractError {
	#[error("Failed to read metadata: {0}")]
	Io(#[from] std::io::Error),

	#[error("Invalid metadata: {0}")]
	InvalidMetadata(String),

	#[error("Unsupported metadata version: {0}")]
	UnsupportedVersion(String),

	#[error("Message not found: {0}")]
	MessageNotFound(String),

	#[error("Message {0} is not payable")]
	NotPayable(String),

	#[error("Decode error: {0}")]
	Decode(String),

	#[error("Contract returned an error: {0}")]
	LangError(String),

	#[error("Contract reverted: {0}")]
	Reverted(String),

	#[error("Dry-run failed: {0}")]
	Dispatch(#[from] DispatchFailure),

	#[error(transparent)]
	Chain(#[from] ChainError),
}
