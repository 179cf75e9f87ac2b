//! Dispatch errors reported for included transactions.
//!
//! `RawDispatchError` mirrors the SCALE layout of the runtime's
//! `DispatchError` so it can be decoded straight from `System.ExtrinsicFailed`
//! event data or from a contract dry-run result. `DispatchFailure` is the
//! decoded, human readable form handed to callers.

use codec::{Decode, Encode};
use std::fmt;
use thiserror::Error;

/// Index pair identifying a module error in the runtime metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct ModuleErrorIndex {
	/// Index of the pallet that raised the error.
	pub pallet_index: u8,
	/// Encoded error variant; the first byte is the variant index.
	pub error: [u8; 4],
}

impl ModuleErrorIndex {
	pub fn variant_index(&self) -> u8 {
		self.error[0]
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum TokenError {
	FundsUnavailable,
	OnlyProvider,
	BelowMinimum,
	CannotCreate,
	UnknownAsset,
	Frozen,
	Unsupported,
	CannotCreateHold,
	NotExpendable,
	Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum ArithmeticError {
	Underflow,
	Overflow,
	DivisionByZero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum TransactionalError {
	LimitReached,
	NoLayer,
}

/// Undecoded dispatch error as emitted by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum RawDispatchError {
	#[codec(index = 0)]
	Other,
	#[codec(index = 1)]
	CannotLookup,
	#[codec(index = 2)]
	BadOrigin,
	#[codec(index = 3)]
	Module(ModuleErrorIndex),
	#[codec(index = 4)]
	ConsumerRemaining,
	#[codec(index = 5)]
	NoProviders,
	#[codec(index = 6)]
	TooManyConsumers,
	#[codec(index = 7)]
	Token(TokenError),
	#[codec(index = 8)]
	Arithmetic(ArithmeticError),
	#[codec(index = 9)]
	Transactional(TransactionalError),
	#[codec(index = 10)]
	Exhausted,
	#[codec(index = 11)]
	Corruption,
	#[codec(index = 12)]
	Unavailable,
	#[codec(index = 13)]
	RootNotAllowed,
}

impl fmt::Display for RawDispatchError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RawDispatchError::Module(index) => write!(
				f,
				"Module {{ index: {}, error: 0x{} }}",
				index.pallet_index,
				hex::encode(index.error)
			),
			other => write!(f, "{:?}", other),
		}
	}
}

/// Human readable description of a module error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleErrorMetadata {
	pub pallet: String,
	pub name: String,
	pub docs: Vec<String>,
}

/// Lookup table from module error indices to their metadata.
pub trait ErrorRegistry: Send + Sync {
	fn find_module_error(&self, index: &ModuleErrorIndex) -> Option<ModuleErrorMetadata>;
}

/// Why an included transaction did not apply its intended state change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchFailure {
	/// Error raised by a pallet, resolved through the error registry.
	#[error("{pallet}.{name}: {docs}")]
	Module {
		pallet: String,
		name: String,
		docs: String,
	},
	/// Any other dispatch error, carried as its raw descriptor.
	#[error("{0}")]
	Other(String),
}

impl DispatchFailure {
	/// Decodes a raw dispatch error, consulting `registry` for module errors.
	///
	/// A module error the registry does not know is reported as `Other`.
	pub fn from_raw(raw: &RawDispatchError, registry: &dyn ErrorRegistry) -> Self {
		match raw {
			RawDispatchError::Module(index) => match registry.find_module_error(index) {
				Some(meta) => DispatchFailure::Module {
					pallet: meta.pallet,
					name: meta.name,
					docs: meta.docs.join(" "),
				},
				None => DispatchFailure::Other(raw.to_string()),
			},
			other => DispatchFailure::Other(other.to_string()),
		}
	}
}
