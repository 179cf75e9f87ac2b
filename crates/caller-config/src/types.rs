//! Configuration types for the contract caller.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Address of the flipper contract the reference scenario talks to.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "5ER7FDusXd9uCLPRhAL4YKovMXarP9N6DHgCUVZEtcJSgncC";

/// Complete caller configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CallerConfig {
	/// Node connection
	#[serde(default)]
	pub node: NodeConfig,
	/// Signing identity
	#[serde(default)]
	pub account: AccountConfig,
	/// Target contract
	#[serde(default)]
	pub contract: ContractConfig,
	/// Log output
	#[serde(default)]
	pub logging: LoggingConfig,
}

/// Node connection settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NodeConfig {
	/// WebSocket endpoint of the node
	pub url: String,
	/// Allow unencrypted connections to non-local hosts
	#[serde(default)]
	pub allow_insecure: bool,
}

impl Default for NodeConfig {
	fn default() -> Self {
		Self {
			url: "ws://127.0.0.1:9944".to_string(),
			allow_insecure: false,
		}
	}
}

/// Signing identity settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Secret URI: a dev derivation such as `//Alice`, or a mnemonic phrase
	/// optionally followed by derivation junctions
	pub seed: String,
}

impl Default for AccountConfig {
	fn default() -> Self {
		Self {
			seed: "//Alice".to_string(),
		}
	}
}

/// Target contract settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ContractConfig {
	/// SS58 or hex address of the deployed contract
	pub address: String,
	/// Path to the contract metadata (`.contract` or `.json`)
	pub metadata: PathBuf,
}

impl Default for ContractConfig {
	fn default() -> Self {
		Self {
			address: DEFAULT_CONTRACT_ADDRESS.to_string(),
			metadata: PathBuf::from("flipper.contract"),
		}
	}
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
	/// Default filter directive when `RUST_LOG` is unset
	pub level: String,
	/// Emit JSON formatted log lines
	#[serde(default)]
	pub json: bool,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			json: false,
		}
	}
}
