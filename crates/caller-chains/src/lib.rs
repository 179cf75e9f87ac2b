//! Chain connections for the contract caller.
//!
//! Implementations of the `ChainInterface` seam live under `implementations`.
//! `utils` holds address parsing shared by the binary and the backends.

pub mod implementations;
pub mod utils;

pub use implementations::substrate::{MetadataErrorRegistry, SignerAdapter, SubstrateChain};
pub use utils::parse_address;
