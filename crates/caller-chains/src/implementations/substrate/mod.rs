//! Substrate chains running `pallet-contracts`.
//!
//! The connection is made through `subxt` using the default Polkadot
//! configuration (sr25519 signatures, `MultiAddress` accounts). Calls are
//! built dynamically against the node's metadata, so no generated runtime
//! bindings are needed.

mod errors;
mod signer;
mod subxt_adapter;

pub use errors::MetadataErrorRegistry;
pub use signer::SignerAdapter;
pub use subxt_adapter::SubstrateChain;
