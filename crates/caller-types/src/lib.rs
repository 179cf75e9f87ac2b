//! Shared types for the contract caller.
//!
//! This crate holds the value types that flow between the chain backend, the
//! contract proxy and the transaction resolver, together with the trait seams
//! (`ChainInterface`, `SigningAccount`, `ErrorRegistry`, `ContractEventDecoder`)
//! that keep those components independent of each other.

pub mod account;
pub mod chain;
pub mod contract;
pub mod dispatch;
pub mod events;
pub mod status;
pub mod weight;

pub use account::*;
pub use chain::*;
pub use contract::*;
pub use dispatch::*;
pub use events::*;
pub use status::*;
pub use weight::*;
