//! Chain connection implementations.
//!
//! - **Substrate chains** with `pallet-contracts`, via the `substrate` module

pub mod substrate;
