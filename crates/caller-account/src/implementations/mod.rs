//! Account implementations.
//!
//! Available implementations:
//! - `sr25519`: local sr25519 keypair derived from a secret URI

pub mod sr25519;
