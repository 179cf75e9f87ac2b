//! Contract caller service.
//!
//! Wires configuration, the chain connection, the signing account and the
//! contract ABI together and runs the flipper scenario: read the stored
//! value, flip it, read it again.
//!
//! - `cli`: command-line interface
//! - `flipper`: the `get` query and `flip` call against a flipper contract

pub mod cli;
pub mod flipper;

pub use flipper::{Flipper, FlipperError};
