// Core primitives: hashing, Base58Check, network parameters

mod hash;
mod network;
pub mod base58;

pub use hash::*;
pub use network::Network;
pub use base58::Base58Error;
