// Seed phrase wallet and HD keystore

mod address;
mod error;
mod keystore;
mod simple_wallet;

pub use address::Address;
pub use error::WalletError;
pub use keystore::Keystore;
pub use simple_wallet::{SimpleWallet, DEMO_PATH, SEED_ENTROPY_BYTES};
