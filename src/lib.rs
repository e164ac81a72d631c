// Simple HD wallet
// Seed phrases (BIP39) and deterministic key hierarchies (BIP32)

pub mod core;
pub mod mnemonic;
pub mod hd;
pub mod wallet;
pub mod cli;

// Re-exports for convenience
pub use crate::core::Network;
pub use crate::mnemonic::{MnemonicCode, MnemonicError};
pub use crate::hd::{ChildNumber, DeterministicHierarchy, DeterministicKey, HdError, HdPath};
pub use crate::wallet::{Address, Keystore, SimpleWallet, WalletError};
pub use crate::cli::{Cli, CliHandler};
