use crate::core::Base58Error;
use crate::hd::HdError;
use crate::mnemonic::MnemonicError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("seed phrase not decoded: {0}")]
    Mnemonic(#[from] MnemonicError),
    #[error(transparent)]
    Derivation(#[from] HdError),
    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("address not found in keystore: {0}")]
    AddressNotFound(String),
    #[error("no default address, create one with 'wallet new-address'")]
    NoDefaultAddress,
    #[error("no keystore in {0}, create one with 'wallet create' or 'wallet restore'")]
    NoKeystore(String),
    #[error("keystore already exists at {0}")]
    KeystoreExists(String),
    #[error("keystore is for {found}, expected {expected}")]
    NetworkMismatch { expected: String, found: String },

    // Wrapped external errors
    #[error(transparent)]
    Base58(#[from] Base58Error),
    #[error("keystore serialization: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
