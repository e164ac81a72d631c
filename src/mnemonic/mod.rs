// Seed phrases (BIP39)

mod code;
mod error;

pub use code::{MnemonicCode, split_phrase, PBKDF2_ROUNDS};
pub use error::MnemonicError;
