// Seed phrase wallet: generate a phrase, restore the master key from it

use crate::hd::derivation::create_master_private_key;
use crate::hd::{DeterministicHierarchy, DeterministicKey, HdPath};
use crate::mnemonic::{split_phrase, MnemonicCode, MnemonicError};
use crate::wallet::WalletError;
use rand::rngs::OsRng;
use rand::RngCore;

/// 32 bytes of randomness resulting in 24 seed words
pub const SEED_ENTROPY_BYTES: usize = 32;

/// Path derived by the demo flow
pub const DEMO_PATH: &str = "m/44H/0H/0H/182";

pub struct SimpleWallet {
    mnemonic_code: MnemonicCode,
}

impl SimpleWallet {
    pub fn new() -> Self {
        Self {
            mnemonic_code: MnemonicCode::new(),
        }
    }

    pub fn mnemonic_code(&self) -> &MnemonicCode {
        &self.mnemonic_code
    }

    /// Generate a fresh 24 word seed phrase from OS randomness
    pub fn generate_seed_phrase(&self) -> Result<String, MnemonicError> {
        self.generate_seed_phrase_with(&mut OsRng, SEED_ENTROPY_BYTES)
    }

    pub fn generate_seed_phrase_with<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
        entropy_bytes: usize,
    ) -> Result<String, MnemonicError> {
        let phrase = self.mnemonic_code.generate(rng, entropy_bytes)?;
        Ok(phrase.join(" "))
    }

    /// Check a seed phrase and turn it into a master private key (empty passphrase)
    pub fn from_seed(&self, seed_phrase: &str) -> Result<DeterministicKey, WalletError> {
        self.from_seed_with_passphrase(seed_phrase, "")
    }

    pub fn from_seed_with_passphrase(
        &self,
        seed_phrase: &str,
        passphrase: &str,
    ) -> Result<DeterministicKey, WalletError> {
        let words = split_phrase(seed_phrase);
        self.mnemonic_code.check(&words)?;

        let seed = MnemonicCode::to_seed(&words, passphrase);
        Ok(create_master_private_key(&seed)?)
    }

    /// Restore the master key and return the key at `path` below it
    pub fn derive_path(
        &self,
        seed_phrase: &str,
        passphrase: &str,
        path: &HdPath,
    ) -> Result<DeterministicKey, WalletError> {
        let root_key = self.from_seed_with_passphrase(seed_phrase, passphrase)?;
        let mut hierarchy = DeterministicHierarchy::new(root_key);
        let key = hierarchy.get(&path[..path.len()], true, true)?;
        Ok(key.clone())
    }
}

impl Default for SimpleWallet {
    fn default() -> Self {
        Self::new()
    }
}
