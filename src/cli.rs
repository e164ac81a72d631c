// CLI commands

use crate::core::Network;
use crate::hd::{DeterministicKey, HdPath};
use crate::mnemonic::{split_phrase, MnemonicCode};
use crate::wallet::{
    Address, Keystore, SimpleWallet, WalletError, DEMO_PATH, SEED_ENTROPY_BYTES,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "simple-wallet")]
#[command(about = "Seed phrase HD wallet", long_about = None)]
pub struct Cli {
    /// Directory holding the keystore
    #[arg(long, global = true, default_value = "./data")]
    pub data_dir: PathBuf,

    /// Network (mainnet or testnet). Wallet commands default to the keystore's network.
    #[arg(long, global = true)]
    pub network: Option<Network>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a seed phrase and derive the key at PATH from it
    Demo {
        #[arg(default_value = DEMO_PATH)]
        path: HdPath,
    },

    /// Seed phrase commands
    #[command(subcommand)]
    Phrase(PhraseCommands),

    /// Derive the key at PATH from a seed phrase
    Derive {
        /// Derivation path, e.g. m/44H/0H/0H/0/0
        path: HdPath,
        /// Seed phrase (quoted)
        #[arg(long)]
        phrase: String,
        #[arg(long, default_value = "")]
        passphrase: String,
        /// Only print public data
        #[arg(long)]
        public: bool,
    },

    /// Wallet commands
    #[command(subcommand)]
    Wallet(WalletCommands),
}

#[derive(Subcommand)]
pub enum PhraseCommands {
    /// Generate a new seed phrase
    Generate {
        /// Bytes of entropy (multiple of 4)
        #[arg(long, default_value_t = SEED_ENTROPY_BYTES)]
        entropy_bytes: usize,
    },

    /// Check word count, words and checksum of a seed phrase
    Check { phrase: String },

    /// Print the 64 byte seed of a phrase
    Seed {
        phrase: String,
        #[arg(long, default_value = "")]
        passphrase: String,
    },
}

#[derive(Subcommand)]
pub enum WalletCommands {
    /// Create a keystore from a new seed phrase
    Create {
        #[arg(long, default_value = "")]
        passphrase: String,
    },

    /// Create a keystore from an existing seed phrase
    Restore {
        phrase: String,
        #[arg(long, default_value = "")]
        passphrase: String,
    },

    /// Create a new address
    NewAddress,

    /// List all addresses
    List,

    /// Show path and public key of an address (uses default if not specified)
    Show { address: Option<String> },

    /// Print the account extended public key
    Xpub,
}

/// CLI handler
pub struct CliHandler {
    wallet: SimpleWallet,
    data_dir: PathBuf,
    keystore_path: PathBuf,
    network: Option<Network>,
}

impl CliHandler {
    /// Create a new CLI handler
    pub fn new<P: AsRef<Path>>(data_dir: P, network: Option<Network>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        let keystore_path = data_dir.join("keystore.json");
        Self {
            wallet: SimpleWallet::new(),
            data_dir,
            keystore_path,
            network,
        }
    }

    fn network(&self) -> Network {
        self.network.unwrap_or_default()
    }

    /// Handle CLI command
    pub fn handle(&self, command: Commands) -> Result<(), WalletError> {
        match command {
            Commands::Demo { path } => self.demo(&path),
            Commands::Phrase(cmd) => self.handle_phrase(cmd),
            Commands::Derive {
                path,
                phrase,
                passphrase,
                public,
            } => self.derive(&path, &phrase, &passphrase, public),
            Commands::Wallet(cmd) => self.handle_wallet(cmd),
        }
    }

    /// Generate a phrase, restore its root key and derive `path` below it
    fn demo(&self, path: &HdPath) -> Result<(), WalletError> {
        let result = self.wallet.generate_seed_phrase().map_err(WalletError::from).and_then(|phrase| {
            println!("Seed phrase: {}", phrase);
            self.wallet.derive_path(&phrase, "", path)
        });

        match result {
            Ok(key) => {
                println!("{}", key.path_as_string());
                println!("{}", path);
                Ok(())
            }
            Err(WalletError::Mnemonic(e)) => {
                println!("Seed phrase not decoded. Aborting.: {}", e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Handle seed phrase commands
    fn handle_phrase(&self, cmd: PhraseCommands) -> Result<(), WalletError> {
        let mnemonic_code = self.wallet.mnemonic_code();
        match cmd {
            PhraseCommands::Generate { entropy_bytes } => {
                let phrase = self
                    .wallet
                    .generate_seed_phrase_with(&mut rand::rngs::OsRng, entropy_bytes)?;
                println!("{}", phrase);
                Ok(())
            }
            PhraseCommands::Check { phrase } => {
                let words = split_phrase(&phrase);
                let entropy = mnemonic_code.to_entropy(&words)?;
                println!("✓ Valid seed phrase ({} words, {} bits of entropy)", words.len(), entropy.len() * 8);
                Ok(())
            }
            PhraseCommands::Seed { phrase, passphrase } => {
                let words = split_phrase(&phrase);
                mnemonic_code.check(&words)?;
                println!("{}", hex::encode(MnemonicCode::to_seed(&words, &passphrase)));
                Ok(())
            }
        }
    }

    fn derive(
        &self,
        path: &HdPath,
        phrase: &str,
        passphrase: &str,
        public: bool,
    ) -> Result<(), WalletError> {
        let network = self.network();
        let key = self.wallet.derive_path(phrase, passphrase, path)?;
        let key = if public { key.neuter() } else { key };
        self.print_key(&key, network)
    }

    /// Print key information
    fn print_key(&self, key: &DeterministicKey, network: Network) -> Result<(), WalletError> {
        println!("Key:");
        println!("  Path: {}", key.path_as_string());
        println!("  Depth: {}", key.depth());
        println!("  Fingerprint: {:08x}", key.fingerprint());
        println!("  Parent fingerprint: {:08x}", key.parent_fingerprint());
        println!("  Public key: {}", hex::encode(key.pubkey_bytes()));
        println!("  Address: {}", Address::from_public_key(key.public_key(), network));
        println!("  Extended public key: {}", key.serialize_pub_b58(network));
        if key.has_private_key() {
            println!("  Extended private key: {}", key.serialize_priv_b58(network)?);
            println!("  WIF: {}", key.to_wif(network)?);
        }
        Ok(())
    }

    /// Load keystore from disk
    fn load_keystore(&self) -> Result<Keystore, WalletError> {
        if !self.keystore_path.exists() {
            return Err(WalletError::NoKeystore(self.data_dir.display().to_string()));
        }

        log::info!("Loading keystore from {}", self.keystore_path.display());
        let keystore = Keystore::load(&self.keystore_path)?;

        if let Some(network) = self.network {
            if network != keystore.network() {
                return Err(WalletError::NetworkMismatch {
                    expected: network.to_string(),
                    found: keystore.network().to_string(),
                });
            }
        }
        Ok(keystore)
    }

    /// Save keystore to disk
    fn save_keystore(&self, keystore: &Keystore) -> Result<(), WalletError> {
        std::fs::create_dir_all(&self.data_dir)?;
        keystore.save(&self.keystore_path)
    }

    fn create_keystore(&self, phrase: &str, passphrase: &str) -> Result<Keystore, WalletError> {
        if self.keystore_path.exists() {
            return Err(WalletError::KeystoreExists(
                self.keystore_path.display().to_string(),
            ));
        }

        let master = self.wallet.from_seed_with_passphrase(phrase, passphrase)?;
        let keystore = Keystore::new(master, self.network())?;
        log::info!("Creating new keystore in {}", self.data_dir.display());
        self.save_keystore(&keystore)?;
        Ok(keystore)
    }

    /// Handle wallet commands
    fn handle_wallet(&self, cmd: WalletCommands) -> Result<(), WalletError> {
        match cmd {
            WalletCommands::Create { passphrase } => {
                let phrase = self.wallet.generate_seed_phrase()?;
                let keystore = self.create_keystore(&phrase, &passphrase)?;
                println!("✓ Keystore created ({})", keystore.network());
                println!("  Write down your seed phrase:");
                println!("  {}", phrase);
                Ok(())
            }
            WalletCommands::Restore { phrase, passphrase } => {
                let keystore = self.create_keystore(&phrase, &passphrase)?;
                println!("✓ Keystore restored ({})", keystore.network());
                println!("  Account: {}", keystore.account_path());
                Ok(())
            }
            WalletCommands::NewAddress => {
                let mut keystore = self.load_keystore()?;
                let addr = keystore.new_address()?;
                println!("New address: {}", addr);
                self.save_keystore(&keystore)?;
                Ok(())
            }
            WalletCommands::List => {
                let keystore = self.load_keystore()?;
                let addresses = keystore.list_addresses();
                println!("Addresses ({}):", addresses.len());
                for addr in addresses {
                    let path = keystore
                        .path_of(&addr)
                        .map(|p| p.to_string())
                        .unwrap_or_default();
                    let marker = if keystore.default_address() == Some(&addr) { "*" } else { " " };
                    println!(" {} {}  {}", marker, addr, path);
                }
                Ok(())
            }
            WalletCommands::Show { address } => {
                let keystore = self.load_keystore()?;
                let addr = match address {
                    Some(a) => Address(a),
                    None => keystore
                        .default_address()
                        .ok_or(WalletError::NoDefaultAddress)?
                        .clone(),
                };

                let key = keystore
                    .get_key(&addr)
                    .ok_or_else(|| WalletError::AddressNotFound(addr.0.clone()))?;
                println!("Address: {}", addr);
                self.print_key(&key.neuter(), keystore.network())
            }
            WalletCommands::Xpub => {
                let keystore = self.load_keystore()?;
                println!("{}", keystore.account_path().with_private_key(false));
                println!("{}", keystore.account_xpub()?);
                Ok(())
            }
        }
    }
}
