// HD keystore: receive addresses derived from one root key

use crate::core::Network;
use crate::hd::{ChildNumber, DeterministicHierarchy, DeterministicKey, HdError, HdPath};
use crate::wallet::{Address, WalletError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Persisted keystore (root key plus bookkeeping)
#[derive(Serialize, Deserialize)]
struct KeystoreFile {
    network: Network,
    root_xprv: String,
    account_path: HdPath,
    issued: Vec<HdPath>,
    default_address: Option<Address>,
}

/// Keystore - issues receive addresses on the BIP44 external chain of one account
pub struct Keystore {
    network: Network,
    hierarchy: DeterministicHierarchy,
    account_path: HdPath,
    issued: Vec<(Address, HdPath)>,
    paths: HashMap<Address, HdPath>,
    default_address: Option<Address>,
}

impl Keystore {
    /// Create a keystore for the first BIP44 account of `network` under a master key
    pub fn new(master: DeterministicKey, network: Network) -> Result<Self, WalletError> {
        let account_path = HdPath::bip44_account(network.coin_type(), 0)?;
        let mut hierarchy = DeterministicHierarchy::new(master);

        // Derive the account and its receive chain up front
        hierarchy.get(&Self::receive_chain(&account_path), false, true)?;

        Ok(Self {
            network,
            hierarchy,
            account_path,
            issued: Vec::new(),
            paths: HashMap::new(),
            default_address: None,
        })
    }

    fn receive_chain(account_path: &HdPath) -> HdPath {
        account_path.extend(ChildNumber::ZERO)
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn account_path(&self) -> &HdPath {
        &self.account_path
    }

    /// Generate a new address
    pub fn new_address(&mut self) -> Result<Address, WalletError> {
        let chain = Self::receive_chain(&self.account_path);
        let key = self.hierarchy.derive_next_child(&chain, false, false, false)?;
        let address = Address::from_public_key(key.public_key(), self.network);
        log::info!("Issued {} at {}", address, key.path());

        self.record(address.clone(), key.path().clone());
        Ok(address)
    }

    fn record(&mut self, address: Address, path: HdPath) {
        // Set as default if first address
        if self.default_address.is_none() {
            self.default_address = Some(address.clone());
        }

        self.paths.insert(address.clone(), path.clone());
        self.issued.push((address, path));
    }

    /// Get the key behind an issued address
    pub fn get_key(&self, address: &Address) -> Option<&DeterministicKey> {
        self.paths
            .get(address)
            .and_then(|path| self.hierarchy.find(path))
    }

    /// Derivation path of an issued address
    pub fn path_of(&self, address: &Address) -> Option<&HdPath> {
        self.paths.get(address)
    }

    /// Get all addresses, in issue order
    pub fn list_addresses(&self) -> Vec<Address> {
        self.issued.iter().map(|(address, _)| address.clone()).collect()
    }

    /// Get default address
    pub fn default_address(&self) -> Option<&Address> {
        self.default_address.as_ref()
    }

    /// Set default address
    pub fn set_default(&mut self, address: Address) -> Result<(), WalletError> {
        if !self.paths.contains_key(&address) {
            return Err(WalletError::AddressNotFound(address.0));
        }
        self.default_address = Some(address);
        Ok(())
    }

    /// Get script pubkey for address
    pub fn get_script_pubkey(&self, address: &Address) -> Option<Vec<u8>> {
        self.paths
            .get(address)
            .and_then(|_| address.script_pubkey().ok())
    }

    /// Count addresses
    pub fn count(&self) -> usize {
        self.issued.len()
    }

    /// Extended public key of the account
    pub fn account_xpub(&self) -> Result<String, WalletError> {
        let account = self
            .hierarchy
            .find(&self.account_path)
            .ok_or_else(|| HdError::KeyNotFound(self.account_path.clone()))?;
        Ok(account.serialize_pub_b58(self.network))
    }

    /// Save keystore to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), WalletError> {
        let data = KeystoreFile {
            network: self.network,
            root_xprv: self.hierarchy.root_key().serialize_priv_b58(self.network)?,
            account_path: self.account_path.clone(),
            issued: self.issued.iter().map(|(_, path)| path.clone()).collect(),
            default_address: self.default_address.clone(),
        };

        let json = serde_json::to_string_pretty(&data)?;
        fs::write(path, json)?;

        Ok(())
    }

    /// Load keystore from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WalletError> {
        let json = fs::read_to_string(path)?;
        let data: KeystoreFile = serde_json::from_str(&json)?;

        let (root, network) = DeterministicKey::deserialize_b58(&data.root_xprv, Some(data.network))?;
        let mut hierarchy = DeterministicHierarchy::new(root);
        hierarchy.get(&Self::receive_chain(&data.account_path), false, true)?;

        let mut keystore = Self {
            network,
            hierarchy,
            account_path: data.account_path,
            issued: Vec::new(),
            paths: HashMap::new(),
            default_address: None,
        };

        // Re-derive issued keys so the next-child counter resumes
        let chain = Self::receive_chain(&keystore.account_path);
        for path in data.issued {
            if path.len() != chain.len() + 1 || !path.starts_with(&chain[..]) {
                log::warn!("Skipping {}: not on receive chain {}", path, chain);
                continue;
            }
            if keystore.issued.iter().any(|(_, issued)| issued[..] == path[..]) {
                log::warn!("Skipping duplicate issued path {}", path);
                continue;
            }

            let key = keystore.hierarchy.get(&path, false, true)?;
            let address = Address::from_public_key(key.public_key(), network);
            keystore.record(address, path);
        }

        if let Some(address) = data.default_address {
            keystore.set_default(address)?;
        }

        log::debug!("Loaded keystore with {} addresses", keystore.count());
        Ok(keystore)
    }
}
