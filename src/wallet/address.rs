// Pay-to-pubkey-hash addresses

use crate::core::{base58, hash160, Network};
use crate::wallet::WalletError;
use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};

const OP_DUP: u8 = 0x76;
const OP_HASH160: u8 = 0xa9;
const OP_PUSHBYTES_20: u8 = 0x14;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_CHECKSIG: u8 = 0xac;

/// Bitcoin address (Base58Check P2PKH)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    /// Create address from public key hash
    pub fn p2pkh(pubkey_hash: &[u8; 20], network: Network) -> Self {
        let mut payload = Vec::with_capacity(21);
        payload.push(network.p2pkh_prefix());
        payload.extend_from_slice(pubkey_hash);
        Self(base58::encode_check(&payload))
    }

    /// Create address from a compressed public key
    pub fn from_public_key(public_key: &PublicKey, network: Network) -> Self {
        Self::p2pkh(&hash160(&public_key.serialize()), network)
    }

    /// Get address string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn decode(&self) -> Result<(Network, [u8; 20]), WalletError> {
        let invalid = |reason: String| WalletError::InvalidAddress {
            address: self.0.clone(),
            reason,
        };

        let payload = base58::decode_check(&self.0).map_err(|e| invalid(e.to_string()))?;
        if payload.len() != 21 {
            return Err(invalid(format!("payload length {}", payload.len())));
        }
        let network = Network::from_p2pkh_prefix(payload[0])
            .ok_or_else(|| invalid(format!("unknown prefix 0x{:02x}", payload[0])))?;

        let mut hash = [0u8; 20];
        hash.copy_from_slice(&payload[1..]);
        Ok((network, hash))
    }

    /// Get pubkey hash from address
    pub fn to_pubkey_hash(&self) -> Result<[u8; 20], WalletError> {
        self.decode().map(|(_, hash)| hash)
    }

    pub fn network(&self) -> Result<Network, WalletError> {
        self.decode().map(|(network, _)| network)
    }

    /// P2PKH scriptPubKey
    /// OP_DUP OP_HASH160 <pubKeyHash> OP_EQUALVERIFY OP_CHECKSIG
    pub fn script_pubkey(&self) -> Result<Vec<u8>, WalletError> {
        let pubkey_hash = self.to_pubkey_hash()?;
        let mut script = Vec::with_capacity(25);
        script.push(OP_DUP);
        script.push(OP_HASH160);
        script.push(OP_PUSHBYTES_20);
        script.extend_from_slice(&pubkey_hash);
        script.push(OP_EQUALVERIFY);
        script.push(OP_CHECKSIG);
        Ok(script)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
