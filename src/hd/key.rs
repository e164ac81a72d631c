// Deterministic (extended) keys and their BIP32 serialization

use crate::core::{base58, hash160, Network};
use crate::hd::{secp, ChildNumber, HdError, HdPath};
use secp256k1::{PublicKey, SecretKey};
use std::fmt;

/// Length of a serialized extended key
pub const EXTENDED_KEY_LEN: usize = 78;

/// A key in a deterministic hierarchy: key material, chain code and its
/// position (path, depth, parent fingerprint).
#[derive(Clone, PartialEq, Eq)]
pub struct DeterministicKey {
    secret_key: Option<SecretKey>,
    public_key: PublicKey,
    chain_code: [u8; 32],
    path: HdPath,
    depth: u8,
    parent_fingerprint: u32,
}

impl DeterministicKey {
    /// Key with private material
    pub(crate) fn from_secret(
        secret_key: SecretKey,
        chain_code: [u8; 32],
        path: HdPath,
        depth: u8,
        parent_fingerprint: u32,
    ) -> Self {
        let public_key = secret_key.public_key(secp());
        Self {
            secret_key: Some(secret_key),
            public_key,
            chain_code,
            path: path.with_private_key(true),
            depth,
            parent_fingerprint,
        }
    }

    /// Public-only key
    pub(crate) fn from_public(
        public_key: PublicKey,
        chain_code: [u8; 32],
        path: HdPath,
        depth: u8,
        parent_fingerprint: u32,
    ) -> Self {
        Self {
            secret_key: None,
            public_key,
            chain_code,
            path: path.with_private_key(false),
            depth,
            parent_fingerprint,
        }
    }

    pub fn has_private_key(&self) -> bool {
        self.secret_key.is_some()
    }

    pub fn secret_key(&self) -> Option<&SecretKey> {
        self.secret_key.as_ref()
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Path from the root of the hierarchy
    pub fn path(&self) -> &HdPath {
        &self.path
    }

    /// `m/...` for private keys, `M/...` for public-only keys
    pub fn path_as_string(&self) -> String {
        self.path.to_string()
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Last element of the path, zero for the root
    pub fn child_number(&self) -> ChildNumber {
        self.path.last().copied().unwrap_or(ChildNumber::ZERO)
    }

    pub fn parent_fingerprint(&self) -> u32 {
        self.parent_fingerprint
    }

    /// Compressed public key
    pub fn pubkey_bytes(&self) -> [u8; 33] {
        self.public_key.serialize()
    }

    pub fn private_key_bytes(&self) -> Option<[u8; 32]> {
        self.secret_key.map(|sk| sk.secret_bytes())
    }

    /// hash160 of the compressed public key
    pub fn identifier(&self) -> [u8; 20] {
        hash160(&self.pubkey_bytes())
    }

    /// First four bytes of the identifier
    pub fn fingerprint(&self) -> u32 {
        let id = self.identifier();
        u32::from_be_bytes([id[0], id[1], id[2], id[3]])
    }

    /// Copy of this key without the private part
    pub fn neuter(&self) -> Self {
        Self {
            secret_key: None,
            public_key: self.public_key,
            chain_code: self.chain_code,
            path: self.path.with_private_key(false),
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
        }
    }

    fn serialize_header(&self, version: u32) -> Vec<u8> {
        let mut data = Vec::with_capacity(EXTENDED_KEY_LEN);
        data.extend_from_slice(&version.to_be_bytes());
        data.push(self.depth);
        data.extend_from_slice(&self.parent_fingerprint.to_be_bytes());
        data.extend_from_slice(&self.child_number().raw().to_be_bytes());
        data.extend_from_slice(&self.chain_code);
        data
    }

    /// 78 byte extended public key
    pub fn serialize_pub(&self, network: Network) -> Vec<u8> {
        let mut data = self.serialize_header(network.xpub_version());
        data.extend_from_slice(&self.pubkey_bytes());
        data
    }

    /// 78 byte extended private key
    pub fn serialize_priv(&self, network: Network) -> Result<Vec<u8>, HdError> {
        let secret_key = self.secret_key.ok_or(HdError::MissingPrivateKey)?;
        let mut data = self.serialize_header(network.xprv_version());
        data.push(0x00);
        data.extend_from_slice(&secret_key.secret_bytes());
        Ok(data)
    }

    /// xpub / tpub string
    pub fn serialize_pub_b58(&self, network: Network) -> String {
        base58::encode_check(&self.serialize_pub(network))
    }

    /// xprv / tprv string
    pub fn serialize_priv_b58(&self, network: Network) -> Result<String, HdError> {
        Ok(base58::encode_check(&self.serialize_priv(network)?))
    }

    /// Parse an xpub/xprv (or tpub/tprv) string. The key carries no parent, so
    /// its path only holds its own child number.
    pub fn deserialize_b58(
        s: &str,
        expected_network: Option<Network>,
    ) -> Result<(Self, Network), HdError> {
        let data = base58::decode_check(s)?;
        Self::deserialize(&data, expected_network)
    }

    /// Parse a 78 byte extended key
    pub fn deserialize(
        data: &[u8],
        expected_network: Option<Network>,
    ) -> Result<(Self, Network), HdError> {
        if data.len() != EXTENDED_KEY_LEN {
            return Err(HdError::InvalidExtendedKey("wrong length"));
        }

        let version = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
        let (network, is_private) = Network::from_extended_version(version)
            .ok_or(HdError::InvalidExtendedKey("unknown version"))?;
        if let Some(expected) = expected_network {
            if expected != network {
                return Err(HdError::WrongNetwork {
                    expected,
                    found: network,
                });
            }
        }

        let depth = data[4];
        let parent_fingerprint = u32::from_be_bytes([data[5], data[6], data[7], data[8]]);
        let child_number =
            ChildNumber::from_raw(u32::from_be_bytes([data[9], data[10], data[11], data[12]]));
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&data[13..45]);
        let key_data = &data[45..];

        let path = if depth == 0 {
            if parent_fingerprint != 0 {
                return Err(HdError::InvalidExtendedKey(
                    "depth is 0 but parent fingerprint is set",
                ));
            }
            if child_number != ChildNumber::ZERO {
                return Err(HdError::InvalidExtendedKey(
                    "depth is 0 but child number is set",
                ));
            }
            HdPath::m()
        } else {
            HdPath::from_nodes(&[child_number])
        };

        let key = if is_private {
            if key_data[0] != 0x00 {
                return Err(HdError::InvalidExtendedKey("private key is not zero padded"));
            }
            let secret_key = SecretKey::from_slice(&key_data[1..])
                .map_err(|_| HdError::InvalidExtendedKey("invalid private key"))?;
            Self::from_secret(secret_key, chain_code, path, depth, parent_fingerprint)
        } else {
            let public_key = PublicKey::from_slice(key_data)
                .map_err(|_| HdError::InvalidExtendedKey("invalid public key"))?;
            Self::from_public(public_key, chain_code, path, depth, parent_fingerprint)
        };

        Ok((key, network))
    }

    /// Wallet import format, compressed
    pub fn to_wif(&self, network: Network) -> Result<String, HdError> {
        let secret_key = self.secret_key.ok_or(HdError::MissingPrivateKey)?;
        let mut payload = Vec::with_capacity(34);
        payload.push(network.wif_prefix());
        payload.extend_from_slice(&secret_key.secret_bytes());
        payload.push(0x01);
        Ok(base58::encode_check(&payload))
    }
}

impl fmt::Debug for DeterministicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DeterministicKey")
            .field("pub", &hex::encode(self.pubkey_bytes()))
            .field("chain_code", &hex::encode(self.chain_code))
            .field("path", &self.path.to_string())
            .field("depth", &self.depth)
            .field("has_private_key", &self.has_private_key())
            .finish()
    }
}
