// Hashing utilities for Bitcoin

use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

type HmacSha512 = Hmac<Sha512>;

/// SHA256 double hash (Bitcoin convention)
/// hash256 = SHA256(SHA256(data))
pub fn hash256(data: &[u8]) -> [u8; 32] {
    let first_hash = Sha256::digest(data);
    sha256_hash(&first_hash)
}

/// Single SHA256 hash
pub fn sha256_hash(data: &[u8]) -> [u8; 32] {
    let hash = Sha256::digest(data);
    let mut result = [0u8; 32];
    result.copy_from_slice(&hash);
    result
}

/// RIPEMD160(SHA256(data)) - key identifiers and addresses
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    let ripemd = Ripemd160::digest(sha);
    let mut result = [0u8; 20];
    result.copy_from_slice(&ripemd);
    result
}

/// HMAC-SHA512, used for master key generation and child derivation
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; 64] {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    let mut result = [0u8; 64];
    result.copy_from_slice(&mac.finalize().into_bytes());
    result
}

/// Base58Check checksum: first four bytes of hash256
pub fn checksum(data: &[u8]) -> [u8; 4] {
    let hash = hash256(data);
    [hash[0], hash[1], hash[2], hash[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash256() {
        let data = b"hello world";
        let hash = hash256(data);

        // Same data should produce same hash
        let hash2 = hash256(data);
        assert_eq!(hash, hash2);
        assert_eq!(
            hex::encode(hash),
            "bc62d4b80d9e36da29c16c5d4d9f11731f36052c72401a76c23c0fb5a9b74423"
        );
    }

    #[test]
    fn test_sha256_empty() {
        assert_eq!(
            hex::encode(sha256_hash(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hash160() {
        let pubkey = hex::decode("0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2").unwrap();
        let hash = hash160(&pubkey);
        assert_eq!(&hex::encode(hash)[..8], "3442193e");
    }

    #[test]
    fn test_hmac_sha512_master_seed() {
        // BIP32 test vector 1: IR is the master chain code
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let i = hmac_sha512(b"Bitcoin seed", &seed);
        assert_eq!(
            hex::encode(&i[..32]),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            hex::encode(&i[32..]),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );
    }

    #[test]
    fn test_checksum_prefix_of_hash256() {
        let data = b"checksum";
        assert_eq!(checksum(data), hash256(data)[..4]);
    }
}
