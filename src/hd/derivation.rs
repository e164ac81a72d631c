// Key derivation: master key from seed, child keys from parents

use crate::core::hmac_sha512;
use crate::hd::{secp, ChildNumber, DeterministicKey, HdError, HdPath, HARDENED_BIT};
use secp256k1::{PublicKey, Scalar, SecretKey};

/// Retries for `derive_this_or_next_child_key` before giving up
pub const MAX_CHILD_DERIVATION_ATTEMPTS: u32 = 100;

const MASTER_KEY_HMAC: &[u8] = b"Bitcoin seed";

/// Seeds of this many bytes or fewer are rejected
const MIN_SEED_LEN: usize = 8;

fn child_depth(parent: &DeterministicKey) -> Result<u8, HdError> {
    parent.depth().checked_add(1).ok_or(HdError::DepthOverflow)
}

fn split_hmac(i: [u8; 64]) -> ([u8; 32], [u8; 32]) {
    let mut il = [0u8; 32];
    let mut ir = [0u8; 32];
    il.copy_from_slice(&i[..32]);
    ir.copy_from_slice(&i[32..]);
    (il, ir)
}

/// Create the root private key of a hierarchy from a seed.
/// I = HMAC-SHA512("Bitcoin seed", seed), key = IL, chain code = IR.
pub fn create_master_private_key(seed: &[u8]) -> Result<DeterministicKey, HdError> {
    if seed.len() <= MIN_SEED_LEN {
        return Err(HdError::SeedTooShort(seed.len()));
    }

    let (il, ir) = split_hmac(hmac_sha512(MASTER_KEY_HMAC, seed));
    let secret_key = SecretKey::from_slice(&il).map_err(|_| HdError::InvalidMasterKey)?;

    let key = DeterministicKey::from_secret(secret_key, ir, HdPath::m(), 0, 0);
    log::debug!("Created master key with fingerprint {:08x}", key.fingerprint());
    Ok(key)
}

/// Create a public-only root key from a compressed public key and chain code
pub fn create_master_pub_key(
    pubkey_bytes: &[u8],
    chain_code: [u8; 32],
) -> Result<DeterministicKey, HdError> {
    let public_key = PublicKey::from_slice(pubkey_bytes)
        .map_err(|_| HdError::InvalidExtendedKey("invalid public key"))?;
    Ok(DeterministicKey::from_public(
        public_key,
        chain_code,
        HdPath::public(),
        0,
        0,
    ))
}

/// Derive a child. Uses private derivation when the parent has a private key.
pub fn derive_child_key(
    parent: &DeterministicKey,
    child: ChildNumber,
) -> Result<DeterministicKey, HdError> {
    match parent.secret_key() {
        Some(secret_key) => derive_private_child(parent, secret_key, child),
        None => derive_public_child(parent, child),
    }
}

/// Derive a public-only child, also from a private parent.
/// Hardened children cannot be derived this way.
pub fn derive_child_key_from_public(
    parent: &DeterministicKey,
    child: ChildNumber,
) -> Result<DeterministicKey, HdError> {
    derive_public_child(parent, child)
}

/// Derive `raw_child`, moving on to the next index whenever the derived key is invalid.
/// The hardened bit of `raw_child` is kept.
pub fn derive_this_or_next_child_key(
    parent: &DeterministicKey,
    raw_child: u32,
) -> Result<DeterministicKey, HdError> {
    this_or_next_child_with(parent, raw_child, derive_child_key)
}

pub(crate) fn this_or_next_child_with<F>(
    parent: &DeterministicKey,
    raw_child: u32,
    mut derive: F,
) -> Result<DeterministicKey, HdError>
where
    F: FnMut(&DeterministicKey, ChildNumber) -> Result<DeterministicKey, HdError>,
{
    let hardened = raw_child & HARDENED_BIT != 0;
    let mut index = raw_child & !HARDENED_BIT;

    for _ in 0..MAX_CHILD_DERIVATION_ATTEMPTS {
        let child = ChildNumber::new(index, hardened)?;
        match derive(parent, child) {
            Err(HdError::InvalidChild(child)) => {
                log::warn!("Child {} of {} is invalid, trying the next index", child, parent.path());
                index += 1;
            }
            result => return result,
        }
    }

    Err(HdError::TooManyAttempts)
}

fn derive_private_child(
    parent: &DeterministicKey,
    secret_key: &SecretKey,
    child: ChildNumber,
) -> Result<DeterministicKey, HdError> {
    let mut data = Vec::with_capacity(37);
    if child.is_hardened() {
        data.push(0x00);
        data.extend_from_slice(&secret_key.secret_bytes());
    } else {
        data.extend_from_slice(&parent.pubkey_bytes());
    }
    data.extend_from_slice(&child.raw().to_be_bytes());

    let (il, chain_code) = split_hmac(hmac_sha512(parent.chain_code(), &data));

    // IL >= n, or ki == 0
    let tweak = Scalar::from_be_bytes(il).map_err(|_| HdError::InvalidChild(child))?;
    let child_key = secret_key
        .add_tweak(&tweak)
        .map_err(|_| HdError::InvalidChild(child))?;

    Ok(DeterministicKey::from_secret(
        child_key,
        chain_code,
        parent.path().extend(child),
        child_depth(parent)?,
        parent.fingerprint(),
    ))
}

fn derive_public_child(
    parent: &DeterministicKey,
    child: ChildNumber,
) -> Result<DeterministicKey, HdError> {
    if child.is_hardened() {
        return Err(HdError::HardenedFromPublic(child));
    }

    let mut data = Vec::with_capacity(37);
    data.extend_from_slice(&parent.pubkey_bytes());
    data.extend_from_slice(&child.raw().to_be_bytes());

    let (il, chain_code) = split_hmac(hmac_sha512(parent.chain_code(), &data));

    // IL >= n, or the point at infinity
    let tweak = Scalar::from_be_bytes(il).map_err(|_| HdError::InvalidChild(child))?;
    let child_key = parent
        .public_key()
        .add_exp_tweak(secp(), &tweak)
        .map_err(|_| HdError::InvalidChild(child))?;

    Ok(DeterministicKey::from_public(
        child_key,
        chain_code,
        parent.path().extend(child),
        child_depth(parent)?,
        parent.fingerprint(),
    ))
}
