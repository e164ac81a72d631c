use crate::core::{Base58Error, Network};
use crate::hd::{ChildNumber, HdPath};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HdError {
    // Paths
    #[error("index {0} out of range: most significant bit is reserved for hardened derivation")]
    IndexOutOfRange(u32),
    #[error("invalid path element: {0:?}")]
    InvalidPathElement(String),

    // Derivation
    #[error("seed is too short and could be brute forced: {0} bytes")]
    SeedTooShort(usize),
    #[error("generated master key is invalid")]
    InvalidMasterKey,
    #[error("derived key for child {0} is invalid")]
    InvalidChild(ChildNumber),
    #[error("cannot derive hardened child {0} from a public key")]
    HardenedFromPublic(ChildNumber),
    #[error("maximum number of child derivation attempts reached")]
    TooManyAttempts,
    #[error("key is at the maximum depth of 255")]
    DepthOverflow,
    #[error("private key not available")]
    MissingPrivateKey,

    // Hierarchy
    #[error("no key found for path {0}")]
    KeyNotFound(HdPath),
    #[error("cannot derive the master key: nothing to derive from")]
    NothingToDerive,
    #[error("no ancestor of {0} in the hierarchy")]
    NoAncestor(HdPath),

    // Serialization
    #[error("invalid extended key: {0}")]
    InvalidExtendedKey(&'static str),
    #[error("extended key is for {found}, expected {expected}")]
    WrongNetwork { expected: Network, found: Network },
    #[error(transparent)]
    Base58(#[from] Base58Error),
}
