// Hierarchical deterministic keys (BIP32)

mod child_number;
mod error;
mod hierarchy;
mod key;
mod path;
pub mod derivation;

pub use child_number::{ChildNumber, HARDENED_BIT};
pub use error::HdError;
pub use hierarchy::DeterministicHierarchy;
pub use key::{DeterministicKey, EXTENDED_KEY_LEN};
pub use path::HdPath;

use secp256k1::{All, Secp256k1};
use std::sync::LazyLock;

static SECP: LazyLock<Secp256k1<All>> = LazyLock::new(Secp256k1::new);

/// Shared secp256k1 context
pub(crate) fn secp() -> &'static Secp256k1<All> {
    &SECP
}
