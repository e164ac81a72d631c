// Child numbers: 31 bit index plus hardened flag

use crate::hd::HdError;
use std::fmt;
use std::str::FromStr;

pub const HARDENED_BIT: u32 = 0x8000_0000;

/// A child index in a key hierarchy. The most significant bit marks hardened derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChildNumber(u32);

impl ChildNumber {
    pub const ZERO: ChildNumber = ChildNumber(0);
    pub const ONE: ChildNumber = ChildNumber(1);
    pub const ZERO_HARDENED: ChildNumber = ChildNumber(HARDENED_BIT);
    pub const ONE_HARDENED: ChildNumber = ChildNumber(HARDENED_BIT | 1);

    pub fn new(index: u32, hardened: bool) -> Result<Self, HdError> {
        if index & HARDENED_BIT != 0 {
            return Err(HdError::IndexOutOfRange(index));
        }
        Ok(Self(if hardened { index | HARDENED_BIT } else { index }))
    }

    pub fn hardened(index: u32) -> Result<Self, HdError> {
        Self::new(index, true)
    }

    pub fn normal(index: u32) -> Result<Self, HdError> {
        Self::new(index, false)
    }

    /// Wrap a raw serialized child number (hardened bit included)
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw value including the hardened bit, as serialized in extended keys
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Index without the hardened bit
    pub fn index(&self) -> u32 {
        self.0 & !HARDENED_BIT
    }

    pub fn is_hardened(&self) -> bool {
        self.0 & HARDENED_BIT != 0
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_hardened() {
            write!(f, "{}H", self.index())
        } else {
            write!(f, "{}", self.index())
        }
    }
}

impl FromStr for ChildNumber {
    type Err = HdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (digits, hardened) = match s.strip_suffix(['H', 'h', '\'']) {
            Some(rest) => (rest.trim(), true),
            None => (s, false),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(HdError::InvalidPathElement(s.to_string()));
        }

        let index: u32 = digits
            .parse()
            .map_err(|_| HdError::InvalidPathElement(s.to_string()))?;
        Self::new(index, hardened)
    }
}
