// Derivation paths such as m/44H/0H/0H/182

use crate::hd::{ChildNumber, HdError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

const PREFIX_PRIVATE: &str = "m";
const PREFIX_PUBLIC: &str = "M";

/// An ordered list of child numbers. The `m`/`M` prefix records whether the
/// path leads to a private or a public-only key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HdPath {
    has_private_key: bool,
    nodes: Vec<ChildNumber>,
}

impl HdPath {
    pub fn new(has_private_key: bool, nodes: Vec<ChildNumber>) -> Self {
        Self { has_private_key, nodes }
    }

    /// Empty private path, `m`
    pub fn m() -> Self {
        Self::new(true, Vec::new())
    }

    /// Empty public path, `M`
    pub fn public() -> Self {
        Self::new(false, Vec::new())
    }

    /// Private path over the given nodes
    pub fn from_nodes(nodes: &[ChildNumber]) -> Self {
        Self::new(true, nodes.to_vec())
    }

    /// BIP44 account path: m/44H/coinH/accountH
    pub fn bip44_account(coin_type: u32, account: u32) -> Result<Self, HdError> {
        Ok(Self::new(
            true,
            vec![
                ChildNumber::hardened(44)?,
                ChildNumber::hardened(coin_type)?,
                ChildNumber::hardened(account)?,
            ],
        ))
    }

    /// Parse a textual path. A leading `m` marks a private path, `M` a public one.
    /// Elements are trimmed, empty elements are skipped.
    pub fn parse(path: &str) -> Result<Self, HdError> {
        let mut elements = path.split('/').map(str::trim).peekable();

        let mut has_private_key = false;
        match elements.peek() {
            Some(&PREFIX_PRIVATE) => {
                has_private_key = true;
                elements.next();
            }
            Some(&PREFIX_PUBLIC) => {
                elements.next();
            }
            _ => {}
        }

        let nodes = elements
            .filter(|element| !element.is_empty())
            .map(ChildNumber::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(has_private_key, nodes))
    }

    pub fn has_private_key(&self) -> bool {
        self.has_private_key
    }

    pub fn nodes(&self) -> &[ChildNumber] {
        &self.nodes
    }

    /// Same nodes with a different prefix
    pub fn with_private_key(&self, has_private_key: bool) -> Self {
        Self::new(has_private_key, self.nodes.clone())
    }

    /// New path with one more child appended
    pub fn extend(&self, child: ChildNumber) -> Self {
        let mut nodes = self.nodes.clone();
        nodes.push(child);
        Self::new(self.has_private_key, nodes)
    }

    /// New path with all nodes of `other` appended
    pub fn extend_path(&self, other: &[ChildNumber]) -> Self {
        let mut nodes = self.nodes.clone();
        nodes.extend_from_slice(other);
        Self::new(self.has_private_key, nodes)
    }

    /// Path without its last node. The parent of an empty path is empty.
    pub fn parent(&self) -> Self {
        let end = self.nodes.len().saturating_sub(1);
        Self::new(self.has_private_key, self.nodes[..end].to_vec())
    }

    /// All ancestors from the first node down, optionally including this path
    pub fn ancestors(&self, include_self: bool) -> Vec<HdPath> {
        let end = if include_self {
            self.nodes.len()
        } else {
            self.nodes.len().saturating_sub(1)
        };
        (1..=end)
            .map(|len| Self::new(self.has_private_key, self.nodes[..len].to_vec()))
            .collect()
    }
}

impl Deref for HdPath {
    type Target = [ChildNumber];

    fn deref(&self) -> &Self::Target {
        &self.nodes
    }
}

impl fmt::Display for HdPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let prefix = if self.has_private_key {
            PREFIX_PRIVATE
        } else {
            PREFIX_PUBLIC
        };
        write!(f, "{}", prefix)?;
        for node in &self.nodes {
            write!(f, "/{}", node)?;
        }
        Ok(())
    }
}

impl FromStr for HdPath {
    type Err = HdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HdPath {
    type Error = HdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<HdPath> for String {
    fn from(path: HdPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(index: u32) -> ChildNumber {
        ChildNumber::hardened(index).unwrap()
    }

    fn n(index: u32) -> ChildNumber {
        ChildNumber::normal(index).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let path = HdPath::parse("m/44H/0H/0H/182").unwrap();
        assert!(path.has_private_key());
        assert_eq!(path.nodes(), &[h(44), h(0), h(0), n(182)]);
        assert_eq!(path.to_string(), "m/44H/0H/0H/182");
    }

    #[test]
    fn test_parse_alternative_markers() {
        let path = HdPath::parse("m/44'/0h/0H/1").unwrap();
        assert_eq!(path.to_string(), "m/44H/0H/0H/1");
    }

    #[test]
    fn test_parse_public_and_relative() {
        let public = HdPath::parse("M/0/1").unwrap();
        assert!(!public.has_private_key());
        assert_eq!(public.to_string(), "M/0/1");

        let relative = HdPath::parse("0H/1").unwrap();
        assert!(!relative.has_private_key());
        assert_eq!(relative.nodes(), &[h(0), n(1)]);
    }

    #[test]
    fn test_parse_skips_empty_and_trims() {
        let path = HdPath::parse(" m / 44H // 1 /").unwrap();
        assert_eq!(path.nodes(), &[h(44), n(1)]);

        let root = HdPath::parse("m").unwrap();
        assert!(root.is_empty());
        assert_eq!(root.to_string(), "m");
        assert_eq!(HdPath::parse("m/").unwrap(), HdPath::m());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            HdPath::parse("m/44H/abc"),
            Err(HdError::InvalidPathElement("abc".to_string()))
        );
        assert!(HdPath::parse("m/m/1").is_err());
        assert!(matches!(
            HdPath::parse("m/2147483648H"),
            Err(HdError::IndexOutOfRange(_))
        ));
    }

    #[test]
    fn test_sub_list_via_deref() {
        let path = HdPath::parse("m/44H/0H/0H/182").unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(&path[..path.len()], path.nodes());
        assert_eq!(&path[..2], &[h(44), h(0)]);
        assert_eq!(path.last(), Some(&n(182)));
    }

    #[test]
    fn test_extend_and_parent() {
        let account = HdPath::bip44_account(0, 0).unwrap();
        assert_eq!(account.to_string(), "m/44H/0H/0H");

        let receive = account.extend(ChildNumber::ZERO);
        assert_eq!(receive.to_string(), "m/44H/0H/0H/0");
        assert_eq!(receive.parent(), account);
        assert_eq!(HdPath::m().parent(), HdPath::m());

        let joined = account.extend_path(&[n(1), n(5)]);
        assert_eq!(joined.to_string(), "m/44H/0H/0H/1/5");
    }

    #[test]
    fn test_ancestors() {
        let path = HdPath::parse("m/1/2/3").unwrap();
        let ancestors: Vec<String> = path.ancestors(false).iter().map(|p| p.to_string()).collect();
        assert_eq!(ancestors, vec!["m/1", "m/1/2"]);
        assert_eq!(path.ancestors(true).len(), 3);
        assert!(HdPath::m().ancestors(true).is_empty());
    }

    #[test]
    fn test_serde_as_string() {
        let path = HdPath::parse("m/44H/1H/0H/0/7").unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"m/44H/1H/0H/0/7\"");
        let decoded: HdPath = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, path);
        assert!(serde_json::from_str::<HdPath>("\"m/x\"").is_err());
    }
}
