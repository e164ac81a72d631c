// Network parameters: version bytes for extended keys, addresses and WIF

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    /// Version prefix of serialized extended public keys (xpub / tpub)
    pub fn xpub_version(&self) -> u32 {
        match self {
            Network::Mainnet => 0x0488_B21E,
            Network::Testnet => 0x0435_87CF,
        }
    }

    /// Version prefix of serialized extended private keys (xprv / tprv)
    pub fn xprv_version(&self) -> u32 {
        match self {
            Network::Mainnet => 0x0488_ADE4,
            Network::Testnet => 0x0435_8394,
        }
    }

    pub fn p2pkh_prefix(&self) -> u8 {
        match self {
            Network::Mainnet => 0x00,
            Network::Testnet => 0x6f,
        }
    }

    pub fn wif_prefix(&self) -> u8 {
        match self {
            Network::Mainnet => 0x80,
            Network::Testnet => 0xef,
        }
    }

    /// BIP44 coin type
    pub fn coin_type(&self) -> u32 {
        match self {
            Network::Mainnet => 0,
            Network::Testnet => 1,
        }
    }

    /// Look up an extended key version, returns the network and whether it is private
    pub fn from_extended_version(version: u32) -> Option<(Network, bool)> {
        [Network::Mainnet, Network::Testnet]
            .into_iter()
            .find_map(|network| {
                if version == network.xprv_version() {
                    Some((network, true))
                } else if version == network.xpub_version() {
                    Some((network, false))
                } else {
                    None
                }
            })
    }

    pub fn from_p2pkh_prefix(prefix: u8) -> Option<Network> {
        [Network::Mainnet, Network::Testnet]
            .into_iter()
            .find(|network| network.p2pkh_prefix() == prefix)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Ok(Network::Mainnet),
            "testnet" | "test" => Ok(Network::Testnet),
            other => Err(format!("Unknown network: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_versions() {
        assert_eq!(
            Network::from_extended_version(0x0488_ADE4),
            Some((Network::Mainnet, true))
        );
        assert_eq!(
            Network::from_extended_version(0x0435_87CF),
            Some((Network::Testnet, false))
        );
        assert_eq!(Network::from_extended_version(0xdead_beef), None);
    }

    #[test]
    fn test_parse_network() {
        assert_eq!("main".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("Testnet".parse::<Network>().unwrap(), Network::Testnet);
        assert!("regtest".parse::<Network>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Network::Testnet).unwrap();
        assert_eq!(json, "\"testnet\"");
        let network: Network = serde_json::from_str("\"mainnet\"").unwrap();
        assert_eq!(network, Network::Mainnet);
    }

    #[test]
    fn test_p2pkh_prefix_lookup() {
        assert_eq!(Network::from_p2pkh_prefix(0x6f), Some(Network::Testnet));
        assert_eq!(Network::from_p2pkh_prefix(0x05), None);
    }
}
