use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// A blockchain network the service reports TVL for.
///
/// The set is fixed; anything else is rejected at the HTTP boundary
/// before the upstream API is contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChainId {
    Ethereum,
    Solana,
    Near,
    Bitcoin,
    Sui,
    Aptos,
    Arbitrum,
    Sei,
    Base,
    Bsc,
    Polygon,
    Optimism,
    Fantom,
    Avalanche,
    Celo,
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown chain: {0}")]
pub struct UnknownChain(pub String);

impl ChainId {
    pub const ALL: [ChainId; 15] = [
        ChainId::Ethereum,
        ChainId::Solana,
        ChainId::Near,
        ChainId::Bitcoin,
        ChainId::Sui,
        ChainId::Aptos,
        ChainId::Arbitrum,
        ChainId::Sei,
        ChainId::Base,
        ChainId::Bsc,
        ChainId::Polygon,
        ChainId::Optimism,
        ChainId::Fantom,
        ChainId::Avalanche,
        ChainId::Celo,
    ];

    /// Name as used by the upstream API and in every response body.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainId::Ethereum => "Ethereum",
            ChainId::Solana => "Solana",
            ChainId::Near => "Near",
            ChainId::Bitcoin => "Bitcoin",
            ChainId::Sui => "Sui",
            ChainId::Aptos => "Aptos",
            ChainId::Arbitrum => "Arbitrum",
            ChainId::Sei => "Sei",
            ChainId::Base => "Base",
            ChainId::Bsc => "BSC",
            ChainId::Polygon => "Polygon",
            ChainId::Optimism => "Optimism",
            ChainId::Fantom => "Fantom",
            ChainId::Avalanche => "Avalanche",
            ChainId::Celo => "Celo",
        }
    }

    /// Comma separated list of every supported name, in canonical order.
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for ChainId {
    type Err = UnknownChain;

    // Exact match only; "ethereum" is not "Ethereum" upstream either.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownChain(s.to_string()))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ChainId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_every_supported_name() {
        for chain in ChainId::ALL {
            assert_eq!(chain.as_str().parse::<ChainId>(), Ok(chain));
        }
    }

    #[test]
    fn test_rejects_unknown_and_miscased_names() {
        assert!("Dogecoin".parse::<ChainId>().is_err());
        assert!("ethereum".parse::<ChainId>().is_err());
        assert!("Bsc".parse::<ChainId>().is_err());
        assert!("".parse::<ChainId>().is_err());
    }

    #[test]
    fn test_supported_list_is_in_canonical_order() {
        let list = ChainId::supported_list();
        assert!(list.starts_with("Ethereum, Solana, Near"));
        assert!(list.ends_with("Avalanche, Celo"));
        assert_eq!(list.split(", ").count(), 15);
    }

    #[test]
    fn test_serializes_as_upstream_name() {
        let json = serde_json::to_string(&ChainId::Bsc).unwrap();
        assert_eq!(json, "\"BSC\"");
    }
}
