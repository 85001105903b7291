use serde::{Deserialize, Serialize};
use std::fmt;

pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";
pub const MAINNET_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// Stellar network selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Testnet,
    Mainnet,
}

impl Network {
    pub fn passphrase(&self) -> &'static str {
        match self {
            Network::Testnet => TESTNET_PASSPHRASE,
            Network::Mainnet => MAINNET_PASSPHRASE,
        }
    }

    /// Public Soroban RPC endpoint, if SDF runs one for this network.
    pub fn default_rpc_url(&self) -> Option<&'static str> {
        match self {
            Network::Testnet => Some("https://soroban-testnet.stellar.org:443"),
            Network::Mainnet => None,
        }
    }

    pub fn default_horizon_url(&self) -> &'static str {
        match self {
            Network::Testnet => "https://horizon-testnet.stellar.org",
            Network::Mainnet => "https://horizon.stellar.org",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "testnet" => Some(Network::Testnet),
            "mainnet" => Some(Network::Mainnet),
            _ => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Network::Testnet => f.write_str("testnet"),
            Network::Mainnet => f.write_str("mainnet"),
        }
    }
}

/// Everything a contract client and submission pipeline need to reach the
/// crowdfunding contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub network: Network,
    pub passphrase: String,
    pub rpc_url: String,
    pub horizon_url: String,
    /// Contract address (`C...`) of the crowdfunding contract.
    pub contract_id: String,
}

impl NetworkConfig {
    /// Testnet defaults for the given contract.
    pub fn testnet(contract_id: impl Into<String>) -> Self {
        let network = Network::Testnet;
        Self {
            network,
            passphrase: network.passphrase().to_string(),
            rpc_url: network.default_rpc_url().unwrap_or_default().to_string(),
            horizon_url: network.default_horizon_url().to_string(),
            contract_id: contract_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(Network::Testnet.passphrase(), TESTNET_PASSPHRASE);
        assert!(Network::Mainnet.default_rpc_url().is_none());
        assert_eq!(Network::parse("testnet"), Some(Network::Testnet));
        assert_eq!(Network::parse("futurenet"), None);
        assert_eq!(Network::Mainnet.to_string(), "mainnet");
    }

    #[test]
    fn test_testnet_config() {
        let cfg = NetworkConfig::testnet("CABC");
        assert_eq!(cfg.rpc_url, "https://soroban-testnet.stellar.org:443");
        assert_eq!(cfg.contract_id, "CABC");
    }
}
