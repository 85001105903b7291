//! Donation wallet configuration
//!
//! The wallet only needs to know:
//! - Which network (testnet/mainnet) and which crowdfunding contract
//! - Where the Soroban RPC and Horizon servers are
//! - Which `stellar` CLI key identity connects and signs

use crowdfund::{Network, NetworkConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Crowdfunding contract deployed for the Learning Stellar campaign.
pub const DEFAULT_CONTRACT_ID: &str = "CC3CBCAAYVNQQMBGDBTA7A7EIIMTLIWRW6S5STVE4TE2ETMWZ3RDZTRC";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Network type ("testnet" or "mainnet")
    #[serde(default = "default_network")]
    pub network: String,

    /// Crowdfunding contract address (C...)
    #[serde(default = "default_contract_id")]
    pub contract_id: String,

    /// Soroban RPC endpoint. Defaults to the SDF endpoint for the network.
    #[serde(default)]
    pub rpc_url: Option<String>,

    /// Horizon endpoint used for balances.
    #[serde(default)]
    pub horizon_url: Option<String>,

    /// Override for the network passphrase (custom networks).
    #[serde(default)]
    pub network_passphrase: Option<String>,

    /// `stellar keys` identity that provides the address and signs.
    #[serde(default = "default_identity")]
    pub identity: String,

    /// Path or name of the `stellar` executable.
    #[serde(default = "default_stellar_bin")]
    pub stellar_bin: String,
}

fn default_network() -> String {
    "testnet".to_string()
}

fn default_contract_id() -> String {
    DEFAULT_CONTRACT_ID.to_string()
}

fn default_identity() -> String {
    "default".to_string()
}

fn default_stellar_bin() -> String {
    "stellar".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: default_network(),
            contract_id: default_contract_id(),
            rpc_url: None,
            horizon_url: None,
            network_passphrase: None,
            identity: default_identity(),
            stellar_bin: default_stellar_bin(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            log::info!("📝 Creating default config");
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Load and validate configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        log::info!("📁 Loading config from: {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        log::info!(
            "✅ Config loaded: network={}, contract={}",
            config.network,
            config.contract_id
        );
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        log::info!("💾 Config saved to: {}", path.display());
        Ok(())
    }

    /// Get config file path
    fn config_path() -> Result<PathBuf, ConfigError> {
        let mut path = Self::data_dir()?;
        path.push("config.toml");
        Ok(path)
    }

    /// Get base data directory
    pub fn data_dir() -> Result<PathBuf, ConfigError> {
        let mut path = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        path.push(".stellar-crowdfund");
        Ok(path)
    }

    /// Parsed network selector.
    pub fn network(&self) -> Result<Network, ConfigError> {
        Network::parse(&self.network).ok_or_else(|| ConfigError::InvalidNetwork(self.network.clone()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let network = self.network()?;

        if !self.contract_id.starts_with('C') || self.contract_id.len() != 56 {
            return Err(ConfigError::InvalidContract(self.contract_id.clone()));
        }

        for url in [&self.rpc_url, &self.horizon_url].into_iter().flatten() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidEndpoint(url.clone()));
            }
        }

        if self.rpc_url.is_none() && network.default_rpc_url().is_none() {
            return Err(ConfigError::MissingRpcUrl(network.to_string()));
        }

        if self.identity.trim().is_empty() {
            return Err(ConfigError::InvalidIdentity);
        }

        Ok(())
    }

    /// Resolve endpoints and passphrase, filling in network defaults.
    pub fn network_config(&self) -> Result<NetworkConfig, ConfigError> {
        self.validate()?;
        let network = self.network()?;

        let rpc_url = match (&self.rpc_url, network.default_rpc_url()) {
            (Some(url), _) => url.clone(),
            (None, Some(url)) => url.to_string(),
            (None, None) => return Err(ConfigError::MissingRpcUrl(network.to_string())),
        };

        Ok(NetworkConfig {
            network,
            passphrase: self
                .network_passphrase
                .clone()
                .unwrap_or_else(|| network.passphrase().to_string()),
            rpc_url,
            horizon_url: self
                .horizon_url
                .clone()
                .unwrap_or_else(|| network.default_horizon_url().to_string()),
            contract_id: self.contract_id.clone(),
        })
    }
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Home directory not found")]
    NoHomeDir,

    #[error("Invalid network: {0} (must be 'testnet' or 'mainnet')")]
    InvalidNetwork(String),

    #[error("Invalid contract id: {0} (expected a 56-character C... address)")]
    InvalidContract(String),

    #[error("Invalid endpoint: {0} (must start with http:// or https://)")]
    InvalidEndpoint(String),

    #[error("No rpc_url configured and no public RPC known for {0}")]
    MissingRpcUrl(String),

    #[error("Identity must not be empty")]
    InvalidIdentity,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crowdfund::network::{MAINNET_PASSPHRASE, TESTNET_PASSPHRASE};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.network, "testnet");
        assert_eq!(config.contract_id, DEFAULT_CONTRACT_ID);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();

        config.network = "invalid".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidNetwork(_))
        ));

        config.network = "testnet".to_string();
        config.contract_id = "GABC".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidContract(_))
        ));

        config.contract_id = DEFAULT_CONTRACT_ID.to_string();
        config.horizon_url = Some("horizon.example".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEndpoint(_))
        ));

        config.horizon_url = None;
        config.identity = " ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidIdentity)
        ));
    }

    #[test]
    fn test_mainnet_requires_rpc_url() {
        let mut config = Config {
            network: "mainnet".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRpcUrl(_))
        ));

        config.rpc_url = Some("https://rpc.example.org".to_string());
        let net = config.network_config().unwrap();
        assert_eq!(net.passphrase, MAINNET_PASSPHRASE);
        assert_eq!(net.rpc_url, "https://rpc.example.org");
        assert_eq!(net.horizon_url, "https://horizon.stellar.org");
    }

    #[test]
    fn test_testnet_defaults() {
        let net = Config::default().network_config().unwrap();
        assert_eq!(net.passphrase, TESTNET_PASSPHRASE);
        assert_eq!(net.rpc_url, "https://soroban-testnet.stellar.org:443");
        assert_eq!(net.horizon_url, "https://horizon-testnet.stellar.org");
        assert_eq!(net.contract_id, DEFAULT_CONTRACT_ID);
    }

    #[test]
    fn test_passphrase_override() {
        let config = Config {
            network_passphrase: Some("Standalone Network ; February 2017".to_string()),
            rpc_url: Some("http://localhost:8000/soroban/rpc".to_string()),
            ..Config::default()
        };
        let net = config.network_config().unwrap();
        assert_eq!(net.passphrase, "Standalone Network ; February 2017");
        assert_eq!(net.rpc_url, "http://localhost:8000/soroban/rpc");
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            identity: "alice".to_string(),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.identity, "alice");
        assert_eq!(loaded.network, "testnet");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "identity = \"bob\"\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.identity, "bob");
        assert_eq!(loaded.contract_id, DEFAULT_CONTRACT_ID);
        assert_eq!(loaded.stellar_bin, "stellar");
    }
}
