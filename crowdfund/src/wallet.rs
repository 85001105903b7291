use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use crate::address::{AccountId, AddressError};

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Wallet unavailable: {0}")]
    Unavailable(String),

    #[error("Wallet returned an invalid address: {0}")]
    InvalidAddress(#[from] AddressError),
}

/// Connection state published by a wallet provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletSession {
    address: Option<AccountId>,
}

impl WalletSession {
    pub fn connected(address: AccountId) -> Self {
        Self {
            address: Some(address),
        }
    }

    pub fn disconnected() -> Self {
        Self { address: None }
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    pub fn address(&self) -> Option<&AccountId> {
        self.address.as_ref()
    }

}

/// Source of the current wallet session.
///
/// The campaign controller only observes sessions; `connect` and `disconnect`
/// exist for the controls that sit outside it.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Receiver that is notified every time the session changes.
    fn subscribe(&self) -> watch::Receiver<WalletSession>;

    async fn connect(&self) -> Result<WalletSession, WalletError>;

    async fn disconnect(&self);
}
