//! Crowdfunding contract client interface.
//!
//! Mirrors the contract's public functions: six reads and the `donate` write.
//! Writes only build a transaction; signing and sending belong to the
//! [`SubmissionPipeline`](crate::submit::SubmissionPipeline).

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::address::AccountId;
use crate::network::NetworkConfig;
use crate::wallet::WalletSession;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Contract call {function} failed: {message}")]
    Call { function: String, message: String },

    #[error("Unexpected result from {function}: {value}")]
    InvalidResult { function: String, value: String },
}

impl ClientError {
    pub fn call(function: &str, message: impl Into<String>) -> Self {
        Self::Call {
            function: function.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_result(function: &str, value: impl Into<String>) -> Self {
        Self::InvalidResult {
            function: function.to_string(),
            value: value.into(),
        }
    }
}

/// A transaction built by the contract client but not yet signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    /// Base64 XDR transaction envelope.
    pub xdr: String,
}

/// Read/write access to the crowdfunding contract.
#[async_trait]
pub trait ContractClient: Send + Sync {
    async fn get_total_raised(&self) -> Result<i128, ClientError>;

    async fn get_goal(&self) -> Result<i128, ClientError>;

    async fn get_deadline(&self) -> Result<u64, ClientError>;

    async fn is_goal_reached(&self) -> Result<bool, ClientError>;

    async fn is_ended(&self) -> Result<bool, ClientError>;

    async fn get_progress_percentage(&self) -> Result<u32, ClientError>;

    /// Build a `donate(donor, amount)` invocation.
    async fn donate(
        &self,
        donor: &AccountId,
        amount: i128,
    ) -> Result<UnsignedTransaction, ClientError>;
}

/// Parameters a client is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientParams {
    pub network: NetworkConfig,
    /// Account used as transaction source and donor.
    pub public_key: AccountId,
}

/// Builds contract clients. Construction must not perform I/O.
pub trait ContractClientFactory: Send + Sync {
    fn create(&self, params: ClientParams) -> Arc<dyn ContractClient>;
}

/// Resolve the client handle for a wallet session.
///
/// Absent unless the session is connected to a resolved address.
pub fn resolve_client(
    session: &WalletSession,
    network: &NetworkConfig,
    factory: &dyn ContractClientFactory,
) -> Option<Arc<dyn ContractClient>> {
    let public_key = session.address()?.clone();
    Some(factory.create(ClientParams {
        network: network.clone(),
        public_key,
    }))
}
