use async_trait::async_trait;
use thiserror::Error;

use crate::client::UnsignedTransaction;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Signing failed: {0}")]
    Sign(String),

    #[error("Send failed: {0}")]
    Send(String),

    #[error("Transaction {hash} failed on-chain: {reason}")]
    Rejected { hash: String, reason: String },
}

/// A transaction the network has confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTransaction {
    pub hash: String,
}

/// Signs, sends and waits for confirmation of a built transaction.
///
/// One call yields exactly one outcome: `Ok` once the transaction is
/// confirmed, `Err` otherwise.
#[async_trait]
pub trait SubmissionPipeline: Send + Sync {
    async fn submit(&self, tx: UnsignedTransaction) -> Result<SubmittedTransaction, SubmitError>;
}
