use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::address::AccountId;

#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("HTTP error {0}")]
    Http(u16),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Native XLM balance as reported by the balance source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NativeBalance {
    /// Decimal XLM string exactly as the source returned it.
    Known(String),
    /// Not fetched, unfunded account, or fetch failed. Rendered as `-`.
    #[default]
    Unavailable,
}

impl fmt::Display for NativeBalance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NativeBalance::Known(b) => f.write_str(b),
            NativeBalance::Unavailable => f.write_str("-"),
        }
    }
}

/// Native token balance lookup for an account.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn fetch(&self, address: &AccountId) -> Result<NativeBalance, BalanceError>;
}
