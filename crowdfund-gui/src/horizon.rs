//! Horizon REST client for native XLM balances.
//!
//! Only `GET /accounts/{id}` is used. An account that does not exist yet
//! (404) has no balance to show and maps to [`NativeBalance::Unavailable`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crowdfund::{AccountId, BalanceError, BalanceSource, NativeBalance};

#[derive(Debug, Deserialize)]
pub struct AccountResponse {
    #[serde(default)]
    pub balances: Vec<AccountBalance>,
}

#[derive(Debug, Deserialize)]
pub struct AccountBalance {
    pub asset_type: String,
    pub balance: String,
}

/// Pick the native entry out of an account's balance list.
pub fn native_balance(account: &AccountResponse) -> NativeBalance {
    account
        .balances
        .iter()
        .find(|b| b.asset_type == "native")
        .map(|b| NativeBalance::Known(b.balance.clone()))
        .unwrap_or(NativeBalance::Unavailable)
}

pub struct HorizonBalanceSource {
    base_url: String,
    client: reqwest::Client,
}

impl HorizonBalanceSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, BalanceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| BalanceError::Request(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn account_url(&self, address: &AccountId) -> String {
        format!("{}/accounts/{}", self.base_url, address)
    }
}

#[async_trait]
impl BalanceSource for HorizonBalanceSource {
    async fn fetch(&self, address: &AccountId) -> Result<NativeBalance, BalanceError> {
        let url = self.account_url(address);
        log::debug!("→ GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BalanceError::Request(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                log::info!("Account {} is not funded yet", address.short());
                Ok(NativeBalance::Unavailable)
            }
            status if !status.is_success() => Err(BalanceError::Http(status.as_u16())),
            _ => {
                let account: AccountResponse = response
                    .json()
                    .await
                    .map_err(|e| BalanceError::InvalidResponse(e.to_string()))?;
                Ok(native_balance(&account))
            }
        }
    }
}
