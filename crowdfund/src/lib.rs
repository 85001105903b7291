//! Stellar crowdfunding campaign library
//!
//! Shared vocabulary for the donation wallet:
//! - Stroop fixed-point amounts with exact decimal parsing
//! - Strkey account id validation
//! - Network presets (passphrase, RPC, Horizon)
//! - Campaign snapshot and per-refresh-group updates
//! - Collaborator traits: wallet provider, balance source, contract client,
//!   submission pipeline

pub mod address;
pub mod amount;
pub mod balance;
pub mod campaign;
pub mod client;
pub mod network;
pub mod submit;
pub mod wallet;

pub use address::{AccountId, AddressError};
pub use amount::{format_xlm, format_xlm_signed, parse_xlm, AmountError, STROOPS_PER_XLM};
pub use balance::{BalanceError, BalanceSource, NativeBalance};
pub use campaign::{CampaignSnapshot, CampaignStatus, CampaignUpdate, RefreshGroup};
pub use client::{
    resolve_client, ClientError, ClientParams, ContractClient, ContractClientFactory,
    UnsignedTransaction,
};
pub use network::{Network, NetworkConfig};
pub use submit::{SubmissionPipeline, SubmitError, SubmittedTransaction};
pub use wallet::{WalletError, WalletProvider, WalletSession};
