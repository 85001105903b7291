//! Event types for communication between UI and service task.
//!
//! These two enums are the *only* interface between the synchronous egui render
//! loop and the asynchronous service task. No shared state, no Arc, no Mutex.

use crowdfund::{AmountError, CampaignUpdate, NativeBalance, WalletSession};

// ============================================================================
// UI → Service
// ============================================================================

/// Commands sent from the UI thread to the background service task.
#[derive(Debug)]
pub enum UiEvent {
    /// Ask the wallet provider for a session.
    ConnectWallet,

    /// Drop the current wallet session.
    DisconnectWallet,

    /// Re-run every campaign refresh group and the balance fetch.
    Refresh,

    /// Submit a donation with the raw text from the amount input.
    Donate { amount: String },

    /// Clean shutdown.
    Shutdown,
}

// ============================================================================
// Service → UI
// ============================================================================

/// Which step of the donation flow failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonationStage {
    /// The contract client could not build the transaction.
    Build,
    /// Signing, sending or confirmation failed.
    Submit,
}

/// Events sent from the service task back to the UI thread.
#[derive(Debug)]
pub enum ServiceEvent {
    /// The wallet session changed and the contract client was re-resolved.
    SessionChanged {
        session: WalletSession,
        has_client: bool,
    },

    /// One refresh group finished.
    Campaign(CampaignUpdate),

    /// Updated native balance for the connected account.
    BalanceUpdated(NativeBalance),

    /// Guard passed and the amount is valid; a donation is in flight.
    DonationStarted { stroops: i128 },

    /// The amount failed validation. Nothing was sent.
    DonationRejected(AmountError),

    /// The pipeline confirmed the donation.
    DonationConfirmed { hash: String },

    /// The donation failed; the draft amount should be kept for retry.
    DonationFailed { stage: DonationStage, reason: String },

    /// Non-fatal error to display in the UI.
    Error(String),
}
