//! Application state: plain data, no async, no Arc.
//!
//! `AppState` holds everything the UI needs to render. The service task sends
//! `ServiceEvent`s which are applied via `AppState::apply()`. The UI reads
//! fields directly without locking.

use crowdfund::{CampaignSnapshot, CampaignUpdate, NativeBalance, WalletSession};

use crate::events::{DonationStage, ServiceEvent};

/// Donation flow position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
}

/// One-line message shown under the donate button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Rejected(String),
    Failed(String),
    Confirmed(String),
}

/// All application state needed for rendering.
#[derive(Debug, Default)]
pub struct AppState {
    // -- Wallet --
    pub session: WalletSession,
    /// True while a contract client is resolved for the session.
    pub has_client: bool,
    pub balance: NativeBalance,

    // -- Campaign --
    pub snapshot: CampaignSnapshot,
    /// Total raised just before the last confirmed donation.
    pub previous_total: i128,

    // -- Donation --
    pub amount_input: String,
    pub submission: SubmissionPhase,
    /// Validated amount of the donation in flight.
    pub pending_stroops: Option<i128>,
    pub notice: Option<Notice>,
}

impl AppState {
    /// Whether the donate command is available.
    pub fn can_submit(&self) -> bool {
        self.session.is_connected()
            && self.submission == SubmissionPhase::Idle
            && !self.amount_input.trim().is_empty()
    }

    pub fn is_submitting(&self) -> bool {
        self.submission == SubmissionPhase::Submitting
    }

    /// Replace the draft amount (quick-amount buttons, typing).
    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount_input = amount.into();
        if matches!(self.notice, Some(Notice::Rejected(_))) {
            self.notice = None;
        }
    }

    /// Apply a service event to update state. Pure state-machine transition.
    pub fn apply(&mut self, event: ServiceEvent) {
        match event {
            ServiceEvent::SessionChanged {
                session,
                has_client,
            } => {
                if !session.is_connected() {
                    self.balance = NativeBalance::Unavailable;
                }
                self.session = session;
                self.has_client = has_client;
            }

            ServiceEvent::Campaign(update) => {
                self.apply_campaign(update);
            }

            ServiceEvent::BalanceUpdated(balance) => {
                self.balance = balance;
            }

            ServiceEvent::DonationStarted { stroops } => {
                self.submission = SubmissionPhase::Submitting;
                self.pending_stroops = Some(stroops);
                self.notice = None;
            }

            ServiceEvent::DonationRejected(err) => {
                self.submission = SubmissionPhase::Idle;
                self.pending_stroops = None;
                self.notice = Some(Notice::Rejected(err.to_string()));
            }

            ServiceEvent::DonationConfirmed { hash } => {
                self.previous_total = self.snapshot.total_raised;
                self.amount_input.clear();
                self.submission = SubmissionPhase::Idle;
                self.pending_stroops = None;
                self.notice = Some(Notice::Confirmed(hash));
            }

            ServiceEvent::DonationFailed { stage, reason } => {
                self.submission = SubmissionPhase::Idle;
                self.pending_stroops = None;
                let prefix = match stage {
                    DonationStage::Build => "Could not build donation",
                    DonationStage::Submit => "Donation failed",
                };
                self.notice = Some(Notice::Failed(format!("{}: {}", prefix, reason)));
            }

            ServiceEvent::Error(msg) => {
                self.notice = Some(Notice::Failed(msg));
            }
        }
    }

    /// Replace the snapshot with one refresh group's result.
    fn apply_campaign(&mut self, update: CampaignUpdate) {
        self.snapshot = self.snapshot.with(update);
    }
}
