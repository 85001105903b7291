//! Presentation model for the campaign screen.
//!
//! Pure functions of [`AppState`]. The egui view only lays these strings out.

use chrono::{Local, TimeZone};
use crowdfund::amount::XLM_DECIMALS;
use crowdfund::{format_xlm, format_xlm_signed, NativeBalance};

use crate::state::AppState;

pub const GOAL_REACHED: &str = "Target Tercapai";
pub const GOAL_NOT_REACHED: &str = "Target Belum Tercapai";
pub const CAMPAIGN_ENDED: &str = "Kampanye Berakhir";
pub const CAMPAIGN_ACTIVE: &str = "Kampanye Aktif";
pub const DONATE_LABEL: &str = "Donate Sekarang";
pub const DONATING_LABEL: &str = "Donating...";
pub const CONNECT_WALLET: &str = "Connect wallet";
pub const DEADLINE_UNKNOWN: &str = "N/A";
pub const THANK_YOU: &str = "Thank You For Donating";

/// Quick-fill amounts in XLM.
pub const QUICK_AMOUNTS: [u32; 3] = [10, 25, 50];

/// Decimal places for headline amounts.
const SUMMARY_DECIMALS: usize = 2;

/// Everything the campaign screen shows, already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignDisplay {
    /// e.g. `50.00 XLM`
    pub raised: String,
    /// e.g. `100.00 XLM`
    pub target: String,
    /// e.g. `+1.0000000 XLM added`, only after a donation changed the total.
    pub delta: Option<String>,
    /// Progress bar fill in `0.0..=1.0`.
    pub progress_fraction: f32,
    pub progress_label: String,
    pub deadline: String,
    pub goal_badge: &'static str,
    pub goal_reached: bool,
    pub status_badge: &'static str,
    pub ended: bool,
    /// Balance line in the token row.
    pub balance: String,
    /// Balance in the donation header (`- XLM` when unknown).
    pub header_balance: String,
    pub button_label: &'static str,
    /// e.g. `Sending 10.0000000 XLM`, while a donation is in flight.
    pub pending: Option<String>,
    pub button_enabled: bool,
    pub input_enabled: bool,
}

impl CampaignDisplay {
    pub fn from_state(state: &AppState) -> Self {
        let snapshot = &state.snapshot;
        let progress = snapshot.progress_percentage.min(100);

        Self {
            raised: xlm_summary(snapshot.total_raised),
            target: xlm_summary(snapshot.goal_amount),
            delta: delta_text(state.previous_total, snapshot.total_raised),
            progress_fraction: progress as f32 / 100.0,
            progress_label: format!("Progress: {}%", snapshot.progress_percentage),
            deadline: deadline_text(snapshot.deadline),
            goal_badge: if snapshot.is_goal_reached {
                GOAL_REACHED
            } else {
                GOAL_NOT_REACHED
            },
            goal_reached: snapshot.is_goal_reached,
            status_badge: if snapshot.is_ended {
                CAMPAIGN_ENDED
            } else {
                CAMPAIGN_ACTIVE
            },
            ended: snapshot.is_ended,
            balance: balance_text(state),
            header_balance: format!("{} XLM", state.balance),
            button_label: if state.is_submitting() {
                DONATING_LABEL
            } else {
                DONATE_LABEL
            },
            pending: state
                .pending_stroops
                .map(|s| format!("Sending {} XLM", format_xlm(s, XLM_DECIMALS))),
            button_enabled: state.can_submit(),
            input_enabled: !state.is_submitting(),
        }
    }
}

/// Stroops as `12.34 XLM`.
pub fn xlm_summary(stroops: i128) -> String {
    format!("{} XLM", format_xlm(stroops, SUMMARY_DECIMALS))
}

/// Change since the last confirmed donation, shown only when there is one.
pub fn delta_text(previous_total: i128, total: i128) -> Option<String> {
    if previous_total <= 0 || previous_total == total {
        return None;
    }
    let delta = total.checked_sub(previous_total)?;
    Some(format!(
        "{} XLM added",
        format_xlm_signed(delta, XLM_DECIMALS)
    ))
}

/// Unix seconds as local date-time, or `N/A` for 0.
pub fn deadline_text(deadline: u64) -> String {
    if deadline == 0 {
        return DEADLINE_UNKNOWN.to_string();
    }
    i64::try_from(deadline)
        .ok()
        .and_then(|secs| Local.timestamp_opt(secs, 0).single())
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| DEADLINE_UNKNOWN.to_string())
}

fn balance_text(state: &AppState) -> String {
    if !state.session.is_connected() {
        return CONNECT_WALLET.to_string();
    }
    match &state.balance {
        NativeBalance::Known(b) => format!("{} XLM", b),
        NativeBalance::Unavailable => "-".to_string(),
    }
}
