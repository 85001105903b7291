//! UI view modules: pure rendering functions.
//!
//! Views read from [`AppState`](crate::state::AppState) or the formatted
//! [`CampaignDisplay`](crate::display::CampaignDisplay) and send
//! [`UiEvent`](crate::events::UiEvent)s on user interaction.

pub mod campaign;
pub mod donate;
pub mod header;
