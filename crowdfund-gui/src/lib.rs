//! Desktop donation wallet for a Stellar crowdfunding campaign.
//!
//! The egui front end ([`app`], [`view`]) talks to a single background task
//! ([`service`]) through the event enums in [`events`]. Production
//! collaborators live in [`stellar_cli`] and [`horizon`].

pub mod app;
pub mod config;
pub mod display;
pub mod events;
pub mod horizon;
pub mod service;
pub mod state;
pub mod stellar_cli;
pub mod view;
