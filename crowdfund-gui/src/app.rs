//! Application struct: the eframe::App implementation.
//!
//! Thin wrapper: drains service events, dispatches to view modules.
//! No async, no contract calls, no wallet logic.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::display::CampaignDisplay;
use crate::events::{ServiceEvent, UiEvent};
use crate::service::Collaborators;
use crate::state::AppState;
use crate::view;

/// The donation wallet application.
pub struct App {
    pub state: AppState,
    pub ui_tx: mpsc::UnboundedSender<UiEvent>,
    svc_rx: mpsc::UnboundedReceiver<ServiceEvent>,
    shutdown_token: CancellationToken,
    network_label: String,
}

impl App {
    /// Create a new App, spawning the background service task.
    pub fn new(_cc: &eframe::CreationContext<'_>, collaborators: Collaborators) -> Self {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (svc_tx, svc_rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        let network_label = collaborators.network.network.to_string();

        tokio::spawn(crate::service::run(
            token.clone(),
            ui_rx,
            svc_tx,
            collaborators,
        ));

        Self {
            state: AppState::default(),
            ui_tx,
            svc_rx,
            shutdown_token: token,
            network_label,
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.ui_tx.send(UiEvent::Shutdown);
        self.shutdown_token.cancel();
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint_after(std::time::Duration::from_secs(1));

        // 1. Drain all pending service events (non-blocking)
        while let Ok(event) = self.svc_rx.try_recv() {
            self.state.apply(event);
            ctx.request_repaint();
        }

        // 2. Header with wallet controls
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            view::header::show(ui, &self.state, &self.network_label, &self.ui_tx);
        });

        // 3. Campaign and donation form
        let display = CampaignDisplay::from_state(&self.state);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                view::campaign::show(ui, &display);
                ui.add_space(15.0);
                view::donate::show(ui, &mut self.state, &display, &self.ui_tx);
            });
        });
    }
}
