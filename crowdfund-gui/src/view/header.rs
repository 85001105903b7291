//! Header bar: title, network and wallet controls.

use egui::Ui;
use tokio::sync::mpsc;

use crate::events::UiEvent;
use crate::state::AppState;

pub fn show(ui: &mut Ui, state: &AppState, network: &str, ui_tx: &mpsc::UnboundedSender<UiEvent>) {
    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.heading(egui::RichText::new("Learning Stellar").strong());
            ui.label(
                egui::RichText::new("Dapps CrowdFunding Di Jaringan Stellar")
                    .color(egui::Color32::GRAY),
            );
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            match state.session.address() {
                Some(address) => {
                    if ui.button("Disconnect").clicked() {
                        let _ = ui_tx.send(UiEvent::DisconnectWallet);
                    }
                    ui.label(egui::RichText::new(address.short()).monospace())
                        .on_hover_text(address.as_str());
                }
                None => {
                    if ui.button("🔑 Connect wallet").clicked() {
                        let _ = ui_tx.send(UiEvent::ConnectWallet);
                    }
                }
            }

            if ui
                .add_enabled(state.has_client, egui::Button::new("⟳ Refresh"))
                .clicked()
            {
                let _ = ui_tx.send(UiEvent::Refresh);
            }

            ui.label(egui::RichText::new(network).color(egui::Color32::LIGHT_BLUE));
        });
    });
    ui.add_space(6.0);
}
