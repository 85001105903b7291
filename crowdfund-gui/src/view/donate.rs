//! Donation form: amount input, quick amounts and the donate button.

use egui::{Color32, RichText, Ui};
use tokio::sync::mpsc;

use crate::display::{CampaignDisplay, QUICK_AMOUNTS, THANK_YOU};
use crate::events::UiEvent;
use crate::state::{AppState, Notice};

pub fn show(
    ui: &mut Ui,
    state: &mut AppState,
    display: &CampaignDisplay,
    ui_tx: &mpsc::UnboundedSender<UiEvent>,
) {
    ui.group(|ui| {
        ui.set_min_width(ui.available_width());

        ui.horizontal(|ui| {
            ui.heading("Donasi");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(format!("Saldo: {}", display.header_balance))
                        .color(Color32::GRAY),
                );
            });
        });
        ui.separator();

        ui.horizontal(|ui| {
            ui.label(RichText::new("XLM").strong());
            ui.label(display.balance.as_str());
        });
        ui.add_space(8.0);

        let mut draft = state.amount_input.clone();
        let response = ui.add_enabled(
            display.input_enabled,
            egui::TextEdit::singleline(&mut draft)
                .hint_text("Masukkan jumlah XLM")
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            state.set_amount(draft);
        }

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            for amount in QUICK_AMOUNTS {
                if ui
                    .add_enabled(
                        display.input_enabled,
                        egui::Button::new(format!("{} XLM", amount)),
                    )
                    .clicked()
                {
                    state.set_amount(amount.to_string());
                }
            }
        });

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(
                    display.button_enabled,
                    egui::Button::new(RichText::new(display.button_label).size(16.0))
                        .min_size(egui::vec2(200.0, 36.0)),
                )
                .clicked()
            {
                let _ = ui_tx.send(UiEvent::Donate {
                    amount: state.amount_input.clone(),
                });
            }

            if let Some(pending) = &display.pending {
                ui.spinner();
                ui.label(RichText::new(pending.as_str()).color(Color32::GRAY));
            }
        });

        match &state.notice {
            Some(Notice::Rejected(msg)) => {
                ui.add_space(8.0);
                ui.colored_label(Color32::RED, format!("Invalid amount: {}", msg));
            }
            Some(Notice::Failed(msg)) => {
                ui.add_space(8.0);
                ui.colored_label(Color32::RED, msg.as_str());
            }
            Some(Notice::Confirmed(hash)) => {
                ui.add_space(8.0);
                ui.colored_label(Color32::GREEN, format!("Donation confirmed: {}", hash));
            }
            None => {}
        }
    });

    ui.add_space(15.0);
    ui.group(|ui| {
        ui.set_min_width(ui.available_width());
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(THANK_YOU)
                    .size(22.0)
                    .strong()
                    .color(Color32::from_rgb(0xff, 0x9e, 0xc5)),
            );
        });
    });
}
