//! Campaign panels: totals, progress, deadline and status badges.

use egui::{Color32, RichText, Ui};

use crate::display::CampaignDisplay;

pub fn show(ui: &mut Ui, display: &CampaignDisplay) {
    ui.columns(2, |cols| {
        cols[0].group(|ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new("Total Terdonasi").size(14.0).color(Color32::GRAY));
            ui.add_space(4.0);
            ui.label(RichText::new(&display.raised).size(28.0).strong());
            if let Some(delta) = &display.delta {
                ui.label(RichText::new(delta).color(Color32::GREEN));
            }
            ui.add_space(4.0);
            ui.label(format!("Target: {}", display.target));
        });

        cols[1].group(|ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new("Total Donations").size(14.0).color(Color32::GRAY));
            ui.add_space(4.0);
            ui.add(
                egui::ProgressBar::new(display.progress_fraction)
                    .text(display.progress_label.as_str()),
            );
            ui.add_space(4.0);
            ui.label(format!("Deadline: {}", display.deadline));
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                badge(ui, display.goal_badge, display.goal_reached);
                badge(ui, display.status_badge, !display.ended);
            });
        });
    });
}

fn badge(ui: &mut Ui, text: &str, positive: bool) {
    let color = if positive {
        Color32::GREEN
    } else {
        Color32::YELLOW
    };
    ui.label(RichText::new(text).color(color).strong());
}
