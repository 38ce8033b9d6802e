pub mod feed;
pub mod landing;
pub mod profile;
pub mod register;
pub mod reset;

use eframe::egui::{self, Color32};

use crate::flows::Notice;

/// Draws an error or success message with a close button. Returns true when dismissed.
pub(crate) fn notice_banner(ui: &mut egui::Ui, notice: Option<&Notice>) -> bool {
    let Some(notice) = notice else {
        return false;
    };
    let color = if notice.is_error() {
        Color32::LIGHT_RED
    } else {
        Color32::LIGHT_GREEN
    };
    let mut dismissed = false;
    egui::Frame::group(ui.style())
        .fill(ui.visuals().extreme_bg_color)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(color, notice.text());
                if ui.small_button("✕").clicked() {
                    dismissed = true;
                }
            });
        });
    dismissed
}

/// Single-line labelled input laid out as a grid row.
pub(crate) fn field_row(ui: &mut egui::Ui, label: &str, value: &mut String, password: bool) {
    ui.label(label);
    ui.add(
        egui::TextEdit::singleline(value)
            .password(password)
            .desired_width(260.0),
    );
    ui.end_row();
}
