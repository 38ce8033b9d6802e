use eframe::egui;

use crate::app::state::{Route, UiAction};
use crate::flows::auth::RegisterForm;

use super::{field_row, notice_banner};

pub fn render(ui: &mut egui::Ui, form: &mut RegisterForm, actions: &mut Vec<UiAction>) {
    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.heading("Create an account");
        ui.add_space(8.0);

        if notice_banner(ui, form.notice()) {
            form.dismiss_notice();
        }

        egui::Grid::new("register_grid")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                field_row(ui, "First name", &mut form.first_name, false);
                field_row(ui, "Last name", &mut form.last_name, false);
                field_row(ui, "Email", &mut form.email, false);
                field_row(ui, "Phone", &mut form.phone, false);
                field_row(ui, "Password", &mut form.password, true);
                field_row(ui, "Role", &mut form.role, false);
                field_row(ui, "Address", &mut form.address, false);
                field_row(ui, "Latitude", &mut form.latitude, false);
                field_row(ui, "Longitude", &mut form.longitude, false);
            });
        ui.label("Bio");
        ui.add(egui::TextEdit::multiline(&mut form.bio).desired_rows(3));

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!form.is_submitting(), egui::Button::new("Register"))
                .clicked()
            {
                if let Ok(input) = form.submit() {
                    actions.push(UiAction::Register(input));
                }
            }
            if form.is_submitting() {
                ui.add(egui::Spinner::new());
            }
        });

        ui.add_space(12.0);
        if ui.link("Already have an account? Log in").clicked() {
            actions.push(UiAction::Navigate(Route::Landing));
        }
    });
}
