use eframe::egui;

use crate::app::state::{Route, UiAction};
use crate::flows::auth::LoginForm;

use super::{field_row, notice_banner};

pub fn render(ui: &mut egui::Ui, form: &mut LoginForm, actions: &mut Vec<UiAction>) {
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.heading("Log in");
        ui.add_space(12.0);

        if notice_banner(ui, form.notice()) {
            form.dismiss_notice();
        }

        egui::Grid::new("login_grid")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                field_row(ui, "Email", &mut form.email, false);
                field_row(ui, "Password", &mut form.password, true);
            });

        ui.add_space(8.0);
        let submit = ui.add_enabled(!form.is_submitting(), egui::Button::new("Log in"));
        let entered = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if submit.clicked() || (entered && !form.is_submitting()) {
            if let Ok(request) = form.submit() {
                actions.push(UiAction::Login(request));
            }
        }
        if form.is_submitting() {
            ui.add(egui::Spinner::new());
        }

        ui.add_space(12.0);
        if ui.link("Forgot password?").clicked() {
            actions.push(UiAction::Navigate(Route::ForgotPassword));
        }
        if ui.link("New here? Create an account").clicked() {
            actions.push(UiAction::Navigate(Route::Register));
        }
    });
}
