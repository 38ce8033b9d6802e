use eframe::egui::{self, RichText};

use crate::app::state::{Route, UiAction};
use crate::models::UserInfo;

pub fn render(ui: &mut egui::Ui, user: Option<&UserInfo>, actions: &mut Vec<UiAction>) {
    ui.heading("Profile");
    ui.add_space(8.0);

    match user {
        Some(user) => {
            ui.label(RichText::new(user.display_name()).strong().size(18.0));
            egui::Grid::new("profile_grid")
                .num_columns(2)
                .spacing([16.0, 6.0])
                .striped(true)
                .show(ui, |ui| {
                    let rows = [
                        ("Email", user.email.clone()),
                        ("Phone", user.phone.clone()),
                        ("Role", user.role.clone()),
                        ("Address", user.address.clone()),
                        ("Bio", user.bio.clone()),
                    ];
                    for (label, value) in rows {
                        ui.label(label);
                        ui.label(value.unwrap_or_else(|| "—".into()));
                        ui.end_row();
                    }
                    let flags = [
                        ("Email verified", user.email_verified),
                        ("Phone verified", user.phone_verified),
                    ];
                    for (label, flag) in flags {
                        ui.label(label);
                        ui.label(match flag {
                            Some(true) => "Yes",
                            Some(false) => "No",
                            None => "—",
                        });
                        ui.end_row();
                    }
                    if let (Some(lat), Some(lon)) = (user.latitude, user.longitude) {
                        ui.label("Location");
                        ui.label(format!("{lat:.4}, {lon:.4}"));
                        ui.end_row();
                    }
                });
        }
        None => {
            ui.label("No profile saved on this device.");
            if ui.button("Log in").clicked() {
                actions.push(UiAction::Navigate(Route::Landing));
            }
        }
    }

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        if ui.button("Back").clicked() {
            actions.push(UiAction::Navigate(Route::Home));
        }
        if ui.button("Log out").clicked() {
            actions.push(UiAction::Logout);
        }
    });
}
