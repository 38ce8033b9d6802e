use eframe::egui::{self, RichText};

use crate::app::state::{ResetState, Route, UiAction};
use crate::flows::reset::ResetStep;

use super::{field_row, notice_banner};

pub fn render(ui: &mut egui::Ui, state: &mut ResetState, actions: &mut Vec<UiAction>) {
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.heading("Reset password");
        let step = state.flow.step();
        ui.label(RichText::new(step_hint(step)).weak());
        ui.add_space(12.0);

        if notice_banner(ui, state.flow.notice()) {
            state.flow.dismiss_notice();
        }

        let busy = state.flow.is_busy() || state.flow.is_complete();
        egui::Grid::new("reset_grid")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| match step {
                ResetStep::Email => field_row(ui, "Email", &mut state.email_input, false),
                ResetStep::Otp => field_row(ui, "Verification code", &mut state.otp_input, false),
                ResetStep::NewPassword => {
                    field_row(ui, "New password", &mut state.password_input, true);
                    field_row(ui, "Confirm password", &mut state.confirm_input, true);
                }
            });

        ui.add_space(8.0);
        let label = match step {
            ResetStep::Email => "Send code",
            ResetStep::Otp => "Verify code",
            ResetStep::NewPassword => "Reset password",
        };
        if ui.add_enabled(!busy, egui::Button::new(label)).clicked() {
            let submitted = match step {
                ResetStep::Email => state.flow.submit_email(&state.email_input),
                ResetStep::Otp => state.flow.submit_otp(&state.otp_input),
                ResetStep::NewPassword => state
                    .flow
                    .submit_new_password(&state.password_input, &state.confirm_input),
            };
            if let Ok(request) = submitted {
                actions.push(UiAction::Reset {
                    flow_id: state.flow.id(),
                    request,
                });
            }
        }
        if busy {
            ui.add(egui::Spinner::new());
        }

        ui.add_space(12.0);
        if ui.link("Back to Login").clicked() {
            actions.push(UiAction::Navigate(Route::Landing));
        }
    });
}

fn step_hint(step: ResetStep) -> &'static str {
    match step {
        ResetStep::Email => "Enter the email address on your account.",
        ResetStep::Otp => "Enter the code we sent you.",
        ResetStep::NewPassword => "Choose a new password.",
    }
}
