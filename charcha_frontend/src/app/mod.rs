use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Local};
use eframe::egui::{self, Context};
use log::{info, warn};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::flows::feed::FeedState;
use crate::flows::reset::{ResetEvent, ResetFlow};
use crate::models::UserId;
use crate::storage::SessionStore;

mod messages;
mod state;
mod tasks;
mod ui;

use messages::AppMessage;
use state::{HomeState, ResetState, Route, UiAction, ViewState};
use tasks::Outbox;

pub struct CharchaApp {
    config: ClientConfig,
    api: ApiClient,
    store: SessionStore,
    rx: Receiver<AppMessage>,
    outbox: Outbox,
    view: ViewState,
    user_id: UserId,
    info_banner: Option<String>,
}

impl CharchaApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: ClientConfig) -> Result<Self> {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let mut api = ApiClient::new(config.endpoints()?, config.request_timeout())?;
        let data_dir = config.data_dir();
        let store = SessionStore::open(&data_dir).unwrap_or_else(|err| {
            warn!("session store unavailable, continuing in memory: {err}");
            SessionStore::in_memory()
        });
        api.set_token(store.token().map(str::to_string));
        let user_id = store.user_id().unwrap_or(config.user_id);

        let (tx, rx) = mpsc::channel();
        let outbox = Outbox::new(tx, cc.egui_ctx.clone());

        let mut app = Self {
            config,
            api,
            store,
            rx,
            outbox,
            view: ViewState::Landing(Default::default()),
            user_id,
            info_banner: None,
        };
        if app.store.token().is_some() {
            info!("restored session for user {}", app.user_id);
            app.navigate(Route::Home);
        }
        Ok(app)
    }

    fn navigate(&mut self, route: Route) {
        match route {
            Route::Landing => self.view = ViewState::Landing(Default::default()),
            Route::Register => self.view = ViewState::Register(Default::default()),
            Route::ForgotPassword => {
                let flow = ResetFlow::new(self.config.transition_delay());
                self.view = ViewState::ForgotPassword(ResetState::new(flow));
            }
            Route::Home => {
                let mut feed =
                    FeedState::new(self.user_id, self.config.feed_page, self.config.feed_limit);
                let load = feed.load().map(|request| UiAction::LoadFeed {
                    feed_id: feed.id(),
                    request,
                });
                self.view = ViewState::Home(HomeState::new(feed));
                if let Some(action) = load {
                    self.dispatch(action);
                }
            }
            Route::Profile => self.view = ViewState::Profile,
        }
    }

    fn dispatch(&mut self, action: UiAction) {
        let client = self.api.clone();
        let outbox = self.outbox.clone();
        match action {
            UiAction::Navigate(route) => self.navigate(route),
            UiAction::Reset { flow_id, request } => {
                tasks::run_reset(client, outbox, flow_id, request)
            }
            UiAction::Login(request) => tasks::login(client, outbox, request),
            UiAction::Register(input) => tasks::register(client, outbox, input),
            UiAction::LoadFeed { feed_id, request } => {
                tasks::load_feed(client, outbox, feed_id, request)
            }
            UiAction::Like { feed_id, request } => {
                tasks::toggle_like(client, outbox, feed_id, request)
            }
            UiAction::LoadComments { feed_id, request } => {
                tasks::load_comments(client, outbox, feed_id, request)
            }
            UiAction::Reply { feed_id, request } => {
                tasks::create_reply(client, outbox, feed_id, request)
            }
            UiAction::Logout => self.logout(),
        }
    }

    fn logout(&mut self) {
        if let Err(err) = self.store.clear() {
            warn!("failed to clear session: {err}");
        }
        self.api.set_token(None);
        self.user_id = self.config.user_id;
        self.info_banner = Some("Logged out".into());
        self.navigate(Route::Landing);
    }

    /// Applies a due step change of the reset flow and keeps frames coming until then.
    fn tick_reset(&mut self, ctx: &Context) {
        let ViewState::ForgotPassword(state) = &mut self.view else {
            return;
        };
        let now = Instant::now();
        match state.flow.tick(now) {
            ResetEvent::Completed => {
                info!("password reset completed");
                self.info_banner = Some("Password updated. Welcome back!".into());
                self.navigate(Route::Home);
            }
            ResetEvent::Advanced(step) => info!("reset flow advanced to {step}"),
            ResetEvent::Idle => {
                if let Some(due) = state.flow.next_deadline() {
                    ctx.request_repaint_after(due.saturating_duration_since(now));
                }
            }
        }
    }
}

impl eframe::App for CharchaApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        messages::process_messages(self);
        self.tick_reset(ctx);

        let mut actions = Vec::new();
        let route = self.view.route();
        let signed_in = self.store.token().is_some();

        egui::TopBottomPanel::top("top_controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Zameen pe charcha");
                ui.separator();
                if signed_in || matches!(route, Route::Home | Route::Profile) {
                    if ui.selectable_label(route == Route::Home, "Home").clicked() {
                        actions.push(UiAction::Navigate(Route::Home));
                    }
                    if ui.selectable_label(route == Route::Profile, "Profile").clicked() {
                        actions.push(UiAction::Navigate(Route::Profile));
                    }
                }
                if route == Route::Home && ui.button("Refresh").clicked() {
                    actions.push(UiAction::Navigate(Route::Home));
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let endpoints = self.api.endpoints();
                    ui.label(
                        egui::RichText::new(endpoints.content.as_str())
                            .small()
                            .color(egui::Color32::GRAY),
                    )
                    .on_hover_text(format!(
                        "content: {}\nauth: {}\notp: {}",
                        endpoints.content, endpoints.auth, endpoints.otp
                    ));
                });
            });

            if let Some(message) = self.info_banner.clone() {
                let mut dismiss = false;
                egui::Frame::group(ui.style())
                    .fill(ui.visuals().extreme_bg_color)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(message.as_str());
                            if ui.button("Dismiss").clicked() {
                                dismiss = true;
                            }
                        });
                    });
                if dismiss {
                    self.info_banner = None;
                }
            }
        });

        let user_info = self.store.user_info();
        egui::CentralPanel::default().show(ctx, |ui| match &mut self.view {
            ViewState::Landing(form) => ui::landing::render(ui, form, &mut actions),
            ViewState::Register(form) => ui::register::render(ui, form, &mut actions),
            ViewState::ForgotPassword(state) => ui::reset::render(ui, state, &mut actions),
            ViewState::Home(home) => ui::feed::render(ui, home, &mut actions),
            ViewState::Profile => ui::profile::render(ui, user_info.as_ref(), &mut actions),
        });

        for action in actions {
            self.dispatch(action);
        }
    }
}

/// Formats an API timestamp for display, falling back to the raw string.
fn format_timestamp(ts: &str) -> String {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.with_timezone(&Local).format("%d %b %Y, %H:%M").to_string())
        .unwrap_or_else(|_| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unparseable_timestamps_are_shown_verbatim() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn rfc3339_timestamps_are_reformatted() {
        let formatted = format_timestamp("2024-03-05T10:15:00Z");
        assert!(formatted.contains("2024"));
        assert!(formatted.contains("Mar"));
    }
}
