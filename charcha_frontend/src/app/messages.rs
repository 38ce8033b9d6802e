use std::time::Instant;

use log::{debug, warn};

use crate::api::ApiError;
use crate::flows::feed::{LikeRequest, ReplyRequest};
use crate::flows::reset::ResetResponse;
use crate::models::{
    Comment, CreateCommentPayload, LikeReceipt, LoginPayload, Post, PostId, UserInfo,
};

use super::state::{Route, UiAction, ViewState};
use super::CharchaApp;

pub enum AppMessage {
    Reset {
        flow_id: u64,
        response: ResetResponse,
    },
    LoginFinished(Result<LoginPayload, ApiError>),
    RegisterFinished(Result<UserInfo, ApiError>),
    FeedLoaded {
        feed_id: u64,
        result: Result<Vec<Post>, ApiError>,
    },
    LikeFinished {
        feed_id: u64,
        request: LikeRequest,
        result: Result<LikeReceipt, ApiError>,
    },
    CommentsLoaded {
        feed_id: u64,
        post_id: PostId,
        result: Result<Vec<Comment>, ApiError>,
    },
    ReplyFinished {
        feed_id: u64,
        request: ReplyRequest,
        result: Result<CreateCommentPayload, ApiError>,
    },
}

/// Drains finished requests. Results addressed to a view that has since been
/// replaced are dropped rather than applied to its successor.
pub fn process_messages(app: &mut CharchaApp) {
    while let Ok(message) = app.rx.try_recv() {
        let mut follow_up = None;
        match message {
            AppMessage::Reset { flow_id, response } => match &mut app.view {
                ViewState::ForgotPassword(state) if state.flow.id() == flow_id => {
                    state.flow.apply(response, Instant::now());
                }
                _ => debug!("dropping reset response for discarded flow {flow_id}"),
            },
            AppMessage::LoginFinished(result) => match &mut app.view {
                ViewState::Landing(form) => {
                    if let Some(success) = form.apply(result) {
                        app.complete_login(success);
                    }
                }
                _ => debug!("dropping login response; login view is gone"),
            },
            AppMessage::RegisterFinished(result) => match &mut app.view {
                ViewState::Register(form) => {
                    if let Some(user) = form.apply(result) {
                        app.complete_registration(user);
                    }
                }
                _ => debug!("dropping registration response; form is gone"),
            },
            AppMessage::FeedLoaded { feed_id, result } => match &mut app.view {
                ViewState::Home(home) if home.feed.id() == feed_id => home.feed.apply_feed(result),
                _ => debug!("dropping posts for discarded feed {feed_id}"),
            },
            AppMessage::LikeFinished {
                feed_id,
                request,
                result,
            } => match &mut app.view {
                ViewState::Home(home) if home.feed.id() == feed_id => {
                    home.feed.apply_like(request, result)
                }
                _ => debug!("dropping like response for discarded feed {feed_id}"),
            },
            AppMessage::CommentsLoaded {
                feed_id,
                post_id,
                result,
            } => match &mut app.view {
                ViewState::Home(home) if home.feed.id() == feed_id => {
                    follow_up = home
                        .feed
                        .apply_comments(post_id, result)
                        .map(|request| UiAction::LoadComments { feed_id, request });
                }
                _ => debug!("dropping comments for discarded feed {feed_id}"),
            },
            AppMessage::ReplyFinished {
                feed_id,
                request,
                result,
            } => match &mut app.view {
                ViewState::Home(home) if home.feed.id() == feed_id => {
                    let parent = request.parent_comment_id;
                    follow_up = home
                        .feed
                        .apply_reply(&request, result)
                        .map(|request| UiAction::LoadComments { feed_id, request });
                    // The draft is only cleared once the reply is saved.
                    let saved = home.feed.reply_draft(parent).is_empty();
                    if saved && home.replying_to == Some(parent) {
                        home.replying_to = None;
                        home.reply_input.clear();
                    }
                }
                _ => warn!(
                    "reply to comment {} finished after leaving the feed",
                    request.parent_comment_id
                ),
            },
        }
        if let Some(action) = follow_up {
            app.dispatch(action);
        }
    }
}

impl CharchaApp {
    pub(super) fn complete_login(&mut self, success: crate::flows::auth::LoginSuccess) {
        if let Err(err) = self
            .store
            .save_login(&success.token, &success.refresh_token, &success.user_info)
        {
            warn!("failed to persist login: {err}");
            self.info_banner = Some(format!(
                "Logged in, but the session could not be saved: {err}"
            ));
        }
        self.api.set_token(Some(success.token));
        self.user_id = success.user_info.id.unwrap_or(self.config.user_id);
        self.dispatch(UiAction::Navigate(Route::Home));
    }

    pub(super) fn complete_registration(&mut self, user: UserInfo) {
        if let Err(err) = self.store.save_user_info(&user) {
            warn!("failed to persist registered user: {err}");
            self.info_banner = Some(format!(
                "Registered, but the profile could not be saved: {err}"
            ));
        }
        self.user_id = user.id.unwrap_or(self.config.user_id);
        self.dispatch(UiAction::Navigate(Route::Home));
    }
}
