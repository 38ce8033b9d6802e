use std::sync::mpsc::Sender;
use std::thread;

use eframe::egui;
use log::error;

use crate::api::ApiClient;
use crate::flows::auth::LoginRequest;
use crate::flows::feed::{
    CommentsRequest, FeedRequest, LikeAction, LikeRequest, LikeTarget, ReplyRequest,
};
use crate::flows::reset::{ResetRequest, ResetResponse};
use crate::models::{CreateUserInput, LikeReceipt, OtpType};

use super::messages::AppMessage;

/// Channel back to the UI thread. Sending also wakes egui so the result is
/// processed without waiting for input.
#[derive(Clone)]
pub struct Outbox {
    tx: Sender<AppMessage>,
    ctx: egui::Context,
}

impl Outbox {
    pub fn new(tx: Sender<AppMessage>, ctx: egui::Context) -> Self {
        Self { tx, ctx }
    }

    fn send(&self, message: AppMessage, label: &str) {
        if self.tx.send(message).is_err() {
            error!("failed to send {label} message");
            return;
        }
        self.ctx.request_repaint();
    }
}

pub fn run_reset(client: ApiClient, outbox: Outbox, flow_id: u64, request: ResetRequest) {
    thread::spawn(move || {
        let response = match request {
            ResetRequest::SendCode { email } => {
                ResetResponse::CodeSent(client.send_otp(&email, OtpType::PasswordReset))
            }
            ResetRequest::VerifyCode { email, otp_code } => ResetResponse::CodeVerified(
                client.verify_otp(&email, &otp_code, OtpType::PasswordReset),
            ),
            ResetRequest::Reset {
                email,
                otp_code,
                new_password,
                confirm_password,
            } => ResetResponse::PasswordReset(client.reset_password(
                &email,
                &otp_code,
                &new_password,
                &confirm_password,
            )),
        };
        outbox.send(AppMessage::Reset { flow_id, response }, "Reset");
    });
}

pub fn login(client: ApiClient, outbox: Outbox, request: LoginRequest) {
    thread::spawn(move || {
        let result = client.login(&request.email, &request.password);
        outbox.send(AppMessage::LoginFinished(result), "LoginFinished");
    });
}

pub fn register(client: ApiClient, outbox: Outbox, input: CreateUserInput) {
    thread::spawn(move || {
        let result = client.create_user(&input);
        outbox.send(AppMessage::RegisterFinished(result), "RegisterFinished");
    });
}

pub fn load_feed(client: ApiClient, outbox: Outbox, feed_id: u64, request: FeedRequest) {
    thread::spawn(move || {
        let result = client.search_posts(request.page, request.limit);
        outbox.send(AppMessage::FeedLoaded { feed_id, result }, "FeedLoaded");
    });
}

pub fn toggle_like(client: ApiClient, outbox: Outbox, feed_id: u64, request: LikeRequest) {
    thread::spawn(move || {
        let user_id = request.user_id;
        let result = match (request.target, request.action) {
            (LikeTarget::Post(id), LikeAction::Like) => {
                client.like_post(id, user_id).map(LikeReceipt::from)
            }
            (LikeTarget::Post(id), LikeAction::Unlike) => {
                client.unlike_post(id, user_id).map(LikeReceipt::from)
            }
            (LikeTarget::Comment(id), LikeAction::Like) => {
                client.like_comment(id, user_id).map(LikeReceipt::from)
            }
            (LikeTarget::Comment(id), LikeAction::Unlike) => {
                client.unlike_comment(id, user_id).map(LikeReceipt::from)
            }
        };
        outbox.send(
            AppMessage::LikeFinished {
                feed_id,
                request,
                result,
            },
            "LikeFinished",
        );
    });
}

pub fn load_comments(client: ApiClient, outbox: Outbox, feed_id: u64, request: CommentsRequest) {
    thread::spawn(move || {
        let result = client.post_comments(request.post_id);
        outbox.send(
            AppMessage::CommentsLoaded {
                feed_id,
                post_id: request.post_id,
                result,
            },
            "CommentsLoaded",
        );
    });
}

pub fn create_reply(client: ApiClient, outbox: Outbox, feed_id: u64, request: ReplyRequest) {
    thread::spawn(move || {
        let result = client.create_comment(
            request.post_id,
            request.user_id,
            &request.text,
            request.parent_comment_id,
        );
        outbox.send(
            AppMessage::ReplyFinished {
                feed_id,
                request,
                result,
            },
            "ReplyFinished",
        );
    });
}
