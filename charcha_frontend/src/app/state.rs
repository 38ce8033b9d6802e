use std::collections::HashSet;

use crate::flows::auth::{LoginForm, LoginRequest, RegisterForm};
use crate::flows::feed::{CommentsRequest, FeedRequest, FeedState, LikeRequest, ReplyRequest};
use crate::flows::reset::{ResetFlow, ResetRequest};
use crate::models::{CommentId, CreateUserInput, PostId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Register,
    ForgotPassword,
    Home,
    Profile,
}

pub enum ViewState {
    Landing(LoginForm),
    Register(RegisterForm),
    ForgotPassword(ResetState),
    Home(HomeState),
    Profile,
}

impl ViewState {
    pub fn route(&self) -> Route {
        match self {
            ViewState::Landing(_) => Route::Landing,
            ViewState::Register(_) => Route::Register,
            ViewState::ForgotPassword(_) => Route::ForgotPassword,
            ViewState::Home(_) => Route::Home,
            ViewState::Profile => Route::Profile,
        }
    }
}

/// Reset flow plus the text the user is typing for each step.
pub struct ResetState {
    pub flow: ResetFlow,
    pub email_input: String,
    pub otp_input: String,
    pub password_input: String,
    pub confirm_input: String,
}

impl ResetState {
    pub fn new(flow: ResetFlow) -> Self {
        Self {
            flow,
            email_input: String::new(),
            otp_input: String::new(),
            password_input: String::new(),
            confirm_input: String::new(),
        }
    }
}

pub struct HomeState {
    pub feed: FeedState,
    pub open_panels: HashSet<PostId>,
    pub replying_to: Option<CommentId>,
    /// Text of the open reply box; stashed into the feed's drafts when the box moves.
    pub reply_input: String,
}

impl HomeState {
    pub fn new(feed: FeedState) -> Self {
        Self {
            feed,
            open_panels: HashSet::new(),
            replying_to: None,
            reply_input: String::new(),
        }
    }
}

/// Work requested by a view during rendering, carried out once the frame's
/// borrows of the view state are released.
pub enum UiAction {
    Navigate(Route),
    Reset {
        flow_id: u64,
        request: ResetRequest,
    },
    Login(LoginRequest),
    Register(CreateUserInput),
    LoadFeed {
        feed_id: u64,
        request: FeedRequest,
    },
    Like {
        feed_id: u64,
        request: LikeRequest,
    },
    LoadComments {
        feed_id: u64,
        request: CommentsRequest,
    },
    Reply {
        feed_id: u64,
        request: ReplyRequest,
    },
    Logout,
}
