//! Feed state: the post page, like overlays and per-post comment panels.
//!
//! Overlays only ever change from a server response. Nothing here guesses
//! a count locally.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use super::{next_flow_id, Outcome};
use crate::api::ApiError;
use crate::models::{
    Comment, CommentId, CreateCommentPayload, LikeReceipt, Post, PostId, UserId,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum FeedStatus {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<Post>),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeTarget {
    Post(PostId),
    Comment(CommentId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    Like,
    Unlike,
}

/// Liked flag and displayed count as last confirmed by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Engagement {
    pub liked: bool,
    pub like_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedRequest {
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeRequest {
    pub target: LikeTarget,
    pub action: LikeAction,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentsRequest {
    pub post_id: PostId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRequest {
    pub post_id: PostId,
    pub parent_comment_id: CommentId,
    pub user_id: UserId,
    pub text: String,
}

#[derive(Debug)]
pub struct FeedState {
    id: u64,
    user_id: UserId,
    page: u32,
    limit: u32,
    status: FeedStatus,
    post_overlay: HashMap<PostId, Engagement>,
    comment_overlay: HashMap<CommentId, Engagement>,
    likes_in_flight: HashSet<LikeTarget>,
    // A missing entry means "never fetched"; an empty vec means "fetched, none".
    comments: HashMap<PostId, Vec<Comment>>,
    comments_loading: HashSet<PostId>,
    // Posts that gained a reply while their fetch was already in flight.
    stale_comments: HashSet<PostId>,
    reply_drafts: HashMap<CommentId, String>,
    replies_in_flight: HashSet<CommentId>,
    error: Option<String>,
}

impl FeedState {
    pub fn new(user_id: UserId, page: u32, limit: u32) -> Self {
        Self {
            id: next_flow_id(),
            user_id,
            page,
            limit,
            status: FeedStatus::Idle,
            post_overlay: HashMap::new(),
            comment_overlay: HashMap::new(),
            likes_in_flight: HashSet::new(),
            comments: HashMap::new(),
            comments_loading: HashSet::new(),
            stale_comments: HashSet::new(),
            reply_drafts: HashMap::new(),
            replies_in_flight: HashSet::new(),
            error: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    pub fn posts(&self) -> &[Post] {
        match &self.status {
            FeedStatus::Loaded(posts) => posts,
            _ => &[],
        }
    }

    /// Last like/reply failure, shown as a dismissable alert.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    // Feed loader

    pub fn load(&mut self) -> Option<FeedRequest> {
        if self.status == FeedStatus::Loading {
            return None;
        }
        self.status = FeedStatus::Loading;
        Some(FeedRequest {
            page: self.page,
            limit: self.limit,
        })
    }

    pub fn apply_feed(&mut self, result: Result<Vec<Post>, ApiError>) {
        self.status = match result {
            Ok(posts) => {
                debug!("feed {}: loaded {} posts", self.id, posts.len());
                FeedStatus::Loaded(posts)
            }
            Err(err) => {
                warn!("feed {}: failed to load posts: {}", self.id, err);
                FeedStatus::Failed(err.to_string())
            }
        };
    }

    // Likes

    /// Overlay for `target`, or the server-supplied count when nothing has been confirmed yet.
    pub fn engagement(&self, target: LikeTarget, server_count: i64) -> Engagement {
        let overlay = match target {
            LikeTarget::Post(id) => self.post_overlay.get(&id),
            LikeTarget::Comment(id) => self.comment_overlay.get(&id),
        };
        overlay.copied().unwrap_or(Engagement {
            liked: false,
            like_count: server_count,
        })
    }

    pub fn is_like_pending(&self, target: LikeTarget) -> bool {
        self.likes_in_flight.contains(&target)
    }

    /// Starts a like or unlike for `target`. Returns `None` while that same
    /// target already has a request in flight; other targets stay usable.
    pub fn toggle_like(&mut self, target: LikeTarget) -> Option<LikeRequest> {
        if self.likes_in_flight.contains(&target) {
            return None;
        }
        let liked = self.engagement(target, 0).liked;
        let action = if liked {
            LikeAction::Unlike
        } else {
            LikeAction::Like
        };
        self.likes_in_flight.insert(target);
        Some(LikeRequest {
            target,
            action,
            user_id: self.user_id,
        })
    }

    pub fn apply_like(&mut self, request: LikeRequest, result: Result<LikeReceipt, ApiError>) {
        self.likes_in_flight.remove(&request.target);
        match Outcome::from(result) {
            Outcome::Accepted(LikeReceipt {
                like_count: Some(like_count),
                ..
            }) => {
                let engagement = Engagement {
                    liked: request.action == LikeAction::Like,
                    like_count,
                };
                match request.target {
                    LikeTarget::Post(id) => self.post_overlay.insert(id, engagement),
                    LikeTarget::Comment(id) => self.comment_overlay.insert(id, engagement),
                };
            }
            Outcome::Accepted(_) => {
                warn!("feed {}: like response for {:?} had no count", self.id, request.target);
            }
            other => {
                let message = other.failure_message("Could not update like.");
                warn!("feed {}: like on {:?} failed: {:?}", self.id, request.target, message);
                self.error = message;
            }
        }
    }

    // Comment panel

    /// `None` means the post's comments have never been fetched.
    pub fn comments(&self, post_id: PostId) -> Option<&[Comment]> {
        self.comments.get(&post_id).map(Vec::as_slice)
    }

    pub fn is_loading_comments(&self, post_id: PostId) -> bool {
        self.comments_loading.contains(&post_id)
    }

    /// Fetches comments the first time a post is expanded.
    pub fn expand(&mut self, post_id: PostId) -> Option<CommentsRequest> {
        if self.comments.contains_key(&post_id) {
            return None;
        }
        self.fetch_comments(post_id)
    }

    /// Stores a fetched comment list. Returns a follow-up fetch when a reply
    /// was saved after this fetch had already been sent.
    pub fn apply_comments(
        &mut self,
        post_id: PostId,
        result: Result<Vec<Comment>, ApiError>,
    ) -> Option<CommentsRequest> {
        self.comments_loading.remove(&post_id);
        let comments = match result {
            Ok(mut comments) => {
                for comment in &mut comments {
                    comment.attach_to(post_id);
                }
                comments
            }
            Err(err) => {
                warn!("feed {}: comments for post {} failed: {}", self.id, post_id, err);
                Vec::new()
            }
        };
        self.comments.insert(post_id, comments);
        if self.stale_comments.remove(&post_id) {
            debug!("feed {}: refetching comments for post {}", self.id, post_id);
            return self.fetch_comments(post_id);
        }
        None
    }

    pub fn reply_draft_mut(&mut self, comment_id: CommentId) -> &mut String {
        self.reply_drafts.entry(comment_id).or_default()
    }

    pub fn reply_draft(&self, comment_id: CommentId) -> &str {
        self.reply_drafts
            .get(&comment_id)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn is_reply_pending(&self, comment_id: CommentId) -> bool {
        self.replies_in_flight.contains(&comment_id)
    }

    /// Whitespace-only text is a no-op: nothing is dispatched and the draft is left alone.
    pub fn reply(
        &mut self,
        parent_comment_id: CommentId,
        post_id: PostId,
        text: &str,
    ) -> Option<ReplyRequest> {
        if text.trim().is_empty() || self.replies_in_flight.contains(&parent_comment_id) {
            return None;
        }
        self.replies_in_flight.insert(parent_comment_id);
        Some(ReplyRequest {
            post_id,
            parent_comment_id,
            user_id: self.user_id,
            text: text.to_string(),
        })
    }

    /// On success clears the draft and asks for an authoritative refetch of the post's comments.
    pub fn apply_reply(
        &mut self,
        request: &ReplyRequest,
        result: Result<CreateCommentPayload, ApiError>,
    ) -> Option<CommentsRequest> {
        self.replies_in_flight.remove(&request.parent_comment_id);
        match Outcome::from(result) {
            Outcome::Accepted(_) => {
                self.reply_drafts.remove(&request.parent_comment_id);
                if self.comments_loading.contains(&request.post_id) {
                    self.stale_comments.insert(request.post_id);
                    return None;
                }
                self.fetch_comments(request.post_id)
            }
            other => {
                let message = other.failure_message("Could not post reply.");
                warn!(
                    "feed {}: reply to comment {} failed: {:?}",
                    self.id, request.parent_comment_id, message
                );
                self.error = message;
                None
            }
        }
    }

    fn fetch_comments(&mut self, post_id: PostId) -> Option<CommentsRequest> {
        if !self.comments_loading.insert(post_id) {
            return None;
        }
        Some(CommentsRequest { post_id })
    }
}
