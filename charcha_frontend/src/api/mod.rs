use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, CACHE_CONTROL};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::{
    Comment, CommentId, CommentLikePayload, CreateCommentPayload, CreateUserInput, LoginPayload,
    OtpType, Post, PostId, PostLikePayload, ResetPasswordPayload, SendOtpPayload, UserId,
    UserInfo, VerifyOtpPayload,
};

pub mod documents;

/// Transport-level failure of a GraphQL request.
///
/// Application-level rejections (`success: false`) are not errors at this
/// layer; they come back as ordinary payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Server responded with HTTP {0}")]
    Status(u16),
    #[error("{0}")]
    Graphql(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("Response did not include `{0}`")]
    MissingData(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// The three logical GraphQL services the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Content,
    Auth,
    Otp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub content: String,
    pub auth: String,
    pub otp: String,
}

impl Endpoints {
    pub fn new(
        content: impl Into<String>,
        auth: impl Into<String>,
        otp: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            content: sanitize_base_url(content.into())?,
            auth: sanitize_base_url(auth.into())?,
            otp: sanitize_base_url(otp.into())?,
        })
    }

    pub fn url(&self, service: Service) -> &str {
        match service {
            Service::Content => &self.content,
            Service::Auth => &self.auth,
            Service::Otp => &self.otp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPolicy {
    Default,
    /// Always hit the server, bypassing any intermediate response cache.
    NetworkOnly,
}

#[derive(Clone)]
pub struct ApiClient {
    endpoints: Endpoints,
    client: Client,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            endpoints,
            client,
            token: None,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Bearer token relayed on every request. The client never issues tokens itself.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn send_otp(&self, email: &str, kind: OtpType) -> Result<SendOtpPayload, ApiError> {
        self.execute(
            Service::Otp,
            FetchPolicy::Default,
            documents::SEND_OTP,
            "SendVerificationOTP",
            "sendOtp",
            json!({ "email": email, "type": kind }),
        )
    }

    pub fn verify_otp(
        &self,
        email: &str,
        otp_code: &str,
        kind: OtpType,
    ) -> Result<VerifyOtpPayload, ApiError> {
        self.execute(
            Service::Otp,
            FetchPolicy::Default,
            documents::VERIFY_OTP,
            "VerifyPasswordResetOTP",
            "verifyOtp",
            json!({ "email": email, "otpCode": otp_code, "type": kind }),
        )
    }

    pub fn reset_password(
        &self,
        email: &str,
        otp_code: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<ResetPasswordPayload, ApiError> {
        self.execute(
            Service::Otp,
            FetchPolicy::Default,
            documents::RESET_PASSWORD,
            "ResetPassword",
            "resetPassword",
            json!({
                "email": email,
                "otpCode": otp_code,
                "newPassword": new_password,
                "confirmPassword": confirm_password,
            }),
        )
    }

    pub fn login(&self, email: &str, password: &str) -> Result<LoginPayload, ApiError> {
        self.execute(
            Service::Auth,
            FetchPolicy::Default,
            documents::LOGIN,
            "Login",
            "login",
            json!({ "email": email, "password": password }),
        )
    }

    pub fn create_user(&self, input: &CreateUserInput) -> Result<UserInfo, ApiError> {
        let variables =
            serde_json::to_value(input).map_err(|err| ApiError::Decode(err.to_string()))?;
        self.execute(
            Service::Auth,
            FetchPolicy::Default,
            documents::CREATE_USER,
            "CreateUser",
            "createUser",
            variables,
        )
    }

    pub fn search_posts(&self, page: u32, limit: u32) -> Result<Vec<Post>, ApiError> {
        self.execute(
            Service::Content,
            FetchPolicy::NetworkOnly,
            documents::SEARCH_POSTS,
            "SearchPosts",
            "searchPosts",
            json!({ "page": page, "limit": limit }),
        )
    }

    pub fn post_comments(&self, post_id: PostId) -> Result<Vec<Comment>, ApiError> {
        self.execute(
            Service::Content,
            FetchPolicy::NetworkOnly,
            documents::POST_COMMENTS,
            "PostComments",
            "postComments",
            json!({ "postId": post_id }),
        )
    }

    pub fn like_post(&self, post_id: PostId, user_id: UserId) -> Result<PostLikePayload, ApiError> {
        self.execute(
            Service::Content,
            FetchPolicy::Default,
            documents::LIKE_POST,
            "LikePost",
            "likePost",
            json!({ "postId": post_id, "userId": user_id }),
        )
    }

    pub fn unlike_post(
        &self,
        post_id: PostId,
        user_id: UserId,
    ) -> Result<PostLikePayload, ApiError> {
        self.execute(
            Service::Content,
            FetchPolicy::Default,
            documents::UNLIKE_POST,
            "UnlikePost",
            "unlikePost",
            json!({ "postId": post_id, "userId": user_id }),
        )
    }

    pub fn like_comment(
        &self,
        comment_id: CommentId,
        user_id: UserId,
    ) -> Result<CommentLikePayload, ApiError> {
        self.execute(
            Service::Content,
            FetchPolicy::Default,
            documents::LIKE_COMMENT,
            "LikeComment",
            "likeComment",
            json!({ "commentId": comment_id, "userId": user_id }),
        )
    }

    pub fn unlike_comment(
        &self,
        comment_id: CommentId,
        user_id: UserId,
    ) -> Result<CommentLikePayload, ApiError> {
        self.execute(
            Service::Content,
            FetchPolicy::Default,
            documents::UNLIKE_COMMENT,
            "UnlikeComment",
            "unlikeComment",
            json!({ "commentId": comment_id, "userId": user_id }),
        )
    }

    pub fn create_comment(
        &self,
        post_id: PostId,
        user_id: UserId,
        comment: &str,
        parent_comment_id: CommentId,
    ) -> Result<CreateCommentPayload, ApiError> {
        self.execute(
            Service::Content,
            FetchPolicy::Default,
            documents::CREATE_COMMENT,
            "CreateComment",
            "createComment",
            json!({
                "postId": post_id,
                "userId": user_id,
                "comment": comment,
                "parentCommentId": parent_comment_id,
            }),
        )
    }

    fn execute<T: DeserializeOwned>(
        &self,
        service: Service,
        policy: FetchPolicy,
        document: &str,
        operation: &str,
        field: &str,
        variables: Value,
    ) -> Result<T, ApiError> {
        let url = self.endpoints.url(service);
        debug!("graphql {operation} -> {url}");
        let body = json!({
            "query": document,
            "operationName": operation,
            "variables": variables,
        });
        let mut request = self.client.post(url).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if policy == FetchPolicy::NetworkOnly {
            request = request.header(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        }
        let response = request.send()?;
        let status = response.status();
        let raw = response.text()?;
        if !status.is_success() {
            return Err(match graphql_errors(&raw) {
                Some(message) => ApiError::Graphql(message),
                None => ApiError::Status(status.as_u16()),
            });
        }
        decode_envelope(&raw, field)
    }
}

#[derive(Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorEntry>,
}

#[derive(Deserialize)]
struct GraphqlErrorEntry {
    message: String,
}

/// Extracts `data.<field>` from a GraphQL response body.
pub(crate) fn decode_envelope<T: DeserializeOwned>(raw: &str, field: &str) -> Result<T, ApiError> {
    let envelope: GraphqlResponse =
        serde_json::from_str(raw).map_err(|err| ApiError::Decode(err.to_string()))?;
    if let Some(message) = join_errors(&envelope.errors) {
        return Err(ApiError::Graphql(message));
    }
    let value = envelope
        .data
        .and_then(|mut data| data.get_mut(field).map(Value::take))
        .filter(|value| !value.is_null())
        .ok_or_else(|| ApiError::MissingData(field.to_string()))?;
    serde_json::from_value(value).map_err(|err| ApiError::Decode(format!("{field}: {err}")))
}

fn graphql_errors(raw: &str) -> Option<String> {
    let envelope: GraphqlResponse = serde_json::from_str(raw).ok()?;
    join_errors(&envelope.errors)
}

fn join_errors(errors: &[GraphqlErrorEntry]) -> Option<String> {
    if errors.is_empty() {
        return None;
    }
    Some(
        errors
            .iter()
            .map(|entry| entry.message.as_str())
            .collect::<Vec<_>>()
            .join("; "),
    )
}

pub(crate) fn sanitize_base_url(mut base: String) -> Result<String> {
    base = base.trim().to_string();
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    while base.ends_with('/') {
        base.pop();
    }
    Url::parse(&base).with_context(|| format!("invalid endpoint URL: {base}"))?;
    Ok(base)
}
