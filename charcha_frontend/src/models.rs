use std::fmt;

use serde::{Deserialize, Serialize};

pub type PostId = i64;
pub type CommentId = i64;
pub type UserId = i64;

/// Purpose tag sent with every OTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtpType {
    PasswordReset,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, rename = "isactive")]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub email_verified: Option<bool>,
    #[serde(default)]
    pub phone_verified: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl UserInfo {
    pub fn display_name(&self) -> String {
        join_name(self.first_name.as_deref(), self.last_name.as_deref())
    }
}

/// The slice of user info returned by the OTP and reset mutations.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpUserInfo {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SendOtpPayload {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub channels: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpPayload {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_info: Option<OtpUserInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordPayload {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_info: Option<OtpUserInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_info: Option<UserInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub bio: String,
}

/// Listing price. The API has served both numbers and preformatted strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(f64),
    Text(String),
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Amount(value) if value.fract() == 0.0 => write!(f, "₹{value:.0}"),
            Price::Amount(value) => write!(f, "₹{value:.2}"),
            Price::Text(text) => write!(f, "₹{text}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: i64,
    #[serde(default)]
    pub media_type: Option<String>,
    pub media_url: String,
    #[serde(default)]
    pub media_order: Option<i32>,
    #[serde(default)]
    pub media_size: Option<i64>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

impl Media {
    pub fn is_image(&self) -> bool {
        self.media_type.as_deref() == Some("image")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    #[serde(rename = "userId")]
    pub author_id: UserId,
    #[serde(default, rename = "userFirstName")]
    pub author_first_name: Option<String>,
    #[serde(default, rename = "userLastName")]
    pub author_last_name: Option<String>,
    #[serde(default, rename = "userRole")]
    pub author_role: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub map_location: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub status: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub comment_count: i64,
    #[serde(default)]
    pub media: Vec<Media>,
}

impl Post {
    pub fn author_name(&self) -> String {
        join_name(self.author_first_name.as_deref(), self.author_last_name.as_deref())
    }

    /// First media item, when it is an image.
    pub fn cover_image(&self) -> Option<&Media> {
        self.media.first().filter(|media| media.is_image())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    /// Not part of the wire shape; filled in from the query that fetched it.
    #[serde(default)]
    pub post_id: PostId,
    /// `None` for top-level comments.
    #[serde(default)]
    pub parent_comment_id: Option<CommentId>,
    #[serde(rename = "userId")]
    pub author_id: UserId,
    #[serde(default, rename = "userFirstName")]
    pub author_first_name: Option<String>,
    #[serde(default, rename = "userLastName")]
    pub author_last_name: Option<String>,
    #[serde(default, rename = "userRole")]
    pub author_role: Option<String>,
    #[serde(rename = "comment")]
    pub text: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub added_at: Option<String>,
    #[serde(default)]
    pub commented_at: Option<String>,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn author_name(&self) -> String {
        join_name(self.author_first_name.as_deref(), self.author_last_name.as_deref())
    }

    /// Stamps the owning post on this comment and links replies to it.
    pub fn attach_to(&mut self, post_id: PostId) {
        self.post_id = post_id;
        for reply in &mut self.replies {
            reply.parent_comment_id = Some(self.id);
            reply.attach_to(post_id);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeCounter {
    pub id: i64,
    pub like_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PostLikePayload {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub post: Option<LikeCounter>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CommentLikePayload {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub comment: Option<LikeCounter>,
}

/// Common view over the like/unlike mutation payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeReceipt {
    pub success: bool,
    pub message: String,
    pub like_count: Option<i64>,
}

impl From<PostLikePayload> for LikeReceipt {
    fn from(payload: PostLikePayload) -> Self {
        Self {
            success: payload.success,
            message: payload.message,
            like_count: payload.post.map(|counter| counter.like_count),
        }
    }
}

impl From<CommentLikePayload> for LikeReceipt {
    fn from(payload: CommentLikePayload) -> Self {
        Self {
            success: payload.success,
            message: payload.message,
            like_count: payload.comment.map(|counter| counter.like_count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedComment {
    pub id: CommentId,
    #[serde(default)]
    pub parent_comment_id: Option<CommentId>,
    pub comment: String,
    #[serde(default)]
    pub added_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreateCommentPayload {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub comment: Option<CreatedComment>,
}

fn join_name(first: Option<&str>, last: Option<&str>) -> String {
    let name = [first.unwrap_or_default(), last.unwrap_or_default()]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        "Unknown".to_string()
    } else {
        name
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Comment>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Comment>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn post_parses_search_result_shape() {
        let raw = json!({
            "id": 42,
            "userId": 3,
            "userFirstName": "Asha",
            "userLastName": "Verma",
            "userRole": "agent",
            "title": "2BHK near metro",
            "content": "Spacious flat",
            "visibility": "public",
            "propertyType": "apartment",
            "location": "Pune",
            "mapLocation": null,
            "price": 4500000,
            "status": "active",
            "createdAt": "2024-05-01T10:00:00Z",
            "likeCount": 10,
            "commentCount": 2,
            "media": [
                { "id": 1, "mediaType": "image", "mediaUrl": "http://cdn/a.jpg", "mediaOrder": 0,
                  "mediaSize": 2048, "caption": null, "uploadedAt": "2024-05-01T10:00:00Z" }
            ]
        });
        let post: Post = serde_json::from_value(raw).unwrap();
        assert_eq!(post.author_name(), "Asha Verma");
        assert_eq!(post.like_count, 10);
        assert_eq!(post.price, Some(Price::Amount(4_500_000.0)));
        assert_eq!(post.price.as_ref().map(ToString::to_string), Some("₹4500000".to_string()));
        assert_eq!(post.cover_image().map(|m| m.media_url.as_str()), Some("http://cdn/a.jpg"));
    }

    #[test]
    fn comment_tree_links_replies_to_parent() {
        let raw = json!({
            "id": 5,
            "userId": 9,
            "userFirstName": "Ravi",
            "userLastName": null,
            "userRole": "buyer",
            "comment": "Still available?",
            "likeCount": 1,
            "replies": [
                { "id": 6, "userId": 3, "comment": "Yes", "likeCount": 0, "replies": null }
            ]
        });
        let mut comment: Comment = serde_json::from_value(raw).unwrap();
        comment.attach_to(7);
        assert_eq!(comment.post_id, 7);
        assert_eq!(comment.parent_comment_id, None);
        assert_eq!(comment.author_name(), "Ravi");
        assert_eq!(comment.replies[0].parent_comment_id, Some(5));
        assert_eq!(comment.replies[0].post_id, 7);
        assert!(comment.replies[0].replies.is_empty());
    }

    #[test]
    fn like_payloads_collapse_into_receipts() {
        let post: PostLikePayload = serde_json::from_value(json!({
            "success": true, "message": "liked", "post": { "id": 42, "likeCount": 11 }
        }))
        .unwrap();
        assert_eq!(
            LikeReceipt::from(post),
            LikeReceipt {
                success: true,
                message: "liked".into(),
                like_count: Some(11),
            }
        );

        let comment: CommentLikePayload = serde_json::from_value(json!({
            "success": false, "message": "already liked", "comment": null
        }))
        .unwrap();
        assert_eq!(LikeReceipt::from(comment).like_count, None);
    }

    #[test]
    fn otp_type_uses_graphql_enum_spelling() {
        assert_eq!(serde_json::to_value(OtpType::PasswordReset).unwrap(), json!("PASSWORD_RESET"));
    }

    #[test]
    fn missing_names_fall_back() {
        assert_eq!(UserInfo::default().display_name(), "Unknown");
    }
}
