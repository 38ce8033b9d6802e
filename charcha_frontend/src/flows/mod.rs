//! UI-toolkit independent state machines.
//!
//! Each flow validates input locally and hands back a typed request for the
//! caller to dispatch; responses are fed back in once the request finishes.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::api::ApiError;

pub mod auth;
pub mod feed;
pub mod reset;

/// Local precondition failures, raised before any request is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter your {0}.")]
    EmptyField(&'static str),
    #[error("Please enter and confirm your new password.")]
    PasswordMissing,
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("Please enter valid latitude and longitude")]
    InvalidCoordinates,
    #[error("A request is already in progress.")]
    RequestPending,
    #[error("This step is not active.")]
    WrongStep,
}

/// Inline alert shown above a form. Error and success are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Success(String),
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Notice::Error(text) | Notice::Success(text) => text,
        }
    }
}

/// Result of a remote call as seen by a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Accepted(T),
    /// `success: false` with the server-supplied message.
    Rejected(String),
    Failed(ApiError),
}

impl<T> Outcome<T> {
    /// Message to show the user for a non-accepted outcome.
    pub fn failure_message(&self, fallback: &str) -> Option<String> {
        match self {
            Outcome::Accepted(_) => None,
            Outcome::Rejected(message) if message.trim().is_empty() => Some(fallback.to_string()),
            Outcome::Rejected(message) => Some(message.clone()),
            Outcome::Failed(err) => Some(err.to_string()),
        }
    }
}

/// Identity stamped on requests so responses for a discarded flow can be dropped.
pub fn next_flow_id() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

pub(crate) fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(())
    }
}

/// Payloads that carry the API's `success`/`message` acknowledgement pair.
pub trait Acknowledgement {
    fn success(&self) -> bool;
    fn message(&self) -> &str;
}

macro_rules! acknowledgement {
    ($($payload:ty),+ $(,)?) => {
        $(
            impl Acknowledgement for $payload {
                fn success(&self) -> bool {
                    self.success
                }

                fn message(&self) -> &str {
                    &self.message
                }
            }
        )+
    };
}

acknowledgement!(
    crate::models::SendOtpPayload,
    crate::models::VerifyOtpPayload,
    crate::models::ResetPasswordPayload,
    crate::models::LoginPayload,
    crate::models::CreateCommentPayload,
    crate::models::LikeReceipt,
);

impl<T: Acknowledgement> From<Result<T, ApiError>> for Outcome<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(payload) if payload.success() => Outcome::Accepted(payload),
            Ok(payload) => Outcome::Rejected(payload.message().to_string()),
            Err(err) => Outcome::Failed(err),
        }
    }
}
