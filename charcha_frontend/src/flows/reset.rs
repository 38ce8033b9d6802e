//! Password reset over OTP: email, then code, then the new password.

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info};

use super::{next_flow_id, require, Notice, Outcome, ValidationError};
use crate::api::ApiError;
use crate::models::{ResetPasswordPayload, SendOtpPayload, VerifyOtpPayload};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResetStep {
    #[default]
    Email,
    Otp,
    NewPassword,
}

impl ResetStep {
    fn next(self) -> Option<ResetStep> {
        match self {
            ResetStep::Email => Some(ResetStep::Otp),
            ResetStep::Otp => Some(ResetStep::NewPassword),
            ResetStep::NewPassword => None,
        }
    }
}

impl fmt::Display for ResetStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResetStep::Email => "email",
            ResetStep::Otp => "otp",
            ResetStep::NewPassword => "new password",
        };
        f.write_str(name)
    }
}

/// What the user has submitted so far. Only the flow moves `step`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetSession {
    step: ResetStep,
    pub email: String,
    pub otp_code: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ResetSession {
    pub fn step(&self) -> ResetStep {
        self.step
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ResetRequest {
    SendCode {
        email: String,
    },
    VerifyCode {
        email: String,
        otp_code: String,
    },
    Reset {
        email: String,
        otp_code: String,
        new_password: String,
        confirm_password: String,
    },
}

impl ResetRequest {
    pub fn step(&self) -> ResetStep {
        match self {
            ResetRequest::SendCode { .. } => ResetStep::Email,
            ResetRequest::VerifyCode { .. } => ResetStep::Otp,
            ResetRequest::Reset { .. } => ResetStep::NewPassword,
        }
    }
}

// Keeps codes and passwords out of logs.
impl fmt::Debug for ResetRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResetRequest::SendCode { email } => {
                f.debug_struct("SendCode").field("email", email).finish()
            }
            ResetRequest::VerifyCode { email, .. } => f
                .debug_struct("VerifyCode")
                .field("email", email)
                .finish_non_exhaustive(),
            ResetRequest::Reset { email, .. } => f
                .debug_struct("Reset")
                .field("email", email)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResetResponse {
    CodeSent(Result<SendOtpPayload, ApiError>),
    CodeVerified(Result<VerifyOtpPayload, ApiError>),
    PasswordReset(Result<ResetPasswordPayload, ApiError>),
}

impl ResetResponse {
    fn step(&self) -> ResetStep {
        match self {
            ResetResponse::CodeSent(_) => ResetStep::Email,
            ResetResponse::CodeVerified(_) => ResetStep::Otp,
            ResetResponse::PasswordReset(_) => ResetStep::NewPassword,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetEvent {
    Idle,
    Advanced(ResetStep),
    /// Password changed; the caller should navigate to the home view.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Advance {
    To(ResetStep),
    Finish,
}

#[derive(Debug, Clone, Copy)]
struct PendingAdvance {
    advance: Advance,
    due: Instant,
}

#[derive(Debug)]
pub struct ResetFlow {
    id: u64,
    session: ResetSession,
    notice: Option<Notice>,
    in_flight: bool,
    pending: Option<PendingAdvance>,
    delay: Duration,
    completed: bool,
}

impl ResetFlow {
    /// `delay` is how long the success message stays up before the step changes.
    pub fn new(delay: Duration) -> Self {
        Self {
            id: next_flow_id(),
            session: ResetSession::default(),
            notice: None,
            in_flight: false,
            pending: None,
            delay,
            completed: false,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn step(&self) -> ResetStep {
        self.session.step
    }

    pub fn session(&self) -> &ResetSession {
        &self.session
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// True while a request is in flight or a step change is pending.
    pub fn is_busy(&self) -> bool {
        self.in_flight || self.pending.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// When the next step change is due, for scheduling a repaint.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|pending| pending.due)
    }

    pub fn submit_email(&mut self, email: &str) -> Result<ResetRequest, ValidationError> {
        self.begin_submit(ResetStep::Email)?;
        let email = email.trim();
        if let Err(err) = require(email, "email") {
            return Err(self.reject(err));
        }
        self.session.email = email.to_string();
        self.in_flight = true;
        Ok(ResetRequest::SendCode {
            email: self.session.email.clone(),
        })
    }

    pub fn submit_otp(&mut self, code: &str) -> Result<ResetRequest, ValidationError> {
        self.begin_submit(ResetStep::Otp)?;
        let code = code.trim();
        if let Err(err) = require(code, "verification code") {
            return Err(self.reject(err));
        }
        self.session.otp_code = code.to_string();
        self.in_flight = true;
        Ok(ResetRequest::VerifyCode {
            email: self.session.email.clone(),
            otp_code: self.session.otp_code.clone(),
        })
    }

    pub fn submit_new_password(
        &mut self,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<ResetRequest, ValidationError> {
        self.begin_submit(ResetStep::NewPassword)?;
        if new_password.is_empty() || confirm_password.is_empty() {
            return Err(self.reject(ValidationError::PasswordMissing));
        }
        if new_password != confirm_password {
            return Err(self.reject(ValidationError::PasswordMismatch));
        }
        self.session.new_password = new_password.to_string();
        self.session.confirm_password = confirm_password.to_string();
        self.in_flight = true;
        Ok(ResetRequest::Reset {
            email: self.session.email.clone(),
            otp_code: self.session.otp_code.clone(),
            new_password: self.session.new_password.clone(),
            confirm_password: self.session.confirm_password.clone(),
        })
    }

    /// Feeds a finished request back in. Responses for a step that is no
    /// longer active are dropped.
    pub fn apply(&mut self, response: ResetResponse, now: Instant) {
        let step = self.session.step;
        if !self.in_flight || response.step() != step {
            debug!("reset flow {}: dropping stale {} response", self.id, response.step());
            return;
        }
        self.in_flight = false;

        let acknowledged = match response {
            ResetResponse::CodeSent(result) => match Outcome::from(result) {
                Outcome::Accepted(payload) => {
                    Ok((code_sent_message(&payload), Advance::To(ResetStep::Otp)))
                }
                other => Err(other.failure_message("OTP request failed.")),
            },
            ResetResponse::CodeVerified(result) => match Outcome::from(result) {
                Outcome::Accepted(payload) => Ok((
                    or_default(payload.message, "Code verified."),
                    Advance::To(ResetStep::NewPassword),
                )),
                other => Err(other.failure_message("OTP verification failed.")),
            },
            ResetResponse::PasswordReset(result) => match Outcome::from(result) {
                Outcome::Accepted(payload) => {
                    Ok((or_default(payload.message, "Password updated."), Advance::Finish))
                }
                other => Err(other.failure_message("Password reset failed.")),
            },
        };

        match acknowledged {
            Ok((success, advance)) => {
                info!("reset flow {}: {} step acknowledged", self.id, step);
                self.notice = Some(Notice::Success(success));
                self.pending = Some(PendingAdvance {
                    advance,
                    due: now + self.delay,
                });
            }
            Err(failure) => {
                let failure = failure.unwrap_or_default();
                info!("reset flow {}: {} step failed: {}", self.id, step, failure);
                self.notice = Some(Notice::Error(failure));
            }
        }
    }

    /// Performs a pending step change once its delay has passed.
    pub fn tick(&mut self, now: Instant) -> ResetEvent {
        let Some(pending) = self.pending else {
            return ResetEvent::Idle;
        };
        if pending.due > now {
            return ResetEvent::Idle;
        }
        self.pending = None;
        match pending.advance {
            Advance::To(step) => {
                debug_assert_eq!(self.session.step.next(), Some(step));
                self.notice = None;
                self.session.step = step;
                ResetEvent::Advanced(step)
            }
            Advance::Finish => {
                self.completed = true;
                ResetEvent::Completed
            }
        }
    }

    fn begin_submit(&mut self, step: ResetStep) -> Result<(), ValidationError> {
        if self.session.step != step {
            return Err(ValidationError::WrongStep);
        }
        if self.is_busy() || self.completed {
            return Err(ValidationError::RequestPending);
        }
        self.notice = None;
        Ok(())
    }

    fn reject(&mut self, err: ValidationError) -> ValidationError {
        self.notice = Some(Notice::Error(err.to_string()));
        err
    }
}

fn code_sent_message(payload: &SendOtpPayload) -> String {
    let message = or_default(payload.message.clone(), "Verification code sent.");
    if payload.channels.is_empty() {
        return message;
    }
    let separator = if message.ends_with('.') { " " } else { ". " };
    format!("{message}{separator}Channels: {}", payload.channels.join(", "))
}

fn or_default(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
