//! Login and registration forms.

use std::fmt;

use log::info;

use super::{require, Notice, Outcome, ValidationError};
use crate::api::ApiError;
use crate::models::{CreateUserInput, LoginPayload, UserInfo};

#[derive(Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// What a successful login hands to the session store.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginSuccess {
    pub token: String,
    pub refresh_token: String,
    pub user_info: UserInfo,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    notice: Option<Notice>,
    submitting: bool,
}

impl LoginForm {
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn submit(&mut self) -> Result<LoginRequest, ValidationError> {
        if self.submitting {
            return Err(ValidationError::RequestPending);
        }
        self.notice = None;
        let email = self.email.trim();
        let checked = require(email, "email").and_then(|()| {
            if self.password.is_empty() {
                Err(ValidationError::EmptyField("password"))
            } else {
                Ok(())
            }
        });
        if let Err(err) = checked {
            self.notice = Some(Notice::Error(err.to_string()));
            return Err(err);
        }
        self.submitting = true;
        Ok(LoginRequest {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }

    pub fn apply(&mut self, result: Result<LoginPayload, ApiError>) -> Option<LoginSuccess> {
        self.submitting = false;
        match Outcome::from(result) {
            Outcome::Accepted(payload) => {
                let LoginPayload {
                    token,
                    refresh_token,
                    message,
                    user_info,
                    ..
                } = payload;
                let Some(token) = token else {
                    self.notice = Some(Notice::Error(
                        "Login succeeded but no token was issued.".to_string(),
                    ));
                    return None;
                };
                info!("login accepted");
                self.password.clear();
                self.notice = Some(Notice::Success(message.clone()));
                Some(LoginSuccess {
                    token,
                    refresh_token: refresh_token.unwrap_or_default(),
                    user_info: user_info.unwrap_or_default(),
                    message,
                })
            }
            other => {
                self.notice = other
                    .failure_message("Login failed. Please try again.")
                    .map(Notice::Error);
                None
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
    pub bio: String,
    notice: Option<Notice>,
    submitting: bool,
}

impl RegisterForm {
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn submit(&mut self) -> Result<CreateUserInput, ValidationError> {
        if self.submitting {
            return Err(ValidationError::RequestPending);
        }
        self.notice = None;
        match self.validate() {
            Ok(input) => {
                self.submitting = true;
                Ok(input)
            }
            Err(err) => {
                self.notice = Some(Notice::Error(err.to_string()));
                Err(err)
            }
        }
    }

    /// `createUser` returns the user directly; there is no success flag.
    pub fn apply(&mut self, result: Result<UserInfo, ApiError>) -> Option<UserInfo> {
        self.submitting = false;
        match result {
            Ok(user) => {
                info!("registration accepted");
                self.password.clear();
                Some(user)
            }
            Err(err) => {
                self.notice = Some(Notice::Error(err.to_string()));
                None
            }
        }
    }

    fn validate(&self) -> Result<CreateUserInput, ValidationError> {
        let latitude = parse_coordinate(&self.latitude)?;
        let longitude = parse_coordinate(&self.longitude)?;
        let fields = [
            (&self.first_name, "first name"),
            (&self.last_name, "last name"),
            (&self.email, "email"),
            (&self.phone, "phone number"),
            (&self.role, "role"),
            (&self.address, "address"),
            (&self.bio, "bio"),
        ];
        for (value, name) in fields {
            require(value, name)?;
        }
        if self.password.is_empty() {
            return Err(ValidationError::EmptyField("password"));
        }
        Ok(CreateUserInput {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            password: self.password.clone(),
            role: self.role.trim().to_string(),
            address: self.address.trim().to_string(),
            latitude,
            longitude,
            bio: self.bio.trim().to_string(),
        })
    }
}

fn parse_coordinate(raw: &str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(ValidationError::InvalidCoordinates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled_register_form() -> RegisterForm {
        RegisterForm {
            first_name: "Asha".into(),
            last_name: "Verma".into(),
            email: "a@b.com".into(),
            phone: "9999999999".into(),
            password: "Secret1".into(),
            role: "agent".into(),
            address: "Baner, Pune".into(),
            latitude: "18.559".into(),
            longitude: " 73.786 ".into(),
            bio: "Residential listings".into(),
            ..RegisterForm::default()
        }
    }

    #[test]
    fn login_requires_both_fields() {
        let mut form = LoginForm {
            email: "a@b.com".into(),
            ..LoginForm::default()
        };
        assert_eq!(form.submit(), Err(ValidationError::EmptyField("password")));
        assert!(!form.is_submitting());
        assert_eq!(
            form.notice(),
            Some(&Notice::Error("Please enter your password.".into()))
        );
    }

    #[test]
    fn login_success_hands_over_tokens() {
        let mut form = LoginForm {
            email: " a@b.com ".into(),
            password: "Secret1".into(),
            ..LoginForm::default()
        };
        let request = form.submit().unwrap();
        assert_eq!(request.email, "a@b.com");
        let success = form
            .apply(Ok(LoginPayload {
                success: true,
                token: Some("tok".into()),
                refresh_token: Some("refresh".into()),
                message: "Welcome back".into(),
                user_info: Some(UserInfo {
                    id: Some(3),
                    ..UserInfo::default()
                }),
            }))
            .unwrap();
        assert_eq!(success.token, "tok");
        assert_eq!(success.refresh_token, "refresh");
        assert_eq!(success.user_info.id, Some(3));
        assert!(form.password.is_empty());
    }

    #[test]
    fn login_rejection_falls_back_to_generic_message() {
        let mut form = LoginForm {
            email: "a@b.com".into(),
            password: "wrong".into(),
            ..LoginForm::default()
        };
        form.submit().unwrap();
        let outcome = form.apply(Ok(LoginPayload {
            success: false,
            ..LoginPayload::default()
        }));
        assert_eq!(outcome, None);
        assert_eq!(
            form.notice(),
            Some(&Notice::Error("Login failed. Please try again.".into()))
        );
        assert_eq!(form.password, "wrong");
    }

    #[test]
    fn registration_parses_coordinates() {
        let mut form = filled_register_form();
        let input = form.submit().unwrap();
        assert_eq!(input.latitude, 18.559);
        assert_eq!(input.longitude, 73.786);
        assert!(form.is_submitting());
    }

    #[test]
    fn registration_rejects_bad_coordinates() {
        let mut form = RegisterForm {
            latitude: "north".into(),
            ..filled_register_form()
        };
        assert_eq!(form.submit(), Err(ValidationError::InvalidCoordinates));
        assert_eq!(
            form.notice(),
            Some(&Notice::Error("Please enter valid latitude and longitude".into()))
        );
    }

    #[test]
    fn registration_requires_every_field() {
        let mut form = RegisterForm {
            bio: "  ".into(),
            ..filled_register_form()
        };
        assert_eq!(form.submit(), Err(ValidationError::EmptyField("bio")));
    }

    #[test]
    fn registration_error_is_surfaced() {
        let mut form = filled_register_form();
        form.submit().unwrap();
        assert_eq!(
            form.apply(Err(ApiError::Graphql("Email already registered".into()))),
            None
        );
        assert_eq!(
            form.notice(),
            Some(&Notice::Error("Email already registered".into()))
        );
        assert!(!form.is_submitting());
    }
}
