//! Unified application error model and mapping helpers.
//! One enum covers the three failure families a page can meet (transport, application envelope
//! failures, client-side validation) plus the statuses the reference backend answers with.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::client::ClientError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    UserInput { code: String, message: String },
    Validation { code: String, message: String },
    Transport { code: String, message: String },
    Application { code: String, message: String },
    NotFound { code: String, message: String },
    Conflict { code: String, message: String },
    Auth { code: String, message: String },
    Internal { code: String, message: String },
}

/// Severity of a transient notification shown after an action settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// A user-displayable message produced by an action. Rendering it is the UI layer's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success<S: Into<String>>(msg: S) -> Self { Self { level: NotificationLevel::Success, message: msg.into() } }
    pub fn info<S: Into<String>>(msg: S) -> Self { Self { level: NotificationLevel::Info, message: msg.into() } }
    pub fn error<S: Into<String>>(msg: S) -> Self { Self { level: NotificationLevel::Error, message: msg.into() } }
}

pub const FALLBACK_MESSAGE: &str = "Something went wrong";

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::UserInput { code, .. }
            | AppError::Validation { code, .. }
            | AppError::Transport { code, .. }
            | AppError::Application { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Conflict { code, .. }
            | AppError::Auth { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::UserInput { message, .. }
            | AppError::Validation { message, .. }
            | AppError::Transport { message, .. }
            | AppError::Application { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Conflict { message, .. }
            | AppError::Auth { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn user<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self { AppError::UserInput { code: code.into(), message: msg.into() } }
    pub fn validation<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self { AppError::Validation { code: code.into(), message: msg.into() } }
    pub fn transport<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self { AppError::Transport { code: code.into(), message: msg.into() } }
    pub fn application<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self { AppError::Application { code: code.into(), message: msg.into() } }
    pub fn not_found<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self { AppError::NotFound { code: code.into(), message: msg.into() } }
    pub fn conflict<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self { AppError::Conflict { code: code.into(), message: msg.into() } }
    pub fn auth<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self { AppError::Auth { code: code.into(), message: msg.into() } }
    pub fn internal<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    /// Map to HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::UserInput { .. } => 400,
            AppError::Validation { .. } => 400,
            AppError::Application { .. } => 200,
            AppError::NotFound { .. } => 404,
            AppError::Conflict { .. } => 409,
            AppError::Auth { .. } => 401,
            AppError::Transport { .. } => 503,
            AppError::Internal { .. } => 500,
        }
    }

    /// Validation failures are caught before a request is built.
    pub fn reached_network(&self) -> bool {
        !matches!(self, AppError::Validation { .. })
    }

    /// The transient message a page shows for this failure.
    pub fn notification(&self) -> Notification {
        let msg = self.message().trim();
        if msg.is_empty() {
            Notification::error(FALLBACK_MESSAGE)
        } else {
            Notification::error(msg)
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal { code: "internal_error".into(), message: err.to_string() }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Url(_) => AppError::Transport { code: "bad_url".into(), message: err.to_string() },
            ClientError::Http(_) => AppError::Transport { code: "transport_error".into(), message: err.to_string() },
            ClientError::Decode(_) => AppError::Transport { code: "decode_error".into(), message: err.to_string() },
        }
    }
}
