//! Unified application error model and mapping helpers.
//! This module provides a common error enum used across the client engine
//! (backend calls, identity provider, payment gateway, image host, forms),
//! along with mappers to HTTP status codes and notification severities.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::notify::NoticeLevel;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    Validation { code: String, message: String },
    Auth { code: String, message: String },
    Forbidden { code: String, message: String },
    NotFound { code: String, message: String },
    Payment { code: String, message: String },
    Upload { code: String, message: String },
    Service { code: String, message: String },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::Validation { code, .. }
            | AppError::Auth { code, .. }
            | AppError::Forbidden { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Payment { code, .. }
            | AppError::Upload { code, .. }
            | AppError::Service { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Validation { message, .. }
            | AppError::Auth { message, .. }
            | AppError::Forbidden { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Payment { message, .. }
            | AppError::Upload { message, .. }
            | AppError::Service { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn validation<S: Into<String>>(code: S, msg: S) -> Self { AppError::Validation { code: code.into(), message: msg.into() } }
    pub fn auth<S: Into<String>>(code: S, msg: S) -> Self { AppError::Auth { code: code.into(), message: msg.into() } }
    pub fn forbidden<S: Into<String>>(code: S, msg: S) -> Self { AppError::Forbidden { code: code.into(), message: msg.into() } }
    pub fn not_found<S: Into<String>>(code: S, msg: S) -> Self { AppError::NotFound { code: code.into(), message: msg.into() } }
    pub fn payment<S: Into<String>>(code: S, msg: S) -> Self { AppError::Payment { code: code.into(), message: msg.into() } }
    pub fn upload<S: Into<String>>(code: S, msg: S) -> Self { AppError::Upload { code: code.into(), message: msg.into() } }
    pub fn service<S: Into<String>>(code: S, msg: S) -> Self { AppError::Service { code: code.into(), message: msg.into() } }
    pub fn internal<S: Into<String>>(code: S, msg: S) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    /// Map a backend HTTP status onto the error taxonomy.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 => AppError::Auth { code: "unauthorized".into(), message: body },
            403 => AppError::Forbidden { code: "forbidden".into(), message: body },
            404 => AppError::NotFound { code: "not_found".into(), message: body },
            400..=499 => AppError::Validation { code: "bad_request".into(), message: body },
            _ => AppError::Service { code: "server_error".into(), message: body },
        }
    }

    /// Map to the HTTP status code this error corresponds to.
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::Validation { .. } => 400,
            AppError::Auth { .. } => 401,
            AppError::Forbidden { .. } => 403,
            AppError::NotFound { .. } => 404,
            AppError::Payment { .. } => 402,
            AppError::Upload { .. } => 502,
            AppError::Service { .. } => 503,
            AppError::Internal { .. } => 500,
        }
    }

    /// Transient failures are surfaced as a dismissible notification and the
    /// user re-triggers the action; nothing is retried automatically.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Service { .. } | AppError::Payment { .. } | AppError::Upload { .. })
    }

    /// Severity a host UI should use when surfacing this error as a notice.
    pub fn notice_level(&self) -> NoticeLevel {
        match self {
            AppError::Validation { .. } => NoticeLevel::Warning,
            AppError::Auth { .. } | AppError::Forbidden { .. } => NoticeLevel::Warning,
            AppError::NotFound { .. } => NoticeLevel::Error,
            AppError::Payment { .. } | AppError::Upload { .. } => NoticeLevel::Error,
            AppError::Service { .. } | AppError::Internal { .. } => NoticeLevel::Error,
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
        // Default mapping: treat as Internal unless downcasted elsewhere
        AppError::Internal { code: "internal_error".into(), message: err.to_string() }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let code = if err.is_timeout() {
            "timeout"
        } else if err.is_connect() {
            "connect_error"
        } else if err.is_decode() {
            "decode_error"
        } else {
            "network_error"
        };
        AppError::Service { code: code.into(), message: err.to_string() }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
