//! Client Error Types

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid response body: {message}")]
    Decode { message: String, body: String },

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

/// Coarse classification of an [`ApiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Timeout,
    Transport,
    Status,
    Decode,
    InvalidUrl,
}

impl ApiError {
    pub fn status(status: StatusCode, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    pub fn decode(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            body: body.into(),
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Transport(e) if e.is_timeout() => ApiErrorKind::Timeout,
            ApiError::Transport(_) => ApiErrorKind::Transport,
            ApiError::Status { .. } => ApiErrorKind::Status,
            ApiError::Decode { .. } => ApiErrorKind::Decode,
            ApiError::InvalidUrl(_) => ApiErrorKind::InvalidUrl,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind() == ApiErrorKind::Timeout
    }

    /// Upstream response body, when the server sent one
    pub fn response_body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } | ApiError::Decode { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
