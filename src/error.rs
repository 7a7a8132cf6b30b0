//! Error types for the member client

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error body returned by the server on any non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Coarse classification of an HTTP error status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 401, credentials were cleared
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// Any other 4xx
    Client,
    /// 5xx and anything outside the 4xx range
    Server,
}

/// A non-2xx response from the server
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HttpError {
    status: u16,
    message: String,
    body: Option<ErrorBody>,
}

impl HttpError {
    /// Build a classified error from the status line and the (optional) parsed body.
    ///
    /// The server supplied message wins; otherwise the message is
    /// `HTTP <status>: <statusText>`, or just `HTTP <status>` when the
    /// status line carried no reason.
    pub fn new(status: u16, status_text: &str, body: Option<ErrorBody>) -> Self {
        let message = match &body {
            Some(b) if !b.error.is_empty() => b.error.clone(),
            _ if status_text.is_empty() => format!("HTTP {status}"),
            _ => format!("HTTP {status}: {status_text}"),
        };
        Self { status, message, body }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn body(&self) -> Option<&ErrorBody> {
        self.body.as_ref()
    }

    pub fn category(&self) -> ErrorCategory {
        match self.status {
            401 => ErrorCategory::Unauthorized,
            403 => ErrorCategory::Forbidden,
            404 => ErrorCategory::NotFound,
            400..=499 => ErrorCategory::Client,
            _ => ErrorCategory::Server,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.category() == ErrorCategory::Unauthorized
    }

    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }
}

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never completed (DNS, refused connection, timeout)
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// HTTP status of a classified error, `None` for everything else
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http(e) => Some(e.status()),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    pub fn as_http(&self) -> Option<&HttpError> {
        match self {
            ClientError::Http(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
