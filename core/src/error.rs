//! Error types for the API client.
//!
//! # Design
//! A dispatched request rejects for exactly one of three reasons: the
//! transport timed out, the transport failed, or the response body could not
//! be decoded. HTTP status codes are never errors at this layer; any status
//! resolves and interpreting it is the caller's concern.
//!
//! `Encode` is the odd one out: it is raised by `ApiRequest::build` before
//! anything is sent, so it has no `FailureReason`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by `ApiRequest::build`, `ApiRequest::parse` and
/// `ApiRequest::fetch`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The transport's timeout fired before any response arrived.
    #[error("request timed out")]
    Timeout,

    /// Network failure, refused connection and similar transport problems.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not JSON, the converter chain failed on it, or
    /// it did not fit the body type declared for its status code.
    #[error("failed to decode response body: {0}")]
    Json(String),

    /// The request payload could not be serialized or encoded.
    #[error("failed to encode request payload: {0}")]
    Encode(String),
}

impl FetchError {
    /// The rejection reason of a dispatched request; `None` for `Encode`.
    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            FetchError::Timeout => Some(FailureReason::Timeout),
            FetchError::Transport(_) => Some(FailureReason::Error),
            FetchError::Json(_) => Some(FailureReason::Json),
            FetchError::Encode(_) => None,
        }
    }
}

/// Why an in-flight request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureReason {
    Timeout,
    Error,
    Json,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureReason::Timeout => "timeout",
            FailureReason::Error => "error",
            FailureReason::Json => "json",
        })
    }
}

/// Failures a `Transport` may report instead of a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("timed out")]
    Timeout,

    #[error("{0}")]
    Error(String),
}

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => FetchError::Timeout,
            TransportError::Error(msg) => FetchError::Transport(msg),
        }
    }
}
