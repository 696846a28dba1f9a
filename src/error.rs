//! The single error type surfaced by every client operation.
//!
//! Whatever went wrong (a malformed argument, a dead peer, a peer-side
//! rejection, an undecodable body) a caller receives exactly one
//! [`FabricError`]. The transport failure that produced it, if any, is kept as
//! [`FabricError::cause`] and reported through [`std::error::Error::source`].

use std::fmt;

use thiserror::Error;

use crate::http::HttpError;

/// Transport-level failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    /// The peer could not be reached (DNS, connection refused, TLS handshake).
    Unreachable,
    /// The request did not complete within the configured timeout.
    Timeout,
    /// The connection broke mid-request, or the body could not be read.
    Connection,
}

/// Fine-grained error code carried by a [`FabricError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The input was rejected before any request was sent.
    Validation,
    /// The request never produced an HTTP response.
    Transport(TransportFailure),
    /// The peer answered with a structured error body.
    Peer,
    /// The peer answered with a non-success status and a body that is not an
    /// error document.
    UnexpectedStatus(u16),
    /// A success response did not match the expected schema.
    Decode,
    /// The operation was cancelled by the caller before it completed.
    Cancelled,
    /// Anything else.
    Unknown,
}

/// Coarse error taxonomy, for callers that only care about the failure family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    Peer,
    Decode,
    Cancelled,
    Unknown,
}

impl ErrorCode {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::Validation => ErrorKind::Validation,
            ErrorCode::Transport(_) => ErrorKind::Transport,
            ErrorCode::Peer => ErrorKind::Peer,
            ErrorCode::Decode => ErrorKind::Decode,
            ErrorCode::Cancelled => ErrorKind::Cancelled,
            ErrorCode::UnexpectedStatus(_) | ErrorCode::Unknown => ErrorKind::Unknown,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Validation => write!(f, "validation error"),
            ErrorCode::Transport(TransportFailure::Unreachable) => write!(f, "peer unreachable"),
            ErrorCode::Transport(TransportFailure::Timeout) => write!(f, "request timed out"),
            ErrorCode::Transport(TransportFailure::Connection) => write!(f, "connection error"),
            ErrorCode::Peer => write!(f, "peer error"),
            ErrorCode::UnexpectedStatus(status) => write!(f, "unexpected status {}", status),
            ErrorCode::Decode => write!(f, "decode error"),
            ErrorCode::Cancelled => write!(f, "cancelled"),
            ErrorCode::Unknown => write!(f, "unknown error"),
        }
    }
}

#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct FabricError {
    pub code: ErrorCode,
    pub message: String,
    /// The raw transport failure, kept for diagnostics.
    #[source]
    pub cause: Option<HttpError>,
}

impl FabricError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(code: ErrorCode, message: impl Into<String>, cause: HttpError) -> Self {
        Self {
            code,
            message: message.into(),
            cause: Some(cause),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorCode::Cancelled, "operation cancelled before completion")
    }

    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    /// HTTP status of the underlying response, when the peer answered.
    pub fn http_status(&self) -> Option<u16> {
        self.cause.as_ref().and_then(|c| c.status()).map(|s| s.as_u16())
    }

    pub fn is_not_found(&self) -> bool {
        self.http_status() == Some(404)
    }
}
