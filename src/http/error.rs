//! Raw transport failures.
//!
//! [`HttpError`] is what the transport layer produces when a request does not
//! yield a decodable success body. It never leaves the crate's public client
//! API on its own: the [resolver](super::resolver) folds every `HttpError`
//! into a [`FabricError`](crate::error::FabricError), keeping the original
//! failure as its cause.

use thiserror::Error;

/// Errors that can occur while talking HTTP to a peer.
///
/// # Error Categories
///
/// - **Network errors**: [`RequestFailed`](HttpError::RequestFailed),
///   [`MiddlewareError`](HttpError::MiddlewareError)
/// - **Peer errors**: [`ServerError`](HttpError::ServerError)
/// - **Client errors**: [`UrlError`](HttpError::UrlError),
///   [`UnsupportedMethod`](HttpError::UnsupportedMethod),
///   [`JsonError`](HttpError::JsonError)
/// - **Response errors**: [`InvalidResponse`](HttpError::InvalidResponse)
#[derive(Debug, Error)]
pub enum HttpError {
    /// The HTTP request failed due to a network or connection error.
    ///
    /// This typically indicates connectivity issues such as:
    /// - Connection refused (peer not running)
    /// - Connection timeout
    /// - DNS resolution failure
    /// - TLS/SSL handshake errors
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// An error occurred in the HTTP middleware layer.
    ///
    /// Only idempotent requests pass through the retry middleware, so this
    /// usually means a GET exhausted its retry attempts.
    #[error("Middleware error: {0}")]
    MiddlewareError(#[from] reqwest_middleware::Error),

    /// The peer returned a non-success HTTP status code.
    ///
    /// The body is kept verbatim; it may or may not match the peer's error
    /// schema.
    #[error("Server error {status}: {body}")]
    ServerError {
        /// The HTTP status code returned by the peer.
        status: reqwest::StatusCode,
        /// The response body, which may contain error details.
        body: String,
    },

    /// A success response whose body did not match the expected schema.
    #[error("Invalid response body: {source}")]
    InvalidResponse {
        /// The raw response body.
        body: String,
        /// The decoding failure.
        source: serde_json::Error,
    },

    /// Failed to parse or construct a URL.
    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    /// The requested HTTP method is not supported.
    ///
    /// Only `GET`, `POST` and `DELETE` are used by the peer API.
    #[error("Unsupported HTTP method")]
    UnsupportedMethod,

    /// Failed to serialize a request body to JSON.
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl HttpError {
    /// The HTTP status carried by this failure, if the peer answered at all.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            HttpError::ServerError { status, .. } => Some(*status),
            _ => self.transport_error().and_then(reqwest::Error::status),
        }
    }

    /// The underlying `reqwest` failure, looking through the retry middleware.
    ///
    /// A GET that fails inside the retry layer comes back as an opaque
    /// middleware error wrapping a `RetryError`, even when no retry was made.
    pub fn transport_error(&self) -> Option<&reqwest::Error> {
        match self {
            HttpError::RequestFailed(e) => Some(e),
            HttpError::MiddlewareError(e) => unwrap_middleware(e),
            _ => None,
        }
    }
}

fn unwrap_middleware(error: &reqwest_middleware::Error) -> Option<&reqwest::Error> {
    match error {
        reqwest_middleware::Error::Reqwest(e) => Some(e),
        reqwest_middleware::Error::Middleware(e) => e.chain().find_map(|cause| {
            if let Some(e) = cause.downcast_ref::<reqwest::Error>() {
                Some(e)
            } else if let Some(inner) = cause.downcast_ref::<reqwest_middleware::Error>() {
                unwrap_middleware(inner)
            } else if let Some(reqwest_retry::RetryError::Error(inner)) =
                cause.downcast_ref::<reqwest_retry::RetryError>()
            {
                unwrap_middleware(inner)
            } else {
                None
            }
        }),
    }
}
