//! Folds transport failures into [`FabricError`].
//!
//! [`resolve`] is the terminal error boundary of the client: it accepts any
//! [`HttpError`] and always returns a [`FabricError`], never panicking and never
//! failing itself. A non-success body that decodes as the peer's error
//! document becomes a [`ErrorCode::Peer`] error carrying the peer's message
//! verbatim. Everything else is classified by failure class, and the original
//! failure is kept as the cause.

use crate::error::{ErrorCode, FabricError, TransportFailure};

use super::error::HttpError;
use super::types::{ErrorBody, RpcError};

pub fn resolve(failure: HttpError) -> FabricError {
    let (code, message) = classify(&failure);
    FabricError::with_cause(code, message, failure)
}

/// A JSON-RPC `error` member returned inside a success response.
pub fn resolve_rpc_error(error: RpcError) -> FabricError {
    let message = match error.data {
        Some(data) if !data.is_empty() => format!("{} ({}): {}", error.message, error.code, data),
        _ => format!("{} ({})", error.message, error.code),
    };
    FabricError::new(ErrorCode::Peer, message)
}

fn classify(failure: &HttpError) -> (ErrorCode, String) {
    match failure {
        HttpError::ServerError { status, body } => match serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(ErrorBody::into_message)
        {
            Some(message) => (ErrorCode::Peer, message),
            None => (
                ErrorCode::UnexpectedStatus(status.as_u16()),
                format!("peer returned {} with an unrecognized body", status),
            ),
        },
        HttpError::RequestFailed(_) | HttpError::MiddlewareError(_) => match failure.transport_error() {
            Some(e) => classify_reqwest(e),
            None => (ErrorCode::Unknown, failure.to_string()),
        },
        HttpError::InvalidResponse { source, .. } => {
            (ErrorCode::Decode, format!("response did not match the expected schema: {}", source))
        },
        HttpError::UrlError(e) => (ErrorCode::Validation, format!("invalid request url: {}", e)),
        HttpError::JsonError(e) => (ErrorCode::Validation, format!("request could not be encoded: {}", e)),
        HttpError::UnsupportedMethod => (ErrorCode::Unknown, failure.to_string()),
    }
}

fn classify_reqwest(e: &reqwest::Error) -> (ErrorCode, String) {
    let failure = if e.is_timeout() {
        TransportFailure::Timeout
    } else if e.is_connect() {
        TransportFailure::Unreachable
    } else {
        TransportFailure::Connection
    };
    (ErrorCode::Transport(failure), e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use reqwest::StatusCode;
    use std::error::Error as _;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn server_error(status: u16, body: &str) -> HttpError {
        HttpError::ServerError {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_structured_body_resolves_to_peer_error() {
        let err = resolve(server_error(401, r#"{"error":"invalid secret"}"#));

        assert_eq!(err.code, ErrorCode::Peer);
        assert_eq!(err.message, "invalid secret");
        assert_eq!(err.http_status(), Some(401));
    }

    #[test]
    fn test_peer_spelling_of_error_key_is_accepted() {
        let err = resolve(server_error(400, r#"{"Error":"Block not found"}"#));

        assert_eq!(err.code, ErrorCode::Peer);
        assert_eq!(err.message, "Block not found");
    }

    #[test]
    fn test_both_error_spellings_prefer_lowercase() {
        let err = resolve(server_error(400, r#"{"Error":"legacy text","error":"current text"}"#));

        assert_eq!(err.code, ErrorCode::Peer);
        assert_eq!(err.message, "current text");
    }

    #[test]
    fn test_unrecognized_bodies_keep_the_cause() {
        for body in ["", "<html>bad gateway</html>", r#"{"message":"nope"}"#, r#"{"error":42}"#, "{"] {
            let err = resolve(server_error(502, body));

            assert_eq!(err.code, ErrorCode::UnexpectedStatus(502), "body: {:?}", body);
            assert_eq!(err.kind(), ErrorKind::Unknown);
            match &err.cause {
                Some(HttpError::ServerError { body: kept, .. }) => assert_eq!(kept, body),
                other => panic!("cause not preserved: {:?}", other),
            }
        }
    }

    #[test]
    fn test_rpc_error_resolves_to_peer_error() {
        let err = resolve_rpc_error(RpcError {
            code: -32003,
            message: "Query failure".to_string(),
            data: Some("Error when querying chaincode".to_string()),
        });

        assert_eq!(err.code, ErrorCode::Peer);
        assert_eq!(err.message, "Query failure (-32003): Error when querying chaincode");
        assert!(err.cause.is_none());
    }

    #[test]
    fn test_invalid_response_is_decode_error() {
        let source = serde_json::from_str::<ErrorBody>("{").unwrap_err();
        let err = resolve(HttpError::InvalidResponse {
            body: "{".to_string(),
            source,
        });

        assert_eq!(err.code, ErrorCode::Decode);
        assert!(err.source().is_some());
    }

    #[tokio::test]
    async fn test_unreachable_peer_is_transport_error() {
        // Nothing listens on the discard port on loopback.
        let failure = reqwest::Client::new()
            .get("http://127.0.0.1:9/chain/blocks/0")
            .send()
            .await
            .unwrap_err();

        let err = resolve(HttpError::RequestFailed(failure));

        assert_eq!(err.code, ErrorCode::Transport(TransportFailure::Unreachable));
        assert!(err.cause.is_some());
    }

    #[tokio::test]
    async fn test_failure_behind_retry_middleware_is_transport_error() {
        let policy = reqwest_retry::policies::ExponentialBackoff::builder().build_with_max_retries(1);
        let client = reqwest_middleware::ClientBuilder::new(reqwest::Client::new())
            .with(reqwest_retry::RetryTransientMiddleware::new_with_policy(policy))
            .build();
        let failure = client.get("http://127.0.0.1:9/chain").send().await.unwrap_err();
        assert!(matches!(failure, reqwest_middleware::Error::Middleware(_)));

        let err = resolve(HttpError::MiddlewareError(failure));

        assert_eq!(err.code, ErrorCode::Transport(TransportFailure::Unreachable));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_slow_peer_is_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&mock_server)
            .await;

        let failure = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap()
            .get(mock_server.uri())
            .send()
            .await
            .unwrap_err();

        let err = resolve(HttpError::RequestFailed(failure));

        assert_eq!(err.code, ErrorCode::Transport(TransportFailure::Timeout));
    }
}
