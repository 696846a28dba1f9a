//! HTTP client module for the peer REST API.
//!
//! # Architecture
//!
//! - [`FabricHttpClient`] - High-level client, one async method per peer capability
//! - `HttpClient` - Low-level transport: request building, retries, wire logging
//! - [`HttpError`] - Raw transport failures
//! - [`resolve`] - Folds an [`HttpError`] into a [`FabricError`](crate::error::FabricError)
//! - Wire envelopes ([`OkResponse`], [`JsonRpcResponse`], [`ErrorBody`])
//!
//! # Features
//!
//! - **Idempotent-only retries**: GET requests are retried with exponential
//!   backoff; POST and DELETE are sent exactly once
//! - **Latency tracking**: round-trip time of the most recent request
//! - **Wire logging**: request and response bodies logged at debug level when
//!   the client is built with `verbose` set
//!
//! # Error Handling
//!
//! Every public method of [`FabricHttpClient`] returns
//! `Result<T, FabricError>`; callers never see a raw `reqwest` error.

mod error;
mod fabric_http_client;
mod http_client;
mod resolver;
mod types;

pub use error::HttpError;
pub use fabric_http_client::FabricHttpClient;
pub use http_client::TransportOptions;
pub use resolver::{resolve, resolve_rpc_error};
pub use types::{ErrorBody, JsonRpcResponse, OkResponse, RpcError, RpcResult};
