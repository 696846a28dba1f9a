//! Async client for a permissioned-blockchain peer's REST API.
//!
//! - [`http::FabricHttpClient`] - one async call per peer capability
//! - [`chaincode::ChaincodeWorkflow`] - submit a deploy/invoke and await its transaction
//! - [`error::FabricError`] - the single error type every call resolves to

pub mod chaincode;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod log;
pub mod models;

pub use crate::chaincode::{ChaincodeWorkflow, SettlePolicy};
pub use crate::error::{ErrorCode, ErrorKind, FabricError};
pub use crate::http::FabricHttpClient;
