//! Chaincode workflows that span more than one request.
//!
//! The peer acknowledges a deploy or invoke before it commits the resulting
//! transaction. [`ChaincodeWorkflow`] turns "submit, wait, look up" into one
//! cancellable async call, with the wait governed by a [`SettlePolicy`].

mod policy;
mod workflow;

pub use policy::{DEFAULT_SETTLE_DELAY, SettlePolicy};
pub use workflow::ChaincodeWorkflow;
