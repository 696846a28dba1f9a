//! Domain values exchanged with a peer.
//!
//! # Key Types
//!
//! - [`Credential`] - Enrollment id and secret used to register a registrar
//! - [`ChaincodeSpec`] - What chaincode to run, with which constructor call
//! - [`ChaincodeOperation`] - A deploy, invoke or query request
//! - [`ChaincodeOutcome`] - The peer's answer, tagged by the submitted method
//! - [`Transaction`], [`Block`], [`BlockchainInfo`] - Ledger snapshots
//! - [`PeerEndpoint`] - A member of the peer network
//!
//! Credentials and chaincode specs are built by the caller and never mutated
//! afterwards. Ledger values are read-only snapshots fetched on demand.

pub mod chaincode;
pub mod ledger;
pub mod registrar;

pub use chaincode::{
    ChaincodeId, ChaincodeInput, ChaincodeMethod, ChaincodeOperation, ChaincodeOutcome, ChaincodeRuntime,
    ChaincodeSpec, ChaincodeSpecBuilder, TransactionHandle,
};
pub use ledger::{
    Block, BlockchainInfo, NonHashData, PeerEndpoint, PeerId, PeerType, Timestamp, Transaction, TransactionResult,
    TransactionStatus,
};
pub use registrar::Credential;
