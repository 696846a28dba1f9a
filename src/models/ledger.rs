use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    #[serde(default)]
    pub seconds: i64,
    #[serde(default)]
    pub nanos: i32,
}

impl Timestamp {
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, u32::try_from(self.nanos).ok()?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[serde(alias = "PENDING")]
    Pending,
    #[serde(alias = "COMMITTED")]
    Committed,
    #[serde(alias = "FAILED")]
    Failed,
    #[serde(other)]
    Unknown,
}

impl TransactionStatus {
    /// Committed and failed transactions will not change any more.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Committed | TransactionStatus::Failed)
    }
}

fn committed() -> TransactionStatus {
    TransactionStatus::Committed
}

/// A transaction as recorded by the peer.
///
/// Peers that only serve ledger contents omit `status`; anything they return
/// is committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "uuid", alias = "txid")]
    pub id: String,
    #[serde(default = "committed")]
    pub status: TransactionStatus,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<serde_json::Value>,
    #[serde(rename = "chaincodeID", default, skip_serializing_if = "Option::is_none")]
    pub chaincode_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    #[serde(default)]
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(rename = "errorCode", default)]
    pub error_code: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonHashData {
    #[serde(rename = "localLedgerCommitTimestamp", default, skip_serializing_if = "Option::is_none")]
    pub local_ledger_commit_timestamp: Option<Timestamp>,
    #[serde(rename = "transactionResult", default)]
    pub transaction_results: Vec<TransactionResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "proposerID", default, skip_serializing_if = "Option::is_none")]
    pub proposer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(rename = "stateHash", default, skip_serializing_if = "Option::is_none")]
    pub state_hash: Option<String>,
    #[serde(rename = "previousBlockHash", default, skip_serializing_if = "Option::is_none")]
    pub previous_block_hash: Option<String>,
    #[serde(rename = "nonHashData", default, skip_serializing_if = "Option::is_none")]
    pub non_hash_data: Option<NonHashData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockchainInfo {
    pub height: u64,
    #[serde(rename = "currentBlockHash")]
    pub current_block_hash: String,
    #[serde(rename = "previousBlockHash", default, skip_serializing_if = "Option::is_none")]
    pub previous_block_hash: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeerType {
    Validator,
    NonValidator,
    /// Also what any unrecognized type decodes to.
    #[default]
    #[serde(other)]
    Undefined,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerId {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerEndpoint {
    #[serde(rename = "ID")]
    pub id: PeerId,
    pub address: String,
    #[serde(rename = "type", default)]
    pub peer_type: PeerType,
    #[serde(rename = "pkiID", default, skip_serializing_if = "Option::is_none")]
    pub pki_id: Option<String>,
}
