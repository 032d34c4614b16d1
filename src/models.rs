use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Embedded list keys used by the coordinator and pool collection responses.
pub const BLOCK_LIST: &str = "blockList";
pub const TRANSACTION_LIST: &str = "transactionList";
pub const MINER_LIST: &str = "minerList";

/// Previous-hash placeholder carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub hash: String,
    #[serde(default)]
    pub previous_hash: String,
    #[serde(default)]
    pub nonce: u64,
    pub timestamp: i64,
    #[serde(default)]
    pub data: Vec<Transaction>,
}

impl Block {
    /// `None` for the genesis block or when the node omitted the link.
    pub fn previous(&self) -> Option<&str> {
        match self.previous_hash.as_str() {
            "" | GENESIS_PREVIOUS_HASH => None,
            hash => Some(hash),
        }
    }

    /// Earliest transaction timestamp inside the block.
    pub fn first_transaction_timestamp(&self) -> Option<i64> {
        self.data.iter().map(|tx| tx.timestamp).min()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: String,
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
    #[serde(default)]
    pub timestamp: i64,
}

/// Body of `POST /transactions`. Id and timestamp are assigned by the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
}

/// Jackson writes `java.sql.Timestamp` as epoch millis unless told otherwise,
/// so both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MinerTimestamp {
    Millis(i64),
    Iso(String),
}

impl MinerTimestamp {
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            MinerTimestamp::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            MinerTimestamp::Iso(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .or_else(|_| {
                    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                        .map(|naive| naive.and_utc())
                })
                .ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Miner {
    pub public_key: String,
    #[serde(default)]
    pub last_timestamp: Option<MinerTimestamp>,
    #[serde(default)]
    pub gpu_miner: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u64,
    #[serde(default)]
    pub number: u64,
}

/// HATEOAS collection wrapper. `_links` is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PagedEnvelope<T> {
    #[serde(rename = "_embedded")]
    pub embedded: Option<HashMap<String, Vec<T>>>,
    pub page: Option<PageInfo>,
}

impl<T> Default for PagedEnvelope<T> {
    fn default() -> Self {
        Self {
            embedded: None,
            page: None,
        }
    }
}

impl<T> PagedEnvelope<T> {
    pub fn items(&self, key: &str) -> &[T] {
        self.embedded
            .as_ref()
            .and_then(|embedded| embedded.get(key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn into_items(mut self, key: &str) -> Vec<T> {
        self.embedded
            .as_mut()
            .and_then(|embedded| embedded.remove(key))
            .unwrap_or_default()
    }

    /// Falls back to the embedded length when the node sent no `page` block.
    pub fn total_elements(&self, key: &str) -> u64 {
        match &self.page {
            Some(page) => page.total_elements,
            None => self.items(key).len() as u64,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EmbeddedMessage {
    message: Option<String>,
}

/// `/blocks/status` answers either `{message}` or `{_embedded: {message}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    message: Option<String>,
    #[serde(rename = "_embedded")]
    embedded: Option<EmbeddedMessage>,
}

impl StatusResponse {
    pub fn message(&self) -> Option<&str> {
        self.embedded
            .as_ref()
            .and_then(|embedded| embedded.message.as_deref())
            .or(self.message.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountResponse {
    pub count: Option<u64>,
}

/// Body of `POST /blocks/result`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningResult {
    pub hash: String,
    pub previous_hash: String,
    pub nonce: u64,
    pub timestamp: i64,
    pub data: serde_json::Value,
    pub index: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyUpdate {
    pub difficulty: String,
}
