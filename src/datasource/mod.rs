//! Ingest boundary and the loaded dataset.
//!
//! Recorded telemetry lives in a document store as one document per metric
//! column (collection `csv`) plus one document holding classified xApp log
//! entries (collection `log`). [`Dataset::load`] reads it once at startup into
//! a read-only snapshot shared by every panel.

mod dataset;
mod labels;
pub mod logfile;
mod store;

pub use dataset::Dataset;
pub use labels::{SchedulingPolicy, classify};
pub use store::JsonDirStore;

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Collection holding one document per metric column.
pub const METRICS_COLLECTION: &str = "csv";

/// Collection holding classified log entries.
pub const LOG_COLLECTION: &str = "log";

/// Id of the log document written by log ingest.
pub const LOG_DOCUMENT_ID: &str = "log_file";

/// One recorded value of a metric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Epoch seconds, used for ordering.
    pub unix_epoch: i64,
    /// `YYYY-MM-DD HH:MM:SS:mmm`.
    pub readable_timestamp: String,
    /// Recorded value; numeric for KPI columns.
    #[serde(default)]
    pub value: Value,
}

/// One classified log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Epoch seconds, used for ordering.
    pub unix_epoch: i64,
    /// `YYYY-MM-DD HH:MM:SS:mmm`.
    pub readable_timestamp: String,
    /// Classifier output text.
    pub class: String,
}

/// Document holding all classified log entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogDocument {
    /// Document id, normally [`LOG_DOCUMENT_ID`].
    #[serde(rename = "_id")]
    pub id: String,
    /// Entries in any order.
    pub entries: Vec<LogRecord>,
}

/// Read access to a document store.
///
/// Documents are returned as raw JSON so that malformed records can be
/// skipped one by one instead of failing the whole document.
pub trait DocumentStore {
    /// Find a document by `_id`.
    fn find(&self, collection: &str, id: &str) -> Result<Option<Value>>;

    /// Return the first document of a collection.
    fn first(&self, collection: &str) -> Result<Option<Value>>;
}

/// In-memory document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, replacing any document with the same `_id`.
    pub fn upsert(&self, collection: &str, document: impl Serialize) -> Result<()> {
        let document = serde_json::to_value(document)?;
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        upsert_document(
            collections.entry(collection.to_string()).or_default(),
            document,
        );
        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    fn find(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(collections
            .get(collection)
            .and_then(|documents| find_document(documents, id))
            .cloned())
    }

    fn first(&self, collection: &str) -> Result<Option<Value>> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.first())
            .cloned())
    }
}

pub(crate) fn find_document<'a>(documents: &'a [Value], id: &str) -> Option<&'a Value> {
    documents
        .iter()
        .find(|document| document.get("_id").and_then(Value::as_str) == Some(id))
}

pub(crate) fn upsert_document(documents: &mut Vec<Value>, document: Value) {
    let id = document.get("_id").cloned();
    match documents
        .iter_mut()
        .find(|existing| id.is_some() && existing.get("_id") == id.as_ref())
    {
        Some(existing) => *existing = document,
        None => documents.push(document),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_store_upserts_by_id() {
        let store = MemoryStore::new();
        store
            .upsert("csv", json!({"_id": "ul_sinr", "data": []}))
            .unwrap();
        store
            .upsert("csv", json!({"_id": "ul_sinr", "data": [1]}))
            .unwrap();
        store
            .upsert("csv", json!({"_id": "ul_mcs", "data": []}))
            .unwrap();

        let found = store.find("csv", "ul_sinr").unwrap().unwrap();
        assert_eq!(found["data"], json!([1]));
        assert_eq!(
            store.first("csv").unwrap().unwrap()["_id"],
            json!("ul_sinr")
        );
        assert!(store.find("csv", "missing").unwrap().is_none());
        assert!(store.first("log").unwrap().is_none());
    }

    #[test]
    fn typed_documents_use_mongo_ids() {
        let document = LogDocument {
            id: LOG_DOCUMENT_ID.to_string(),
            entries: Vec::new(),
        };
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["_id"], json!("log_file"));
    }
}
