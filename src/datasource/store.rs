//! File-backed document store.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::datasource::{DocumentStore, find_document, upsert_document};
use crate::error::{Error, Result};

/// Document store keeping each collection in `<root>/<collection>.json`.
///
/// A collection file holds a JSON array of documents, the shape produced by
/// `mongoexport --jsonArray`. A missing file is an empty collection.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    /// Open a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Access the store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{collection}.json"))
    }

    fn read_collection(&self, collection: &str) -> Result<Vec<Value>> {
        let path = self.collection_path(collection);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "collection file missing");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };
        let parsed: Value = serde_json::from_str(&text)?;
        match parsed {
            Value::Array(documents) => Ok(documents),
            _ => Err(Error::Store {
                message: format!("{} is not a JSON array", path.display()),
            }),
        }
    }

    /// Insert a document, replacing any document with the same `_id`.
    pub fn upsert(&self, collection: &str, document: impl Serialize) -> Result<()> {
        let document = serde_json::to_value(document)?;
        let mut documents = self.read_collection(collection)?;
        upsert_document(&mut documents, document);

        fs::create_dir_all(&self.root)?;
        let path = self.collection_path(collection);
        let mut writer = BufWriter::new(fs::File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, &documents)?;
        writer.flush()?;
        debug!(path = %path.display(), documents = documents.len(), "collection written");
        Ok(())
    }
}

impl DocumentStore for JsonDirStore {
    fn find(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let documents = self.read_collection(collection)?;
        Ok(find_document(&documents, id).cloned())
    }

    fn first(&self, collection: &str) -> Result<Option<Value>> {
        Ok(self.read_collection(collection)?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_collection_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonDirStore::new(dir.path());
        assert!(store.find("csv", "ul_sinr").unwrap().is_none());
        assert!(store.first("csv").unwrap().is_none());
    }

    #[test]
    fn upsert_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonDirStore::new(dir.path().join("store"));
        store
            .upsert("csv", json!({"_id": "ul_mcs", "data": []}))
            .unwrap();
        store
            .upsert("csv", json!({"_id": "ul_mcs", "data": [{"unix_epoch": 1}]}))
            .unwrap();

        let reopened = JsonDirStore::new(dir.path().join("store"));
        let document = reopened.find("csv", "ul_mcs").unwrap().unwrap();
        assert_eq!(document["data"][0]["unix_epoch"], json!(1));
        let raw = std::fs::read_to_string(dir.path().join("store/csv.json")).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn rejects_non_array_collection() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("csv.json"), "{}").unwrap();
        let store = JsonDirStore::new(dir.path());
        assert!(matches!(store.first("csv"), Err(Error::Store { .. })));
    }
}
