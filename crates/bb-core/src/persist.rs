//! Document persistence: the JSON file format and key-value storage.
//!
//! Loading is stricter than plain deserialization. The top-level shape is
//! checked first so that a file whose lists are missing or of the wrong
//! type is reported as corrupted by field name, before serde looks at
//! individual entries.

use crate::model::Document;
use std::collections::HashMap;

/// Storage key the editor saves under.
pub const STORAGE_KEY: &str = "breadboardCircuit";

/// File name offered for downloads.
pub const DOWNLOAD_FILE_NAME: &str = "circuit.json";

/// The three top-level lists every document must carry.
pub const REQUIRED_FIELDS: [&str; 3] = ["components", "connections", "customConnectionPoints"];

// ─── Errors ──────────────────────────────────────────────────────────────

/// A storage backend failed to read or write.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize circuit: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Why a document could not be loaded. The caller's current document is
/// never touched when one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no saved circuit found")]
    NotFound,
    #[error("invalid circuit file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid circuit file: `{0}` is missing or not a list")]
    Corrupted(&'static str),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

// ─── Format ──────────────────────────────────────────────────────────────

/// Serialize a document as pretty-printed JSON.
pub fn to_json(doc: &Document) -> Result<String, StorageError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Parse and validate document JSON.
pub fn parse(text: &str) -> Result<Document, LoadError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    for field in REQUIRED_FIELDS {
        if !value.get(field).is_some_and(serde_json::Value::is_array) {
            return Err(LoadError::Corrupted(field));
        }
    }
    Ok(serde_json::from_value(value)?)
}

// ─── Storage ─────────────────────────────────────────────────────────────

/// A string key-value store, such as browser local storage.
pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process storage, used by tests and headless sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Serialize `doc` and write it under `key`.
pub fn save(storage: &mut dyn Storage, key: &str, doc: &Document) -> Result<(), StorageError> {
    let json = to_json(doc)?;
    storage.write(key, &json)?;
    log::info!(
        "saved circuit under `{key}` ({} components, {} wires)",
        doc.components.len(),
        doc.connections.len()
    );
    Ok(())
}

/// Read and parse the document stored under `key`.
pub fn load(storage: &dyn Storage, key: &str) -> Result<Document, LoadError> {
    let text = storage.read(key)?.ok_or(LoadError::NotFound)?;
    let doc = parse(&text)?;
    log::info!(
        "loaded circuit from `{key}` ({} components, {} wires)",
        doc.components.len(),
        doc.connections.len()
    );
    Ok(doc)
}
