//! Backend abstractions. The resolver only talks to backends through these traits.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A toggle record as stored in a backend.
///
/// Only `isEnabled` is interpreted; any other field (e.g., the DynamoDB partition key) is
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRecord {
    /// Whether the toggle is on. A missing or `null` field is read as `None`.
    #[serde(default)]
    pub is_enabled: Option<bool>,
}

impl ToggleRecord {
    /// Create a record with the given flag.
    pub fn new(is_enabled: bool) -> Self {
        ToggleRecord {
            is_enabled: Some(is_enabled),
        }
    }

    /// Parse an object-store payload: UTF-8 JSON text.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(Error::InvalidUtf8)?;
        serde_json::from_str(text).map_err(|err| Error::InvalidRecord(err.into()))
    }

    /// The flag value. Records without a flag are disabled.
    pub fn is_enabled(&self) -> bool {
        self.is_enabled.unwrap_or(false)
    }
}

/// Blob storage addressed by bucket and key (e.g., S3).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the body of the object stored under `key` in `bucket`.
    ///
    /// A missing object is an error.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
}

/// Document storage addressed by table and primary key (e.g., DynamoDB).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the item whose primary key is `key` from `table`.
    ///
    /// Returns `Ok(None)` if there is no such item.
    async fn get_item(&self, table: &str, key: &str) -> Result<Option<ToggleRecord>>;
}
