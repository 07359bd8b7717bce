use serde::{Deserialize, Serialize};

use crate::types::key::{DatumKey, SchemaKey};

/// Stored payloads are opaque JSON; no shape validation anywhere.
pub type Json = serde_json::Value;

/// A row in the `schemata` collection, keyed by `"{namespace}/{name}"`.
/// `username` duplicates the namespace segment for filtered scans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaRow {
    pub name: String,
    pub username: String,
    pub body: Json,
}

impl SchemaRow {
    pub fn new(key: &SchemaKey, body: Json) -> Self {
        Self {
            name: key.encode(),
            username: key.namespace().to_string(),
            body,
        }
    }
}

/// A row in the `data` collection, keyed by `"{namespace}/{schema}/{key}"`.
/// `username` and `schema` carry the owning namespace and schema name as
/// side fields; archive bucketing reads them rather than re-splitting the
/// primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    pub key: String,
    pub username: String,
    pub schema: String,
    pub datum: Json,
}

impl DataRow {
    pub fn new(key: &DatumKey, datum: Json) -> Self {
        Self {
            key: key.encode(),
            username: key.namespace().to_string(),
            schema: key.schema().to_string(),
            datum,
        }
    }
}
