use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::row::Json;

/// Full export of the store, nested namespace -> schema name -> entry.
/// BTreeMap keeps serialized key ordering stable.
pub type Archive = BTreeMap<String, BTreeMap<String, SchemaEntry>>;

/// One schema and all of its data inside an archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub schema: Json,
    pub data: BTreeMap<String, Json>,
}

impl SchemaEntry {
    pub fn new(schema: Json) -> Self {
        Self {
            schema,
            data: BTreeMap::new(),
        }
    }
}
