use std::collections::BTreeMap;

use crate::error::Result;
use crate::storage::engine::RowStore;
use crate::types::{DataRow, SchemaRow};

/// In-memory storage implementation using BTreeMaps keyed by primary key
#[derive(Debug, Default)]
pub struct MemStorage {
    schemata: BTreeMap<String, SchemaRow>,
    data: BTreeMap<String, DataRow>,
}

impl MemStorage {
    /// Creates a new empty in-memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

impl RowStore for MemStorage {
    fn upsert_schema(&mut self, row: SchemaRow) -> Result<()> {
        self.schemata.insert(row.name.clone(), row);
        Ok(())
    }

    fn get_schema(&self, pk: &str) -> Result<Option<SchemaRow>> {
        Ok(self.schemata.get(pk).cloned())
    }

    fn scan_schemata(&self) -> Result<Vec<SchemaRow>> {
        Ok(self.schemata.values().cloned().collect())
    }

    fn upsert_datum(&mut self, row: DataRow) -> Result<()> {
        self.data.insert(row.key.clone(), row);
        Ok(())
    }

    fn get_datum(&self, pk: &str) -> Result<Option<DataRow>> {
        Ok(self.data.get(pk).cloned())
    }

    fn scan_data(&self) -> Result<Vec<DataRow>> {
        Ok(self.data.values().cloned().collect())
    }

    fn clear(&mut self) -> Result<()> {
        self.data.clear();
        self.schemata.clear();
        Ok(())
    }
}
