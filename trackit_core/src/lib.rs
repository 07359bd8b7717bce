use std::collections::BTreeMap;
use std::path::PathBuf;

pub mod engine;
pub mod error;
pub mod storage;
pub mod types;

pub use error::{Result, StoreError};

use storage::{DiskStorage, MemStorage, RowStore};
use types::{Archive, DatumKey, Json, SchemaKey};

/// Handle over a row store backend exposing the full operation set.
/// Constructed once at process start and passed to whatever serves
/// requests; there is no ambient global connection.
#[derive(Debug)]
pub struct Store<S: RowStore> {
    backend: S,
}

impl Store<MemStorage> {
    pub fn in_memory() -> Self {
        Self::new(MemStorage::new())
    }
}

impl Store<DiskStorage> {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(DiskStorage::open(path)?))
    }
}

impl<S: RowStore> Store<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn set_schema(&mut self, namespace: &str, name: &str, body: Json) -> Result<Json> {
        let key = SchemaKey::new(namespace, name)?;
        engine::set_schema(&mut self.backend, &key, body)
    }

    pub fn get_schemata(&self, namespace: &str) -> Result<BTreeMap<String, Json>> {
        engine::get_schemata(&self.backend, namespace)
    }

    pub fn set_datum(&mut self, namespace: &str, schema: &str, key: &str, value: Json) -> Result<Json> {
        let key = DatumKey::new(namespace, schema, key)?;
        engine::set_datum(&mut self.backend, &key, value)
    }

    pub fn get_data(&self, namespace: &str, schema: &str) -> Result<BTreeMap<String, Json>> {
        engine::get_data(&self.backend, namespace, schema)
    }

    pub fn get_datum(&self, namespace: &str, schema: &str, key: &str) -> Result<Json> {
        let key = DatumKey::new(namespace, schema, key)?;
        engine::get_datum(&self.backend, &key)
    }

    pub fn get_archive(&self) -> Result<Archive> {
        engine::get_archive(&self.backend)
    }

    pub fn restore_archive(&mut self, archive: &Archive) -> Result<()> {
        engine::restore_archive(&mut self.backend, archive)
    }

    pub fn purge(&mut self) -> Result<()> {
        engine::purge(&mut self.backend)
    }
}
