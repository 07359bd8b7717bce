use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};
use crate::storage::engine::RowStore;
use crate::types::{DataRow, SchemaRow};

const SCHEMATA_FILE: &str = "schemata.json";
const DATA_FILE: &str = "data.json";

/// Disk-backed storage. Rows are held in memory for the process lifetime
/// and written through to pretty-printed JSON files after every mutation.
///
/// `open` is idempotent: it creates the directory and collection files if
/// absent and tolerates layouts initialized by an earlier run.
#[derive(Debug)]
pub struct DiskStorage {
    root: PathBuf,
    schemata: BTreeMap<String, SchemaRow>,
    data: BTreeMap<String, DataRow>,
}

impl DiskStorage {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| StoreError::Backend(format!("failed to create '{}': {e}", root.display())))?;

        let schemata_rows: Vec<SchemaRow> = load_rows(&root.join(SCHEMATA_FILE))?;
        let data_rows: Vec<DataRow> = load_rows(&root.join(DATA_FILE))?;

        Ok(Self {
            root,
            schemata: schemata_rows.into_iter().map(|r| (r.name.clone(), r)).collect(),
            data: data_rows.into_iter().map(|r| (r.key.clone(), r)).collect(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn persist_schemata(&self) -> Result<()> {
        let rows: Vec<&SchemaRow> = self.schemata.values().collect();
        write_rows(&self.root.join(SCHEMATA_FILE), &rows)
    }

    fn persist_data(&self) -> Result<()> {
        let rows: Vec<&DataRow> = self.data.values().collect();
        write_rows(&self.root.join(DATA_FILE), &rows)
    }
}

fn load_rows<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        File::create(path)
            .map_err(|e| StoreError::Backend(format!("failed to create '{}': {e}", path.display())))?;
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)
        .map_err(|e| StoreError::Backend(format!("failed to read '{}': {e}", path.display())))?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content)
        .map_err(|e| StoreError::Backend(format!("malformed rows in '{}': {e}", path.display())))
}

fn write_rows<T: serde::Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let payload = serde_json::to_string_pretty(rows)?;
    fs::write(path, payload)
        .map_err(|e| StoreError::Backend(format!("failed to write '{}': {e}", path.display())))
}

impl RowStore for DiskStorage {
    fn upsert_schema(&mut self, row: SchemaRow) -> Result<()> {
        self.schemata.insert(row.name.clone(), row);
        self.persist_schemata()
    }

    fn get_schema(&self, pk: &str) -> Result<Option<SchemaRow>> {
        Ok(self.schemata.get(pk).cloned())
    }

    fn scan_schemata(&self) -> Result<Vec<SchemaRow>> {
        Ok(self.schemata.values().cloned().collect())
    }

    fn upsert_datum(&mut self, row: DataRow) -> Result<()> {
        self.data.insert(row.key.clone(), row);
        self.persist_data()
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
        self.persist_data()?;
        self.persist_schemata()
    }

    fn upsert_schemata(&mut self, rows: Vec<SchemaRow>) -> Result<()> {
        for row in rows {
            self.schemata.insert(row.name.clone(), row);
        }
        self.persist_schemata()
    }

    fn upsert_data(&mut self, rows: Vec<DataRow>) -> Result<()> {
        for row in rows {
            self.data.insert(row.key.clone(), row);
        }
        self.persist_data()
    }
}
