use crate::error::Result;
use crate::types::{DataRow, SchemaRow};

/// Row store trait - abstraction for different storage backends
/// (in-memory, disk-based, etc.)
///
/// Backends hold two collections, `schemata` and `data`, each keyed by the
/// row's encoded primary key. Per-row writes are atomic upserts
/// (last write wins); bulk upserts are plain sequences of per-row upserts
/// with no cross-row atomicity.
pub trait RowStore {
    /// Inserts or overwrites the schema row at its primary key
    fn upsert_schema(&mut self, row: SchemaRow) -> Result<()>;

    /// Point lookup of a schema row by primary key
    fn get_schema(&self, pk: &str) -> Result<Option<SchemaRow>>;

    /// Scans all schema rows
    fn scan_schemata(&self) -> Result<Vec<SchemaRow>>;

    /// Inserts or overwrites the data row at its primary key
    fn upsert_datum(&mut self, row: DataRow) -> Result<()>;

    /// Point lookup of a data row by primary key
    fn get_datum(&self, pk: &str) -> Result<Option<DataRow>>;

    /// Scans all data rows
    fn scan_data(&self) -> Result<Vec<DataRow>>;

    /// Deletes every row in both collections
    fn clear(&mut self) -> Result<()>;

    /// Bulk upsert of schema rows. Not atomic across rows.
    fn upsert_schemata(&mut self, rows: Vec<SchemaRow>) -> Result<()> {
        for row in rows {
            self.upsert_schema(row)?;
        }
        Ok(())
    }

    /// Bulk upsert of data rows. Not atomic across rows.
    fn upsert_data(&mut self, rows: Vec<DataRow>) -> Result<()> {
        for row in rows {
            self.upsert_datum(row)?;
        }
        Ok(())
    }
}
