pub mod archive;
pub mod key;
pub mod row;

// Re-export main types for convenience
pub use archive::{Archive, SchemaEntry};
pub use key::{DatumKey, SchemaKey, SEPARATOR};
pub use row::{DataRow, Json, SchemaRow};
