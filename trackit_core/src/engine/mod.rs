//! The eight store operations, generic over the backing [`RowStore`].
//!
//! Every write is an upsert keyed by the encoded composite key; reads are
//! either point lookups by primary key or scans filtered on the rows' side
//! fields. Stored payloads pass through untouched.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Result, StoreError};
use crate::storage::RowStore;
use crate::types::{Archive, DataRow, DatumKey, Json, SchemaEntry, SchemaKey, SchemaRow};

/// Upserts a schema body under `{namespace}/{name}` and echoes it back.
/// The body is stored verbatim; nothing checks its shape.
pub fn set_schema<S: RowStore>(store: &mut S, key: &SchemaKey, body: Json) -> Result<Json> {
    store.upsert_schema(SchemaRow::new(key, body.clone()))?;
    debug!(key = %key, "stored schema");
    Ok(body)
}

/// All schemata in a namespace, keyed by short name. Empty map when the
/// namespace holds nothing.
pub fn get_schemata<S: RowStore>(store: &S, namespace: &str) -> Result<BTreeMap<String, Json>> {
    let mut schemata = BTreeMap::new();
    for row in store.scan_schemata()? {
        if row.username != namespace {
            continue;
        }
        let key = decode_schema_pk(&row.name)?;
        schemata.insert(key.name().to_string(), row.body);
    }
    Ok(schemata)
}

/// Upserts a datum under `{namespace}/{schema}/{key}` and echoes it back.
/// No conformance check against the schema body.
pub fn set_datum<S: RowStore>(store: &mut S, key: &DatumKey, value: Json) -> Result<Json> {
    store.upsert_datum(DataRow::new(key, value.clone()))?;
    debug!(key = %key, "stored datum");
    Ok(value)
}

/// All data under a namespace and schema, keyed by short datum key.
pub fn get_data<S: RowStore>(
    store: &S,
    namespace: &str,
    schema: &str,
) -> Result<BTreeMap<String, Json>> {
    let mut data = BTreeMap::new();
    for row in store.scan_data()? {
        if row.username != namespace || row.schema != schema {
            continue;
        }
        let key = short_datum_key(&row)?;
        data.insert(key, row.datum);
    }
    Ok(data)
}

/// Point lookup of a single datum by its full composite key
pub fn get_datum<S: RowStore>(store: &S, key: &DatumKey) -> Result<Json> {
    let pk = key.encode();
    match store.get_datum(&pk)? {
        Some(row) => Ok(row.datum),
        None => Err(StoreError::NotFound { key: pk }),
    }
}

/// Exports the whole store as `{namespace: {schema: {"schema": body,
/// "data": {key: value}}}}`.
///
/// Schema rows are decoded by splitting their primary key into exactly two
/// segments. Data rows are bucketed by their stored `username`/`schema`
/// side fields; only the short datum key comes from the primary key, as
/// the remainder after the side-field prefix. A datum whose schema row is
/// missing still appears, under an entry with a null schema body.
pub fn get_archive<S: RowStore>(store: &S) -> Result<Archive> {
    let mut archive = Archive::new();
    for row in store.scan_schemata()? {
        let key = decode_schema_pk(&row.name)?;
        archive
            .entry(key.namespace().to_string())
            .or_default()
            .insert(key.name().to_string(), SchemaEntry::new(row.body));
    }
    for row in store.scan_data()? {
        let key = short_datum_key(&row)?;
        archive
            .entry(row.username.clone())
            .or_default()
            .entry(row.schema.clone())
            .or_insert_with(|| SchemaEntry::new(Json::Null))
            .data
            .insert(key, row.datum);
    }
    Ok(archive)
}

/// Flattens an archive back into rows and bulk-upserts both collections.
///
/// This is a merge: rows already in the store but absent from the archive
/// survive. The schemata batch and the data batch are applied
/// independently, so a failure between them leaves a mixed state; every
/// individual row write is an idempotent overwrite.
pub fn restore_archive<S: RowStore>(store: &mut S, archive: &Archive) -> Result<()> {
    let mut schemata = Vec::new();
    for (namespace, entries) in archive {
        for (name, entry) in entries {
            let key = SchemaKey::new(namespace, name)?;
            schemata.push(SchemaRow::new(&key, entry.schema.clone()));
        }
    }
    let schema_count = schemata.len();
    store.upsert_schemata(schemata)?;

    let mut data = Vec::new();
    for (namespace, entries) in archive {
        for (name, entry) in entries {
            for (datum_key, datum) in &entry.data {
                let key = DatumKey::new(namespace, name, datum_key)?;
                data.push(DataRow::new(&key, datum.clone()));
            }
        }
    }
    let datum_count = data.len();
    store.upsert_data(data)?;

    debug!(schema_count, datum_count, "restored archive");
    Ok(())
}

/// Deletes every row in both collections. Irreversible.
pub fn purge<S: RowStore>(store: &mut S) -> Result<()> {
    store.clear()?;
    debug!("purged all schemata and data");
    Ok(())
}

fn decode_schema_pk(pk: &str) -> Result<SchemaKey> {
    SchemaKey::decode(pk)
        .map_err(|_| StoreError::Consistency(format!("malformed schema key '{pk}'")))
}

/// Recovers the short datum key from a data row by stripping the prefix
/// built from the row's own side fields. A mismatch means the row was
/// written outside the engine's invariants.
fn short_datum_key(row: &DataRow) -> Result<String> {
    let prefix = format!("{}/{}/", row.username, row.schema);
    match row.key.strip_prefix(&prefix) {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => Err(StoreError::Consistency(format!(
            "data key '{}' does not match its username/schema fields",
            row.key
        ))),
    }
}
