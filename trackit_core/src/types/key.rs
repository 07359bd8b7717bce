use std::fmt;

use crate::error::{Result, StoreError};

/// Segment separator used when encoding composite keys
pub const SEPARATOR: char = '/';

fn validate_segment(segment: &str, what: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(StoreError::InvalidKey(format!("{what} must not be empty")));
    }
    if segment.contains(SEPARATOR) {
        return Err(StoreError::InvalidKey(format!(
            "{what} '{segment}' must not contain '{SEPARATOR}'"
        )));
    }
    Ok(())
}

/// Composite key for a schema row: `"{namespace}/{name}"`.
///
/// Both segments are validated at construction so a stored primary key
/// always decodes back to the pair it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaKey {
    namespace: String,
    name: String,
}

impl SchemaKey {
    pub fn new(namespace: &str, name: &str) -> Result<Self> {
        validate_segment(namespace, "namespace")?;
        validate_segment(name, "schema name")?;
        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        })
    }

    /// Inverse of `encode`: the stored key must split into exactly two
    /// non-empty segments.
    pub fn decode(encoded: &str) -> Result<Self> {
        let segments: Vec<&str> = encoded.split(SEPARATOR).collect();
        match segments.as_slice() {
            [namespace, name] => SchemaKey::new(namespace, name),
            _ => Err(StoreError::InvalidKey(format!(
                "schema key '{encoded}' must have exactly two segments"
            ))),
        }
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.namespace, SEPARATOR, self.name)
    }
}

/// Composite key for a data row: `"{namespace}/{schema}/{key}"`.
///
/// Namespace and schema segments must not contain the separator; the
/// trailing key segment may, since decoding never splits to its right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatumKey {
    namespace: String,
    schema: String,
    key: String,
}

impl DatumKey {
    pub fn new(namespace: &str, schema: &str, key: &str) -> Result<Self> {
        validate_segment(namespace, "namespace")?;
        validate_segment(schema, "schema name")?;
        if key.is_empty() {
            return Err(StoreError::InvalidKey("datum key must not be empty".into()));
        }
        Ok(Self {
            namespace: namespace.to_string(),
            schema: schema.to_string(),
            key: key.to_string(),
        })
    }

    /// Inverse of `encode`: namespace and schema are taken positionally,
    /// the remainder is the datum key.
    pub fn decode(encoded: &str) -> Result<Self> {
        let mut segments = encoded.splitn(3, SEPARATOR);
        match (segments.next(), segments.next(), segments.next()) {
            (Some(namespace), Some(schema), Some(key)) => DatumKey::new(namespace, schema, key),
            _ => Err(StoreError::InvalidKey(format!(
                "datum key '{encoded}' must have at least three segments"
            ))),
        }
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for DatumKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.namespace, SEPARATOR, self.schema, SEPARATOR, self.key
        )
    }
}
