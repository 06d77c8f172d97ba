//! Table metadata and the table catalog.
//!
//! Rows events only carry a numeric table id; the catalog resolves it to the
//! table name, the ordered column names, and the primary-key column offset
//! needed to render SQL.
//!
//! ## YAML Format
//!
//! ```yaml
//! tables:
//!   - table_id: 42
//!     name: users
//!     columns: [id, name, created_at]
//!     key_offset: 0
//!     encodings: [binary, utf8mb4, binary]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Error reading catalog file
    #[error("Failed to read catalog file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// No table registered under the id
    #[error("Table id not found in catalog: {0}")]
    TableNotFound(u64),

    /// Two entries share a table id
    #[error("Duplicate table id {table_id} (tables '{first}' and '{second}')")]
    DuplicateTableId {
        table_id: u64,
        first: String,
        second: String,
    },

    /// Entry that cannot be used for rendering
    #[error("Invalid metadata for table '{table}': {reason}")]
    InvalidTable { table: String, reason: String },
}

// ============================================================================
// Table Metadata
// ============================================================================

/// Everything the renderer needs to know about one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Table name, emitted verbatim after the SQL verb
    pub name: String,

    /// Column names in table (row image) order
    pub columns: Vec<String>,

    /// Per-column character set hints. Carried for the decoder's benefit;
    /// rendering does not consult them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub encodings: Vec<String>,

    /// Zero-based offset of the primary-key column
    #[serde(default)]
    pub key_offset: usize,
}

impl TableMetadata {
    /// Create table metadata with the key at offset 0.
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            encodings: Vec::new(),
            key_offset: 0,
        }
    }

    /// Set the primary-key column offset.
    pub fn with_key_offset(mut self, key_offset: usize) -> Self {
        self.key_offset = key_offset;
        self
    }

    /// Set the per-column encoding hints.
    pub fn with_encodings<I, S>(mut self, encodings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.encodings = encodings.into_iter().map(Into::into).collect();
        self
    }

    /// Parenthesized column list, e.g. `(id,name)`.
    pub fn column_list(&self) -> String {
        format!("({})", self.columns.join(","))
    }

    /// Number of columns in a row image of this table.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Name of the primary-key column, `None` if the offset is out of range.
    pub fn key_column(&self) -> Option<&str> {
        self.columns.get(self.key_offset).map(String::as_str)
    }

    /// Check the metadata is usable for rendering.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidTable {
            table: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("table name is empty".to_string()));
        }
        if self.columns.is_empty() {
            return Err(invalid("column list is empty".to_string()));
        }
        if let Some(idx) = self.columns.iter().position(|c| c.trim().is_empty()) {
            return Err(invalid(format!("column {idx} has an empty name")));
        }
        if self.key_offset >= self.columns.len() {
            return Err(invalid(format!(
                "key offset {} is outside the {} column(s)",
                self.key_offset,
                self.columns.len()
            )));
        }
        if !self.encodings.is_empty() && self.encodings.len() != self.columns.len() {
            return Err(invalid(format!(
                "{} encoding hint(s) for {} column(s)",
                self.encodings.len(),
                self.columns.len()
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// One catalog entry: a binlog table id and its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Table id as assigned by the TABLE_MAP event
    pub table_id: u64,

    #[serde(flatten)]
    pub table: TableMetadata,
}

/// Table id → metadata lookup, loaded from YAML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableCatalog {
    /// Registered tables
    #[serde(default)]
    pub tables: Vec<CatalogEntry>,

    /// Cached table lookup (not serialized)
    #[serde(skip)]
    table_map: HashMap<u64, usize>,
}

impl TableCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a catalog from a YAML string, validating every entry.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let parsed: TableCatalog = serde_yaml::from_str(yaml)?;
        let mut catalog = TableCatalog::new();
        for entry in parsed.tables {
            catalog.insert(entry.table_id, entry.table)?;
        }
        Ok(catalog)
    }

    /// Register a table under a table id.
    pub fn insert(&mut self, table_id: u64, table: TableMetadata) -> Result<(), CatalogError> {
        table.validate()?;
        if let Some(existing) = self.get(table_id) {
            return Err(CatalogError::DuplicateTableId {
                table_id,
                first: existing.name.clone(),
                second: table.name,
            });
        }
        self.table_map.insert(table_id, self.tables.len());
        self.tables.push(CatalogEntry { table_id, table });
        Ok(())
    }

    /// Get the metadata for a table id.
    pub fn get(&self, table_id: u64) -> Option<&TableMetadata> {
        self.table_map
            .get(&table_id)
            .and_then(|&idx| self.tables.get(idx))
            .map(|entry| &entry.table)
    }

    /// Get the metadata for a table id, failing if it is unknown.
    pub fn require(&self, table_id: u64) -> Result<&TableMetadata, CatalogError> {
        self.get(table_id)
            .ok_or(CatalogError::TableNotFound(table_id))
    }

    /// Number of registered tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_YAML: &str = r#"
tables:
  - table_id: 42
    name: users
    columns: [id, name]
  - table_id: 43
    name: orders
    columns: [order_no, user_id, total]
    key_offset: 0
    encodings: [binary, binary, binary]
"#;

    #[test]
    fn test_column_list_is_parenthesized() {
        let table = TableMetadata::new("users", ["id", "name"]);
        assert_eq!(table.column_list(), "(id,name)");
        assert_eq!(table.width(), 2);
        assert_eq!(table.key_column(), Some("id"));
    }

    #[test]
    fn test_key_column_out_of_range() {
        let table = TableMetadata::new("users", ["id"]).with_key_offset(3);
        assert_eq!(table.key_column(), None);
        assert!(matches!(
            table.validate(),
            Err(CatalogError::InvalidTable { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_columns_and_mismatched_encodings() {
        let empty: Vec<String> = Vec::new();
        assert!(TableMetadata::new("t", empty).validate().is_err());
        assert!(TableMetadata::new("t", ["a", " "]).validate().is_err());
        assert!(TableMetadata::new("t", ["a", "b"])
            .with_encodings(["utf8mb4"])
            .validate()
            .is_err());
        assert!(TableMetadata::new("t", ["a", "b"])
            .with_encodings(["utf8mb4", "binary"])
            .validate()
            .is_ok());
    }

    #[test]
    fn test_catalog_from_yaml() {
        let catalog = TableCatalog::from_yaml(CATALOG_YAML).unwrap();
        assert_eq!(catalog.len(), 2);

        let users = catalog.get(42).unwrap();
        assert_eq!(users.name, "users");
        assert_eq!(users.column_list(), "(id,name)");
        assert_eq!(users.key_offset, 0);
        assert!(users.encodings.is_empty());

        let orders = catalog.require(43).unwrap();
        assert_eq!(orders.width(), 3);
        assert_eq!(orders.encodings.len(), 3);

        assert!(matches!(
            catalog.require(99),
            Err(CatalogError::TableNotFound(99))
        ));
    }

    #[test]
    fn test_catalog_rejects_duplicate_ids() {
        let yaml = r#"
tables:
  - {table_id: 1, name: a, columns: [id]}
  - {table_id: 1, name: b, columns: [id]}
"#;
        let err = TableCatalog::from_yaml(yaml).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DuplicateTableId { table_id: 1, .. }
        ));
    }

    #[test]
    fn test_catalog_rejects_bad_key_offset() {
        let yaml = r#"
tables:
  - {table_id: 1, name: a, columns: [id], key_offset: 1}
"#;
        assert!(matches!(
            TableCatalog::from_yaml(yaml),
            Err(CatalogError::InvalidTable { .. })
        ));
    }

    #[test]
    fn test_catalog_from_missing_file() {
        assert!(matches!(
            TableCatalog::from_file("/nonexistent/catalog.yaml"),
            Err(CatalogError::IoError(_))
        ));
    }
}
