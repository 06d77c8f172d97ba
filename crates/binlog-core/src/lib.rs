//! Core types for binlog-replay.
//!
//! This crate holds the data model shared by the decoder side and the SQL
//! renderer:
//!
//! - [`EventHeader`] / [`EventType`] - binlog event header and type codes
//! - [`RawRowEvent`] / [`RowChange`] - decoded row-change events
//! - [`ColumnValue`] - one typed column value as decoded from the row image
//! - [`TableMetadata`] / [`TableCatalog`] - table names, columns and key offsets
//!
//! # Architecture
//!
//! ```text
//! binlog-core (this crate)
//!    │
//!    ├─── binlog-sql     (renders RawRowEvent + TableMetadata as SQL)
//!    │
//!    └─── binlog-replay  (CLI: JSONL events + YAML catalog → SQL)
//! ```
//!
//! # Example
//!
//! ```rust
//! use binlog_core::{ColumnValue, EventHeader, EventType, RawRowEvent, RowChange};
//!
//! let event = RawRowEvent::new(
//!     EventHeader::new(EventType::WriteRowsV2),
//!     42,
//!     vec![RowChange::insert(vec![ColumnValue::LongLong(1), ColumnValue::text("Alice")])],
//! );
//! assert!(event.kind().is_some());
//! ```

pub mod catalog;
pub mod event;
pub mod values;

// Re-exports for convenience
pub use catalog::{CatalogEntry, CatalogError, TableCatalog, TableMetadata};
pub use event::{EventHeader, EventType, RawRowEvent, Row, RowChange, RowEventKind};
pub use values::ColumnValue;
