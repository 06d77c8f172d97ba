//! SQL rendering for decoded MySQL binlog row events.
//!
//! This crate turns a [`RawRowEvent`](binlog_core::RawRowEvent) plus its
//! [`TableMetadata`](binlog_core::TableMetadata) into SQL statement text.
//!
//! # Modules
//!
//! - [`literal`] - ColumnValue → SQL literal (quoting, escaping, UTC temporals)
//! - [`rowset`] - Row tuples and `VALUES` blocks
//! - [`statement`] - Insert/Update/Delete variants and the event dispatcher
//! - [`error`] - Error types for rendering failures
//!
//! # Key Design Principles
//!
//! 1. **No silent fallbacks** - unsupported events, column types and malformed rows are errors
//! 2. **UTC only** - temporal literals never depend on the host time zone
//! 3. **Order preserving** - rows are rendered in the order the decoder produced them
//!
//! # Example
//!
//! ```
//! use binlog_core::{ColumnValue, EventHeader, EventType, RawRowEvent, RowChange, TableMetadata};
//! use binlog_sql::event_to_sql;
//!
//! let table = TableMetadata::new("users", ["id", "name"]);
//! let event = RawRowEvent::new(
//!     EventHeader::new(EventType::WriteRowsV2),
//!     42,
//!     vec![RowChange::insert(vec![ColumnValue::Long(1), ColumnValue::text("O'Brien")])],
//! );
//!
//! let sql = event_to_sql(&event, &table).unwrap();
//! assert_eq!(sql, "INSERT INTO users(id,name) VALUES \n\t(1,'O''Brien')\n");
//! ```

pub mod error;
pub mod literal;
pub mod rowset;
pub mod statement;

pub use error::{RenderError, Result};
pub use literal::{
    column_to_sql, column_to_sql_with_options, escape_sql_string, quote_sql_string, EscapeMode,
    RenderOptions,
};
pub use rowset::{render_row, render_row_set};
pub use statement::{
    classify, event_to_sql, event_to_sql_with_options, Delete, Insert, RowPair, StatementVariant,
    Update,
};
