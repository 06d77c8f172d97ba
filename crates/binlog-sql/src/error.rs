//! Error types for SQL rendering.
//!
//! Every failure is returned to the caller; nothing is rendered as a
//! placeholder. Emitting malformed SQL into a replay or audit stream is worse
//! than stopping.

use binlog_core::EventType;
use thiserror::Error;

/// Errors that can occur while rendering a row event as SQL.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The event is not a write, update or delete rows event.
    #[error("Unsupported event kind: {event_type}. Only write, update and delete rows events can be rendered")]
    UnsupportedEventKind { event_type: EventType },

    /// The column value has no SQL literal form.
    #[error("Unsupported column type {column_type} (value {value}) has no SQL literal form")]
    UnsupportedColumnType {
        column_type: &'static str,
        value: String,
    },

    /// A row does not fit the table metadata, or lacks the image the event kind needs.
    #[error("Malformed row {row} for table '{table}': {reason}")]
    MalformedRow {
        table: String,
        row: usize,
        reason: String,
    },

    /// The event carries no rows at all.
    #[error("Rows event for table '{table}' carries no rows")]
    NoRows { table: String },

    /// The primary-key offset does not point into the column list.
    #[error("Key offset {offset} is outside the {width} column(s) of table '{table}'")]
    InvalidKeyOffset {
        table: String,
        offset: usize,
        width: usize,
    },
}

/// Result type for SQL rendering.
pub type Result<T> = std::result::Result<T, RenderError>;
