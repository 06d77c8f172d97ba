//! Binlog event headers and decoded row-change events.
//!
//! These types are produced by the binlog decoder and consumed read-only by
//! the SQL renderer. The header keeps the raw MySQL event type code so that
//! non-row events (query, rotate, XID, ...) can be passed through and
//! rejected explicitly downstream.

use crate::values::ColumnValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// MySQL binlog event type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum EventType {
    StartV3,
    Query,
    Stop,
    Rotate,
    Intvar,
    FormatDescription,
    Xid,
    TableMap,
    WriteRowsV1,
    UpdateRowsV1,
    DeleteRowsV1,
    Heartbeat,
    RowsQuery,
    WriteRowsV2,
    UpdateRowsV2,
    DeleteRowsV2,
    Gtid,
    AnonymousGtid,
    PreviousGtids,
    PartialUpdateRows,
    /// Any code without a dedicated variant, kept verbatim.
    Other(u8),
}

impl EventType {
    /// Raw type code as it appears in the event header.
    pub fn code(self) -> u8 {
        match self {
            EventType::StartV3 => 1,
            EventType::Query => 2,
            EventType::Stop => 3,
            EventType::Rotate => 4,
            EventType::Intvar => 5,
            EventType::FormatDescription => 15,
            EventType::Xid => 16,
            EventType::TableMap => 19,
            EventType::WriteRowsV1 => 23,
            EventType::UpdateRowsV1 => 24,
            EventType::DeleteRowsV1 => 25,
            EventType::Heartbeat => 27,
            EventType::RowsQuery => 29,
            EventType::WriteRowsV2 => 30,
            EventType::UpdateRowsV2 => 31,
            EventType::DeleteRowsV2 => 32,
            EventType::Gtid => 33,
            EventType::AnonymousGtid => 34,
            EventType::PreviousGtids => 35,
            EventType::PartialUpdateRows => 39,
            EventType::Other(code) => code,
        }
    }

    /// The row-change kind for row events, `None` for everything else.
    ///
    /// v1 and v2 row events map to the same kind. Partial JSON updates are
    /// deliberately not treated as updates: their after-image is a diff, not
    /// a row.
    pub fn row_kind(self) -> Option<RowEventKind> {
        match self {
            EventType::WriteRowsV1 | EventType::WriteRowsV2 => Some(RowEventKind::Write),
            EventType::UpdateRowsV1 | EventType::UpdateRowsV2 => Some(RowEventKind::Update),
            EventType::DeleteRowsV1 | EventType::DeleteRowsV2 => Some(RowEventKind::Delete),
            _ => None,
        }
    }

    pub fn is_row_event(self) -> bool {
        self.row_kind().is_some()
    }
}

impl From<u8> for EventType {
    fn from(code: u8) -> Self {
        match code {
            1 => EventType::StartV3,
            2 => EventType::Query,
            3 => EventType::Stop,
            4 => EventType::Rotate,
            5 => EventType::Intvar,
            15 => EventType::FormatDescription,
            16 => EventType::Xid,
            19 => EventType::TableMap,
            23 => EventType::WriteRowsV1,
            24 => EventType::UpdateRowsV1,
            25 => EventType::DeleteRowsV1,
            27 => EventType::Heartbeat,
            29 => EventType::RowsQuery,
            30 => EventType::WriteRowsV2,
            31 => EventType::UpdateRowsV2,
            32 => EventType::DeleteRowsV2,
            33 => EventType::Gtid,
            34 => EventType::AnonymousGtid,
            35 => EventType::PreviousGtids,
            39 => EventType::PartialUpdateRows,
            other => EventType::Other(other),
        }
    }
}

impl From<EventType> for u8 {
    fn from(event_type: EventType) -> Self {
        event_type.code()
    }
}

impl EventType {
    /// MySQL's name for the event type, `None` for unrecognized codes.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            EventType::StartV3 => "START_EVENT_V3",
            EventType::Query => "QUERY_EVENT",
            EventType::Stop => "STOP_EVENT",
            EventType::Rotate => "ROTATE_EVENT",
            EventType::Intvar => "INTVAR_EVENT",
            EventType::FormatDescription => "FORMAT_DESCRIPTION_EVENT",
            EventType::Xid => "XID_EVENT",
            EventType::TableMap => "TABLE_MAP_EVENT",
            EventType::WriteRowsV1 => "WRITE_ROWS_EVENT_V1",
            EventType::UpdateRowsV1 => "UPDATE_ROWS_EVENT_V1",
            EventType::DeleteRowsV1 => "DELETE_ROWS_EVENT_V1",
            EventType::Heartbeat => "HEARTBEAT_LOG_EVENT",
            EventType::RowsQuery => "ROWS_QUERY_LOG_EVENT",
            EventType::WriteRowsV2 => "WRITE_ROWS_EVENT",
            EventType::UpdateRowsV2 => "UPDATE_ROWS_EVENT",
            EventType::DeleteRowsV2 => "DELETE_ROWS_EVENT",
            EventType::Gtid => "GTID_LOG_EVENT",
            EventType::AnonymousGtid => "ANONYMOUS_GTID_LOG_EVENT",
            EventType::PreviousGtids => "PREVIOUS_GTIDS_LOG_EVENT",
            EventType::PartialUpdateRows => "PARTIAL_UPDATE_ROWS_EVENT",
            EventType::Other(_) => return None,
        };
        Some(name)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}({})", self.code()),
            None => write!(f, "UNKNOWN_EVENT({})", self.code()),
        }
    }
}

/// The three row-change shapes a rows event can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowEventKind {
    Write,
    Update,
    Delete,
}

impl fmt::Display for RowEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RowEventKind::Write => "write",
            RowEventKind::Update => "update",
            RowEventKind::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Binlog event header.
///
/// Passed through unchanged; the renderer only inspects `event_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventHeader {
    /// Seconds since the epoch when the statement began on the source.
    #[serde(default)]
    pub timestamp: u32,
    pub event_type: EventType,
    #[serde(default)]
    pub server_id: u32,
    #[serde(default)]
    pub event_length: u32,
    /// Byte offset of the next event in the current binlog file.
    #[serde(default)]
    pub next_position: u32,
    #[serde(default)]
    pub flags: u16,
    /// Binlog file the event was read from, when the decoder tracks it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binlog_file: Option<String>,
}

impl EventHeader {
    /// Create a header with only the event type set.
    pub fn new(event_type: EventType) -> Self {
        Self {
            timestamp: 0,
            event_type,
            server_id: 0,
            event_length: 0,
            next_position: 0,
            flags: 0,
            binlog_file: None,
        }
    }

    /// Set the binlog coordinates of the event.
    pub fn with_position(mut self, binlog_file: impl Into<String>, next_position: u32) -> Self {
        self.binlog_file = Some(binlog_file.into());
        self.next_position = next_position;
        self
    }
}

/// One row image: column values in table column order.
pub type Row = Vec<ColumnValue>;

/// A single changed row.
///
/// Write events carry only `after`, delete events only `before`, update
/// events both.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RowChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Row>,
}

impl RowChange {
    pub fn insert(after: Row) -> Self {
        Self {
            before: None,
            after: Some(after),
        }
    }

    pub fn update(before: Row, after: Row) -> Self {
        Self {
            before: Some(before),
            after: Some(after),
        }
    }

    pub fn delete(before: Row) -> Self {
        Self {
            before: Some(before),
            after: None,
        }
    }
}

/// A decoded rows event, as handed over by the binlog decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRowEvent {
    pub header: EventHeader,
    /// Table id from the preceding TABLE_MAP event.
    pub table_id: u64,
    /// Changed rows, in binlog order.
    #[serde(default)]
    pub rows: Vec<RowChange>,
}

impl RawRowEvent {
    pub fn new(header: EventHeader, table_id: u64, rows: Vec<RowChange>) -> Self {
        Self {
            header,
            table_id,
            rows,
        }
    }

    /// Row-change kind derived from the header, `None` for non-row events.
    pub fn kind(&self) -> Option<RowEventKind> {
        self.header.event_type.row_kind()
    }
}

impl fmt::Display for RawRowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} table_id={} rows={}",
            self.header.event_type,
            self.table_id,
            self.rows.len()
        )?;
        match &self.header.binlog_file {
            Some(file) => write!(f, " position={file}:{}", self.header.next_position),
            None => write!(f, " position={}", self.header.next_position),
        }
    }
}
