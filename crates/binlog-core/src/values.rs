//! Column values as decoded from binlog row images.
//!
//! `ColumnValue` has one variant per binlog column class, so the renderer can
//! match on it exhaustively. Temporal values are already normalized to UTC by
//! the decoder; date-only values carry no zone at all.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One typed column value from a row image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ColumnValue {
    /// SQL NULL (bit set in the row's null bitmap)
    Null,

    /// CHAR / VARCHAR / VAR_STRING payload, raw bytes in the column charset
    #[serde(deserialize_with = "bytes_or_text")]
    String(Vec<u8>),

    /// TINYBLOB / BLOB / MEDIUMBLOB / LONGBLOB / TEXT payload
    #[serde(deserialize_with = "bytes_or_text")]
    Blob(Vec<u8>),

    /// DATE / NEWDATE
    Date(NaiveDate),

    /// YEAR (0 or 1901..=2155)
    Year(u16),

    /// DATETIME (pre-5.6 packing)
    Datetime(DateTime<Utc>),

    /// DATETIME(fsp) (5.6+ packing)
    Datetime2(DateTime<Utc>),

    /// TIMESTAMP (pre-5.6 packing)
    Timestamp(DateTime<Utc>),

    /// TIMESTAMP(fsp) (5.6+ packing)
    Timestamp2(DateTime<Utc>),

    /// TINYINT
    Tiny(i8),

    /// SMALLINT
    Short(i16),

    /// MEDIUMINT
    Int24(i32),

    /// INT
    Long(i32),

    /// BIGINT
    LongLong(i64),

    /// FLOAT
    Float(f32),

    /// DOUBLE
    Double(f64),

    /// DECIMAL / NEWDECIMAL, decimal text as decoded
    Decimal(String),

    /// TIME (pre-5.6 packing)
    Time(NaiveTime),

    /// TIME(fsp) (5.6+ packing)
    Time2(NaiveTime),

    /// BIT(n), packed big-endian
    Bit(Vec<u8>),

    /// ENUM member index (1-based, 0 = empty)
    Enum(u16),

    /// SET member bitmap
    Set(u64),
}

/// Byte payloads are accepted either as a byte array or as UTF-8 text.
#[derive(Deserialize)]
#[serde(untagged)]
enum BytesOrText {
    Text(String),
    Bytes(Vec<u8>),
}

fn bytes_or_text<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match BytesOrText::deserialize(deserializer)? {
        BytesOrText::Text(text) => text.into_bytes(),
        BytesOrText::Bytes(bytes) => bytes,
    })
}

impl ColumnValue {
    /// A string column holding UTF-8 text.
    pub fn text(value: impl Into<String>) -> Self {
        Self::String(value.into().into_bytes())
    }

    /// A blob column holding raw bytes.
    pub fn blob(value: impl Into<Vec<u8>>) -> Self {
        Self::Blob(value.into())
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// MySQL column type name of the value's variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::String(_) => "VARCHAR",
            Self::Blob(_) => "BLOB",
            Self::Date(_) => "DATE",
            Self::Year(_) => "YEAR",
            Self::Datetime(_) => "DATETIME",
            Self::Datetime2(_) => "DATETIME2",
            Self::Timestamp(_) => "TIMESTAMP",
            Self::Timestamp2(_) => "TIMESTAMP2",
            Self::Tiny(_) => "TINY",
            Self::Short(_) => "SHORT",
            Self::Int24(_) => "INT24",
            Self::Long(_) => "LONG",
            Self::LongLong(_) => "LONGLONG",
            Self::Float(_) => "FLOAT",
            Self::Double(_) => "DOUBLE",
            Self::Decimal(_) => "NEWDECIMAL",
            Self::Time(_) => "TIME",
            Self::Time2(_) => "TIME2",
            Self::Bit(_) => "BIT",
            Self::Enum(_) => "ENUM",
            Self::Set(_) => "SET",
        }
    }
}
