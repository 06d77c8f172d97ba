//! Column literal formatting: ColumnValue → SQL literal text.
//!
//! Each supported column class has exactly one literal form:
//!
//! | Column | Literal |
//! |---|---|
//! | NULL | `NULL` |
//! | string / blob | `'escaped text'` |
//! | date / year | `'yyyy-MM-dd'` |
//! | datetime / timestamp (all packings) | `'yyyy-MM-dd HH:mm:ss'` |
//! | integers, float, double | decimal text, unquoted |
//!
//! Every other column class is an error. The match below is exhaustive, so a
//! new `ColumnValue` variant does not compile until it is given a rendering
//! or an explicit rejection.

use crate::error::{RenderError, Result};
use binlog_core::ColumnValue;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, Utc};
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::debug;

/// `'yyyy-MM-dd'`, quotes included.
static DATE_TEMPLATE: LazyLock<Vec<Item<'static>>> =
    LazyLock::new(|| StrftimeItems::new("'%Y-%m-%d'").collect());

/// `'yyyy-MM-dd HH:mm:ss'`, quotes included.
static DATETIME_TEMPLATE: LazyLock<Vec<Item<'static>>> =
    LazyLock::new(|| StrftimeItems::new("'%Y-%m-%d %H:%M:%S'").collect());

/// How string literals are escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeMode {
    /// MySQL default: double quotes and backslash-escape `\`, NUL, LF, CR and Ctrl-Z.
    #[default]
    Backslash,
    /// ANSI / `NO_BACKSLASH_ESCAPES`: only double quotes.
    NoBackslashEscapes,
}

/// Options that affect literal rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub escape: EscapeMode,
}

impl RenderOptions {
    pub fn with_escape(mut self, escape: EscapeMode) -> Self {
        self.escape = escape;
        self
    }
}

/// Convert a column value to a SQL literal with default options.
///
/// # Errors
///
/// Returns [`RenderError::UnsupportedColumnType`] for decimal, time, bit, enum
/// and set columns, and for NaN or infinite floats.
///
/// # Example
///
/// ```
/// use binlog_core::ColumnValue;
/// use binlog_sql::column_to_sql;
///
/// assert_eq!(column_to_sql(&ColumnValue::Long(42)).unwrap(), "42");
/// assert_eq!(column_to_sql(&ColumnValue::text("O'Brien")).unwrap(), "'O''Brien'");
/// assert_eq!(column_to_sql(&ColumnValue::Null).unwrap(), "NULL");
/// ```
pub fn column_to_sql(value: &ColumnValue) -> Result<String> {
    column_to_sql_with_options(value, &RenderOptions::default())
}

/// Convert a column value to a SQL literal.
pub fn column_to_sql_with_options(value: &ColumnValue, options: &RenderOptions) -> Result<String> {
    match value {
        ColumnValue::Null => Ok("NULL".to_string()),

        // String types
        ColumnValue::String(bytes) | ColumnValue::Blob(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            if let Cow::Owned(_) = text {
                debug!(
                    column_type = value.type_name(),
                    len = bytes.len(),
                    "Replaced invalid UTF-8 sequences in string literal"
                );
            }
            Ok(quote_sql_string(&text, options.escape))
        }

        // Date types
        ColumnValue::Date(date) => Ok(date_literal(date)),
        ColumnValue::Year(year) => NaiveDate::from_ymd_opt(i32::from(*year), 1, 1)
            .map(|date| date_literal(&date))
            .ok_or_else(|| unsupported(value, year.to_string())),

        // DateTime types - every packing renders the same way
        ColumnValue::Datetime(dt)
        | ColumnValue::Datetime2(dt)
        | ColumnValue::Timestamp(dt)
        | ColumnValue::Timestamp2(dt) => Ok(datetime_literal(dt)),

        // Integer types
        ColumnValue::Tiny(i) => Ok(i.to_string()),
        ColumnValue::Short(i) => Ok(i.to_string()),
        ColumnValue::Int24(i) => Ok(i.to_string()),
        ColumnValue::Long(i) => Ok(i.to_string()),
        ColumnValue::LongLong(i) => Ok(i.to_string()),

        // Float types - error on NaN/Infinity, there is no SQL literal for them
        ColumnValue::Float(f) => {
            if f.is_finite() {
                Ok(f.to_string())
            } else {
                Err(unsupported(value, f.to_string()))
            }
        }
        ColumnValue::Double(f) => {
            if f.is_finite() {
                Ok(f.to_string())
            } else {
                Err(unsupported(value, f.to_string()))
            }
        }

        // Decoded but not renderable
        ColumnValue::Decimal(d) => Err(unsupported(value, d.clone())),
        ColumnValue::Time(t) | ColumnValue::Time2(t) => Err(unsupported(value, t.to_string())),
        ColumnValue::Bit(bits) => Err(unsupported(value, format!("{bits:02x?}"))),
        ColumnValue::Enum(index) => Err(unsupported(value, index.to_string())),
        ColumnValue::Set(bitmap) => Err(unsupported(value, format!("{bitmap:#b}"))),
    }
}

fn unsupported(value: &ColumnValue, shown: String) -> RenderError {
    RenderError::UnsupportedColumnType {
        column_type: value.type_name(),
        value: shown,
    }
}

/// Format a date as `'yyyy-MM-dd'`, quotes included.
pub fn date_literal(date: &NaiveDate) -> String {
    date.format_with_items(DATE_TEMPLATE.iter()).to_string()
}

/// Format a UTC instant as `'yyyy-MM-dd HH:mm:ss'`, quotes included.
///
/// Fractional seconds are dropped.
pub fn datetime_literal(dt: &DateTime<Utc>) -> String {
    dt.format_with_items(DATETIME_TEMPLATE.iter()).to_string()
}

/// Escape and single-quote a string.
pub fn quote_sql_string(s: &str, mode: EscapeMode) -> String {
    format!("'{}'", escape_sql_string(s, mode))
}

/// Escape a string for use inside a single-quoted SQL literal.
pub fn escape_sql_string(s: &str, mode: EscapeMode) -> String {
    let mut escaped = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match (c, mode) {
            ('\'', _) => escaped.push_str("''"),
            ('\\', EscapeMode::Backslash) => escaped.push_str("\\\\"),
            ('\0', EscapeMode::Backslash) => escaped.push_str("\\0"),
            ('\n', EscapeMode::Backslash) => escaped.push_str("\\n"),
            ('\r', EscapeMode::Backslash) => escaped.push_str("\\r"),
            ('\x1a', EscapeMode::Backslash) => escaped.push_str("\\Z"),
            (c, _) => escaped.push(c),
        }
    }
    escaped
}
