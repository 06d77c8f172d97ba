//! Statement variants and the event dispatcher.
//!
//! [`classify`] turns a rows event into one of three statement shapes. Each
//! shape knows its SQL verb and which row image it reads:
//!
//! | Variant | Verb | Rows |
//! |---|---|---|
//! | [`Insert`] | `INSERT INTO ` | after-images, all columns |
//! | [`Update`] | `UPDATE ` | before/after pairs, unmodified |
//! | [`Delete`] | `DELETE FROM ` | before-images, key column only |
//!
//! Rendered shapes:
//!
//! ```text
//! INSERT INTO users(id,name) VALUES \n\t(1,'a'),\n\t(2,'b')\n
//! UPDATE users SET id=1,name='b' WHERE id=1;\n
//! DELETE FROM users WHERE (id) IN (\n\t(1),\n\t(2)\n)\n
//! ```
//!
//! UPDATE has no multi-row VALUES form, so an update event renders one
//! `UPDATE ... WHERE <key>=<old key>;` per row, newline separated.
//!
//! NULL keys are matched with `IS NULL` in both UPDATE and DELETE:
//! `DELETE FROM users WHERE (id) IN (\n\t(1)\n) OR id IS NULL\n`.

use crate::error::{RenderError, Result};
use crate::literal::{column_to_sql_with_options, RenderOptions};
use crate::rowset::{check_row_width, render_row_set, render_values_statement};
use binlog_core::{ColumnValue, RawRowEvent, RowEventKind, TableMetadata};
use tracing::debug;

pub const INSERT_VERB: &str = "INSERT INTO ";
pub const UPDATE_VERB: &str = "UPDATE ";
pub const DELETE_VERB: &str = "DELETE FROM ";

/// Classify a rows event and wrap it in the matching statement variant.
///
/// # Errors
///
/// Returns [`RenderError::UnsupportedEventKind`] if the header's event type is
/// not a write, update or delete rows event.
pub fn classify<'a>(
    event: &'a RawRowEvent,
    table: &'a TableMetadata,
) -> Result<StatementVariant<'a>> {
    let kind = event.kind().ok_or(RenderError::UnsupportedEventKind {
        event_type: event.header.event_type,
    })?;

    let variant = match kind {
        RowEventKind::Write => StatementVariant::Insert(Insert::new(event, table)),
        RowEventKind::Update => StatementVariant::Update(Update::new(event, table)),
        RowEventKind::Delete => StatementVariant::Delete(Delete::new(event, table)),
    };

    debug!(
        table = %table.name,
        table_id = event.table_id,
        kind = %kind,
        rows = event.rows.len(),
        "Classified rows event"
    );
    Ok(variant)
}

/// Classify and render a rows event with default options.
pub fn event_to_sql(event: &RawRowEvent, table: &TableMetadata) -> Result<String> {
    event_to_sql_with_options(event, table, &RenderOptions::default())
}

/// Classify and render a rows event.
pub fn event_to_sql_with_options(
    event: &RawRowEvent,
    table: &TableMetadata,
    options: &RenderOptions,
) -> Result<String> {
    classify(event, table)?.to_sql(options)
}

/// One of the three statement shapes.
#[derive(Debug, Clone, Copy)]
pub enum StatementVariant<'a> {
    Insert(Insert<'a>),
    Update(Update<'a>),
    Delete(Delete<'a>),
}

impl<'a> StatementVariant<'a> {
    pub fn kind(&self) -> RowEventKind {
        match self {
            StatementVariant::Insert(_) => RowEventKind::Write,
            StatementVariant::Update(_) => RowEventKind::Update,
            StatementVariant::Delete(_) => RowEventKind::Delete,
        }
    }

    /// SQL verb text, including the trailing space.
    pub fn verb(&self) -> &'static str {
        match self {
            StatementVariant::Insert(_) => INSERT_VERB,
            StatementVariant::Update(_) => UPDATE_VERB,
            StatementVariant::Delete(_) => DELETE_VERB,
        }
    }

    pub fn table(&self) -> &'a TableMetadata {
        match self {
            StatementVariant::Insert(s) => s.table,
            StatementVariant::Update(s) => s.table,
            StatementVariant::Delete(s) => s.table,
        }
    }

    pub fn event(&self) -> &'a RawRowEvent {
        match self {
            StatementVariant::Insert(s) => s.event,
            StatementVariant::Update(s) => s.event,
            StatementVariant::Delete(s) => s.event,
        }
    }

    /// Render the statement text.
    pub fn to_sql(&self, options: &RenderOptions) -> Result<String> {
        match self {
            StatementVariant::Insert(s) => s.to_sql(options),
            StatementVariant::Update(s) => s.to_sql(options),
            StatementVariant::Delete(s) => s.to_sql(options),
        }
    }
}

/// Write rows event → `INSERT INTO`.
#[derive(Debug, Clone, Copy)]
pub struct Insert<'a> {
    event: &'a RawRowEvent,
    table: &'a TableMetadata,
}

impl<'a> Insert<'a> {
    pub fn new(event: &'a RawRowEvent, table: &'a TableMetadata) -> Self {
        Self { event, table }
    }

    /// After-image of every row, in event order.
    pub fn rows(&self) -> Result<Vec<&'a [ColumnValue]>> {
        ensure_rows(self.event, self.table)?;
        self.event
            .rows
            .iter()
            .enumerate()
            .map(|(idx, change)| {
                let row = require_image(self.table, idx, change.after.as_deref(), "after")?;
                check_row_width(self.table, idx, row)?;
                Ok(row)
            })
            .collect()
    }

    pub fn to_sql(&self, options: &RenderOptions) -> Result<String> {
        render_values_statement(INSERT_VERB, self.table, self.rows()?, options)
    }
}

/// Before and after image of one updated row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPair<'a> {
    pub before: &'a [ColumnValue],
    pub after: &'a [ColumnValue],
}

/// Update rows event → one `UPDATE` per row.
#[derive(Debug, Clone, Copy)]
pub struct Update<'a> {
    event: &'a RawRowEvent,
    table: &'a TableMetadata,
}

impl<'a> Update<'a> {
    pub fn new(event: &'a RawRowEvent, table: &'a TableMetadata) -> Self {
        Self { event, table }
    }

    /// Before/after pairs of every row, in event order.
    pub fn rows(&self) -> Result<Vec<RowPair<'a>>> {
        ensure_rows(self.event, self.table)?;
        self.event
            .rows
            .iter()
            .enumerate()
            .map(|(idx, change)| {
                let before = require_image(self.table, idx, change.before.as_deref(), "before")?;
                let after = require_image(self.table, idx, change.after.as_deref(), "after")?;
                check_row_width(self.table, idx, before)?;
                check_row_width(self.table, idx, after)?;
                Ok(RowPair { before, after })
            })
            .collect()
    }

    pub fn to_sql(&self, options: &RenderOptions) -> Result<String> {
        let (offset, key) = key_column(self.table)?;
        let pairs = self.rows()?;

        let mut statements = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let assignments = self
                .table
                .columns
                .iter()
                .zip(pair.after)
                .map(|(column, value)| {
                    Ok(format!(
                        "{column}={}",
                        column_to_sql_with_options(value, options)?
                    ))
                })
                .collect::<Result<Vec<_>>>()?;
            let condition = key_condition(key, &pair.before[offset], options)?;
            statements.push(format!(
                "{UPDATE_VERB}{} SET {} WHERE {condition};",
                self.table.name,
                assignments.join(",")
            ));
        }
        Ok(format!("{}\n", statements.join("\n")))
    }
}

/// Delete rows event → `DELETE FROM ... WHERE (<key>) IN (...)`.
#[derive(Debug, Clone, Copy)]
pub struct Delete<'a> {
    event: &'a RawRowEvent,
    table: &'a TableMetadata,
}

impl<'a> Delete<'a> {
    pub fn new(event: &'a RawRowEvent, table: &'a TableMetadata) -> Self {
        Self { event, table }
    }

    /// Key column of every deleted row's before-image, as one-column rows.
    pub fn rows(&self) -> Result<Vec<&'a [ColumnValue]>> {
        let (offset, _) = key_column(self.table)?;
        ensure_rows(self.event, self.table)?;
        self.event
            .rows
            .iter()
            .enumerate()
            .map(|(idx, change)| {
                let row = require_image(self.table, idx, change.before.as_deref(), "before")?;
                check_row_width(self.table, idx, row)?;
                Ok(&row[offset..=offset])
            })
            .collect()
    }

    /// `IN` never matches NULL, so NULL keys become a separate `<key> IS NULL`
    /// condition.
    pub fn to_sql(&self, options: &RenderOptions) -> Result<String> {
        let (_, key) = key_column(self.table)?;
        let (null_keys, keyed): (Vec<_>, Vec<_>) = self
            .rows()?
            .into_iter()
            .partition(|row| row.iter().all(ColumnValue::is_null));

        let mut conditions = Vec::with_capacity(2);
        if !keyed.is_empty() {
            let body = render_row_set(keyed, options)?;
            conditions.push(format!("({key}) IN (\n{body}\n)"));
        }
        if !null_keys.is_empty() {
            conditions.push(format!("{key} IS NULL"));
        }
        Ok(format!(
            "{DELETE_VERB}{} WHERE {}\n",
            self.table.name,
            conditions.join(" OR ")
        ))
    }
}

fn ensure_rows(event: &RawRowEvent, table: &TableMetadata) -> Result<()> {
    if event.rows.is_empty() {
        return Err(RenderError::NoRows {
            table: table.name.clone(),
        });
    }
    Ok(())
}

fn require_image<'a>(
    table: &TableMetadata,
    row: usize,
    image: Option<&'a [ColumnValue]>,
    which: &str,
) -> Result<&'a [ColumnValue]> {
    image.ok_or_else(|| RenderError::MalformedRow {
        table: table.name.clone(),
        row,
        reason: format!("missing {which}-image"),
    })
}

fn key_column(table: &TableMetadata) -> Result<(usize, &str)> {
    table
        .key_column()
        .map(|name| (table.key_offset, name))
        .ok_or_else(|| RenderError::InvalidKeyOffset {
            table: table.name.clone(),
            offset: table.key_offset,
            width: table.width(),
        })
}

fn key_condition(key: &str, value: &ColumnValue, options: &RenderOptions) -> Result<String> {
    if value.is_null() {
        Ok(format!("{key} IS NULL"))
    } else {
        Ok(format!("{key}={}", column_to_sql_with_options(value, options)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binlog_core::{EventHeader, EventType, RowChange};

    fn users() -> TableMetadata {
        TableMetadata::new("users", ["id", "name"])
    }

    fn event(event_type: EventType, rows: Vec<RowChange>) -> RawRowEvent {
        RawRowEvent::new(EventHeader::new(event_type), 42, rows)
    }

    fn row(id: i64, name: &str) -> Vec<ColumnValue> {
        vec![ColumnValue::LongLong(id), ColumnValue::text(name)]
    }

    #[test]
    fn test_classify_maps_kinds_to_variants() {
        let table = users();
        let cases = [
            (EventType::WriteRowsV1, RowEventKind::Write, INSERT_VERB),
            (EventType::WriteRowsV2, RowEventKind::Write, INSERT_VERB),
            (EventType::UpdateRowsV1, RowEventKind::Update, UPDATE_VERB),
            (EventType::UpdateRowsV2, RowEventKind::Update, UPDATE_VERB),
            (EventType::DeleteRowsV1, RowEventKind::Delete, DELETE_VERB),
            (EventType::DeleteRowsV2, RowEventKind::Delete, DELETE_VERB),
        ];
        for (event_type, kind, verb) in cases {
            let ev = event(event_type, vec![]);
            let variant = classify(&ev, &table).unwrap();
            assert_eq!(variant.kind(), kind);
            assert_eq!(variant.verb(), verb);
            assert_eq!(variant.table().name, "users");
            assert_eq!(variant.event().table_id, 42);
        }
    }

    #[test]
    fn test_classify_rejects_non_row_events() {
        let table = users();
        for event_type in [
            EventType::Query,
            EventType::TableMap,
            EventType::Xid,
            EventType::PartialUpdateRows,
            EventType::Other(200),
        ] {
            let ev = event(event_type, vec![RowChange::insert(row(1, "a"))]);
            match classify(&ev, &table) {
                Err(RenderError::UnsupportedEventKind { event_type: got }) => {
                    assert_eq!(got, event_type)
                }
                other => panic!("Expected UnsupportedEventKind, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_insert_multiple_rows_in_order() {
        let table = users();
        let ev = event(
            EventType::WriteRowsV2,
            vec![
                RowChange::insert(row(3, "c")),
                RowChange::insert(row(1, "a")),
                RowChange::insert(row(2, "b")),
            ],
        );
        assert_eq!(
            event_to_sql(&ev, &table).unwrap(),
            "INSERT INTO users(id,name) VALUES \n\t(3,'c'),\n\t(1,'a'),\n\t(2,'b')\n"
        );
    }

    #[test]
    fn test_insert_requires_after_image() {
        let table = users();
        let ev = event(EventType::WriteRowsV2, vec![RowChange::delete(row(1, "a"))]);
        assert!(matches!(
            event_to_sql(&ev, &table),
            Err(RenderError::MalformedRow { row: 0, .. })
        ));
    }

    #[test]
    fn test_insert_rejects_width_mismatch() {
        let table = users();
        let ev = event(
            EventType::WriteRowsV2,
            vec![
                RowChange::insert(row(1, "a")),
                RowChange::insert(vec![ColumnValue::LongLong(2)]),
            ],
        );
        assert!(matches!(
            event_to_sql(&ev, &table),
            Err(RenderError::MalformedRow { row: 1, .. })
        ));
    }

    #[test]
    fn test_empty_event_is_rejected() {
        let table = users();
        for event_type in [
            EventType::WriteRowsV2,
            EventType::UpdateRowsV2,
            EventType::DeleteRowsV2,
        ] {
            let ev = event(event_type, vec![]);
            assert!(matches!(
                event_to_sql(&ev, &table),
                Err(RenderError::NoRows { .. })
            ));
        }
    }

    #[test]
    fn test_update_renders_set_and_key_from_before_image() {
        let table = users();
        let ev = event(
            EventType::UpdateRowsV2,
            vec![
                RowChange::update(row(1, "a"), row(10, "a2")),
                RowChange::update(row(2, "b"), row(2, "it's")),
            ],
        );
        let variant = classify(&ev, &table).unwrap();
        let StatementVariant::Update(update) = variant else {
            panic!("Expected Update variant");
        };
        let pairs = update.rows().unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].before, row(1, "a").as_slice());
        assert_eq!(pairs[0].after, row(10, "a2").as_slice());

        assert_eq!(
            variant.to_sql(&RenderOptions::default()).unwrap(),
            "UPDATE users SET id=10,name='a2' WHERE id=1;\n\
             UPDATE users SET id=2,name='it''s' WHERE id=2;\n"
        );
    }

    #[test]
    fn test_update_with_null_key_uses_is_null() {
        let table = users();
        let ev = event(
            EventType::UpdateRowsV1,
            vec![RowChange::update(
                vec![ColumnValue::Null, ColumnValue::text("a")],
                vec![ColumnValue::Long(5), ColumnValue::text("a")],
            )],
        );
        assert_eq!(
            event_to_sql(&ev, &table).unwrap(),
            "UPDATE users SET id=5,name='a' WHERE id IS NULL;\n"
        );
    }

    #[test]
    fn test_update_requires_both_images() {
        let table = users();
        let ev = event(EventType::UpdateRowsV2, vec![RowChange::insert(row(1, "a"))]);
        match event_to_sql(&ev, &table) {
            Err(RenderError::MalformedRow { reason, .. }) => {
                assert!(reason.contains("before"), "Got: {reason}")
            }
            other => panic!("Expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_delete_renders_only_key_column() {
        let table = TableMetadata::new("orders", ["user_id", "order_no", "note"]).with_key_offset(1);
        let ev = event(
            EventType::DeleteRowsV2,
            vec![
                RowChange::delete(vec![
                    ColumnValue::Long(7),
                    ColumnValue::LongLong(1001),
                    ColumnValue::text("x"),
                ]),
                RowChange::delete(vec![
                    ColumnValue::Long(8),
                    ColumnValue::LongLong(1002),
                    ColumnValue::Null,
                ]),
            ],
        );

        let StatementVariant::Delete(delete) = classify(&ev, &table).unwrap() else {
            panic!("Expected Delete variant");
        };
        let rows = delete.rows().unwrap();
        assert_eq!(rows[0], &[ColumnValue::LongLong(1001)][..]);
        assert_eq!(rows[1], &[ColumnValue::LongLong(1002)][..]);

        assert_eq!(
            event_to_sql(&ev, &table).unwrap(),
            "DELETE FROM orders WHERE (order_no) IN (\n\t(1001),\n\t(1002)\n)\n"
        );
    }

    #[test]
    fn test_delete_ignores_unsupported_non_key_columns() {
        let table = users();
        let ev = event(
            EventType::DeleteRowsV2,
            vec![RowChange::delete(vec![
                ColumnValue::LongLong(1),
                ColumnValue::Decimal("9.99".into()),
            ])],
        );
        assert_eq!(
            event_to_sql(&ev, &table).unwrap(),
            "DELETE FROM users WHERE (id) IN (\n\t(1)\n)\n"
        );
    }

    #[test]
    fn test_delete_with_null_keys_uses_is_null() {
        let table = users();
        let null_row = || vec![ColumnValue::Null, ColumnValue::text("a")];

        let only_null = event(EventType::DeleteRowsV2, vec![RowChange::delete(null_row())]);
        assert_eq!(
            event_to_sql(&only_null, &table).unwrap(),
            "DELETE FROM users WHERE id IS NULL\n"
        );

        let mixed = event(
            EventType::DeleteRowsV1,
            vec![
                RowChange::delete(row(1, "a")),
                RowChange::delete(null_row()),
                RowChange::delete(row(2, "b")),
            ],
        );
        assert_eq!(
            event_to_sql(&mixed, &table).unwrap(),
            "DELETE FROM users WHERE (id) IN (\n\t(1),\n\t(2)\n) OR id IS NULL\n"
        );
    }

    #[test]
    fn test_invalid_key_offset() {
        let table = users().with_key_offset(5);
        let ev = event(EventType::DeleteRowsV2, vec![RowChange::delete(row(1, "a"))]);
        assert!(matches!(
            event_to_sql(&ev, &table),
            Err(RenderError::InvalidKeyOffset {
                offset: 5,
                width: 2,
                ..
            })
        ));
    }
}
