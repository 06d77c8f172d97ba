//! Row set rendering.
//!
//! A row set is the block of parenthesized rows shared by the statement
//! shapes:
//!
//! ```text
//! \t(1,'a'),
//! \t(2,'b')
//! ```
//!
//! Rows are emitted in the order given. Column literals come from
//! [`column_to_sql_with_options`]; the first formatter error aborts the whole
//! row set.

use crate::error::{RenderError, Result};
use crate::literal::{column_to_sql_with_options, RenderOptions};
use binlog_core::{ColumnValue, TableMetadata};
use tracing::trace;

/// Render one row as `(<c1>,<c2>,...)`.
pub fn render_row(row: &[ColumnValue], options: &RenderOptions) -> Result<String> {
    let literals = row
        .iter()
        .map(|value| column_to_sql_with_options(value, options))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("({})", literals.join(",")))
}

/// Render rows as tab-indented tuples joined by `,\n`, with no trailing
/// separator.
pub fn render_row_set<'a, I>(rows: I, options: &RenderOptions) -> Result<String>
where
    I: IntoIterator<Item = &'a [ColumnValue]>,
{
    let mut rendered = Vec::new();
    for row in rows {
        rendered.push(format!("\t{}", render_row(row, options)?));
    }
    trace!(rows = rendered.len(), "Rendered row set");
    Ok(rendered.join(",\n"))
}

/// Render an INSERT-shaped statement:
/// `<verb><table><column list> VALUES \n<row set>\n`.
pub fn render_values_statement<'a, I>(
    verb: &str,
    table: &TableMetadata,
    rows: I,
    options: &RenderOptions,
) -> Result<String>
where
    I: IntoIterator<Item = &'a [ColumnValue]>,
{
    let body = render_row_set(rows, options)?;
    Ok(format!(
        "{verb}{}{} VALUES \n{body}\n",
        table.name,
        table.column_list()
    ))
}

/// Check that a row image has one value per table column.
pub fn check_row_width(table: &TableMetadata, row_index: usize, row: &[ColumnValue]) -> Result<()> {
    if row.len() == table.width() {
        Ok(())
    } else {
        Err(RenderError::MalformedRow {
            table: table.name.clone(),
            row: row_index,
            reason: format!(
                "{} column value(s) for column list {}",
                row.len(),
                table.column_list()
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> TableMetadata {
        TableMetadata::new("users", ["id", "name"])
    }

    #[test]
    fn test_render_row() {
        let row = vec![ColumnValue::Long(1), ColumnValue::text("a"), ColumnValue::Null];
        assert_eq!(
            render_row(&row, &RenderOptions::default()).unwrap(),
            "(1,'a',NULL)"
        );
    }

    #[test]
    fn test_render_row_set_separators() {
        let rows = [
            vec![ColumnValue::Long(1)],
            vec![ColumnValue::Long(2)],
            vec![ColumnValue::Long(3)],
        ];
        let body = render_row_set(rows.iter().map(Vec::as_slice), &RenderOptions::default())
            .unwrap();
        assert_eq!(body, "\t(1),\n\t(2),\n\t(3)");
    }

    #[test]
    fn test_render_values_statement() {
        let rows = [
            vec![ColumnValue::Long(1), ColumnValue::text("a")],
            vec![ColumnValue::Long(2), ColumnValue::text("b")],
        ];
        let sql = render_values_statement(
            "INSERT INTO ",
            &users(),
            rows.iter().map(Vec::as_slice),
            &RenderOptions::default(),
        )
        .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO users(id,name) VALUES \n\t(1,'a'),\n\t(2,'b')\n"
        );
    }

    #[test]
    fn test_formatter_errors_propagate() {
        let rows = [vec![ColumnValue::Long(1), ColumnValue::Decimal("1.0".into())]];
        let err = render_row_set(rows.iter().map(Vec::as_slice), &RenderOptions::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedColumnType { .. }));
    }

    #[test]
    fn test_check_row_width() {
        let table = users();
        assert!(check_row_width(&table, 0, &[ColumnValue::Long(1), ColumnValue::Null]).is_ok());

        let err = check_row_width(&table, 3, &[ColumnValue::Long(1)]).unwrap_err();
        match err {
            RenderError::MalformedRow { table, row, reason } => {
                assert_eq!(table, "users");
                assert_eq!(row, 3);
                assert!(reason.contains("(id,name)"), "Got: {reason}");
            }
            other => panic!("Expected MalformedRow, got {other:?}"),
        }
    }
}
