//! Event replay driver: JSON Lines rows events → SQL text.
//!
//! Each non-blank input line is one serialized [`RawRowEvent`]. Events are
//! rendered in input order and written out as they are produced, so the
//! output preserves binlog order.
//!
//! Every event's SQL is written terminated by `;\n`, so the output can be
//! piped straight into a MySQL client. With `--output`, SQL goes to a
//! temporary file next to the target that is renamed into place only after
//! every event rendered; a failed run leaves the target as it was.

use anyhow::{Context, Result};
use binlog_core::{RawRowEvent, TableCatalog};
use binlog_sql::{event_to_sql_with_options, EscapeMode, RenderError, RenderOptions};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Options for the `render` command
#[derive(Parser, Clone, Debug)]
pub struct RenderOpts {
    /// JSON Lines file with one decoded rows event per line
    #[arg(long, env = "BINLOG_REPLAY_EVENTS")]
    pub events: PathBuf,

    /// YAML table catalog mapping table ids to names, columns and key offsets
    #[arg(long, env = "BINLOG_REPLAY_CATALOG")]
    pub catalog: PathBuf,

    /// Write SQL to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Only double single quotes in string literals (NO_BACKSLASH_ESCAPES / ANSI targets)
    #[arg(long)]
    pub no_backslash_escapes: bool,

    /// Skip events that are not rows events instead of failing
    #[arg(long)]
    pub skip_unsupported: bool,
}

impl RenderOpts {
    /// Literal rendering options selected by the flags.
    pub fn render_options(&self) -> RenderOptions {
        let escape = if self.no_backslash_escapes {
            EscapeMode::NoBackslashEscapes
        } else {
            EscapeMode::Backslash
        };
        RenderOptions::default().with_escape(escape)
    }
}

/// Counters for one render run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    /// Events read from the input
    pub events: usize,
    /// Events rendered as SQL
    pub rendered: usize,
    /// Non-row events skipped
    pub skipped: usize,
    /// Rows covered by the rendered events
    pub rows: usize,
}

/// Render every event from `reader` and write the SQL to `writer`.
///
/// Stops at the first event that cannot be rendered. With `skip_unsupported`,
/// events that are not rows events are logged and skipped instead.
pub fn render_events<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    catalog: &TableCatalog,
    options: &RenderOptions,
    skip_unsupported: bool,
) -> Result<RenderSummary> {
    let mut summary = RenderSummary::default();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("Failed to read event line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let event: RawRowEvent = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse event on line {line_no}"))?;
        summary.events += 1;
        debug!("Line {line_no}: {event}");

        if !event.header.event_type.is_row_event() {
            if skip_unsupported {
                warn!("Skipping {event} on line {line_no}: not a rows event");
                summary.skipped += 1;
                continue;
            }
            return Err(RenderError::UnsupportedEventKind {
                event_type: event.header.event_type,
            })
            .with_context(|| format!("Cannot render event on line {line_no}"));
        }

        let table = catalog
            .require(event.table_id)
            .with_context(|| format!("Cannot resolve table for {event} on line {line_no}"))?;
        let sql = event_to_sql_with_options(&event, table, options)
            .with_context(|| format!("Failed to render {event} on line {line_no}"))?;

        write_statement(writer, &sql).context("Failed to write SQL output")?;

        summary.rendered += 1;
        summary.rows += event.rows.len();
        if summary.rendered % 1000 == 0 {
            info!("Rendered {} events", summary.rendered);
        }
    }

    writer.flush().context("Failed to flush SQL output")?;
    Ok(summary)
}

/// Write one event's SQL followed by a statement terminator.
///
/// UPDATE groups already end every statement with `;`, so only the missing
/// terminator is added.
fn write_statement<W: Write>(writer: &mut W, sql: &str) -> io::Result<()> {
    let statement = sql.trim_end_matches('\n');
    writer.write_all(statement.as_bytes())?;
    if !statement.ends_with(';') {
        writer.write_all(b";")?;
    }
    writer.write_all(b"\n")
}

/// Render into a temporary file beside `path`, then move it into place.
fn render_to_file<R: BufRead>(
    reader: R,
    path: &Path,
    catalog: &TableCatalog,
    options: &RenderOptions,
    skip_unsupported: bool,
) -> Result<RenderSummary> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staging = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary output file in {dir:?}"))?;

    let mut writer = BufWriter::new(staging);
    let summary = render_events(reader, &mut writer, catalog, options, skip_unsupported)?;
    let staging = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("Failed to flush SQL output")?;
    staging
        .persist(path)
        .with_context(|| format!("Failed to move rendered SQL to {path:?}"))?;
    Ok(summary)
}

/// Run the `render` command.
pub fn run_render(opts: &RenderOpts) -> Result<RenderSummary> {
    let catalog = TableCatalog::from_file(&opts.catalog)
        .with_context(|| format!("Failed to load table catalog from {:?}", opts.catalog))?;
    info!("Loaded {} table(s) from catalog", catalog.len());

    let input = File::open(&opts.events)
        .with_context(|| format!("Failed to open events file {:?}", opts.events))?;
    let reader = BufReader::new(input);
    let options = opts.render_options();

    let summary = match &opts.output {
        Some(path) => render_to_file(reader, path, &catalog, &options, opts.skip_unsupported)?,
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            render_events(reader, &mut writer, &catalog, &options, opts.skip_unsupported)?
        }
    };

    info!(
        "Rendered {} of {} events ({} rows, {} skipped)",
        summary.rendered, summary.events, summary.rows, summary.skipped
    );
    Ok(summary)
}
