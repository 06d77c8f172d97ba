//! binlog-replay library
//!
//! Renders decoded MySQL binlog rows events as SQL text, one statement (or
//! statement group, for multi-row updates) per event.
//!
//! The rendering itself lives in the `binlog-sql` crate; this crate is the
//! driver that reads events from JSON Lines, resolves table ids through a
//! YAML catalog, and writes the SQL out.
//!
//! # CLI Usage
//!
//! ```bash
//! # Render to stdout
//! binlog-replay render --events events.jsonl --catalog catalog.yaml
//!
//! # Render to a file, skipping non-row events, for a NO_BACKSLASH_ESCAPES target
//! binlog-replay render --events events.jsonl --catalog catalog.yaml \
//!   --output replay.sql --skip-unsupported --no-backslash-escapes
//!
//! # Validate a catalog
//! binlog-replay check-catalog --catalog catalog.yaml
//! ```

pub mod replay;

pub use replay::{render_events, run_render, RenderOpts, RenderSummary};
