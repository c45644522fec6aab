//! OpenTelemetry tracing with file-based span export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → JSON lines
//! ```
//!
//! Spans are written one JSON object per line to
//! `<data dir>/homescout-traces.json` (`~/.local/share/homescout` on Linux).
//! The file rotates at 10 MB and keeps three numbered backups.
//!
//! The filter is `trace_level` from the configuration file, overridable with
//! `HOMESCOUT_TRACE_LEVEL`, and defaults to `"info"`. It accepts any
//! [`EnvFilter`](tracing_subscriber::EnvFilter) directive such as
//! `homescout=debug,reqwest=warn`.
//!
//! Backend requests carry their caller's trace context across the worker
//! boundary (see [`crate::worker::TraceContext`]), so a request span is a child
//! of the event span that issued it.

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use file_writer::{RotatingFileWriter, RotationPolicy};
pub use init::{init_tracing, TRACE_FILE_NAME};
