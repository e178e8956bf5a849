//! Structured logging and file-based OpenTelemetry trace export.
//!
//! ```text
//! tracing macros ─┬─▶ EnvFilter ─▶ fmt layer ─▶ stderr
//!                 └─▶ tracing-opentelemetry ─▶ SDK ─▶ FileSpanExporter ─▶ <data dir>/reelsearch-otlp.json
//! ```
//!
//! - Export is OTLP/JSON, one batch per line, readable by OTLP file receivers
//! - The file rotates at 10 MiB and three backups are kept
//! - Worker spans are parented to the span that issued the request, via the
//!   [`TraceContext`](crate::worker::TraceContext) carried in each message
//!
//! # Configuration
//!
//! Level resolution:
//! 1. `RUST_LOG`
//! 2. `trace_level` in [`Config`](crate::Config) (or `REELSEARCH_TRACE_LEVEL`)
//! 3. `info`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - `tracer`: File span exporter and tracer provider
//! - `span_formatter`: OTLP/JSON encoding
//! - `file_writer`: Size-based rotating writer

mod file_writer;
pub mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, TracingGuard};
