//! Adapters for application ports

mod tracing_sink;

pub use tracing_sink::TracingDiagnosticSink;
