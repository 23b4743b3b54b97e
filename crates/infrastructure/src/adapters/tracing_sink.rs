//! Tracing diagnostic sink adapter

use std::error::Error;

use deployable_application::ports::DiagnosticSink;

/// Diagnostic sink that forwards problems to `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnosticSink;

impl TracingDiagnosticSink {
    /// Creates a new sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DiagnosticSink for TracingDiagnosticSink {
    fn warn(&self, message: &str, cause: Option<&(dyn Error + 'static)>) {
        match cause {
            Some(cause) => tracing::warn!(%cause, "{message}"),
            None => tracing::warn!("{message}"),
        }
    }

    fn error(&self, message: &str, cause: Option<&(dyn Error + 'static)>) {
        match cause {
            Some(cause) => tracing::error!(%cause, "{message}"),
            None => tracing::error!("{message}"),
        }
    }
}
