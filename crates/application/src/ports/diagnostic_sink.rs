//! Diagnostic sink port

use std::error::Error;
use std::sync::{Mutex, PoisonError};

use deployable_domain::Severity;

/// Port receiving non-fatal resolution problems.
///
/// Implementations must be usable from any thread; the interpolation core
/// only ever calls them from the thread running the pass.
pub trait DiagnosticSink: Send + Sync {
    /// Reports a warning.
    fn warn(&self, message: &str, cause: Option<&(dyn Error + 'static)>);

    /// Reports an error that does not abort resolution.
    fn error(&self, message: &str, cause: Option<&(dyn Error + 'static)>);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &T {
    fn warn(&self, message: &str, cause: Option<&(dyn Error + 'static)>) {
        (**self).warn(message, cause);
    }

    fn error(&self, message: &str, cause: Option<&(dyn Error + 'static)>) {
        (**self).error(message, cause);
    }
}

/// A diagnostic captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// `Warning` or `Error`.
    pub severity: Severity,
    /// The reported message.
    pub message: String,
    /// The rendered cause, if one was given.
    pub cause: Option<String>,
}

/// Sink that keeps every diagnostic in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    /// Returns the recorded diagnostics of one severity.
    #[must_use]
    pub fn with_severity(&self, severity: Severity) -> Vec<Diagnostic> {
        self.lock()
            .iter()
            .filter(|d| d.severity == severity)
            .cloned()
            .collect()
    }

    fn record(&self, severity: Severity, message: &str, cause: Option<&(dyn Error + 'static)>) {
        self.lock().push(Diagnostic {
            severity,
            message: message.to_string(),
            cause: cause.map(ToString::to_string),
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DiagnosticSink for RecordingSink {
    fn warn(&self, message: &str, cause: Option<&(dyn Error + 'static)>) {
        self.record(Severity::Warning, message, cause);
    }

    fn error(&self, message: &str, cause: Option<&(dyn Error + 'static)>) {
        self.record(Severity::Error, message, cause);
    }
}
