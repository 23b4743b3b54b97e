//! Problem collection for one interpolation pass.

use deployable_domain::{Problem, Severity};

use crate::ports::DiagnosticSink;

/// Routes problems by severity and keeps the fatal ones.
///
/// Warnings and errors go straight to the sink and are not retained. Fatal
/// problems are kept in arrival order so the engine can decide, once the
/// whole document has been visited, whether the pass fails.
pub struct ProblemCollector<'s> {
    sink: &'s dyn DiagnosticSink,
    fatal: Vec<Problem>,
}

impl<'s> ProblemCollector<'s> {
    /// Creates a collector reporting to the given sink.
    #[must_use]
    pub fn new(sink: &'s dyn DiagnosticSink) -> Self {
        Self {
            sink,
            fatal: Vec::new(),
        }
    }

    /// Records a problem.
    pub fn add(&mut self, problem: Problem) {
        let cause = problem
            .cause()
            .map(|c| c as &(dyn std::error::Error + 'static));

        match problem.severity() {
            Severity::Warning => self.sink.warn(problem.message(), cause),
            Severity::Error => self.sink.error(problem.message(), cause),
            Severity::Fatal => self.fatal.push(problem),
        }
    }

    /// Returns the fatal problems recorded so far.
    #[must_use]
    pub fn fatal(&self) -> &[Problem] {
        &self.fatal
    }

    /// Consumes the collector, returning the fatal problems.
    #[must_use]
    pub fn into_fatal(self) -> Vec<Problem> {
        self.fatal
    }
}

impl std::fmt::Debug for ProblemCollector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProblemCollector")
            .field("fatal", &self.fatal)
            .finish_non_exhaustive()
    }
}
