//! # Problem Instances
//!
//! A [`Problem`] owns the raw DIMACS text of one formula. The text is
//! immutable after construction; the read into a solving context happens
//! during solve and records a boolean outcome the caller can poll.

use crate::{engine::Engine, results::SolveEvents};

/// Owner of one formula in DIMACS CNF text form.
#[derive(Debug, Clone)]
pub struct Problem {
    dimacs: String,
    status: Option<bool>,
}

impl Problem {
    /// Creates a problem from DIMACS CNF text
    pub fn new<S: Into<String>>(dimacs: S) -> Self {
        Self {
            dimacs: dimacs.into(),
            status: None,
        }
    }

    /// Reads the stored text into the given solving context, recording and
    /// returning whether the read succeeded. Reading the same text is
    /// deterministic, so re-reading into a fresh context for a later solve
    /// yields the same structural result.
    ///
    /// A failed read leaves its diagnostic as a warning on `sink`.
    pub fn read(&mut self, engine: &mut Engine, sink: &mut dyn SolveEvents) -> bool {
        let ok = match engine.load(&self.dimacs, sink) {
            Ok(()) => true,
            Err(err) => {
                sink.on_warning(&format!("{err:#}"));
                false
            }
        };
        self.status = Some(ok);
        ok
    }

    /// Gets the outcome of the last read; `false` before the first read
    #[must_use]
    pub fn status(&self) -> bool {
        self.status.unwrap_or(false)
    }

    /// True iff [`Problem::read`] has run at least once
    #[must_use]
    pub fn has_been_read(&self) -> bool {
        self.status.is_some()
    }

    /// The stored DIMACS text
    #[must_use]
    pub fn dimacs(&self) -> &str {
        &self.dimacs
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{atomic::AtomicBool, Arc};

    use super::Problem;
    use crate::engine::{Engine, EngineConfig};
    use crate::results::ResultCollector;

    fn fresh_engine() -> Engine {
        Engine::new(&EngineConfig::default(), Arc::new(AtomicBool::new(false)))
    }

    #[test]
    fn read_ok() {
        let mut problem = Problem::new("p cnf 2 2\n1 2 0\n-1 -2 0\n");
        assert!(!problem.status());
        assert!(!problem.has_been_read());
        let mut collector = ResultCollector::new();
        assert!(problem.read(&mut fresh_engine(), &mut collector));
        assert!(problem.status());
        assert!(problem.has_been_read());
    }

    #[test]
    fn read_failure_recorded() {
        let mut problem = Problem::new("this is not dimacs\n");
        let mut collector = ResultCollector::new();
        assert!(!problem.read(&mut fresh_engine(), &mut collector));
        assert!(!problem.status());
        assert!(problem.has_been_read());
        assert!(!collector.warning().is_empty());
    }

    #[test]
    fn reread_is_deterministic() {
        let mut problem = Problem::new("p cnf 1 1\n1 0\n");
        let mut collector = ResultCollector::new();
        assert!(problem.read(&mut fresh_engine(), &mut collector));
        assert!(problem.read(&mut fresh_engine(), &mut collector));
        assert!(problem.status());
    }
}
