//! # Result Collection
//!
//! During one solve the engine reports notable events through the
//! [`SolveEvents`] sink registered for the duration of that call.
//! [`ResultCollector`] is the sink handed out across the bridge boundary: it
//! accumulates the last model and warning and carries the terminal state the
//! caller polls after `solve` returns.

use std::fmt;

use crate::types::{Assignment, Lit};

/// Event sink invoked by the engine during one solve call.
///
/// The engine holds the sink only for the duration of that call and delivers
/// events synchronously on the solving thread.
pub trait SolveEvents {
    /// Called when the engine finds a model
    fn on_model(&mut self, model: &Assignment);
    /// Called when the engine raises a warning
    fn on_warning(&mut self, msg: &str);
}

/// Terminal state of one solve, with the discriminants exposed across the
/// bridge boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub enum ResultState {
    /// The query was found unsatisfiable, or the outcome was normalized to it.
    Unsat = 0,
    /// The query was found satisfiable.
    Sat = 1,
    /// No outcome has been recorded yet.
    Unknown = 3,
}

impl fmt::Display for ResultState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultState::Unsat => write!(f, "UNSAT"),
            ResultState::Sat => write!(f, "SAT"),
            ResultState::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Collects the outcome of one solve: terminal state, literal assignment, and
/// the last engine warning.
///
/// A collector may be reused across solves; a new model event overwrites the
/// prior assignment, it never accumulates.
#[derive(Debug, Clone)]
pub struct ResultCollector {
    state: ResultState,
    assignment: Vec<Lit>,
    warning: String,
}

impl Default for ResultCollector {
    fn default() -> Self {
        Self {
            state: ResultState::Unknown,
            assignment: Vec::new(),
            warning: String::new(),
        }
    }
}

impl ResultCollector {
    /// Creates a collector in the [`ResultState::Unknown`] state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the terminal state of the last solve
    #[must_use]
    pub fn state(&self) -> ResultState {
        self.state
    }

    /// Sets the terminal state. The session uses this after the engine
    /// returns to normalize an unresolved outcome to
    /// [`ResultState::Unsat`]; it is not an engine event.
    pub fn set_state(&mut self, state: ResultState) {
        self.state = state;
    }

    /// The literals of the last model, one per variable in variable order.
    /// Empty unless the state is [`ResultState::Sat`]. A formula over zero
    /// variables is satisfiable with an empty assignment, so the converse
    /// does not hold.
    #[must_use]
    pub fn assignment(&self) -> &[Lit] {
        if self.state() == ResultState::Sat {
            &self.assignment
        } else {
            &[]
        }
    }

    /// Renders the assignment as `;`-separated signed literals, no trailing
    /// separator. Empty unless the state is [`ResultState::Sat`].
    #[must_use]
    pub fn assignment_string(&self) -> String {
        self.assignment()
            .iter()
            .map(Lit::to_string)
            .collect::<Vec<_>>()
            .join(";")
    }

    /// The last warning the engine raised; empty if there was none
    #[must_use]
    pub fn warning(&self) -> &str {
        &self.warning
    }
}

impl SolveEvents for ResultCollector {
    fn on_model(&mut self, model: &Assignment) {
        self.assignment.clear();
        self.assignment.extend(model.literals());
        self.state = ResultState::Sat;
    }

    fn on_warning(&mut self, msg: &str) {
        // last warning wins
        self.warning.clear();
        self.warning.push_str(msg);
    }
}
