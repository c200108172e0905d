//! # Solve Sessions
//!
//! A [`Session`] is the facade coordinating one solve: it binds a
//! configuration and a problem to an owned engine instance, registers the
//! result collector as event sink for the duration of the call, and imposes
//! closed-world semantics on the outcome. It also carries the cross-thread
//! interrupt flag; [`Session::interrupt`] is the only operation meant to run
//! concurrently with an in-flight [`Session::solve`].

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::debug;

use crate::{
    config::Config,
    engine::{Engine, SolverResult},
    problem::Problem,
    results::{ResultCollector, ResultState},
};

/// Facade over the external engine for running solves.
///
/// A session may run multiple sequential solves. The interrupt flag is
/// monotonic for the life of the session and is deliberately *not* reset
/// between solves: a session that was interrupted once will not run cleanly
/// again, and callers wanting a clean slate must construct a new session.
pub struct Session {
    interrupted: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a new session with a cleared interrupt flag
    #[must_use]
    pub fn new() -> Self {
        Session {
            interrupted: Arc::new(AtomicBool::new(false)),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Runs one solve: reads `problem` into a fresh engine context built from
    /// `config`, runs the search with `result` as event sink, and finally
    /// normalizes every outcome other than a model to [`ResultState::Unsat`],
    /// so the caller never observes an ambiguous or stale state, even on a
    /// reused collector.
    ///
    /// Blocks the calling thread for the entire search. Events are delivered
    /// to `result` synchronously, on this thread, before the call returns. If
    /// `config` does not hold a valid configuration (callers are expected to
    /// check its status first), engine defaults are used.
    pub fn solve(&mut self, problem: &mut Problem, config: &Config, result: &mut ResultCollector) {
        self.running.store(true, Ordering::Relaxed);
        let engine_config = config.engine_config().cloned().unwrap_or_default();
        let mut engine = Engine::new(&engine_config, Arc::clone(&self.interrupted));
        let loaded = problem.read(&mut engine, result);
        let mut sat = false;
        if loaded && !self.interrupted.load(Ordering::Relaxed) {
            let res = engine.solve(result);
            debug!("engine returned {res}");
            sat = res == SolverResult::Sat;
        }
        // normalize from this solve's outcome; a reused collector may still
        // carry the state of an earlier solve
        if !sat {
            result.set_state(ResultState::Unsat);
        }
        self.running.store(false, Ordering::Relaxed);
    }

    /// Requests termination of any in-flight solve and marks the session
    /// interrupted. Idempotent and safe to call from any thread, including
    /// while another thread is inside [`Session::solve`]; the request is
    /// forwarded to the engine's cooperative check points, so cancellation
    /// latency is up to the engine. Returns whether a solve was in flight
    /// when the request landed.
    pub fn interrupt(&self) -> bool {
        self.interrupted.store(true, Ordering::Relaxed);
        self.running.load(Ordering::Relaxed)
    }

    /// True iff [`Session::interrupt`] has ever been called on this session.
    /// Safe to call from any thread.
    #[must_use]
    pub fn was_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Relaxed)
    }

    /// Gets a thread safe interrupter for this session, for callers that run
    /// [`Session::solve`] on a worker thread and keep `&mut` on the session
    /// there
    #[must_use]
    pub fn interrupter(&self) -> Interrupter {
        Interrupter {
            interrupted: Arc::clone(&self.interrupted),
            running: Arc::clone(&self.running),
        }
    }
}

/// A thread safe interrupter for a [`Session`]
#[derive(Clone)]
pub struct Interrupter {
    interrupted: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
}

impl Interrupter {
    /// Same as [`Session::interrupt`], without borrowing the session
    pub fn interrupt(&self) -> bool {
        self.interrupted.store(true, Ordering::Relaxed);
        self.running.load(Ordering::Relaxed)
    }

    /// Same as [`Session::was_interrupted`]
    #[must_use]
    pub fn was_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Relaxed)
    }
}
