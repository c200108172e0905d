//! # Interface to the External Solving Engine
//!
//! This module is the only place that talks to the engine performing the
//! actual satisfiability search ([BatSat](https://github.com/c-cube/batsat),
//! a CDCL solver fully implemented in Rust). The rest of the bridge consumes
//! it through four narrow entry points: argument parsing into an
//! [`EngineConfig`], DIMACS ingestion via [`Engine::load`], search via
//! [`Engine::solve`], and cooperative termination via the stop flag wired
//! into the engine's check points.

use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use anyhow::Context;
use batsat::{lbool, Callbacks, SolverInterface, SolverOpts};
use clap::Parser;
use log::debug;

use crate::{
    dimacs,
    results::SolveEvents,
    types::{Assignment, TernaryVal},
};

/// Return value for solving queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverResult {
    /// The query was found satisfiable.
    Sat,
    /// The query was found unsatisfiable.
    Unsat,
    /// The query was prematurely interrupted.
    Interrupted,
}

impl fmt::Display for SolverResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverResult::Sat => write!(f, "SAT"),
            SolverResult::Unsat => write!(f, "UNSAT"),
            SolverResult::Interrupted => write!(f, "Interrupted"),
        }
    }
}

/// The engine's argv-style option grammar.
///
/// Options and defaults mirror the minisat-family command line that the
/// engine descends from. Help and version handling are disabled since tokens
/// are forwarded from a host runtime, not typed by a user.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "satbridge",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct EngineArgs {
    /// Variable activity decay factor
    #[arg(long = "var-decay", default_value_t = 0.95)]
    var_decay: f64,
    /// Clause activity decay factor
    #[arg(long = "cla-decay", default_value_t = 0.999)]
    clause_decay: f64,
    /// Frequency of random decisions
    #[arg(long = "rnd-freq", default_value_t = 0.0)]
    random_var_freq: f64,
    /// Seed for the random number generator
    #[arg(long = "seed", default_value_t = 91_648_253.0)]
    random_seed: f64,
    /// Conflict clause minimization mode (0=none, 1=basic, 2=deep)
    #[arg(long = "ccmin-mode", default_value_t = 2)]
    ccmin_mode: i32,
    /// Phase saving mode (0=none, 1=limited, 2=full)
    #[arg(long = "phase-saving", default_value_t = 2)]
    phase_saving: i32,
    /// Initialize variable activities randomly
    #[arg(long = "rnd-init")]
    rnd_init_act: bool,
    /// Use geometric restarts instead of Luby restarts
    #[arg(long = "no-luby")]
    no_luby: bool,
    /// Number of conflicts before the first restart
    #[arg(long = "restart-first", default_value_t = 100)]
    restart_first: i32,
    /// Restart interval increase factor
    #[arg(long = "restart-inc", default_value_t = 2.0)]
    restart_inc: f64,
    /// Wasted memory fraction allowed before garbage collection
    #[arg(long = "gc-frac", default_value_t = 0.20)]
    garbage_frac: f64,
    /// Minimum limit on the number of learnt clauses
    #[arg(long = "min-learnts", default_value_t = 0)]
    min_learnts_lim: i32,
}

/// Errors from turning an argument token list into an [`EngineConfig`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    /// The token list did not parse; contains the engine's rendered diagnostic
    #[error("{0}")]
    Parse(String),
    /// The tokens parsed but a value is outside the range the engine accepts
    #[error("engine option value out of range")]
    OutOfRange,
}

/// A validated engine configuration, produced from an argv-style token list.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    args: EngineArgs,
}

impl EngineConfig {
    /// Parses an argv-style token list (program name first) into a validated
    /// configuration.
    ///
    /// # Errors
    ///
    /// [`ArgsError::Parse`] with the engine's diagnostic text if the tokens
    /// do not parse, [`ArgsError::OutOfRange`] if a value is outside the
    /// range the engine accepts.
    pub fn from_argv<'a, I>(argv: I) -> Result<EngineConfig, ArgsError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let args =
            EngineArgs::try_parse_from(argv).map_err(|err| ArgsError::Parse(err.to_string()))?;
        let config = EngineConfig { args };
        if !config.solver_opts().check() {
            return Err(ArgsError::OutOfRange);
        }
        Ok(config)
    }

    /// Builds the engine's option block from the parsed arguments
    fn solver_opts(&self) -> SolverOpts {
        let mut opts = SolverOpts::default();
        opts.var_decay = self.args.var_decay;
        opts.clause_decay = self.args.clause_decay;
        opts.random_var_freq = self.args.random_var_freq;
        opts.random_seed = self.args.random_seed;
        opts.ccmin_mode = self.args.ccmin_mode;
        opts.phase_saving = self.args.phase_saving;
        opts.rnd_init_act = self.args.rnd_init_act;
        opts.luby_restart = !self.args.no_luby;
        opts.restart_first = self.args.restart_first;
        opts.restart_inc = self.args.restart_inc;
        opts.garbage_frac = self.args.garbage_frac;
        opts.min_learnts_lim = self.args.min_learnts_lim;
        opts
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            args: EngineArgs::parse_from(["satbridge"]),
        }
    }
}

/// Callbacks hooking a session's interrupt flag into the engine's cooperative
/// check points
struct SessionCallbacks {
    stop: Arc<AtomicBool>,
}

impl Callbacks for SessionCallbacks {
    fn stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

/// One instance of the external solving engine, holding the solving context a
/// problem is read into.
pub struct Engine {
    solver: batsat::Solver<SessionCallbacks>,
    /// Variable range of the loaded formula; the model covers exactly these
    n_vars: u32,
}

impl Engine {
    /// Creates an engine instance from a configuration, with its cooperative
    /// check points observing `stop`.
    #[must_use]
    pub fn new(config: &EngineConfig, stop: Arc<AtomicBool>) -> Engine {
        Engine {
            solver: batsat::Solver::new(config.solver_opts(), SessionCallbacks { stop }),
            n_vars: 0,
        }
    }

    /// Reads a DIMACS CNF formula into the solving context.
    ///
    /// Non-fatal oddities (clause count not matching the preamble, variables
    /// beyond the declared range) are reported as warnings through `sink`.
    ///
    /// # Errors
    ///
    /// If the text cannot be interpreted as DIMACS CNF.
    pub fn load(&mut self, text: &str, sink: &mut dyn SolveEvents) -> anyhow::Result<()> {
        let cnf = dimacs::parse_cnf(text).context("reading the DIMACS input failed")?;
        if cnf.clauses.len() != cnf.n_clauses {
            sink.on_warning(&format!(
                "preamble announces {} clauses but {} were read",
                cnf.n_clauses,
                cnf.clauses.len()
            ));
        }
        self.n_vars = cnf.n_vars;
        let max_var = cnf
            .clauses
            .iter()
            .flatten()
            .map(|l| l.vidx32() + 1)
            .max()
            .unwrap_or(0);
        if max_var > cnf.n_vars {
            sink.on_warning(&format!(
                "preamble announces {} variables but variable {} occurs",
                cnf.n_vars, max_var
            ));
            self.n_vars = max_var;
        }
        debug!(
            "loaded formula: {} variables, {} clauses",
            self.n_vars,
            cnf.clauses.len()
        );
        for clause in &cnf.clauses {
            let mut c: Vec<_> = clause
                .iter()
                .map(|l| batsat::Lit::new(self.solver.var_of_int(l.vidx32() + 1), l.is_pos()))
                .collect();
            self.solver.add_clause_reuse(&mut c);
        }
        Ok(())
    }

    /// Runs the search over the loaded formula.
    ///
    /// When a model is found, one `on_model` event is delivered through
    /// `sink`, synchronously on the calling thread, before this returns.
    pub fn solve(&mut self, sink: &mut dyn SolveEvents) -> SolverResult {
        debug!("starting search over {} variables", self.n_vars);
        let ret = match self.solver.solve_limited(&[]) {
            v if v == lbool::TRUE => {
                let model = self.model();
                sink.on_model(&model);
                SolverResult::Sat
            }
            v if v == lbool::FALSE => SolverResult::Unsat,
            v if v == lbool::UNDEF => SolverResult::Interrupted,
            _ => unreachable!(),
        };
        debug!("search done: {}", ret);
        ret
    }

    /// Reads the values of all formula variables from the engine's model,
    /// contiguous from variable 1
    fn model(&mut self) -> Assignment {
        (1..=self.n_vars)
            .map(|v| {
                let var = self.solver.var_of_int(v);
                match self.solver.value_var(var) {
                    x if x == lbool::TRUE => TernaryVal::True,
                    x if x == lbool::FALSE => TernaryVal::False,
                    x if x == lbool::UNDEF => TernaryVal::DontCare,
                    _ => unreachable!(),
                }
            })
            .collect()
    }
}
