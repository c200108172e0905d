//! # satbridge - A Session Bridge to a SAT Solving Engine
//!
//! `satbridge` exposes a SAT-solving session to host runtimes that cannot
//! link the engine's native object model directly. Four cooperating session
//! objects make up one solve: a [`Config`] owning a parsed engine
//! configuration, a [`Problem`] owning DIMACS CNF text, a [`ResultCollector`]
//! receiving engine events, and a [`Session`] coordinating the search and the
//! cross-thread interrupt protocol.
//!
//! The actual satisfiability search is performed by an external engine
//! ([BatSat](https://github.com/c-cube/batsat)), consumed only through the
//! narrow adapter in [`engine`].
//!
//! Foreign callers use the C-ABI layer in the `satbridge-capi` crate, which
//! wraps each of the session objects in an opaque handle. Rust callers can
//! drive the session objects directly:
//!
//! ```
//! use satbridge::{Config, ConfigStatus, Problem, ResultCollector, ResultState, Session};
//!
//! let mut config = Config::new();
//! config.configure("", 128);
//! assert_eq!(config.status(), ConfigStatus::Valid);
//! let mut problem = Problem::new("p cnf 2 2\n1 2 0\n-1 -2 0\n");
//! let mut result = ResultCollector::new();
//! let mut session = Session::new();
//! session.solve(&mut problem, &config, &mut result);
//! assert_eq!(result.state(), ResultState::Sat);
//! ```
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod dimacs;
pub mod engine;
pub mod problem;
pub mod results;
pub mod session;
pub mod types;

pub use config::{Config, ConfigStatus};
pub use problem::Problem;
pub use results::{ResultCollector, ResultState, SolveEvents};
pub use session::{Interrupter, Session};
