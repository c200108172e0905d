//! Integration tests driving full solve sessions through the Rust API

use satbridge::{Config, ConfigStatus, Problem, ResultCollector, ResultState, Session};

fn valid_config(args: &str) -> Config {
    let mut config = Config::new();
    config.configure(args, 128);
    assert_eq!(config.status(), ConfigStatus::Valid);
    config
}

/// Checks that a `;`-separated signed-literal assignment satisfies every
/// clause of a DIMACS formula
fn satisfies(assignment: &str, dimacs: &str) -> bool {
    let lits: Vec<i32> = assignment
        .split(';')
        .map(|tok| tok.parse().expect("malformed literal token"))
        .collect();
    let cnf = satbridge::dimacs::parse_cnf(dimacs).expect("test formula must parse");
    cnf.clauses.iter().all(|clause| {
        clause
            .iter()
            .any(|l| lits.contains(&l.to_ipasir()))
    })
}

#[test]
fn solve_sat_scenario() {
    let dimacs = "p cnf 2 2\n1 2 0\n-1 -2 0\n";
    let config = valid_config("");
    let mut problem = Problem::new(dimacs);
    let mut result = ResultCollector::new();
    let mut session = Session::new();
    session.solve(&mut problem, &config, &mut result);

    assert!(problem.status());
    assert_eq!(result.state(), ResultState::Sat);
    let assignment = result.assignment_string();
    // exactly one literal per variable, in variable order
    assert_eq!(assignment.split(';').count(), 2);
    assert!(satisfies(&assignment, dimacs));
    assert!(!session.was_interrupted());
}

#[test]
fn solve_unsat_scenario() {
    let config = valid_config("");
    let mut problem = Problem::new("p cnf 1 2\n1 0\n-1 0\n");
    let mut result = ResultCollector::new();
    let mut session = Session::new();
    session.solve(&mut problem, &config, &mut result);

    assert!(problem.status());
    assert_eq!(result.state(), ResultState::Unsat);
    assert_eq!(result.assignment_string(), "");
}

#[test]
fn solve_never_leaves_unknown() {
    for dimacs in [
        "p cnf 2 2\n1 2 0\n-1 -2 0\n",
        "p cnf 1 2\n1 0\n-1 0\n",
        "p cnf 0 0\n",
        "not even dimacs\n",
    ] {
        let config = valid_config("");
        let mut problem = Problem::new(dimacs);
        let mut result = ResultCollector::new();
        let mut session = Session::new();
        session.solve(&mut problem, &config, &mut result);
        assert_ne!(result.state(), ResultState::Unknown, "input: {dimacs:?}");
    }
}

#[test]
fn accessors_are_idempotent() {
    let config = valid_config("");
    let mut problem = Problem::new("p cnf 2 2\n1 2 0\n-1 -2 0\n");
    let mut result = ResultCollector::new();
    let mut session = Session::new();
    session.solve(&mut problem, &config, &mut result);

    let state = result.state();
    let assignment = result.assignment_string();
    let warning = result.warning().to_string();
    for _ in 0..3 {
        assert_eq!(result.state(), state);
        assert_eq!(result.assignment_string(), assignment);
        assert_eq!(result.warning(), warning);
    }
}

#[test]
fn configured_session_solves() {
    let config = valid_config("--rnd-init --seed 42 --restart-first 50");
    let dimacs = "p cnf 3 4\n1 2 0\n-1 3 0\n-2 -3 0\n1 3 0\n";
    let mut problem = Problem::new(dimacs);
    let mut result = ResultCollector::new();
    let mut session = Session::new();
    session.solve(&mut problem, &config, &mut result);

    assert_eq!(result.state(), ResultState::Sat);
    assert!(satisfies(&result.assignment_string(), dimacs));
}

#[test]
fn collector_reuse_overwrites() {
    let config = valid_config("");
    let mut result = ResultCollector::new();
    let mut session = Session::new();

    let mut sat = Problem::new("p cnf 2 2\n1 2 0\n-1 -2 0\n");
    session.solve(&mut sat, &config, &mut result);
    assert_eq!(result.state(), ResultState::Sat);
    assert!(!result.assignment_string().is_empty());

    let mut unsat = Problem::new("p cnf 1 2\n1 0\n-1 0\n");
    session.solve(&mut unsat, &config, &mut result);
    assert_eq!(result.state(), ResultState::Unsat);
    // the stale model from the first solve must not leak out
    assert_eq!(result.assignment_string(), "");
}

#[test]
fn collector_reuse_after_read_failure() {
    let config = valid_config("");
    let mut result = ResultCollector::new();
    let mut session = Session::new();

    let mut sat = Problem::new("p cnf 2 2\n1 2 0\n-1 -2 0\n");
    session.solve(&mut sat, &config, &mut result);
    assert_eq!(result.state(), ResultState::Sat);

    // a failed read must also overwrite the earlier satisfiable outcome
    let mut bad = Problem::new("garbage\n");
    session.solve(&mut bad, &config, &mut result);
    assert_eq!(result.state(), ResultState::Unsat);
    assert_eq!(result.assignment_string(), "");
}

#[test]
fn empty_formula_is_trivially_sat() {
    let config = valid_config("");
    let mut problem = Problem::new("p cnf 0 0\n");
    let mut result = ResultCollector::new();
    let mut session = Session::new();
    session.solve(&mut problem, &config, &mut result);

    // satisfiable, but there are no variables to assign
    assert_eq!(result.state(), ResultState::Sat);
    assert_eq!(result.assignment_string(), "");
}

#[test]
fn session_reuse_sequential_solves() {
    let config = valid_config("");
    let mut session = Session::new();
    for _ in 0..2 {
        let mut problem = Problem::new("p cnf 2 2\n1 2 0\n-1 -2 0\n");
        let mut result = ResultCollector::new();
        session.solve(&mut problem, &config, &mut result);
        assert_eq!(result.state(), ResultState::Sat);
    }
}

#[test]
fn interrupt_then_solve() {
    let config = valid_config("");
    let mut problem = Problem::new("p cnf 2 2\n1 2 0\n-1 -2 0\n");
    let mut result = ResultCollector::new();
    let mut session = Session::new();

    // interrupt from another thread before the solve starts
    let interrupter = session.interrupter();
    std::thread::spawn(move || interrupter.interrupt())
        .join()
        .unwrap();

    assert!(session.was_interrupted());
    session.solve(&mut problem, &config, &mut result);
    // the outcome is normalized, never left ambiguous
    assert_eq!(result.state(), ResultState::Unsat);
    // the flag persists; this session will not run cleanly again
    assert!(session.was_interrupted());
}

#[test]
fn unparsable_problem_reports_warning() {
    let config = valid_config("");
    let mut problem = Problem::new("garbage\n");
    let mut result = ResultCollector::new();
    let mut session = Session::new();
    session.solve(&mut problem, &config, &mut result);

    assert!(!problem.status());
    assert_eq!(result.state(), ResultState::Unsat);
    assert!(!result.warning().is_empty());
}
