//! # Parsing DIMACS CNF Input
//!
//! Internal module containing functions for parsing DIMACS CNF text.
//! The approach is to accept input, even if it is not technically in spec, as
//! long as it is still reasonable.
//!
//! ## References
//!
//! - [DIMACS CNF](http://www.satcompetition.org/2011/format-benchmarks2011.html)

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{i32, multispace0, multispace1, u64},
    combinator::{all_consuming, map_res, recognize, success},
    error::{Error as NomError, ErrorKind, ParseError},
    multi::separated_list0,
    sequence::{pair, terminated, tuple},
    IResult,
};
use thiserror::Error;

use crate::types::{Clause, Lit};

/// A formula read from DIMACS CNF text, together with the counts the preamble
/// announced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    /// The number of variables, as specified by the `p` line
    pub n_vars: u32,
    /// The number of clauses, as specified by the `p` line
    pub n_clauses: usize,
    /// The clauses in the body
    pub clauses: Vec<Clause>,
}

/// Errors occurring within the DIMACS parsing module
#[derive(Error, Debug, PartialEq)]
pub enum Error {
    /// Invalid literal in the file
    #[error("invalid literal: {0}")]
    Lit(String),
    /// Invalid ending of a clause
    #[error("invalid clause ending: {0}")]
    ClauseEnding(String),
    /// The preamble never ended
    #[error("preamble never ends")]
    PreambleNoEnd,
    /// P line value is too large to fit the target type
    #[error("value in p-line too large: {0}")]
    PValTooLarge(u64),
    /// Invalid p line
    #[error("invalid p-line: {0}")]
    PLine(String),
    /// Base error from nom parsing
    #[error("nom error: {0} ({1:?})")]
    NomError(String, ErrorKind),
    /// Incomplete nom error
    #[error("nom parser requested more data")]
    NomIncomplete,
}

impl ParseError<&str> for Error {
    fn from_error_kind(input: &str, kind: ErrorKind) -> Self {
        Self::NomError(String::from(input), kind)
    }

    fn append(_: &str, _: ErrorKind, other: Self) -> Self {
        // Other error always has precedence. This should prefer more
        // meaningful errors than [`Error::NomError`]
        other
    }
}

fn unwrap_dimacs_error(err: nom::Err<Error>) -> Error {
    match err {
        nom::Err::Incomplete(_) => Error::NomIncomplete,
        nom::Err::Error(e) | nom::Err::Failure(e) => e,
    }
}

/// Parses an in-memory DIMACS CNF instance
///
/// # Errors
///
/// If the input cannot be reasonably interpreted as CNF, returns an [`Error`]
/// describing the first offending line.
pub fn parse_cnf(input: &str) -> Result<Cnf, Error> {
    let mut lines = input.lines();
    let (n_vars, n_clauses) = loop {
        let Some(line) = lines.next() else {
            return Err(Error::PreambleNoEnd);
        };
        if line.starts_with('c') || line.trim().is_empty() {
            continue;
        }
        if line.starts_with('p') {
            let (_, header) = parse_p_line(line).map_err(unwrap_dimacs_error)?;
            break header;
        }
        return Err(Error::PLine(String::from(line)));
    };
    let mut cnf = Cnf {
        n_vars,
        n_clauses,
        clauses: Vec::with_capacity(n_clauses),
    };
    for line in lines {
        let (_, opt_clause) = parse_cnf_line(line).map_err(unwrap_dimacs_error)?;
        if let Some(clause) = opt_clause {
            cnf.clauses.push(clause);
        }
    }
    Ok(cnf)
}

/// Parses the `p cnf <vars> <clauses>` preamble line
fn parse_p_line(input: &str) -> IResult<&str, (u32, usize), Error> {
    let full_p_line = String::from(input);
    let (input, _) = terminated::<_, _, _, NomError<_>, _, _>(tag("p"), multispace1)(input)
        .map_err(|e| e.map(|_| Error::PLine(full_p_line.clone())))?;
    let (input, _) = terminated::<_, _, _, NomError<_>, _, _>(tag("cnf"), multispace1)(input)
        .map_err(|e| e.map(|_| Error::PLine(full_p_line.clone())))?;
    let (input, (n_vars, _, n_clauses)) =
        tuple::<_, _, NomError<_>, _>((u64, multispace1, u64))(input)
            .map_err(|e| e.map(|_| Error::PLine(full_p_line)))?;
    let Ok(n_vars) = u32::try_from(n_vars) else {
        return Err(nom::Err::Error(Error::PValTooLarge(n_vars)));
    };
    let Ok(n_clauses) = usize::try_from(n_clauses) else {
        return Err(nom::Err::Error(Error::PValTooLarge(n_clauses)));
    };
    Ok((input, (n_vars, n_clauses)))
}

/// Parses a CNF line, either a comment or a clause
fn parse_cnf_line(input: &str) -> IResult<&str, Option<Clause>, Error> {
    let (input, _) = multispace0(input)?;
    if input.trim().is_empty() {
        // Tolerate empty lines
        return Ok((input, None));
    }
    match tag::<&str, &str, NomError<&str>>("c")(input) {
        Ok((input, _)) => Ok((input, None)),
        Err(_) => {
            // Line is not a comment
            let (input, clause) =
                terminated(separated_list0(multispace1, parse_lit), parse_clause_ending)(input)?;
            Ok((input, Some(clause)))
        }
    }
}

/// Nuclear parser for literal
fn parse_lit(input: &str) -> IResult<&str, Lit, Error> {
    map_res(i32, Lit::from_ipasir)(input)
        .map_err(|e| e.map(|e: NomError<&str>| Error::Lit(String::from(e.input))))
}

/// Parses the end of a clause
/// A '0' followed by whitespace, a bare '0' at the end of the line, as well as
/// a line ending without '0' are treated as valid clause endings.
/// This is more lean than the file format spec.
fn parse_clause_ending(input: &str) -> IResult<&str, &str, Error> {
    recognize(pair(
        multispace0,
        alt((
            recognize(all_consuming(success(""))),
            recognize(all_consuming(tag("0"))),
            recognize(terminated(tag("0"), multispace1)),
        )),
    ))(input)
    .map_err(|e| e.map(|e: NomError<&str>| Error::ClauseEnding(String::from(e.input))))
}

#[cfg(test)]
mod tests {
    use super::{parse_clause_ending, parse_cnf, parse_cnf_line, parse_lit, parse_p_line, Error};
    use crate::types::Lit;

    fn ipasir_lit(val: i32) -> Lit {
        Lit::from_ipasir(val).unwrap()
    }

    #[test]
    fn parse_lit_pass() {
        assert_eq!(parse_lit("15 "), Ok((" ", ipasir_lit(15))));
        assert_eq!(parse_lit("-42 "), Ok((" ", ipasir_lit(-42))));
        assert_eq!(parse_lit("42 63"), Ok((" 63", ipasir_lit(42))));
    }

    #[test]
    fn parse_lit_fail() {
        assert_eq!(
            parse_lit("abc "),
            Err(nom::Err::Error(Error::Lit(String::from("abc "))))
        );
    }

    #[test]
    fn parse_clause_ending_pass() {
        assert_eq!(parse_clause_ending("0"), Ok(("", "0")));
        assert_eq!(parse_clause_ending(" 0"), Ok(("", " 0")));
        assert_eq!(parse_clause_ending(""), Ok(("", "")));
    }

    #[test]
    fn parse_p_line_pass() {
        assert_eq!(parse_p_line("p cnf 23 42"), Ok(("", (23, 42))));
        assert_eq!(parse_p_line("p   cnf   0   0"), Ok(("", (0, 0))));
    }

    #[test]
    fn parse_p_line_fail() {
        assert_eq!(
            parse_p_line("p wcnf 23 42"),
            Err(nom::Err::Error(Error::PLine(String::from("p wcnf 23 42"))))
        );
        assert_eq!(
            parse_p_line("q cnf 23 42"),
            Err(nom::Err::Error(Error::PLine(String::from("q cnf 23 42"))))
        );
    }

    #[test]
    fn parse_cnf_line_variants() {
        assert_eq!(parse_cnf_line("c a comment"), Ok((" a comment", None)));
        assert_eq!(parse_cnf_line("   "), Ok(("", None)));
        assert_eq!(
            parse_cnf_line("1 -2 3 0"),
            Ok((
                "",
                Some(vec![ipasir_lit(1), ipasir_lit(-2), ipasir_lit(3)])
            ))
        );
        // 0-less ending at end of line is tolerated
        assert_eq!(
            parse_cnf_line("1 -2"),
            Ok(("", Some(vec![ipasir_lit(1), ipasir_lit(-2)])))
        );
    }

    #[test]
    fn parse_cnf_pass() {
        let input = "c example\n\np cnf 2 2\n1 2 0\n-1 -2 0\n";
        let cnf = parse_cnf(input).unwrap();
        assert_eq!(cnf.n_vars, 2);
        assert_eq!(cnf.n_clauses, 2);
        assert_eq!(
            cnf.clauses,
            vec![
                vec![ipasir_lit(1), ipasir_lit(2)],
                vec![ipasir_lit(-1), ipasir_lit(-2)],
            ]
        );
    }

    #[test]
    fn parse_cnf_fail() {
        assert_eq!(parse_cnf("c only comments\n"), Err(Error::PreambleNoEnd));
        assert_eq!(
            parse_cnf("1 2 0\n"),
            Err(Error::PLine(String::from("1 2 0")))
        );
        // the list parser backtracks at `abc`, so the clause ending is at fault
        assert!(matches!(
            parse_cnf("p cnf 2 1\n1 abc 0\n"),
            Err(Error::ClauseEnding(_))
        ));
    }

    #[test]
    fn parse_cnf_deterministic() {
        let input = "p cnf 3 2\n1 -3 0\n2 3 0\n";
        assert_eq!(parse_cnf(input), parse_cnf(input));
    }
}
