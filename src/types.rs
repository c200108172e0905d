//! # Common Types for the Session Bridge
//!
//! Literals cross the bridge boundary as IPASIR-style signed integers:
//! variable indexing starts from 1 and a negative value means negation.
//! Internally variables are indexed from 0.

use core::ffi::c_int;
use std::{fmt, ops};

use thiserror::Error;

/// A clause is a plain sequence of literals; the bridge never needs more
/// structure than that.
pub type Clause = Vec<Lit>;

/// Type representing a propositional literal.
///
/// The memory representation is a single `u32` holding `idx << 1` with the
/// last bit set iff the literal is negated.
#[derive(Hash, Eq, PartialEq, PartialOrd, Ord, Clone, Copy)]
#[repr(transparent)]
pub struct Lit {
    lidx: u32,
}

impl Lit {
    /// The maximum variable index that can be represented.
    pub const MAX_IDX: u32 = (u32::MAX - 1) / 2;

    #[inline]
    fn represent(idx: u32, negated: bool) -> u32 {
        (idx << 1) + u32::from(negated)
    }

    /// Creates a new (negated or not) literal with a given 0-based variable
    /// index.
    ///
    /// # Panics
    ///
    /// If `idx > Lit::MAX_IDX`.
    pub fn new(idx: u32, negated: bool) -> Lit {
        assert!(idx <= Lit::MAX_IDX, "variable index too high");
        Lit {
            lidx: Lit::represent(idx, negated),
        }
    }

    /// Creates a new positive literal with a given 0-based variable index.
    #[inline]
    #[must_use]
    pub fn positive(idx: u32) -> Lit {
        Lit::new(idx, false)
    }

    /// Creates a new negated literal with a given 0-based variable index.
    #[inline]
    #[must_use]
    pub fn negative(idx: u32) -> Lit {
        Lit::new(idx, true)
    }

    /// Creates a literal from an IPASIR-style signed integer value.
    ///
    /// # Errors
    ///
    /// If `val` is zero or the variable index does not fit.
    pub fn from_ipasir(val: c_int) -> Result<Lit, TypeError> {
        if val == 0 {
            return Err(TypeError::ZeroLiteral);
        }
        let negated = val < 0;
        let idx = val.unsigned_abs() - 1;
        if idx > Lit::MAX_IDX {
            return Err(TypeError::IdxTooHigh);
        }
        Ok(Lit::new(idx, negated))
    }

    /// Converts the literal to an IPASIR-style signed integer value.
    #[must_use]
    pub fn to_ipasir(self) -> c_int {
        let idx: c_int = (self.vidx32() + 1)
            .try_into()
            .expect("variable index too high to fit in c_int");
        if self.is_neg() {
            -idx
        } else {
            idx
        }
    }

    /// Gets the 0-based index of the variable of the literal.
    #[inline]
    #[must_use]
    pub fn vidx(self) -> usize {
        (self.lidx >> 1) as usize
    }

    /// Gets the 32-bit 0-based index of the variable of the literal.
    #[inline]
    #[must_use]
    pub fn vidx32(self) -> u32 {
        self.lidx >> 1
    }

    /// True iff the literal is positive.
    #[inline]
    #[must_use]
    pub fn is_pos(self) -> bool {
        (self.lidx & 1u32) == 0
    }

    /// True iff the literal is negated.
    #[inline]
    #[must_use]
    pub fn is_neg(self) -> bool {
        (self.lidx & 1u32) == 1
    }
}

impl ops::Not for Lit {
    type Output = Lit;

    #[inline]
    fn not(self) -> Lit {
        Lit {
            lidx: self.lidx ^ 1u32,
        }
    }
}

/// Literals display in their IPASIR representation
impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ipasir())
    }
}

impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ipasir())
    }
}

/// Ternary value assigned to a literal or variable, including possible "don't care"
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum TernaryVal {
    /// Positive assignment.
    True,
    /// Negative assignment.
    False,
    /// Formula is satisfied, no matter the assignment.
    DontCare,
}

impl TernaryVal {
    /// Converts a [`TernaryVal`] to a bool with a default value for "don't cares"
    #[must_use]
    pub fn to_bool_with_def(self, def: bool) -> bool {
        match self {
            TernaryVal::True => true,
            TernaryVal::False => false,
            TernaryVal::DontCare => def,
        }
    }
}

impl From<bool> for TernaryVal {
    fn from(value: bool) -> Self {
        if value {
            return TernaryVal::True;
        }
        TernaryVal::False
    }
}

/// Type representing a model found by the engine: one [`TernaryVal`] per
/// variable, contiguous from variable index 0.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
#[repr(transparent)]
pub struct Assignment {
    assignment: Vec<TernaryVal>,
}

impl Assignment {
    /// Gets the value assigned to a variable. Variables beyond the assignment
    /// are "don't care".
    #[must_use]
    pub fn var_value(&self, idx: u32) -> TernaryVal {
        if idx as usize >= self.assignment.len() {
            TernaryVal::DontCare
        } else {
            self.assignment[idx as usize]
        }
    }

    /// The number of variables in the assignment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    /// True iff the assignment covers no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }

    /// Iterates over the assignment as one literal per variable, in variable
    /// order. A variable is negated iff it is assigned false; "don't care"
    /// variables come out positive.
    pub fn literals(&self) -> impl Iterator<Item = Lit> + '_ {
        self.assignment.iter().enumerate().map(|(idx, tv)| {
            let idx = u32::try_from(idx).expect("variable index too high");
            match tv {
                TernaryVal::False => Lit::negative(idx),
                TernaryVal::True | TernaryVal::DontCare => Lit::positive(idx),
            }
        })
    }
}

impl From<Vec<TernaryVal>> for Assignment {
    fn from(assignment: Vec<TernaryVal>) -> Self {
        Self { assignment }
    }
}

impl FromIterator<TernaryVal> for Assignment {
    fn from_iter<T: IntoIterator<Item = TernaryVal>>(iter: T) -> Self {
        Self {
            assignment: iter.into_iter().collect(),
        }
    }
}

/// Errors from working with [`Lit`] values
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeError {
    /// Zero is not a valid IPASIR literal
    #[error("zero is not a valid IPASIR literal")]
    ZeroLiteral,
    /// The variable index is too high to be represented
    #[error("variable index too high")]
    IdxTooHigh,
}

#[cfg(test)]
mod tests {
    use super::{Assignment, Lit, TernaryVal, TypeError};

    #[test]
    fn lit_from_ipasir() {
        assert_eq!(Lit::from_ipasir(4), Ok(Lit::positive(3)));
        assert_eq!(Lit::from_ipasir(-4), Ok(Lit::negative(3)));
        assert_eq!(Lit::from_ipasir(0), Err(TypeError::ZeroLiteral));
    }

    #[test]
    fn lit_to_ipasir() {
        assert_eq!(Lit::positive(0).to_ipasir(), 1);
        assert_eq!(Lit::negative(1).to_ipasir(), -2);
        assert_eq!((!Lit::positive(1)).to_ipasir(), -2);
    }

    #[test]
    fn assignment_literals() {
        let assign = Assignment::from(vec![
            TernaryVal::True,
            TernaryVal::False,
            TernaryVal::DontCare,
        ]);
        let lits: Vec<Lit> = assign.literals().collect();
        assert_eq!(
            lits,
            vec![Lit::positive(0), Lit::negative(1), Lit::positive(2)]
        );
        assert_eq!(assign.var_value(1), TernaryVal::False);
        assert_eq!(assign.var_value(7), TernaryVal::DontCare);
    }
}
