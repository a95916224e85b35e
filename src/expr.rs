//! Boolean expressions over state variables.
//!
//! An [`Expr`] is an immutable tree over [`Atom`]s, where an atom names a state
//! variable either in the current state or in the next state. A
//! [`StatePredicate`] only mentions the current state; a [`TransitionRelation`]
//! may mention both.
//!
//! Expressions are plain data: they can be evaluated on concrete states, or
//! compiled into a BDD with [`Encoder`][crate::encode::Encoder].

use std::collections::HashSet;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

use crate::error::{Error, Result};
use crate::state::{State, StateShape, StateVar};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Frame {
    Current,
    Next,
}

/// A state variable, taken from either the current or the next state.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Atom {
    pub var: StateVar,
    pub frame: Frame,
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.frame {
            Frame::Current => write!(f, "{}", self.var),
            Frame::Next => write!(f, "{}'", self.var),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Expr {
    Const(bool),
    Atom(Atom),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Iff(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn constant(value: bool) -> Self {
        Expr::Const(value)
    }

    pub fn current(var: StateVar) -> Self {
        Expr::Atom(Atom {
            var,
            frame: Frame::Current,
        })
    }

    pub fn next(var: StateVar) -> Self {
        Expr::Atom(Atom {
            var,
            frame: Frame::Next,
        })
    }

    pub fn not(value: Self) -> Self {
        match value {
            Expr::Const(b) => Expr::Const(!b),
            Expr::Not(inner) => *inner,
            _ => Expr::Not(Box::new(value)),
        }
    }

    pub fn and(lhs: Self, rhs: Self) -> Self {
        match (lhs, rhs) {
            (Expr::Const(true), e) | (e, Expr::Const(true)) => e,
            (Expr::Const(false), _) | (_, Expr::Const(false)) => Expr::Const(false),
            (lhs, rhs) => Expr::And(Box::new(lhs), Box::new(rhs)),
        }
    }

    pub fn or(lhs: Self, rhs: Self) -> Self {
        match (lhs, rhs) {
            (Expr::Const(false), e) | (e, Expr::Const(false)) => e,
            (Expr::Const(true), _) | (_, Expr::Const(true)) => Expr::Const(true),
            (lhs, rhs) => Expr::Or(Box::new(lhs), Box::new(rhs)),
        }
    }

    pub fn iff(lhs: Self, rhs: Self) -> Self {
        match (lhs, rhs) {
            (Expr::Const(true), e) | (e, Expr::Const(true)) => e,
            (Expr::Const(false), e) | (e, Expr::Const(false)) => Expr::not(e),
            (lhs, rhs) => Expr::Iff(Box::new(lhs), Box::new(rhs)),
        }
    }

    /// Left-folded conjunction; `true` for an empty iterator.
    pub fn and_all(exprs: impl IntoIterator<Item = Expr>) -> Self {
        exprs.into_iter().fold(Expr::Const(true), Expr::and)
    }

    /// Left-folded disjunction; `false` for an empty iterator.
    pub fn or_any(exprs: impl IntoIterator<Item = Expr>) -> Self {
        exprs.into_iter().fold(Expr::Const(false), Expr::or)
    }

    /// Evaluate under an assignment of atoms.
    pub fn eval<F>(&self, value: &F) -> bool
    where
        F: Fn(Atom) -> bool,
    {
        match self {
            Expr::Const(b) => *b,
            Expr::Atom(atom) => value(*atom),
            Expr::Not(a) => !a.eval(value),
            Expr::And(a, b) => a.eval(value) && b.eval(value),
            Expr::Or(a, b) => a.eval(value) || b.eval(value),
            Expr::Iff(a, b) => a.eval(value) == b.eval(value),
        }
    }

    /// Collect all atoms in the expression.
    pub fn atoms(&self) -> HashSet<Atom> {
        let mut atoms = HashSet::new();
        self.collect_atoms(&mut atoms);
        atoms
    }

    fn collect_atoms(&self, atoms: &mut HashSet<Atom>) {
        match self {
            Expr::Const(_) => {}
            Expr::Atom(atom) => {
                atoms.insert(*atom);
            }
            Expr::Not(a) => a.collect_atoms(atoms),
            Expr::And(a, b) | Expr::Or(a, b) | Expr::Iff(a, b) => {
                a.collect_atoms(atoms);
                b.collect_atoms(atoms);
            }
        }
    }

    /// First next-state atom in the expression, if any.
    pub fn find_next(&self) -> Option<Atom> {
        match self {
            Expr::Const(_) => None,
            Expr::Atom(atom) => (atom.frame == Frame::Next).then_some(*atom),
            Expr::Not(a) => a.find_next(),
            Expr::And(a, b) | Expr::Or(a, b) | Expr::Iff(a, b) => a.find_next().or_else(|| b.find_next()),
        }
    }
}

impl BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Self) -> Self::Output {
        Expr::and(self, rhs)
    }
}

impl BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Self) -> Self::Output {
        Expr::or(self, rhs)
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Self::Output {
        Expr::not(self)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(b) => write!(f, "{}", b),
            Expr::Atom(atom) => write!(f, "{}", atom),
            Expr::Not(a) => write!(f, "¬{}", a),
            Expr::And(a, b) => write!(f, "({} ∧ {})", a, b),
            Expr::Or(a, b) => write!(f, "({} ∨ {})", a, b),
            Expr::Iff(a, b) => write!(f, "({} ↔ {})", a, b),
        }
    }
}

/// Frame condition: the next state equals the current one, except for `changes`.
///
/// Every variable of `shape` not listed in `changes` is constrained by `v' ↔ v`.
pub fn assign(shape: &StateShape, changes: &[(StateVar, bool)]) -> Expr {
    Expr::and_all(shape.vars().map(|var| {
        let value = match changes.iter().find(|(v, _)| *v == var) {
            Some(&(_, b)) => Expr::constant(b),
            None => Expr::current(var),
        };
        Expr::iff(Expr::next(var), value)
    }))
}

/// Frame condition: the next state equals the current one.
pub fn unchanged(shape: &StateShape) -> Expr {
    assign(shape, &[])
}

/// Predicate over a single state.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct StatePredicate(Expr);

impl StatePredicate {
    pub fn new(expr: Expr) -> Result<Self> {
        if let Some(atom) = expr.find_next() {
            return Err(Error::NextStateInPredicate(atom));
        }
        Ok(Self(expr))
    }

    /// Wrap an expression built from current-state atoms only.
    pub(crate) fn from_current(expr: Expr) -> Self {
        debug_assert!(expr.find_next().is_none(), "next-state atom in {}", expr);
        Self(expr)
    }

    /// The predicate that holds in every state.
    pub fn always_true() -> Self {
        Self(Expr::Const(true))
    }

    pub fn expr(&self) -> &Expr {
        &self.0
    }

    pub fn holds(&self, state: &State) -> bool {
        self.0.eval(&|atom: Atom| state.get(atom.var))
    }
}

impl fmt::Display for StatePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Relation between an old state and a candidate new state.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct TransitionRelation(Expr);

impl TransitionRelation {
    pub fn new(expr: Expr) -> Self {
        Self(expr)
    }

    pub fn expr(&self) -> &Expr {
        &self.0
    }

    pub fn holds(&self, old: &State, new: &State) -> bool {
        self.0.eval(&|atom: Atom| match atom.frame {
            Frame::Current => old.get(atom.var),
            Frame::Next => new.get(atom.var),
        })
    }
}

impl fmt::Display for TransitionRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn l(i: usize) -> Expr {
        Expr::current(StateVar::LeftFork(i))
    }

    fn r(i: usize) -> Expr {
        Expr::current(StateVar::RightFork(i))
    }

    #[test]
    fn test_constant_folding() {
        assert_eq!(Expr::and(Expr::constant(true), l(0)), l(0));
        assert_eq!(Expr::and(l(0), Expr::constant(false)), Expr::constant(false));
        assert_eq!(Expr::or(Expr::constant(false), l(0)), l(0));
        assert_eq!(Expr::or(l(0), Expr::constant(true)), Expr::constant(true));
        assert_eq!(Expr::iff(Expr::constant(false), l(0)), !l(0));
        assert_eq!(!!l(0), l(0));
        assert_eq!(Expr::and_all([]), Expr::constant(true));
        assert_eq!(Expr::or_any([]), Expr::constant(false));
    }

    #[test]
    fn test_operators() {
        let e = l(0) & !r(1) | r(0);
        assert_eq!(e, Expr::or(Expr::and(l(0), Expr::not(r(1))), r(0)));
        assert_eq!(e.to_string(), "((L0 ∧ ¬R1) ∨ R0)");
    }

    #[test]
    fn test_eval() {
        let shape = StateShape::new(2).unwrap();
        let s = shape.empty_state().with_left_fork(0, true);
        let p = StatePredicate::new(l(0) & !l(1)).unwrap();
        assert!(p.holds(&s));
        assert!(!p.holds(&shape.empty_state()));
        assert!(StatePredicate::always_true().holds(&s));
    }

    #[test]
    fn test_predicate_rejects_next_state() {
        let atom = Atom {
            var: StateVar::LeftFork(0),
            frame: Frame::Next,
        };
        let res = StatePredicate::new(l(1) | Expr::Atom(atom));
        assert_eq!(res, Err(Error::NextStateInPredicate(atom)));
    }

    #[test]
    fn test_atoms() {
        let e = Expr::iff(Expr::next(StateVar::LeftFork(0)), l(0)) & r(1);
        let atoms = e.atoms();
        assert_eq!(atoms.len(), 3);
        assert!(e.find_next().is_some());
        assert!((l(0) & r(1)).find_next().is_none());
    }

    #[test]
    fn test_frame_condition() {
        let shape = StateShape::new(2).unwrap();
        let old = shape.empty_state();

        let set_l0 = TransitionRelation::new(assign(&shape, &[(StateVar::LeftFork(0), true)]));
        let stay = TransitionRelation::new(unchanged(&shape));

        for new in shape.states() {
            assert_eq!(set_l0.holds(&old, &new), new == old.with_left_fork(0, true));
            assert_eq!(stay.holds(&old, &new), new == old);
        }
    }
}
