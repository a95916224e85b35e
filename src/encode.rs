//! Compilation of expressions into BDDs.
//!
//! Each state variable gets two BDD variables, one for the current state and
//! one for the next state, placed next to each other in the ordering:
//!
//! ```text
//! L0 = x1, L0' = x2, R0 = x3, R0' = x4, L1 = x5, ...
//! ```

use log::debug;
use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::expr::{Atom, Expr, Frame, StatePredicate, TransitionRelation};
use crate::reference::Ref;
use crate::state::{State, StateShape, StateVar};

pub struct Encoder<'a> {
    bdd: &'a Bdd,
    shape: StateShape,
}

impl<'a> Encoder<'a> {
    pub fn new(bdd: &'a Bdd, shape: StateShape) -> Self {
        Self { bdd, shape }
    }

    pub fn bdd(&self) -> &'a Bdd {
        self.bdd
    }

    pub fn shape(&self) -> StateShape {
        self.shape
    }

    /// BDD variable holding `atom`.
    pub fn variable(&self, atom: Atom) -> u32 {
        let var = match atom.var {
            StateVar::LeftFork(i) => self.shape.left_fork(i),
            StateVar::RightFork(i) => self.shape.right_fork(i),
        };
        let base = 2 * var.position() as u32 + 1;
        match atom.frame {
            Frame::Current => base,
            Frame::Next => base + 1,
        }
    }

    /// Inverse of [`Encoder::variable`].
    pub fn atom(&self, v: u32) -> Atom {
        assert_ne!(v, 0, "Variable index should not be zero");
        let k = (v as usize - 1) / 2;
        let frame = if v % 2 == 1 { Frame::Current } else { Frame::Next };
        let var = if k % 2 == 0 {
            StateVar::LeftFork(k / 2)
        } else {
            StateVar::RightFork(k / 2)
        };
        Atom { var, frame }
    }

    pub fn current_vars(&self) -> Vec<u32> {
        self.frame_vars(Frame::Current)
    }

    pub fn next_vars(&self) -> Vec<u32> {
        self.frame_vars(Frame::Next)
    }

    fn frame_vars(&self, frame: Frame) -> Vec<u32> {
        self.shape.vars().map(|var| self.variable(Atom { var, frame })).collect()
    }

    pub fn encode(&self, expr: &Expr) -> Ref {
        match expr {
            Expr::Const(true) => self.bdd.one,
            Expr::Const(false) => self.bdd.zero,
            Expr::Atom(atom) => self.bdd.mk_var(self.variable(*atom)),
            Expr::Not(a) => self.bdd.apply_not(self.encode(a)),
            Expr::And(a, b) => self.bdd.apply_and(self.encode(a), self.encode(b)),
            Expr::Or(a, b) => self.bdd.apply_or(self.encode(a), self.encode(b)),
            Expr::Iff(a, b) => self.bdd.apply_eq(self.encode(a), self.encode(b)),
        }
    }

    pub fn encode_predicate(&self, predicate: &StatePredicate) -> Ref {
        let res = self.encode(predicate.expr());
        debug!("encoded predicate into {} nodes", self.bdd.size(res));
        res
    }

    pub fn encode_relation(&self, relation: &TransitionRelation) -> Ref {
        let res = self.encode(relation.expr());
        debug!("encoded relation into {} nodes", self.bdd.size(res));
        res
    }

    /// Number of states in a set over current-state variables.
    pub fn count_states(&self, states: Ref) -> BigUint {
        self.bdd.sat_count(states, self.shape.num_vars())
    }

    /// Build the state described by a (possibly partial) list of literals.
    ///
    /// Unmentioned variables are false; next-state literals are ignored.
    pub fn decode(&self, literals: &[i32]) -> State {
        literals
            .iter()
            .filter(|&&lit| lit > 0)
            .map(|&lit| self.atom(lit as u32))
            .filter(|atom| atom.frame == Frame::Current && atom.var.process() < self.shape.processes())
            .fold(self.shape.empty_state(), |state, atom| state.with(atom.var, true))
    }

    /// Some state of a non-empty set.
    pub fn pick_state(&self, states: Ref) -> Option<State> {
        self.bdd.one_sat(states).map(|path| self.decode(&path))
    }

    /// States with at least one successor under `relation`: `∃s'. T(s, s')`.
    pub fn has_successor(&self, relation: Ref) -> Ref {
        self.bdd.exists(relation, self.next_vars())
    }

    /// States with no successor under `relation`.
    pub fn dead_ends(&self, relation: Ref) -> Ref {
        -self.has_successor(relation)
    }
}
