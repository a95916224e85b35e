//! The transition system handed to a model checker.

use log::{debug, warn};
use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::encode::Encoder;
use crate::error::{Error, Result};
use crate::expr::{unchanged, StatePredicate, TransitionRelation};
use crate::ltl::Formula;
use crate::reference::Ref;
use crate::state::StateShape;
use crate::trace::Lasso;

/// Initial states, transition relation, invariants and the specification to verify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionSystem {
    pub shape: StateShape,
    pub initial_states: StatePredicate,
    pub next_relation: TransitionRelation,
    pub invariants: StatePredicate,
    pub specification: Formula,
}

/// BDD encoding of a [`TransitionSystem`] in some manager.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SymbolicSystem {
    pub initial_states: Ref,
    pub next_relation: Ref,
    pub invariants: Ref,
}

/// Summary of a successful well-formedness check.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EncodingStats {
    /// Size of the state space, `2^(2N)`.
    pub states: BigUint,
    pub initial_states: BigUint,
    /// States whose only successor is themselves.
    pub stutter_only_states: BigUint,
    pub relation_nodes: u64,
}

impl TransitionSystem {
    pub fn encode(&self, bdd: &Bdd) -> SymbolicSystem {
        let enc = Encoder::new(bdd, self.shape);
        SymbolicSystem {
            initial_states: enc.encode_predicate(&self.initial_states),
            next_relation: enc.encode_relation(&self.next_relation),
            invariants: enc.encode_predicate(&self.invariants),
        }
    }

    /// Check what a model checker assumes about its input: some initial
    /// state exists and every state has a successor.
    pub fn check_well_formed(&self) -> Result<EncodingStats> {
        let bdd = Bdd::default();
        let enc = Encoder::new(&bdd, self.shape);
        let sym = self.encode(&bdd);

        if bdd.is_zero(sym.initial_states) {
            warn!("transition system has no initial states");
            return Err(Error::NoInitialStates);
        }

        let dead = enc.dead_ends(sym.next_relation);
        if let Some(state) = enc.pick_state(dead) {
            warn!("transition system is not total: {} has no successor", state);
            return Err(Error::DeadEnd(state));
        }

        // Successors other than the state itself: ∃s'. T(s, s') ∧ ¬(s' = s)
        let stay = enc.encode(&unchanged(&self.shape));
        let moves = bdd.apply_and(sym.next_relation, -stay);
        let stutter_only = -enc.has_successor(moves);

        let stats = EncodingStats {
            states: BigUint::from(1u32) << self.shape.num_vars(),
            initial_states: enc.count_states(sym.initial_states),
            stutter_only_states: enc.count_states(stutter_only),
            relation_nodes: bdd.size(sym.next_relation),
        };
        debug!("well-formed: {:?}, bdd = {:?}", stats, bdd);
        Ok(stats)
    }

    /// Check that `lasso` is a genuine counterexample: it starts in an initial
    /// state, every step (including the back edge) is allowed by the
    /// transition relation, and the specification fails on it.
    pub fn check_witness(&self, lasso: &Lasso) -> Result<()> {
        for state in lasso.states() {
            self.shape.check(state)?;
        }

        if !self.initial_states.holds(lasso.state(0)) {
            return Err(Error::WitnessNotInitial);
        }

        if let Some((step, _, _)) = lasso
            .steps()
            .find(|(_, from, to)| !self.next_relation.holds(from, to))
        {
            return Err(Error::IllegalStep { step });
        }

        if self.specification.holds_on(lasso) {
            return Err(Error::NotACounterexample);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::expr::{assign, Expr};
    use crate::state::StateVar;

    /// A single process toggling its left fork forever.
    fn toggle() -> TransitionSystem {
        let shape = StateShape::new(1).unwrap();
        let l = StateVar::LeftFork(0);
        let r = StateVar::RightFork(0);
        let init = StatePredicate::new(!Expr::current(l) & !Expr::current(r)).unwrap();
        let next = TransitionRelation::new(
            Expr::iff(Expr::next(l), !Expr::current(l)) & Expr::iff(Expr::next(r), Expr::current(r)),
        );
        let spec = Formula::predicate(StatePredicate::new(Expr::current(l)).unwrap())
            .eventually()
            .always();
        TransitionSystem {
            shape,
            initial_states: init,
            next_relation: next,
            invariants: StatePredicate::always_true(),
            specification: spec,
        }
    }

    #[test]
    fn test_well_formed() {
        let ts = toggle();
        let stats = ts.check_well_formed().unwrap();
        assert_eq!(stats.states, BigUint::from(4u32));
        assert_eq!(stats.initial_states, BigUint::from(1u32));
        assert_eq!(stats.stutter_only_states, BigUint::ZERO);
    }

    #[test]
    fn test_no_initial_states() {
        let mut ts = toggle();
        let l = Expr::current(StateVar::LeftFork(0));
        ts.initial_states = StatePredicate::new(l.clone() & !l).unwrap();
        assert_eq!(ts.check_well_formed(), Err(Error::NoInitialStates));
    }

    #[test]
    fn test_dead_end_reported() {
        let mut ts = toggle();
        // Only states without L0 may step, by setting it
        ts.next_relation = TransitionRelation::new(
            !Expr::current(StateVar::LeftFork(0)) & assign(&ts.shape, &[(StateVar::LeftFork(0), true)]),
        );
        match ts.check_well_formed() {
            Err(Error::DeadEnd(state)) => assert!(state.has_left_fork(0)),
            other => panic!("expected a dead end, got {:?}", other),
        }
    }

    #[test]
    fn test_check_witness() {
        let ts = toggle();
        let shape = ts.shape;
        let off = shape.empty_state();
        let on = off.with_left_fork(0, true);

        // A legal run on which L0 holds infinitely often
        let run = Lasso::new(vec![], vec![off.clone(), on.clone()]).unwrap();
        assert_eq!(ts.check_witness(&run), Err(Error::NotACounterexample));

        let late = Lasso::new(vec![], vec![on.clone(), off.clone()]).unwrap();
        assert_eq!(ts.check_witness(&late), Err(Error::WitnessNotInitial));

        let stuck = Lasso::new(vec![off.clone()], vec![off.clone()]).unwrap();
        assert_eq!(ts.check_witness(&stuck), Err(Error::IllegalStep { step: 0 }));

        let wrong_size = Lasso::new(vec![], vec![StateShape::new(2).unwrap().empty_state()]).unwrap();
        assert_eq!(
            ts.check_witness(&wrong_size),
            Err(Error::ShapeMismatch {
                expected: 1,
                found: 2
            })
        );
    }
}
