use crate::expr::Atom;
use crate::state::State;

/// Errors reported while building or checking a transition system.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("a ring needs at least one process")]
    EmptyRing,

    #[error("a ring of one process shares its only fork with itself; opt in with `Config::allow_single`")]
    SingleProcessRing,

    #[error("state has {left} left-fork entries but {right} right-fork entries")]
    RaggedState { left: usize, right: usize },

    #[error("state of {found} processes does not fit a ring of {expected}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("state predicate refers to next-state variable {0}")]
    NextStateInPredicate(Atom),

    #[error("no state satisfies the initial-state predicate")]
    NoInitialStates,

    #[error("state {0} has no successor")]
    DeadEnd(State),

    #[error("lasso cycle is empty")]
    EmptyCycle,

    #[error("witness does not start in an initial state")]
    WitnessNotInitial,

    #[error("witness step {step} is not allowed by the transition relation")]
    IllegalStep { step: usize },

    #[error("witness satisfies the specification")]
    NotACounterexample,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
