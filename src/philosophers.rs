//! # Dining philosophers
//!
//! N philosophers sit around a circular table with one fork between each pair
//! of neighbors. Philosopher `i` owns the left fork `i` and the right fork
//! `i+1 mod N`, so the right fork of `i` is the left fork of `i+1`.
//!
//! ```text
//!        P0
//!      /    \
//!    F0      F1
//!    /        \
//!   P2 --F2-- P1
//! ```
//!
//! Each philosopher repeatedly picks up the left fork, then the right fork,
//! eats, and puts both down. If everyone grabs the left fork at the same time,
//! nobody can continue: the ring deadlocks, and the liveness property
//! `G F (someone eats)` fails.
//!
//! The model is purely symbolic. [`DiningPhilosophers::transition_system`]
//! returns predicates over state variables for a model checker to explore.

use log::debug;

use crate::error::{Error, Result};
use crate::expr::{assign, unchanged, Expr, StatePredicate, TransitionRelation};
use crate::ltl::Formula;
use crate::state::{StateShape, StateVar};
use crate::system::TransitionSystem;

/// Parameters of the model.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Config {
    /// Number of philosophers (and forks) around the table.
    pub philosophers: usize,
    /// Build a ring with a single philosopher. The only fork is then both the
    /// left and the right fork of that philosopher.
    pub allow_single: bool,
}

impl Config {
    pub fn new(philosophers: usize) -> Self {
        Self {
            philosophers,
            ..Self::default()
        }
    }

    pub fn allow_single(mut self, allow: bool) -> Self {
        self.allow_single = allow;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            philosophers: 5,
            allow_single: false,
        }
    }
}

/// The three moves of a single philosopher.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Action {
    /// Holding both forks: put both down.
    Release,
    /// Holding only the left fork: pick up the right one.
    AcquireRight,
    /// Holding no fork: pick up the left one.
    AcquireLeft,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Release, Action::AcquireRight, Action::AcquireLeft];
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DiningPhilosophers {
    shape: StateShape,
}

impl DiningPhilosophers {
    pub fn new(philosophers: usize) -> Result<Self> {
        Self::from_config(Config::new(philosophers))
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let shape = StateShape::new(config.philosophers)?;
        if shape.processes() == 1 && !config.allow_single {
            return Err(Error::SingleProcessRing);
        }
        debug!("dining philosophers with {:?}", config);
        Ok(Self { shape })
    }

    pub fn shape(&self) -> StateShape {
        self.shape
    }

    pub fn philosophers(&self) -> usize {
        self.shape.processes()
    }

    fn left(&self, i: usize) -> StateVar {
        self.shape.left_fork(i)
    }

    fn right(&self, i: usize) -> StateVar {
        self.shape.right_fork(i)
    }

    /// Philosopher `i` holds its left fork.
    pub fn has_left(&self, i: usize) -> Expr {
        Expr::current(self.left(i))
    }

    /// Philosopher `i` holds its right fork.
    pub fn has_right(&self, i: usize) -> Expr {
        Expr::current(self.right(i))
    }

    /// The left fork of `i` is not held by the left neighbor as its right fork.
    pub fn left_available(&self, i: usize) -> Expr {
        !self.has_right(self.shape.left_neighbor(i))
    }

    /// The right fork of `i` is not held by the right neighbor as its left fork.
    pub fn right_available(&self, i: usize) -> Expr {
        !self.has_left(self.shape.right_neighbor(i))
    }

    /// Philosopher `i` cannot progress: it holds the left fork and waits for
    /// the right one, or holds nothing and waits for the left one.
    pub fn is_stuck(&self, i: usize) -> Expr {
        (self.has_left(i) & !self.right_available(i)) | (!self.has_left(i) & !self.left_available(i))
    }

    pub fn all_stuck(&self) -> Expr {
        Expr::and_all((0..self.philosophers()).map(|i| self.is_stuck(i)))
    }

    /// Philosopher `i` holds both forks.
    pub fn eating(&self, i: usize) -> StatePredicate {
        StatePredicate::from_current(self.has_left(i) & self.has_right(i))
    }

    /// Condition under which `action` is enabled for philosopher `i`.
    pub fn guard(&self, action: Action, i: usize) -> Expr {
        match action {
            Action::Release => self.has_left(i) & self.has_right(i),
            Action::AcquireRight => self.has_left(i) & !self.has_right(i) & self.right_available(i),
            Action::AcquireLeft => !self.has_left(i) & self.left_available(i),
        }
    }

    /// Next state of `action` for philosopher `i`, as a frame condition.
    pub fn effect(&self, action: Action, i: usize) -> Expr {
        let changes: &[(StateVar, bool)] = match action {
            Action::Release => &[(self.left(i), false), (self.right(i), false)],
            Action::AcquireRight => &[(self.right(i), true)],
            Action::AcquireLeft => &[(self.left(i), true)],
        };
        assign(&self.shape, changes)
    }

    pub fn action(&self, action: Action, i: usize) -> Expr {
        self.guard(action, i) & self.effect(action, i)
    }

    /// All moves of philosopher `i`; at most one of them is enabled in any state.
    pub fn philosopher_transition(&self, i: usize) -> Expr {
        Expr::or_any(Action::ALL.iter().map(|&action| self.action(action, i)))
    }

    /// Self loop in states where nobody can progress. Keeps the relation total.
    pub fn stutter(&self) -> Expr {
        self.all_stuck() & unchanged(&self.shape)
    }

    pub fn initial_states(&self) -> StatePredicate {
        let forks = (0..self.philosophers()).flat_map(|i| [!self.has_left(i), !self.has_right(i)]);
        StatePredicate::from_current(Expr::and_all(forks))
    }

    pub fn next_relation(&self) -> TransitionRelation {
        let moves = Expr::or_any((0..self.philosophers()).map(|i| self.philosopher_transition(i)));
        TransitionRelation::new(moves | self.stutter())
    }

    pub fn invariants(&self) -> StatePredicate {
        StatePredicate::always_true()
    }

    /// `G F (eating_0 ∨ ... ∨ eating_{N-1})`: infinitely often, someone eats.
    pub fn specification(&self) -> Formula {
        let eating = (0..self.philosophers()).map(|i| Formula::predicate(self.eating(i)));
        // The ring is never empty, so the fallback (empty disjunction) is unreachable
        let someone_eating = Formula::any(eating).unwrap_or(Formula::Or(Vec::new()));
        someone_eating.eventually().always()
    }

    pub fn transition_system(&self) -> TransitionSystem {
        debug!("building transition system for {} philosophers", self.philosophers());
        TransitionSystem {
            shape: self.shape,
            initial_states: self.initial_states(),
            next_relation: self.next_relation(),
            invariants: self.invariants(),
            specification: self.specification(),
        }
    }
}
