//! # symbolic-ts: declarative transition systems with LTL specifications
//!
//! **`symbolic-ts`** describes finite-state concurrent systems symbolically, as boolean
//! predicates over state variables, and pairs them with a linear temporal logic property.
//! Deciding the property is the job of an external [`ModelChecker`][crate::engine::ModelChecker].
//!
//! ## Building blocks
//!
//! - **[`state`]**: the state space of a ring of processes, each holding a left and a right fork.
//! - **[`expr`]**: boolean expressions over current-state and next-state variables,
//!   [`StatePredicate`][crate::expr::StatePredicate] and [`TransitionRelation`][crate::expr::TransitionRelation].
//! - **[`ltl`]**: formulas built from predicates with `∨`, `G` and `F`.
//! - **[`system`]**: the [`TransitionSystem`][crate::system::TransitionSystem] container, its well-formedness
//!   check and counterexample validation.
//! - **[`philosophers`]**: the dining philosophers, whose left-first strategy deadlocks.
//!
//! Symbolic checks run on a small reduced ordered BDD package: [`bdd`], [`sat`] and [`encode`].
//!
//! ## Example
//!
//! ```rust
//! use num_bigint::BigUint;
//! use symbolic_ts::philosophers::DiningPhilosophers;
//!
//! let model = DiningPhilosophers::new(3).unwrap();
//! let system = model.transition_system();
//! assert_eq!(system.specification.to_string(), "G F ((L0 ∧ R0) ∨ (L1 ∧ R1) ∨ (L2 ∧ R2))");
//!
//! let stats = system.check_well_formed().unwrap();
//! assert_eq!(stats.states, BigUint::from(64u32));
//! assert_eq!(stats.initial_states, BigUint::from(1u32));
//! ```

pub mod bdd;
pub mod encode;
pub mod engine;
pub mod error;
pub mod expr;
pub mod ltl;
pub mod philosophers;
pub mod reference;
pub mod sat;
pub mod state;
pub mod system;
pub mod trace;

pub use engine::{verify, ModelChecker, Verdict, VerifyError};
pub use error::{Error, Result};
pub use ltl::Formula;
pub use philosophers::{Config, DiningPhilosophers};
pub use system::TransitionSystem;
