//! Linear temporal logic formulas over state predicates.
//!
//! Formulas are immutable trees built from four variants:
//!
//! - `Predicate(p)`: atomic proposition, holds in a state iff `p` does.
//! - `Or(children)`: holds iff at least one child holds.
//! - `Always(φ)` (`G φ`): φ holds at every suffix of the execution.
//! - `Eventually(φ)` (`F φ`): φ holds at some suffix of the execution.
//!
//! Deciding a formula over all executions of a system is the job of a
//! [`ModelChecker`][crate::engine::ModelChecker]. Here we only evaluate
//! formulas on a single lasso-shaped execution, which is what is needed to
//! validate a counterexample.

use std::fmt;

use crate::expr::StatePredicate;
use crate::trace::Lasso;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    /// Atomic proposition
    Predicate(StatePredicate),
    /// Disjunction; the empty disjunction is false
    Or(Vec<Formula>),
    /// Always/Globally: G φ
    Always(Box<Formula>),
    /// Eventually/Finally: F φ
    Eventually(Box<Formula>),
}

impl Formula {
    pub fn predicate(p: StatePredicate) -> Self {
        Formula::Predicate(p)
    }

    /// Binary disjunction. Folding it from the left over `[φ0, φ1, ...]`
    /// yields the flat `Or([φ0, φ1, ...])`.
    pub fn or(self, other: Self) -> Self {
        match self {
            Formula::Or(mut children) => {
                children.push(other);
                Formula::Or(children)
            }
            phi => Formula::Or(vec![phi, other]),
        }
    }

    /// Left fold of [`Formula::or`]; `None` for an empty iterator.
    pub fn any(formulas: impl IntoIterator<Item = Formula>) -> Option<Self> {
        formulas.into_iter().reduce(Formula::or)
    }

    pub fn always(self) -> Self {
        Formula::Always(Box::new(self))
    }

    pub fn eventually(self) -> Self {
        Formula::Eventually(Box::new(self))
    }

    /// Whether the formula contains no temporal operator.
    pub fn is_state_formula(&self) -> bool {
        match self {
            Formula::Predicate(_) => true,
            Formula::Or(children) => children.iter().all(Formula::is_state_formula),
            Formula::Always(_) | Formula::Eventually(_) => false,
        }
    }

    /// All atomic propositions, in left-to-right order.
    pub fn predicates(&self) -> Vec<&StatePredicate> {
        let mut predicates = Vec::new();
        self.collect_predicates(&mut predicates);
        predicates
    }

    fn collect_predicates<'a>(&'a self, predicates: &mut Vec<&'a StatePredicate>) {
        match self {
            Formula::Predicate(p) => predicates.push(p),
            Formula::Or(children) => {
                for phi in children {
                    phi.collect_predicates(predicates);
                }
            }
            Formula::Always(phi) | Formula::Eventually(phi) => phi.collect_predicates(predicates),
        }
    }

    /// Whether the formula holds on the execution described by `lasso`.
    pub fn holds_on(&self, lasso: &Lasso) -> bool {
        self.holds_at(lasso, 0)
    }

    /// Whether the formula holds on the suffix of `lasso` starting at `pos`.
    pub fn holds_at(&self, lasso: &Lasso, pos: usize) -> bool {
        match self {
            Formula::Predicate(p) => p.holds(lasso.state(pos)),
            Formula::Or(children) => children.iter().any(|phi| phi.holds_at(lasso, pos)),
            Formula::Always(phi) => lasso.future(pos).all(|q| phi.holds_at(lasso, q)),
            Formula::Eventually(phi) => lasso.future(pos).any(|q| phi.holds_at(lasso, q)),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Predicate(p) => write!(f, "{}", p),
            Formula::Or(children) if children.is_empty() => write!(f, "false"),
            Formula::Or(children) => {
                write!(f, "(")?;
                for (i, phi) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ∨ ")?;
                    }
                    write!(f, "{}", phi)?;
                }
                write!(f, ")")
            }
            Formula::Always(phi) => write!(f, "G {}", phi),
            Formula::Eventually(phi) => write!(f, "F {}", phi),
        }
    }
}
