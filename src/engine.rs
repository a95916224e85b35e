//! Interface to an external model checker.
//!
//! The crate describes *what* to verify; deciding whether the specification
//! holds on every execution is left to an implementation of [`ModelChecker`].

use log::{debug, info};

use crate::error::Error;
use crate::system::TransitionSystem;
use crate::trace::Lasso;

/// Outcome of checking a [`TransitionSystem`] against its specification.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Verdict {
    /// The specification holds on every execution.
    Holds,
    /// Some execution violates the specification.
    Violated(Lasso),
}

impl Verdict {
    pub fn holds(&self) -> bool {
        matches!(self, Verdict::Holds)
    }

    pub fn counterexample(&self) -> Option<&Lasso> {
        match self {
            Verdict::Holds => None,
            Verdict::Violated(lasso) => Some(lasso),
        }
    }
}

/// Engine deciding `TransitionSystem ⊨ specification`.
///
/// An implementation explores executions that start in a state satisfying
/// `initial_states`, follow `next_relation`, and stay within `invariants`.
pub trait ModelChecker {
    type Error: std::error::Error + 'static;

    fn check(&self, system: &TransitionSystem) -> Result<Verdict, Self::Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyError<E: std::error::Error + 'static> {
    #[error("malformed transition system")]
    Malformed(#[source] Error),

    #[error(transparent)]
    Engine(E),
}

/// Check that `system` is well formed, then hand it to `engine`.
///
/// The engine's verdict is returned as is.
pub fn verify<M: ModelChecker>(system: &TransitionSystem, engine: &M) -> Result<Verdict, VerifyError<M::Error>> {
    let stats = system.check_well_formed().map_err(VerifyError::Malformed)?;
    info!(
        "verifying {} over {} states ({} initial, relation of {} nodes)",
        system.specification, stats.states, stats.initial_states, stats.relation_nodes
    );

    let verdict = engine.check(system).map_err(VerifyError::Engine)?;
    match &verdict {
        Verdict::Holds => info!("specification holds"),
        Verdict::Violated(lasso) => {
            info!("specification violated by a lasso of {} states", lasso.len());
            debug!("counterexample:\n{}", lasso);
        }
    }
    Ok(verdict)
}
