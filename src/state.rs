//! Fork-ownership state of a ring of processes.
//!
//! A ring of `N` processes shares `N` forks. Fork `j` sits between process `j`
//! (where it is the left fork) and process `j-1 mod N` (where it is the right
//! fork). A [`State`] records, per process, whether it holds its left and its
//! right fork. The symbolic side uses one [`StateVar`] per such boolean.

use std::fmt;

use crate::error::{Error, Result};

/// Size of a ring. Every index handed out by a shape is already reduced modulo `N`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct StateShape {
    processes: usize,
}

impl StateShape {
    pub fn new(processes: usize) -> Result<Self> {
        if processes == 0 {
            return Err(Error::EmptyRing);
        }
        Ok(Self { processes })
    }

    /// Number of processes (and forks) in the ring.
    pub fn processes(&self) -> usize {
        self.processes
    }

    /// Number of boolean state variables, two per process.
    pub fn num_vars(&self) -> usize {
        2 * self.processes
    }

    /// Reduce a possibly negative process index modulo `N`.
    pub fn wrap(&self, i: isize) -> usize {
        i.rem_euclid(self.processes as isize) as usize
    }

    pub fn left_neighbor(&self, i: usize) -> usize {
        self.wrap(i as isize - 1)
    }

    pub fn right_neighbor(&self, i: usize) -> usize {
        self.wrap(i as isize + 1)
    }

    pub fn left_fork(&self, i: usize) -> StateVar {
        StateVar::LeftFork(i % self.processes)
    }

    pub fn right_fork(&self, i: usize) -> StateVar {
        StateVar::RightFork(i % self.processes)
    }

    /// All state variables in encoding order: `L0, R0, L1, R1, ...`.
    pub fn vars(&self) -> impl Iterator<Item = StateVar> {
        (0..self.processes).flat_map(|i| [StateVar::LeftFork(i), StateVar::RightFork(i)])
    }

    /// The state in which no process holds any fork.
    pub fn empty_state(&self) -> State {
        State {
            has_left_fork: vec![false; self.processes].into_boxed_slice(),
            has_right_fork: vec![false; self.processes].into_boxed_slice(),
        }
    }

    /// Enumerate all `2^(2N)` states.
    ///
    /// # Panics
    ///
    /// Panics if the ring has more than 31 processes.
    pub fn states(&self) -> impl Iterator<Item = State> + '_ {
        assert!(self.processes <= 31, "Too many processes to enumerate");
        let vars: Vec<StateVar> = self.vars().collect();
        (0..1u64 << self.num_vars()).map(move |bits| {
            let mut state = self.empty_state();
            for (k, &var) in vars.iter().enumerate() {
                if (bits >> k) & 1 == 1 {
                    state.set(var, true);
                }
            }
            state
        })
    }

    /// Check that `state` belongs to a ring of this size.
    pub fn check(&self, state: &State) -> Result<()> {
        if state.processes() != self.processes {
            return Err(Error::ShapeMismatch {
                expected: self.processes,
                found: state.processes(),
            });
        }
        Ok(())
    }
}

/// A single boolean of the state, named by process index.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum StateVar {
    LeftFork(usize),
    RightFork(usize),
}

impl StateVar {
    pub fn process(self) -> usize {
        match self {
            StateVar::LeftFork(i) | StateVar::RightFork(i) => i,
        }
    }

    /// Position of this variable in encoding order.
    pub fn position(self) -> usize {
        match self {
            StateVar::LeftFork(i) => 2 * i,
            StateVar::RightFork(i) => 2 * i + 1,
        }
    }
}

impl fmt::Display for StateVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateVar::LeftFork(i) => write!(f, "L{}", i),
            StateVar::RightFork(i) => write!(f, "R{}", i),
        }
    }
}

/// One global configuration of the ring.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct State {
    has_left_fork: Box<[bool]>,
    has_right_fork: Box<[bool]>,
}

impl State {
    pub fn new(has_left_fork: Vec<bool>, has_right_fork: Vec<bool>) -> Result<Self> {
        if has_left_fork.len() != has_right_fork.len() {
            return Err(Error::RaggedState {
                left: has_left_fork.len(),
                right: has_right_fork.len(),
            });
        }
        if has_left_fork.is_empty() {
            return Err(Error::EmptyRing);
        }
        Ok(Self {
            has_left_fork: has_left_fork.into_boxed_slice(),
            has_right_fork: has_right_fork.into_boxed_slice(),
        })
    }

    pub fn processes(&self) -> usize {
        self.has_left_fork.len()
    }

    pub fn has_left_fork(&self, i: usize) -> bool {
        self.has_left_fork[i % self.processes()]
    }

    pub fn has_right_fork(&self, i: usize) -> bool {
        self.has_right_fork[i % self.processes()]
    }

    pub fn get(&self, var: StateVar) -> bool {
        match var {
            StateVar::LeftFork(i) => self.has_left_fork(i),
            StateVar::RightFork(i) => self.has_right_fork(i),
        }
    }

    fn set(&mut self, var: StateVar, value: bool) {
        let n = self.processes();
        match var {
            StateVar::LeftFork(i) => self.has_left_fork[i % n] = value,
            StateVar::RightFork(i) => self.has_right_fork[i % n] = value,
        }
    }

    /// Copy of this state with one variable replaced.
    pub fn with(&self, var: StateVar, value: bool) -> State {
        let mut state = self.clone();
        state.set(var, value);
        state
    }

    pub fn with_left_fork(&self, i: usize, value: bool) -> State {
        self.with(StateVar::LeftFork(i), value)
    }

    pub fn with_right_fork(&self, i: usize, value: bool) -> State {
        self.with(StateVar::RightFork(i), value)
    }

    /// Variable assignment of this state in encoding order.
    pub fn assignment(&self) -> impl Iterator<Item = (StateVar, bool)> + '_ {
        (0..self.processes()).flat_map(move |i| {
            [
                (StateVar::LeftFork(i), self.has_left_fork[i]),
                (StateVar::RightFork(i), self.has_right_fork[i]),
            ]
        })
    }
}

fn fmt_flags(f: &mut fmt::Formatter<'_>, flags: &[bool]) -> fmt::Result {
    write!(f, "[")?;
    for (i, &b) in flags.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", if b { "T" } else { "F" })?;
    }
    write!(f, "]")
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HasLeft=")?;
        fmt_flags(f, &self.has_left_fork)?;
        write!(f, ", HasRight=")?;
        fmt_flags(f, &self.has_right_fork)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_shape_rejects_empty_ring() {
        assert_eq!(StateShape::new(0), Err(Error::EmptyRing));
        assert!(StateShape::new(1).is_ok());
    }

    #[test]
    fn test_neighbors_wrap() {
        let shape = StateShape::new(3).unwrap();
        assert_eq!(shape.left_neighbor(0), 2);
        assert_eq!(shape.right_neighbor(2), 0);
        assert_eq!(shape.left_neighbor(1), 0);
        assert_eq!(shape.wrap(-4), 2);
        assert_eq!(shape.left_fork(4), StateVar::LeftFork(1));

        let single = StateShape::new(1).unwrap();
        assert_eq!(single.left_neighbor(0), 0);
        assert_eq!(single.right_neighbor(0), 0);
    }

    #[test]
    fn test_var_order() {
        let shape = StateShape::new(2).unwrap();
        let vars: Vec<_> = shape.vars().collect();
        assert_eq!(
            vars,
            vec![
                StateVar::LeftFork(0),
                StateVar::RightFork(0),
                StateVar::LeftFork(1),
                StateVar::RightFork(1),
            ]
        );
        for (k, var) in vars.iter().enumerate() {
            assert_eq!(var.position(), k);
        }
    }

    #[test]
    fn test_enumerate_states() {
        let shape = StateShape::new(2).unwrap();
        let states: Vec<State> = shape.states().collect();
        assert_eq!(states.len(), 16);
        assert_eq!(states[0], shape.empty_state());
        let distinct: std::collections::HashSet<_> = states.iter().cloned().collect();
        assert_eq!(distinct.len(), 16);
    }

    #[test]
    fn test_state_updates_are_copies() {
        let shape = StateShape::new(2).unwrap();
        let s0 = shape.empty_state();
        let s1 = s0.with_left_fork(0, true);
        assert!(!s0.has_left_fork(0));
        assert!(s1.has_left_fork(0));
        assert!(s1.has_left_fork(2), "indices wrap around the ring");
        assert_eq!(s1.to_string(), "HasLeft=[T,F], HasRight=[F,F]");
    }

    #[test]
    fn test_state_new_validates() {
        assert_eq!(
            State::new(vec![false], vec![false, true]),
            Err(Error::RaggedState { left: 1, right: 2 })
        );
        assert_eq!(State::new(vec![], vec![]), Err(Error::EmptyRing));

        let state = State::new(vec![true, false], vec![false, true]).unwrap();
        let shape = StateShape::new(3).unwrap();
        assert_eq!(
            shape.check(&state),
            Err(Error::ShapeMismatch {
                expected: 3,
                found: 2
            })
        );
        let assignment: Vec<_> = state.assignment().collect();
        assert_eq!(assignment[0], (StateVar::LeftFork(0), true));
        assert_eq!(assignment[3], (StateVar::RightFork(1), true));
    }
}
