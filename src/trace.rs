//! Ultimately periodic executions.

use std::fmt;
use std::ops::Range;

use crate::error::{Error, Result};
use crate::state::State;

/// A lasso-shaped infinite execution: a finite stem followed by a cycle that repeats forever.
///
/// Positions `0..stem.len()` index the stem, the following `cycle.len()` positions index the
/// cycle. The successor of the last position is the first cycle position.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Lasso {
    stem: Vec<State>,
    cycle: Vec<State>,
}

impl Lasso {
    pub fn new(stem: Vec<State>, cycle: Vec<State>) -> Result<Self> {
        if cycle.is_empty() {
            return Err(Error::EmptyCycle);
        }
        Ok(Self { stem, cycle })
    }

    pub fn stem(&self) -> &[State] {
        &self.stem
    }

    pub fn cycle(&self) -> &[State] {
        &self.cycle
    }

    /// Number of distinct positions (stem plus one unrolling of the cycle).
    pub fn len(&self) -> usize {
        self.stem.len() + self.cycle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position at which the cycle starts.
    pub fn loop_start(&self) -> usize {
        self.stem.len()
    }

    pub fn state(&self, pos: usize) -> &State {
        if pos < self.stem.len() {
            &self.stem[pos]
        } else {
            &self.cycle[pos - self.stem.len()]
        }
    }

    pub fn successor(&self, pos: usize) -> usize {
        if pos + 1 < self.len() {
            pos + 1
        } else {
            self.loop_start()
        }
    }

    /// Positions visited at or after `pos` on the infinite execution.
    pub fn future(&self, pos: usize) -> Range<usize> {
        if pos < self.loop_start() {
            pos..self.len()
        } else {
            self.loop_start()..self.len()
        }
    }

    /// All states in order, stem first.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.stem.iter().chain(self.cycle.iter())
    }

    /// Every step of the execution as `(position, from, to)`, including the back edge.
    pub fn steps(&self) -> impl Iterator<Item = (usize, &State, &State)> {
        (0..self.len()).map(move |pos| (pos, self.state(pos), self.state(self.successor(pos))))
    }
}

impl fmt::Display for Lasso {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, state) in self.states().enumerate() {
            let marker = if pos == self.loop_start() { "LOOP START" } else { "" };
            writeln!(f, "{:>3}: {} {}", pos, state, marker)?;
        }
        write!(f, "  -> {}", self.loop_start())
    }
}
