//! Ordered state sequences.
//!
//! A progression moves through a fixed, totally ordered list of named states.
//! The sequence is validated once at construction and never changes after.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LadderError, Result};

/// A position in a state sequence.
///
/// Carries both the index (for ordering) and the name (for display and
/// lookup). Values are snapshots; holding one never borrows the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    /// Zero-based position in the sequence.
    pub index: usize,
    /// State name, e.g. `INITIALIZATION`.
    pub name: String,
}

impl State {
    /// Check whether this state comes strictly before another one.
    pub fn precedes(&self, other: &State) -> bool {
        self.index < other.index
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Immutable, non-empty, duplicate-free ordered list of state names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StateSequence {
    names: Vec<String>,
}

impl StateSequence {
    /// Build a sequence from state names in progression order.
    ///
    /// Fails if the list is empty, a name is blank, or a name repeats.
    pub fn new<I, N>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        if names.is_empty() {
            return Err(LadderError::invalid_sequence("sequence is empty"));
        }

        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(LadderError::invalid_sequence(format!(
                    "state {} has a blank name",
                    i
                )));
            }
            if names[..i].contains(name) {
                return Err(LadderError::invalid_sequence(format!(
                    "duplicate state name '{}'",
                    name
                )));
            }
        }

        Ok(Self { names })
    }

    /// Build a sequence from static names. Only for sequences known to be valid.
    pub(crate) fn from_static(names: &[&str]) -> Self {
        let sequence = Self {
            names: names.iter().map(|n| n.to_string()).collect(),
        };
        debug_assert!(Self::new(names.iter().copied()).is_ok());
        sequence
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false; sequences are never empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The initial state.
    pub fn first(&self) -> State {
        self.state(0)
    }

    /// The terminal state.
    pub fn last(&self) -> State {
        self.state(self.last_index())
    }

    /// Index of the terminal state.
    pub fn last_index(&self) -> usize {
        self.names.len() - 1
    }

    /// Check if the index is the terminal state.
    pub fn is_terminal(&self, index: usize) -> bool {
        index >= self.last_index()
    }

    /// Look up a state by index.
    pub fn get(&self, index: usize) -> Option<State> {
        self.names.get(index).map(|name| State {
            index,
            name: name.clone(),
        })
    }

    /// Look up a state by name.
    pub fn find(&self, name: &str) -> Option<State> {
        self.position(name).map(|index| self.state(index))
    }

    /// Resolve a name to a state, failing for names outside the sequence.
    pub fn resolve(&self, name: &str) -> Result<State> {
        self.find(name).ok_or_else(|| LadderError::unknown_state(name))
    }

    /// Position of a name in the sequence.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Check that a state belongs to this sequence (same index and name).
    pub fn contains(&self, state: &State) -> bool {
        self.names.get(state.index) == Some(&state.name)
    }

    /// State names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate over all states in order.
    pub fn iter(&self) -> impl Iterator<Item = State> + '_ {
        (0..self.names.len()).map(move |i| self.state(i))
    }

    /// Build the state at a known-valid index.
    pub(crate) fn state(&self, index: usize) -> State {
        State {
            index,
            name: self.names[index].clone(),
        }
    }
}
