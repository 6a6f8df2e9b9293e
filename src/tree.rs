//! Tree bookkeeping for Monte Carlo Tree Search
//!
//! The tree is not stored as linked nodes. Instead, [`SearchTree`] keeps a
//! statistics table keyed by state identity, plus the set of states whose
//! children have been registered. The children themselves come from
//! [`SearchState::expand`], which each state memoizes.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::{state::SearchState, utils};

/// Visit and reward statistics for one state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeStats {
    /// Number of rollouts that passed through this state
    pub visits: u64,

    /// Sum of the rewards of those rollouts
    pub total_reward: f64,
}

impl NodeStats {
    /// Returns the number of visits to this node
    pub fn visits(&self) -> u64 {
        self.visits
    }

    /// Returns the total reward accumulated at this node
    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    /// Returns the mean reward (value) of this node, 0 when unvisited
    pub fn value(&self) -> f64 {
        utils::exploitation_term(self.total_reward, self.visits)
    }

    /// Increments the visit count
    pub fn increment_visits(&mut self) {
        self.visits += 1;
    }

    /// Adds reward to the total
    pub fn add_reward(&mut self, reward: f64) {
        self.total_reward += reward;
    }
}

/// Run-scoped statistics table of a search
#[derive(Debug, Clone)]
pub struct SearchTree<S: SearchState> {
    stats: HashMap<S, NodeStats>,
    expanded: HashSet<S>,
}

impl<S: SearchState> SearchTree<S> {
    /// Creates an empty tree
    pub fn new() -> Self {
        SearchTree {
            stats: HashMap::new(),
            expanded: HashSet::new(),
        }
    }

    /// Returns the statistics of a state, if it is in the table
    pub fn get(&self, state: &S) -> Option<&NodeStats> {
        self.stats.get(state)
    }

    /// Returns the statistics of a state, zero if it is not in the table
    pub fn stats(&self, state: &S) -> NodeStats {
        self.stats.get(state).copied().unwrap_or_default()
    }

    /// Returns the visit count of a state
    pub fn visits(&self, state: &S) -> u64 {
        self.stats(state).visits
    }

    /// Returns true if the state is in the statistics table
    pub fn contains(&self, state: &S) -> bool {
        self.stats.contains_key(state)
    }

    /// Returns the statistics entry of a state, inserting zeros if missing
    pub fn entry(&mut self, state: &S) -> &mut NodeStats {
        self.stats.entry(state.clone()).or_default()
    }

    /// Returns true if the children of this state are registered
    pub fn is_expanded(&self, state: &S) -> bool {
        self.expanded.contains(state)
    }

    /// Registers `state` and all of its children with zero visits
    ///
    /// Returns the number of states that were not in the table before.
    pub fn register_children(&mut self, state: &S) -> usize {
        let before = self.stats.len();
        self.entry(state);
        for child in state.expand() {
            self.entry(child);
        }
        self.expanded.insert(state.clone());
        self.stats.len() - before
    }

    /// Number of states in the table
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// Returns true if nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Forgets every statistic
    pub fn clear(&mut self) {
        self.stats.clear();
        self.expanded.clear();
    }
}

impl<S: SearchState> Default for SearchTree<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// The states visited by one rollout, from the root downwards
#[derive(Debug, Clone)]
pub struct NodePath<S> {
    states: Vec<S>,
}

impl<S: SearchState> NodePath<S> {
    /// Creates a path holding only the root
    pub fn new(root: S) -> Self {
        NodePath { states: vec![root] }
    }

    /// Extends the path with a new state
    pub fn push(&mut self, state: S) {
        self.states.push(state);
    }

    /// Appends every state of a playout trace
    pub fn extend<I: IntoIterator<Item = S>>(&mut self, states: I) {
        self.states.extend(states);
    }

    /// The deepest state on the path
    pub fn leaf(&self) -> &S {
        // A path always holds at least the root.
        &self.states[self.states.len() - 1]
    }

    /// The states in root-to-leaf order
    pub fn states(&self) -> &[S] {
        &self.states
    }

    /// Number of edges on the path
    pub fn depth(&self) -> usize {
        self.states.len() - 1
    }
}

impl<S: SearchState + fmt::Display> fmt::Display for NodePath<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path[")?;
        for (i, state) in self.states.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", state)?;
        }
        write!(f, "]")
    }
}
