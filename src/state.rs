//! The state interface searched by the MCTS engine.
//!
//! [`SearchState`] is what the engine needs from a tree vertex: memoized
//! children, a terminal test and a reward. [`SubgroupNode`](crate::node::SubgroupNode)
//! is the production implementation; tests plug in small synthetic states.

use std::hash::Hash;

use rand::{seq::SliceRandom, Rng};

use crate::{MCTSError, Result};

/// Outcome of one simulated playout
#[derive(Debug, Clone)]
pub struct Playout<S> {
    /// States visited below the starting state, in order
    pub trace: Vec<S>,

    /// Reward read at the end of the playout
    pub reward: f64,

    /// True if the playout stopped on a non-terminal state without children
    pub dead_end: bool,
}

/// Trait defining a vertex of the search space
///
/// Identity matters: the engine keys its statistics table by `Eq + Hash`,
/// so two independently built states that represent the same logical
/// vertex must compare and hash equal.
pub trait SearchState: Clone + Eq + Hash + Send + Sync {
    /// Returns the children of this state
    ///
    /// Implementations must compute the children at most once and return
    /// them in a stable order; terminal states return an empty slice.
    fn expand(&self) -> &[Self];

    /// Returns true if this state is terminal
    fn is_terminal(&self) -> bool;

    /// Scores the state as it stands, terminal or not
    ///
    /// Used for terminal rewards and for playouts that run out of children
    /// before reaching a terminal state.
    fn evaluate(&self) -> Result<f64>;

    /// Returns the reward of a terminal state
    ///
    /// Asking for the reward of a non-terminal state is a contract
    /// violation and fails with [`MCTSError::InvalidState`].
    fn reward(&self) -> Result<f64> {
        if !self.is_terminal() {
            return Err(MCTSError::InvalidState(
                "reward requested on a non-terminal state".to_string(),
            ));
        }
        self.evaluate()
    }

    /// Picks one child uniformly at random, or `None` if there is none
    fn sample_child<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Self> {
        self.expand().choose(rng)
    }

    /// Depth of this state below the root (root = 0)
    fn depth(&self) -> usize {
        0
    }

    /// Plays uniformly random children until a terminal state is reached
    ///
    /// A non-terminal state without children ends the playout early and is
    /// scored with [`evaluate`](Self::evaluate) instead of looping forever.
    fn random_playout<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Playout<Self>> {
        let mut current = self.clone();
        let mut trace = Vec::new();

        while !current.is_terminal() {
            let next = match current.sample_child(rng) {
                Some(child) => child.clone(),
                None => {
                    let reward = current.evaluate()?;
                    return Ok(Playout {
                        trace,
                        reward,
                        dead_end: true,
                    });
                }
            };
            trace.push(next.clone());
            current = next;
        }

        Ok(Playout {
            trace,
            reward: current.reward()?,
            dead_end: false,
        })
    }
}
