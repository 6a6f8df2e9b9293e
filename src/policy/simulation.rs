//! Simulation policies for the MCTS algorithm
//!
//! Simulation policies play a rollout out from the selected state and
//! report the states visited along with the reward read at the end.

use rand::RngCore;

use crate::{
    state::{Playout, SearchState},
    Result,
};

/// Trait for policies that simulate rollouts
pub trait SimulationPolicy<S: SearchState>: Send + Sync {
    /// Simulates from `state` using the engine's random source
    fn simulate(&self, state: &S, rng: &mut dyn RngCore) -> Result<Playout<S>>;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn SimulationPolicy<S>>;
}

/// Random simulation policy
///
/// This policy picks uniformly random children until the playout ends.
#[derive(Debug, Clone)]
pub struct RandomPolicy;

impl RandomPolicy {
    /// Creates a new random policy
    pub fn new() -> Self {
        RandomPolicy
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SearchState> SimulationPolicy<S> for RandomPolicy {
    fn simulate(&self, state: &S, rng: &mut dyn RngCore) -> Result<Playout<S>> {
        // Use the built-in random playout method
        state.random_playout(rng)
    }

    fn clone_box(&self) -> Box<dyn SimulationPolicy<S>> {
        Box::new(self.clone())
    }
}

// Implement SimulationPolicy for Box<dyn SimulationPolicy>
impl<S: SearchState> SimulationPolicy<S> for Box<dyn SimulationPolicy<S>> {
    fn simulate(&self, state: &S, rng: &mut dyn RngCore) -> Result<Playout<S>> {
        (**self).simulate(state, rng)
    }

    fn clone_box(&self) -> Box<dyn SimulationPolicy<S>> {
        (**self).clone_box()
    }
}
