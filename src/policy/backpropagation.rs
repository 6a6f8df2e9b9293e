//! Backpropagation policies for the MCTS algorithm
//!
//! Backpropagation policies determine how to update node statistics
//! after a rollout.

use crate::tree::NodeStats;

/// Trait for policies that backpropagate rollout rewards
pub trait BackpropagationPolicy: Send + Sync {
    /// Updates statistics for a node at `depth` based on a rollout reward
    fn update_stats(&self, stats: &mut NodeStats, depth: usize, reward: f64);

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn BackpropagationPolicy>;
}

/// Standard backpropagation policy
///
/// This policy simply increments the visit count and adds the reward
/// to the total reward.
#[derive(Debug, Clone)]
pub struct StandardPolicy;

impl StandardPolicy {
    /// Creates a new standard policy
    pub fn new() -> Self {
        StandardPolicy
    }
}

impl Default for StandardPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl BackpropagationPolicy for StandardPolicy {
    fn update_stats(&self, stats: &mut NodeStats, _depth: usize, reward: f64) {
        stats.increment_visits();
        stats.add_reward(reward);
    }

    fn clone_box(&self) -> Box<dyn BackpropagationPolicy> {
        Box::new(self.clone())
    }
}

// Implement BackpropagationPolicy for Box<dyn BackpropagationPolicy>
impl BackpropagationPolicy for Box<dyn BackpropagationPolicy> {
    fn update_stats(&self, stats: &mut NodeStats, depth: usize, reward: f64) {
        (**self).update_stats(stats, depth, reward)
    }

    fn clone_box(&self) -> Box<dyn BackpropagationPolicy> {
        (**self).clone_box()
    }
}

/// Weighted backpropagation policy
///
/// This policy weights rewards by how deep the updated node sits in the
/// tree. Visits are always counted in full.
#[derive(Debug, Clone)]
pub struct WeightedPolicy {
    /// Depth weighting factor (how quickly weight changes with depth)
    /// - Positive values make deeper nodes less influential
    /// - Negative values make deeper nodes more influential
    pub depth_factor: f64,
}

impl WeightedPolicy {
    /// Creates a new weighted policy with the given depth factor
    pub fn new(depth_factor: f64) -> Self {
        WeightedPolicy { depth_factor }
    }
}

impl BackpropagationPolicy for WeightedPolicy {
    fn update_stats(&self, stats: &mut NodeStats, depth: usize, reward: f64) {
        let weight = 1.0 / (1.0 + self.depth_factor * depth as f64);

        stats.increment_visits();
        stats.add_reward(reward * weight);
    }

    fn clone_box(&self) -> Box<dyn BackpropagationPolicy> {
        Box::new(self.clone())
    }
}
