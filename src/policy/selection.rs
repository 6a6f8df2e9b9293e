//! Selection policies for the MCTS algorithm
//!
//! Selection policies determine which child to descend into during the
//! selection phase of MCTS, balancing exploration and exploitation.

use crate::{tree::NodeStats, utils};

/// Trait for policies that select children to explore
pub trait SelectionPolicy: Send + Sync {
    /// Selects a child index given the parent's and each child's statistics
    ///
    /// `children` is never empty and follows the parent's expansion order.
    fn select_child(&self, parent: &NodeStats, children: &[NodeStats]) -> usize;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn SelectionPolicy>;
}

/// Upper Confidence Bound 1 (UCB1) selection policy
///
/// This is the classic selection policy for MCTS, which balances
/// exploration and exploitation using the UCB1 formula:
///
/// ```text
/// UCB1 = average_reward + exploration_constant * sqrt(ln(parent_visits) / child_visits)
/// ```
///
/// Unvisited children score infinity and are always preferred. Ties go to
/// the earliest child, which keeps seeded searches reproducible.
#[derive(Debug, Clone)]
pub struct UCB1Policy {
    /// Exploration constant that controls the balance between exploration and exploitation.
    /// Higher values favor exploration of less-visited nodes.
    pub exploration_constant: f64,
}

impl UCB1Policy {
    /// Creates a new UCB1 policy with the given exploration constant
    pub fn new(exploration_constant: f64) -> Self {
        UCB1Policy {
            exploration_constant,
        }
    }

    /// Calculates the UCB1 value for a child
    pub fn ucb1_value(&self, child: &NodeStats, parent_visits: u64) -> f64 {
        utils::ucb1_value(
            child.total_reward,
            child.visits,
            parent_visits,
            self.exploration_constant,
        )
    }
}

impl Default for UCB1Policy {
    fn default() -> Self {
        Self::new(1.414)
    }
}

impl SelectionPolicy for UCB1Policy {
    fn select_child(&self, parent: &NodeStats, children: &[NodeStats]) -> usize {
        let mut best_value = f64::NEG_INFINITY;
        let mut best_index = 0;

        for (i, child) in children.iter().enumerate() {
            if child.visits == 0 {
                return i;
            }

            let ucb_value = self.ucb1_value(child, parent.visits);
            if ucb_value > best_value {
                best_value = ucb_value;
                best_index = i;
            }
        }

        best_index
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy> {
        Box::new(self.clone())
    }
}

// Implement SelectionPolicy for Box<dyn SelectionPolicy>
impl SelectionPolicy for Box<dyn SelectionPolicy> {
    fn select_child(&self, parent: &NodeStats, children: &[NodeStats]) -> usize {
        (**self).select_child(parent, children)
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy> {
        (**self).clone_box()
    }
}
