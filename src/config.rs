//! Configuration options for the search
//!
//! [`MCTSConfig`] controls the engine itself; [`SubgroupConfig`] adds the
//! dataset-facing settings used by [`find_subgroup`](crate::search::find_subgroup).

use std::collections::BTreeSet;
use std::time::Duration;

use crate::{accidents, MCTSError, Result};

/// Criteria for selecting the best child after search is complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestChildCriteria {
    /// Select the child with the highest mean reward
    ///
    /// Unvisited children are never chosen over visited ones.
    HighestValue,

    /// Select the child with the most visits
    ///
    /// More conservative: it relies on statistical confidence rather than
    /// potentially noisy value estimates.
    MostVisits,
}

/// Configuration for the MCTS algorithm
///
/// Use the builder methods to create a customized configuration.
///
/// # Example
///
/// ```
/// use subgroup_mcts::{MCTSConfig, config::BestChildCriteria};
/// use std::time::Duration;
///
/// let config = MCTSConfig::default()
///     .with_exploration_constant(1.5)
///     .with_max_iterations(10_000)
///     .with_max_time(Duration::from_secs(5))
///     .with_seed(7)
///     .with_best_child_criteria(BestChildCriteria::MostVisits);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct MCTSConfig {
    /// Exploration constant for UCB1
    ///
    /// Controls the balance between exploration and exploitation.
    /// Higher values favor exploration of less-visited nodes.
    /// The standard value is sqrt(2) ≈ 1.414.
    pub exploration_constant: f64,

    /// Number of rollouts to run
    pub max_iterations: usize,

    /// Maximum time to run the search
    ///
    /// Checked before each rollout. When it runs out the search stops and
    /// the answer is chosen from the statistics gathered so far.
    pub max_time: Option<Duration>,

    /// Seed for the random source used by playouts
    ///
    /// Identical seeds and rollout counts give identical searches. When
    /// unset the engine seeds itself from system entropy.
    pub seed: Option<u64>,

    /// Criteria for selecting the best child after search
    pub best_child_criteria: BestChildCriteria,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        MCTSConfig {
            exploration_constant: 1.414, // sqrt(2)
            max_iterations: 100,
            max_time: None,
            seed: None,
            best_child_criteria: BestChildCriteria::HighestValue,
        }
    }
}

impl MCTSConfig {
    /// Sets the exploration constant
    pub fn with_exploration_constant(mut self, constant: f64) -> Self {
        self.exploration_constant = constant;
        self
    }

    /// Sets the number of rollouts
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets the maximum time to run the search
    pub fn with_max_time(mut self, duration: Duration) -> Self {
        self.max_time = Some(duration);
        self
    }

    /// Sets the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the criteria for selecting the best child
    pub fn with_best_child_criteria(mut self, criteria: BestChildCriteria) -> Self {
        self.best_child_criteria = criteria;
        self
    }

    /// Checks that the configuration describes a runnable search
    pub fn validate(&self) -> Result<()> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(MCTSError::InvalidConfiguration(format!(
                "exploration constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        if self.max_iterations == 0 {
            return Err(MCTSError::InvalidConfiguration(
                "rollout count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration of a subgroup search over a dataset
#[derive(Debug, Clone)]
pub struct SubgroupConfig {
    /// Engine settings
    pub mcts: MCTSConfig,

    /// Columns that never become conditions
    pub excluded_columns: BTreeSet<String>,

    /// Numeric column summed to score a subgroup
    pub reward_column: String,

    /// Drop columns holding a single distinct value from the catalog
    pub prune_constant_columns: bool,
}

impl Default for SubgroupConfig {
    fn default() -> Self {
        SubgroupConfig {
            mcts: MCTSConfig::default(),
            excluded_columns: accidents::DEFAULT_EXCLUDED_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            reward_column: accidents::ACCIDENT_COUNT_COLUMN.to_string(),
            prune_constant_columns: false,
        }
    }
}

impl SubgroupConfig {
    /// Sets the engine configuration
    pub fn with_mcts(mut self, mcts: MCTSConfig) -> Self {
        self.mcts = mcts;
        self
    }

    /// Replaces the excluded columns
    pub fn with_excluded_columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.excluded_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one excluded column
    pub fn exclude_column(mut self, column: impl Into<String>) -> Self {
        self.excluded_columns.insert(column.into());
        self
    }

    /// Sets the reward column
    pub fn with_reward_column(mut self, column: impl Into<String>) -> Self {
        self.reward_column = column.into();
        self
    }

    /// Sets whether single-valued columns are pruned from the catalog
    pub fn with_constant_column_pruning(mut self, prune: bool) -> Self {
        self.prune_constant_columns = prune;
        self
    }
}
