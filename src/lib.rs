//! # subgroup-mcts
//!
//! A Monte Carlo Tree Search (MCTS) over the lattice of `column = value`
//! filters of a tabular dataset.
//!
//! The search looks for the subgroup of traffic-accident records, defined
//! by a conjunction of conditions, with the best reward. Each tree vertex is
//! a [`SubgroupNode`]: the dataset filtered by an ordered list of
//! conditions. Instead of enumerating every conjunction, MCTS spends its
//! rollouts on the refinements that look most promising.
//!
//! ## Features
//!
//! - Non-destructive filtering over a shared, immutable table
//! - Deterministic condition catalog and seeded random playouts
//! - Statistics table keyed by condition-path identity
//! - Pluggable selection, simulation and backpropagation policies
//! - Time-limited searches and progress reporting
//!
//! ## Basic Usage
//!
//! ```
//! use subgroup_mcts::{
//!     find_subgroup, Dataset, MCTSConfig, SubgroupConfig, Value,
//! };
//!
//! fn main() -> Result<(), subgroup_mcts::MCTSError> {
//!     let dataset = Dataset::new(
//!         vec!["WEATHER".to_string(), "NUM_ACIDENTES".to_string()],
//!         vec![
//!             vec![Value::from("RAIN"), Value::Integer(1)],
//!             vec![Value::from("RAIN"), Value::Integer(1)],
//!             vec![Value::from("CLEAR"), Value::Integer(1)],
//!         ],
//!     )?;
//!
//!     let config = SubgroupConfig::default()
//!         .with_mcts(MCTSConfig::default().with_max_iterations(50).with_seed(42));
//!
//!     let report = find_subgroup(dataset, &config)?;
//!     println!("{}", report);
//!     assert_eq!(report.conditions.len(), 1);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## How It Works
//!
//! Every rollout runs four phases from the root:
//!
//! 1. **Selection**: descend through expanded states, picking the child
//!    with the highest UCB1 score (unvisited children first).
//!
//! 2. **Expansion**: register every child of the selected state in the
//!    statistics table with zero visits.
//!
//! 3. **Simulation**: apply uniformly random conditions until no row is
//!    left, then read the reward.
//!
//! 4. **Backpropagation**: add one visit and the reward to every state from
//!    the root to the end of the playout.
//!
//! After the rollouts, [`MCTS::choose`] returns the root child with the
//! highest mean reward.

pub mod accidents;
pub mod condition;
pub mod config;
pub mod dataset;
pub mod mcts;
pub mod node;
pub mod policy;
pub mod search;
pub mod state;
pub mod stats;
pub mod tree;
pub mod utils;

pub use condition::{Condition, ConditionCatalog, ConditionPath};
pub use config::{MCTSConfig, SubgroupConfig};
pub use dataset::{Dataset, Value};
pub use mcts::MCTS;
pub use node::SubgroupNode;
pub use policy::{BackpropagationPolicy, SelectionPolicy, SimulationPolicy};
pub use search::{find_subgroup, SubgroupReport};
pub use state::{Playout, SearchState};
pub use stats::SearchStatistics;
pub use tree::{NodePath, NodeStats, SearchTree};

/// Error types for the subgroup search
#[derive(thiserror::Error, Debug)]
pub enum MCTSError {
    /// A state was used in a way its lifecycle does not allow
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// There is no visited child to recommend
    #[error("No children available: state is terminal or no child was visited")]
    NoChildren,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A column name does not exist in the dataset
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// A cell could not be summed
    #[error("Non-numeric value '{value}' in column '{column}'")]
    NonNumericValue {
        /// Column being summed
        column: String,
        /// Offending cell
        value: String,
    },

    /// Malformed table
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),
}

/// Result type for MCTS operations
pub type Result<T> = std::result::Result<T, MCTSError>;
