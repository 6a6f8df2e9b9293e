//! Entry point running a full subgroup search over a prepared dataset

use std::fmt;

use crate::{
    condition::{ConditionCatalog, ConditionPath},
    config::SubgroupConfig,
    dataset::Dataset,
    mcts::MCTS,
    node::SubgroupNode,
    state::SearchState,
    stats::SearchStatistics,
    Result,
};

/// Outcome of a subgroup search
#[derive(Debug, Clone)]
pub struct SubgroupReport {
    /// Conditions of the chosen subgroup
    pub conditions: ConditionPath,

    /// Number of rows in the chosen subgroup
    pub rows: usize,

    /// Sum of the reward column over the chosen subgroup
    pub accidents: f64,

    /// Negated accident count of the chosen subgroup
    pub reward: f64,

    /// Rollouts that passed through the chosen subgroup
    pub visits: u64,

    /// Mean rollout reward of the chosen subgroup
    pub mean_reward: f64,

    /// Greedy best-mean path from the chosen subgroup downwards
    pub principal_path: Vec<ConditionPath>,

    /// Statistics of the search run
    pub statistics: SearchStatistics,
}

impl fmt::Display for SubgroupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Best accident subgroup: {}", self.conditions)?;
        writeln!(f, "- Rows: {}", self.rows)?;
        writeln!(f, "- Accidents: {}", self.accidents)?;
        writeln!(f, "- Reward: {}", self.reward)?;
        write!(
            f,
            "- Visits: {} (mean reward {:.3})",
            self.visits, self.mean_reward
        )
    }
}

/// Builds the search space for `dataset` and returns its root node
pub fn build_root(dataset: Dataset, config: &SubgroupConfig) -> Result<SubgroupNode> {
    let catalog = if config.prune_constant_columns {
        ConditionCatalog::enumerate_pruned(&dataset, &config.excluded_columns)?
    } else {
        ConditionCatalog::enumerate(&dataset, &config.excluded_columns)?
    };

    if catalog.is_empty() {
        log::warn!("No candidate conditions: every column is excluded or empty");
    }

    SubgroupNode::root(dataset, &catalog, &config.reward_column)
}

/// Searches `dataset` for the subgroup with the best reward
///
/// Runs `config.mcts.max_iterations` rollouts from the full dataset and
/// reports the best immediate refinement of the root.
pub fn find_subgroup(dataset: Dataset, config: &SubgroupConfig) -> Result<SubgroupReport> {
    let root = build_root(dataset, config)?;
    let mut mcts = MCTS::new(root, config.mcts.clone());

    let best = mcts.search()?;
    let stats = mcts.stats(&best);
    let accidents = best.accident_count()?;

    let principal_path = mcts
        .principal_path(&best)
        .iter()
        .map(|node| node.conditions().clone())
        .collect();

    let report = SubgroupReport {
        conditions: best.conditions().clone(),
        rows: best.len(),
        accidents,
        reward: best.evaluate()?,
        visits: stats.visits(),
        mean_reward: stats.value(),
        principal_path,
        statistics: mcts.get_statistics().clone(),
    };

    log::info!("Best subgroup {} with {} accidents", report.conditions, accidents);

    Ok(report)
}
