//! Subgroup nodes: search-tree vertices over filtered datasets
//!
//! A [`SubgroupNode`] is "the root dataset filtered by this ordered list of
//! conditions". Its identity is the condition path alone; the filtered view
//! is derived data carried alongside for terminal tests and rewards.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use crate::{
    condition::{Condition, ConditionCatalog, ConditionPath},
    dataset::Dataset,
    state::SearchState,
    Result,
};

/// A catalog condition with its column resolved against the root table
#[derive(Debug)]
struct ResolvedCondition {
    column: usize,
    condition: Condition,
}

/// Data shared by every node of one search
#[derive(Debug)]
struct SearchSpace {
    catalog: Vec<ResolvedCondition>,
    reward_column: String,
    reward_index: usize,
}

struct NodeInner {
    conditions: ConditionPath,
    fingerprint: u64,
    view: Dataset,
    space: Arc<SearchSpace>,
    children: OnceLock<Vec<SubgroupNode>>,
}

/// A subgroup of the root dataset defined by an ordered condition path
///
/// Cloning is cheap and clones share the children cache.
#[derive(Clone)]
pub struct SubgroupNode {
    inner: Arc<NodeInner>,
}

fn fingerprint(conditions: &ConditionPath) -> u64 {
    let mut hasher = DefaultHasher::new();
    conditions.hash(&mut hasher);
    hasher.finish()
}

impl SubgroupNode {
    /// Creates the root node: the full dataset and an empty path
    ///
    /// Every catalog column and the reward column must exist in `dataset`.
    pub fn root(dataset: Dataset, catalog: &ConditionCatalog, reward_column: &str) -> Result<Self> {
        let reward_index = dataset.column_index(reward_column)?;

        let catalog = catalog
            .conditions()
            .iter()
            .map(|condition| {
                Ok(ResolvedCondition {
                    column: dataset.column_index(&condition.column)?,
                    condition: condition.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let space = Arc::new(SearchSpace {
            catalog,
            reward_column: reward_column.to_string(),
            reward_index,
        });

        Ok(Self::with_path(ConditionPath::new(), dataset, space))
    }

    fn with_path(conditions: ConditionPath, view: Dataset, space: Arc<SearchSpace>) -> Self {
        SubgroupNode {
            inner: Arc::new(NodeInner {
                fingerprint: fingerprint(&conditions),
                conditions,
                view,
                space,
                children: OnceLock::new(),
            }),
        }
    }

    /// The ordered conditions defining this subgroup
    pub fn conditions(&self) -> &ConditionPath {
        &self.inner.conditions
    }

    /// The rows of the root dataset satisfying every condition
    pub fn dataset(&self) -> &Dataset {
        &self.inner.view
    }

    /// Number of rows in this subgroup
    pub fn len(&self) -> usize {
        self.inner.view.len()
    }

    /// Returns true if no row satisfies the conditions
    pub fn is_empty(&self) -> bool {
        self.inner.view.is_empty()
    }

    /// Sum of the reward column over this subgroup
    pub fn accident_count(&self) -> Result<f64> {
        let space = &self.inner.space;
        self.inner
            .view
            .aggregate_at(space.reward_index, &space.reward_column)
    }

    /// Returns true once the children have been computed
    pub fn is_expanded(&self) -> bool {
        self.inner.children.get().is_some()
    }

    fn build_children(&self) -> Vec<SubgroupNode> {
        if self.is_terminal() {
            return Vec::new();
        }

        let space = &self.inner.space;
        let children: Vec<SubgroupNode> = space
            .catalog
            .iter()
            .filter(|resolved| !self.inner.conditions.contains(&resolved.condition))
            .map(|resolved| {
                let view = self
                    .inner
                    .view
                    .filter_at(resolved.column, &resolved.condition.value);
                let conditions = self.inner.conditions.extended(resolved.condition.clone());
                SubgroupNode::with_path(conditions, view, Arc::clone(space))
            })
            .collect();

        log::trace!(
            "Expanded {} into {} children",
            self.inner.conditions,
            children.len()
        );

        children
    }
}

impl SearchState for SubgroupNode {
    fn expand(&self) -> &[Self] {
        self.inner.children.get_or_init(|| self.build_children())
    }

    fn is_terminal(&self) -> bool {
        self.inner.view.is_empty()
    }

    /// Negated accident count: fewer accidents means a larger reward
    fn evaluate(&self) -> Result<f64> {
        Ok(0.0 - self.accident_count()?)
    }

    fn depth(&self) -> usize {
        self.inner.conditions.len()
    }
}

impl PartialEq for SubgroupNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.fingerprint == other.inner.fingerprint
                && self.inner.conditions == other.inner.conditions)
    }
}

impl Eq for SubgroupNode {}

impl Hash for SubgroupNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.inner.fingerprint);
    }
}

impl fmt::Debug for SubgroupNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubgroupNode")
            .field("conditions", &self.inner.conditions)
            .field("rows", &self.inner.view.len())
            .field("expanded", &self.is_expanded())
            .finish()
    }
}

impl fmt::Display for SubgroupNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} rows)", self.inner.conditions, self.inner.view.len())
    }
}
