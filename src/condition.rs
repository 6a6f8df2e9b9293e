//! Filter conditions and the catalog of candidate refinements
//!
//! A [`Condition`] is a single `column = value` equality. A
//! [`ConditionPath`] is the ordered conjunction applied so far, and the
//! [`ConditionCatalog`] lists every condition the search may add.

use std::collections::BTreeSet;
use std::fmt;

use crate::dataset::{Dataset, Value};
use crate::Result;

/// An equality predicate on one column
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Condition {
    /// Column the predicate tests
    pub column: String,
    /// Value the column must equal
    pub value: Value,
}

impl Condition {
    /// Creates a new condition
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition {
            column: column.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.column, self.value)
    }
}

/// Ordered conjunction of conditions, from the root to a node
///
/// Order is part of the identity: `[A, B]` and `[B, A]` are different paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConditionPath(Vec<Condition>);

impl ConditionPath {
    /// Creates an empty path (the root)
    pub fn new() -> Self {
        ConditionPath(Vec::new())
    }

    /// Returns a new path with `condition` appended
    pub fn extended(&self, condition: Condition) -> Self {
        let mut conditions = Vec::with_capacity(self.0.len() + 1);
        conditions.extend_from_slice(&self.0);
        conditions.push(condition);
        ConditionPath(conditions)
    }

    /// Returns true if the condition already appears on the path
    pub fn contains(&self, condition: &Condition) -> bool {
        self.0.contains(condition)
    }

    /// Number of conditions on the path
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the root path
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the conditions in application order
    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.0.iter()
    }

    /// Returns the conditions as a slice
    pub fn as_slice(&self) -> &[Condition] {
        &self.0
    }
}

impl From<Vec<Condition>> for ConditionPath {
    fn from(conditions: Vec<Condition>) -> Self {
        ConditionPath(conditions)
    }
}

impl<'a> IntoIterator for &'a ConditionPath {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ConditionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, condition) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", condition)?;
        }
        write!(f, "]")
    }
}

/// Every condition a node may be refined with, in a fixed order
///
/// The order is deterministic for a given dataset: columns in table order,
/// then values in [`Value`] order. Seeded searches rely on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionCatalog {
    conditions: Vec<Condition>,
}

impl ConditionCatalog {
    /// One condition per distinct value of every non-excluded column
    ///
    /// Columns with a single distinct value are kept even though their
    /// condition never removes a row.
    pub fn enumerate(dataset: &Dataset, excluded_columns: &BTreeSet<String>) -> Result<Self> {
        Self::collect(dataset, excluded_columns, false)
    }

    /// Like [`enumerate`](Self::enumerate), but skips columns that hold a
    /// single distinct value and so cannot discriminate rows
    pub fn enumerate_pruned(
        dataset: &Dataset,
        excluded_columns: &BTreeSet<String>,
    ) -> Result<Self> {
        Self::collect(dataset, excluded_columns, true)
    }

    /// Uses a fixed, hand-picked list of conditions
    ///
    /// Duplicates are dropped; the first occurrence keeps its position.
    pub fn from_conditions(conditions: impl IntoIterator<Item = Condition>) -> Self {
        let mut seen = BTreeSet::new();
        let conditions = conditions
            .into_iter()
            .filter(|c| seen.insert(c.clone()))
            .collect();
        ConditionCatalog { conditions }
    }

    fn collect(
        dataset: &Dataset,
        excluded_columns: &BTreeSet<String>,
        prune_constant: bool,
    ) -> Result<Self> {
        let mut conditions = Vec::new();

        for column in dataset.columns() {
            if excluded_columns.contains(column) {
                continue;
            }

            let values = dataset.unique_values(column)?;
            if prune_constant && values.len() < 2 {
                log::debug!("Skipping non-discriminating column {}", column);
                continue;
            }

            conditions.extend(
                values
                    .into_iter()
                    .map(|value| Condition::new(column.as_str(), value)),
            );
        }

        log::debug!("Catalog holds {} conditions", conditions.len());

        Ok(ConditionCatalog { conditions })
    }

    /// The catalog conditions in order
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Number of conditions
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Returns true if the catalog has no condition at all
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}
