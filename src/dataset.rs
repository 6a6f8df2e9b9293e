//! Immutable tabular dataset with non-destructive filtering
//!
//! A [`Dataset`] is a view over a shared table: the cells live in one
//! reference-counted table and each view only owns the list of row ids it
//! contains. Filtering produces a new view and never touches the table, so
//! any number of filter paths can share the same root data.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::{condition::Condition, MCTSError, Result};

/// A single scalar cell value
///
/// Floating point cells are not supported: conditions need total equality,
/// ordering and hashing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    /// Missing cell
    Null,
    /// Boolean cell
    Boolean(bool),
    /// Integer cell
    Integer(i64),
    /// Text cell
    Text(String),
}

impl Value {
    /// Coerces a raw delimited-text cell into a typed value
    ///
    /// Empty cells become `Null`, `true`/`false` (any case) become booleans,
    /// integers become `Integer`, everything else is kept as trimmed text.
    pub fn parse(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Value::Boolean(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Value::Boolean(false);
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Integer(i);
        }
        Value::Text(trimmed.to_string())
    }

    /// Returns the numeric contribution of this cell to a sum
    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Null => Some(0.0),
            Value::Integer(i) => Some(*i as f64),
            Value::Boolean(_) | Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

/// Backing storage shared by every view
#[derive(Debug)]
struct Table {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    fn build(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(MCTSError::InvalidDataset(format!(
                    "duplicate column '{}'",
                    name
                )));
            }
        }

        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != columns.len())
        {
            return Err(MCTSError::InvalidDataset(format!(
                "row {} has {} cells, expected {}",
                row,
                cells.len(),
                columns.len()
            )));
        }

        Ok(Table {
            columns,
            index,
            rows,
        })
    }
}

/// A read-only row of a dataset
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    cells: &'a [Value],
}

impl<'a> Row<'a> {
    /// Returns the cell in the named column, if the column exists
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.table.index.get(column).map(|&i| &self.cells[i])
    }

    /// Returns all cells of this row in column order
    pub fn cells(&self) -> &'a [Value] {
        self.cells
    }
}

/// A view over a shared, immutable table
///
/// Cloning a dataset is cheap: both the table and the row-id list are
/// reference counted.
#[derive(Debug, Clone)]
pub struct Dataset {
    table: Arc<Table>,
    rows: Arc<[usize]>,
}

impl Dataset {
    /// Creates a dataset containing every given row
    ///
    /// Fails if column names repeat or a row has the wrong number of cells.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let table = Table::build(columns, rows)?;
        let ids: Arc<[usize]> = (0..table.rows.len()).collect();
        Ok(Dataset {
            table: Arc::new(table),
            rows: ids,
        })
    }

    /// Creates a dataset with the given columns and no rows
    pub fn empty(columns: Vec<String>) -> Result<Self> {
        Self::new(columns, Vec::new())
    }

    /// Returns the column names in table order
    pub fn columns(&self) -> &[String] {
        &self.table.columns
    }

    /// Returns the position of a column, or `UnknownColumn`
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.table
            .index
            .get(column)
            .copied()
            .ok_or_else(|| MCTSError::UnknownColumn(column.to_string()))
    }

    /// Number of rows in this view
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no row is in this view
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ids of the rows in this view, in table order
    pub fn row_ids(&self) -> &[usize] {
        &self.rows
    }

    /// Iterates over the rows of this view
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        let table: &Table = &self.table;
        self.rows.iter().map(move |&id| Row {
            table,
            cells: &table.rows[id],
        })
    }

    /// Returns true if both views share a table and every row of `self`
    /// is also in `other`
    pub fn is_subset_of(&self, other: &Dataset) -> bool {
        if !Arc::ptr_eq(&self.table, &other.table) {
            return false;
        }
        // Row ids are kept sorted, so a merge walk is enough.
        let mut theirs = other.rows.iter().peekable();
        self.rows.iter().all(|id| {
            while let Some(&&candidate) = theirs.peek() {
                if candidate < *id {
                    theirs.next();
                } else {
                    break;
                }
            }
            theirs.peek() == Some(&id)
        })
    }

    /// Returns a new view with the rows whose cell in `condition.column`
    /// equals `condition.value`
    pub fn filter(&self, condition: &Condition) -> Result<Dataset> {
        let column = self.column_index(&condition.column)?;
        Ok(self.filter_at(column, &condition.value))
    }

    /// Applies every condition in turn
    pub fn filter_all<'a, I>(&self, conditions: I) -> Result<Dataset>
    where
        I: IntoIterator<Item = &'a Condition>,
    {
        conditions
            .into_iter()
            .try_fold(self.clone(), |view, condition| view.filter(condition))
    }

    /// Filters on an already resolved column position
    pub(crate) fn filter_at(&self, column: usize, value: &Value) -> Dataset {
        let rows: Arc<[usize]> = self
            .rows
            .iter()
            .copied()
            .filter(|&id| self.table.rows[id][column] == *value)
            .collect();
        Dataset {
            table: Arc::clone(&self.table),
            rows,
        }
    }

    /// Distinct values observed in a column of this view, in value order
    pub fn unique_values(&self, column: &str) -> Result<BTreeSet<Value>> {
        let column = self.column_index(column)?;
        Ok(self
            .rows
            .iter()
            .map(|&id| self.table.rows[id][column].clone())
            .collect())
    }

    /// Sums a numeric column over this view
    ///
    /// `Null` cells count as zero; any other non-integer cell is an error.
    pub fn aggregate(&self, column: &str) -> Result<f64> {
        let index = self.column_index(column)?;
        self.aggregate_at(index, column)
    }

    pub(crate) fn aggregate_at(&self, index: usize, column: &str) -> Result<f64> {
        self.rows.iter().try_fold(0.0, |sum, &id| {
            let cell = &self.table.rows[id][index];
            cell.as_number()
                .map(|n| sum + n)
                .ok_or_else(|| MCTSError::NonNumericValue {
                    column: column.to_string(),
                    value: cell.to_string(),
                })
        })
    }

    /// Returns a new dataset with a column computed from every row
    ///
    /// An existing column of the same name is overwritten in place.
    pub fn with_column<F>(&self, name: &str, derive: F) -> Result<Dataset>
    where
        F: Fn(Row<'_>) -> Value,
    {
        self.with_columns(&[name], |row| vec![derive(row)])
    }

    /// Returns a new dataset with several columns computed in one pass
    ///
    /// `derive` returns one value per name, in the order of `names`.
    /// Existing columns are overwritten in place; new ones are appended.
    /// Only the rows of this view are carried over, and the result is a
    /// fresh root that no longer shares storage with `self`.
    pub fn with_columns<F>(&self, names: &[&str], derive: F) -> Result<Dataset>
    where
        F: Fn(Row<'_>) -> Vec<Value>,
    {
        let mut columns = self.table.columns.clone();
        let mut targets = Vec::with_capacity(names.len());
        for name in names {
            match self.table.index.get(*name) {
                Some(&i) => targets.push(i),
                None => {
                    targets.push(columns.len());
                    columns.push(name.to_string());
                }
            }
        }

        let mut rows = Vec::with_capacity(self.len());
        for row in self.rows() {
            let values = derive(row);
            if values.len() != targets.len() {
                return Err(MCTSError::InvalidDataset(format!(
                    "derived {} values for {} columns",
                    values.len(),
                    targets.len()
                )));
            }

            let mut cells = row.cells().to_vec();
            cells.resize(columns.len(), Value::Null);
            for (&target, value) in targets.iter().zip(values) {
                cells[target] = value;
            }
            rows.push(cells);
        }

        Dataset::new(columns, rows)
    }
}
