use serde::Serialize;
use std::fmt;

/// Storage type of a dataset column
///
/// Mirrors the dtypes a tidy table typically carries: real-valued numbers,
/// integers, booleans and free-form categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Float,
    Int,
    Bool,
    Str,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Float => "float",
            ColumnType::Int => "int",
            ColumnType::Bool => "bool",
            ColumnType::Str => "str",
        };
        f.write_str(name)
    }
}

/// A single typed column
///
/// Missing values are `NaN` for `Float` and `None` for every other type.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Float(Vec<f64>),
    Int(Vec<Option<i64>>),
    Bool(Vec<Option<bool>>),
    Str(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Float(v) => v.len(),
            Column::Int(v) => v.len(),
            Column::Bool(v) => v.len(),
            Column::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Float(_) => ColumnType::Float,
            Column::Int(_) => ColumnType::Int,
            Column::Bool(_) => ColumnType::Bool,
            Column::Str(_) => ColumnType::Str,
        }
    }

    /// Build a new column holding only `rows`, in the given order
    pub fn take(&self, rows: &[usize]) -> Column {
        match self {
            Column::Float(v) => Column::Float(rows.iter().map(|&i| v[i]).collect()),
            Column::Int(v) => Column::Int(rows.iter().map(|&i| v[i]).collect()),
            Column::Bool(v) => Column::Bool(rows.iter().map(|&i| v[i]).collect()),
            Column::Str(v) => Column::Str(rows.iter().map(|&i| v[i].clone()).collect()),
        }
    }

    /// Partition key of a row, `None` when missing or when the column is real-valued
    pub fn group_value(&self, row: usize) -> Option<GroupValue> {
        match self {
            Column::Float(_) => None,
            Column::Int(v) => v[row].map(GroupValue::Int),
            Column::Bool(v) => v[row].map(GroupValue::Bool),
            Column::Str(v) => v[row].clone().map(GroupValue::Str),
        }
    }
}

/// Value of a grouping attribute identifying one subgroup
///
/// Ordering follows the natural ordering of the underlying value so that
/// partitions come out sorted, the way a `groupby` lists its keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupValue::Bool(b) => write!(f, "{}", b),
            GroupValue::Int(i) => write!(f, "{}", i),
            GroupValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for GroupValue {
    fn from(s: &str) -> Self {
        GroupValue::Str(s.to_string())
    }
}

impl From<i64> for GroupValue {
    fn from(i: i64) -> Self {
        GroupValue::Int(i)
    }
}

impl From<bool> for GroupValue {
    fn from(b: bool) -> Self {
        GroupValue::Bool(b)
    }
}
