// Tidy dataset: named, typed columns plus role tags
//
// Rows are observations, columns are attributes. Roles decide which columns
// take part in trend computation (continuous, outcome) and which partition
// the data (groupby). Undeclared roles are inferred from column types.

mod column;
mod loader;
mod roles;

pub use column::{Column, ColumnType, GroupValue};
pub use roles::{Role, RoleRegistry};

use crate::error::{Result, SpError};
use std::collections::BTreeMap;

/// In-memory tidy table
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
    roles: RoleRegistry,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column
    ///
    /// # Errors
    /// Returns error if the name is already used or the length differs from
    /// the columns already present.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        let name = name.into();
        if self.names.contains(&name) {
            return Err(SpError::InvalidConfig(format!(
                "duplicate column name '{}'",
                name
            )));
        }
        if !self.names.is_empty() && column.len() != self.n_rows {
            return Err(SpError::ColumnLength {
                column: name,
                expected: self.n_rows,
                actual: column.len(),
            });
        }
        self.n_rows = column.len();
        self.names.push(name);
        self.columns.push(column);
        Ok(self)
    }

    pub fn with_float(self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        self.with_column(name, Column::Float(values))
    }

    pub fn with_int(self, name: impl Into<String>, values: Vec<i64>) -> Result<Self> {
        self.with_column(name, Column::Int(values.into_iter().map(Some).collect()))
    }

    pub fn with_bool(self, name: impl Into<String>, values: Vec<bool>) -> Result<Self> {
        self.with_column(name, Column::Bool(values.into_iter().map(Some).collect()))
    }

    pub fn with_str<I, S>(self, name: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(|s| Some(s.into())).collect();
        self.with_column(name, Column::Str(values))
    }

    /// Tag columns with a role, overriding type-based inference for that role
    pub fn with_role(mut self, role: Role, vars: &[&str]) -> Result<Self> {
        self.declare_role(role, vars.iter().map(|v| v.to_string()).collect())?;
        Ok(self)
    }

    /// Tag columns with a role
    ///
    /// # Errors
    /// Returns `UnknownColumn` if any name is not a column of this dataset.
    pub fn declare_role(&mut self, role: Role, vars: Vec<String>) -> Result<()> {
        if let Some(missing) = vars.iter().find(|v| !self.names.contains(*v)) {
            return Err(SpError::UnknownColumn(missing.clone()));
        }
        self.roles.declare(role, vars);
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.names.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
            .ok_or_else(|| SpError::UnknownColumn(name.to_string()))
    }

    pub fn column_type(&self, name: &str) -> Result<ColumnType> {
        Ok(self.column(name)?.column_type())
    }

    /// Real-valued column, `NaN` marking missing values
    pub fn float_column(&self, name: &str) -> Result<&[f64]> {
        match self.column(name)? {
            Column::Float(values) => Ok(values),
            _ => Err(SpError::ColumnType {
                column: name.to_string(),
                expected: ColumnType::Float.to_string(),
            }),
        }
    }

    pub fn bool_column(&self, name: &str) -> Result<&[Option<bool>]> {
        match self.column(name)? {
            Column::Bool(values) => Ok(values),
            _ => Err(SpError::ColumnType {
                column: name.to_string(),
                expected: ColumnType::Bool.to_string(),
            }),
        }
    }

    /// Columns playing `role`: the declared list when present, otherwise
    /// every column whose type matches the role and that carries no other
    /// explicit tag, in dataset column order
    ///
    /// Inference: continuous = float, groupby = int or str, outcome = bool.
    pub fn vars_for_role(&self, role: Role) -> Vec<String> {
        if let Some(declared) = self.roles.roles(role) {
            return declared.to_vec();
        }

        self.names
            .iter()
            .zip(&self.columns)
            .filter(|(_, col)| {
                let ty = col.column_type();
                match role {
                    Role::Continuous => ty == ColumnType::Float,
                    Role::Groupby => matches!(ty, ColumnType::Int | ColumnType::Str),
                    Role::Outcome => ty == ColumnType::Bool,
                }
            })
            .filter(|(name, _)| !self.roles.tagged_elsewhere(name, role))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Copy of the dataset restricted to `rows`; role tags are kept
    pub fn take(&self, rows: &[usize]) -> Dataset {
        Dataset {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(rows)).collect(),
            n_rows: rows.len(),
            roles: self.roles.clone(),
        }
    }

    /// Row indices per distinct value of `var`, sorted by value
    ///
    /// Rows with a missing key are left out.
    pub fn partition_rows(&self, var: &str) -> Result<BTreeMap<GroupValue, Vec<usize>>> {
        let column = self.column(var)?;
        if column.column_type() == ColumnType::Float {
            return Err(SpError::ColumnType {
                column: var.to_string(),
                expected: "int, bool or str".to_string(),
            });
        }

        let mut groups: BTreeMap<GroupValue, Vec<usize>> = BTreeMap::new();
        for row in 0..self.n_rows {
            if let Some(key) = column.group_value(row) {
                groups.entry(key).or_default().push(row);
            }
        }
        Ok(groups)
    }

    /// Split the dataset by the distinct values of `var`
    pub fn partition(&self, var: &str) -> Result<Vec<(GroupValue, Dataset)>> {
        Ok(self
            .partition_rows(var)?
            .into_iter()
            .map(|(key, rows)| (key, self.take(&rows)))
            .collect())
    }

    /// Row indices per joint value of (`outer`, `inner`), sorted by outer then inner
    pub fn joint_partition_rows(
        &self,
        outer: &str,
        inner: &str,
    ) -> Result<BTreeMap<(GroupValue, GroupValue), Vec<usize>>> {
        let outer_groups = self.partition_rows(outer)?;
        let inner_col = self.column(inner)?;

        let mut groups: BTreeMap<(GroupValue, GroupValue), Vec<usize>> = BTreeMap::new();
        for (outer_key, rows) in outer_groups {
            for row in rows {
                if let Some(inner_key) = inner_col.group_value(row) {
                    groups
                        .entry((outer_key.clone(), inner_key))
                        .or_default()
                        .push(row);
                }
            }
        }
        Ok(groups)
    }
}
