use std::collections::HashMap;

use super::table::{ResultTable, TrendColumn, View};
use crate::error::Result;
use crate::reversal::ParadoxPolicy;

/// Columns compared by default: aggregate against subgroup trend
pub const DEFAULT_TREND_COLUMNS: (TrendColumn, TrendColumn) =
    (TrendColumn::AggTrend, TrendColumn::SubgroupTrend);

/// Identity of a label column: policy name plus the compared trend columns
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelKey {
    pub policy: String,
    pub columns: (TrendColumn, TrendColumn),
}

impl LabelKey {
    pub fn new(policy: impl Into<String>, columns: (TrendColumn, TrendColumn)) -> Self {
        Self {
            policy: policy.into(),
            columns,
        }
    }

    /// Flat column name, e.g. `agg_trend_subgroup_trend_SP`
    pub fn column_name(&self) -> String {
        format!("{}_{}_{}", self.columns.0, self.columns.1, self.policy)
    }
}

/// Evaluate `policy` on every row of `table`
///
/// Rows missing either compared value are never flagged.
pub fn label_rows(
    table: &ResultTable,
    policy: &dyn ParadoxPolicy,
    columns: (TrendColumn, TrendColumn),
) -> Vec<bool> {
    table
        .iter()
        .map(|r| match (r.value(columns.0), r.value(columns.1)) {
            (Some(a), Some(b)) => policy.is_paradox(a, b),
            _ => false,
        })
        .collect()
}

/// A result table together with its memoized paradox labels
///
/// The table itself is never mutated; label columns live in a side map keyed
/// by [`LabelKey`] and are computed at most once per key.
#[derive(Debug, Clone, Default)]
pub struct LabeledResults {
    table: ResultTable,
    labels: HashMap<LabelKey, Vec<bool>>,
}

impl LabeledResults {
    pub fn new(table: ResultTable) -> Self {
        Self {
            table,
            labels: HashMap::new(),
        }
    }

    pub fn table(&self) -> &ResultTable {
        &self.table
    }

    pub fn into_table(self) -> ResultTable {
        self.table
    }

    /// Label column for `key`, if it has been computed
    pub fn label(&self, key: &LabelKey) -> Option<&[bool]> {
        self.labels.get(key).map(Vec::as_slice)
    }

    /// Keys of every label column computed so far, sorted
    pub fn label_keys(&self) -> Vec<&LabelKey> {
        let mut keys: Vec<&LabelKey> = self.labels.keys().collect();
        keys.sort();
        keys
    }

    /// Compute (or fetch the cached) label column for `policy` over `columns`
    pub fn label_sp_rows(
        &mut self,
        policy: &dyn ParadoxPolicy,
        columns: (TrendColumn, TrendColumn),
    ) -> &[bool] {
        let key = LabelKey::new(policy.name(), columns);
        if self.labels.contains_key(&key) {
            tracing::trace!(label = %key.column_name(), "label column cache hit");
        } else {
            let labels = label_rows(&self.table, policy, columns);
            tracing::debug!(
                label = %key.column_name(),
                flagged = labels.iter().filter(|l| **l).count(),
                rows = labels.len(),
                "computed label column"
            );
            self.labels.insert(key.clone(), labels);
        }
        &self.labels[&key]
    }

    /// Rows flagged by `policy`, labeling first if needed
    pub fn get_sp_rows(
        &mut self,
        policy: &dyn ParadoxPolicy,
        columns: (TrendColumn, TrendColumn),
    ) -> ResultTable {
        let mask = self.label_sp_rows(policy, columns).to_vec();
        self.table.select(&mask)
    }

    /// Distinct views with at least one row flagged by `policy`
    ///
    /// # Errors
    /// Returns `ReversedPairOrdering` if the table lists a feature pair in
    /// both orderings.
    pub fn get_sp_views(
        &mut self,
        policy: &dyn ParadoxPolicy,
        columns: (TrendColumn, TrendColumn),
        colored: bool,
    ) -> Result<Vec<View>> {
        self.table.check_pair_orientation()?;
        self.get_sp_rows(policy, columns).views(colored)
    }
}
