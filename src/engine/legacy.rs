// Correlation-only detector working directly on correlation matrices
//
// Predates the pluggable trend engine. Aggregate and subgroup matrices are
// built over the same variable ordering and compared position by position
// along their upper triangles; only reversing pairs are reported.

use crate::dataset::{ColumnType, Dataset};
use crate::error::{Result, SpError};
use crate::matrix::{correlation_matrix, PairwiseEntry};
use crate::results::{ResultTable, TrendRecord};
use crate::reversal::is_reverse;

/// `trend_type` written on every legacy row
pub const LEGACY_TREND_TYPE: &str = "pearson_corr";

/// Sign-reversal detector over Pearson correlation matrices
///
/// Defaults: regression variables are all float columns, grouping variables
/// all int and str columns, both in dataset column order.
#[derive(Debug, Clone)]
pub struct LegacyDetector<'a> {
    data: &'a Dataset,
    regression_vars: Option<Vec<String>>,
    groupby_vars: Option<Vec<String>>,
}

impl<'a> LegacyDetector<'a> {
    pub fn new(data: &'a Dataset) -> Self {
        Self {
            data,
            regression_vars: None,
            groupby_vars: None,
        }
    }

    pub fn with_regression_vars(mut self, vars: Vec<String>) -> Self {
        self.regression_vars = Some(vars);
        self
    }

    pub fn with_groupby_vars(mut self, vars: Vec<String>) -> Self {
        self.groupby_vars = Some(vars);
        self
    }

    fn columns_of_type(&self, accept: impl Fn(ColumnType) -> bool) -> Vec<String> {
        self.data
            .column_names()
            .iter()
            .filter(|name| {
                self.data
                    .column_type(name)
                    .map(&accept)
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    /// Rows for every (pair, subgroup) whose correlation sign differs from
    /// the aggregate correlation
    ///
    /// Fewer than two regression variables produce an empty table. Subgroups
    /// too small for a correlation yield `NaN`, which never counts as a
    /// reversal.
    pub fn detect(&self) -> Result<ResultTable> {
        let regression_vars = match &self.regression_vars {
            Some(vars) => vars.clone(),
            None => self.columns_of_type(|t| t == ColumnType::Float),
        };
        let groupby_vars = match &self.groupby_vars {
            Some(vars) => vars.clone(),
            None => self.columns_of_type(|t| matches!(t, ColumnType::Int | ColumnType::Str)),
        };

        let aggregate = correlation_matrix(self.data, &regression_vars)?.upper_triangle();
        if aggregate.is_empty() {
            tracing::debug!(
                regression_vars = regression_vars.len(),
                "fewer than two regression variables, nothing to compare"
            );
            return Ok(ResultTable::new());
        }

        let mut records = Vec::new();
        for group_feat in &groupby_vars {
            for (subgroup, part) in self.data.partition(group_feat)? {
                let entries = correlation_matrix(&part, &regression_vars)?.upper_triangle();
                check_alignment(&aggregate, &entries, group_feat, &subgroup.to_string())?;

                for (agg, sub) in aggregate.iter().zip(&entries) {
                    if !is_reverse(agg.value, sub.value) {
                        continue;
                    }
                    records.push(TrendRecord {
                        feat1: regression_vars[agg.row].clone(),
                        feat2: regression_vars[agg.col].clone(),
                        trend_type: LEGACY_TREND_TYPE.to_string(),
                        agg_trend: agg.value,
                        group_feat: Some(group_feat.clone()),
                        subgroup: Some(subgroup.clone()),
                        subgroup_trend: Some(sub.value),
                    });
                }
            }
        }

        tracing::info!(
            reversals = records.len(),
            groupby_vars = groupby_vars.len(),
            "legacy detection finished"
        );
        Ok(ResultTable::from_records(records))
    }
}

/// Positional comparison is only meaningful if both extractions enumerate
/// the same index pairs in the same order
pub(crate) fn check_alignment(
    aggregate: &[PairwiseEntry],
    subgroup: &[PairwiseEntry],
    group_feat: &str,
    subgroup_label: &str,
) -> Result<()> {
    let aligned = aggregate.len() == subgroup.len()
        && aggregate
            .iter()
            .zip(subgroup)
            .all(|(a, s)| a.row == s.row && a.col == s.col);

    if aligned {
        Ok(())
    } else {
        Err(SpError::MisalignedPairs {
            group_feat: group_feat.to_string(),
            subgroup: subgroup_label.to_string(),
            expected: aggregate.len(),
            actual: subgroup.len(),
        })
    }
}
