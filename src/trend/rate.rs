// Rate trend: how the positive rate of a binary outcome moves across the
// levels of a categorical attribute.
//
// The value is the least-squares slope of per-level rates against level
// position (levels sorted by value, empty levels skipped). With two levels
// this is simply rate(second) - rate(first). Fewer than two populated levels
// leave the trend undefined (NaN).

use std::collections::BTreeMap;

use super::{FeaturePair, Trend};
use crate::dataset::{Dataset, GroupValue, Role};
use crate::error::Result;
use crate::stats::ols_slope;

/// Positive/total counts per explanatory level
type LevelCounts = BTreeMap<GroupValue, (usize, usize)>;

/// Binary-outcome rate trend over a categorical explanatory attribute
///
/// `feat1` is the outcome (bool column), `feat2` the explanatory attribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateTrend;

impl RateTrend {
    fn count(counts: &mut LevelCounts, level: GroupValue, outcome: bool) {
        let entry = counts.entry(level).or_insert((0, 0));
        if outcome {
            entry.0 += 1;
        }
        entry.1 += 1;
    }

    fn slope(counts: &LevelCounts) -> f64 {
        let (positions, rates): (Vec<f64>, Vec<f64>) = counts
            .values()
            .filter(|(_, total)| *total > 0)
            .enumerate()
            .map(|(i, (pos, total))| (i as f64, *pos as f64 / *total as f64))
            .unzip();
        ols_slope(&positions, &rates)
    }
}

impl Trend for RateTrend {
    fn name(&self) -> &str {
        "rate"
    }

    fn select_pairs(&self, data: &Dataset) -> Vec<FeaturePair> {
        let outcomes = data.vars_for_role(Role::Outcome);
        let explanatory = data.vars_for_role(Role::Groupby);

        let mut pairs: Vec<FeaturePair> = Vec::new();
        for outcome in &outcomes {
            for attr in &explanatory {
                if outcome == attr {
                    continue;
                }
                let pair = FeaturePair::new(outcome.as_str(), attr.as_str());
                if !pairs.contains(&pair.reversed()) {
                    pairs.push(pair);
                }
            }
        }
        pairs
    }

    fn evaluate(&self, data: &Dataset, pair: &FeaturePair) -> Result<f64> {
        let outcome = data.bool_column(&pair.feat1)?;
        let mut counts = LevelCounts::new();
        for (level, rows) in data.partition_rows(&pair.feat2)? {
            for row in rows {
                if let Some(o) = outcome[row] {
                    Self::count(&mut counts, level.clone(), o);
                }
            }
        }
        Ok(Self::slope(&counts))
    }

    fn evaluate_nested(
        &self,
        data: &Dataset,
        pair: &FeaturePair,
        group_var: &str,
    ) -> Result<Vec<(GroupValue, f64)>> {
        let outcome = data.bool_column(&pair.feat1)?;

        // one pass over the joint (group_var, feat2) partition
        let mut per_group: BTreeMap<GroupValue, LevelCounts> = BTreeMap::new();
        for ((group, level), rows) in data.joint_partition_rows(group_var, &pair.feat2)? {
            let counts = per_group.entry(group).or_default();
            for row in rows {
                if let Some(o) = outcome[row] {
                    Self::count(counts, level.clone(), o);
                }
            }
        }

        Ok(per_group
            .into_iter()
            .map(|(group, counts)| (group, Self::slope(&counts)))
            .collect())
    }
}
