use std::collections::{HashMap, HashSet};

use crate::dataset::GroupValue;
use crate::error::{Result, SpError};
use crate::results::{ResultTable, TrendRecord};
use crate::trend::FeaturePair;

#[derive(Debug)]
struct AggregateRow {
    trend_type: String,
    pair: FeaturePair,
    value: f64,
}

#[derive(Debug)]
struct SubgroupRow {
    trend_type: String,
    pair: FeaturePair,
    group_feat: String,
    subgroup: GroupValue,
    value: f64,
}

/// Accumulates aggregate and subgroup trend values and joins them into a
/// [`ResultTable`]
///
/// Subgroup rows are joined to the aggregate row with the same
/// `(trend_type, feat1, feat2)`. Subgroup rows with no aggregate are dropped;
/// aggregates that received no subgroup row are kept as aggregate-only rows.
///
/// # Example
/// ```
/// use detect_sp::engine::ResultAssembler;
/// use detect_sp::trend::FeaturePair;
///
/// let mut asm = ResultAssembler::new();
/// asm.push_aggregate("pearson_corr", FeaturePair::new("X", "Y"), 0.8).unwrap();
/// asm.push_subgroup("pearson_corr", FeaturePair::new("X", "Y"), "G", "a".into(), -0.5);
/// let table = asm.finish().unwrap();
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.records()[0].subgroup_trend, Some(-0.5));
/// ```
#[derive(Debug, Default)]
pub struct ResultAssembler {
    aggregates: Vec<AggregateRow>,
    index: HashMap<(String, FeaturePair), usize>,
    pairs: HashSet<FeaturePair>,
    subgroups: Vec<SubgroupRow>,
}

impl ResultAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the full-dataset trend of `pair`
    ///
    /// # Errors
    /// `SelfPair` if both features are the same variable;
    /// `DuplicateAggregate` if this trend type already has a value for the
    /// pair; `ReversedPairOrdering` if the pair was seen in the other order.
    pub fn push_aggregate(&mut self, trend_type: &str, pair: FeaturePair, value: f64) -> Result<()> {
        if pair.feat1 == pair.feat2 {
            return Err(SpError::SelfPair {
                trend_type: trend_type.to_string(),
                feature: pair.feat1,
            });
        }

        if self.pairs.contains(&pair.reversed()) {
            return Err(SpError::ReversedPairOrdering {
                feat1: pair.feat2,
                feat2: pair.feat1,
            });
        }

        let key = (trend_type.to_string(), pair.clone());
        if self.index.contains_key(&key) {
            return Err(SpError::DuplicateAggregate {
                trend_type: trend_type.to_string(),
                feat1: pair.feat1,
                feat2: pair.feat2,
            });
        }

        self.index.insert(key, self.aggregates.len());
        self.pairs.insert(pair.clone());
        self.aggregates.push(AggregateRow {
            trend_type: trend_type.to_string(),
            pair,
            value,
        });
        Ok(())
    }

    /// Record the trend of `pair` within one subgroup of `group_feat`
    pub fn push_subgroup(
        &mut self,
        trend_type: &str,
        pair: FeaturePair,
        group_feat: &str,
        subgroup: GroupValue,
        value: f64,
    ) {
        self.subgroups.push(SubgroupRow {
            trend_type: trend_type.to_string(),
            pair,
            group_feat: group_feat.to_string(),
            subgroup,
            value,
        });
    }

    pub fn aggregate_count(&self) -> usize {
        self.aggregates.len()
    }

    pub fn subgroup_count(&self) -> usize {
        self.subgroups.len()
    }

    /// Join subgroup rows to their aggregates
    ///
    /// Joined rows come first, in the order subgroup rows were pushed,
    /// followed by aggregate-only rows in the order aggregates were pushed.
    ///
    /// # Errors
    /// `ReversedPairOrdering` if a subgroup row names an aggregated pair in
    /// the opposite order.
    pub fn finish(self) -> Result<ResultTable> {
        let mut matched = vec![false; self.aggregates.len()];
        let mut records = Vec::with_capacity(self.subgroups.len() + self.aggregates.len());
        let mut dropped = 0usize;

        for sub in self.subgroups {
            let key = (sub.trend_type, sub.pair);
            let Some(&idx) = self.index.get(&key) else {
                let reversed = key.1.reversed();
                if self.pairs.contains(&reversed) {
                    return Err(SpError::ReversedPairOrdering {
                        feat1: reversed.feat1,
                        feat2: reversed.feat2,
                    });
                }
                dropped += 1;
                continue;
            };

            matched[idx] = true;
            let agg = &self.aggregates[idx];
            let (trend_type, pair) = key;
            records.push(TrendRecord {
                feat1: pair.feat1,
                feat2: pair.feat2,
                trend_type,
                agg_trend: agg.value,
                group_feat: Some(sub.group_feat),
                subgroup: Some(sub.subgroup),
                subgroup_trend: Some(sub.value),
            });
        }

        if dropped > 0 {
            tracing::debug!(dropped, "subgroup rows without an aggregate were dropped");
        }

        for (agg, was_matched) in self.aggregates.into_iter().zip(matched) {
            if !was_matched {
                records.push(TrendRecord {
                    feat1: agg.pair.feat1,
                    feat2: agg.pair.feat2,
                    trend_type: agg.trend_type,
                    agg_trend: agg.value,
                    group_feat: None,
                    subgroup: None,
                    subgroup_trend: None,
                });
            }
        }

        Ok(ResultTable::from_records(records))
    }
}
