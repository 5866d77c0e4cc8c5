use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::dataset::GroupValue;
use crate::error::{Result, SpError};
use crate::trend::FeaturePair;

/// Column names of a [`ResultTable`], in their fixed order
pub const RESULT_COLUMNS: [&str; 7] = [
    "feat1",
    "feat2",
    "trend_type",
    "agg_trend",
    "group_feat",
    "subgroup",
    "subgroup_trend",
];

/// One row of the result table: a feature pair's aggregate trend next to its
/// trend inside one subgroup
///
/// `group_feat`, `subgroup` and `subgroup_trend` are empty on aggregate-only
/// rows (no grouping variable applied to the pair).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRecord {
    pub feat1: String,
    pub feat2: String,
    pub trend_type: String,
    pub agg_trend: f64,
    pub group_feat: Option<String>,
    pub subgroup: Option<GroupValue>,
    pub subgroup_trend: Option<f64>,
}

impl TrendRecord {
    pub fn pair(&self) -> FeaturePair {
        FeaturePair::new(self.feat1.as_str(), self.feat2.as_str())
    }

    /// Value of a numeric trend column, `None` when the row has no such value
    pub fn value(&self, column: TrendColumn) -> Option<f64> {
        match column {
            TrendColumn::AggTrend => Some(self.agg_trend),
            TrendColumn::SubgroupTrend => self.subgroup_trend,
        }
    }
}

/// Numeric trend columns a paradox policy can compare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrendColumn {
    AggTrend,
    SubgroupTrend,
}

impl TrendColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendColumn::AggTrend => "agg_trend",
            TrendColumn::SubgroupTrend => "subgroup_trend",
        }
    }
}

impl fmt::Display for TrendColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Context in which a paradox occurs
///
/// Plain views name the feature pair; colored views also name the grouping
/// variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct View {
    pub feat1: String,
    pub feat2: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_feat: Option<String>,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.group_feat {
            Some(g) => write!(f, "({}, {}, {})", self.feat1, self.feat2, g),
            None => write!(f, "({}, {})", self.feat1, self.feat2),
        }
    }
}

/// Ordered collection of [`TrendRecord`]s
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    records: Vec<TrendRecord>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<TrendRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TrendRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrendRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<TrendRecord> {
        self.records
    }

    /// Rows where `mask` is true
    ///
    /// # Panics
    /// Panics if `mask` is not exactly one entry per row.
    pub fn select(&self, mask: &[bool]) -> ResultTable {
        assert_eq!(mask.len(), self.records.len(), "mask length must match rows");
        ResultTable {
            records: self
                .records
                .iter()
                .zip(mask)
                .filter(|(_, keep)| **keep)
                .map(|(r, _)| r.clone())
                .collect(),
        }
    }

    /// Check that every row pairs two distinct variables and that no
    /// unordered feature pair appears in both orderings
    ///
    /// # Errors
    /// Returns `SelfPair` or `ReversedPairOrdering` for the first offending row.
    pub fn check_pair_orientation(&self) -> Result<()> {
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        for r in &self.records {
            if r.feat1 == r.feat2 {
                return Err(SpError::SelfPair {
                    trend_type: r.trend_type.clone(),
                    feature: r.feat1.clone(),
                });
            }
            if seen.contains(&(r.feat2.as_str(), r.feat1.as_str())) {
                return Err(SpError::ReversedPairOrdering {
                    feat1: r.feat2.clone(),
                    feat2: r.feat1.clone(),
                });
            }
            seen.insert((r.feat1.as_str(), r.feat2.as_str()));
        }
        Ok(())
    }

    /// Distinct views over all rows, in order of first appearance
    ///
    /// # Errors
    /// Returns `SelfPair` for a row pairing a variable with itself and
    /// `ReversedPairOrdering` if a pair appears in both orderings, since
    /// deduplication would otherwise count it twice.
    pub fn views(&self, colored: bool) -> Result<Vec<View>> {
        self.check_pair_orientation()?;

        let mut seen: HashSet<View> = HashSet::new();
        let mut views = Vec::new();
        for r in &self.records {
            let view = View {
                feat1: r.feat1.clone(),
                feat2: r.feat2.clone(),
                group_feat: if colored { r.group_feat.clone() } else { None },
            };
            if seen.insert(view.clone()) {
                views.push(view);
            }
        }
        Ok(views)
    }

    /// Human-readable table
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!(
            "{:<12} {:<12} {:<14} {:>10} {:<12} {:<12} {:>14}\n",
            RESULT_COLUMNS[0],
            RESULT_COLUMNS[1],
            RESULT_COLUMNS[2],
            RESULT_COLUMNS[3],
            RESULT_COLUMNS[4],
            RESULT_COLUMNS[5],
            RESULT_COLUMNS[6],
        ));
        report.push_str(&"-".repeat(92));
        report.push('\n');

        for r in &self.records {
            report.push_str(&format!(
                "{:<12} {:<12} {:<14} {:>10.4} {:<12} {:<12} {:>14}\n",
                r.feat1,
                r.feat2,
                r.trend_type,
                r.agg_trend,
                r.group_feat.as_deref().unwrap_or("-"),
                r.subgroup
                    .as_ref()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                r.subgroup_trend
                    .map(|v| format!("{:.4}", v))
                    .unwrap_or_else(|| "-".to_string()),
            ));
        }

        report.push_str(&format!("\n{} rows\n", self.records.len()));
        report
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a TrendRecord;
    type IntoIter = std::slice::Iter<'a, TrendRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
