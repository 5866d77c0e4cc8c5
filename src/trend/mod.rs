// Pluggable trend types
//
// A trend type answers two questions about a dataset: which feature pairs
// it applies to, and what directional value it takes on a dataset or on one
// partition of it. The engine never looks inside: correlation, slope, rank
// and rate trends are all just implementations of `Trend`.

mod continuous;
mod rate;

pub use continuous::{PearsonCorrelation, RankCorrelation, RegressionSlope};
pub use rate::RateTrend;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dataset::{Dataset, GroupValue, Role};
use crate::error::{Result, SpError};

/// Ordered pair of feature names a trend is computed over
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeaturePair {
    pub feat1: String,
    pub feat2: String,
}

impl FeaturePair {
    pub fn new(feat1: impl Into<String>, feat2: impl Into<String>) -> Self {
        Self {
            feat1: feat1.into(),
            feat2: feat2.into(),
        }
    }

    pub fn reversed(&self) -> Self {
        Self {
            feat1: self.feat2.clone(),
            feat2: self.feat1.clone(),
        }
    }

    pub fn contains(&self, var: &str) -> bool {
        self.feat1 == var || self.feat2 == var
    }
}

impl fmt::Display for FeaturePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.feat1, self.feat2)
    }
}

/// A directional summary statistic over pairs of features
pub trait Trend {
    /// Identifier written to the `trend_type` column
    fn name(&self) -> &str;

    /// Eligible feature pairs, in a deterministic order
    ///
    /// Never returns both orderings of the same unordered pair.
    fn select_pairs(&self, data: &Dataset) -> Vec<FeaturePair>;

    /// Trend value of `pair` over `data`; `NaN` when undefined
    fn evaluate(&self, data: &Dataset, pair: &FeaturePair) -> Result<f64>;

    /// Trend value of `pair` within every subgroup of `group_var`
    ///
    /// The default partitions on `group_var` and evaluates each part.
    /// Trends defined over two levels of grouping override this to compute
    /// on the joint partition directly.
    fn evaluate_nested(
        &self,
        data: &Dataset,
        pair: &FeaturePair,
        group_var: &str,
    ) -> Result<Vec<(GroupValue, f64)>> {
        data.partition(group_var)?
            .into_iter()
            .map(|(key, part)| Ok((key, self.evaluate(&part, pair)?)))
            .collect()
    }
}

/// Built-in trend types, addressable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendKind {
    PearsonCorrelation,
    RegressionSlope,
    RankCorrelation,
    Rate,
}

impl TrendKind {
    pub const ALL: [TrendKind; 4] = [
        TrendKind::PearsonCorrelation,
        TrendKind::RegressionSlope,
        TrendKind::RankCorrelation,
        TrendKind::Rate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendKind::PearsonCorrelation => "pearson_corr",
            TrendKind::RegressionSlope => "lin_reg",
            TrendKind::RankCorrelation => "rank_corr",
            TrendKind::Rate => "rate",
        }
    }

    pub fn build(self) -> Box<dyn Trend> {
        match self {
            TrendKind::PearsonCorrelation => Box::new(PearsonCorrelation),
            TrendKind::RegressionSlope => Box::new(RegressionSlope),
            TrendKind::RankCorrelation => Box::new(RankCorrelation),
            TrendKind::Rate => Box::new(RateTrend),
        }
    }
}

impl fmt::Display for TrendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendKind {
    type Err = SpError;

    fn from_str(s: &str) -> Result<Self> {
        TrendKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SpError::UnknownTrendType(s.to_string()))
    }
}

/// Instantiate built-in trends by name
///
/// # Errors
/// Returns `UnknownTrendType` for the first unregistered name and
/// `InvalidConfig` for a name given more than once.
pub fn resolve_trends<S: AsRef<str>>(names: &[S]) -> Result<Vec<Box<dyn Trend>>> {
    let mut trends: Vec<Box<dyn Trend>> = Vec::with_capacity(names.len());
    for name in names {
        let kind = name.as_ref().parse::<TrendKind>()?;
        if trends.iter().any(|t| t.name() == kind.as_str()) {
            return Err(repeated_trend(kind.as_str()));
        }
        trends.push(kind.build());
    }
    Ok(trends)
}

pub(crate) fn repeated_trend(name: &str) -> SpError {
    SpError::InvalidConfig(format!("trend type '{}' requested more than once", name))
}

/// Upper-triangle pairs over the dataset's continuous variables
pub(crate) fn continuous_pairs(data: &Dataset) -> Vec<FeaturePair> {
    let vars = data.vars_for_role(Role::Continuous);
    let mut pairs = Vec::with_capacity(vars.len() * vars.len().saturating_sub(1) / 2);
    for (i, a) in vars.iter().enumerate() {
        for b in &vars[i + 1..] {
            pairs.push(FeaturePair::new(a.as_str(), b.as_str()));
        }
    }
    pairs
}
