use super::{continuous_pairs, FeaturePair, Trend};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::stats::{ols_slope, pearson, spearman};

/// Pearson correlation between two continuous features
#[derive(Debug, Clone, Copy, Default)]
pub struct PearsonCorrelation;

impl Trend for PearsonCorrelation {
    fn name(&self) -> &str {
        "pearson_corr"
    }

    fn select_pairs(&self, data: &Dataset) -> Vec<FeaturePair> {
        continuous_pairs(data)
    }

    fn evaluate(&self, data: &Dataset, pair: &FeaturePair) -> Result<f64> {
        Ok(pearson(
            data.float_column(&pair.feat1)?,
            data.float_column(&pair.feat2)?,
        ))
    }
}

/// Least-squares slope of `feat2` regressed on `feat1`
#[derive(Debug, Clone, Copy, Default)]
pub struct RegressionSlope;

impl Trend for RegressionSlope {
    fn name(&self) -> &str {
        "lin_reg"
    }

    fn select_pairs(&self, data: &Dataset) -> Vec<FeaturePair> {
        continuous_pairs(data)
    }

    fn evaluate(&self, data: &Dataset, pair: &FeaturePair) -> Result<f64> {
        Ok(ols_slope(
            data.float_column(&pair.feat1)?,
            data.float_column(&pair.feat2)?,
        ))
    }
}

/// Spearman rank correlation between two continuous features
#[derive(Debug, Clone, Copy, Default)]
pub struct RankCorrelation;

impl Trend for RankCorrelation {
    fn name(&self) -> &str {
        "rank_corr"
    }

    fn select_pairs(&self, data: &Dataset) -> Vec<FeaturePair> {
        continuous_pairs(data)
    }

    fn evaluate(&self, data: &Dataset, pair: &FeaturePair) -> Result<f64> {
        Ok(spearman(
            data.float_column(&pair.feat1)?,
            data.float_column(&pair.feat2)?,
        ))
    }
}
