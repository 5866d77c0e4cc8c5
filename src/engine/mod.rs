// Trend computation engines
//
// `SubgroupTrendComputer` evaluates pluggable trend types on the whole
// dataset and within every subgroup, joining both through
// `ResultAssembler`. `LegacyDetector` is the older correlation-only path
// that compares matrices directly and reports only reversing rows.

mod assembler;
mod legacy;
mod subgroup;

pub use assembler::ResultAssembler;
pub use legacy::{LegacyDetector, LEGACY_TREND_TYPE};
pub use subgroup::SubgroupTrendComputer;

use crate::config::{AnalysisConfig, GroupingLevels};
use crate::dataset::{Dataset, Role};
use crate::error::Result;
use crate::results::ResultTable;

/// Run one analysis as described by `config`
///
/// Role overrides from the configuration are applied to a copy of `data`.
/// The trend engine returns every aggregate/subgroup row; the legacy path
/// returns reversing rows only.
pub fn analyze(data: &Dataset, config: &AnalysisConfig) -> Result<ResultTable> {
    config.validate()?;

    if config.legacy {
        let mut detector = LegacyDetector::new(data);
        if let Some(vars) = &config.continuous_vars {
            detector = detector.with_regression_vars(vars.clone());
        }
        if let Some(vars) = &config.groupby_vars {
            detector = detector.with_groupby_vars(vars.clone());
        }
        return detector.detect();
    }

    let mut data = data.clone();
    let overrides = [
        (Role::Continuous, &config.continuous_vars),
        (Role::Groupby, &config.groupby_vars),
        (Role::Outcome, &config.outcome_vars),
    ];
    for (role, vars) in overrides {
        if let Some(vars) = vars {
            data.declare_role(role, vars.clone())?;
        }
    }

    let computer =
        SubgroupTrendComputer::new(&data).with_trend_names(config.trend_types.as_slice())?;
    match config.levels {
        GroupingLevels::One => computer.compute_1lev(),
        GroupingLevels::Two => computer.compute_2lev(),
    }
}
