//! CLI argument parsing for detect-sp

use crate::config::{AnalysisConfig, GroupingLevels, PolicyKind};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text table (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

/// Paradox definition used to flag rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Any sign reversal
    Sign,
    /// Sign reversal with |aggregate - subgroup| >= --threshold
    Magnitude,
}

#[derive(Parser, Debug)]
#[command(name = "detect-sp")]
#[command(version)]
#[command(about = "Detect Simpson's Paradox in tabular data", long_about = None)]
pub struct Cli {
    /// Dataset as a JSON array of flat records
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Analysis configuration file (TOML); flags below override it
    #[arg(long = "config", value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Trend type to compute (repeatable: -t pearson_corr -t lin_reg)
    #[arg(short = 't', long = "trend", value_name = "TREND")]
    pub trends: Vec<String>,

    /// Grouping variables (e.g., -g dept,gender)
    #[arg(short = 'g', long = "groupby", value_name = "VARS", value_delimiter = ',')]
    pub groupby: Option<Vec<String>>,

    /// Continuous variables (e.g., --continuous height,weight)
    #[arg(long = "continuous", value_name = "VARS", value_delimiter = ',')]
    pub continuous: Option<Vec<String>>,

    /// Outcome variables for rate trends
    #[arg(long = "outcome", value_name = "VARS", value_delimiter = ',')]
    pub outcome: Option<Vec<String>>,

    /// Compute trends over two levels of grouping
    #[arg(long = "two-level")]
    pub two_level: bool,

    /// Use the correlation-matrix detector
    #[arg(long = "legacy")]
    pub legacy: bool,

    /// Paradox policy
    #[arg(long = "policy", value_enum)]
    pub policy: Option<PolicyArg>,

    /// Minimum trend difference for the magnitude policy (implies
    /// --policy magnitude unless --policy is given)
    #[arg(long = "threshold", value_name = "DELTA")]
    pub threshold: Option<f64>,

    /// Print distinct views instead of rows
    #[arg(long = "views")]
    pub views: bool,

    /// Views include the grouping variable (implies --views)
    #[arg(long = "colored")]
    pub colored: bool,

    /// Print every result row, not only the flagged ones
    #[arg(long = "all-rows", conflicts_with_all = ["views", "colored"])]
    pub all_rows: bool,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Overlay command-line flags on a configuration
    pub fn apply_to(&self, config: &mut AnalysisConfig) {
        if !self.trends.is_empty() {
            config.trend_types = self.trends.clone();
        }
        if let Some(vars) = &self.groupby {
            config.groupby_vars = Some(vars.clone());
        }
        if let Some(vars) = &self.continuous {
            config.continuous_vars = Some(vars.clone());
        }
        if let Some(vars) = &self.outcome {
            config.outcome_vars = Some(vars.clone());
        }
        if self.two_level {
            config.levels = GroupingLevels::Two;
        }
        if self.legacy {
            config.legacy = true;
        }
        match (self.policy, self.threshold) {
            (Some(PolicyArg::Sign), _) => config.policy.kind = PolicyKind::Sign,
            (Some(PolicyArg::Magnitude), _) | (None, Some(_)) => {
                config.policy.kind = PolicyKind::Magnitude
            }
            (None, None) => {}
        }
        if let Some(threshold) = self.threshold {
            config.policy.threshold = threshold;
        }
        if self.colored {
            config.colored_views = true;
        }
    }

    /// Views are printed for --views, --colored or `colored_views = true`
    /// in the config, unless --all-rows asks for rows
    pub fn wants_views(&self, config: &AnalysisConfig) -> bool {
        !self.all_rows && (self.views || self.colored || config.colored_views)
    }
}
