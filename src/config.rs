// Analysis configuration
//
// Everything a detection run needs besides the data: which trend types to
// compute, role overrides for the dataset, grouping depth and the paradox
// policy used to flag rows. Loaded from TOML; CLI flags override fields.

use crate::error::{Result, SpError};
use crate::reversal::{MagnitudeReversal, ParadoxPolicy, SignReversal};
use crate::trend::TrendKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Grouping depth of subgroup trends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingLevels {
    /// Partition once by each grouping variable
    #[default]
    One,
    /// Hand the grouping variable to the trend as an extra partition key
    Two,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[default]
    Sign,
    Magnitude,
}

/// Paradox policy selection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub kind: PolicyKind,

    /// Minimum |aggregate - subgroup| for the magnitude policy, ignored by `sign`
    pub threshold: f64,
}

impl PolicyConfig {
    pub fn build(&self) -> Box<dyn ParadoxPolicy> {
        match self.kind {
            PolicyKind::Sign => Box::new(SignReversal),
            PolicyKind::Magnitude => Box::new(MagnitudeReversal::new(self.threshold)),
        }
    }
}

/// Configuration for one detection run
///
/// # Example
/// ```
/// use detect_sp::config::{AnalysisConfig, GroupingLevels};
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.trend_types, vec!["pearson_corr".to_string()]);
/// assert_eq!(config.levels, GroupingLevels::One);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Registered trend type names, computed in this order
    pub trend_types: Vec<String>,

    /// Overrides of the dataset roles; `None` falls back to type inference
    pub continuous_vars: Option<Vec<String>>,
    pub groupby_vars: Option<Vec<String>>,
    pub outcome_vars: Option<Vec<String>>,

    pub levels: GroupingLevels,
    pub policy: PolicyConfig,

    /// Views carry the grouping variable that exhibits the reversal
    pub colored_views: bool,

    /// Use the correlation-matrix detector instead of the trend engine
    pub legacy: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            trend_types: vec![TrendKind::PearsonCorrelation.as_str().to_string()],
            continuous_vars: None,
            groupby_vars: None,
            outcome_vars: None,
            levels: GroupingLevels::One,
            policy: PolicyConfig::default(),
            colored_views: false,
            legacy: false,
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration file
    ///
    /// Missing keys take their default values. The result is validated.
    ///
    /// # Example TOML
    /// ```toml
    /// trend_types = ["pearson_corr", "lin_reg"]
    /// groupby_vars = ["dept"]
    /// levels = "one"
    ///
    /// [policy]
    /// kind = "magnitude"
    /// threshold = 0.1
    /// ```
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded analysis config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.trend_types.is_empty() {
            return Err(SpError::InvalidConfig(
                "trend_types must name at least one trend type".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for name in &self.trend_types {
            name.parse::<TrendKind>()?;
            if !seen.insert(name.as_str()) {
                return Err(SpError::InvalidConfig(format!(
                    "trend_types lists '{}' more than once",
                    name
                )));
            }
        }

        if self.policy.kind == PolicyKind::Magnitude
            && !(self.policy.threshold.is_finite() && self.policy.threshold >= 0.0)
        {
            return Err(SpError::InvalidConfig(format!(
                "policy threshold must be a finite value >= 0, got {}",
                self.policy.threshold
            )));
        }

        let lists = [
            ("continuous_vars", &self.continuous_vars),
            ("groupby_vars", &self.groupby_vars),
            ("outcome_vars", &self.outcome_vars),
        ];
        for (field, vars) in lists {
            let Some(vars) = vars else { continue };
            let mut seen = HashSet::new();
            if let Some(dup) = vars.iter().find(|v| !seen.insert(v.as_str())) {
                return Err(SpError::InvalidConfig(format!(
                    "{} lists '{}' more than once",
                    field, dup
                )));
            }
        }

        Ok(())
    }

    pub fn paradox_policy(&self) -> Box<dyn ParadoxPolicy> {
        self.policy.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.legacy);
        assert_eq!(config.paradox_policy().name(), "SP");
    }

    #[test]
    fn test_parse_full_toml() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            trend_types = ["pearson_corr", "rate"]
            groupby_vars = ["dept"]
            outcome_vars = ["admitted"]
            levels = "two"
            colored_views = true

            [policy]
            kind = "magnitude"
            threshold = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.trend_types.len(), 2);
        assert_eq!(config.groupby_vars, Some(vec!["dept".to_string()]));
        assert_eq!(config.levels, GroupingLevels::Two);
        assert!(config.colored_views);
        assert_eq!(config.paradox_policy().name(), "SP_mag0.25");
        assert!(config.continuous_vars.is_none());
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let config = AnalysisConfig::from_toml_str("legacy = true").unwrap();
        assert!(config.legacy);
        assert_eq!(config.trend_types, AnalysisConfig::default().trend_types);
        assert_eq!(config.policy.kind, PolicyKind::Sign);
    }

    #[test]
    fn test_unknown_trend_rejected() {
        let err = AnalysisConfig::from_toml_str(r#"trend_types = ["median_diff"]"#).unwrap_err();
        assert!(matches!(err, SpError::UnknownTrendType(ref n) if n == "median_diff"));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_empty_trend_list_rejected() {
        let config = AnalysisConfig {
            trend_types: vec![],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SpError::InvalidConfig(_))));
    }

    #[test]
    fn test_repeated_trend_type_rejected() {
        let err = AnalysisConfig::from_toml_str(r#"trend_types = ["pearson_corr", "pearson_corr"]"#)
            .unwrap_err();
        assert!(matches!(err, SpError::InvalidConfig(ref m) if m.contains("pearson_corr")));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let config = AnalysisConfig {
            policy: PolicyConfig {
                kind: PolicyKind::Magnitude,
                threshold: -0.1,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AnalysisConfig {
            policy: PolicyConfig {
                kind: PolicyKind::Magnitude,
                threshold: f64::INFINITY,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_vars_rejected() {
        let config = AnalysisConfig {
            groupby_vars: Some(vec!["G".into(), "H".into(), "G".into()]),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("groupby_vars"));
    }

    #[test]
    fn test_malformed_toml_is_input_error() {
        let err = AnalysisConfig::from_toml_str("trend_types = [").unwrap_err();
        assert!(matches!(err, SpError::Toml(_)));
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sp.toml");
        std::fs::write(&path, "trend_types = [\"lin_reg\"]\n").unwrap();

        let config = AnalysisConfig::from_toml(&path).unwrap();
        assert_eq!(config.trend_types, vec!["lin_reg".to_string()]);

        assert!(matches!(
            AnalysisConfig::from_toml(dir.path().join("missing.toml")),
            Err(SpError::Io(_))
        ));
    }
}
