use super::assembler::ResultAssembler;
use crate::dataset::{Dataset, Role};
use crate::error::{Result, SpError};
use crate::results::ResultTable;
use crate::trend::{repeated_trend, resolve_trends, FeaturePair, Trend};

/// Computes aggregate and per-subgroup trends for pluggable trend types
///
/// # Example
/// ```
/// use detect_sp::dataset::Dataset;
/// use detect_sp::engine::SubgroupTrendComputer;
///
/// let data = Dataset::new()
///     .with_float("X", vec![1.0, 2.0, 3.0, 4.0]).unwrap()
///     .with_float("Y", vec![1.0, 2.0, 4.0, 3.0]).unwrap()
///     .with_str("G", ["a", "a", "b", "b"]).unwrap();
///
/// let table = SubgroupTrendComputer::new(&data)
///     .with_trend_names(&["pearson_corr"]).unwrap()
///     .compute_1lev().unwrap();
/// assert_eq!(table.len(), 2); // one row per subgroup of G
/// ```
pub struct SubgroupTrendComputer<'a> {
    data: &'a Dataset,
    trends: Vec<Box<dyn Trend>>,
    groupby_vars: Option<Vec<String>>,
}

impl<'a> SubgroupTrendComputer<'a> {
    pub fn new(data: &'a Dataset) -> Self {
        Self {
            data,
            trends: Vec::new(),
            groupby_vars: None,
        }
    }

    /// Add built-in trend types by name
    ///
    /// # Errors
    /// Returns `UnknownTrendType` for an unregistered name and
    /// `InvalidConfig` for a trend type that is already present.
    pub fn with_trend_names<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        for trend in resolve_trends(names)? {
            if self.trends.iter().any(|t| t.name() == trend.name()) {
                return Err(repeated_trend(trend.name()));
            }
            self.trends.push(trend);
        }
        Ok(self)
    }

    /// Add ready-made trend objects
    pub fn with_trends(mut self, trends: Vec<Box<dyn Trend>>) -> Self {
        self.trends.extend(trends);
        self
    }

    /// Partition on these variables instead of the dataset's groupby role
    pub fn with_groupby_vars(mut self, vars: Vec<String>) -> Self {
        self.groupby_vars = Some(vars);
        self
    }

    fn resolve_groupby(&self) -> Result<Vec<String>> {
        let vars = match &self.groupby_vars {
            Some(vars) => vars.clone(),
            None => self.data.vars_for_role(Role::Groupby),
        };
        if let Some(missing) = vars
            .iter()
            .find(|v| !self.data.column_names().contains(*v))
        {
            return Err(SpError::UnknownColumn(missing.clone()));
        }
        Ok(vars)
    }

    /// Select pairs and record the aggregate trend of each, per trend type
    fn aggregate(&self, asm: &mut ResultAssembler) -> Result<Vec<Vec<FeaturePair>>> {
        let mut selections = Vec::with_capacity(self.trends.len());
        for trend in &self.trends {
            let pairs = trend.select_pairs(self.data);
            if pairs.is_empty() {
                tracing::debug!(trend = trend.name(), "no eligible variables, skipping");
            }
            for pair in &pairs {
                let value = trend.evaluate(self.data, pair)?;
                asm.push_aggregate(trend.name(), pair.clone(), value)?;
            }
            selections.push(pairs);
        }
        Ok(selections)
    }

    /// Trends with a single level of grouping
    ///
    /// Each grouping variable partitions the dataset once; every trend is
    /// then evaluated inside every partition. Rows are ordered by trend type,
    /// grouping variable, subgroup, then feature pair.
    pub fn compute_1lev(&self) -> Result<ResultTable> {
        let groupby = self.resolve_groupby()?;
        tracing::info!(
            trends = self.trends.len(),
            groupby_vars = groupby.len(),
            rows = self.data.n_rows(),
            "computing 1-level subgroup trends"
        );

        let mut asm = ResultAssembler::new();
        let selections = self.aggregate(&mut asm)?;

        let partitions = groupby
            .iter()
            .map(|var| Ok((var.as_str(), self.data.partition(var)?)))
            .collect::<Result<Vec<_>>>()?;

        for (trend, pairs) in self.trends.iter().zip(&selections) {
            for (group_var, parts) in &partitions {
                for (subgroup, part) in parts {
                    for pair in pairs.iter().filter(|p| !p.contains(group_var)) {
                        let value = trend.evaluate(part, pair)?;
                        asm.push_subgroup(
                            trend.name(),
                            pair.clone(),
                            group_var,
                            subgroup.clone(),
                            value,
                        );
                    }
                }
            }
        }

        let table = asm.finish()?;
        tracing::debug!(rows = table.len(), "assembled result table");
        Ok(table)
    }

    /// Trends defined over two levels of grouping
    ///
    /// The grouping variable is handed to the trend as an extra partition
    /// key, so trends such as rates can compute on the joint partition.
    /// Rows are ordered by trend type, grouping variable, feature pair, then
    /// subgroup.
    pub fn compute_2lev(&self) -> Result<ResultTable> {
        let groupby = self.resolve_groupby()?;
        tracing::info!(
            trends = self.trends.len(),
            groupby_vars = groupby.len(),
            rows = self.data.n_rows(),
            "computing 2-level subgroup trends"
        );

        let mut asm = ResultAssembler::new();
        let selections = self.aggregate(&mut asm)?;

        for (trend, pairs) in self.trends.iter().zip(&selections) {
            for group_var in &groupby {
                for pair in pairs.iter().filter(|p| !p.contains(group_var)) {
                    for (subgroup, value) in trend.evaluate_nested(self.data, pair, group_var)? {
                        asm.push_subgroup(trend.name(), pair.clone(), group_var, subgroup, value);
                    }
                }
            }
        }

        let table = asm.finish()?;
        tracing::debug!(rows = table.len(), "assembled result table");
        Ok(table)
    }
}
