// JSON records loader
//
// Input is an array of flat objects, one per observation:
//   [{"X": 1.5, "Y": 2.0, "G": "a"}, ...]
// Column order follows first appearance of each key. A key absent from a
// record, or an explicit null, is a missing value.

use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use super::{Column, Dataset};
use crate::error::{Result, SpError};

impl Dataset {
    /// Parse a dataset from a JSON array of records
    ///
    /// Column types are inferred from the non-null values of each column:
    /// all booleans → bool, all integers → int, any fractional number →
    /// float, all strings → str. A column with no values at all is float
    /// (all missing).
    ///
    /// # Errors
    /// Returns error on malformed JSON or on a column mixing incompatible
    /// JSON types (e.g. strings and numbers).
    pub fn from_json_records(input: &str) -> Result<Self> {
        let records: Vec<Map<String, Value>> = serde_json::from_str(input)?;

        let mut names: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !names.contains(key) {
                    names.push(key.clone());
                }
            }
        }

        let mut dataset = Dataset::new();
        for name in names {
            let values: Vec<&Value> = records
                .iter()
                .map(|r| r.get(&name).unwrap_or(&Value::Null))
                .collect();
            let column = infer_column(&name, &values)?;
            dataset = dataset.with_column(name, column)?;
        }

        tracing::debug!(
            rows = dataset.n_rows(),
            columns = dataset.n_columns(),
            "loaded dataset from JSON records"
        );
        Ok(dataset)
    }

    /// Read and parse a JSON records file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_records(&content)
    }
}

fn infer_column(name: &str, values: &[&Value]) -> Result<Column> {
    let present = || values.iter().filter(|v| !v.is_null());

    if present().next().is_none() {
        return Ok(Column::Float(vec![f64::NAN; values.len()]));
    }

    if present().all(|v| v.is_boolean()) {
        return Ok(Column::Bool(values.iter().map(|v| v.as_bool()).collect()));
    }

    if present().all(|v| v.is_i64()) {
        return Ok(Column::Int(values.iter().map(|v| v.as_i64()).collect()));
    }

    if present().all(|v| v.is_number()) {
        return Ok(Column::Float(
            values
                .iter()
                .map(|v| v.as_f64().unwrap_or(f64::NAN))
                .collect(),
        ));
    }

    if present().all(|v| v.is_string()) {
        return Ok(Column::Str(
            values
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect(),
        ));
    }

    Err(SpError::ColumnType {
        column: name.to_string(),
        expected: "values of a single JSON type (bool, number or string)".to_string(),
    })
}
