//! Symmetric pairwise matrices and upper-triangle extraction
//!
//! The strict upper triangle (diagonal excluded), walked row-major, is the
//! canonical enumeration of unordered variable pairs: entry `(i, j)` with
//! `i < j` appears exactly once, ordered by `i` then `j`. Two matrices built
//! over the same variable ordering therefore extract to sequences that line
//! up position by position.

use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::{Result, SpError};
use crate::stats::pearson;

/// One upper-triangle cell of a symmetric matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairwiseEntry {
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

/// Square symmetric matrix over labelled variables, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricMatrix {
    labels: Vec<String>,
    values: Vec<f64>,
}

impl SymmetricMatrix {
    /// Build from labels and a row-major `n*n` value buffer
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the buffer is not `labels.len()^2` long.
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Result<Self> {
        let n = labels.len();
        if values.len() != n * n {
            return Err(SpError::InvalidConfig(format!(
                "matrix over {} variables needs {} values, got {}",
                n,
                n * n,
                values.len()
            )));
        }
        Ok(Self { labels, values })
    }

    /// Build by evaluating `f(i, j)` once per unordered pair; the diagonal is 1
    pub fn from_pairwise<F>(labels: Vec<String>, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let n = labels.len();
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            values[i * n + i] = 1.0;
            for j in (i + 1)..n {
                let v = f(i, j);
                values[i * n + j] = v;
                values[j * n + i] = v;
            }
        }
        Self { labels, values }
    }

    pub fn dim(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.dim() + col]
    }

    /// Strict upper triangle in row-major order: `n(n-1)/2` entries, empty for `n < 2`
    pub fn upper_triangle(&self) -> Vec<PairwiseEntry> {
        let n = self.dim();
        let mut entries = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for row in 0..n {
            for col in (row + 1)..n {
                entries.push(PairwiseEntry {
                    row,
                    col,
                    value: self.get(row, col),
                });
            }
        }
        entries
    }

    /// Values of [`Self::upper_triangle`] without their indices
    pub fn upper_triangle_values(&self) -> Vec<f64> {
        self.upper_triangle().into_iter().map(|e| e.value).collect()
    }
}

/// Pearson correlation matrix over `vars`, in the given order
///
/// Each cell uses the observations complete for its own pair. Cells with
/// too little data are `NaN`.
pub fn correlation_matrix(data: &Dataset, vars: &[String]) -> Result<SymmetricMatrix> {
    let columns = vars
        .iter()
        .map(|v| data.float_column(v))
        .collect::<Result<Vec<_>>>()?;

    Ok(SymmetricMatrix::from_pairwise(vars.to_vec(), |i, j| {
        pearson(columns[i], columns[j])
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("v{}", i)).collect()
    }

    #[test]
    fn test_upper_triangle_order_and_count() {
        let m = SymmetricMatrix::from_pairwise(labels(4), |i, j| (i * 10 + j) as f64);
        let entries = m.upper_triangle();
        assert_eq!(entries.len(), 6);

        let idx: Vec<(usize, usize)> = entries.iter().map(|e| (e.row, e.col)).collect();
        assert_eq!(idx, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        assert_eq!(entries[4].value, 13.0);
    }

    #[test]
    fn test_upper_triangle_small() {
        assert!(SymmetricMatrix::from_pairwise(labels(0), |_, _| 0.0)
            .upper_triangle()
            .is_empty());
        assert!(SymmetricMatrix::from_pairwise(labels(1), |_, _| 0.0)
            .upper_triangle()
            .is_empty());
    }

    #[test]
    fn test_new_rejects_wrong_size() {
        assert!(SymmetricMatrix::new(labels(2), vec![1.0, 0.5, 0.5]).is_err());
        let m = SymmetricMatrix::new(labels(2), vec![1.0, 0.5, 0.5, 1.0]).unwrap();
        assert_eq!(m.upper_triangle_values(), vec![0.5]);
    }

    #[test]
    fn test_from_pairwise_is_symmetric() {
        let m = SymmetricMatrix::from_pairwise(labels(3), |i, j| (i + j) as f64);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn test_correlation_matrix() {
        let data = Dataset::new()
            .with_float("a", vec![1.0, 2.0, 3.0])
            .unwrap()
            .with_float("b", vec![3.0, 2.0, 1.0])
            .unwrap()
            .with_float("c", vec![1.0, 2.0, 3.0])
            .unwrap();
        let vars = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let m = correlation_matrix(&data, &vars).unwrap();

        let values = m.upper_triangle_values();
        assert!((values[0] + 1.0).abs() < 1e-12);
        assert!((values[1] - 1.0).abs() < 1e-12);
        assert!((values[2] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_matrix_non_float_column() {
        let data = Dataset::new().with_str("g", ["a", "b"]).unwrap();
        assert!(correlation_matrix(&data, &["g".to_string()]).is_err());
    }
}
