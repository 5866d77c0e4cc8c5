//! Descriptive statistics over real-valued columns
//!
//! Every function works on pairwise-complete observations: a row where
//! either value is `NaN` is ignored. Degenerate inputs (fewer than two
//! complete observations, zero variance) yield `NaN` instead of an error so
//! that callers can carry them through as data.

use std::cmp::Ordering;

/// Keep only the rows where both `x` and `y` are present
pub fn complete_pairs(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    x.iter()
        .zip(y)
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .map(|(a, b)| (*a, *b))
        .unzip()
}

/// Arithmetic mean, `NaN` for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Centered sums of squares and cross-products: (Sxx, Syy, Sxy)
fn centered_moments(x: &[f64], y: &[f64]) -> (f64, f64, f64) {
    let mx = mean(x);
    let my = mean(y);
    x.iter()
        .zip(y)
        .fold((0.0, 0.0, 0.0), |(sxx, syy, sxy), (a, b)| {
            let dx = a - mx;
            let dy = b - my;
            (sxx + dx * dx, syy + dy * dy, sxy + dx * dy)
        })
}

/// Pearson product-moment correlation
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let (x, y) = complete_pairs(x, y);
    if x.len() < 2 {
        return f64::NAN;
    }

    let (sxx, syy, sxy) = centered_moments(&x, &y);
    if sxx <= 0.0 || syy <= 0.0 {
        return f64::NAN;
    }

    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Ordinary least squares slope of `y` regressed on `x`
pub fn ols_slope(x: &[f64], y: &[f64]) -> f64 {
    let (x, y) = complete_pairs(x, y);
    if x.len() < 2 {
        return f64::NAN;
    }

    let (sxx, _, sxy) = centered_moments(&x, &y);
    if sxx <= 0.0 {
        return f64::NAN;
    }
    sxy / sxx
}

/// 1-based ranks, ties receive the average of the ranks they span
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(Ordering::Equal)
    });

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end share the mean of ranks start+1..=end
        let rank = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

/// Spearman rank correlation
pub fn spearman(x: &[f64], y: &[f64]) -> f64 {
    let (x, y) = complete_pairs(x, y);
    if x.len() < 2 {
        return f64::NAN;
    }
    pearson(&average_ranks(&x), &average_ranks(&y))
}
