//! Trend reversal detection and paradox policies
//!
//! The base rule is sign-based: two trend values reverse when their signs
//! differ, with zero a sign of its own. `NaN` is not comparable and never
//! reverses. Relaxed paradox definitions plug in through [`ParadoxPolicy`].

use std::fmt;

/// Sign of `x` as -1, 0 or +1, `None` for `NaN`
pub fn sign(x: f64) -> Option<i8> {
    if x.is_nan() {
        None
    } else if x > 0.0 {
        Some(1)
    } else if x < 0.0 {
        Some(-1)
    } else {
        Some(0)
    }
}

/// True iff `a` and `b` have different signs
///
/// Zero against any nonzero value counts as a reversal. Either operand being
/// `NaN` yields `false`.
pub fn is_reverse(a: f64, b: f64) -> bool {
    match (sign(a), sign(b)) {
        (Some(sa), Some(sb)) => sa != sb,
        _ => false,
    }
}

/// Predicate deciding whether an (aggregate, subgroup) value pair is a paradox
///
/// `name` is the identity used to memoize label columns: two policies with
/// the same name are assumed to label identically.
pub trait ParadoxPolicy {
    fn name(&self) -> &str;

    fn is_paradox(&self, aggregate: f64, subgroup: f64) -> bool;
}

/// Plain Simpson's Paradox: any sign reversal
#[derive(Debug, Clone, Copy, Default)]
pub struct SignReversal;

impl ParadoxPolicy for SignReversal {
    fn name(&self) -> &str {
        "SP"
    }

    fn is_paradox(&self, aggregate: f64, subgroup: f64) -> bool {
        is_reverse(aggregate, subgroup)
    }
}

/// Sign reversal whose values also differ by at least `threshold`
///
/// Filters reversals between two near-zero trends.
#[derive(Debug, Clone)]
pub struct MagnitudeReversal {
    threshold: f64,
    name: String,
}

impl MagnitudeReversal {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            name: format!("SP_mag{}", threshold),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl ParadoxPolicy for MagnitudeReversal {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_paradox(&self, aggregate: f64, subgroup: f64) -> bool {
        is_reverse(aggregate, subgroup) && (aggregate - subgroup).abs() >= self.threshold
    }
}

/// Caller-supplied predicate with a caller-chosen identity
///
/// `NaN` operands short-circuit to `false` before the predicate runs.
pub struct FnPolicy<F> {
    name: String,
    predicate: F,
}

impl<F> FnPolicy<F>
where
    F: Fn(f64, f64) -> bool,
{
    /// `name` is the policy's identity: labels are cached per name, so two
    /// policies with different predicates must not share one. A second
    /// `FnPolicy` reusing a name gets the first one's cached labels.
    pub fn new(name: impl Into<String>, predicate: F) -> Self {
        Self {
            name: name.into(),
            predicate,
        }
    }
}

impl<F> fmt::Debug for FnPolicy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPolicy").field("name", &self.name).finish()
    }
}

impl<F> ParadoxPolicy for FnPolicy<F>
where
    F: Fn(f64, f64) -> bool,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn is_paradox(&self, aggregate: f64, subgroup: f64) -> bool {
        if aggregate.is_nan() || subgroup.is_nan() {
            return false;
        }
        (self.predicate)(aggregate, subgroup)
    }
}
