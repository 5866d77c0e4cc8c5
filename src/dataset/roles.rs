use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::SpError;

/// Analytical role a column can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Eligible for continuous trend computation (correlation, slope, rank)
    Continuous,
    /// Eligible for partitioning the dataset into subgroups
    Groupby,
    /// Binary outcome used by rate trends
    Outcome,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Continuous => "continuous",
            Role::Groupby => "groupby",
            Role::Outcome => "outcome",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "continuous" => Ok(Role::Continuous),
            "groupby" => Ok(Role::Groupby),
            "outcome" => Ok(Role::Outcome),
            other => Err(SpError::InvalidConfig(format!("unknown role '{}'", other))),
        }
    }
}

/// Caller-declared role tags
///
/// Only explicit declarations live here. Roles that were never declared are
/// inferred from column types by [`crate::dataset::Dataset::vars_for_role`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleRegistry {
    declared: HashMap<Role, Vec<String>>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the declaration for `role`
    pub fn declare(&mut self, role: Role, vars: Vec<String>) {
        self.declared.insert(role, vars);
    }

    /// Declared columns for `role`, in declaration order
    pub fn roles(&self, role: Role) -> Option<&[String]> {
        self.declared.get(&role).map(Vec::as_slice)
    }

    /// True if `var` is explicitly tagged with any role other than `role`
    pub fn tagged_elsewhere(&self, var: &str, role: Role) -> bool {
        self.declared
            .iter()
            .filter(|(r, _)| **r != role)
            .any(|(_, vars)| vars.iter().any(|v| v == var))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_names() {
        for role in [Role::Continuous, Role::Groupby, Role::Outcome] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("trend".parse::<Role>().is_err());
    }

    #[test]
    fn test_tagged_elsewhere() {
        let mut registry = RoleRegistry::new();
        registry.declare(Role::Continuous, vec!["age".into()]);
        assert!(registry.tagged_elsewhere("age", Role::Groupby));
        assert!(!registry.tagged_elsewhere("age", Role::Continuous));
        assert!(!registry.tagged_elsewhere("dept", Role::Groupby));
    }
}
