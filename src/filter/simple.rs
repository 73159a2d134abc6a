//! Toggle filters from the filter bar.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::filter::issues::has_issues;
use crate::store::models::{Environment, Machine};

/// One multi-select dimension of the simple filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterDimension {
    Products,
    Environments,
    Owners,
    Tags,
}

impl FilterDimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterDimension::Products => "products",
            FilterDimension::Environments => "environments",
            FilterDimension::Owners => "owners",
            FilterDimension::Tags => "tags",
        }
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterDimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "products" => Ok(FilterDimension::Products),
            "environments" => Ok(FilterDimension::Environments),
            "owners" => Ok(FilterDimension::Owners),
            "tags" => Ok(FilterDimension::Tags),
            other => Err(format!("unknown filter dimension: {}", other)),
        }
    }
}

/// Simple filter state. An empty dimension does not constrain.
///
/// Values are kept in selection order without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimpleFilters {
    pub products: Vec<String>,
    pub environments: Vec<Environment>,
    pub owners: Vec<String>,
    pub tags: Vec<String>,
    pub show_issues_only: bool,
}

impl SimpleFilters {
    pub fn has_active(&self) -> bool {
        !self.products.is_empty()
            || !self.environments.is_empty()
            || !self.owners.is_empty()
            || !self.tags.is_empty()
            || self.show_issues_only
    }

    /// Replace the values of one dimension.
    ///
    /// Environment names that do not parse are skipped and returned so the
    /// caller can log them.
    pub fn set(&mut self, dimension: FilterDimension, values: Vec<String>) -> Vec<String> {
        let mut rejected = Vec::new();
        match dimension {
            FilterDimension::Products => self.products = dedup(values),
            FilterDimension::Owners => self.owners = dedup(values),
            FilterDimension::Tags => self.tags = dedup(values),
            FilterDimension::Environments => {
                let mut envs = Vec::new();
                for value in values {
                    match value.parse::<Environment>() {
                        Ok(env) if !envs.contains(&env) => envs.push(env),
                        Ok(_) => {}
                        Err(_) => rejected.push(value),
                    }
                }
                self.environments = envs;
            }
        }
        rejected
    }

    /// Add `value` if absent, otherwise remove it. Returns false when the
    /// value is not valid for the dimension.
    pub fn toggle(&mut self, dimension: FilterDimension, value: &str) -> bool {
        match dimension {
            FilterDimension::Products => toggle_in(&mut self.products, value.to_string()),
            FilterDimension::Owners => toggle_in(&mut self.owners, value.to_string()),
            FilterDimension::Tags => toggle_in(&mut self.tags, value.to_string()),
            FilterDimension::Environments => match value.parse::<Environment>() {
                Ok(env) => toggle_in(&mut self.environments, env),
                Err(_) => return false,
            },
        }
        true
    }

    pub fn values(&self, dimension: FilterDimension) -> Vec<String> {
        match dimension {
            FilterDimension::Products => self.products.clone(),
            FilterDimension::Owners => self.owners.clone(),
            FilterDimension::Tags => self.tags.clone(),
            FilterDimension::Environments => {
                self.environments.iter().map(|e| e.as_str().to_string()).collect()
            }
        }
    }

    pub fn matches(&self, machine: &Machine) -> bool {
        if !self.products.is_empty() {
            match machine.product_id.as_deref() {
                Some(pid) if self.products.iter().any(|p| p == pid) => {}
                _ => return false,
            }
        }

        if !self.environments.is_empty() && !self.environments.contains(&machine.environment) {
            return false;
        }

        if !self.owners.is_empty() {
            match machine.owner.as_deref() {
                Some(owner) if self.owners.iter().any(|o| o == owner) => {}
                _ => return false,
            }
        }

        // OR within the tag dimension
        if !self.tags.is_empty() && !self.tags.iter().any(|t| machine.has_tag(t)) {
            return false;
        }

        if self.show_issues_only && !has_issues(machine) {
            return false;
        }

        true
    }
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

fn toggle_in<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if let Some(pos) = values.iter().position(|v| *v == value) {
        values.remove(pos);
    } else {
        values.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{NewMachine, Status};

    fn machine(product: Option<&str>, env: Environment, owner: Option<&str>, tags: &[&str]) -> Machine {
        NewMachine {
            product_id: product.map(str::to_string),
            environment: env,
            owner: owner.map(str::to_string),
            tags: Some(tags.iter().map(|t| t.to_string()).collect()),
            ..NewMachine::new("host")
        }
        .into_machine("m-1".to_string())
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_empty_filters_match_everything() {
        let filters = SimpleFilters::default();
        assert!(!filters.has_active());
        assert!(filters.matches(&machine(None, Environment::Test, None, &[])));
    }

    #[test]
    fn test_tag_filter_is_or_within_dimension() {
        let m = machine(Some("prod-1"), Environment::Prod, None, &["a"]);
        let mut filters = SimpleFilters::default();

        filters.set(FilterDimension::Tags, strings(&["a", "b"]));
        assert!(filters.matches(&m));

        filters.set(FilterDimension::Tags, strings(&["b", "c"]));
        assert!(!filters.matches(&m));
    }

    #[test]
    fn test_dimensions_are_anded() {
        let m = machine(Some("prod-1"), Environment::Prod, Some("alice"), &[]);
        let mut filters = SimpleFilters::default();

        filters.set(FilterDimension::Products, strings(&["prod-1", "prod-2"]));
        filters.set(FilterDimension::Environments, strings(&["prod"]));
        assert!(filters.matches(&m));

        filters.set(FilterDimension::Owners, strings(&["bob"]));
        assert!(!filters.matches(&m));
    }

    #[test]
    fn test_null_product_or_owner_never_matches_a_set() {
        let m = machine(None, Environment::Prod, None, &[]);
        let mut filters = SimpleFilters::default();
        filters.set(FilterDimension::Products, strings(&["prod-1"]));
        assert!(!filters.matches(&m));

        let mut filters = SimpleFilters::default();
        filters.set(FilterDimension::Owners, strings(&["alice"]));
        assert!(!filters.matches(&m));
    }

    #[test]
    fn test_issues_only() {
        let mut filters = SimpleFilters::default();
        filters.show_issues_only = true;

        let mut healthy = machine(Some("prod-1"), Environment::Prod, Some("alice"), &[]);
        assert!(!filters.matches(&healthy));

        healthy.status = Status::Idle;
        assert!(filters.matches(&healthy));
    }

    #[test]
    fn test_set_environments_rejects_unknown_values() {
        let mut filters = SimpleFilters::default();
        let rejected = filters.set(
            FilterDimension::Environments,
            strings(&["prod", "production", "prod", "dev"]),
        );
        assert_eq!(rejected, vec!["production"]);
        assert_eq!(filters.environments, vec![Environment::Prod, Environment::Dev]);
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut filters = SimpleFilters::default();
        assert!(filters.toggle(FilterDimension::Owners, "alice"));
        assert_eq!(filters.values(FilterDimension::Owners), vec!["alice"]);
        assert!(filters.has_active());

        assert!(filters.toggle(FilterDimension::Owners, "alice"));
        assert!(filters.owners.is_empty());

        assert!(filters.toggle(FilterDimension::Environments, "staging"));
        assert_eq!(filters.values(FilterDimension::Environments), vec!["staging"]);
        assert!(!filters.toggle(FilterDimension::Environments, "qa"));
    }

    #[test]
    fn test_dimension_parse() {
        assert_eq!("tags".parse::<FilterDimension>(), Ok(FilterDimension::Tags));
        assert!("colors".parse::<FilterDimension>().is_err());
    }
}
