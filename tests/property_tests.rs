//! Property tests for filtering and grouping.

use proptest::prelude::*;

use rackboard_core::filter::{evaluate, has_issues};
use rackboard_core::grouping::group_records;
use rackboard_core::{
    Condition, Environment, Field, FilterDimension, Machine, MachineType, Operator, Product, SimpleFilters,
    Status, View,
};

const OWNERS: [&str; 4] = ["alice", "bob", "carol", ""];
const TAGS: [&str; 5] = ["gpu", "loaner", "ssd", "legacy", "k8s-node"];
const SUB_PRODUCTS: [&str; 4] = ["API", "Workers", "Legacy", ""];

fn products() -> Vec<Product> {
    vec![
        Product::new("prod-1", "E-Commerce Platform", &["API", "Workers"]),
        Product::new("prod-2", "Analytics Engine", &[]),
    ]
}

fn arb_environment() -> impl Strategy<Value = Environment> {
    prop::sample::select(Environment::ALL.to_vec())
}

fn arb_status() -> impl Strategy<Value = Status> {
    prop::sample::select(vec![Status::Active, Status::Inactive, Status::Idle, Status::Decommissioned])
}

fn arb_machine(index: usize) -> impl Strategy<Value = Machine> {
    (
        "[a-z]{2,6}-[0-9]{2}",
        prop::sample::select(vec![None, Some("prod-1"), Some("prod-2")]),
        prop::sample::select(SUB_PRODUCTS.to_vec()),
        arb_environment(),
        prop::sample::select(OWNERS.to_vec()),
        arb_status(),
        prop::sample::subsequence(TAGS.to_vec(), 0..=3),
    )
        .prop_map(move |(hostname, product, sub, environment, owner, status, tags)| Machine {
            id: format!("m-{}", index),
            hostname,
            machine_type: MachineType::Vm,
            product_id: product.map(str::to_string),
            sub_product: product.and(Some(sub)).filter(|s| !s.is_empty()).map(str::to_string),
            environment,
            owner: Some(owner.to_string()).filter(|o| !o.is_empty()),
            status,
            tags: tags.into_iter().map(str::to_string).collect(),
        })
}

fn arb_fleet() -> impl Strategy<Value = Vec<Machine>> {
    (0usize..30).prop_flat_map(|n| (0..n).map(arb_machine).collect::<Vec<_>>())
}

fn arb_simple_filters() -> impl Strategy<Value = SimpleFilters> {
    (
        0u8..32,
        prop::sample::subsequence(vec!["prod-1", "prod-2", "prod-404"], 1..=3),
        prop::sample::subsequence(Environment::ALL.to_vec(), 1..=4),
        prop::sample::subsequence(vec!["alice", "bob", "carol", "dave"], 1..=4),
        prop::sample::subsequence(TAGS.to_vec(), 1..=5),
    )
        .prop_map(|(mask, products, environments, owners, tags)| {
            let pick = |bit: u8, values: Vec<&str>| -> Vec<String> {
                if mask & bit != 0 {
                    values.into_iter().map(str::to_string).collect()
                } else {
                    Vec::new()
                }
            };
            SimpleFilters {
                products: pick(1, products),
                environments: if mask & 2 != 0 { environments } else { Vec::new() },
                owners: pick(4, owners),
                tags: pick(8, tags),
                show_issues_only: mask & 16 != 0,
            }
        })
}

/// Wire name of a serializable enum value.
fn wire<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn field_text(field: Field, m: &Machine) -> Option<String> {
    Some(match field {
        Field::Hostname => m.hostname.clone(),
        Field::ProductId => m.product_id.clone().unwrap_or_default(),
        Field::Environment => wire(&m.environment),
        Field::Type => wire(&m.machine_type),
        Field::Owner => m.owner.clone().unwrap_or_default(),
        Field::Tags => m.tags.join(","),
        Field::Status => wire(&m.status),
        Field::SubProduct => m.sub_product.clone().unwrap_or_default(),
        Field::Unknown => return None,
    })
}

/// Condition rules written out independently of `Condition::matches`.
fn expected_condition(c: &Condition, m: &Machine) -> bool {
    if c.value.is_empty() {
        return true;
    }
    let text = match field_text(c.field, m) {
        Some(text) => text,
        None => return true,
    };
    let (lower, needle) = (text.to_lowercase(), c.value.to_lowercase());
    match c.operator {
        Operator::Equals | Operator::IsAnyOf if c.field == Field::Tags => m.tags.iter().any(|t| *t == c.value),
        Operator::Equals | Operator::IsAnyOf => text == c.value,
        Operator::Contains => lower.contains(&needle),
        Operator::StartsWith => lower.starts_with(&needle),
        Operator::EndsWith => lower.ends_with(&needle),
        Operator::Unknown => true,
    }
}

/// Simple filter rules written out independently of `SimpleFilters::matches`.
fn expected_simple(f: &SimpleFilters, m: &Machine) -> bool {
    let products = f.products.is_empty() || m.product_id.as_ref().map_or(false, |p| f.products.contains(p));
    let environments = f.environments.is_empty() || f.environments.contains(&m.environment);
    let owners = f.owners.is_empty() || m.owner.as_ref().map_or(false, |o| f.owners.contains(o));
    let tags = f.tags.is_empty() || m.tags.iter().any(|t| f.tags.contains(t));
    let issue = m.product_id.is_none()
        || (m.tags.iter().any(|t| t == "loaner") && m.environment == Environment::Prod)
        || matches!(m.status, Status::Idle | Status::Decommissioned);
    let issues = !f.show_issues_only || issue;
    products && environments && owners && tags && issues
}

fn arb_condition() -> impl Strategy<Value = Condition> {
    (
        prop::sample::select(Field::ALL.to_vec()),
        prop::sample::select(vec![
            Operator::Equals,
            Operator::Contains,
            Operator::StartsWith,
            Operator::EndsWith,
            Operator::IsAnyOf,
        ]),
        prop::sample::select(vec!["", "a", "prod", "gpu", "alice", "prod-1", "API", "-0"]),
    )
        .prop_map(|(field, operator, value)| Condition::new(field, operator, value))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every combination of active simple dimensions selects exactly the
    /// records the filter rules accept, in store order.
    #[test]
    fn prop_simple_filters_match_rules(fleet in arb_fleet(), filters in arb_simple_filters()) {
        let result: Vec<&str> = evaluate(&fleet, &filters, &[]).iter().map(|m| m.id.as_str()).collect();
        let expected: Vec<&str> = fleet
            .iter()
            .filter(|m| expected_simple(&filters, m))
            .map(|m| m.id.as_str())
            .collect();
        prop_assert_eq!(result, expected);
    }

    /// Conditions and simple filters combine as one conjunction.
    #[test]
    fn prop_conditions_and_filters_conjoin(
        fleet in arb_fleet(),
        filters in arb_simple_filters(),
        conditions in prop::collection::vec(arb_condition(), 0..4),
    ) {
        let result: Vec<&str> = evaluate(&fleet, &filters, &conditions).iter().map(|m| m.id.as_str()).collect();
        let expected: Vec<&str> = fleet
            .iter()
            .filter(|m| expected_simple(&filters, m) && conditions.iter().all(|c| expected_condition(c, m)))
            .map(|m| m.id.as_str())
            .collect();
        prop_assert_eq!(result, expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Adding a condition never grows the result.
    #[test]
    fn prop_more_conditions_never_widen(
        fleet in arb_fleet(),
        conditions in prop::collection::vec(arb_condition(), 0..3),
        extra in arb_condition(),
    ) {
        let base = evaluate(&fleet, &SimpleFilters::default(), &conditions).len();
        let mut narrowed = conditions.clone();
        narrowed.push(extra);
        prop_assert!(evaluate(&fleet, &SimpleFilters::default(), &narrowed).len() <= base);
    }

    /// A record passes the tag filter iff it carries at least one chosen tag.
    #[test]
    fn prop_tag_filter_is_any_match(
        fleet in arb_fleet(),
        chosen in prop::sample::subsequence(TAGS.to_vec(), 1..=3),
    ) {
        let mut filters = SimpleFilters::default();
        filters.set(FilterDimension::Tags, chosen.iter().map(|t| t.to_string()).collect());

        let result = evaluate(&fleet, &filters, &[]);
        for m in &fleet {
            let any = chosen.iter().any(|t| m.has_tag(t));
            prop_assert_eq!(result.iter().any(|r| r.id == m.id), any);
        }
    }

    /// Issues-only keeps exactly the records with an issue.
    #[test]
    fn prop_issues_only(fleet in arb_fleet()) {
        let filters = SimpleFilters { show_issues_only: true, ..SimpleFilters::default() };
        let result = evaluate(&fleet, &filters, &[]);
        prop_assert!(result.iter().all(|m| has_issues(m)));
        prop_assert_eq!(result.len(), fleet.iter().filter(|m| has_issues(m)).count());
    }

    /// Environment view always shows the four environments in fixed order and
    /// places every record once.
    #[test]
    fn prop_environment_view_is_total(fleet in arb_fleet()) {
        let refs: Vec<&Machine> = fleet.iter().collect();
        let grouped = group_records(&refs, View::Environment, &products());
        prop_assert_eq!(grouped.keys(), vec!["prod", "staging", "dev", "test"]);
        let placed: usize = grouped.groups.iter().map(|g| g.len()).sum();
        prop_assert_eq!(placed, fleet.len());
    }

    /// Owner view places every record once; no-owner comes last.
    #[test]
    fn prop_owner_view_is_total(fleet in arb_fleet()) {
        let refs: Vec<&Machine> = fleet.iter().collect();
        let grouped = group_records(&refs, View::Owner, &products());
        prop_assert_eq!(grouped.keys().last().copied(), Some("no-owner"));
        let placed: usize = grouped.groups.iter().map(|g| g.len()).sum();
        prop_assert_eq!(placed, fleet.len());
    }

    /// Every record of a product column sits in exactly one sub-group.
    #[test]
    fn prop_product_subgroups_partition_columns(fleet in arb_fleet()) {
        let refs: Vec<&Machine> = fleet.iter().collect();
        let grouped = group_records(&refs, View::Product, &products());
        for group in &grouped.groups {
            let in_subgroups: usize = group.subgroups.iter().map(|s| s.records.len()).sum();
            prop_assert_eq!(in_subgroups, group.len());
            prop_assert!(group.subgroups.iter().all(|s| !s.records.is_empty()));
        }
    }

    /// Grouping the same input twice gives the same output.
    #[test]
    fn prop_grouping_is_deterministic(fleet in arb_fleet()) {
        let refs: Vec<&Machine> = fleet.iter().collect();
        for view in [View::Product, View::Environment, View::Owner] {
            let first = serde_json::to_string(&group_records(&refs, view, &products())).unwrap();
            let second = serde_json::to_string(&group_records(&refs, view, &products())).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
