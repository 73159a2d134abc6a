//! Partitioning filtered records into board columns.
//!
//! Group order and membership depend only on the input order, the product
//! definitions and sorted owner names, so identical inputs always produce
//! identical output.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::grouping::view::{value_key, Destination, View, ALL_KEY, NO_OWNER_KEY, UNASSIGNED_KEY, UNGROUPED_KEY};
use crate::store::models::{Environment, Machine, Product};

/// Label shown for the unassigned product column.
pub const UNASSIGNED_LABEL: &str = "Unassigned";
/// Label shown for the owner column of machines without an owner.
pub const NO_OWNER_LABEL: &str = "No Owner";
/// Label shown for the catch-all sub-group of a product.
pub const UNGROUPED_LABEL: &str = "Other";

/// A drop zone inside a group. Only non-empty sub-groups are emitted.
#[derive(Debug, Clone, Serialize)]
pub struct SubGroup<'a> {
    pub key: String,
    /// `None` for the unlabelled `_all` sub-group.
    pub label: Option<String>,
    pub destination: Destination,
    pub records: Vec<&'a Machine>,
}

/// One board column.
#[derive(Debug, Clone, Serialize)]
pub struct Group<'a> {
    pub key: String,
    pub label: String,
    /// Target used when dropping onto the column itself (e.g. when empty).
    pub destination: Destination,
    pub records: Vec<&'a Machine>,
    pub subgroups: Vec<SubGroup<'a>>,
}

impl<'a> Group<'a> {
    fn new(key: &str, label: &str, destination: Destination, records: Vec<&'a Machine>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            destination,
            records,
            subgroups: Vec::new(),
        }
    }

    /// Single unlabelled sub-group holding every record, when there are any.
    fn with_all_subgroup(mut self) -> Self {
        if !self.records.is_empty() {
            self.subgroups.push(SubGroup {
                key: ALL_KEY.to_string(),
                label: None,
                destination: self.destination.clone(),
                records: self.records.clone(),
            });
        }
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn subgroup(&self, key: &str) -> Option<&SubGroup<'a>> {
        self.subgroups.iter().find(|s| s.key == key)
    }
}

/// The board for one view.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedView<'a> {
    pub view: View,
    pub groups: Vec<Group<'a>>,
}

impl<'a> GroupedView<'a> {
    pub fn group(&self, key: &str) -> Option<&Group<'a>> {
        self.groups.iter().find(|g| g.key == key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.key.as_str()).collect()
    }

    /// Destination behind a group key and optional sub-group key, as the
    /// host would name a drop zone. Reserved keys (`unassigned`, `no-owner`,
    /// `_all`, `_ungrouped`) resolve to their "no value" destinations.
    pub fn destination_at(&self, group_key: &str, subgroup_key: Option<&str>) -> Option<&Destination> {
        let group = self.group(group_key)?;
        match subgroup_key {
            None => Some(&group.destination),
            Some(key) => group.subgroup(key).map(|s| &s.destination),
        }
    }

    /// Destination of the sub-group currently holding `record_id`.
    pub fn location_of(&self, record_id: &str) -> Option<(&Destination, usize)> {
        self.groups
            .iter()
            .flat_map(|g| g.subgroups.iter())
            .find_map(|s| {
                s.records
                    .iter()
                    .position(|m| m.id == record_id)
                    .map(|idx| (&s.destination, idx))
            })
    }
}

/// Partition `records` into the groups of `view`.
pub fn group_records<'a>(records: &[&'a Machine], view: View, products: &[Product]) -> GroupedView<'a> {
    let groups = match view {
        View::Product => group_by_product(records, products),
        View::Environment => group_by_environment(records),
        View::Owner => group_by_owner(records),
    };
    GroupedView { view, groups }
}

fn group_by_product<'a>(records: &[&'a Machine], products: &[Product]) -> Vec<Group<'a>> {
    let mut groups: Vec<Group<'a>> = products
        .iter()
        .map(|product| {
            let members: Vec<&'a Machine> = records
                .iter()
                .copied()
                .filter(|m| m.product_id.as_deref() == Some(product.id.as_str()))
                .collect();

            let mut group = Group::new(
                &value_key(&product.id),
                &product.name,
                product_destination(product, None),
                members,
            );
            group.subgroups = split_sub_products(product, &group.records);
            group
        })
        .collect();

    let unassigned: Vec<&'a Machine> = records.iter().copied().filter(|m| m.is_unassigned()).collect();
    groups.push(
        Group::new(UNASSIGNED_KEY, UNASSIGNED_LABEL, Destination::product(None, None), unassigned)
            .with_all_subgroup(),
    );
    groups
}

fn split_sub_products<'a>(product: &Product, members: &[&'a Machine]) -> Vec<SubGroup<'a>> {
    if product.sub_products.is_empty() {
        if members.is_empty() {
            return Vec::new();
        }
        return vec![SubGroup {
            key: ALL_KEY.to_string(),
            label: None,
            destination: product_destination(product, None),
            records: members.to_vec(),
        }];
    }

    let mut subgroups: Vec<SubGroup<'a>> = product
        .sub_products
        .iter()
        .filter_map(|sp| {
            let records: Vec<&'a Machine> = members
                .iter()
                .copied()
                .filter(|m| m.sub_product.as_deref() == Some(sp.as_str()))
                .collect();
            (!records.is_empty()).then(|| SubGroup {
                key: value_key(sp),
                label: Some(sp.clone()),
                destination: product_destination(product, Some(sp)),
                records,
            })
        })
        .collect();

    // Null or undeclared (orphaned) sub-products
    let ungrouped: Vec<&'a Machine> = members
        .iter()
        .copied()
        .filter(|m| m.sub_product.as_deref().map_or(true, |sp| !product.declares(sp)))
        .collect();
    if !ungrouped.is_empty() {
        subgroups.push(SubGroup {
            key: UNGROUPED_KEY.to_string(),
            label: Some(UNGROUPED_LABEL.to_string()),
            destination: product_destination(product, None),
            records: ungrouped,
        });
    }

    subgroups
}

/// Column destinations are built from the literal values, never from keys.
fn product_destination(product: &Product, sub_product: Option<&str>) -> Destination {
    Destination::Product {
        product_id: Some(product.id.clone()),
        sub_product: sub_product.map(str::to_string),
    }
}

fn group_by_environment<'a>(records: &[&'a Machine]) -> Vec<Group<'a>> {
    Environment::ALL
        .iter()
        .map(|env| {
            let members = records.iter().copied().filter(|m| m.environment == *env).collect();
            Group::new(env.as_str(), env.label(), Destination::environment(*env), members)
                .with_all_subgroup()
        })
        .collect()
}

fn group_by_owner<'a>(records: &[&'a Machine]) -> Vec<Group<'a>> {
    let owners: BTreeSet<&str> = records.iter().filter_map(|m| m.owner()).collect();

    let mut groups: Vec<Group<'a>> = owners
        .into_iter()
        .map(|owner| {
            let members = records.iter().copied().filter(|m| m.owner() == Some(owner)).collect();
            let destination = Destination::Owner {
                owner: Some(owner.to_string()),
            };
            Group::new(&value_key(owner), owner, destination, members).with_all_subgroup()
        })
        .collect();

    let no_owner = records.iter().copied().filter(|m| m.owner().is_none()).collect();
    groups.push(
        Group::new(NO_OWNER_KEY, NO_OWNER_LABEL, Destination::owner(None), no_owner).with_all_subgroup(),
    );
    groups
}
