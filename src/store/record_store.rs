//! In-memory record store.
//!
//! Owns the machine records and the product definitions. Every read goes
//! straight to the live collection; nothing derived is cached.

use std::collections::{BTreeSet, HashSet};

use serde::Deserialize;
use uuid::Uuid;

use crate::logging::structured::LogContext;
use crate::{log_debug, log_info, log_warn};
use crate::store::models::{Environment, Machine, MachinePatch, NewMachine, Product, Status};

/// Default prefix for generated record ids.
pub const DEFAULT_ID_PREFIX: &str = "m-";

/// Initial data handed to the board by the host.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub machines: Vec<Machine>,
}

impl SeedData {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone)]
pub struct RecordStore {
    machines: Vec<Machine>,
    products: Vec<Product>,
    id_prefix: String,
    ctx: LogContext,
}

impl RecordStore {
    pub fn new(products: Vec<Product>, ctx: LogContext) -> Self {
        Self {
            machines: Vec::new(),
            products,
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            ctx,
        }
    }

    pub fn with_id_prefix(mut self, prefix: &str) -> Self {
        self.id_prefix = prefix.to_string();
        self
    }

    /// Build a store from seed data, dropping machines whose id repeats.
    pub fn from_seed(seed: SeedData, ctx: LogContext) -> Self {
        let mut store = Self::new(seed.products, ctx);
        let mut seen = HashSet::new();

        for mut machine in seed.machines {
            if !seen.insert(machine.id.clone()) {
                log_warn!(store.ctx, "SEED_DUPLICATE_ID", id = machine.id, hostname = machine.hostname);
                continue;
            }
            machine.tags = crate::store::models::dedup_tags(machine.tags);
            store.machines.push(machine);
        }

        log_info!(
            store.ctx,
            "SEED_LOADED",
            machines = store.machines.len(),
            products = store.products.len()
        );
        store
    }

    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn get(&self, id: &str) -> Option<&Machine> {
        self.machines.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Machine> {
        self.machines.iter_mut().find(|m| m.id == id)
    }

    fn next_id(&self) -> String {
        loop {
            let id = format!("{}{}", self.id_prefix, &Uuid::new_v4().simple().to_string()[..8]);
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Append a new record and return its generated id.
    pub fn add(&mut self, data: NewMachine) -> String {
        let id = self.next_id();
        let machine = data.into_machine(id.clone());

        log_debug!(
            self.ctx.with_record(&id),
            "RECORD_ADDED",
            hostname = machine.hostname,
            product = machine.product_id
        );

        self.machines.push(machine);
        id
    }

    /// Merge `patch` into the record. Unknown ids are ignored.
    pub fn update(&mut self, id: &str, patch: MachinePatch) -> bool {
        let ctx = self.ctx.with_record(id);
        match self.get_mut(id) {
            Some(machine) => {
                log_debug!(ctx, "RECORD_UPDATED", patch = patch);
                machine.apply(patch);
                true
            }
            None => {
                log_debug!(ctx, "RECORD_UPDATE_MISS");
                false
            }
        }
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.machines.len();
        self.machines.retain(|m| m.id != id);
        let removed = self.machines.len() != before;
        log_debug!(self.ctx.with_record(id), "RECORD_DELETED", removed = removed);
        removed
    }

    /// Set product and sub-product together.
    pub fn move_to(&mut self, id: &str, product_id: Option<String>, sub_product: Option<String>) -> bool {
        let ctx = self.ctx.with_record(id);
        match self.get_mut(id) {
            Some(machine) => {
                log_debug!(ctx, "RECORD_MOVED", product = product_id, sub_product = sub_product);
                machine.product_id = product_id;
                machine.sub_product = sub_product;
                true
            }
            None => false,
        }
    }

    pub fn add_tag(&mut self, id: &str, tag: &str) -> bool {
        match self.get_mut(id) {
            Some(machine) if !tag.is_empty() && !machine.has_tag(tag) => {
                machine.tags.push(tag.to_string());
                true
            }
            _ => false,
        }
    }

    pub fn remove_tag(&mut self, id: &str, tag: &str) -> bool {
        match self.get_mut(id) {
            Some(machine) if machine.has_tag(tag) => {
                machine.tags.retain(|t| t != tag);
                true
            }
            _ => false,
        }
    }

    pub fn unique_environments(&self) -> Vec<Environment> {
        let set: BTreeSet<&str> = self.machines.iter().map(|m| m.environment.as_str()).collect();
        set.into_iter().filter_map(|e| e.parse().ok()).collect()
    }

    pub fn unique_owners(&self) -> Vec<String> {
        sorted_unique(self.machines.iter().filter_map(|m| m.owner()))
    }

    pub fn unique_tags(&self) -> Vec<String> {
        sorted_unique(self.machines.iter().flat_map(|m| m.tags.iter().map(String::as_str)))
    }

    pub fn unique_statuses(&self) -> Vec<Status> {
        let set: BTreeSet<&str> = self.machines.iter().map(|m| m.status.as_str()).collect();
        set.into_iter().filter_map(|s| s.parse().ok()).collect()
    }

    pub fn unique_sub_products(&self) -> Vec<String> {
        sorted_unique(
            self.machines
                .iter()
                .filter_map(|m| m.sub_product.as_deref())
                .filter(|sp| !sp.is_empty()),
        )
    }
}

fn sorted_unique<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
