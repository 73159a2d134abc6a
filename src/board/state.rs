//! Board state.
//!
//! `Board` owns the record store together with the filter state and the
//! selected view. Every query recomputes from the live store.

use serde::Serialize;
use uuid::Uuid;

use crate::config::BoardConfig;
use crate::error::BoardError;
use crate::filter::condition::{Condition, Field};
use crate::filter::engine::evaluate;
use crate::filter::issues::{issue_reasons, IssueKind};
use crate::filter::share::{conditions_from_query, decode_conditions, encode_conditions, share_query};
use crate::filter::simple::{FilterDimension, SimpleFilters};
use crate::grouping::partition::{group_records, GroupedView};
use crate::grouping::view::View;
use crate::logging::structured::LogContext;
use crate::{log_debug, log_info, log_warn};
use crate::store::models::{Environment, Machine, MachinePatch, MachineType, NewMachine, Product, Status};
use crate::store::record_store::{RecordStore, SeedData};
use crate::transition::reassign::{apply_drop, DragEvent, EncodedDragEvent, MoveOutcome};
use crate::validation::machine::validate_new_machine;

/// A selectable value for a field in the filter bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    fn same(value: &str) -> Self {
        Self {
            value: value.to_string(),
            label: value.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    board_id: String,
    config: BoardConfig,
    store: RecordStore,
    filters: SimpleFilters,
    conditions: Vec<Condition>,
    view: View,
    ctx: LogContext,
}

impl Board {
    pub fn new(products: Vec<Product>, config: BoardConfig) -> Self {
        Self::from_seed(
            SeedData {
                products,
                machines: Vec::new(),
            },
            config,
        )
    }

    pub fn from_seed(seed: SeedData, config: BoardConfig) -> Self {
        let board_id = format!("board-{}", &Uuid::new_v4().to_string()[..8]);
        let ctx = LogContext::new(&board_id);
        let store = RecordStore::from_seed(seed, ctx.clone()).with_id_prefix(&config.id_prefix);

        log_info!(
            ctx,
            "BOARD_CREATED",
            machines = store.len(),
            products = store.products().len(),
            view = config.default_view,
        );

        Self {
            board_id,
            view: config.default_view,
            config,
            store,
            filters: SimpleFilters::default(),
            conditions: Vec::new(),
            ctx,
        }
    }

    pub fn from_seed_json(json: &str, config: BoardConfig) -> Result<Self, BoardError> {
        let seed = SeedData::from_json(json)?;
        Ok(Self::from_seed(seed, config))
    }

    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn products(&self) -> &[Product] {
        self.store.products()
    }

    pub fn record(&self, id: &str) -> Option<&Machine> {
        self.store.get(id)
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn simple_filters(&self) -> &SimpleFilters {
        &self.filters
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    // ---- commands ----

    /// Validate and add a record. Nothing is stored on error.
    pub fn add_record(&mut self, data: NewMachine) -> Result<String, BoardError> {
        let data = validate_new_machine(data, &self.store, self.config.strict_hostnames, &self.ctx)?;
        Ok(self.store.add(data))
    }

    pub fn update_record(&mut self, id: &str, patch: MachinePatch) -> bool {
        self.store.update(id, patch)
    }

    pub fn delete_record(&mut self, id: &str) -> bool {
        self.store.delete(id)
    }

    pub fn move_record(&mut self, id: &str, product_id: Option<String>, sub_product: Option<String>) -> bool {
        self.store.move_to(id, product_id, sub_product)
    }

    pub fn add_tag(&mut self, id: &str, tag: &str) -> bool {
        self.store.add_tag(id, tag)
    }

    pub fn remove_tag(&mut self, id: &str, tag: &str) -> bool {
        self.store.remove_tag(id, tag)
    }

    pub fn set_simple_filter(&mut self, dimension: FilterDimension, values: Vec<String>) {
        let rejected = self.filters.set(dimension, values);
        if !rejected.is_empty() {
            log_warn!(self.ctx, "FILTER_VALUES_IGNORED", dimension = dimension, values = rejected);
        }
    }

    pub fn toggle_simple_filter(&mut self, dimension: FilterDimension, value: &str) -> bool {
        self.filters.toggle(dimension, value)
    }

    /// Flip the issues-only switch and return its new state.
    pub fn toggle_issues_only(&mut self) -> bool {
        self.filters.show_issues_only = !self.filters.show_issues_only;
        self.filters.show_issues_only
    }

    /// Reset simple filters and drop every advanced condition.
    pub fn clear_filters(&mut self) {
        self.filters = SimpleFilters::default();
        self.conditions.clear();
        log_debug!(self.ctx, "FILTERS_CLEARED");
    }

    pub fn set_advanced_conditions(&mut self, conditions: Vec<Condition>) {
        log_debug!(self.ctx, "CONDITIONS_SET", count = conditions.len());
        self.conditions = conditions;
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    /// Apply a drop under the current view.
    pub fn handle_drop(&mut self, event: &DragEvent) -> Result<MoveOutcome, BoardError> {
        apply_drop(&mut self.store, self.view, event, &self.ctx)
    }

    /// Decode host droppable ids and apply the drop.
    pub fn handle_encoded_drop(&mut self, event: &EncodedDragEvent) -> Result<MoveOutcome, BoardError> {
        let decoded = event.decode().map_err(|e| {
            log_warn!(self.ctx, "TRANSITION_REJECTED", record = event.draggable_id, error = e.to_string());
            e
        })?;

        match decoded {
            Some(event) => self.handle_drop(&event),
            None => Ok(MoveOutcome::Unchanged),
        }
    }

    /// Replace the conditions with a shared encoding. Returns how many were
    /// loaded; unreadable input loads none.
    pub fn load_shared_conditions(&mut self, encoded: Option<&str>) -> usize {
        self.conditions = decode_conditions(encoded, &self.ctx);
        self.conditions.len()
    }

    /// Same as [`Board::load_shared_conditions`] but reads a link query string.
    pub fn load_shared_query(&mut self, query: &str) -> usize {
        self.conditions = conditions_from_query(query, &self.ctx);
        self.conditions.len()
    }

    // ---- queries ----

    pub fn filtered_records(&self) -> Vec<&Machine> {
        evaluate(self.store.machines(), &self.filters, &self.conditions)
    }

    pub fn grouped_view(&self) -> GroupedView<'_> {
        let filtered = self.filtered_records();
        group_records(&filtered, self.view, self.store.products())
    }

    pub fn record_count(&self) -> usize {
        self.store.len()
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered_records().len()
    }

    pub fn unique_environments(&self) -> Vec<Environment> {
        self.store.unique_environments()
    }

    pub fn unique_owners(&self) -> Vec<String> {
        self.store.unique_owners()
    }

    pub fn unique_tags(&self) -> Vec<String> {
        self.store.unique_tags()
    }

    pub fn unique_statuses(&self) -> Vec<Status> {
        self.store.unique_statuses()
    }

    pub fn unique_sub_products(&self) -> Vec<String> {
        self.store.unique_sub_products()
    }

    pub fn share_encoding(&self) -> Option<String> {
        encode_conditions(&self.conditions)
    }

    pub fn share_query(&self) -> Option<String> {
        share_query(&self.conditions)
    }

    /// Issues of one record, or `None` for an unknown id.
    pub fn issue_reasons(&self, id: &str) -> Option<Vec<IssueKind>> {
        self.store.get(id).map(issue_reasons)
    }

    /// Values offered for `field` in the filter bar, built from live data.
    pub fn field_options(&self, field: Field) -> Vec<FieldOption> {
        match field {
            Field::Hostname | Field::Unknown => Vec::new(),
            Field::ProductId => self
                .products()
                .iter()
                .map(|p| FieldOption {
                    value: p.id.clone(),
                    label: p.name.clone(),
                })
                .collect(),
            Field::Type => MachineType::ALL
                .iter()
                .map(|t| FieldOption {
                    value: t.as_str().to_string(),
                    label: t.label().to_string(),
                })
                .collect(),
            Field::Environment => self
                .unique_environments()
                .iter()
                .map(|e| FieldOption::same(e.as_str()))
                .collect(),
            Field::Status => self
                .unique_statuses()
                .iter()
                .map(|s| FieldOption::same(s.as_str()))
                .collect(),
            Field::Owner => self.unique_owners().iter().map(|o| FieldOption::same(o)).collect(),
            Field::Tags => self.unique_tags().iter().map(|t| FieldOption::same(t)).collect(),
            Field::SubProduct => self
                .unique_sub_products()
                .iter()
                .map(|sp| FieldOption::same(sp))
                .collect(),
        }
    }

    /// Chip text for every condition, using option labels where known.
    pub fn condition_summaries(&self) -> Vec<String> {
        self.conditions
            .iter()
            .map(|c| {
                let options = self.field_options(c.field);
                let label = options
                    .iter()
                    .find(|o| o.value == c.value)
                    .map(|o| o.label.as_str());
                c.describe(label)
            })
            .collect()
    }
}
