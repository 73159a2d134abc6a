//! PyO3 bindings.
//!
//! Structured values cross the boundary as JSON strings so the Python side
//! sees exactly the camelCase shapes a web host would.

use std::fmt::Display;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde::Serialize;

use crate::board::{Board, SharedBoard};
use crate::config::BoardConfig;
use crate::filter::{Condition, Field, FilterDimension};
use crate::grouping::View;
use crate::init_logger;
use crate::log_error;
use crate::logging::LogContext;
use crate::store::{MachinePatch, NewMachine};
use crate::transition::EncodedDragEvent;

/// Board handle exposed to Python.
#[pyclass(name = "Board")]
struct PyBoard {
    board: SharedBoard,
    ctx: LogContext,
}

impl PyBoard {
    fn fail(&self, op: &str, err: impl Display) -> PyErr {
        log_error!(self.ctx, "PY_CALL_FAILED", op = op, error = err.to_string());
        PyValueError::new_err(err.to_string())
    }

    fn parse<T: serde::de::DeserializeOwned>(&self, op: &str, json: &str) -> PyResult<T> {
        serde_json::from_str(json).map_err(|e| self.fail(op, e))
    }

    fn to_json<T: Serialize>(&self, op: &str, value: &T) -> PyResult<String> {
        serde_json::to_string(value).map_err(|e| self.fail(op, e))
    }
}

#[pymethods]
impl PyBoard {
    /// Create a board from optional seed and config JSON.
    ///
    /// `RACKBOARD_*` environment variables override the config.
    #[new]
    #[pyo3(signature = (seed_json=None, config_json=None))]
    fn new(seed_json: Option<&str>, config_json: Option<&str>) -> PyResult<Self> {
        let to_py = |e: crate::error::BoardError| PyValueError::new_err(e.to_string());

        let config = match config_json {
            Some(json) => BoardConfig::from_json(json).map_err(to_py)?,
            None => BoardConfig::default(),
        }
        .with_env_overrides()
        .map_err(to_py)?;

        init_logger(config.level_filter().map_err(to_py)?);

        let board = match seed_json {
            Some(json) => Board::from_seed_json(json, config).map_err(to_py)?,
            None => Board::new(Vec::new(), config),
        };
        let ctx = LogContext::new(board.board_id());

        Ok(Self {
            board: SharedBoard::new(board),
            ctx,
        })
    }

    #[getter]
    fn board_id(&self) -> String {
        self.ctx.board_id.clone()
    }

    // ---- commands ----

    fn add_record(&self, record_json: &str) -> PyResult<String> {
        let data: NewMachine = self.parse("add_record", record_json)?;
        self.board
            .write(|b| b.add_record(data))
            .map_err(|e| self.fail("add_record", e))
    }

    fn update_record(&self, id: &str, patch_json: &str) -> PyResult<bool> {
        let patch: MachinePatch = self.parse("update_record", patch_json)?;
        Ok(self.board.write(|b| b.update_record(id, patch)))
    }

    fn delete_record(&self, id: &str) -> bool {
        self.board.write(|b| b.delete_record(id))
    }

    #[pyo3(signature = (id, product_id=None, sub_product=None))]
    fn move_record(&self, id: &str, product_id: Option<String>, sub_product: Option<String>) -> bool {
        self.board.write(|b| b.move_record(id, product_id, sub_product))
    }

    fn add_tag(&self, id: &str, tag: &str) -> bool {
        self.board.write(|b| b.add_tag(id, tag))
    }

    fn remove_tag(&self, id: &str, tag: &str) -> bool {
        self.board.write(|b| b.remove_tag(id, tag))
    }

    fn set_simple_filter(&self, dimension: &str, values: Vec<String>) -> PyResult<()> {
        let dimension: FilterDimension = dimension.parse().map_err(|e| self.fail("set_simple_filter", e))?;
        self.board.write(|b| b.set_simple_filter(dimension, values));
        Ok(())
    }

    fn toggle_simple_filter(&self, dimension: &str, value: &str) -> PyResult<bool> {
        let dimension: FilterDimension = dimension
            .parse()
            .map_err(|e| self.fail("toggle_simple_filter", e))?;
        Ok(self.board.write(|b| b.toggle_simple_filter(dimension, value)))
    }

    fn toggle_issues_only(&self) -> bool {
        self.board.write(|b| b.toggle_issues_only())
    }

    fn clear_filters(&self) {
        self.board.write(|b| b.clear_filters());
    }

    fn set_advanced_conditions(&self, conditions_json: &str) -> PyResult<()> {
        let conditions: Vec<Condition> = self.parse("set_advanced_conditions", conditions_json)?;
        self.board.write(|b| b.set_advanced_conditions(conditions));
        Ok(())
    }

    fn set_view(&self, view: &str) -> PyResult<()> {
        let view: View = view.parse().map_err(|e| self.fail("set_view", e))?;
        self.board.write(|b| b.set_view(view));
        Ok(())
    }

    /// Apply a drop reported with encoded droppable ids. Returns the outcome
    /// as JSON.
    fn handle_drop(&self, event_json: &str) -> PyResult<String> {
        let event: EncodedDragEvent = self.parse("handle_drop", event_json)?;
        let outcome = self
            .board
            .write(|b| b.handle_encoded_drop(&event))
            .map_err(|e| self.fail("handle_drop", e))?;
        self.to_json("handle_drop", &outcome)
    }

    fn load_shared_query(&self, query: &str) -> usize {
        self.board.write(|b| b.load_shared_query(query))
    }

    // ---- queries ----

    fn filtered_records(&self) -> PyResult<String> {
        let records = self.board.filtered_snapshot();
        self.to_json("filtered_records", &records)
    }

    fn grouped_view(&self) -> PyResult<String> {
        self.board.grouped_json().map_err(|e| self.fail("grouped_view", e))
    }

    fn record_count(&self) -> usize {
        self.board.read(|b| b.record_count())
    }

    fn filtered_count(&self) -> usize {
        self.board.read(|b| b.filtered_count())
    }

    fn unique_environments(&self) -> Vec<String> {
        self.board
            .read(|b| b.unique_environments().iter().map(|e| e.to_string()).collect())
    }

    fn unique_owners(&self) -> Vec<String> {
        self.board.read(|b| b.unique_owners())
    }

    fn unique_tags(&self) -> Vec<String> {
        self.board.read(|b| b.unique_tags())
    }

    fn unique_statuses(&self) -> Vec<String> {
        self.board
            .read(|b| b.unique_statuses().iter().map(|s| s.to_string()).collect())
    }

    fn unique_sub_products(&self) -> Vec<String> {
        self.board.read(|b| b.unique_sub_products())
    }

    fn field_options(&self, field: &str) -> PyResult<String> {
        let field: Field = serde_json::from_value(serde_json::Value::String(field.to_string()))
            .map_err(|e| self.fail("field_options", e))?;
        let options = self.board.read(|b| b.field_options(field));
        self.to_json("field_options", &options)
    }

    fn condition_summaries(&self) -> Vec<String> {
        self.board.read(|b| b.condition_summaries())
    }

    fn share_query(&self) -> Option<String> {
        self.board.read(|b| b.share_query())
    }

    fn issue_reasons(&self, id: &str) -> PyResult<Option<String>> {
        match self.board.read(|b| b.issue_reasons(id)) {
            Some(reasons) => self.to_json("issue_reasons", &reasons).map(Some),
            None => Ok(None),
        }
    }
}

/// Python module definition
#[pymodule]
fn rackboard_core(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyBoard>()?;
    Ok(())
}
