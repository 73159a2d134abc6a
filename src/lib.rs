//! Rackboard Core - filter, grouping and reassignment engine for the
//! machine inventory board
//!
//! This crate holds the board's state and rules; rendering is left to the
//! host. The implementation prioritizes:
//!
//! 1. **Consistency** - every query is recomputed from the live store
//! 2. **Logging** - every command and rejected transition logged with context
//! 3. **Fail-open filtering** - unknown fields and operators never hide records
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `store` - Machine records, products and their mutations
//! - `filter` - Simple filters, advanced conditions, issue detection, share links
//! - `grouping` - Views, drop destinations and column partitioning
//! - `transition` - Drag-and-drop reassignment
//! - `validation` - Creation checks for new records
//! - `board` - The stateful board and its thread-safe handle
//! - `config` - Board configuration from JSON and environment
//! - `logging` - Structured logging with board context
//!
//! With the `python` feature the board is also exposed as a PyO3 module.

pub mod board;
pub mod config;
pub mod error;
pub mod filter;
pub mod grouping;
pub mod logging;
pub mod store;
pub mod transition;
pub mod validation;

#[cfg(feature = "python")]
mod python;

pub use board::{Board, FieldOption, SharedBoard};
pub use config::BoardConfig;
pub use error::{BoardError, BoardResult};
pub use filter::{Condition, Field, FilterDimension, Operator, SimpleFilters};
pub use grouping::{Destination, GroupedView, View};
pub use store::{Environment, Machine, MachinePatch, MachineType, NewMachine, Product, Status};
pub use transition::{DragEvent, EncodedDragEvent, MoveOutcome};

/// Initialize the process-wide logger. Later calls are no-ops.
pub fn init_logger(level: log::LevelFilter) {
    let _ = env_logger::builder()
        .filter_level(level)
        .format_timestamp_millis()
        .try_init();
}
