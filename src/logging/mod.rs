//! Structured logging with board context.
//!
//! Provides logging macros and utilities that include board_id and record_id
//! in every log message for easy correlation.

pub mod structured;

pub use structured::*;
