//! Error types for board operations.
//!
//! Lookup misses are not errors: update, delete and move on an unknown id
//! are silently ignored. Everything here is recoverable.

use thiserror::Error;

use crate::grouping::{Destination, View};

#[derive(Error, Debug)]
pub enum BoardError {
    /// A new record failed creation checks. Nothing was stored.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A drop target string could not be decoded.
    #[error("Malformed destination: {0}")]
    MalformedDestination(String),

    /// A drop target belongs to a different view than the active one.
    #[error("Destination {destination:?} does not belong to the {view} view")]
    DestinationViewMismatch { view: View, destination: Destination },

    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Seed error: {0}")]
    Seed(#[from] serde_json::Error),
}

pub type BoardResult<T> = Result<T, BoardError>;
