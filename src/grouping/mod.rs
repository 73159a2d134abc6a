//! View/grouping module.
//!
//! Partitions filtered records into board columns for the active view:
//! - product (with sub-product drop zones and an unassigned column)
//! - environment (fixed four columns)
//! - owner (sorted owners plus a no-owner column)

pub mod partition;
pub mod view;

pub use partition::*;
pub use view::*;
