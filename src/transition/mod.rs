//! Reassignment transition module.
//!
//! Turns a drag-and-drop gesture into a single-field mutation of the moved
//! record, interpreted through the active view.

pub mod reassign;

pub use reassign::*;
