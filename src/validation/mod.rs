//! Validation module.
//!
//! Creation-time checks for new machine records. A record that fails here
//! never reaches the store.

pub mod machine;

pub use machine::*;
