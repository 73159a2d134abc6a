//! Filter engine module.
//!
//! Evaluates the advanced condition list and the simple toggle filters:
//! - Conditions (field/operator/value conjunction)
//! - Simple filters (products, environments, owners, tags, issues only)
//! - Issue predicate
//! - Shareable encoding of the condition list

pub mod condition;
pub mod engine;
pub mod issues;
pub mod share;
pub mod simple;

pub use condition::*;
pub use engine::*;
pub use issues::*;
pub use share::*;
pub use simple::*;
