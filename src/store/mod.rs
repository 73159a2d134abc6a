//! Record store module.
//!
//! Machine/product models and the store that owns them.

pub mod models;
pub mod record_store;

pub use models::*;
pub use record_store::*;
