//! The board: record store, filter state and active view behind one API.

pub mod shared;
pub mod state;

pub use shared::*;
pub use state::*;
