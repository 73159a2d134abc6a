//! Filter evaluation.
//!
//! Advanced conditions are applied first, then every active simple filter.
//! The result borrows from the input and keeps its order.

use crate::filter::condition::{matches_all, Condition};
use crate::filter::simple::SimpleFilters;
use crate::store::models::Machine;

/// Return the machines that pass both the conditions and the simple filters.
pub fn evaluate<'a>(
    machines: &'a [Machine],
    simple: &SimpleFilters,
    conditions: &[Condition],
) -> Vec<&'a Machine> {
    machines
        .iter()
        .filter(|m| conditions.is_empty() || matches_all(conditions, m))
        .filter(|m| simple.matches(m))
        .collect()
}
