//! Drag-and-drop reassignment.
//!
//! A drop is interpreted in terms of the active view and changes exactly one
//! dimension of the moved record: product/sub-product, environment or owner.
//! Anything that does not fit the active view aborts the transition before
//! the store is touched.

use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::grouping::view::{Destination, View};
use crate::logging::structured::LogContext;
use crate::store::models::{Machine, MachinePatch};
use crate::store::record_store::RecordStore;
use crate::{log_debug, log_info, log_warn};

/// A completed drag gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragEvent {
    pub record_id: String,
    pub source: Destination,
    pub source_index: usize,
    /// `None` when the record was dropped outside every group.
    pub destination: Option<Destination>,
    pub destination_index: usize,
}

/// A drag gesture as reported by the host, with encoded droppable ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedDragEvent {
    pub draggable_id: String,
    pub source_id: String,
    pub source_index: usize,
    pub destination_id: Option<String>,
    pub destination_index: usize,
}

/// Result of a drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum MoveOutcome {
    /// Nothing to do: dropped outside, in place, or onto the current value.
    Unchanged,
    /// The record id is not in the store.
    Ignored,
    Applied {
        record_id: String,
        from: Destination,
        to: Destination,
    },
}

impl DragEvent {
    /// True for drops that cannot change anything.
    pub fn is_noop(&self) -> bool {
        match &self.destination {
            None => true,
            Some(dest) => *dest == self.source && self.destination_index == self.source_index,
        }
    }
}

impl EncodedDragEvent {
    /// Decode the droppable ids.
    ///
    /// Returns `Ok(None)` for drops that are no-ops before decoding (outside
    /// every group, or same id and index), mirroring the host's own check.
    pub fn decode(&self) -> Result<Option<DragEvent>, BoardError> {
        let destination_id = match &self.destination_id {
            None => return Ok(None),
            Some(id) => id,
        };
        if *destination_id == self.source_id && self.destination_index == self.source_index {
            return Ok(None);
        }

        Ok(Some(DragEvent {
            record_id: self.draggable_id.clone(),
            source: Destination::decode(&self.source_id)?,
            source_index: self.source_index,
            destination: Some(Destination::decode(destination_id)?),
            destination_index: self.destination_index,
        }))
    }
}

/// Current value of `machine` in the dimension of `view`.
pub fn current_destination(machine: &Machine, view: View) -> Destination {
    match view {
        View::Product => {
            Destination::product(machine.product_id.as_deref(), machine.sub_product.as_deref())
        }
        View::Environment => Destination::environment(machine.environment),
        View::Owner => Destination::owner(machine.owner()),
    }
}

/// Check that `dest` can be applied under `view`.
pub fn validate_destination(store: &RecordStore, view: View, dest: &Destination) -> Result<(), BoardError> {
    if dest.view() != view {
        return Err(BoardError::DestinationViewMismatch {
            view,
            destination: dest.clone(),
        });
    }
    if let Destination::Product {
        product_id: Some(pid),
        ..
    } = dest
    {
        if store.product(pid).is_none() {
            return Err(BoardError::UnknownProduct(pid.clone()));
        }
    }
    Ok(())
}

/// Validate and commit a drop.
///
/// On error the store is unchanged.
pub fn apply_drop(
    store: &mut RecordStore,
    view: View,
    event: &DragEvent,
    ctx: &LogContext,
) -> Result<MoveOutcome, BoardError> {
    let ctx = ctx.with_record(&event.record_id);

    let dest = match &event.destination {
        Some(dest) if !event.is_noop() => dest,
        _ => {
            log_debug!(ctx, "TRANSITION_NOOP", reason = "same_place_or_outside");
            return Ok(MoveOutcome::Unchanged);
        }
    };

    if let Err(e) = validate_destination(store, view, dest) {
        log_warn!(ctx, "TRANSITION_REJECTED", view = view, destination = dest, error = e.to_string());
        return Err(e);
    }

    let from = match store.get(&event.record_id) {
        Some(machine) => current_destination(machine, view),
        None => {
            log_debug!(ctx, "TRANSITION_IGNORED", reason = "unknown_record");
            return Ok(MoveOutcome::Ignored);
        }
    };

    if from == *dest {
        log_debug!(ctx, "TRANSITION_NOOP", reason = "same_value");
        return Ok(MoveOutcome::Unchanged);
    }

    match dest.clone() {
        Destination::Product {
            product_id,
            sub_product,
        } => {
            store.move_to(&event.record_id, product_id, sub_product);
        }
        Destination::Environment { environment } => {
            store.update(&event.record_id, MachinePatch::environment(environment));
        }
        Destination::Owner { owner } => {
            store.update(&event.record_id, MachinePatch::owner(owner));
        }
    }

    log_info!(ctx, "TRANSITION_APPLIED", view = view, from = from, to = dest);

    Ok(MoveOutcome::Applied {
        record_id: event.record_id.clone(),
        from,
        to: dest.clone(),
    })
}
