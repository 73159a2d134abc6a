//! Views and drop destinations.
//!
//! A `Destination` is the typed drop target carried by every group. It
//! replaces loosely formatted droppable ids; the JSON form exists only so a
//! host UI can round-trip it through its drag-and-drop layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::store::models::Environment;

/// Group key for machines without a product.
pub const UNASSIGNED_KEY: &str = "unassigned";
/// Group key for machines without an owner.
pub const NO_OWNER_KEY: &str = "no-owner";
/// Sub-group key for machines whose sub-product matches no declared value.
pub const UNGROUPED_KEY: &str = "_ungrouped";
/// Sub-group key used when a group is not split further.
pub const ALL_KEY: &str = "_all";

const RESERVED_KEYS: [&str; 4] = [UNASSIGNED_KEY, NO_OWNER_KEY, UNGROUPED_KEY, ALL_KEY];
const ESCAPE_PREFIX: char = '~';

/// Grouping dimension of the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Product,
    Environment,
    Owner,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Product => "product",
            View::Environment => "environment",
            View::Owner => "owner",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(View::Product),
            "environment" => Ok(View::Environment),
            "owner" => Ok(View::Owner),
            other => Err(format!("unknown view: {}", other)),
        }
    }
}

/// Where a dragged record was dropped, in the terms of one view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum Destination {
    Product {
        #[serde(rename = "productId")]
        product_id: Option<String>,
        #[serde(rename = "subProduct")]
        sub_product: Option<String>,
    },
    Environment {
        environment: Environment,
    },
    Owner {
        owner: Option<String>,
    },
}

impl Destination {
    /// Product destination. Empty strings mean "no value"; every other string
    /// is taken literally, including ones that look like group keys.
    pub fn product(product_id: Option<&str>, sub_product: Option<&str>) -> Self {
        Destination::Product {
            product_id: non_empty(product_id),
            sub_product: non_empty(sub_product),
        }
    }

    pub fn environment(environment: Environment) -> Self {
        Destination::Environment { environment }
    }

    pub fn owner(owner: Option<&str>) -> Self {
        Destination::Owner {
            owner: non_empty(owner),
        }
    }

    pub fn view(&self) -> View {
        match self {
            Destination::Product { .. } => View::Product,
            Destination::Environment { .. } => View::Environment,
            Destination::Owner { .. } => View::Owner,
        }
    }

    /// JSON form used as a droppable id by the host.
    pub fn encode(&self) -> String {
        // Serializing this enum cannot fail: every field is a string or unit enum.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse a droppable id produced by [`Destination::encode`].
    ///
    /// Absent values are explicit `null`s, so string values are never
    /// reinterpreted; only empty strings fold to `None`.
    pub fn decode(encoded: &str) -> Result<Self, BoardError> {
        let raw: Destination = serde_json::from_str(encoded)
            .map_err(|e| BoardError::MalformedDestination(format!("{}: {}", encoded, e)))?;
        Ok(raw.normalized())
    }

    fn normalized(self) -> Self {
        match self {
            Destination::Product {
                product_id,
                sub_product,
            } => Destination::product(product_id.as_deref(), sub_product.as_deref()),
            Destination::Owner { owner } => Destination::owner(owner.as_deref()),
            env @ Destination::Environment { .. } => env,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Group or sub-group key for a real value.
///
/// Values equal to a reserved key, or starting with `~`, get a `~` prefix so
/// they can never collide with the reserved keys or with each other.
pub fn value_key(value: &str) -> String {
    if RESERVED_KEYS.contains(&value) || value.starts_with(ESCAPE_PREFIX) {
        format!("{}{}", ESCAPE_PREFIX, value)
    } else {
        value.to_string()
    }
}
