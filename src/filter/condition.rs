//! Advanced query conditions.
//!
//! A condition is one `field operator value` clause. A list of conditions is
//! a conjunction; list order only matters for display.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::models::Machine;

/// Record field a condition can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "hostname")]
    Hostname,
    #[serde(rename = "productId")]
    ProductId,
    #[serde(rename = "environment")]
    Environment,
    #[serde(rename = "type")]
    Type,
    #[serde(rename = "owner")]
    Owner,
    #[serde(rename = "tags")]
    Tags,
    #[serde(rename = "status")]
    Status,
    #[serde(rename = "subProduct")]
    SubProduct,
    /// Any field name this engine does not know. Never constrains.
    #[serde(rename = "unknown", other)]
    Unknown,
}

/// How the value of a field is picked in the filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Select,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Hostname,
        Field::ProductId,
        Field::Environment,
        Field::Type,
        Field::Owner,
        Field::Tags,
        Field::Status,
        Field::SubProduct,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Hostname => "Hostname",
            Field::ProductId => "Product",
            Field::Environment => "Environment",
            Field::Type => "Type",
            Field::Owner => "Owner",
            Field::Tags => "Tags",
            Field::Status => "Status",
            Field::SubProduct => "Sub-Product",
            Field::Unknown => "Unknown",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Hostname | Field::Unknown => FieldKind::Text,
            _ => FieldKind::Select,
        }
    }

    /// Operators offered for this field in the filter bar.
    pub fn operators(&self) -> &'static [Operator] {
        match self.kind() {
            FieldKind::Text => &[
                Operator::Equals,
                Operator::Contains,
                Operator::StartsWith,
                Operator::EndsWith,
            ],
            FieldKind::Select => &[Operator::Equals, Operator::IsAnyOf],
        }
    }

    /// The field rendered as text. Missing values become the empty string
    /// and tags are comma-joined.
    ///
    /// A null field reads as `""`, never the word `"null"`, so text such as
    /// `nul` does not match a missing owner or product.
    pub fn text_of(&self, machine: &Machine) -> Option<String> {
        let text = match self {
            Field::Hostname => machine.hostname.clone(),
            Field::ProductId => machine.product_id.clone().unwrap_or_default(),
            Field::Environment => machine.environment.as_str().to_string(),
            Field::Type => machine.machine_type.as_str().to_string(),
            Field::Owner => machine.owner.clone().unwrap_or_default(),
            Field::Tags => machine.tags.join(","),
            Field::Status => machine.status.as_str().to_string(),
            Field::SubProduct => machine.sub_product.clone().unwrap_or_default(),
            Field::Unknown => return None,
        };
        Some(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "equals")]
    Equals,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "starts with")]
    StartsWith,
    #[serde(rename = "ends with")]
    EndsWith,
    /// Single-value membership, same as `Equals`.
    #[serde(rename = "is any of")]
    IsAnyOf,
    #[serde(rename = "unknown", other)]
    Unknown,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::Contains => "contains",
            Operator::StartsWith => "starts with",
            Operator::EndsWith => "ends with",
            Operator::IsAnyOf => "is any of",
            Operator::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One clause of the advanced filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default = "new_condition_id")]
    pub id: String,
    pub field: Field,
    pub operator: Operator,
    #[serde(default)]
    pub value: String,
}

pub(crate) fn new_condition_id() -> String {
    format!("cond-{}", &Uuid::new_v4().simple().to_string()[..8])
}

impl Condition {
    pub fn new(field: Field, operator: Operator, value: &str) -> Self {
        Self {
            id: new_condition_id(),
            field,
            operator,
            value: value.to_string(),
        }
    }

    /// A blank row as added from the filter bar: `productId equals ""`.
    pub fn blank() -> Self {
        Self::new(Field::ProductId, Operator::Equals, "")
    }

    /// An empty value does not constrain anything.
    pub fn is_set(&self) -> bool {
        !self.value.is_empty()
    }

    pub fn matches(&self, machine: &Machine) -> bool {
        if !self.is_set() {
            return true;
        }

        let text = match self.field.text_of(machine) {
            Some(text) => text,
            None => return true,
        };

        match self.operator {
            Operator::Equals | Operator::IsAnyOf => {
                if self.field == Field::Tags {
                    machine.has_tag(&self.value)
                } else {
                    text == self.value
                }
            }
            Operator::Contains => text.to_lowercase().contains(&self.value.to_lowercase()),
            Operator::StartsWith => text.to_lowercase().starts_with(&self.value.to_lowercase()),
            Operator::EndsWith => text.to_lowercase().ends_with(&self.value.to_lowercase()),
            Operator::Unknown => true,
        }
    }

    /// Chip text such as `Hostname contains api`.
    ///
    /// `value_label` lets callers show a product name instead of its id.
    pub fn describe(&self, value_label: Option<&str>) -> String {
        let value = match value_label {
            Some(label) => label,
            None if self.value.is_empty() => "(empty)",
            None => self.value.as_str(),
        };
        format!("{} {} {}", self.field.label(), self.operator, value)
    }
}

/// True when every condition holds for `machine`.
pub fn matches_all(conditions: &[Condition], machine: &Machine) -> bool {
    conditions.iter().all(|c| c.matches(machine))
}
