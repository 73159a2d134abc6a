//! Machine and product models.
//!
//! These models use the host UI's JSON field names so records can be
//! exchanged without a translation layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Kind of machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineType {
    Vm,
    Physical,
    Cloud,
}

impl MachineType {
    pub const ALL: [MachineType; 3] = [MachineType::Vm, MachineType::Physical, MachineType::Cloud];

    pub fn as_str(&self) -> &'static str {
        match self {
            MachineType::Vm => "vm",
            MachineType::Physical => "physical",
            MachineType::Cloud => "cloud",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MachineType::Vm => "VM",
            MachineType::Physical => "Physical",
            MachineType::Cloud => "Cloud",
        }
    }
}

/// Deployment environment. Declaration order is the environment view order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Prod,
    Staging,
    Dev,
    Test,
}

impl Environment {
    pub const ALL: [Environment; 4] = [
        Environment::Prod,
        Environment::Staging,
        Environment::Dev,
        Environment::Test,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Prod => "prod",
            Environment::Staging => "staging",
            Environment::Dev => "dev",
            Environment::Test => "test",
        }
    }

    /// Capitalized column label ("Prod", "Staging", ...).
    pub fn label(&self) -> &'static str {
        match self {
            Environment::Prod => "Prod",
            Environment::Staging => "Staging",
            Environment::Dev => "Dev",
            Environment::Test => "Test",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
    Idle,
    Decommissioned,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
            Status::Idle => "idle",
            Status::Decommissioned => "decommissioned",
        }
    }
}

macro_rules! impl_wire_enum {
    ($ty:ident, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                serde_json::from_value(serde_json::Value::String(s.to_string()))
                    .map_err(|_| format!("unknown {}: {}", $what, s))
            }
        }
    };
}

impl_wire_enum!(MachineType, "machine type");
impl_wire_enum!(Environment, "environment");
impl_wire_enum!(Status, "status");

/// A machine inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: String,
    pub hostname: String,
    #[serde(rename = "type")]
    pub machine_type: MachineType,
    pub product_id: Option<String>,
    pub sub_product: Option<String>,
    pub environment: Environment,
    pub owner: Option<String>,
    pub status: Status,
    /// Set semantics, insertion order kept for display.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Machine {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// True when no product is assigned. Empty ids count as unassigned.
    pub fn is_unassigned(&self) -> bool {
        self.product_id.as_deref().map_or(true, str::is_empty)
    }

    /// Owner with empty strings folded into `None`.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref().filter(|o| !o.is_empty())
    }

    pub(crate) fn apply(&mut self, patch: MachinePatch) {
        if let Some(hostname) = patch.hostname {
            self.hostname = hostname;
        }
        if let Some(machine_type) = patch.machine_type {
            self.machine_type = machine_type;
        }
        if let Some(product_id) = patch.product_id {
            self.product_id = product_id;
        }
        if let Some(sub_product) = patch.sub_product {
            self.sub_product = sub_product;
        }
        if let Some(environment) = patch.environment {
            self.environment = environment;
        }
        if let Some(owner) = patch.owner {
            self.owner = owner;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(tags) = patch.tags {
            self.tags = dedup_tags(tags);
        }
    }
}

/// Data for a record that does not exist yet. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMachine {
    pub hostname: String,
    #[serde(rename = "type")]
    pub machine_type: MachineType,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub product_id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub sub_product: Option<String>,
    pub environment: Environment,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub owner: Option<String>,
    pub status: Status,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl NewMachine {
    /// Defaults match the add form: vm in prod, active, no product.
    pub fn new(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            machine_type: MachineType::Vm,
            product_id: None,
            sub_product: None,
            environment: Environment::Prod,
            owner: None,
            status: Status::Active,
            tags: None,
        }
    }

    pub(crate) fn into_machine(self, id: String) -> Machine {
        Machine {
            id,
            hostname: self.hostname,
            machine_type: self.machine_type,
            product_id: self.product_id,
            sub_product: self.sub_product,
            environment: self.environment,
            owner: self.owner,
            status: self.status,
            tags: dedup_tags(self.tags.unwrap_or_default()),
        }
    }
}

/// Fields an update may change. `id` is deliberately absent.
///
/// Nullable fields are doubly optional: `None` leaves the field alone,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MachinePatch {
    pub hostname: Option<String>,
    #[serde(rename = "type")]
    pub machine_type: Option<MachineType>,
    #[serde(deserialize_with = "present_option")]
    pub product_id: Option<Option<String>>,
    #[serde(deserialize_with = "present_option")]
    pub sub_product: Option<Option<String>>,
    pub environment: Option<Environment>,
    #[serde(deserialize_with = "present_option")]
    pub owner: Option<Option<String>>,
    pub status: Option<Status>,
    pub tags: Option<Vec<String>>,
}

impl MachinePatch {
    pub fn environment(environment: Environment) -> Self {
        Self {
            environment: Some(environment),
            ..Self::default()
        }
    }

    pub fn owner(owner: Option<String>) -> Self {
        Self {
            owner: Some(owner),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A product definition with its ordered sub-products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sub_products: Vec<String>,
}

impl Product {
    pub fn new(id: &str, name: &str, sub_products: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            sub_products: sub_products.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn declares(&self, sub_product: &str) -> bool {
        self.sub_products.iter().any(|sp| sp == sub_product)
    }
}

/// Drop duplicate tags, keeping first occurrence order.
pub(crate) fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn present_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(Some(value.filter(|s| !s.is_empty())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_machine_wire_format() {
        let machine: Machine = serde_json::from_value(json!({
            "id": "m-1",
            "hostname": "ecom-api-prod-01",
            "type": "vm",
            "productId": "prod-1",
            "subProduct": "API",
            "environment": "prod",
            "owner": "alice@company.com",
            "status": "active",
            "tags": ["k8s-node"]
        }))
        .unwrap();

        assert_eq!(machine.machine_type, MachineType::Vm);
        assert_eq!(machine.product_id.as_deref(), Some("prod-1"));
        assert!(machine.has_tag("k8s-node"));

        let back = serde_json::to_value(&machine).unwrap();
        assert_eq!(back["subProduct"], json!("API"));
        assert_eq!(back["type"], json!("vm"));
    }

    #[test]
    fn test_patch_distinguishes_null_from_absent() {
        let patch: MachinePatch = serde_json::from_value(json!({"owner": null})).unwrap();
        assert_eq!(patch.owner, Some(None));
        assert_eq!(patch.product_id, None);

        let patch: MachinePatch = serde_json::from_value(json!({"productId": "prod-2"})).unwrap();
        assert_eq!(patch.product_id, Some(Some("prod-2".to_string())));
        assert_eq!(patch.owner, None);
    }

    #[test]
    fn test_new_machine_form_blanks_become_none() {
        let data: NewMachine = serde_json::from_value(json!({
            "hostname": "server-01",
            "type": "vm",
            "productId": "",
            "subProduct": "",
            "environment": "dev",
            "owner": "",
            "status": "active"
        }))
        .unwrap();

        assert_eq!(data.product_id, None);
        assert_eq!(data.owner, None);
        assert_eq!(data.tags, None);
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("staging".parse::<Environment>(), Ok(Environment::Staging));
        assert!("production".parse::<Environment>().is_err());
        assert_eq!("decommissioned".parse::<Status>(), Ok(Status::Decommissioned));
        assert_eq!(MachineType::Physical.to_string(), "physical");
    }

    #[test]
    fn test_dedup_tags_keeps_first_order() {
        let tags = dedup_tags(vec![
            "gpu".to_string(),
            "loaner".to_string(),
            "gpu".to_string(),
            String::new(),
        ]);
        assert_eq!(tags, vec!["gpu", "loaner"]);
    }

    #[test]
    fn test_unassigned_and_owner_helpers() {
        let mut machine = NewMachine::new("host").into_machine("m-1".to_string());
        assert!(machine.is_unassigned());
        machine.product_id = Some(String::new());
        assert!(machine.is_unassigned());
        machine.owner = Some(String::new());
        assert_eq!(machine.owner(), None);
    }
}
