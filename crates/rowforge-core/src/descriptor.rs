//! Per-entity field-descriptor tables.
//!
//! Every record kind served by a detail form is described by an
//! [`EntityDescriptor`]: the ordered field list, the field used as the record
//! title, the access policy, and the sibling kinds the record may be converted
//! to. Forms are assembled from these tables rather than from any kind of
//! runtime model introspection.

use crate::policy::AccessPolicy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// The data shape of a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Single-line text.
    Text,
    /// Multi-line text.
    Textarea,
    /// Integer.
    Int,
    /// Floating point number.
    Float,
    /// Boolean checkbox.
    Bool,
    /// UTC timestamp.
    Datetime,
    /// One value out of a fixed option list.
    Select { options: Vec<String> },
}

impl FieldKind {
    /// Whether a JSON value is of the right shape for this field kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::Text | FieldKind::Textarea => value.is_string(),
            FieldKind::Int => value.is_i64() || value.is_u64(),
            FieldKind::Float => value.is_number(),
            FieldKind::Bool => value.is_boolean(),
            FieldKind::Datetime => value
                .as_str()
                .is_some_and(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok()),
            FieldKind::Select { options } => {
                value.as_str().is_some_and(|s| options.iter().any(|o| o == s))
            }
        }
    }
}

/// Descriptor for one field of an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as stored on the record.
    pub name: String,

    /// Human-readable label shown on forms.
    #[serde(default)]
    pub label: Option<String>,

    /// Data shape of the field.
    pub kind: FieldKind,

    /// Whether a non-empty value is required on save.
    #[serde(default)]
    pub required: bool,

    /// Whether the field renders read-only even when the form is editable.
    #[serde(default)]
    pub readonly: bool,

    /// Default value applied to blank records.
    #[serde(default)]
    pub default: Option<Value>,

    /// Maximum string length, where applicable.
    #[serde(default)]
    pub max_length: Option<usize>,

    /// Regex the string value must match.
    #[serde(default)]
    pub pattern: Option<String>,
}

impl FieldDescriptor {
    /// A plain required text field, the most common case.
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind: FieldKind::Text,
            required: false,
            readonly: false,
            default: None,
            max_length: None,
            pattern: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Label to render: explicit label, else the field name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Descriptor table for one record kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Kind identifier, also used as the `kind` discriminator value on records.
    pub name: String,

    /// Singular human-readable name ("Page", "Order").
    #[serde(default)]
    pub singular: Option<String>,

    /// Field whose value is used as the record title in messages and crumbs.
    #[serde(default = "default_title_field")]
    pub title_field: String,

    /// Ordered field list.
    pub fields: Vec<FieldDescriptor>,

    /// Sibling kinds a record of this entity may be converted to on save.
    #[serde(default)]
    pub variants: Vec<String>,

    /// Access policy evaluated per actor.
    #[serde(default)]
    pub policy: AccessPolicy,
}

fn default_title_field() -> String {
    "title".to_string()
}

impl EntityDescriptor {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            singular: None,
            title_field: default_title_field(),
            fields,
            variants: Vec::new(),
            policy: AccessPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_variants(mut self, variants: Vec<String>) -> Self {
        self.variants = variants;
        self
    }

    /// Singular display name: explicit, else the entity name.
    pub fn singular_name(&self) -> &str {
        self.singular.as_deref().unwrap_or(&self.name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether `kind` is a legal conversion target for this entity.
    pub fn allows_kind(&self, kind: &str) -> bool {
        kind == self.name || self.variants.iter().any(|v| v == kind)
    }
}

/// Registry of all entity descriptors known to the server.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: HashMap<String, EntityDescriptor>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: EntityDescriptor) {
        self.entities.insert(descriptor.name.clone(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&EntityDescriptor> {
        self.entities.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }
}
