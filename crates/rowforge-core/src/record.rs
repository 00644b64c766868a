//! Records: the persisted entities behind detail forms.
//!
//! A record is a bag of JSON field values plus a numeric identity and a `kind`
//! discriminator naming its entity descriptor. Identity 0 means the record has
//! never been written. Records track the original values of changed fields so
//! the store can see what a write actually modified, including kind changes.

use crate::descriptor::EntityDescriptor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A single persisted (or not-yet-persisted) entity instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Numeric identity; 0 = new/unsaved.
    pub id: u64,

    /// Entity kind discriminator.
    pub kind: String,

    /// Field values.
    pub values: Map<String, Value>,

    /// Original values of fields changed since the last write, keyed by field
    /// name. A kind change appears here under [`Record::KIND_FIELD`].
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub changed: BTreeMap<String, Value>,

    /// Set on first successful write.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Updated on every successful write.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record {
    /// Pseudo-field name under which a kind change is tracked.
    pub const KIND_FIELD: &'static str = "kind";

    /// A blank record of the given kind with descriptor defaults applied.
    pub fn blank(descriptor: &EntityDescriptor) -> Self {
        let mut values = Map::new();
        for field in &descriptor.fields {
            if let Some(default) = &field.default {
                values.insert(field.name.clone(), default.clone());
            }
        }
        Self {
            id: 0,
            kind: descriptor.name.clone(),
            values,
            changed: BTreeMap::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Set a field value, remembering the original for change detection.
    pub fn set(&mut self, field: &str, value: Value) {
        let previous = self.values.get(field).cloned().unwrap_or(Value::Null);
        if previous != value {
            self.changed.entry(field.to_string()).or_insert(previous);
            self.values.insert(field.to_string(), value);
        }
    }

    /// Title for messages and breadcrumbs: the descriptor's title field, else
    /// a generic `<Entity> #<id>` label.
    pub fn title(&self, descriptor: &EntityDescriptor) -> String {
        self.values
            .get(&descriptor.title_field)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} #{}", descriptor.singular_name(), self.id))
    }

    /// Convert the record to a sibling kind, keeping all field values.
    ///
    /// The original kind lands in the change set so the store's change
    /// detection sees the conversion even though the struct already carries
    /// the new kind.
    pub fn change_kind(&mut self, new_kind: &str) {
        if new_kind == self.kind {
            return;
        }
        let original = std::mem::replace(&mut self.kind, new_kind.to_string());
        self.changed
            .entry(Self::KIND_FIELD.to_string())
            .or_insert(Value::String(original));
    }

    /// Drop values for fields the descriptor does not define, keeping the
    /// originals in the change set.
    ///
    /// Called after a kind conversion: the record sheds the old kind's fields
    /// the same way a reinstantiation under the new kind would, while change
    /// detection still sees what the conversion removed.
    pub fn prune_to(&mut self, descriptor: &EntityDescriptor) {
        let stale: Vec<String> = self
            .values
            .keys()
            .filter(|name| descriptor.field(name).is_none())
            .cloned()
            .collect();
        for name in stale {
            if let Some(original) = self.values.remove(&name) {
                self.changed.entry(name).or_insert(original);
            }
        }
    }

    /// Whether any field (or the kind) changed since the last write.
    pub fn is_changed(&self) -> bool {
        !self.changed.is_empty()
    }

    /// Called by the store after a successful write.
    pub(crate) fn mark_written(&mut self, now: DateTime<Utc>) {
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
        self.updated_at = Some(now);
        self.changed.clear();
    }
}
