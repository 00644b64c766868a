//! The transient form object assembled per request.
//!
//! A [`Form`] is built from an entity's field descriptors plus the action set
//! the actor's permissions allow, loaded with the record's values, and handed
//! to the rendering layer. It never outlives the request.

use crate::actions::{ActionKind, FormAction};
use rowforge_core::descriptor::{EntityDescriptor, FieldDescriptor, FieldKind};
use rowforge_core::record::Record;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Namespace prefix under which many-to-many join-table columns appear on the
/// form, keeping them apart from the record's own fields.
pub const EXTRA_NS: &str = "extra.";

/// How record values merge into the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Overwrite form values with record values.
    Overwrite,
    /// Skip null/empty record values so descriptor defaults survive; used
    /// when loading new records.
    IgnoreEmpty,
}

/// Severity of a form message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Good,
    Bad,
}

/// A flash message attached to the form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormMessage {
    pub kind: MessageKind,
    pub text: String,
}

/// One rendered field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub value: Value,
    pub required: bool,
    pub readonly: bool,
}

impl FormField {
    pub fn from_descriptor(descriptor: &FieldDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            label: descriptor.display_label().to_string(),
            kind: descriptor.kind.clone(),
            value: Value::Null,
            required: descriptor.required,
            readonly: descriptor.readonly,
        }
    }
}

/// The edit form for one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    /// Form name, used as the HTML form id.
    pub name: String,
    pub fields: Vec<FormField>,
    pub actions: Vec<FormAction>,
    /// Whole-form read-only state.
    pub readonly: bool,
    #[serde(default)]
    pub message: Option<FormMessage>,
}

impl Form {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            actions: Vec::new(),
            readonly: false,
            message: None,
        }
    }

    /// Build the field list from descriptors, prepending a kind selector when
    /// the entity has conversion targets.
    pub fn with_descriptor_fields(mut self, descriptor: &EntityDescriptor) -> Self {
        if !descriptor.variants.is_empty() {
            let mut options = vec![descriptor.name.clone()];
            options.extend(descriptor.variants.iter().cloned());
            self.fields.push(FormField {
                name: Record::KIND_FIELD.to_string(),
                label: "Type".to_string(),
                kind: FieldKind::Select { options },
                value: Value::String(descriptor.name.clone()),
                required: false,
                readonly: false,
            });
        }
        for field in &descriptor.fields {
            self.fields.push(FormField::from_descriptor(field));
        }
        self
    }

    /// Build the field list from an explicit factory override.
    pub fn with_fields(mut self, descriptors: &[FieldDescriptor]) -> Self {
        for field in descriptors {
            self.fields.push(FormField::from_descriptor(field));
        }
        self
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    pub fn push_action(&mut self, action: FormAction) {
        self.actions.push(action);
    }

    pub fn action(&self, kind: ActionKind) -> Option<&FormAction> {
        self.actions.iter().find(|a| a.kind == kind)
    }

    /// Load the record's values into matching fields.
    pub fn load_record(&mut self, record: &Record, mode: MergeMode) {
        for field in &mut self.fields {
            if field.name == Record::KIND_FIELD {
                field.value = Value::String(record.kind.clone());
                continue;
            }
            let Some(value) = record.get(&field.name) else {
                continue;
            };
            if mode == MergeMode::IgnoreEmpty && value_is_empty(value) {
                continue;
            }
            field.value = value.clone();
        }
    }

    /// Load join-table extra data under the [`EXTRA_NS`] namespace, adding
    /// text fields for columns the form does not yet carry.
    pub fn load_extra_data(&mut self, extra: &Map<String, Value>) {
        for (column, value) in extra {
            let name = format!("{}{}", EXTRA_NS, column);
            match self.field_mut(&name) {
                Some(field) => field.value = value.clone(),
                None => self.fields.push(FormField {
                    name,
                    label: column.clone(),
                    kind: FieldKind::Text,
                    value: value.clone(),
                    required: false,
                    readonly: false,
                }),
            }
        }
    }

    /// Load raw submitted values back into the form, used to re-render after
    /// a validation failure without losing the user's input.
    pub fn load_submitted(&mut self, data: &Map<String, Value>) {
        for field in &mut self.fields {
            if let Some(value) = data.get(&field.name) {
                field.value = value.clone();
            }
        }
    }

    /// Make the whole form read-only: all fields and all submit actions.
    pub fn make_readonly(&mut self) {
        self.readonly = true;
        for field in &mut self.fields {
            field.readonly = true;
        }
        for action in &mut self.actions {
            if action.kind.is_submit() {
                action.enabled = false;
            }
        }
    }

    /// Re-enable the delete action on an otherwise read-only form.
    pub fn enable_delete(&mut self) {
        if let Some(action) = self.actions.iter_mut().find(|a| a.kind == ActionKind::Delete) {
            action.enabled = true;
        }
    }

    pub fn set_message(&mut self, kind: MessageKind, text: impl Into<String>) {
        self.message = Some(FormMessage {
            kind,
            text: text.into(),
        });
    }
}

fn value_is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
