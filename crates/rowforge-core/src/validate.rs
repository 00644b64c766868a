//! Record validation.
//!
//! Validation runs before every write and is the only failure mode a save may
//! recover from: a [`ValidationError`] becomes a form message, never a fatal
//! response. The default [`DescriptorValidator`] checks a record against its
//! entity's field-descriptor table; detail forms may swap in a custom
//! [`Validator`] implementation.

use crate::descriptor::{EntityDescriptor, FieldKind};
use crate::record::Record;
use serde_json::Value;
use std::fmt;

/// Error type for validation failures.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The kind of validation error.
    pub kind: ValidationErrorKind,
    /// Human-readable error message, shown on the form.
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn required_field_missing(field: &str) -> Self {
        Self::new(
            ValidationErrorKind::RequiredFieldMissing,
            format!("Field '{}' is required", field),
        )
    }

    pub fn unknown_field(field: &str, entity: &str) -> Self {
        Self::new(
            ValidationErrorKind::UnknownField,
            format!("Field '{}' is not defined for entity '{}'", field, entity),
        )
    }

    pub fn wrong_value_shape(field: &str) -> Self {
        Self::new(
            ValidationErrorKind::WrongValueShape,
            format!("Value for field '{}' has the wrong type", field),
        )
    }

    pub fn value_too_long(field: &str, max: usize) -> Self {
        Self::new(
            ValidationErrorKind::ValueTooLong,
            format!("Value for field '{}' exceeds {} characters", field, max),
        )
    }

    pub fn pattern_mismatch(field: &str, pattern: &str) -> Self {
        Self::new(
            ValidationErrorKind::PatternMismatch,
            format!("Value for field '{}' does not match pattern: {}", field, pattern),
        )
    }

    pub fn kind_not_allowed(kind: &str, entity: &str) -> Self {
        Self::new(
            ValidationErrorKind::KindNotAllowed,
            format!("'{}' is not a valid kind for entity '{}'", kind, entity),
        )
    }

    pub fn delete_denied() -> Self {
        Self::new(ValidationErrorKind::DeleteDenied, "No delete permissions")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required field is missing or empty.
    RequiredFieldMissing,
    /// The record carries a field the descriptor table does not define.
    UnknownField,
    /// A value does not match its field kind.
    WrongValueShape,
    /// A string value exceeds the field's max length.
    ValueTooLong,
    /// A string value does not match the field's pattern.
    PatternMismatch,
    /// A kind conversion target is not a registered variant.
    KindNotAllowed,
    /// The actor may not delete this record.
    DeleteDenied,
}

/// Validates a record against its descriptor before a write.
pub trait Validator: Send + Sync {
    fn validate(&self, record: &Record, descriptor: &EntityDescriptor)
        -> Result<(), ValidationError>;
}

/// Default validator: enforces the field-descriptor table.
///
/// Checks, in order: no unknown fields, required fields present and non-empty,
/// value shapes, max lengths, patterns.
#[derive(Debug, Default)]
pub struct DescriptorValidator;

impl DescriptorValidator {
    pub fn new() -> Self {
        Self
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

impl Validator for DescriptorValidator {
    fn validate(
        &self,
        record: &Record,
        descriptor: &EntityDescriptor,
    ) -> Result<(), ValidationError> {
        for name in record.values.keys() {
            if descriptor.field(name).is_none() {
                return Err(ValidationError::unknown_field(name, &descriptor.name));
            }
        }

        for field in &descriptor.fields {
            let value = record.get(&field.name);

            if field.required && value.is_none_or(is_empty) {
                return Err(ValidationError::required_field_missing(&field.name));
            }

            let Some(value) = value else { continue };
            if is_empty(value) {
                continue;
            }

            if !field.kind.accepts(value) {
                return Err(ValidationError::wrong_value_shape(&field.name));
            }

            if let FieldKind::Text | FieldKind::Textarea = field.kind {
                let s = value.as_str().unwrap_or_default();
                if let Some(max) = field.max_length {
                    if s.chars().count() > max {
                        return Err(ValidationError::value_too_long(&field.name, max));
                    }
                }
                if let Some(pattern) = &field.pattern {
                    let re = regex::Regex::new(pattern).map_err(|_| {
                        ValidationError::pattern_mismatch(&field.name, pattern)
                    })?;
                    if !re.is_match(s) {
                        return Err(ValidationError::pattern_mismatch(&field.name, pattern));
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldDescriptor;
    use serde_json::json;

    fn order_descriptor() -> EntityDescriptor {
        let mut code = FieldDescriptor::text("code").required();
        code.pattern = Some("^[A-Z]{3}-[0-9]+$".to_string());
        let mut notes = FieldDescriptor::text("notes");
        notes.max_length = Some(10);
        EntityDescriptor::new(
            "order",
            vec![
                code,
                notes,
                FieldDescriptor::text("status").with_kind(FieldKind::Select {
                    options: vec!["pending".into(), "shipped".into()],
                }),
            ],
        )
    }

    fn valid_order() -> Record {
        let desc = order_descriptor();
        let mut record = Record::blank(&desc);
        record.set("code", json!("ACM-1"));
        record
    }

    #[test]
    fn valid_record_passes() {
        let result = DescriptorValidator.validate(&valid_order(), &order_descriptor());
        assert!(result.is_ok());
    }

    #[test]
    fn missing_required_field_fails() {
        let desc = order_descriptor();
        let record = Record::blank(&desc);
        let err = DescriptorValidator.validate(&record, &desc).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::RequiredFieldMissing);
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let desc = order_descriptor();
        let mut record = Record::blank(&desc);
        record.set("code", json!(""));
        let err = DescriptorValidator.validate(&record, &desc).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::RequiredFieldMissing);
    }

    #[test]
    fn unknown_field_fails() {
        let desc = order_descriptor();
        let mut record = valid_order();
        record.set("surprise", json!("x"));
        let err = DescriptorValidator.validate(&record, &desc).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::UnknownField);
    }

    #[test]
    fn pattern_mismatch_fails() {
        let desc = order_descriptor();
        let mut record = valid_order();
        record.set("code", json!("not-a-code"));
        let err = DescriptorValidator.validate(&record, &desc).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::PatternMismatch);
    }

    #[test]
    fn over_long_value_fails() {
        let desc = order_descriptor();
        let mut record = valid_order();
        record.set("notes", json!("a very long note indeed"));
        let err = DescriptorValidator.validate(&record, &desc).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::ValueTooLong);
    }

    #[test]
    fn select_value_outside_options_fails() {
        let desc = order_descriptor();
        let mut record = valid_order();
        record.set("status", json!("lost"));
        let err = DescriptorValidator.validate(&record, &desc).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::WrongValueShape);
    }
}
