//! The detail-form component.
//!
//! A [`DetailForm`] is attached to a grid once and then dispatches every
//! `item/<id|new>` request to a per-record handler. The default handler is
//! [`ItemRequest`]; installing an [`ItemHandlerFactory`] swaps in a custom one
//! while keeping the same routing and record resolution.

use crate::error::FormError;
use crate::form::Form;
use crate::item::{DeleteOutcome, FormView, ItemContext, ItemRequest, SaveOutcome};
use rowforge_core::descriptor::FieldDescriptor;
use rowforge_core::record::Record;
use rowforge_core::validate::Validator;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Hook run on the assembled edit form, after fields, actions and values are
/// in place. Lets a grid tweak the form without a custom handler.
pub type EditFormCallback = Arc<dyn Fn(&mut Form, &ItemRequest) + Send + Sync>;

/// The four entry actions a per-record handler serves.
pub trait ItemHandler: Send {
    /// Read-only rendering.
    fn view(&self) -> Result<FormView, FormError>;
    /// The live edit form; the default action.
    fn edit(&self) -> Result<FormView, FormError>;
    /// Persist submitted data.
    fn save(&mut self, data: &Map<String, Value>) -> Result<SaveOutcome, FormError>;
    /// Delete the record.
    fn delete(&mut self) -> Result<DeleteOutcome, FormError>;
}

impl ItemHandler for ItemRequest {
    fn view(&self) -> Result<FormView, FormError> {
        ItemRequest::view(self)
    }

    fn edit(&self) -> Result<FormView, FormError> {
        ItemRequest::edit(self)
    }

    fn save(&mut self, data: &Map<String, Value>) -> Result<SaveOutcome, FormError> {
        ItemRequest::save(self, data)
    }

    fn delete(&mut self) -> Result<DeleteOutcome, FormError> {
        ItemRequest::delete(self)
    }
}

/// Builds the handler for one resolved record. Custom factories typically wrap
/// the passed [`ItemRequest`] and delegate the actions they do not override.
pub trait ItemHandlerFactory: Send + Sync {
    fn create(&self, request: ItemRequest) -> Box<dyn ItemHandler>;
}

/// Grid-level detail-form configuration.
pub struct DetailForm {
    name: String,
    /// Explicit field override; `None` falls back to the entity's descriptor
    /// table.
    fields: Option<Vec<FieldDescriptor>>,
    /// Validator override; `None` falls back to the descriptor validator.
    validator: Option<Arc<dyn Validator>>,
    handler: Option<Arc<dyn ItemHandlerFactory>>,
    template: String,
    callback: Option<EditFormCallback>,
}

impl DetailForm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: None,
            validator: None,
            handler: None,
            template: "detail".to_string(),
            callback: None,
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldDescriptor>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_handler_factory(mut self, factory: Arc<dyn ItemHandlerFactory>) -> Self {
        self.handler = Some(factory);
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn with_edit_form_callback(mut self, callback: EditFormCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        self.fields.as_deref()
    }

    pub fn validator(&self) -> Option<&dyn Validator> {
        self.validator.as_deref()
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn callback(&self) -> Option<&EditFormCallback> {
        self.callback.as_ref()
    }

    /// Resolve the URL segment to a record and build the handler for it.
    ///
    /// `new` yields a blank record of the list's base entity; a numeric
    /// segment is looked up in the list. Records outside the list are not
    /// reachable through it, so a filtered grid cannot edit rows its filter
    /// hides.
    pub fn handle_item(
        self: Arc<Self>,
        ctx: ItemContext,
        segment: &str,
    ) -> Result<Box<dyn ItemHandler>, FormError> {
        let record = if segment == "new" {
            let entity = ctx.list.entity();
            let descriptor = ctx
                .registry
                .get(entity)
                .ok_or_else(|| FormError::UnknownKind(entity.to_string()))?;
            Record::blank(descriptor)
        } else {
            let id: u64 = segment
                .parse()
                .map_err(|_| FormError::BadSegment(segment.to_string()))?;
            ctx.list.by_id(id).ok_or(FormError::NotFound(id))?
        };

        let request = ItemRequest::new(Arc::clone(&self), ctx, record);
        Ok(match &self.handler {
            Some(factory) => factory.create(request),
            None => Box::new(request),
        })
    }
}
