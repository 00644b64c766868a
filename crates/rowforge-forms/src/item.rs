//! The per-record item request.
//!
//! One [`ItemRequest`] is created per incoming `item/<id|new>` URL and handles
//! the four entry actions: view, edit (the default), save and delete. All
//! navigation comes from the explicitly passed [`ItemContext`]; there is no
//! ambient controller state.

use crate::actions::{ActionKind, FormAction};
use crate::error::FormError;
use crate::factory::DetailForm;
use crate::form::{EXTRA_NS, Form, MergeMode, MessageKind};
use rowforge_core::descriptor::{EntityDescriptor, EntityRegistry};
use rowforge_core::list::RecordList;
use rowforge_core::policy::{Actor, Permission};
use rowforge_core::record::Record;
use rowforge_core::validate::{DescriptorValidator, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// One entry in the breadcrumb trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crumb {
    pub title: String,
    /// Unlinked crumbs (the current page, unsaved records) carry `None`.
    #[serde(default)]
    pub link: Option<String>,
}

impl Crumb {
    pub fn linked(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: Some(link.into()),
        }
    }

    pub fn unlinked(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: None,
        }
    }
}

/// Everything the web layer passes down for one item request.
#[derive(Clone)]
pub struct ItemContext {
    /// Grid URL segment.
    pub grid: String,
    /// Link to the grid listing, the parent of every item URL.
    pub grid_link: String,
    /// Breadcrumb trail up to and including the grid.
    pub trail: Vec<Crumb>,
    /// The requesting principal.
    pub actor: Actor,
    /// The collection the grid iterates over.
    pub list: Arc<dyn RecordList>,
    /// Descriptor tables for every known entity.
    pub registry: Arc<EntityRegistry>,
}

/// A rendered form plus the navigation that frames it.
#[derive(Debug, Clone)]
pub struct FormView {
    pub form: Form,
    pub crumbs: Vec<Crumb>,
    pub back_link: String,
    /// Page title: record title, or "New <Entity>".
    pub title: String,
}

/// Result of a save.
#[derive(Debug)]
pub enum SaveOutcome {
    /// A new record was written; the client should land on its edit URL.
    Created {
        id: u64,
        edit_url: String,
        message: String,
    },
    /// An existing record was written and is still in the list; re-render.
    Updated { view: FormView },
    /// The save pushed the record out of the (filtered) list; go back to the
    /// grid.
    FilteredOut { back_url: String, message: String },
    /// Validation failed; re-render the form with the message and the
    /// submitted values.
    Invalid {
        view: FormView,
        error: ValidationError,
    },
}

/// Result of a delete.
#[derive(Debug)]
pub enum DeleteOutcome {
    Deleted { back_url: String, message: String },
    /// Permission denial surfaces as a recoverable message, redirecting back
    /// to the form rather than failing the request.
    Denied {
        back_url: String,
        error: ValidationError,
    },
}

/// The default per-record request handler.
pub struct ItemRequest {
    config: Arc<DetailForm>,
    ctx: ItemContext,
    record: Record,
}

impl ItemRequest {
    pub fn new(config: Arc<DetailForm>, ctx: ItemContext, record: Record) -> Self {
        Self {
            config,
            ctx,
            record,
        }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn context(&self) -> &ItemContext {
        &self.ctx
    }

    /// URL of this item, with an optional trailing action segment.
    pub fn link(&self, action: Option<&str>) -> String {
        let id = if self.record.is_new() {
            "new".to_string()
        } else {
            self.record.id.to_string()
        };
        match action {
            Some(action) => format!("{}/item/{}/{}", self.ctx.grid_link, id, action),
            None => format!("{}/item/{}", self.ctx.grid_link, id),
        }
    }

    /// The passed trail plus a crumb for the current record.
    pub fn breadcrumbs(&self) -> Vec<Crumb> {
        let mut crumbs = self.ctx.trail.clone();
        match self.descriptor() {
            Ok(descriptor) if !self.record.is_new() => {
                crumbs.push(Crumb::linked(
                    self.record.title(&descriptor),
                    self.link(None),
                ));
            }
            Ok(descriptor) => {
                crumbs.push(Crumb::unlinked(format!(
                    "New {}",
                    descriptor.singular_name()
                )));
            }
            Err(_) => {}
        }
        crumbs
    }

    /// Where "back" points: the nearest linked crumb in the trail, else the
    /// grid itself.
    pub fn back_link(&self) -> String {
        self.ctx
            .trail
            .iter()
            .rev()
            .find_map(|c| c.link.clone())
            .unwrap_or_else(|| self.ctx.grid_link.clone())
    }

    /// Descriptor for the record's current kind. Returns an owned clone so
    /// callers can mutate the record while holding it.
    fn descriptor(&self) -> Result<EntityDescriptor, FormError> {
        self.ctx
            .registry
            .get(&self.record.kind)
            .cloned()
            .ok_or_else(|| FormError::UnknownKind(self.record.kind.clone()))
    }

    fn actor(&self) -> &Actor {
        &self.ctx.actor
    }

    fn can(&self, permission: Permission, descriptor: &EntityDescriptor) -> bool {
        descriptor.policy.allows(permission, self.actor())
    }

    /// Assemble the edit form: fields, action set, read-only state, extra
    /// data, factory callback.
    pub fn edit_form(&self) -> Result<Form, FormError> {
        let descriptor = self.descriptor()?;
        if !self.can(Permission::View, &descriptor) {
            return Err(FormError::NotAuthorized);
        }

        let can_edit = self.can(Permission::Edit, &descriptor);
        let can_delete = self.can(Permission::Delete, &descriptor);
        let can_create = self.can(Permission::Create, &descriptor);

        let mut form = match self.config.fields() {
            Some(fields) => Form::new(self.config.name()).with_fields(fields),
            None => Form::new(self.config.name()).with_descriptor_fields(&descriptor),
        };

        if self.record.is_new() {
            form.push_action(FormAction::new(ActionKind::Create));
            // Cancel links one level up the trail.
            if let Some(up) = self.ctx.trail.iter().rev().find_map(|c| c.link.clone()) {
                form.push_action(FormAction::new(ActionKind::Cancel).with_link(up));
            }
        } else {
            if can_edit {
                form.push_action(FormAction::new(ActionKind::Save));
            }
            if can_delete {
                form.push_action(FormAction::new(ActionKind::Delete));
            }
        }

        let mode = if self.record.is_new() {
            MergeMode::IgnoreEmpty
        } else {
            MergeMode::Overwrite
        };
        form.load_record(&self.record, mode);

        if !self.record.is_new() && !can_edit {
            form.make_readonly();
            if can_delete {
                form.enable_delete();
            }
        } else if self.record.is_new() && !can_create {
            form.make_readonly();
        }

        if self.ctx.list.is_many_many() && !self.record.is_new() {
            if let Some(extra) = self.ctx.list.extra_data(self.record.id) {
                form.load_extra_data(&extra);
            }
        }

        if let Some(callback) = self.config.callback() {
            callback(&mut form, self);
        }

        Ok(form)
    }

    fn view_title(&self) -> String {
        match self.descriptor() {
            Ok(descriptor) if self.record.is_new() => {
                format!("New {}", descriptor.singular_name())
            }
            Ok(descriptor) => self.record.title(&descriptor),
            Err(_) => self.record.kind.clone(),
        }
    }

    fn form_view(&self, form: Form) -> FormView {
        FormView {
            form,
            crumbs: self.breadcrumbs(),
            back_link: self.back_link(),
            title: self.view_title(),
        }
    }

    /// Read-only rendering of the edit form.
    pub fn view(&self) -> Result<FormView, FormError> {
        let mut form = self.edit_form()?;
        form.make_readonly();
        Ok(self.form_view(form))
    }

    /// The live edit form; the default action.
    pub fn edit(&self) -> Result<FormView, FormError> {
        let form = self.edit_form()?;
        Ok(self.form_view(form))
    }

    /// Persist submitted data.
    pub fn save(&mut self, data: &Map<String, Value>) -> Result<SaveOutcome, FormError> {
        let new_record = self.record.is_new();

        let extra = if self.ctx.list.is_many_many() {
            Some(extract_extra(data))
        } else {
            None
        };

        let descriptor = self.descriptor()?;
        let required = if new_record {
            Permission::Create
        } else {
            Permission::Edit
        };
        if !self.can(required, &descriptor) {
            return Err(FormError::NotAuthorized);
        }

        // A differing kind discriminator converts the record before the field
        // values are applied. The original kind stays in the change set so the
        // store's change detection sees the conversion.
        if let Some(new_kind) = data.get(Record::KIND_FIELD).and_then(Value::as_str) {
            if new_kind != self.record.kind {
                if !descriptor.allows_kind(new_kind) {
                    let error =
                        ValidationError::kind_not_allowed(new_kind, &descriptor.name);
                    return Ok(self.invalid(data, error)?);
                }
                self.record.change_kind(new_kind);
                // Reinstantiation under the new kind: values its descriptor
                // does not define move into the change set instead of
                // tripping the unknown-field check below.
                let target = self.descriptor()?;
                self.record.prune_to(&target);
            }
        }

        let descriptor = self.descriptor()?;
        for field in &descriptor.fields {
            if field.readonly {
                continue;
            }
            if let Some(value) = data.get(&field.name) {
                self.record.set(&field.name, value.clone());
            }
        }

        let validator: &dyn Validator = match self.config.validator() {
            Some(validator) => validator,
            None => &DescriptorValidator,
        };
        if let Err(error) = validator.validate(&self.record, &descriptor) {
            tracing::debug!(
                grid = %self.ctx.grid,
                record = self.record.id,
                error = %error,
                "save rejected by validation"
            );
            return Ok(self.invalid(data, error)?);
        }

        self.ctx.list.add(&mut self.record, extra.as_ref())?;

        let descriptor = self.descriptor()?;
        let title = self.record.title(&descriptor);
        let message = format!("Saved {} \"{}\"", descriptor.singular_name(), title);
        tracing::info!(
            grid = %self.ctx.grid,
            record = self.record.id,
            new = new_record,
            "record saved"
        );

        if new_record {
            return Ok(SaveOutcome::Created {
                id: self.record.id,
                edit_url: self.link(None),
                message,
            });
        }

        if self.ctx.list.contains(self.record.id) {
            // Still in the (possibly filtered) list: re-render with the
            // message instead of redirecting to the same URL.
            let mut view = self.edit()?;
            view.form.set_message(MessageKind::Good, message);
            Ok(SaveOutcome::Updated { view })
        } else {
            // The save pushed the record out of the filtered list.
            Ok(SaveOutcome::FilteredOut {
                back_url: self.ctx.grid_link.clone(),
                message,
            })
        }
    }

    fn invalid(
        &self,
        data: &Map<String, Value>,
        error: ValidationError,
    ) -> Result<SaveOutcome, FormError> {
        let mut form = self.edit_form()?;
        form.load_submitted(data);
        form.set_message(MessageKind::Bad, error.message.clone());
        Ok(SaveOutcome::Invalid {
            view: self.form_view(form),
            error,
        })
    }

    /// Delete the record, or redirect back with a message when denied.
    pub fn delete(&mut self) -> Result<DeleteOutcome, FormError> {
        if self.record.is_new() {
            return Err(FormError::NotFound(0));
        }
        let descriptor = self.descriptor()?;
        let title = self.record.title(&descriptor);

        if !self.can(Permission::Delete, &descriptor) {
            return Ok(DeleteOutcome::Denied {
                back_url: self.link(None),
                error: ValidationError::delete_denied(),
            });
        }

        self.ctx.list.remove(self.record.id)?;
        let message = format!("Deleted {} \"{}\"", descriptor.singular_name(), title);
        tracing::info!(
            grid = %self.ctx.grid,
            record = self.record.id,
            "record deleted"
        );

        Ok(DeleteOutcome::Deleted {
            back_url: self.back_link(),
            message,
        })
    }
}

/// Pull `extra.`-namespaced values out of submitted data, stripping the
/// namespace prefix.
fn extract_extra(data: &Map<String, Value>) -> Map<String, Value> {
    let mut extra = Map::new();
    for (key, value) in data {
        if let Some(column) = key.strip_prefix(EXTRA_NS) {
            extra.insert(column.to_string(), value.clone());
        }
    }
    extra
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowforge_core::descriptor::{FieldDescriptor, FieldKind};
    use rowforge_core::list::{GridList, ListFilter, ManyManyList, RecordStore};
    use rowforge_core::policy::{AccessPolicy, AccessRule};
    use rowforge_core::validate::ValidationErrorKind;
    use serde_json::json;

    fn page_descriptor() -> EntityDescriptor {
        EntityDescriptor::new(
            "page",
            vec![
                FieldDescriptor::text("title").required(),
                FieldDescriptor::text("status")
                    .with_kind(FieldKind::Select {
                        options: vec!["draft".into(), "published".into()],
                    })
                    .with_default(json!("draft")),
            ],
        )
        .with_variants(vec!["redirect_page".into()])
    }

    fn redirect_descriptor() -> EntityDescriptor {
        EntityDescriptor::new(
            "redirect_page",
            vec![
                FieldDescriptor::text("title").required(),
                FieldDescriptor::text("target").required(),
            ],
        )
    }

    struct Fixture {
        config: Arc<DetailForm>,
        store: RecordStore,
        registry: Arc<EntityRegistry>,
    }

    impl Fixture {
        fn new(policy: AccessPolicy) -> Self {
            let mut registry = EntityRegistry::new();
            registry.register(page_descriptor().with_policy(policy.clone()));
            registry.register(redirect_descriptor().with_policy(policy));
            Self {
                config: Arc::new(DetailForm::new("detail")),
                store: RecordStore::new("page"),
                registry: Arc::new(registry),
            }
        }

        fn context(&self, actor: Actor, list: Arc<dyn RecordList>) -> ItemContext {
            ItemContext {
                grid: "pages".to_string(),
                grid_link: "/grids/pages".to_string(),
                trail: vec![
                    Crumb::linked("Admin", "/"),
                    Crumb::linked("Pages", "/grids/pages"),
                ],
                actor,
                list,
                registry: Arc::clone(&self.registry),
            }
        }

        fn request(&self, actor: Actor, record: Record) -> ItemRequest {
            let list = Arc::new(GridList::new(self.store.clone()));
            ItemRequest::new(Arc::clone(&self.config), self.context(actor, list), record)
        }

        fn saved_record(&self, title: &str) -> Record {
            let descriptor = self.registry.get("page").unwrap();
            let mut record = Record::blank(descriptor);
            record.set("title", json!(title));
            self.store.write(&mut record).unwrap();
            record
        }
    }

    fn admin() -> Actor {
        Actor::new("alice", ["admin"])
    }

    fn action_kinds(form: &Form) -> Vec<ActionKind> {
        form.actions.iter().map(|a| a.kind).collect()
    }

    #[test]
    fn new_record_gets_create_and_cancel() {
        let fx = Fixture::new(AccessPolicy::open());
        let descriptor = fx.registry.get("page").unwrap();
        let request = fx.request(admin(), Record::blank(descriptor));

        let form = request.edit_form().unwrap();
        assert_eq!(action_kinds(&form), vec![ActionKind::Create, ActionKind::Cancel]);
        // Cancel links to the nearest linked crumb above the unsaved record.
        assert_eq!(
            form.action(ActionKind::Cancel).unwrap().link.as_deref(),
            Some("/grids/pages")
        );
    }

    #[test]
    fn existing_record_actions_follow_permissions() {
        let fx = Fixture::new(AccessPolicy::open());
        let record = fx.saved_record("Home");
        let form = fx.request(admin(), record.clone()).edit_form().unwrap();
        assert_eq!(action_kinds(&form), vec![ActionKind::Save, ActionKind::Delete]);

        let mut no_delete = AccessPolicy::open();
        no_delete.delete = AccessRule::Nobody;
        let fx = Fixture::new(no_delete);
        let record = fx.saved_record("Home");
        let form = fx.request(admin(), record).edit_form().unwrap();
        assert_eq!(action_kinds(&form), vec![ActionKind::Save]);
    }

    #[test]
    fn viewer_with_delete_gets_readonly_form_with_live_delete() {
        let mut policy = AccessPolicy::open();
        policy.edit = AccessRule::Nobody;
        let fx = Fixture::new(policy);
        let record = fx.saved_record("Home");

        let form = fx.request(admin(), record).edit_form().unwrap();
        assert!(form.readonly);
        assert!(form.fields.iter().all(|f| f.readonly));
        assert!(form.action(ActionKind::Save).is_none());
        assert!(form.action(ActionKind::Delete).unwrap().enabled);
    }

    #[test]
    fn view_is_always_readonly() {
        let fx = Fixture::new(AccessPolicy::open());
        let record = fx.saved_record("Home");
        let view = fx.request(admin(), record).view().unwrap();
        assert!(view.form.readonly);
        assert_eq!(view.title, "Home");
    }

    #[test]
    fn unauthorized_view_is_an_error() {
        let mut policy = AccessPolicy::open();
        policy.view = AccessRule::Nobody;
        let fx = Fixture::new(policy);
        let record = fx.saved_record("Home");
        assert!(matches!(
            fx.request(admin(), record).edit(),
            Err(FormError::NotAuthorized)
        ));
    }

    #[test]
    fn save_of_new_record_lands_on_its_edit_url() {
        let fx = Fixture::new(AccessPolicy::open());
        let descriptor = fx.registry.get("page").unwrap();
        let mut request = fx.request(admin(), Record::blank(descriptor));

        let mut data = Map::new();
        data.insert("title".to_string(), json!("Fresh"));
        match request.save(&data).unwrap() {
            SaveOutcome::Created { id, edit_url, message } => {
                assert_eq!(id, 1);
                assert_eq!(edit_url, "/grids/pages/item/1");
                assert!(message.contains("Fresh"));
            }
            other => panic!("expected Created, got {:?}", other),
        }
        assert_eq!(fx.store.get(1).unwrap().get("title"), Some(&json!("Fresh")));
    }

    #[test]
    fn save_of_existing_record_rerenders_with_message() {
        let fx = Fixture::new(AccessPolicy::open());
        let record = fx.saved_record("Home");
        let mut request = fx.request(admin(), record);

        let mut data = Map::new();
        data.insert("title".to_string(), json!("Home v2"));
        match request.save(&data).unwrap() {
            SaveOutcome::Updated { view } => {
                let message = view.form.message.unwrap();
                assert_eq!(message.kind, MessageKind::Good);
                assert!(message.text.contains("Home v2"));
            }
            other => panic!("expected Updated, got {:?}", other),
        }
    }

    #[test]
    fn validation_failure_keeps_submitted_values() {
        let fx = Fixture::new(AccessPolicy::open());
        let record = fx.saved_record("Home");
        let mut request = fx.request(admin(), record);

        let mut data = Map::new();
        data.insert("title".to_string(), json!(""));
        data.insert("status".to_string(), json!("draft"));
        match request.save(&data).unwrap() {
            SaveOutcome::Invalid { view, error } => {
                assert_eq!(error.kind, ValidationErrorKind::RequiredFieldMissing);
                assert_eq!(view.form.message.as_ref().unwrap().kind, MessageKind::Bad);
                // The rejected input is re-rendered, not the stored values.
                assert_eq!(view.form.field("title").unwrap().value, json!(""));
                assert_eq!(view.form.field("status").unwrap().value, json!("draft"));
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
        // Nothing was written.
        assert_eq!(fx.store.get(1).unwrap().get("title"), Some(&json!("Home")));
    }

    #[test]
    fn kind_change_converts_the_record() {
        let fx = Fixture::new(AccessPolicy::open());
        let record = fx.saved_record("Home");
        let mut request = fx.request(admin(), record);

        let mut data = Map::new();
        data.insert("kind".to_string(), json!("redirect_page"));
        data.insert("title".to_string(), json!("Home"));
        data.insert("target".to_string(), json!("/elsewhere"));
        match request.save(&data).unwrap() {
            SaveOutcome::Updated { .. } => {}
            other => panic!("expected Updated, got {:?}", other),
        }
        assert_eq!(fx.store.get(1).unwrap().kind, "redirect_page");
    }

    #[test]
    fn kind_change_drops_fields_the_target_lacks() {
        let fx = Fixture::new(AccessPolicy::open());
        // The defaulted status field exists on page but not on redirect_page.
        let record = fx.saved_record("Home");
        assert_eq!(record.get("status"), Some(&json!("draft")));
        let mut request = fx.request(admin(), record);

        let mut data = Map::new();
        data.insert("kind".to_string(), json!("redirect_page"));
        data.insert("title".to_string(), json!("Home"));
        data.insert("target".to_string(), json!("/elsewhere"));
        match request.save(&data).unwrap() {
            SaveOutcome::Updated { .. } => {}
            other => panic!("expected Updated, got {:?}", other),
        }

        let stored = fx.store.get(1).unwrap();
        assert_eq!(stored.kind, "redirect_page");
        assert!(stored.get("status").is_none());
        assert_eq!(stored.get("target"), Some(&json!("/elsewhere")));
    }

    #[test]
    fn disallowed_kind_change_is_a_validation_failure() {
        let fx = Fixture::new(AccessPolicy::open());
        let record = fx.saved_record("Home");
        let mut request = fx.request(admin(), record);

        let mut data = Map::new();
        data.insert("kind".to_string(), json!("order"));
        match request.save(&data).unwrap() {
            SaveOutcome::Invalid { error, .. } => {
                assert_eq!(error.kind, ValidationErrorKind::KindNotAllowed);
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
        assert_eq!(fx.store.get(1).unwrap().kind, "page");
    }

    #[test]
    fn save_that_leaves_the_filter_redirects_to_the_grid() {
        let fx = Fixture::new(AccessPolicy::open());
        let mut record = fx.saved_record("Home");
        record.set("status", json!("published"));
        fx.store.write(&mut record).unwrap();

        let list = Arc::new(GridList::filtered(
            fx.store.clone(),
            ListFilter::new("status", json!("published")),
        ));
        let ctx = fx.context(admin(), list);
        let mut request = ItemRequest::new(Arc::clone(&fx.config), ctx, record);

        let mut data = Map::new();
        data.insert("status".to_string(), json!("draft"));
        match request.save(&data).unwrap() {
            SaveOutcome::FilteredOut { back_url, .. } => {
                assert_eq!(back_url, "/grids/pages");
            }
            other => panic!("expected FilteredOut, got {:?}", other),
        }
        // The write itself went through.
        assert_eq!(fx.store.get(1).unwrap().get("status"), Some(&json!("draft")));
    }

    #[test]
    fn save_without_permission_is_an_error() {
        let mut policy = AccessPolicy::open();
        policy.edit = AccessRule::Nobody;
        let fx = Fixture::new(policy);
        let record = fx.saved_record("Home");
        let mut request = fx.request(admin(), record);

        let mut data = Map::new();
        data.insert("title".to_string(), json!("Sneaky"));
        assert!(matches!(request.save(&data), Err(FormError::NotAuthorized)));
        assert_eq!(fx.store.get(1).unwrap().get("title"), Some(&json!("Home")));
    }

    #[test]
    fn denied_delete_keeps_the_record_and_redirects_back() {
        let mut policy = AccessPolicy::open();
        policy.delete = AccessRule::Nobody;
        let fx = Fixture::new(policy);
        let record = fx.saved_record("Home");
        let mut request = fx.request(admin(), record);

        match request.delete().unwrap() {
            DeleteOutcome::Denied { back_url, error } => {
                assert_eq!(back_url, "/grids/pages/item/1");
                assert_eq!(error.kind, ValidationErrorKind::DeleteDenied);
            }
            other => panic!("expected Denied, got {:?}", other),
        }
        assert!(fx.store.get(1).is_some());
    }

    #[test]
    fn delete_removes_the_record() {
        let fx = Fixture::new(AccessPolicy::open());
        let record = fx.saved_record("Home");
        let mut request = fx.request(admin(), record);

        match request.delete().unwrap() {
            DeleteOutcome::Deleted { back_url, message } => {
                assert_eq!(back_url, "/grids/pages");
                assert!(message.contains("Home"));
            }
            other => panic!("expected Deleted, got {:?}", other),
        }
        assert!(fx.store.get(1).is_none());
    }

    #[test]
    fn many_many_save_stores_namespaced_extra_data() {
        let fx = Fixture::new(AccessPolicy::open());
        let list = Arc::new(ManyManyList::new(fx.store.clone()));
        let descriptor = fx.registry.get("page").unwrap().clone();
        let ctx = fx.context(admin(), list.clone());
        let mut request =
            ItemRequest::new(Arc::clone(&fx.config), ctx, Record::blank(&descriptor));

        let mut data = Map::new();
        data.insert("title".to_string(), json!("Linked"));
        data.insert("extra.sort_order".to_string(), json!(5));
        request.save(&data).unwrap();

        assert_eq!(list.extra_data(1).unwrap().get("sort_order"), Some(&json!(5)));
        // The namespaced value never lands on the record itself.
        assert!(fx.store.get(1).unwrap().get("extra.sort_order").is_none());
    }

    #[test]
    fn breadcrumbs_end_in_the_current_record() {
        let fx = Fixture::new(AccessPolicy::open());
        let record = fx.saved_record("Home");
        let crumbs = fx.request(admin(), record).breadcrumbs();
        assert_eq!(crumbs.len(), 3);
        assert_eq!(crumbs[2].title, "Home");
        assert_eq!(crumbs[2].link.as_deref(), Some("/grids/pages/item/1"));

        let descriptor = fx.registry.get("page").unwrap();
        let crumbs = fx.request(admin(), Record::blank(descriptor)).breadcrumbs();
        assert_eq!(crumbs[2].title, "New page");
        assert!(crumbs[2].link.is_none());
    }
}
