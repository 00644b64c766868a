//! Request handlers for the grid admin pages.

use crate::error::WebError;
use crate::negotiate::ResponseFormat;
use crate::state::{AppState, GridEntry};
use crate::templates;
use axum::Form;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, Response};
use rowforge_core::descriptor::{EntityRegistry, FieldKind};
use rowforge_core::record::Record;
use rowforge_forms::{DeleteOutcome, EXTRA_NS, FormView, MessageKind, SaveOutcome};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Handler for the home page: the grid directory.
pub async fn home(State(state): State<AppState>) -> Html<String> {
    let grids: Vec<(String, String)> = state
        .grids()
        .iter()
        .map(|entry| (entry.config.display_title().to_string(), entry.link()))
        .collect();
    Html(templates::home_page(&grids))
}

/// Handler for a grid listing.
pub async fn grid_index(
    State(state): State<AppState>,
    Path(grid): Path<String>,
) -> Result<Html<String>, WebError> {
    let entry = state.grid(&grid)?;
    let registry = state.registry();
    let descriptor = registry
        .get(&entry.config.entity)
        .ok_or_else(|| WebError::UnknownGrid(grid.clone()))?;

    let records: Vec<Record> = entry.list.records();

    Ok(Html(templates::grid_page(
        entry.config.display_title(),
        &entry.link(),
        &records,
        descriptor,
    )))
}

/// Handler for the edit page, the default item action.
pub async fn item_edit(
    State(state): State<AppState>,
    Path((grid, item)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let entry = state.grid(&grid)?;
    let format = ResponseFormat::from_headers(&headers);
    let ctx = state.item_context(&entry, state.actor(&headers));
    let handler = Arc::clone(&entry.detail).handle_item(ctx, &item)?;

    let mut view = handler.edit()?;
    apply_flash(&mut view, &query);
    Ok(render(format, StatusCode::OK, &entry, &item, &view))
}

/// Handler for the read-only view page.
pub async fn item_view(
    State(state): State<AppState>,
    Path((grid, item)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let entry = state.grid(&grid)?;
    let format = ResponseFormat::from_headers(&headers);
    let ctx = state.item_context(&entry, state.actor(&headers));
    let handler = Arc::clone(&entry.detail).handle_item(ctx, &item)?;

    let mut view = handler.view()?;
    apply_flash(&mut view, &query);
    Ok(render(format, StatusCode::OK, &entry, &item, &view))
}

/// Handler for save submissions.
pub async fn item_save(
    State(state): State<AppState>,
    Path((grid, item)): Path<(String, String)>,
    headers: HeaderMap,
    Form(data): Form<HashMap<String, String>>,
) -> Result<Response, WebError> {
    let entry = state.grid(&grid)?;
    let format = ResponseFormat::from_headers(&headers);
    let registry = state.registry();
    let ctx = state.item_context(&entry, state.actor(&headers));
    let mut handler = Arc::clone(&entry.detail).handle_item(ctx, &item)?;

    let values = coerce_submitted(&registry, &entry.config.entity, &data);
    match handler.save(&values)? {
        SaveOutcome::Created {
            edit_url, message, ..
        } => Ok(format.redirect(&flash_url(&edit_url, MessageKind::Good, &message))),
        SaveOutcome::Updated { view } => {
            Ok(render(format, StatusCode::OK, &entry, &item, &view))
        }
        SaveOutcome::FilteredOut { back_url, message } => {
            Ok(format.redirect(&flash_url(&back_url, MessageKind::Good, &message)))
        }
        SaveOutcome::Invalid { view, .. } => Ok(render(
            format,
            StatusCode::UNPROCESSABLE_ENTITY,
            &entry,
            &item,
            &view,
        )),
    }
}

/// Handler for delete submissions.
pub async fn item_delete(
    State(state): State<AppState>,
    Path((grid, item)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let entry = state.grid(&grid)?;
    let format = ResponseFormat::from_headers(&headers);
    let ctx = state.item_context(&entry, state.actor(&headers));
    let mut handler = Arc::clone(&entry.detail).handle_item(ctx, &item)?;

    match handler.delete()? {
        DeleteOutcome::Deleted { back_url, message } => {
            Ok(format.redirect(&flash_url(&back_url, MessageKind::Good, &message)))
        }
        DeleteOutcome::Denied { back_url, error } => {
            Ok(format.redirect(&flash_url(&back_url, MessageKind::Bad, &error.message)))
        }
    }
}

fn render(
    format: ResponseFormat,
    status: StatusCode,
    entry: &GridEntry,
    item: &str,
    view: &FormView,
) -> Response {
    let post_url = format!("{}/item/{}", entry.link(), item);
    let delete_url = format!("{post_url}/delete");
    let fragment = templates::form_fragment(&view.form, &post_url, &delete_url);
    let document = templates::detail_page(view, &post_url, &delete_url);
    format.html(status, document, fragment)
}

/// Flash messages ride the redirect as query parameters; the landing handler
/// folds them back into the form.
fn flash_url(url: &str, kind: MessageKind, message: &str) -> String {
    let key = match kind {
        MessageKind::Good => "good",
        MessageKind::Bad => "bad",
    };
    format!("{}?{}={}", url, key, urlencoding::encode(message))
}

fn apply_flash(view: &mut FormView, query: &HashMap<String, String>) {
    if let Some(message) = query.get("good") {
        view.form.set_message(MessageKind::Good, message.clone());
    } else if let Some(message) = query.get("bad") {
        view.form.set_message(MessageKind::Bad, message.clone());
    }
}

/// Convert urlencoded form strings into typed JSON values, using the field
/// tables of the grid's entity and its conversion targets. Unknown keys stay
/// strings so the validator can report them.
fn coerce_submitted(
    registry: &EntityRegistry,
    entity: &str,
    data: &HashMap<String, String>,
) -> Map<String, Value> {
    let mut values = Map::new();
    for (key, raw) in data {
        if key == "action" {
            continue;
        }
        let value = match field_kind(registry, entity, key) {
            Some(kind) => coerce_value(&kind, raw),
            // Kind discriminator and extra.* join columns stay strings.
            None => Some(Value::String(raw.clone())),
        };
        if let Some(value) = value {
            values.insert(key.clone(), value);
        }
    }
    values
}

/// Look a field up on the base entity, falling back to its variants so a kind
/// change can submit the target entity's fields in the same request.
fn field_kind(registry: &EntityRegistry, entity: &str, field: &str) -> Option<FieldKind> {
    if field == Record::KIND_FIELD || field.starts_with(EXTRA_NS) {
        return None;
    }
    let base = registry.get(entity)?;
    if let Some(descriptor) = base.field(field) {
        return Some(descriptor.kind.clone());
    }
    for variant in &base.variants {
        if let Some(descriptor) = registry.get(variant).and_then(|d| d.field(field)) {
            return Some(descriptor.kind.clone());
        }
    }
    None
}

fn coerce_value(kind: &FieldKind, raw: &str) -> Option<Value> {
    match kind {
        FieldKind::Int => {
            if raw.is_empty() {
                return None;
            }
            Some(raw.parse::<i64>().map_or_else(
                |_| Value::String(raw.to_string()),
                Value::from,
            ))
        }
        FieldKind::Float => {
            if raw.is_empty() {
                return None;
            }
            Some(raw.parse::<f64>().map_or_else(
                |_| Value::String(raw.to_string()),
                Value::from,
            ))
        }
        FieldKind::Bool => Some(Value::Bool(matches!(raw, "true" | "on" | "1"))),
        _ => Some(Value::String(raw.to_string())),
    }
}
