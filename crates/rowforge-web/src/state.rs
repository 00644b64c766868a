//! Shared application state.

use crate::error::WebError;
use axum::http::HeaderMap;
use rowforge_core::config::{GridConfig, RowforgeConfig};
use rowforge_core::descriptor::EntityRegistry;
use rowforge_core::list::{GridList, ListFilter, ManyManyList, RecordList, RecordStore};
use rowforge_core::policy::Actor;
use rowforge_forms::{Crumb, DetailForm, ItemContext};
use std::collections::HashMap;
use std::sync::Arc;

/// Header carrying the requesting user's id. Resolved against the configured
/// users; absent or unknown ids fall back to the anonymous actor.
pub const ACTOR_HEADER: &str = "x-actor";

/// One configured grid with its list and detail form.
#[derive(Clone)]
pub struct GridEntry {
    pub config: GridConfig,
    pub list: Arc<dyn RecordList>,
    pub detail: Arc<DetailForm>,
}

impl GridEntry {
    pub fn link(&self) -> String {
        format!("/grids/{}", urlencoding::encode(&self.config.name))
    }
}

/// Shared application state for the web surface.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Clone)]
struct AppStateInner {
    config: RowforgeConfig,
    registry: Arc<EntityRegistry>,
    /// One store per base entity, shared by every grid over that entity.
    stores: HashMap<String, RecordStore>,
    grids: HashMap<String, GridEntry>,
}

impl AppState {
    /// Build the state from checked configuration: one store per entity, one
    /// list and detail form per grid.
    pub fn new(config: RowforgeConfig) -> Self {
        let registry = Arc::new(config.registry());

        let mut stores: HashMap<String, RecordStore> = HashMap::new();
        for grid in &config.grids {
            stores
                .entry(grid.entity.clone())
                .or_insert_with(|| RecordStore::new(grid.entity.clone()));
        }

        let mut grids = HashMap::new();
        for grid in &config.grids {
            let store = stores[&grid.entity].clone();
            let list: Arc<dyn RecordList> = if grid.many_many {
                Arc::new(ManyManyList::new(store))
            } else {
                match &grid.filter {
                    Some(filter) => Arc::new(GridList::filtered(
                        store,
                        ListFilter::new(filter.field.clone(), filter.equals.clone()),
                    )),
                    None => Arc::new(GridList::new(store)),
                }
            };
            grids.insert(
                grid.name.clone(),
                GridEntry {
                    config: grid.clone(),
                    list,
                    detail: Arc::new(DetailForm::new("detail")),
                },
            );
        }

        Self {
            inner: Arc::new(AppStateInner {
                config,
                registry,
                stores,
                grids,
            }),
        }
    }

    /// Replace a grid's detail form, keeping its list. Lets embedders install
    /// field overrides, validators, callbacks or custom handler factories.
    pub fn set_detail_form(&mut self, grid: &str, detail: Arc<DetailForm>) {
        let inner = Arc::make_mut(&mut self.inner);
        if let Some(entry) = inner.grids.get_mut(grid) {
            entry.detail = detail;
        }
    }

    pub fn config(&self) -> &RowforgeConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> Arc<EntityRegistry> {
        Arc::clone(&self.inner.registry)
    }

    pub fn grid(&self, name: &str) -> Result<GridEntry, WebError> {
        self.inner
            .grids
            .get(name)
            .cloned()
            .ok_or_else(|| WebError::UnknownGrid(name.to_string()))
    }

    /// All grids, ordered by name for stable rendering.
    pub fn grids(&self) -> Vec<GridEntry> {
        let mut entries: Vec<GridEntry> = self.inner.grids.values().cloned().collect();
        entries.sort_by(|a, b| a.config.name.cmp(&b.config.name));
        entries
    }

    /// Backing store for one entity, used for seeding demo data.
    pub fn store(&self, entity: &str) -> Option<RecordStore> {
        self.inner.stores.get(entity).cloned()
    }

    /// Resolve the requesting actor from headers.
    pub fn actor(&self, headers: &HeaderMap) -> Actor {
        headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|id| self.inner.config.user(id))
            .map(|user| user.to_actor())
            .unwrap_or_else(Actor::anonymous)
    }

    /// Assemble the context a detail form needs for one item request.
    pub fn item_context(&self, entry: &GridEntry, actor: Actor) -> ItemContext {
        let grid_link = entry.link();
        ItemContext {
            grid: entry.config.name.clone(),
            grid_link: grid_link.clone(),
            trail: vec![
                Crumb::linked("Home", "/"),
                Crumb::linked(entry.config.display_title(), grid_link),
            ],
            actor,
            list: Arc::clone(&entry.list),
            registry: self.registry(),
        }
    }
}
