//! Grid configuration.
//!
//! A grid is a named listing of one entity's records; each grid gets a detail
//! form at `/grids/<name>/item/<id|new>`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configuration for one grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// URL segment and internal name.
    pub name: String,

    /// Entity whose records the grid lists.
    pub entity: String,

    /// Human-readable grid title.
    #[serde(default)]
    pub title: Option<String>,

    /// Optional equality filter narrowing the grid to a subset of the store.
    #[serde(default)]
    pub filter: Option<GridFilterConfig>,

    /// Whether the grid is backed by a many-to-many relation (enables
    /// join-table extra data on its detail forms).
    #[serde(default)]
    pub many_many: bool,
}

impl GridConfig {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// Equality filter for a grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridFilterConfig {
    pub field: String,
    pub equals: Value,
}
