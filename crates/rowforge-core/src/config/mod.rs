//! Configuration types shared across the Rowforge crates.
//!
//! The top-level [`RowforgeConfig`] is loaded from YAML by the server binary.
//! Entity descriptors are serde types themselves, so the config embeds them
//! directly rather than mirroring them with a second set of structs.

pub mod grid;
pub mod server;

pub use grid::{GridConfig, GridFilterConfig};
pub use server::ServerConfig;

use crate::descriptor::{EntityDescriptor, EntityRegistry};
use crate::policy::Actor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

/// Errors when loading or checking configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("grid '{grid}' references unknown entity '{entity}'")]
    UnknownEntity { grid: String, entity: String },

    #[error("entity '{entity}' lists unknown variant '{variant}'")]
    UnknownVariant { entity: String, variant: String },
}

/// A user the server knows how to resolve into an [`Actor`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub id: String,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl UserConfig {
    pub fn to_actor(&self) -> Actor {
        Actor {
            id: self.id.clone(),
            roles: self.roles.clone(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowforgeConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub entities: Vec<EntityDescriptor>,

    #[serde(default)]
    pub grids: Vec<GridConfig>,

    #[serde(default)]
    pub users: Vec<UserConfig>,
}

impl RowforgeConfig {
    /// Load and check a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        config.check()?;
        Ok(config)
    }

    /// Referential checks: grids point at registered entities, variants exist.
    pub fn check(&self) -> Result<(), ConfigError> {
        let registry = self.registry();
        for grid in &self.grids {
            if registry.get(&grid.entity).is_none() {
                return Err(ConfigError::UnknownEntity {
                    grid: grid.name.clone(),
                    entity: grid.entity.clone(),
                });
            }
        }
        for entity in &self.entities {
            for variant in &entity.variants {
                if registry.get(variant).is_none() {
                    return Err(ConfigError::UnknownVariant {
                        entity: entity.name.clone(),
                        variant: variant.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Build the entity registry from the configured descriptors.
    pub fn registry(&self) -> EntityRegistry {
        let mut registry = EntityRegistry::new();
        for entity in &self.entities {
            registry.register(entity.clone());
        }
        registry
    }

    pub fn user(&self, id: &str) -> Option<&UserConfig> {
        self.users.iter().find(|u| u.id == id)
    }
}
