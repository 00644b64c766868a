//! # rowforge-core
//!
//! Core model for Rowforge detail forms:
//!
//! - Per-entity field-descriptor tables ([`descriptor`])
//! - Records with change tracking and kind conversion ([`record`])
//! - Record stores and grid/many-to-many collections ([`list`])
//! - Actor-based access policy ([`policy`])
//! - Descriptor-driven validation ([`validate`])
//! - Shared configuration types ([`config`])

pub mod config;
pub mod descriptor;
pub mod list;
pub mod policy;
pub mod record;
pub mod validate;

pub use config::{ConfigError, GridConfig, RowforgeConfig, ServerConfig, UserConfig};
pub use descriptor::{EntityDescriptor, EntityRegistry, FieldDescriptor, FieldKind};
pub use list::{GridList, ListFilter, ManyManyList, RecordList, RecordStore, StoreError};
pub use policy::{AccessPolicy, AccessRule, Actor, Permission};
pub use record::Record;
pub use validate::{DescriptorValidator, ValidationError, ValidationErrorKind, Validator};
