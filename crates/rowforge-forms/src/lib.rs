//! Detail-form assembly and per-record request handling.
//!
//! The flow mirrors the admin UI: a grid carries a [`DetailForm`], each
//! `item/<id|new>` request resolves to an [`ItemRequest`] (or a custom
//! [`ItemHandlerFactory`] product), and the handler serves the view, edit,
//! save and delete actions against the grid's [`RecordList`].
//!
//! [`RecordList`]: rowforge_core::list::RecordList

pub mod actions;
pub mod error;
pub mod factory;
pub mod form;
pub mod item;

pub use actions::{ActionKind, FormAction};
pub use error::FormError;
pub use factory::{DetailForm, EditFormCallback, ItemHandler, ItemHandlerFactory};
pub use form::{EXTRA_NS, Form, FormField, FormMessage, MergeMode, MessageKind};
pub use item::{Crumb, DeleteOutcome, FormView, ItemContext, ItemRequest, SaveOutcome};
