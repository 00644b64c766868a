//! Error types for the forms crate.

use rowforge_core::list::StoreError;
use thiserror::Error;

/// Errors from detail-form request handling.
///
/// Validation failures are deliberately not in here: they are recovered
/// locally and surface as form messages, never as errors.
#[derive(Debug, Error)]
pub enum FormError {
    /// The actor lacks the permission the action requires.
    #[error("not authorized")]
    NotAuthorized,

    /// No record with the given identity in the owning list.
    #[error("record {0} not found")]
    NotFound(u64),

    /// The item URL segment is neither numeric nor `new`.
    #[error("invalid item segment '{0}'")]
    BadSegment(String),

    /// A record carries a kind with no registered descriptor.
    #[error("no descriptor registered for kind '{0}'")]
    UnknownKind(String),

    /// Store failure during write or delete.
    #[error(transparent)]
    Store(#[from] StoreError),
}
