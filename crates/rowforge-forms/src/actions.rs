//! Form action buttons.

use serde::{Deserialize, Serialize};

/// The buttons a detail form may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Persist changes to an existing record.
    Save,
    /// Persist a new record for the first time.
    Create,
    /// Delete the record.
    Delete,
    /// Leave the form without saving; a link, not a submit.
    Cancel,
}

impl ActionKind {
    pub fn default_label(&self) -> &'static str {
        match self {
            ActionKind::Save => "Save",
            ActionKind::Create => "Create",
            ActionKind::Delete => "Delete",
            ActionKind::Cancel => "Cancel",
        }
    }

    /// Whether the action mutates the record (and therefore posts).
    pub fn is_submit(&self) -> bool {
        !matches!(self, ActionKind::Cancel)
    }
}

/// One rendered action button.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormAction {
    pub kind: ActionKind,
    pub label: String,
    /// Disabled actions render greyed out and are rejected server-side.
    pub enabled: bool,
    /// Target for link-style actions (Cancel).
    #[serde(default)]
    pub link: Option<String>,
}

impl FormAction {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            label: kind.default_label().to_string(),
            enabled: true,
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}
