//! Per-entity access policy.
//!
//! Each entity descriptor carries an [`AccessPolicy`] with one rule per
//! operation. Rules are evaluated against the requesting [`Actor`] only; there
//! is no external policy engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The four gated operations on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    View,
    Edit,
    Delete,
    Create,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::View => "view",
            Permission::Edit => "edit",
            Permission::Delete => "delete",
            Permission::Create => "create",
        }
    }
}

/// The requesting principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl Actor {
    pub fn new(id: impl Into<String>, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            id: id.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// The unauthenticated actor: no roles.
    pub fn anonymous() -> Self {
        Self {
            id: "anonymous".to_string(),
            roles: BTreeSet::new(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Who may perform one operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessRule {
    /// Any actor, authenticated or not.
    Anyone,
    /// No actor.
    Nobody,
    /// Actors holding at least one of the listed roles.
    Roles(Vec<String>),
}

impl AccessRule {
    pub fn allows(&self, actor: &Actor) -> bool {
        match self {
            AccessRule::Anyone => true,
            AccessRule::Nobody => false,
            AccessRule::Roles(roles) => roles.iter().any(|r| actor.has_role(r)),
        }
    }
}

/// Access policy for one entity, one rule per operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessPolicy {
    #[serde(default = "default_anyone")]
    pub view: AccessRule,
    #[serde(default = "default_admin")]
    pub edit: AccessRule,
    #[serde(default = "default_admin")]
    pub delete: AccessRule,
    #[serde(default = "default_admin")]
    pub create: AccessRule,
}

fn default_anyone() -> AccessRule {
    AccessRule::Anyone
}

fn default_admin() -> AccessRule {
    AccessRule::Roles(vec!["admin".to_string()])
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            view: default_anyone(),
            edit: default_admin(),
            delete: default_admin(),
            create: default_admin(),
        }
    }
}

impl AccessPolicy {
    /// A policy allowing everything, for tests and trusted setups.
    pub fn open() -> Self {
        Self {
            view: AccessRule::Anyone,
            edit: AccessRule::Anyone,
            delete: AccessRule::Anyone,
            create: AccessRule::Anyone,
        }
    }

    pub fn allows(&self, permission: Permission, actor: &Actor) -> bool {
        let rule = match permission {
            Permission::View => &self.view,
            Permission::Edit => &self.edit,
            Permission::Delete => &self.delete,
            Permission::Create => &self.create,
        };
        rule.allows(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_gates_mutations_on_admin() {
        let policy = AccessPolicy::default();
        let visitor = Actor::anonymous();
        let admin = Actor::new("alice", ["admin"]);

        assert!(policy.allows(Permission::View, &visitor));
        assert!(!policy.allows(Permission::Edit, &visitor));
        assert!(!policy.allows(Permission::Delete, &visitor));
        assert!(policy.allows(Permission::Edit, &admin));
        assert!(policy.allows(Permission::Create, &admin));
    }

    #[test]
    fn role_rule_matches_any_listed_role() {
        let rule = AccessRule::Roles(vec!["editor".into(), "admin".into()]);
        assert!(rule.allows(&Actor::new("bob", ["editor"])));
        assert!(!rule.allows(&Actor::new("carol", ["viewer"])));
    }

    #[test]
    fn nobody_denies_admins_too() {
        let rule = AccessRule::Nobody;
        assert!(!rule.allows(&Actor::new("alice", ["admin"])));
    }
}
