// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpMessage, HttpRequest};
use crate::content::record::UserId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt;

pub const ADMIN_ROLE: &str = "admin";
pub const MAX_ROLE_CHARS: usize = 64;

/// The caller on whose behalf an admin request runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub name: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    EditContent,
}

/// The permission capability injected into the duplication components.
pub trait CapabilityChecker: Send + Sync {
    fn allows(&self, actor: &Actor, capability: Capability) -> bool;
}

/// Maps role names to capability sets. The `admin` role holds every
/// capability without an explicit grant.
pub struct RoleCapabilityChecker {
    grants: HashMap<String, HashSet<Capability>>,
}

impl RoleCapabilityChecker {
    pub fn new() -> Self {
        Self {
            grants: HashMap::new(),
        }
    }

    /// Grants a capability to a role. The role name is normalized; names
    /// that fail validation never enter the grant table.
    pub fn grant(
        mut self,
        role: &str,
        capability: Capability,
    ) -> Result<Self, RoleValidationError> {
        let role = normalize_role(role)?;
        self.grants.entry(role).or_default().insert(capability);
        Ok(self)
    }
}

impl Default for RoleCapabilityChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityChecker for RoleCapabilityChecker {
    fn allows(&self, actor: &Actor, capability: Capability) -> bool {
        // Actor roles come from the host; names that fail normalization
        // grant nothing
        actor
            .roles
            .iter()
            .filter_map(|role| normalize_role(role).ok())
            .any(|role| {
                role == ADMIN_ROLE
                    || self
                        .grants
                        .get(&role)
                        .map(|set| set.contains(&capability))
                        .unwrap_or(false)
            })
    }
}

/// Trait to read the authenticated actor off a request.
///
/// The host's authentication middleware is expected to insert an [`Actor`]
/// into the request extensions; requests without one are unauthenticated.
pub trait ActorRequest {
    fn actor(&self) -> Option<Actor>;
}

impl ActorRequest for HttpRequest {
    fn actor(&self) -> Option<Actor> {
        self.extensions().get::<Actor>().cloned()
    }
}

#[derive(Debug)]
pub struct RoleValidationError {
    message: String,
}

impl RoleValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for RoleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for RoleValidationError {}

pub fn normalize_role(role: &str) -> Result<String, RoleValidationError> {
    let trimmed = role.trim();
    if trimmed.is_empty() {
        return Err(RoleValidationError::new("Role is required"));
    }
    if trimmed.chars().count() > MAX_ROLE_CHARS {
        return Err(RoleValidationError::new(format!(
            "Role must be at most {} characters",
            MAX_ROLE_CHARS
        )));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(RoleValidationError::new(format!(
            "Role '{}' contains invalid characters",
            trimmed
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor_with_roles(roles: &[&str]) -> Actor {
        Actor {
            id: UserId(7),
            name: "Editor".to_string(),
            roles: roles.iter().map(|role| role.to_string()).collect(),
        }
    }

    fn editor_checker() -> RoleCapabilityChecker {
        RoleCapabilityChecker::new()
            .grant("editor", Capability::EditContent)
            .expect("valid role")
    }

    #[test]
    fn granted_role_holds_capability() {
        let checker = editor_checker();
        let actor = actor_with_roles(&["editor"]);
        assert!(checker.allows(&actor, Capability::EditContent));
    }

    #[test]
    fn ungranted_role_lacks_capability() {
        let checker = editor_checker();
        let actor = actor_with_roles(&["subscriber"]);
        assert!(!checker.allows(&actor, Capability::EditContent));
    }

    #[test]
    fn admin_role_holds_every_capability() {
        let checker = RoleCapabilityChecker::new();
        let actor = actor_with_roles(&[ADMIN_ROLE]);
        assert!(checker.allows(&actor, Capability::EditContent));
    }

    #[test]
    fn actor_without_roles_is_denied() {
        let checker = editor_checker();
        let actor = actor_with_roles(&[]);
        assert!(!checker.allows(&actor, Capability::EditContent));
    }

    #[test]
    fn grant_normalizes_and_rejects_invalid_role_names() {
        // Grants land under the normalized name
        let checker = RoleCapabilityChecker::new()
            .grant("  editor  ", Capability::EditContent)
            .expect("trimmed role");
        let actor = actor_with_roles(&["editor"]);
        assert!(checker.allows(&actor, Capability::EditContent));

        assert!(
            RoleCapabilityChecker::new()
                .grant("bad role", Capability::EditContent)
                .is_err()
        );
        assert!(
            RoleCapabilityChecker::new()
                .grant("", Capability::EditContent)
                .is_err()
        );
    }

    #[test]
    fn actor_roles_are_normalized_before_matching() {
        let checker = editor_checker();
        let actor = actor_with_roles(&["  editor  "]);
        assert!(checker.allows(&actor, Capability::EditContent));
    }

    #[test]
    fn invalid_actor_role_names_grant_nothing() {
        let checker = editor_checker();
        // Embedded whitespace fails normalization, so neither name matches
        let actor = actor_with_roles(&["ed itor", "admin !"]);
        assert!(!checker.allows(&actor, Capability::EditContent));
    }

    #[test]
    fn whitespace_padded_admin_role_still_holds_capabilities() {
        let checker = RoleCapabilityChecker::new();
        let actor = actor_with_roles(&[" admin "]);
        assert!(checker.allows(&actor, Capability::EditContent));
    }

    #[test]
    fn normalize_role_rejects_invalid_names() {
        assert!(normalize_role("editor").is_ok());
        assert_eq!(normalize_role("  editor  ").unwrap(), "editor");
        assert!(normalize_role("").is_err());
        assert!(normalize_role("bad role").is_err());
        assert!(normalize_role(&"a".repeat(MAX_ROLE_CHARS + 1)).is_err());
    }
}
